use std::cmp;
use std::fs;
use std::io as std_io;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json;

use io as mod_io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    JsonPretty,
}

/// Line-delimited serializer: one record per line.
pub struct Serializer<IO, T> {
    _phantom: PhantomData<T>,
    inner: IO,
    format: Format,
}

impl<IO, T> Serializer<IO, T> {
    pub fn new(io: IO, format: Format) -> Self {
        Serializer {
            _phantom: PhantomData,
            inner: io,
            format: format,
        }
    }

    pub fn inner(&self) -> &IO {
        &self.inner
    }

    pub fn into_inner(self) -> IO {
        self.inner
    }
}

impl<IO, T: Serialize> Serializer<IO, T> {
    pub fn serialize(&self, data: &T) -> std_io::Result<Vec<u8>> {
        // a pretty record would span several lines
        serialize(data, Format::Json)
    }
}

impl<'a, IO, T: Deserialize<'a>> Serializer<IO, T> {
    pub fn deserialize(&self, bytes: &'a [u8]) -> std_io::Result<T> {
        deserialize(bytes, self.format)
    }
}

pub fn serialize<T: Serialize>(data: &T, format: Format) -> std_io::Result<Vec<u8>> {
    let result = match format {
        Format::Json => serde_json::to_vec(data),
        Format::JsonPretty => serde_json::to_vec_pretty(data),
    };
    result.map_err(|e| std_io::Error::new(std_io::ErrorKind::InvalidData, e))
}

pub fn deserialize<'a, T: Deserialize<'a>>(bytes: &'a [u8], format: Format) -> std_io::Result<T> {
    match format {
        Format::Json | Format::JsonPretty => serde_json::from_slice(bytes).map_err(|e| {
            std_io::Error::new(std_io::ErrorKind::InvalidData, e)
        }),
    }
}

pub fn write_to<T: Serialize, P: AsRef<Path>>(
    data: &T,
    path: P,
    format: Format,
) -> std_io::Result<()> {
    let bytes = serialize(data, format)?;
    fs::write(path, bytes)
}

pub fn read_from<T: DeserializeOwned, P: AsRef<Path>>(path: P, format: Format) -> std_io::Result<T> {
    let bytes = fs::read(path)?;
    deserialize(&bytes, format)
}

impl<T: Serialize, IO: std_io::Write> mod_io::Write for Serializer<IO, T> {
    type Item = T;

    fn write(&mut self, buf: &[Self::Item]) -> std_io::Result<usize> {
        for item in buf {
            let mut bytes = self.serialize(item)?;
            bytes.push(b'\n');
            self.inner.write_all(&bytes)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std_io::Result<()> {
        self.inner.flush()
    }
}

impl<T: DeserializeOwned, IO: std_io::Read> mod_io::Read for Serializer<IO, T> {
    type Item = T;

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> std_io::Result<usize> {
        let mut count = 0;
        let mut w_buf = Vec::new();
        let mut r_buf = vec![0; 1024];
        let mut pos = 0;
        let mut cap = 0;
        while count < num {
            // if already consumed, then read next buffer.
            if pos >= cap {
                debug_assert!(pos == cap);
                cap = self.inner.read(&mut r_buf)?;
                pos = 0;
                if cap == 0 {
                    // a last record without a trailing newline
                    if !w_buf.is_empty() {
                        buf.push(self.deserialize(&w_buf)?);
                        count += 1;
                    }
                    break;
                }
            }
            // search from the current buffer.
            let available = &r_buf[pos..cap];
            let used = match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    w_buf.extend_from_slice(&available[..i]);
                    if !w_buf.is_empty() {
                        buf.push(self.deserialize(&w_buf)?);
                        count += 1;
                    }
                    w_buf.clear();
                    i + 1
                }
                None => {
                    w_buf.extend_from_slice(available);
                    available.len()
                }
            };
            pos = cmp::min(pos + used, cap); // consumed
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use io::{Read, Write};

    use super::{Format, Serializer};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: u32,
        name: String,
    }

    #[test]
    fn writes_and_reads_json_lines() {
        let records = vec![
            Record { id: 1, name: "saw".to_string() },
            Record { id: 2, name: "duck".to_string() },
        ];
        let mut writer = Serializer::new(Vec::new(), Format::Json);
        assert_eq!(writer.write(&records).unwrap(), 2);
        let bytes = writer.into_inner();
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 2);

        let mut reader = Serializer::<_, Record>::new(Cursor::new(bytes), Format::Json);
        let mut buf = vec![];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, records);
    }
}
