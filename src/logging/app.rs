use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use slog::{Discard, Logger};
use uuid::Uuid;

use super::{create_logger_with_kv_and_time, Config, Error};

/// Eight hex digits derived from the start time of a run.
fn access_id(time: &DateTime<Local>) -> String {
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, time.to_rfc3339().as_bytes());
    id.simple().to_string()[..8].to_string()
}

/// Logger of one run of the application.
///
/// Every record carries the access id of the run. The start of the run is logged on
/// creation and its end, with the elapsed time, when the logger is dropped.
#[derive(Debug)]
pub struct AppLogger {
    inner: Logger,
    accessid: String,
    accesstime: DateTime<Local>,
    filepath: Option<PathBuf>,
}

impl AppLogger {
    pub fn new<C: Into<Config>>(config: C) -> Result<Self, Error> {
        let config = config.into();
        let accesstime = Local::now();
        let accessid = access_id(&accesstime);
        let (inner, filepath) = create_logger_with_kv_and_time(
            config,
            o!("accessid" => accessid.clone()),
            &accesstime,
        )?;
        info!(
            inner,
            "LOG Start with ACCESSID=[{}] ACCESSTIME=[{}]",
            accessid,
            accesstime.to_rfc3339()
        );
        Ok(AppLogger {
            inner: inner,
            accessid: accessid,
            accesstime: accesstime,
            filepath: filepath,
        })
    }

    pub fn accessid(&self) -> &str {
        &self.accessid
    }

    pub fn accesstime(&self) -> &DateTime<Local> {
        &self.accesstime
    }

    /// The log file of the run, if file logging is enabled.
    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_ref().map(|p| p.as_path())
    }

    pub fn create(&self) -> Logger {
        self.inner.new(o!())
    }

    fn close(&mut self) {
        let elapsed = Local::now().signed_duration_since(self.accesstime);
        info!(
            self.inner,
            "LOG End with ACCESSID=[{}] ACCESSTIME=[{}] PROCESSTIME=[{:.3}]",
            self.accessid,
            self.accesstime.to_rfc3339(),
            elapsed.num_milliseconds() as f64 * 1e-3
        );
        // replacing the root logger joins the async worker
        self.inner = Logger::root(Discard, o!());
        if let Some(ref path) = self.filepath {
            let separated = fs::OpenOptions::new()
                .append(true)
                .open(path)
                .and_then(|mut file| writeln!(file));
            if let Err(e) = separated {
                eprintln!("failed to terminate {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for AppLogger {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile;

    use super::AppLogger;
    use logging::{Config, Level};

    #[test]
    fn logs_start_and_end_of_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            logdir: dir.path().to_string_lossy().into_owned(),
            filename: "run.log".to_string(),
            filemode: 'w',
            verbosity: Level::Off,
            ..Config::default()
        };
        let logger = AppLogger::new(config).unwrap();
        let accessid = logger.accessid().to_string();
        assert_eq!(accessid.len(), 8);
        let path = logger.filepath().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("run.log"));
        info!(logger.create(), "training");
        drop(logger);

        let log = fs::read_to_string(&path).unwrap();
        assert!(log.contains(&format!("LOG Start with ACCESSID=[{}]", accessid)));
        assert!(log.contains("training"));
        assert!(log.contains(&format!("LOG End with ACCESSID=[{}]", accessid)));
        assert!(log.ends_with('\n'));
    }

    #[test]
    fn writes_no_file_when_disabled() {
        let config = Config {
            level: Level::Off,
            verbosity: Level::Off,
            ..Config::default()
        };
        let logger = AppLogger::new(config).unwrap();
        assert!(logger.filepath().is_none());
    }
}
