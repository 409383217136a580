//! CoNLL-U corpora: one token per line, ten tab-separated columns, a blank line between
//! sentences.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io as std_io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use dataset::Dataset;
use io as mod_io;
use io::Read;
use lang::{Phrasal, Sentence, Tokenized};

pub trait ConllTokenized: Tokenized + mod_io::FromLine {
    fn xpostag(&self) -> Option<&str>;
    fn feats(&self) -> Option<Vec<&str>>;
    fn deps(&self) -> Option<&str>;
    fn misc(&self) -> Option<&str>;
    fn root() -> Self;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    id: usize,
    form: Cow<'a, str>,
    lemma: Option<Cow<'a, str>>,
    postag: Option<Cow<'a, str>>,
    xpostag: Option<Cow<'a, str>>,
    feats: Option<Cow<'a, str>>,
    head: Option<usize>,
    deprel: Option<Cow<'a, str>>,
    deps: Option<Cow<'a, str>>,
    misc: Option<Cow<'a, str>>,
}

impl<'a> Token<'a> {
    pub fn new<S: Into<Cow<'a, str>>>(
        id: usize,
        form: S,
        lemma: Option<S>,
        postag: Option<S>,
        xpostag: Option<S>,
        feats: Option<S>,
        head: Option<usize>,
        deprel: Option<S>,
        deps: Option<S>,
        misc: Option<S>,
    ) -> Self {
        Token {
            id: id,
            form: form.into(),
            lemma: lemma.map(|s| s.into()),
            postag: postag.map(|s| s.into()),
            xpostag: xpostag.map(|s| s.into()),
            feats: feats.map(|s| s.into()).filter(|s: &Cow<str>| !s.is_empty()),
            head: head,
            deprel: deprel.map(|s| s.into()),
            deps: deps.map(|s| s.into()),
            misc: misc.map(|s| s.into()),
        }
    }

    /// Replaces the attachment of the token, e.g. with a predicted one.
    pub fn attach<S: Into<Cow<'a, str>>>(&mut self, head: Option<usize>, deprel: Option<S>) {
        self.head = head;
        self.deprel = deprel.map(|s| s.into());
    }

    /// Raw `FEATS` column, `None` when the column is `_`.
    pub fn feats_str(&self) -> Option<&str> {
        self.feats.as_ref().map(|x| x.deref())
    }

    pub fn to_line(&self) -> String {
        fn field(value: Option<&str>) -> &str {
            value.unwrap_or(CONLL_EMPTY_FIELD)
        }
        let head = self.head.map(|h| h.to_string());
        [
            self.id.to_string().as_str(),
            &*self.form,
            field(self.lemma()),
            field(self.postag()),
            field(self.xpostag()),
            field(self.feats_str()),
            field(head.as_ref().map(|h| h.as_str())),
            field(self.deprel()),
            field(self.deps()),
            field(self.misc()),
        ].join(CONLL_FIELD_DELIMITER)
    }
}

impl<'a> Tokenized for Token<'a> {
    fn id(&self) -> usize {
        self.id
    }

    fn form(&self) -> &str {
        &self.form
    }

    fn lemma(&self) -> Option<&str> {
        self.lemma.as_ref().map(|x| x.deref())
    }

    fn postag(&self) -> Option<&str> {
        self.postag.as_ref().map(|x| x.deref())
    }

    fn head(&self) -> Option<usize> {
        self.head
    }

    fn deprel(&self) -> Option<&str> {
        self.deprel.as_ref().map(|x| x.deref())
    }
}

impl<'a> ConllTokenized for Token<'a> {
    fn xpostag(&self) -> Option<&str> {
        self.xpostag.as_ref().map(|x| x.deref())
    }

    fn feats(&self) -> Option<Vec<&str>> {
        self.feats.as_ref().map(|x| {
            x.split(CONLL_FEATS_DELIMITER)
                .filter(|feat| !feat.is_empty())
                .collect::<Vec<&str>>()
        })
    }

    fn deps(&self) -> Option<&str> {
        self.deps.as_ref().map(|x| x.deref())
    }

    fn misc(&self) -> Option<&str> {
        self.misc.as_ref().map(|x| x.deref())
    }

    fn root() -> Self {
        Self::new(
            0,
            ROOT_FORM,
            Some(ROOT_FORM),
            Some(ROOT_POSTAG),
            Some(ROOT_POSTAG),
            None,
            None,
            None,
            None,
            None,
        )
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "id: {}, form: {}", self.id, self.form)
    }
}

pub static ROOT_FORM: &'static str = "<ROOT>";
pub static ROOT_POSTAG: &'static str = "ROOT";

static CONLL_FIELD_DELIMITER: &'static str = "\t";
static CONLL_FEATS_DELIMITER: &'static str = "|";
static CONLL_EMPTY_FIELD: &'static str = "_";
const CONLL_NUM_FIELDS: usize = 10;

#[inline]
fn parse_conll_required_usize_field(field: &str) -> Result<usize, std_io::Error> {
    field.parse::<usize>().map_err(|e| {
        std_io::Error::new(std_io::ErrorKind::InvalidData, e)
    })
}

#[inline]
fn parse_conll_optional_usize_field(field: &str) -> Result<Option<usize>, std_io::Error> {
    if field == CONLL_EMPTY_FIELD {
        Ok(None)
    } else {
        parse_conll_required_usize_field(field).map(Some)
    }
}

#[inline]
fn parse_conll_optional_str_field(field: &str) -> Option<String> {
    if field == CONLL_EMPTY_FIELD {
        None
    } else {
        Some(field.to_string())
    }
}

fn require<T>(option: Option<T>) -> Result<T, std_io::Error> {
    match option {
        Some(val) => Ok(val),
        None => Err(std_io::Error::new(
            std_io::ErrorKind::InvalidData,
            format!("a token line must have {} fields", CONLL_NUM_FIELDS),
        )),
    }
}

/// Multiword token ranges (`1-2`) and empty nodes (`1.1`) are not part of the tree.
#[inline]
fn is_syntactic_word(line: &str) -> bool {
    let id = line.split(CONLL_FIELD_DELIMITER).next().unwrap_or("");
    !id.contains(|c: char| c == '-' || c == '.')
}

impl<'a> mod_io::FromLine for Token<'a> {
    type Err = std_io::Error;

    fn from_line(line: &str) -> Result<Token<'a>, Self::Err> {
        let mut cols = line.split(CONLL_FIELD_DELIMITER);
        let id = require(cols.next()).and_then(parse_conll_required_usize_field)?;
        let form = require(cols.next())?.to_string();
        let lemma = require(cols.next()).map(parse_conll_optional_str_field)?;
        let postag = require(cols.next()).map(parse_conll_optional_str_field)?;
        let xpostag = require(cols.next()).map(parse_conll_optional_str_field)?;
        let feats = require(cols.next()).map(parse_conll_optional_str_field)?;
        let head = require(cols.next()).and_then(parse_conll_optional_usize_field)?;
        let deprel = require(cols.next()).map(parse_conll_optional_str_field)?;
        let deps = require(cols.next()).map(parse_conll_optional_str_field)?;
        let misc = require(cols.next()).map(parse_conll_optional_str_field)?;
        if cols.next().is_some() {
            return Err(std_io::Error::new(
                std_io::ErrorKind::InvalidData,
                format!("a token line has more than {} fields", CONLL_NUM_FIELDS),
            ));
        }
        Ok(Token::new(
            id,
            form,
            lemma,
            postag,
            xpostag,
            feats,
            head,
            deprel,
            deps,
            misc,
        ))
    }
}

/// Reads at most `num` sentences, each prefixed with the synthetic root token.
pub fn read_upto<R, S, T>(reader: &mut R, num: usize, buf: &mut Vec<S>) -> std_io::Result<usize>
where
    R: std_io::BufRead,
    S: Phrasal<Token = T>,
    T: ConllTokenized,
{
    let mut count = 0;
    let mut line = String::new();
    let mut tokens = vec![T::root()];
    while count < num {
        match reader.read_line(&mut line) {
            Ok(0) => {
                if tokens.len() > 1 {
                    buf.push(S::from_tokens(tokens));
                    count += 1;
                }
                break;
            }
            Ok(_) => {
                let line_trimmed = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
                if line_trimmed.trim().is_empty() {
                    if tokens.len() > 1 {
                        buf.push(S::from_tokens(tokens));
                        count += 1;
                    }
                    tokens = vec![T::root()];
                } else if line_trimmed.starts_with('#') || !is_syntactic_word(line_trimmed) {
                    // pass
                } else {
                    tokens.push(T::from_line(line_trimmed).map_err(|e| {
                        std_io::Error::new(std_io::ErrorKind::InvalidData, e)
                    })?);
                }
            }
            Err(ref e) if e.kind() == std_io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
        line.clear();
    }
    Ok(count)
}

pub type Reader<'a, R> = mod_io::Reader<R, Sentence<Token<'a>>>;

impl<'a, R: std_io::BufRead> mod_io::Read for Reader<'a, R> {
    type Item = Sentence<Token<'a>>;

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> std_io::Result<usize> {
        read_upto(self.inner_mut(), num, buf)
    }
}

/// Lazily yields one sentence at a time; stops after the first error.
pub struct Sentences<'a, R> {
    reader: Reader<'a, R>,
    buf: Vec<Sentence<Token<'a>>>,
    done: bool,
}

impl<'a, R: std_io::BufRead> Sentences<'a, R> {
    pub fn new(inner: R) -> Self {
        Sentences {
            reader: Reader::new(inner),
            buf: Vec::with_capacity(1),
            done: false,
        }
    }
}

impl<'a, R: std_io::BufRead> Iterator for Sentences<'a, R> {
    type Item = std_io::Result<Sentence<Token<'a>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_upto(1, &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => self.buf.pop().map(Ok),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// A corpus file; every call to `sentences` starts over from the beginning.
#[derive(Debug, Clone)]
pub struct Corpus {
    path: PathBuf,
}

impl Corpus {
    pub fn open<P: AsRef<Path>>(path: P) -> std_io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(std_io::Error::new(
                std_io::ErrorKind::NotFound,
                format!("file `{}` is not found", path.display()),
            ));
        }
        Ok(Corpus { path: path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sentences(&self) -> std_io::Result<Sentences<'static, std_io::BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(Sentences::new(std_io::BufReader::new(file)))
    }

    pub fn load(&self) -> std_io::Result<Dataset<Sentence<Token<'static>>>> {
        self.sentences()?.collect()
    }
}

pub struct Writer<W> {
    inner: W,
}

impl<W: std_io::Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Writer { inner: inner }
    }

    pub fn write_sentence(&mut self, sentence: &Sentence<Token>) -> std_io::Result<()> {
        for token in sentence.words() {
            writeln!(self.inner, "{}", token.to_line())?;
        }
        writeln!(self.inner)
    }

    pub fn flush(&mut self) -> std_io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
