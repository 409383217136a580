//! Arc scorers estimated from treebank counts.

use std::error;
use std::fmt;
use std::io as std_io;
use std::path::Path;
use std::str::FromStr;

use dataset::conll::Token;
use io::serialize::{self, Format};
use lang::{Phrasal, Sentence};
use syntax::{mst_parse, Tree};

pub use self::baseline::BaselineScorer;
pub use self::counter::*;
pub use self::feature::{FeatureScorer, Weights};

mod baseline;
mod counter;
mod feature;

#[derive(Debug)]
pub enum Error {
    Untrained,
    IndexOutOfRange { index: usize, len: usize },
    Io(std_io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Untrained => write!(f, "the model is not trained"),
            Error::IndexOutOfRange { index, len } => write!(
                f,
                "token index {} is out of range for a sentence of {} tokens",
                index,
                len
            ),
            Error::Io(ref e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<std_io::Error> for Error {
    fn from(e: std_io::Error) -> Self {
        Error::Io(e)
    }
}

/// Scores candidate arcs `head -> child` with a label.
///
/// `train` must succeed before any call of `score`, `labels` or `parse`.
pub trait Scorer: Send + Sync {
    /// Discards previous statistics and collects new ones from `train`.
    fn train(
        &mut self,
        train: &[Sentence<Token>],
        dev: Option<&[Sentence<Token>]>,
    ) -> Result<(), Error>;

    /// Higher is more probable.
    fn score(
        &self,
        sentence: &Sentence<Token>,
        head: usize,
        child: usize,
        label: &str,
    ) -> Result<f64, Error>;

    /// Labels seen in training, in order of first occurrence.
    fn labels(&self) -> Result<Vec<&str>, Error>;

    fn is_trained(&self) -> bool;

    fn parse(&self, sentence: &Sentence<Token>) -> Result<Tree, Error> {
        let labels = self.labels()?;
        mst_parse(sentence, &labels, |s, head, child, label| {
            self.score(s, head, child, label)
        })
    }
}

static ABSENT_FIELD: &'static str = "_";

#[inline]
fn field_or_absent(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT_FIELD)
}

fn token_at<'s, 'a>(sentence: &'s Sentence<Token<'a>>, index: usize) -> Result<&'s Token<'a>, Error> {
    sentence.token(index).ok_or(Error::IndexOutOfRange {
        index: index,
        len: sentence.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Baseline,
    Feature,
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseline" => Ok(Kind::Baseline),
            "feature" => Ok(Kind::Feature),
            _ => Err(format!("unknown scorer `{}`", s)),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Kind::Baseline => write!(f, "baseline"),
            Kind::Feature => write!(f, "feature"),
        }
    }
}

/// A scorer of either kind that can be stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Model {
    Baseline(BaselineScorer),
    Feature(FeatureScorer),
}

impl Model {
    pub fn new(kind: Kind) -> Self {
        match kind {
            Kind::Baseline => Model::Baseline(BaselineScorer::new()),
            Kind::Feature => Model::Feature(FeatureScorer::new()),
        }
    }

    pub fn kind(&self) -> Kind {
        match *self {
            Model::Baseline(_) => Kind::Baseline,
            Model::Feature(_) => Kind::Feature,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        serialize::write_to(self, path, Format::Json).map_err(Error::from)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        serialize::read_from(path, Format::Json).map_err(Error::from)
    }

    fn scorer(&self) -> &dyn Scorer {
        match *self {
            Model::Baseline(ref s) => s,
            Model::Feature(ref s) => s,
        }
    }

    fn scorer_mut(&mut self) -> &mut dyn Scorer {
        match *self {
            Model::Baseline(ref mut s) => s,
            Model::Feature(ref mut s) => s,
        }
    }
}

impl From<BaselineScorer> for Model {
    fn from(scorer: BaselineScorer) -> Self {
        Model::Baseline(scorer)
    }
}

impl From<FeatureScorer> for Model {
    fn from(scorer: FeatureScorer) -> Self {
        Model::Feature(scorer)
    }
}

impl Scorer for Model {
    fn train(
        &mut self,
        train: &[Sentence<Token>],
        dev: Option<&[Sentence<Token>]>,
    ) -> Result<(), Error> {
        self.scorer_mut().train(train, dev)
    }

    fn score(
        &self,
        sentence: &Sentence<Token>,
        head: usize,
        child: usize,
        label: &str,
    ) -> Result<f64, Error> {
        self.scorer().score(sentence, head, child, label)
    }

    fn labels(&self) -> Result<Vec<&str>, Error> {
        self.scorer().labels()
    }

    fn is_trained(&self) -> bool {
        self.scorer().is_trained()
    }
}
