use std::error;
use std::fmt;

use regex::Regex;
use slog::Logger;

use lang::{Phrasal, Tokenized};
use syntax::Attachment;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    ZeroDivision,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ZeroDivision => write!(f, "no tokens have been evaluated"),
        }
    }
}

impl error::Error for Error {}

static PUNCT_PATTERN: &'static str = r"^[^\s\d\w]+$";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Counts {
    unlabeled_match: usize,
    labeled_match: usize,
    total: usize,
}

fn count<G, P>(gold: &G, predicted: &P, punct: Option<&Regex>) -> Counts
where
    G: Phrasal,
    P: Attachment + ?Sized,
{
    let mut counts = Counts::default();
    for (i, token) in gold.iter().enumerate().skip(1) {
        if punct.map_or(false, |re| re.is_match(token.form())) {
            continue;
        }
        counts.total += 1;
        if predicted.head_of(i) == token.head() {
            counts.unlabeled_match += 1;
            if predicted.label_of(i) == token.deprel() {
                counts.labeled_match += 1;
            }
        }
    }
    counts
}

/// Returns the unlabeled and labeled attachment scores of `predicted` against `gold`.
///
/// Both are fractions over the non-root tokens; a sentence with only the root scores 0.
pub fn evaluate<G, P>(gold: &G, predicted: &P) -> (f64, f64)
where
    G: Phrasal,
    P: Attachment + ?Sized,
{
    let counts = count(gold, predicted, None);
    if counts.total == 0 {
        return (0.0, 0.0);
    }
    (
        counts.unlabeled_match as f64 / counts.total as f64,
        counts.labeled_match as f64 / counts.total as f64,
    )
}

/// Accumulates attachment scores over a corpus.
///
/// Micro scores weight every token equally, macro scores every sentence with at least one
/// counted token.
#[derive(Debug, Clone)]
pub struct Evaluator {
    unlabeled_match: usize,
    labeled_match: usize,
    count: usize,
    num_sentences: usize,
    num_scored: usize,
    num_failures: usize,
    uas_sum: f64,
    las_sum: f64,
    punct: Option<Regex>,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            unlabeled_match: 0,
            labeled_match: 0,
            count: 0,
            num_sentences: 0,
            num_scored: 0,
            num_failures: 0,
            uas_sum: 0.0,
            las_sum: 0.0,
            punct: None,
        }
    }

    /// Excludes tokens made of punctuation only.
    pub fn ignore_punct(mut self) -> Self {
        self.punct = Regex::new(PUNCT_PATTERN).ok();
        self
    }

    pub fn reset(&mut self) {
        self.unlabeled_match = 0;
        self.labeled_match = 0;
        self.count = 0;
        self.num_sentences = 0;
        self.num_scored = 0;
        self.num_failures = 0;
        self.uas_sum = 0.0;
        self.las_sum = 0.0;
    }

    pub fn is_punct(&self, word: &str) -> bool {
        self.punct.as_ref().map_or(false, |re| re.is_match(word))
    }

    /// Adds one sentence and returns its own `(UAS, LAS)`.
    pub fn evaluate<G, P>(&mut self, gold: &G, predicted: &P) -> (f64, f64)
    where
        G: Phrasal,
        P: Attachment + ?Sized,
    {
        let counts = count(gold, predicted, self.punct.as_ref());
        self.num_sentences += 1;
        self.unlabeled_match += counts.unlabeled_match;
        self.labeled_match += counts.labeled_match;
        self.count += counts.total;
        if counts.total == 0 {
            return (0.0, 0.0);
        }
        let scores = (
            counts.unlabeled_match as f64 / counts.total as f64,
            counts.labeled_match as f64 / counts.total as f64,
        );
        self.num_scored += 1;
        self.uas_sum += scores.0;
        self.las_sum += scores.1;
        scores
    }

    /// Records a sentence that could not be parsed; it takes no part in the scores.
    pub fn fail(&mut self) {
        self.num_failures += 1;
    }

    pub fn num_sentences(&self) -> usize {
        self.num_sentences
    }

    pub fn num_failures(&self) -> usize {
        self.num_failures
    }

    pub fn num_tokens(&self) -> usize {
        self.count
    }

    pub fn uas(&self) -> Result<f64, Error> {
        if self.count == 0 {
            return Err(Error::ZeroDivision);
        }
        Ok(self.unlabeled_match as f64 / self.count as f64)
    }

    pub fn las(&self) -> Result<f64, Error> {
        if self.count == 0 {
            return Err(Error::ZeroDivision);
        }
        Ok(self.labeled_match as f64 / self.count as f64)
    }

    pub fn macro_uas(&self) -> Result<f64, Error> {
        if self.num_scored == 0 {
            return Err(Error::ZeroDivision);
        }
        Ok(self.uas_sum / self.num_scored as f64)
    }

    pub fn macro_las(&self) -> Result<f64, Error> {
        if self.num_scored == 0 {
            return Err(Error::ZeroDivision);
        }
        Ok(self.las_sum / self.num_scored as f64)
    }

    pub fn report(&self, logger: &Logger) {
        match (self.uas(), self.las(), self.macro_uas(), self.macro_las()) {
            (Ok(uas), Ok(las), Ok(macro_uas), Ok(macro_las)) => info!(
                logger,
                "#samples: {}, #failures: {}, UAS: {:.6}, LAS: {:.6}, macro UAS: {:.6}, macro LAS: {:.6}",
                self.num_sentences,
                self.num_failures,
                uas * 100.0,
                las * 100.0,
                macro_uas * 100.0,
                macro_las * 100.0
            ),
            _ => info!(
                logger,
                "#samples: {}, #failures: {}, UAS: NaN, LAS: NaN",
                self.num_sentences,
                self.num_failures
            ),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}
