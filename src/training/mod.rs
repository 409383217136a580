use std::io as std_io;

use pbr::ProgressBar;
use rayon::prelude::*;
use slog::{Discard, Logger};

use dataset::conll::Token;
use lang::{Phrasal, Sentence};
use scoring::{Error, Kind, Model, Scorer};
use syntax::{Evaluator, Tree};

const CHUNK_SIZE: usize = 64;

/// Corpus-level attachment scores; `None` where no token was counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub num_sentences: usize,
    pub num_failures: usize,
    pub num_tokens: usize,
    pub uas: Option<f64>,
    pub las: Option<f64>,
    pub macro_uas: Option<f64>,
    pub macro_las: Option<f64>,
}

impl<'a> From<&'a Evaluator> for Report {
    fn from(evaluator: &'a Evaluator) -> Self {
        Report {
            num_sentences: evaluator.num_sentences(),
            num_failures: evaluator.num_failures(),
            num_tokens: evaluator.num_tokens(),
            uas: evaluator.uas().ok(),
            las: evaluator.las().ok(),
            macro_uas: evaluator.macro_uas().ok(),
            macro_las: evaluator.macro_las().ok(),
        }
    }
}

/// Parses `sentences` with `scorer` and scores the result against their gold trees.
///
/// Sentences are parsed in parallel chunks. A sentence that fails to parse is logged and
/// counted as a failure.
pub fn evaluate_corpus<S: Scorer + ?Sized>(
    scorer: &S,
    sentences: &[Sentence<Token>],
    ignore_punct: bool,
    show_progress: bool,
    logger: &Logger,
) -> Report {
    let mut evaluator = Evaluator::new();
    if ignore_punct {
        evaluator = evaluator.ignore_punct();
    }
    let mut pbar = if show_progress {
        Some(ProgressBar::on(std_io::stderr(), sentences.len() as u64))
    } else {
        None
    };
    for (c, chunk) in sentences.chunks(CHUNK_SIZE).enumerate() {
        let trees: Vec<Result<Tree, Error>> = chunk.par_iter().map(|s| scorer.parse(s)).collect();
        for (i, (sentence, tree)) in chunk.iter().zip(trees).enumerate() {
            match tree {
                Ok(tree) => {
                    evaluator.evaluate(sentence, &tree);
                }
                Err(e) => {
                    warn!(logger, "failed to parse sentence {}: {}", c * CHUNK_SIZE + i, e);
                    evaluator.fail();
                }
            }
        }
        if let Some(ref mut pbar) = pbar {
            pbar.add(chunk.len() as u64);
        }
    }
    if let Some(ref mut pbar) = pbar {
        pbar.finish();
    }
    evaluator.report(logger);
    Report::from(&evaluator)
}

/// Parses `sentences` one by one and hands every sentence with its tree to `emit`.
///
/// A sentence that fails to parse is logged and passed on with an unattached tree, so the
/// output stays aligned with the input. Reading and `emit` errors stop the run. Returns the
/// numbers of parsed and failed sentences.
pub fn parse_corpus<'a, S, I, F>(
    scorer: &S,
    sentences: I,
    logger: &Logger,
    mut emit: F,
) -> std_io::Result<(usize, usize)>
where
    S: Scorer + ?Sized,
    I: IntoIterator<Item = std_io::Result<Sentence<Token<'a>>>>,
    F: FnMut(&Sentence<Token<'a>>, &Tree) -> std_io::Result<()>,
{
    let (mut parsed, mut failed) = (0, 0);
    for (i, sentence) in sentences.into_iter().enumerate() {
        let sentence = sentence?;
        let tree = match scorer.parse(&sentence) {
            Ok(tree) => {
                parsed += 1;
                tree
            }
            Err(e) => {
                warn!(logger, "failed to parse sentence {}: {}", i, e);
                failed += 1;
                Tree::new(sentence.len())
            }
        };
        emit(&sentence, &tree)?;
    }
    Ok((parsed, failed))
}

#[derive(Debug)]
pub struct Trainer<S> {
    scorer: S,
    logger: Option<Logger>,
    show_progress: bool,
    ignore_punct: bool,
}

impl<S: Scorer> Trainer<S> {
    pub fn new(scorer: S) -> Self {
        Trainer {
            scorer: scorer,
            logger: None,
            show_progress: false,
            ignore_punct: false,
        }
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }

    pub fn show_progress(&mut self, show: bool) {
        self.show_progress = show;
    }

    pub fn ignore_punct(&mut self, ignore: bool) {
        self.ignore_punct = ignore;
    }

    fn logger(&self) -> Logger {
        match self.logger {
            Some(ref logger) => logger.clone(),
            None => Logger::root(Discard, o!()),
        }
    }

    /// Trains the scorer and reports on `dev` when given.
    pub fn fit(
        &mut self,
        train: &[Sentence<Token>],
        dev: Option<&[Sentence<Token>]>,
    ) -> Result<Option<Report>, Error> {
        let logger = self.logger();
        info!(logger, "training on {} sentences", train.len());
        self.scorer.train(train, dev)?;
        info!(logger, "{} labels", self.scorer.labels()?.len());
        Ok(dev.map(|dev| {
            info!(logger, "evaluating on {} sentences", dev.len());
            self.evaluate(dev)
        }))
    }

    pub fn evaluate(&self, sentences: &[Sentence<Token>]) -> Report {
        evaluate_corpus(
            &self.scorer,
            sentences,
            self.ignore_punct,
            self.show_progress,
            &self.logger(),
        )
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn into_scorer(self) -> S {
        self.scorer
    }
}

/// Scores of both scorers trained and evaluated on the same split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline: Report,
    pub feature: Report,
}

impl Comparison {
    /// Macro `(UAS, LAS)` of the feature scorer minus those of the baseline.
    pub fn improvement(&self) -> Option<(f64, f64)> {
        match (
            self.baseline.macro_uas,
            self.baseline.macro_las,
            self.feature.macro_uas,
            self.feature.macro_las,
        ) {
            (Some(buas), Some(blas), Some(fuas), Some(flas)) => Some((fuas - buas, flas - blas)),
            _ => None,
        }
    }
}

pub fn compare(
    train: &[Sentence<Token>],
    test: &[Sentence<Token>],
    show_progress: bool,
    logger: &Logger,
) -> Result<Comparison, Error> {
    let run = |kind: Kind| -> Result<Report, Error> {
        let mut trainer = Trainer::new(Model::new(kind));
        trainer.set_logger(logger.new(o!("scorer" => kind.to_string())));
        trainer.show_progress(show_progress);
        trainer.fit(train, None)?;
        Ok(trainer.evaluate(test))
    };
    Ok(Comparison {
        baseline: run(Kind::Baseline)?,
        feature: run(Kind::Feature)?,
    })
}
