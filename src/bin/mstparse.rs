#[macro_use]
extern crate mstparser;
#[macro_use]
extern crate slog;
extern crate structopt;

use std::error::Error;
use std::io as std_io;
use std::path::PathBuf;
use std::str::FromStr;

use mstparser::app::prelude::*;
use mstparser::dataset::conll::{Corpus, Writer};
use mstparser::io::serialize::{self, Format, Serializer};
use mstparser::io::Write as WriteItems;
use mstparser::scoring::{FeatureScorer, Kind, Model, Weights};
use mstparser::training::{self, Trainer};
use slog::Logger;

type CmdResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

fn train(c: &Train, logger: &Logger) -> CmdResult<()> {
    let train = Corpus::open(&c.input)?.load()?;
    let dev = match c.dev_file {
        Some(ref path) => Some(Corpus::open(path)?.load()?),
        None => None,
    };
    info!(
        logger,
        "train: {} sentences, dev: {} sentences",
        train.len(),
        dev.as_ref().map_or(0, |d| d.len())
    );
    let model = match (c.scorer, c.weights.as_ref()) {
        (Kind::Feature, Some(path)) => {
            let weights: Weights = serialize::read_from(path, Format::Json)?;
            info!(logger, "weights: {:?}", weights);
            Model::from(FeatureScorer::with_weights(weights))
        }
        (kind, _) => Model::new(kind),
    };
    let mut trainer = Trainer::new(model);
    trainer.set_logger(logger.clone());
    trainer.show_progress(c.progress);
    trainer.ignore_punct(c.ignore_punct);
    if let Some(report) = trainer.fit(&train, dev.as_ref().map(|d| d.as_slice()))? {
        info!(logger, "dev: {:?}", report);
    }
    if let Some(ref path) = c.save_to {
        trainer.scorer().save(path)?;
        info!(logger, "saved the model to {}", path.display());
    }
    Ok(())
}

fn test(c: &Test, logger: &Logger) -> CmdResult<()> {
    let model = Model::load(&c.model)?;
    info!(logger, "loaded a {} model from {}", model.kind(), c.model.display());
    let sentences = Corpus::open(&c.input)?.load()?;
    let report = training::evaluate_corpus(&model, &sentences, c.ignore_punct, c.progress, logger);
    if let Some(ref path) = c.output {
        serialize::write_to(&report, path, Format::JsonPretty)?;
        info!(logger, "wrote the report to {}", path.display());
    }
    Ok(())
}

fn parse(c: &Parse, logger: &Logger) -> CmdResult<()> {
    let model = Model::load(&c.model)?;
    let corpus = Corpus::open(&c.input)?;
    let stdout = std_io::stdout();
    let out = std_io::BufWriter::new(stdout.lock());
    let sentences = corpus.sentences()?;
    let (parsed, failed) = match c.format {
        OutputFormat::Conllu => {
            let mut writer = Writer::new(out);
            let counts = training::parse_corpus(&model, sentences, logger, |sentence, tree| {
                writer.write_sentence(&tree.apply(sentence))
            })?;
            writer.flush()?;
            counts
        }
        OutputFormat::Json => {
            let mut serializer = Serializer::new(out, Format::Json);
            let counts = training::parse_corpus(&model, sentences, logger, |_, tree| {
                serializer.write(&[tree.clone()]).map(|_| ())
            })?;
            WriteItems::flush(&mut serializer)?;
            counts
        }
    };
    info!(logger, "parsed {} sentences ({} failures)", parsed, failed);
    Ok(())
}

fn compare(c: &Compare, logger: &Logger) -> CmdResult<()> {
    let train = Corpus::open(&c.train_file)?.load()?;
    let test = Corpus::open(&c.test_file)?.load()?;
    let comparison = training::compare(&train, &test, c.progress, logger)?;
    match comparison.improvement() {
        Some((uas, las)) => info!(
            logger,
            "improvement over the baseline: macro UAS {:+.6}, macro LAS {:+.6}",
            uas * 100.0,
            las * 100.0
        ),
        None => warn!(logger, "no sentence of the test file could be scored"),
    }
    if let Some(ref path) = c.output {
        serialize::write_to(&comparison, path, Format::JsonPretty)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Conllu,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conllu" => Ok(OutputFormat::Conllu),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format `{}`", s)),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "mstparse",
    about = "Non-projective dependency parsing with maximum spanning trees",
    global_settings = &[AppSettings::ColoredHelp]
)]
struct Args {
    #[structopt(flatten)]
    common: CommonArgs,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    #[structopt(name = "train", about = "Trains a scorer")]
    Train(Train),
    #[structopt(name = "test", about = "Evaluates a scorer on a treebank")]
    Test(Test),
    #[structopt(name = "parse", about = "Parses a CoNLL-U file")]
    Parse(Parse),
    #[structopt(name = "compare", about = "Compares the feature scorer with the baseline")]
    Compare(Compare),
}

#[derive(StructOpt, Debug)]
struct Train {
    /// A training data file
    #[structopt(name = "INPUT", parse(from_os_str))]
    input: PathBuf,
    /// A development data file
    #[structopt(name = "DEV", parse(from_os_str))]
    dev_file: Option<PathBuf>,
    /// Scorer (baseline or feature)
    #[structopt(long = "scorer", default_value = "feature")]
    scorer: Kind,
    /// A JSON file of feature weights
    #[structopt(long = "weights", parse(from_os_str))]
    weights: Option<PathBuf>,
    /// A file to save the model to
    #[structopt(long = "save", parse(from_os_str))]
    save_to: Option<PathBuf>,
    /// Exclude punctuation from the scores
    #[structopt(long = "ignore-punct")]
    ignore_punct: bool,
    /// Show a progress bar
    #[structopt(long = "progress")]
    progress: bool,
}

#[derive(StructOpt, Debug)]
struct Test {
    /// A model file
    #[structopt(name = "MODEL", parse(from_os_str))]
    model: PathBuf,
    /// A testing data file
    #[structopt(name = "INPUT", parse(from_os_str))]
    input: PathBuf,
    /// A file to write the JSON report to
    #[structopt(long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Exclude punctuation from the scores
    #[structopt(long = "ignore-punct")]
    ignore_punct: bool,
    /// Show a progress bar
    #[structopt(long = "progress")]
    progress: bool,
}

#[derive(StructOpt, Debug)]
struct Parse {
    /// A model file
    #[structopt(name = "MODEL", parse(from_os_str))]
    model: PathBuf,
    /// A CoNLL-U file to parse
    #[structopt(name = "INPUT", parse(from_os_str))]
    input: PathBuf,
    /// Output format (conllu or json)
    #[structopt(long = "format", default_value = "conllu")]
    format: OutputFormat,
}

#[derive(StructOpt, Debug)]
struct Compare {
    /// A training data file
    #[structopt(name = "TRAIN", parse(from_os_str))]
    train_file: PathBuf,
    /// A testing data file
    #[structopt(name = "TEST", parse(from_os_str))]
    test_file: PathBuf,
    /// A file to write the JSON comparison to
    #[structopt(long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Show a progress bar
    #[structopt(long = "progress")]
    progress: bool,
}

main!(|args: Args, context: Context| match args.command {
    Command::Train(ref c) => {
        info!(&context.logger, "execute subcommand: {:?}", c);
        train(c, &context.logger)
    }
    Command::Test(ref c) => {
        info!(&context.logger, "execute subcommand: {:?}", c);
        test(c, &context.logger)
    }
    Command::Parse(ref c) => {
        info!(&context.logger, "execute subcommand: {:?}", c);
        parse(c, &context.logger)
    }
    Command::Compare(ref c) => {
        info!(&context.logger, "execute subcommand: {:?}", c);
        compare(c, &context.logger)
    }
});
