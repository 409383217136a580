use std::path::PathBuf;

use structopt::StructOpt;

use app::Config;
use logging::Level;

/// Defines `fn main` parsing `$sopt` from the command line and running `$body` inside an
/// `App` configured from the `CommonArgs` field of the arguments (`common` by default).
#[macro_export]
macro_rules! main {
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:block; default) => {
        fn main() {
            let $args = <$sopt as $crate::app::prelude::StructOpt>::from_args();
            $crate::app::App::from_config($crate::app::Config::default())
                .main(move |$ctx: $crate::app::Context| $body)
                .run();
        }
    };
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:block; @$field:ident) => {
        fn main() {
            let $args = <$sopt as $crate::app::prelude::StructOpt>::from_args();
            $crate::app::App::from_config($args.$field.clone())
                .main(move |$ctx: $crate::app::Context| $body)
                .run();
        }
    };
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:block) => {
        main!(|$args: $sopt, $ctx: Context| $body; @common);
    };
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:expr) => {
        main!(|$args: $sopt, $ctx: Context| { $body });
    };
}

#[derive(StructOpt, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Activate debug mode
    #[structopt(short = "d", long = "debug")]
    pub debug: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u8,

    /// Only log warnings and errors to the terminal
    #[structopt(short = "q", long = "quiet")]
    pub quiet: bool,

    /// Directory to write log files to
    #[structopt(long = "logdir", parse(from_os_str))]
    pub logdir: Option<PathBuf>,
}

impl From<CommonArgs> for Config {
    fn from(c: CommonArgs) -> Config {
        let mut config = Config::default();
        config.exit_on_finish = true;
        // stdout carries the parser output
        config.logging.use_stderr = true;
        config.logging.verbosity = if c.quiet {
            Level::Warning
        } else if c.debug || c.verbose >= 2 {
            Level::Trace
        } else if c.verbose == 1 {
            Level::Debug
        } else {
            Level::Info
        };
        match c.logdir {
            Some(dir) => {
                config.logging.logdir = dir.to_string_lossy().into_owned();
                config.logging.mkdir = true;
                config.logging.level = if c.debug { Level::Trace } else { Level::Debug };
            }
            None => config.logging.level = Level::Off,
        }
        config
    }
}
