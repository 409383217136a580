use std::env;
use std::error::Error;
use std::fmt;
use std::process;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use slog::Logger;

use logging::{AppLogger, Config as LogConfig};

pub use self::main::CommonArgs;

#[macro_use]
mod main;
pub mod prelude;

#[derive(Debug)]
struct AppError {
    code: i32,
    error: Box<dyn Error + Send + Sync>,
}

impl AppError {
    pub fn new<E>(code: i32, error: E) -> AppError
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        AppError {
            code: code,
            error: error.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (code: {})", self.error, self.code)
    }
}

/// What the main function of an application receives.
#[derive(Debug)]
pub struct Context {
    pub logger: Logger,
    pub accessid: String,
    pub accesstime: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub exit_on_finish: bool,
    pub logging: LogConfig,
}

pub static TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.3f";

impl Default for Config {
    fn default() -> Self {
        let mut log_config = LogConfig::default();
        log_config.time_format = Some(TIME_FORMAT.to_string());
        Config {
            exit_on_finish: false,
            logging: log_config,
        }
    }
}

type MainFn = Box<dyn FnMut(Context) -> Result<(), Box<dyn Error + Send + Sync>> + Send + 'static>;

/// Runs a main function with a configured logger and turns its failure into an exit code.
pub struct App {
    config: Config,
    main_fn: Option<MainFn>,
    logger: Option<AppLogger>,
}

impl App {
    pub fn new() -> Self {
        App::from_config(Config::default())
    }

    pub fn from_config<C: Into<Config>>(config: C) -> Self {
        App {
            config: config.into(),
            main_fn: None,
            logger: None,
        }
    }

    pub fn main<F>(mut self, f: F) -> Self
    where
        F: FnMut(Context) -> Result<(), Box<dyn Error + Send + Sync>> + Send + 'static,
    {
        self.main_fn = Some(Box::new(f));
        self
    }

    /// Returns the exit code unless the process exits on finish.
    pub fn run(mut self) -> i32 {
        let code = match App::initialize(&mut self) {
            Ok(context) => App::exec(&mut self, context),
            Err(code) => code,
        };
        App::finalize(&mut self);
        if self.config.exit_on_finish {
            process::exit(code);
        }
        code
    }

    fn initialize(&mut self) -> Result<Context, i32> {
        if self.main_fn.is_none() {
            eprintln!("`main` must be called before running");
            return Err(1);
        }
        match AppLogger::new(self.config.logging.clone()) {
            Ok(logger) => {
                let context = Context {
                    logger: logger.create(),
                    accessid: logger.accessid().to_string(),
                    accesstime: *logger.accesstime(),
                };
                self.logger = Some(logger);
                Ok(context)
            }
            Err(e) => {
                eprintln!("{}", e);
                Err(1)
            }
        }
    }

    fn exec(&mut self, context: Context) -> i32 {
        let logger = context.logger.clone();
        debug!(logger, "args: {}", env::args().collect::<Vec<String>>().join(" "));
        debug!(logger, "{:?}", self.config);
        info!(logger, "*** [START] ***");
        let result = match self.main_fn.take() {
            Some(mut main_fn) => (*main_fn)(context).map_err(|e| AppError::new(1, e)),
            None => Err(AppError::new(1, "no main function")),
        };
        let code = match result {
            Ok(_) => 0,
            Err(e) => {
                error!(logger, "{}", e);
                128 + e.code()
            }
        };
        info!(logger, "application finished (code: {})", code);
        info!(logger, "*** [DONE] ***");
        code
    }

    fn finalize(&mut self) {
        self.main_fn = None;
        self.logger = None;
        thread::sleep(Duration::from_millis(1));
    }
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("App").field("config", &self.config).finish()
    }
}
