extern crate chrono;
extern crate pbr;
extern crate rayon;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
#[macro_use]
extern crate slog;
extern crate slog_async;
extern crate slog_term;
extern crate structopt;
extern crate uuid;

#[cfg(test)]
#[macro_use]
extern crate proptest;
#[cfg(test)]
extern crate tempfile;

#[macro_use]
pub mod app;
pub mod dataset;
pub mod io;
pub mod lang;
pub mod logging;
pub mod preprocessing;
pub mod scoring;
pub mod syntax;
pub mod training;
pub mod utils;
