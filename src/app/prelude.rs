pub use super::{App, CommonArgs, Config, Context};

#[doc(hidden)]
pub use structopt::clap::AppSettings;
#[doc(hidden)]
pub use structopt::StructOpt;
