pub use self::vocab::*;

mod vocab;
