pub use io::{FileOpen, FromLine, Read, Write};
