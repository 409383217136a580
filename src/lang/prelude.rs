pub use lang::{Phrasal, Sentence, Tokenized};
