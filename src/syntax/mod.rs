use lang::{Phrasal, Sentence, Tokenized};

pub use self::eval::{evaluate, Evaluator};
pub use self::graph::{chu_liu_edmonds, find_cycle, mst_parse, Arc, DepGraph, GraphError};
pub use self::tree::Tree;

pub mod eval;
pub mod graph;
mod tree;

/// Anything that assigns heads and labels to the positions of a sentence.
pub trait Attachment {
    fn head_of(&self, index: usize) -> Option<usize>;
    fn label_of(&self, index: usize) -> Option<&str>;
}

impl<T: Tokenized> Attachment for Sentence<T> {
    fn head_of(&self, index: usize) -> Option<usize> {
        self.tokens().get(index).and_then(|t| t.head())
    }

    fn label_of(&self, index: usize) -> Option<&str> {
        self.tokens().get(index).and_then(|t| t.deprel())
    }
}
