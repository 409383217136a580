use std::slice::Iter;

pub use self::sentence::*;

pub mod prelude;
mod sentence;

pub trait Tokenized {
    fn id(&self) -> usize;
    fn form(&self) -> &str;
    fn lemma(&self) -> Option<&str>;
    fn postag(&self) -> Option<&str>;
    fn head(&self) -> Option<usize>;
    fn deprel(&self) -> Option<&str>;
}

pub trait Phrasal {
    type Token: Tokenized;

    fn from_tokens(tokens: Vec<Self::Token>) -> Self;
    fn raw(&self) -> &str;

    fn token(&self, index: usize) -> Option<&Self::Token>;
    fn tokens(&self) -> &[Self::Token];

    /// Number of tokens, the synthetic root included.
    fn len(&self) -> usize {
        self.tokens().len()
    }

    fn iter(&self) -> Iter<Self::Token> {
        self.tokens().iter()
    }
}
