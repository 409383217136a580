use std::fmt;
use std::ops::Index;

use lang::{Phrasal, Tokenized};

#[derive(Clone, Debug, PartialEq)]
pub struct Sentence<T: Tokenized> {
    raw: String,
    tokens: Vec<T>,
}

impl<T: Tokenized> Sentence<T> {
    /// Tokens after the synthetic root.
    pub fn words(&self) -> &[T] {
        if self.tokens.is_empty() {
            &self.tokens
        } else {
            &self.tokens[1..]
        }
    }

    pub fn into_tokens(self) -> Vec<T> {
        self.tokens
    }
}

impl<T: Tokenized> fmt::Display for Sentence<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "raw: {}", self.raw)
    }
}

impl<T: Tokenized> Phrasal for Sentence<T> {
    type Token = T;

    fn from_tokens(tokens: Vec<T>) -> Self {
        Sentence {
            raw: tokens
                .iter()
                .skip(1)
                .map(|t| t.form().to_string())
                .collect::<Vec<String>>()
                .join(" "),
            tokens: tokens,
        }
    }

    fn raw(&self) -> &str {
        &self.raw
    }

    fn token(&self, index: usize) -> Option<&Self::Token> {
        self.tokens.get(index)
    }

    fn tokens(&self) -> &[Self::Token] {
        &self.tokens
    }
}

impl<T: Tokenized> Index<usize> for Sentence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}
