use std::borrow::Cow;

use dataset::conll::Token;
use lang::{Phrasal, Sentence};
use syntax::Attachment;

/// A head and an optional label for every node, `None` heads only at the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    heads: Vec<Option<usize>>,
    labels: Vec<Option<String>>,
}

impl Tree {
    /// Creates a tree of `len` nodes with every node unattached.
    pub fn new(len: usize) -> Self {
        Tree {
            heads: vec![None; len],
            labels: vec![None; len],
        }
    }

    pub fn attach(&mut self, child: usize, head: usize, label: Option<String>) {
        self.heads[child] = Some(head);
        self.labels[child] = label;
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn head(&self, index: usize) -> Option<usize> {
        self.heads.get(index).and_then(|h| *h)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels
            .get(index)
            .and_then(|l| l.as_ref().map(|s| s.as_str()))
    }

    pub fn heads(&self) -> &[Option<usize>] {
        &self.heads
    }

    pub fn labels(&self) -> &[Option<String>] {
        &self.labels
    }

    /// Whether every non-root node has a head and reaches the root within `len` steps.
    pub fn is_well_formed(&self) -> bool {
        let n = self.len();
        if n == 0 {
            return true;
        }
        if self.heads[0].is_some() {
            return false;
        }
        for start in 1..n {
            let mut node = start;
            let mut steps = 0;
            while node != 0 {
                match self.heads[node] {
                    Some(head) if head < n && head != node => node = head,
                    _ => return false,
                }
                steps += 1;
                if steps > n {
                    return false;
                }
            }
        }
        true
    }

    /// Copies `sentence` with the heads and labels of this tree.
    pub fn apply<'a>(&self, sentence: &Sentence<Token<'a>>) -> Sentence<Token<'a>> {
        let tokens = sentence
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let mut token = token.clone();
                if i > 0 {
                    token.attach(
                        self.head(i),
                        self.label(i).map(|l| Cow::Owned(l.to_string())),
                    );
                }
                token
            })
            .collect();
        Sentence::from_tokens(tokens)
    }
}

impl Attachment for Tree {
    fn head_of(&self, index: usize) -> Option<usize> {
        self.head(index)
    }

    fn label_of(&self, index: usize) -> Option<&str> {
        self.label(index)
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;

    #[test]
    fn detects_malformed_trees() {
        let mut tree = Tree::new(4);
        assert!(!tree.is_well_formed());
        tree.attach(1, 0, None);
        tree.attach(2, 3, Some("obj".to_string()));
        tree.attach(3, 2, None);
        assert!(!tree.is_well_formed());
        tree.attach(3, 1, None);
        assert!(tree.is_well_formed());
        assert_eq!(tree.label(2), Some("obj"));
        assert_eq!(tree.head(9), None);
    }
}
