use dataset::conll::Token;
use lang::{Phrasal, Sentence, Tokenized};
use preprocessing::Vocab;
use scoring::{field_or_absent, token_at, Counter, Error, Scorer, TagLabel, TagPair};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stats {
    tags: Vocab,
    labels: Vocab,
    /// `(child tag, label)`
    deplabels: Counter<TagLabel>,
    /// `(child tag, head tag)`
    heads: Counter<TagPair>,
}

/// Scores an arc by the product of two counts: how often the child's tag carries the label
/// and how often it attaches to the head's tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineScorer {
    stats: Option<Stats>,
}

impl BaselineScorer {
    pub fn new() -> Self {
        BaselineScorer { stats: None }
    }

    fn stats(&self) -> Result<&Stats, Error> {
        self.stats.as_ref().ok_or(Error::Untrained)
    }
}

impl Scorer for BaselineScorer {
    fn train(
        &mut self,
        train: &[Sentence<Token>],
        _dev: Option<&[Sentence<Token>]>,
    ) -> Result<(), Error> {
        self.stats = None;
        let mut stats = Stats {
            tags: Vocab::new(),
            labels: Vocab::new(),
            deplabels: Counter::new(),
            heads: Counter::new(),
        };
        for sentence in train {
            for token in sentence.words() {
                let child_tag = stats.tags.add(field_or_absent(token.postag()));
                if let Some(label) = token.deprel() {
                    let label = stats.labels.add(label);
                    stats.deplabels.increment(TagLabel(child_tag, label));
                }
                if let Some(head) = token.head().and_then(|h| sentence.token(h)) {
                    let head_tag = stats.tags.add(field_or_absent(head.postag()));
                    stats.heads.increment(TagPair(child_tag, head_tag));
                }
            }
        }
        self.stats = Some(stats);
        Ok(())
    }

    fn score(
        &self,
        sentence: &Sentence<Token>,
        head: usize,
        child: usize,
        label: &str,
    ) -> Result<f64, Error> {
        let stats = self.stats()?;
        let head_tag = stats.tags.get(field_or_absent(token_at(sentence, head)?.postag()));
        let child_tag = stats.tags.get(field_or_absent(token_at(sentence, child)?.postag()));
        let label = stats.labels.get(label);
        let deplabels = stats.deplabels.get(&TagLabel(child_tag, label));
        let heads = stats.heads.get(&TagPair(child_tag, head_tag));
        Ok((deplabels * heads) as f64)
    }

    fn labels(&self) -> Result<Vec<&str>, Error> {
        Ok(self.stats()?.labels.entries().collect())
    }

    fn is_trained(&self) -> bool {
        self.stats.is_some()
    }
}
