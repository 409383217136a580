use dataset::conll::{ConllTokenized, Token};
use lang::{Phrasal, Sentence, Tokenized};
use preprocessing::Vocab;
use scoring::{
    field_or_absent, token_at, ArcKey, Counter, Error, FeatLabel, LemmaPair, Scorer, TagLabel,
    TagPair,
};

/// Coefficients of the linear combination computed by `FeatureScorer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub deplabel: f64,
    pub head: f64,
    pub distance: f64,
    pub pos_arc: f64,
    pub lemma: f64,
    pub head_feat: f64,
    pub child_feat: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            deplabel: 0.005,
            head: 0.01,
            distance: 3.5,
            pos_arc: 4.5,
            lemma: 0.001,
            head_feat: 0.000075,
            child_feat: 0.0001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stats {
    tags: Vocab,
    labels: Vocab,
    lemmas: Vocab,
    feats: Vocab,
    /// `(child tag, label)`
    deplabels: Counter<TagLabel>,
    /// `(head tag, child tag)`
    heads: Counter<TagPair>,
    pos_arcs: Counter<ArcKey>,
    lemma_pairs: Counter<LemmaPair>,
    head_feats: Counter<FeatLabel>,
    child_feats: Counter<FeatLabel>,
}

impl Stats {
    fn new() -> Self {
        Stats {
            tags: Vocab::new(),
            labels: Vocab::new(),
            lemmas: Vocab::new(),
            feats: Vocab::new(),
            deplabels: Counter::new(),
            heads: Counter::new(),
            pos_arcs: Counter::new(),
            lemma_pairs: Counter::new(),
            head_feats: Counter::new(),
            child_feats: Counter::new(),
        }
    }

    fn feat_sum(&self, counter: &Counter<FeatLabel>, label: u32, token: &Token) -> u64 {
        match token.feats() {
            Some(feats) => feats
                .iter()
                .map(|feat| counter.get(&FeatLabel(label, self.feats.get(*feat))))
                .sum(),
            None => 0,
        }
    }
}

/// Scores an arc by a weighted sum of tag, label, lemma and morphological feature counts
/// plus the inverse distance between head and child.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureScorer {
    weights: Weights,
    stats: Option<Stats>,
}

impl FeatureScorer {
    pub fn new() -> Self {
        Self::with_weights(Weights::default())
    }

    pub fn with_weights(weights: Weights) -> Self {
        FeatureScorer {
            weights: weights,
            stats: None,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    fn stats(&self) -> Result<&Stats, Error> {
        self.stats.as_ref().ok_or(Error::Untrained)
    }
}

impl Scorer for FeatureScorer {
    fn train(
        &mut self,
        train: &[Sentence<Token>],
        _dev: Option<&[Sentence<Token>]>,
    ) -> Result<(), Error> {
        self.stats = None;
        let mut stats = Stats::new();
        for sentence in train {
            for token in sentence.words() {
                let head = match token.head().and_then(|h| sentence.token(h)) {
                    Some(head) => head,
                    None => continue,
                };
                let child_tag = stats.tags.add(field_or_absent(token.postag()));
                let head_tag = stats.tags.add(field_or_absent(head.postag()));
                let child_lemma = stats.lemmas.add(field_or_absent(token.lemma()));
                let head_lemma = stats.lemmas.add(field_or_absent(head.lemma()));
                stats.heads.increment(TagPair(head_tag, child_tag));
                stats.lemma_pairs.increment(LemmaPair(head_lemma, child_lemma));

                let label = match token.deprel() {
                    Some(label) => stats.labels.add(label),
                    None => continue,
                };
                stats.deplabels.increment(TagLabel(child_tag, label));
                stats.pos_arcs.increment(ArcKey(head_tag, child_tag, label));
                for feat in head.feats().unwrap_or_default() {
                    let feat = stats.feats.add(feat);
                    stats.head_feats.increment(FeatLabel(label, feat));
                }
                for feat in token.feats().unwrap_or_default() {
                    let feat = stats.feats.add(feat);
                    stats.child_feats.increment(FeatLabel(label, feat));
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
        let w = &self.weights;
        let head_token = token_at(sentence, head)?;
        let child_token = token_at(sentence, child)?;
        let head_tag = stats.tags.get(field_or_absent(head_token.postag()));
        let child_tag = stats.tags.get(field_or_absent(child_token.postag()));
        let head_lemma = stats.lemmas.get(field_or_absent(head_token.lemma()));
        let child_lemma = stats.lemmas.get(field_or_absent(child_token.lemma()));
        let label = stats.labels.get(label);

        let distance = if head == child {
            0.0
        } else {
            1.0 / (head as f64 - child as f64).abs()
        };
        let features = [
            (stats.deplabels.get(&TagLabel(child_tag, label)) as f64, w.deplabel),
            (stats.heads.get(&TagPair(head_tag, child_tag)) as f64, w.head),
            (distance, w.distance),
            (stats.pos_arcs.get(&ArcKey(head_tag, child_tag, label)) as f64, w.pos_arc),
            (stats.lemma_pairs.get(&LemmaPair(head_lemma, child_lemma)) as f64, w.lemma),
            (stats.feat_sum(&stats.head_feats, label, head_token) as f64, w.head_feat),
            (stats.feat_sum(&stats.child_feats, label, child_token) as f64, w.child_feat),
        ];
        Ok(features.iter().map(|&(x, w)| x * w).sum())
    }

    fn labels(&self) -> Result<Vec<&str>, Error> {
        Ok(self.stats()?.labels.entries().collect())
    }

    fn is_trained(&self) -> bool {
        self.stats.is_some()
    }
}
