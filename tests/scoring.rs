extern crate mstparser;
extern crate serde_json;
extern crate tempfile;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mstparser::dataset::conll::Corpus;
use mstparser::lang::prelude::*;
use mstparser::scoring::{BaselineScorer, Error, FeatureScorer, Kind, Model, Scorer, Weights};
use mstparser::syntax::evaluate;

mod test_utils;

use test_utils::mock;

const LABELS: [&str; 8] = [
    "nsubj", "root", "nmod", "obj", "aux", "advmod", "punct", "det",
];

#[test]
fn test_untrained_scorers() {
    let sentences = mock::provide_conll_tokens();
    let scorers: Vec<Box<dyn Scorer>> = vec![
        Box::new(BaselineScorer::new()),
        Box::new(FeatureScorer::new()),
        Box::new(Model::new(Kind::Feature)),
    ];
    for scorer in &scorers {
        assert!(!scorer.is_trained());
        match scorer.score(&sentences[0], 2, 1, "nsubj") {
            Err(Error::Untrained) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(scorer.labels().is_err());
        assert!(scorer.parse(&sentences[0]).is_err());
    }
}

#[test]
fn test_baseline_scorer() {
    let sentences = mock::provide_conll_tokens();
    let mut scorer = BaselineScorer::new();
    scorer.train(&sentences, None).unwrap();
    assert!(scorer.is_trained());
    assert_eq!(scorer.labels().unwrap(), LABELS.to_vec());

    // (PRON, nsubj) twice, PRON under VERB twice
    assert_eq!(scorer.score(&sentences[0], 2, 1, "nsubj").unwrap(), 4.0);
    // a PRON never attaches to a PRON
    assert_eq!(scorer.score(&sentences[0], 3, 1, "nsubj").unwrap(), 0.0);
    assert_eq!(scorer.score(&sentences[0], 2, 1, "unseen").unwrap(), 0.0);

    match scorer.score(&sentences[0], 9, 1, "nsubj") {
        Err(Error::IndexOutOfRange { index: 9, len: 5 }) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    scorer.train(&sentences[..1], None).unwrap();
    assert_eq!(scorer.labels().unwrap(), vec!["nsubj", "root", "nmod", "obj"]);
    assert_eq!(scorer.score(&sentences[0], 2, 1, "nsubj").unwrap(), 1.0);
}

#[test]
fn test_feature_scorer() {
    let sentences = mock::provide_conll_tokens();
    let mut scorer = FeatureScorer::new();
    scorer.train(&sentences, None).unwrap();
    assert_eq!(scorer.labels().unwrap(), LABELS.to_vec());

    let expected = 0.005 * 2.0 // (PRON, nsubj)
        + 0.01 * 2.0 // (VERB, PRON)
        + 3.5 * 1.0 // distance
        + 4.5 * 2.0 // (VERB, PRON, nsubj)
        + 0.001 * 1.0 // (see, I)
        + 0.000075 * 2.0 // Tense=Past under nsubj
        + 0.0001 * 5.0; // Case=Nom, Number=Sing x3, Person=1
    let score = scorer.score(&sentences[0], 2, 1, "nsubj").unwrap();
    assert!((score - expected).abs() < 1e-9, "{} != {}", score, expected);

    // the distance term alone remains for unseen events
    let score = scorer.score(&sentences[0], 3, 1, "unseen").unwrap();
    assert!((score - 3.5 / 2.0).abs() < 1e-9);

    for sentence in &sentences {
        let tree = scorer.parse(sentence).unwrap();
        assert!(tree.is_well_formed());
        assert_eq!(tree.len(), sentence.len());
    }
}

#[test]
fn test_weights() {
    let weights: Weights = serde_json::from_str(r#"{"distance": 1.0, "lemma": 0.5}"#).unwrap();
    assert_eq!(weights.distance, 1.0);
    assert_eq!(weights.lemma, 0.5);
    assert_eq!(weights.pos_arc, Weights::default().pos_arc);

    let sentences = mock::provide_conll_tokens();
    let mut scorer = FeatureScorer::with_weights(Weights {
        deplabel: 0.0,
        head: 0.0,
        distance: 1.0,
        pos_arc: 0.0,
        lemma: 0.0,
        head_feat: 0.0,
        child_feat: 0.0,
    });
    scorer.train(&sentences, None).unwrap();
    assert_eq!(scorer.score(&sentences[0], 1, 3, "nmod").unwrap(), 0.5);
}

#[test]
fn test_model_persistence() {
    let sentences = mock::provide_conll_tokens();
    let dir = tempfile::tempdir().unwrap();
    for &kind in &[Kind::Baseline, Kind::Feature] {
        let mut model = Model::new(kind);
        model.train(&sentences, None).unwrap();
        let path = dir.path().join(format!("{}.json", kind));
        model.save(&path).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains(&format!(r#""kind":"{}""#, kind)));

        let loaded = Model::load(&path).unwrap();
        assert_eq!(loaded.kind(), kind);
        assert_eq!(loaded.labels().unwrap(), model.labels().unwrap());
        for sentence in &sentences {
            for child in 1..sentence.len() {
                for head in 0..sentence.len() {
                    for label in &LABELS {
                        assert_eq!(
                            loaded.score(sentence, head, child, label).unwrap(),
                            model.score(sentence, head, child, label).unwrap()
                        );
                    }
                }
            }
        }
    }
    assert!(Model::load(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_kind_from_str() {
    assert_eq!("baseline".parse::<Kind>(), Ok(Kind::Baseline));
    assert_eq!("feature".parse::<Kind>(), Ok(Kind::Feature));
    assert!("neural".parse::<Kind>().is_err());
}

fn find_treebank_splits(dir: &Path) -> Vec<(PathBuf, PathBuf)> {
    let mut splits = vec![];
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        if name.ends_with("-train.conllu") {
            let test = path.with_file_name(name.replace("-train.conllu", "-test.conllu"));
            if test.is_file() {
                splits.push((path.clone(), test));
            }
        }
    }
    splits.sort();
    splits
}

fn macro_scores<S: Scorer>(scorer: &S, corpus: &Corpus) -> (f64, f64) {
    let (mut uas_sum, mut las_sum, mut n) = (0.0, 0.0, 0);
    for sentence in corpus.sentences().unwrap() {
        let sentence = sentence.unwrap();
        let tree = scorer.parse(&sentence).unwrap();
        let (uas, las) = evaluate(&sentence, &tree);
        uas_sum += uas;
        las_sum += las;
        n += 1;
    }
    (uas_sum / n as f64, las_sum / n as f64)
}

/// Set `MSTPARSER_TREEBANK` to a directory of `*-train.conllu`/`*-test.conllu` pairs.
#[test]
#[ignore]
fn test_feature_scorer_beats_baseline() {
    let dir = match env::var_os("MSTPARSER_TREEBANK") {
        Some(dir) => PathBuf::from(dir),
        None => panic!("MSTPARSER_TREEBANK is not set"),
    };
    let splits = find_treebank_splits(&dir);
    assert!(!splits.is_empty());
    for (train_path, test_path) in splits {
        let train = Corpus::open(&train_path).unwrap().load().unwrap();
        let test = Corpus::open(&test_path).unwrap();

        let mut baseline = BaselineScorer::new();
        baseline.train(&train, None).unwrap();
        let mut feature = FeatureScorer::new();
        feature.train(&train, None).unwrap();

        let (buas, blas) = macro_scores(&baseline, &test);
        let (fuas, flas) = macro_scores(&feature, &test);
        println!(
            "{}: baseline ({:.4}, {:.4}), feature ({:.4}, {:.4})",
            train_path.display(),
            buas,
            blas,
            fuas,
            flas
        );
        assert!(fuas >= buas);
        assert!(flas >= blas);
    }
}
