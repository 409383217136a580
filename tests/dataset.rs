extern crate mstparser;
extern crate tempfile;

use std::fs::File;
use std::io::{self, BufReader, Cursor};

use mstparser::dataset::conll::{self, ConllTokenized, Corpus, Sentences, Writer};
use mstparser::dataset::{Load, Loader};
use mstparser::lang::prelude::*;

mod test_utils;

use test_utils::mock;

#[test]
fn test_read_conllu() {
    let sentences = mock::provide_conll_tokens();
    assert_eq!(sentences.len(), 4);
    assert_eq!(
        sentences.iter().map(|s| s.len()).collect::<Vec<_>>(),
        vec![5, 6, 5, 7]
    );

    let root = &sentences[0][0];
    assert_eq!(root.form(), conll::ROOT_FORM);
    assert_eq!(root.postag(), Some(conll::ROOT_POSTAG));
    assert_eq!(root.head(), None);

    let token = &sentences[0][1];
    assert_eq!(token.id(), 1);
    assert_eq!(token.form(), "I");
    assert_eq!(token.postag(), Some("PRON"));
    assert_eq!(token.xpostag(), Some("PRP"));
    assert_eq!(token.feats(), Some(vec!["Case=Nom", "Number=Sing", "Person=1"]));
    assert_eq!(token.head(), Some(2));
    assert_eq!(token.deprel(), Some("nsubj"));
    assert_eq!(token.deps(), None);

    let words: Vec<&str> = sentences[1].words().iter().map(|t| t.form()).collect();
    assert_eq!(words, vec!["We", "do", "n't", "know", "."]);
    assert_eq!(sentences[1][4].misc(), Some("SpaceAfter=No"));
    assert_eq!(sentences[1][2].feats(), None);
    assert_eq!(sentences[0].raw(), "I saw her duck");
}

#[test]
fn test_corpus_is_restartable() {
    let (_file, corpus) = mock::provide_corpus();
    let first: Vec<_> = corpus.sentences().unwrap().map(|s| s.unwrap()).collect();
    let second: Vec<_> = corpus.sentences().unwrap().map(|s| s.unwrap()).collect();
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
    assert_eq!(corpus.load().unwrap().len(), 4);
}

#[test]
fn test_open_missing_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::open(dir.path().join("missing.conllu")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn test_reject_malformed_lines() {
    let mut sentences = Sentences::new(Cursor::new("1\tI\tI\tPRON\t_\t_\t0\n"));
    let err = sentences.next().unwrap().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(sentences.next().is_none());

    let mut sentences = Sentences::new(Cursor::new("x\tI\tI\tPRON\t_\t_\t0\troot\t_\t_\n"));
    assert!(sentences.next().unwrap().is_err());
}

#[test]
fn test_read_without_trailing_blank_line() {
    let content = "1\tHi\thi\tINTJ\tUH\t_\t0\troot\t_\t_";
    let sentences: Vec<_> = Sentences::new(Cursor::new(content))
        .map(|s| s.unwrap())
        .collect();
    assert_eq!(sentences.len(), 1);
    assert_eq!(sentences[0][1].deprel(), Some("root"));
}

#[test]
fn test_loader() {
    let file = mock::write_tempfile(mock::CONLLU);
    let mut loader = Loader::<conll::Reader<BufReader<File>>>::new();
    let dataset = loader.load_until(file.path(), 2).unwrap();
    assert_eq!(dataset.len(), 2);
    let dataset = loader.load(file.path()).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset[3][5].form(), "dog");
}

#[test]
fn test_write_conllu() {
    let sentences = mock::provide_conll_tokens();
    let mut writer = Writer::new(vec![]);
    writer.write_sentence(&sentences[0]).unwrap();
    writer.flush().unwrap();
    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "1\tI\tI\tPRON\tPRP\tCase=Nom|Number=Sing|Person=1\t2\tnsubj\t_\t_"
    );
    assert_eq!(lines[4], "");

    let reread: Vec<_> = Sentences::new(Cursor::new(output.clone()))
        .map(|s| s.unwrap())
        .collect();
    assert_eq!(reread, vec![sentences[0].clone()]);
}
