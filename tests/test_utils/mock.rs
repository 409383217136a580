use std::io::Write;

use mstparser::dataset::conll::{Corpus, Token};
use mstparser::lang::Sentence;
use tempfile::NamedTempFile;

pub static CONLLU: &'static str = "# sent_id = 1
# text = I saw her duck
1\tI\tI\tPRON\tPRP\tCase=Nom|Number=Sing|Person=1\t2\tnsubj\t_\t_
2\tsaw\tsee\tVERB\tVBD\tTense=Past\t0\troot\t_\t_
3\ther\ther\tPRON\tPRP$\tPoss=Yes\t4\tnmod\t_\t_
4\tduck\tduck\tNOUN\tNN\tNumber=Sing\t2\tobj\t_\t_

# sent_id = 2
1\tWe\twe\tPRON\tPRP\tNumber=Plur\t4\tnsubj\t_\t_
2-3\tdon't\t_\t_\t_\t_\t_\t_\t_\t_
2\tdo\tdo\tAUX\tVBP\t_\t4\taux\t_\t_
3\tn't\tnot\tPART\tRB\t_\t4\tadvmod\t_\t_
4\tknow\tknow\tVERB\tVB\t_\t0\troot\t_\tSpaceAfter=No
5\t.\t.\tPUNCT\t.\t_\t4\tpunct\t_\t_

1\tThe\tthe\tDET\tDT\tDefinite=Def\t2\tdet\t_\t_
2\tdog\tdog\tNOUN\tNN\tNumber=Sing\t3\tnsubj\t_\t_
3\tbarks\tbark\tVERB\tVBZ\tTense=Pres\t0\troot\t_\t_
4\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_

1\tA\ta\tDET\tDT\tDefinite=Ind\t2\tdet\t_\t_
2\tcat\tcat\tNOUN\tNN\tNumber=Sing\t3\tnsubj\t_\t_
3\tsaw\tsee\tVERB\tVBD\tTense=Past\t0\troot\t_\t_
4\tthe\tthe\tDET\tDT\tDefinite=Def\t5\tdet\t_\t_
5\tdog\tdog\tNOUN\tNN\tNumber=Sing\t3\tobj\t_\t_
5.1\tate\teat\tVERB\tVBD\t_\t_\t_\t3:conj\t_
6\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\t_
";

/// Writes `content` to a temporary file kept alive by the returned handle.
pub fn write_tempfile(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn provide_corpus() -> (NamedTempFile, Corpus) {
    let file = write_tempfile(CONLLU);
    let corpus = Corpus::open(file.path()).unwrap();
    (file, corpus)
}

pub fn provide_conll_tokens() -> Vec<Sentence<Token<'static>>> {
    let (_file, corpus) = provide_corpus();
    corpus.load().unwrap().into_iter().collect()
}

pub fn token(
    id: usize,
    form: &'static str,
    postag: &'static str,
    head: usize,
    deprel: &'static str,
) -> Token<'static> {
    Token::new(
        id,
        form,
        Some(form),
        Some(postag),
        None,
        None,
        Some(head),
        Some(deprel),
        None,
        None,
    )
}
