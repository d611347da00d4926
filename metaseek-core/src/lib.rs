pub mod documents;
pub mod graph;
pub mod pagerank;
pub mod report;
pub mod tokenize;
pub mod vector;

pub use documents::primary_documents;
pub use graph::DomainGraph;
pub use pagerank::{PageRank, RankError};
pub use report::RankReport;
pub use tokenize::Tokenizer;
pub use vector::VectorSpace;

pub fn print_banner() {
    println!(
        r#"
  ┌┬┐┌─┐┌┬┐┌─┐┌─┐┌─┐┌─┐┌─┐
  │││├┤  │ ├─┤└─┐├┤ ├┤ ├┴┐
  ┴ ┴└─┘ ┴ ┴ ┴└─┘└─┘└─┘┴ ┴
  meta-search, crawl, and rank
"#
    );
}
