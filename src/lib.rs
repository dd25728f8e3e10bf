use std::{fs::File, io::Read, path::Path};

pub mod ast;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod frontend;
pub mod pkb;
pub mod query;

pub const VERSION: &str = "0.1.0";

use crate::errors::{SpaError, SpaResult};
use crate::pkb::Pkb;
use crate::query::{parse_query, QueryEvaluator};

pub fn read(filename: &Path) -> SpaResult<String> {
    if !filename.is_file() {
        return Err(SpaError::FileReadError(format!("{} is not a readable file", filename.display())));
    }
    let mut file = File::open(filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Builds the knowledge base of a SIMPLE program.
pub fn analyze(source: &str) -> SpaResult<Pkb> {
    let ast = frontend::parse_program(source)?;
    Pkb::new(&ast)
}

/// Preprocesses and evaluates one PQL query. Invalid queries answer nothing.
pub fn evaluate_query(pkb: &Pkb, text: &str) -> Vec<String> {
    let query = parse_query(text);
    QueryEvaluator::new(pkb).evaluate(&query)
}
