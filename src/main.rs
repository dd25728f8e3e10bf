use clap::Parser;
use log::{debug, info, LevelFilter};
use simple_spa::{
    self,
    ast::TNode,
    config::output::RESULT_SEPARATOR,
    errors::SpaResult,
    frontend::{tokenize, Token},
    pkb::Pkb,
    query::{parse_query, QueryEvaluator},
    read,
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::{path::PathBuf, time::Instant};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Static program analyzer for SIMPLE programs",
    long_about = "Static program analyzer for SIMPLE programs.\n\
                 Builds a knowledge base of design abstractions (Follows, Parent, Uses, Modifies,\n\
                 Calls, Next, Affects, patterns) from a SIMPLE source file and answers PQL queries.\n\
                 \n\
                 Example usage:\n\
                 simple-spa source.txt queries.txt              # Answer every query\n\
                 simple-spa source.txt queries.txt --verbose    # Log each analysis phase\n\
                 simple-spa source.txt queries.txt --timing     # Show analysis timing\n\
                 simple-spa source.txt queries.txt --show-ast   # Display abstract syntax tree"
)]
struct Cli {
    // The SIMPLE program to analyze
    source: PathBuf,

    // File of PQL queries, separated by blank lines
    queries: PathBuf,

    // Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    // Show analysis timing
    #[arg(short, long)]
    timing: bool,

    // Show AST after parsing
    #[arg(long)]
    show_ast: bool,
}

// Analysis statistics for performance analysis
#[derive(Debug, Default)]
struct AnalysisStats {
    lexer_time: f64,
    parser_time: f64,
    extraction_time: f64,
    query_time: f64,
    total_time: f64,
    token_count: usize,
    ast_size: usize,
    statement_count: usize,
    query_count: usize,
}

// Print error message and exit with error code
fn fatal(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Warning: logging unavailable: {}", e);
    }
}

fn calculate_ast_size(ast: &TNode) -> usize {
    let mut size = 0;
    ast.walk(&mut |_, _| size += 1);
    size
}

// Perform lexical analysis phase
fn lexical_analysis(source: &str, stats: &mut AnalysisStats) -> SpaResult<Vec<Token>> {
    let lexer_start = Instant::now();
    let tokens = tokenize(source)?;
    stats.lexer_time = lexer_start.elapsed().as_secs_f64();
    stats.token_count = tokens.len();
    info!("Lexical analysis completed in {:.3}s", stats.lexer_time);
    debug!("Generated {} tokens", stats.token_count);
    Ok(tokens)
}

// Perform parsing phase
fn parsing_phase(tokens: &[Token], stats: &mut AnalysisStats) -> SpaResult<TNode> {
    let parser_start = Instant::now();
    let ast = simple_spa::frontend::Parser::new(tokens).parse()?;
    stats.parser_time = parser_start.elapsed().as_secs_f64();
    stats.ast_size = calculate_ast_size(&ast);
    info!("Parsing completed in {:.3}s", stats.parser_time);
    debug!("Built {} AST nodes", stats.ast_size);
    Ok(ast)
}

// Perform design extraction phase
fn extraction_phase(ast: &TNode, stats: &mut AnalysisStats) -> SpaResult<Pkb> {
    let extraction_start = Instant::now();
    let pkb = Pkb::new(ast)?;
    stats.extraction_time = extraction_start.elapsed().as_secs_f64();
    stats.statement_count = pkb.statements().len();
    info!("Design extraction completed in {:.3}s", stats.extraction_time);
    Ok(pkb)
}

/// Splits a query file into queries: runs of non-empty lines joined with a space. `#` starts a
/// comment line.
fn split_queries(text: &str) -> Vec<String> {
    let mut queries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if !current.is_empty() {
                queries.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        queries.push(current.join(" "));
    }
    queries
}

// Perform query evaluation phase
fn query_phase(pkb: &Pkb, text: &str, stats: &mut AnalysisStats) -> Vec<Vec<String>> {
    let query_start = Instant::now();
    let evaluator = QueryEvaluator::new(pkb);
    let answers: Vec<Vec<String>> = split_queries(text)
        .iter()
        .map(|query| {
            debug!("Evaluating: {}", query);
            evaluator.evaluate(&parse_query(query))
        })
        .collect();
    stats.query_time = query_start.elapsed().as_secs_f64();
    stats.query_count = answers.len();
    info!("Answered {} queries in {:.3}s", stats.query_count, stats.query_time);
    answers
}

// Main analysis function
fn analyze(args: &Cli) -> SpaResult<(Vec<Vec<String>>, AnalysisStats)> {
    let start_time = Instant::now();
    let mut stats = AnalysisStats::default();

    info!("Starting analysis of: {}", args.source.display());
    let source = read(&args.source)?;
    debug!("Read {} bytes from source file", source.len());

    let tokens = lexical_analysis(&source, &mut stats)?;
    let ast = parsing_phase(&tokens, &mut stats)?;

    if args.show_ast {
        println!("\n Abstract Syntax Tree:");
        println!("{}", ast.pretty());
    }

    let pkb = extraction_phase(&ast, &mut stats)?;
    let queries = read(&args.queries)?;
    let answers = query_phase(&pkb, &queries, &mut stats);

    stats.total_time = start_time.elapsed().as_secs_f64();
    Ok((answers, stats))
}

// Print detailed analysis statistics
fn print_stats(stats: &AnalysisStats) {
    println!("\n Analysis Statistics:");
    println!("+---------------------+-----------+");
    println!("| Phase               | Time (s)  |");
    println!("+---------------------+-----------+");
    println!("| Lexical Analysis    | {:>9.3} |", stats.lexer_time);
    println!("| Parsing             | {:>9.3} |", stats.parser_time);
    println!("| Design Extraction   | {:>9.3} |", stats.extraction_time);
    println!("| Query Evaluation    | {:>9.3} |", stats.query_time);
    println!("+---------------------+-----------+");
    println!("| Total Time          | {:>9.3} |", stats.total_time);
    println!("+---------------------+-----------+");

    println!("\n Program Metrics:");
    println!("  - Tokens:             {}", stats.token_count);
    println!("  - AST Nodes:          {}", stats.ast_size);
    println!("  - Statements:         {}", stats.statement_count);
    println!("  - Queries:            {}", stats.query_count);
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    match analyze(&args) {
        Ok((answers, stats)) => {
            for answer in answers {
                println!("{}", answer.join(RESULT_SEPARATOR));
            }
            if args.timing {
                print_stats(&stats);
            }
        }
        Err(e) => fatal(&format!("Analysis failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_split_on_blank_lines() {
        let text = "# comment\nstmt s;\nSelect s\n\nvariable v; Select v\n\n\n";
        assert_eq!(split_queries(text), vec!["stmt s; Select s", "variable v; Select v"]);
    }
}
