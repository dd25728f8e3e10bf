use simple_spa::errors::{SpaError, SpaResult};
use simple_spa::frontend::{tokenize, Token, TokenType};

fn kinds(tokens: &[Token]) -> Vec<TokenType> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_procedure_tokens() -> SpaResult<()> {
    let tokens = tokenize("procedure main { x = x + 10; }")?;
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenType::Name,
            TokenType::Name,
            TokenType::LBrace,
            TokenType::Name,
            TokenType::SingleEq,
            TokenType::Name,
            TokenType::Plus,
            TokenType::Integer,
            TokenType::Semicolon,
            TokenType::RBrace,
        ]
    );
    assert_eq!(tokens[7].text, "10");
    Ok(())
}

#[test]
fn test_condition_operators() -> SpaResult<()> {
    let tokens = tokenize("!(a<=b)&&(c!=d)||(e>=f)")?;
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenType::Not,
            TokenType::LParen,
            TokenType::Name,
            TokenType::Lte,
            TokenType::Name,
            TokenType::RParen,
            TokenType::AndAnd,
            TokenType::LParen,
            TokenType::Name,
            TokenType::Neq,
            TokenType::Name,
            TokenType::RParen,
            TokenType::OrOr,
            TokenType::LParen,
            TokenType::Name,
            TokenType::Gte,
            TokenType::Name,
            TokenType::RParen,
        ]
    );
    Ok(())
}

#[test]
fn test_query_punctuation() -> SpaResult<()> {
    let tokens = tokenize("Select <s.stmt#, v> such that Follows*(_, \"x\")")?;
    assert!(tokens.iter().any(|t| t.kind == TokenType::Hash));
    assert!(tokens.iter().any(|t| t.kind == TokenType::Dot));
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenType::DoubleQuote).count(), 2);
    Ok(())
}

#[test]
fn test_line_numbers() -> SpaResult<()> {
    let tokens = tokenize("procedure p {\n  read x;\n  print x;\n}")?;
    let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4]);
    Ok(())
}

#[test]
fn test_leading_zero_rejected() {
    match tokenize("x = 007;") {
        Err(SpaError::InvalidNumber { number, line }) => {
            assert_eq!(number, "007");
            assert_eq!(line, 1);
        }
        other => panic!("expected InvalidNumber, got {:?}", other),
    }
}

#[test]
fn test_unknown_character() {
    match tokenize("x = 1;\ny = $;") {
        Err(SpaError::LexerError { line, column, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(column, 5);
        }
        other => panic!("expected LexerError, got {:?}", other),
    }
}
