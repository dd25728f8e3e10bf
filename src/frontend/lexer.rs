use crate::config::lexer::{NO_RULE_MESSAGE, RULES, WHITESPACE};
use crate::errors::{SpaError, SpaResult};
use crate::frontend::token::{Token, TokenType};
use log::debug;
use regex::Regex;

pub struct Lexer<'a> {
    source: &'a str,
    rules: Vec<(TokenType, Regex)>,
    whitespace: Regex,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> SpaResult<Self> {
        let mut rules = Vec::with_capacity(RULES.len());
        for (kind, pattern) in RULES {
            rules.push((*kind, compile(pattern)?));
        }
        Ok(Self {
            source,
            rules,
            whitespace: compile(WHITESPACE)?,
            offset: 0,
            line: 1,
            column: 1,
        })
    }

    pub fn scan(mut self) -> SpaResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.offset >= self.source.len() {
                break;
            }
            tokens.push(self.scan_token()?);
        }
        debug!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn skip_whitespace(&mut self) {
        let Some(found) = self.whitespace.find(self.remaining()) else {
            return;
        };
        for ch in found.as_str().chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += found.end();
    }

    fn scan_token(&mut self) -> SpaResult<Token> {
        let rest = self.remaining();
        for (kind, rule) in &self.rules {
            if let Some(found) = rule.find(rest) {
                let text = found.as_str();
                if *kind == TokenType::Integer {
                    self.check_number(text)?;
                }
                let token = Token::new(*kind, text, self.line, self.column);
                self.offset += found.end();
                self.column += text.chars().count();
                return Ok(token);
            }
        }
        Err(SpaError::lexer_error(NO_RULE_MESSAGE, self.line, self.column))
    }

    fn check_number(&self, text: &str) -> SpaResult<()> {
        if text.len() > 1 && text.starts_with('0') {
            return Err(SpaError::InvalidNumber {
                number: text.to_string(),
                line: self.line,
            });
        }
        Ok(())
    }
}

fn compile(pattern: &str) -> SpaResult<Regex> {
    Regex::new(pattern).map_err(|e| SpaError::lexer_error(format!("bad lexer rule '{}': {}", pattern, e), 0, 0))
}

/// Lexes `source` into tokens. Whitespace is dropped.
pub fn tokenize(source: &str) -> SpaResult<Vec<Token>> {
    Lexer::new(source)?.scan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn tracks_line_and_column() {
        let tokens = tokenize("a\n  b = 1;").unwrap();
        let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, vec![(1, 1), (2, 3), (2, 5), (2, 7), (2, 8)]);
    }

    #[test]
    fn prefers_longest_operator() {
        let kinds: Vec<TokenType> = tokenize("!= ! == = >= <=").unwrap().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenType::Neq, TokenType::Not, TokenType::EqEq, TokenType::SingleEq, TokenType::Gte, TokenType::Lte]
        );
    }
}
