pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use parser::{parse_expression_str, parse_program, Parser};
pub use token::{Token, TokenType};
