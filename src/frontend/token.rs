use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semicolon,
    Comma,
    Underscore,
    DoubleQuote,
    Dot,
    Hash,
    SingleEq,
    Not,
    AndAnd,
    OrOr,
    EqEq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Name,
    Integer,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::LBrace => "LBRACE",
            TokenType::RBrace => "RBRACE",
            TokenType::LParen => "LPAREN",
            TokenType::RParen => "RPAREN",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Comma => "COMMA",
            TokenType::Underscore => "UNDERSCORE",
            TokenType::DoubleQuote => "DOUBLE_QUOTE",
            TokenType::Dot => "DOT",
            TokenType::Hash => "HASH",
            TokenType::SingleEq => "SINGLE_EQ",
            TokenType::Not => "NOT",
            TokenType::AndAnd => "ANDAND",
            TokenType::OrOr => "OROR",
            TokenType::EqEq => "EQEQ",
            TokenType::Neq => "NEQ",
            TokenType::Gt => "GT",
            TokenType::Gte => "GTE",
            TokenType::Lt => "LT",
            TokenType::Lte => "LTE",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Mult => "MULT",
            TokenType::Div => "DIV",
            TokenType::Mod => "MOD",
            TokenType::Name => "NAME",
            TokenType::Integer => "INTEGER",
        };
        write!(f, "{}", name)
    }
}

/// A lexed token. Names and integers keep their source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenType, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    pub fn is_name(&self, text: &str) -> bool {
        self.kind == TokenType::Name && self.text == text
    }

    /// Whether `next` starts right where this token ends.
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.line == next.line && self.column + self.text.chars().count() == next.column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenType::Name | TokenType::Integer => write!(f, "{}({})", self.kind, self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}
