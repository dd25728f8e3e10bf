// Lexer rule table
pub mod lexer {
    use crate::frontend::token::TokenType;

    // Order matters: multi-character operators come before their prefixes
    pub const RULES: &[(TokenType, &str)] = &[
        (TokenType::LBrace, r"^\{"),
        (TokenType::RBrace, r"^\}"),
        (TokenType::LParen, r"^\("),
        (TokenType::RParen, r"^\)"),
        (TokenType::Semicolon, r"^;"),
        (TokenType::Comma, r"^,"),
        (TokenType::Underscore, r"^_"),
        (TokenType::DoubleQuote, r#"^""#),
        (TokenType::Dot, r"^\."),
        (TokenType::Hash, r"^#"),
        (TokenType::Neq, r"^!="),
        (TokenType::Not, r"^!"),
        (TokenType::EqEq, r"^=="),
        (TokenType::SingleEq, r"^="),
        (TokenType::AndAnd, r"^&&"),
        (TokenType::OrOr, r"^\|\|"),
        (TokenType::Gte, r"^>="),
        (TokenType::Gt, r"^>"),
        (TokenType::Lte, r"^<="),
        (TokenType::Lt, r"^<"),
        (TokenType::Plus, r"^\+"),
        (TokenType::Minus, r"^-"),
        (TokenType::Mult, r"^\*"),
        (TokenType::Div, r"^/"),
        (TokenType::Mod, r"^%"),
        (TokenType::Name, r"^[A-Za-z][A-Za-z0-9]*"),
        (TokenType::Integer, r"^[0-9]+"),
    ];

    pub const WHITESPACE: &str = r"^\s+";
    pub const NO_RULE_MESSAGE: &str = "No rules available to parse the remaining line";
}

// SIMPLE keywords, recognized only by position
pub mod keywords {
    pub const PROCEDURE: &str = "procedure";
    pub const READ: &str = "read";
    pub const PRINT: &str = "print";
    pub const CALL: &str = "call";
    pub const WHILE: &str = "while";
    pub const IF: &str = "if";
    pub const THEN: &str = "then";
    pub const ELSE: &str = "else";
}

// Relative evaluation cost of each clause kind, lower is cheaper
pub mod weights {
    pub const WITH: u32 = 1;
    pub const PATTERN: u32 = 2;
    pub const PARENT: u32 = 3;
    pub const FOLLOWS: u32 = 4;
    pub const CALLS: u32 = 5;
    pub const USES: u32 = 6;
    pub const MODIFIES: u32 = 7;
    pub const NEXT: u32 = 8;
    pub const AFFECTS: u32 = 9;
    pub const PARENT_T: u32 = 10;
    pub const FOLLOWS_T: u32 = 11;
    pub const CALLS_T: u32 = 12;
    pub const NEXT_T: u32 = 13;
    pub const AFFECTS_T: u32 = 14;
}

// Query output literals
pub mod output {
    pub const TRUE: &str = "TRUE";
    pub const FALSE: &str = "FALSE";
    pub const WILDCARD: &str = "_";
    pub const RESULT_SEPARATOR: &str = ", ";
    pub const TUPLE_SEPARATOR: &str = " ";
}
