use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Program,
    Procedure,
    StatementList,
    Assign,
    Call,
    IfElse,
    Print,
    Read,
    While,
    Not,
    And,
    Or,
    Greater,
    GreaterThanOrEqual,
    Lesser,
    LesserThanOrEqual,
    Equal,
    NotEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Variable,
    Constant,
}

impl NodeKind {
    /// Kinds that receive a statement number.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Assign | NodeKind::Call | NodeKind::IfElse | NodeKind::Print | NodeKind::Read | NodeKind::While
        )
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::IfElse | NodeKind::While)
    }

    /// Source spelling of an operator kind.
    pub fn operator(self) -> Option<&'static str> {
        let op = match self {
            NodeKind::Not => "!",
            NodeKind::And => "&&",
            NodeKind::Or => "||",
            NodeKind::Greater => ">",
            NodeKind::GreaterThanOrEqual => ">=",
            NodeKind::Lesser => "<",
            NodeKind::LesserThanOrEqual => "<=",
            NodeKind::Equal => "==",
            NodeKind::NotEqual => "!=",
            NodeKind::Plus => "+",
            NodeKind::Minus => "-",
            NodeKind::Multiply => "*",
            NodeKind::Divide => "/",
            NodeKind::Modulo => "%",
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
