use crate::config::weights;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Stmt,
    Read,
    Print,
    Call,
    While,
    If,
    Assign,
    Variable,
    Constant,
    Procedure,
    ProgLine,
}

impl EntityType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let entity = match keyword {
            "stmt" => EntityType::Stmt,
            "read" => EntityType::Read,
            "print" => EntityType::Print,
            "call" => EntityType::Call,
            "while" => EntityType::While,
            "if" => EntityType::If,
            "assign" => EntityType::Assign,
            "variable" => EntityType::Variable,
            "constant" => EntityType::Constant,
            "procedure" => EntityType::Procedure,
            "prog_line" => EntityType::ProgLine,
            _ => return None,
        };
        Some(entity)
    }

    /// Statement subtypes, including `prog_line`.
    pub fn is_statement(self) -> bool {
        !matches!(self, EntityType::Variable | EntityType::Constant | EntityType::Procedure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClauseType {
    Follows,
    FollowsT,
    Parent,
    ParentT,
    Uses,
    Modifies,
    Calls,
    CallsT,
    Next,
    NextT,
    Affects,
    AffectsT,
    AssignPatternExact,
    AssignPatternSubExpr,
    AssignPatternWildcard,
    IfPattern,
    WhilePattern,
    With,
}

impl ClauseType {
    /// Relation keyword, with `transitive` for the `*` form.
    pub fn from_relation(name: &str, transitive: bool) -> Option<Self> {
        let kind = match (name, transitive) {
            ("Follows", false) => ClauseType::Follows,
            ("Follows", true) => ClauseType::FollowsT,
            ("Parent", false) => ClauseType::Parent,
            ("Parent", true) => ClauseType::ParentT,
            ("Uses", false) => ClauseType::Uses,
            ("Modifies", false) => ClauseType::Modifies,
            ("Calls", false) => ClauseType::Calls,
            ("Calls", true) => ClauseType::CallsT,
            ("Next", false) => ClauseType::Next,
            ("Next", true) => ClauseType::NextT,
            ("Affects", false) => ClauseType::Affects,
            ("Affects", true) => ClauseType::AffectsT,
            _ => return None,
        };
        Some(kind)
    }

    pub fn weight(self) -> u32 {
        match self {
            ClauseType::With => weights::WITH,
            ClauseType::AssignPatternExact
            | ClauseType::AssignPatternSubExpr
            | ClauseType::AssignPatternWildcard
            | ClauseType::IfPattern
            | ClauseType::WhilePattern => weights::PATTERN,
            ClauseType::Parent => weights::PARENT,
            ClauseType::Follows => weights::FOLLOWS,
            ClauseType::Calls => weights::CALLS,
            ClauseType::Uses => weights::USES,
            ClauseType::Modifies => weights::MODIFIES,
            ClauseType::Next => weights::NEXT,
            ClauseType::Affects => weights::AFFECTS,
            ClauseType::ParentT => weights::PARENT_T,
            ClauseType::FollowsT => weights::FOLLOWS_T,
            ClauseType::CallsT => weights::CALLS_T,
            ClauseType::NextT => weights::NEXT_T,
            ClauseType::AffectsT => weights::AFFECTS_T,
        }
    }

    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            ClauseType::AssignPatternExact
                | ClauseType::AssignPatternSubExpr
                | ClauseType::AssignPatternWildcard
                | ClauseType::IfPattern
                | ClauseType::WhilePattern
        )
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClauseType::Follows => "Follows",
            ClauseType::FollowsT => "Follows*",
            ClauseType::Parent => "Parent",
            ClauseType::ParentT => "Parent*",
            ClauseType::Uses => "Uses",
            ClauseType::Modifies => "Modifies",
            ClauseType::Calls => "Calls",
            ClauseType::CallsT => "Calls*",
            ClauseType::Next => "Next",
            ClauseType::NextT => "Next*",
            ClauseType::Affects => "Affects",
            ClauseType::AffectsT => "Affects*",
            ClauseType::AssignPatternExact => "pattern-exact",
            ClauseType::AssignPatternSubExpr => "pattern-sub",
            ClauseType::AssignPatternWildcard => "pattern-any",
            ClauseType::IfPattern => "pattern-if",
            ClauseType::WhilePattern => "pattern-while",
            ClauseType::With => "with",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Default,
    ProcName,
    CallProcName,
    VarName,
    ReadVarName,
    PrintVarName,
    ConstValue,
    StmtNo,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    StmtSynonym,
    VarSynonym,
    ProcSynonym,
    ConstSynonym,
    NameEntity,
    NumEntity,
    Wildcard,
    /// `r.varName` of a read synonym
    ReadToVar,
    /// `pn.varName` of a print synonym
    PrintToVar,
    /// `c.procName` of a call synonym
    CallToProc,
    Invalid,
}

/// How an argument participates in evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgClass {
    Synonym,
    Entity,
    Wildcard,
    Invalid,
}

impl ArgType {
    pub fn class(self) -> ArgClass {
        match self {
            ArgType::StmtSynonym
            | ArgType::VarSynonym
            | ArgType::ProcSynonym
            | ArgType::ConstSynonym
            | ArgType::ReadToVar
            | ArgType::PrintToVar
            | ArgType::CallToProc => ArgClass::Synonym,
            ArgType::NameEntity | ArgType::NumEntity => ArgClass::Entity,
            ArgType::Wildcard => ArgClass::Wildcard,
            ArgType::Invalid => ArgClass::Invalid,
        }
    }

    /// Whether a `with` comparison sees this argument as a name rather than a number.
    pub fn is_name_valued(self) -> Option<bool> {
        match self {
            ArgType::NameEntity
            | ArgType::VarSynonym
            | ArgType::ProcSynonym
            | ArgType::ReadToVar
            | ArgType::PrintToVar
            | ArgType::CallToProc => Some(true),
            ArgType::NumEntity | ArgType::StmtSynonym | ArgType::ConstSynonym => Some(false),
            ArgType::Wildcard | ArgType::Invalid => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arg {
    pub kind: ArgType,
    pub value: String,
}

impl Arg {
    pub fn new(kind: ArgType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn wildcard() -> Self {
        Self::new(ArgType::Wildcard, "_")
    }

    pub fn class(&self) -> ArgClass {
        self.kind.class()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ArgType::NameEntity => write!(f, "\"{}\"", self.value),
            ArgType::ReadToVar | ArgType::PrintToVar => write!(f, "{}.varName", self.value),
            ArgType::CallToProc => write!(f, "{}.procName", self.value),
            _ => write!(f, "{}", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub kind: ClauseType,
    pub lhs: Arg,
    pub rhs: Arg,
    /// Expression text of an assign pattern, empty otherwise.
    pub pattern: String,
}

impl Clause {
    pub fn new(kind: ClauseType, lhs: Arg, rhs: Arg) -> Self {
        Self {
            kind,
            lhs,
            rhs,
            pattern: String::new(),
        }
    }

    pub fn pattern(kind: ClauseType, lhs: Arg, rhs: Arg, pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::new(kind, lhs, rhs)
        }
    }

    /// Synonyms this clause constrains.
    pub fn synonyms(&self) -> Vec<&str> {
        [&self.lhs, &self.rhs]
            .into_iter()
            .filter(|arg| arg.class() == ArgClass::Synonym)
            .map(|arg| arg.value.as_str())
            .collect()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}", self.kind, self.lhs, self.rhs)?;
        if !self.pattern.is_empty() {
            write!(f, ", \"{}\"", self.pattern)?;
        }
        write!(f, ")")
    }
}

/// A preprocessed query. The default value is the invalid query, which evaluates to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub declarations: HashMap<String, EntityType>,
    pub returns: Vec<(ReturnType, String)>,
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.returns.as_slice(), [(ReturnType::Boolean, _)])
    }

    pub fn selected_synonyms(&self) -> HashSet<String> {
        self.returns
            .iter()
            .filter(|(kind, _)| *kind != ReturnType::Boolean)
            .map(|(_, name)| name.clone())
            .collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.declarations.keys().collect();
        names.sort();
        for name in names {
            write!(f, "{:?} {}; ", self.declarations[name], name)?;
        }
        write!(f, "Select")?;
        for (kind, name) in &self.returns {
            write!(f, " {}:{:?}", name, kind)?;
        }
        for clause in &self.clauses {
            write!(f, " {}", clause)?;
        }
        Ok(())
    }
}
