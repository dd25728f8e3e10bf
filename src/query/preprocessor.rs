use super::types::{Arg, ArgType, Clause, ClauseType, EntityType, Query, ReturnType};
use crate::errors::{SpaError, SpaResult};
use crate::frontend::lexer::tokenize;
use crate::frontend::token::{Token, TokenType};
use log::debug;

/// Parses a PQL query. Any lexical, syntactic or semantic problem yields `Query::default()`.
pub fn parse_query(text: &str) -> Query {
    let result = tokenize(text).and_then(|tokens| QueryParser::new(&tokens).parse());
    match result {
        Ok(query) => query,
        Err(e) => {
            debug!("rejected query '{}': {}", text.trim(), e);
            Query::default()
        }
    }
}

struct QueryParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    query: Query,
}

impl<'a> QueryParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            query: Query::default(),
        }
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, ahead: usize) -> Option<TokenType> {
        self.tokens.get(self.pos + ahead).map(|t| t.kind)
    }

    fn check(&self, kind: TokenType) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    fn check_word(&self, word: &str) -> bool {
        self.current().is_some_and(|t| t.is_name(word))
    }

    fn error_here(&self, expected: &str) -> SpaError {
        match self.current() {
            Some(token) => SpaError::syntax_error(expected, token.to_string(), token.line),
            None => SpaError::unexpected_eof(expected),
        }
    }

    fn expect(&mut self, kind: TokenType) -> SpaResult<&'a Token> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.error_here(&kind.to_string())),
        }
    }

    fn expect_word(&mut self, word: &str) -> SpaResult<()> {
        if self.check_word(word) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error_here(word))
        }
    }

    fn parse(mut self) -> SpaResult<Query> {
        self.declarations()?;
        self.expect_word("Select")?;
        self.result_clause()?;
        while self.current().is_some() {
            if self.check_word("such") {
                self.pos += 1;
                self.expect_word("that")?;
                self.chain(Self::relation)?;
            } else if self.check_word("pattern") {
                self.pos += 1;
                self.chain(Self::pattern)?;
            } else if self.check_word("with") {
                self.pos += 1;
                self.chain(Self::attribute_compare)?;
            } else {
                return Err(self.error_here("such that, pattern or with"));
            }
        }
        Ok(self.query)
    }

    /// clause ('and' clause)*
    fn chain(&mut self, single: fn(&mut Self) -> SpaResult<Clause>) -> SpaResult<()> {
        loop {
            let clause = single(self)?;
            self.query.clauses.push(clause);
            if !self.check_word("and") {
                return Ok(());
            }
            self.pos += 1;
        }
    }

    // Declarations

    fn declarations(&mut self) -> SpaResult<()> {
        while let Some(entity) = self.design_entity() {
            loop {
                let name = self.expect(TokenType::Name)?;
                if self.query.declarations.insert(name.text.clone(), entity).is_some() {
                    return Err(SpaError::query_error(format!("synonym '{}' declared twice", name.text)));
                }
                if self.check(TokenType::Comma) {
                    self.pos += 1;
                    continue;
                }
                self.expect(TokenType::Semicolon)?;
                break;
            }
        }
        Ok(())
    }

    // Consumes a design-entity keyword followed by a synonym name, if present.
    fn design_entity(&mut self) -> Option<EntityType> {
        let token = self.current()?;
        if token.is_name("prog")
            && self.peek_kind(1) == Some(TokenType::Underscore)
            && self.tokens.get(self.pos + 2).is_some_and(|t| t.is_name("line"))
            && self.peek_kind(3) == Some(TokenType::Name)
        {
            self.pos += 3;
            return Some(EntityType::ProgLine);
        }
        if token.kind != TokenType::Name || self.peek_kind(1) != Some(TokenType::Name) {
            return None;
        }
        let entity = EntityType::from_keyword(&token.text)?;
        self.pos += 1;
        Some(entity)
    }

    fn entity_of(&self, synonym: &str) -> SpaResult<EntityType> {
        self.query
            .declarations
            .get(synonym)
            .copied()
            .ok_or_else(|| SpaError::query_error(format!("synonym '{}' is not declared", synonym)))
    }

    // Result clause

    fn result_clause(&mut self) -> SpaResult<()> {
        if self.check_word("BOOLEAN") && !self.query.declarations.contains_key("BOOLEAN") {
            self.pos += 1;
            self.query.returns.push((ReturnType::Boolean, "BOOLEAN".to_string()));
            return Ok(());
        }
        if !self.check(TokenType::Lt) {
            let elem = self.element()?;
            self.query.returns.push(elem);
            return Ok(());
        }
        self.pos += 1;
        loop {
            let elem = self.element()?;
            self.query.returns.push(elem);
            if self.check(TokenType::Comma) {
                self.pos += 1;
                continue;
            }
            self.expect(TokenType::Gt)?;
            return Ok(());
        }
    }

    /// elem = synonym | synonym '.' attrName
    fn element(&mut self) -> SpaResult<(ReturnType, String)> {
        let name = self.expect(TokenType::Name)?.text.clone();
        let entity = self.entity_of(&name)?;
        if !self.check(TokenType::Dot) {
            return Ok((ReturnType::Default, name));
        }
        self.pos += 1;
        let attr = self.attribute_name()?;
        let kind = match (attr.as_str(), entity) {
            ("procName", EntityType::Procedure) => ReturnType::ProcName,
            ("procName", EntityType::Call) => ReturnType::CallProcName,
            ("varName", EntityType::Variable) => ReturnType::VarName,
            ("varName", EntityType::Read) => ReturnType::ReadVarName,
            ("varName", EntityType::Print) => ReturnType::PrintVarName,
            ("value", EntityType::Constant) => ReturnType::ConstValue,
            ("stmt#", e) if e.is_statement() && e != EntityType::ProgLine => ReturnType::StmtNo,
            _ => return Err(SpaError::query_error(format!("'{}' has no attribute {}", name, attr))),
        };
        Ok((kind, name))
    }

    fn attribute_name(&mut self) -> SpaResult<String> {
        let name = self.expect(TokenType::Name)?.text.clone();
        if name == "stmt" {
            self.expect(TokenType::Hash)?;
            return Ok("stmt#".to_string());
        }
        Ok(name)
    }

    // Arguments

    /// stmtRef | entRef: synonym, '_', INTEGER or '"' IDENT '"'
    fn reference(&mut self) -> SpaResult<Arg> {
        let Some(token) = self.current() else {
            return Err(SpaError::unexpected_eof("argument"));
        };
        match token.kind {
            TokenType::Underscore => {
                self.pos += 1;
                Ok(Arg::wildcard())
            }
            TokenType::Integer => {
                self.pos += 1;
                Ok(Arg::new(ArgType::NumEntity, token.text.clone()))
            }
            TokenType::DoubleQuote => {
                self.pos += 1;
                let name = self.expect(TokenType::Name)?.text.clone();
                self.expect(TokenType::DoubleQuote)?;
                Ok(Arg::new(ArgType::NameEntity, name))
            }
            TokenType::Name => {
                self.pos += 1;
                let kind = match self.entity_of(&token.text)? {
                    EntityType::Variable => ArgType::VarSynonym,
                    EntityType::Procedure => ArgType::ProcSynonym,
                    EntityType::Constant => ArgType::ConstSynonym,
                    _ => ArgType::StmtSynonym,
                };
                Ok(Arg::new(kind, token.text.clone()))
            }
            _ => Err(self.error_here("argument")),
        }
    }

    // such that

    fn relation(&mut self) -> SpaResult<Clause> {
        let name = self.expect(TokenType::Name)?.text.clone();
        let transitive = self.check(TokenType::Mult);
        if transitive {
            self.pos += 1;
        }
        let kind = ClauseType::from_relation(&name, transitive)
            .ok_or_else(|| SpaError::query_error(format!("unknown relation {}{}", name, if transitive { "*" } else { "" })))?;
        self.expect(TokenType::LParen)?;
        let lhs = self.reference()?;
        self.expect(TokenType::Comma)?;
        let rhs = self.reference()?;
        self.expect(TokenType::RParen)?;
        check_relation_args(kind, &lhs, &rhs)?;
        Ok(Clause::new(kind, lhs, rhs))
    }

    // pattern

    fn pattern(&mut self) -> SpaResult<Clause> {
        let synonym = self.expect(TokenType::Name)?.text.clone();
        let entity = self.entity_of(&synonym)?;
        self.expect(TokenType::LParen)?;
        let target = self.reference()?;
        if !matches!(target.kind, ArgType::VarSynonym | ArgType::NameEntity | ArgType::Wildcard) {
            return Err(SpaError::query_error(format!("pattern on '{}' needs a variable reference", synonym)));
        }
        self.expect(TokenType::Comma)?;
        let lhs = Arg::new(ArgType::StmtSynonym, synonym.clone());
        let clause = match entity {
            EntityType::Assign => {
                let (kind, expr) = self.expression_spec()?;
                Clause::pattern(kind, lhs, target, expr)
            }
            EntityType::While => {
                self.expect(TokenType::Underscore)?;
                Clause::new(ClauseType::WhilePattern, lhs, target)
            }
            EntityType::If => {
                self.expect(TokenType::Underscore)?;
                self.expect(TokenType::Comma)?;
                self.expect(TokenType::Underscore)?;
                Clause::new(ClauseType::IfPattern, lhs, target)
            }
            _ => return Err(SpaError::query_error(format!("'{}' cannot be used in a pattern", synonym))),
        };
        self.expect(TokenType::RParen)?;
        Ok(clause)
    }

    /// '_' | '_' '"' expr '"' '_' | '"' expr '"'
    fn expression_spec(&mut self) -> SpaResult<(ClauseType, String)> {
        if self.check(TokenType::Underscore) {
            self.pos += 1;
            if !self.check(TokenType::DoubleQuote) {
                return Ok((ClauseType::AssignPatternWildcard, String::new()));
            }
            let expr = self.quoted_expression()?;
            self.expect(TokenType::Underscore)?;
            return Ok((ClauseType::AssignPatternSubExpr, expr));
        }
        let expr = self.quoted_expression()?;
        Ok((ClauseType::AssignPatternExact, expr))
    }

    fn quoted_expression(&mut self) -> SpaResult<String> {
        self.expect(TokenType::DoubleQuote)?;
        let mut expr = String::new();
        let mut previous: Option<&Token> = None;
        while let Some(token) = self.current() {
            if token.kind == TokenType::DoubleQuote {
                break;
            }
            // keep a gap between tokens that were apart in the query
            if previous.is_some_and(|prev| !prev.is_adjacent_to(token)) {
                expr.push(' ');
            }
            expr.push_str(&token.text);
            previous = Some(token);
            self.pos += 1;
        }
        self.expect(TokenType::DoubleQuote)?;
        if expr.is_empty() {
            return Err(SpaError::query_error("empty pattern expression"));
        }
        Ok(expr)
    }

    // with

    fn attribute_compare(&mut self) -> SpaResult<Clause> {
        let lhs = self.attribute_ref()?;
        self.expect(TokenType::SingleEq)?;
        let rhs = self.attribute_ref()?;
        Ok(Clause::new(ClauseType::With, lhs, rhs))
    }

    /// '"' IDENT '"' | INTEGER | synonym '.' attrName | prog_line synonym
    fn attribute_ref(&mut self) -> SpaResult<Arg> {
        if !self.check(TokenType::Name) {
            let arg = self.reference()?;
            return match arg.kind {
                ArgType::NameEntity | ArgType::NumEntity => Ok(arg),
                _ => Err(SpaError::query_error("with clause needs a value or attribute")),
            };
        }
        let name = self.expect(TokenType::Name)?.text.clone();
        let entity = self.entity_of(&name)?;
        if !self.check(TokenType::Dot) {
            return match entity {
                EntityType::ProgLine => Ok(Arg::new(ArgType::StmtSynonym, name)),
                _ => Err(SpaError::query_error(format!("'{}' needs an attribute in a with clause", name))),
            };
        }
        self.pos += 1;
        let attr = self.attribute_name()?;
        let kind = match (attr.as_str(), entity) {
            ("procName", EntityType::Procedure) => ArgType::ProcSynonym,
            ("procName", EntityType::Call) => ArgType::CallToProc,
            ("varName", EntityType::Variable) => ArgType::VarSynonym,
            ("varName", EntityType::Read) => ArgType::ReadToVar,
            ("varName", EntityType::Print) => ArgType::PrintToVar,
            ("value", EntityType::Constant) => ArgType::ConstSynonym,
            ("stmt#", e) if e.is_statement() && e != EntityType::ProgLine => ArgType::StmtSynonym,
            _ => return Err(SpaError::query_error(format!("'{}' has no attribute {}", name, attr))),
        };
        Ok(Arg::new(kind, name))
    }
}

fn check_relation_args(kind: ClauseType, lhs: &Arg, rhs: &Arg) -> SpaResult<()> {
    let stmt_ref = |arg: &Arg| matches!(arg.kind, ArgType::StmtSynonym | ArgType::NumEntity | ArgType::Wildcard);
    let ent_ref = |arg: &Arg| matches!(arg.kind, ArgType::ProcSynonym | ArgType::NameEntity | ArgType::Wildcard);
    let var_ref = |arg: &Arg| matches!(arg.kind, ArgType::VarSynonym | ArgType::NameEntity | ArgType::Wildcard);
    let valid = match kind {
        ClauseType::Uses | ClauseType::Modifies => {
            lhs.kind != ArgType::Wildcard && (stmt_ref(lhs) || ent_ref(lhs)) && var_ref(rhs)
        }
        ClauseType::Calls | ClauseType::CallsT => ent_ref(lhs) && ent_ref(rhs),
        _ => stmt_ref(lhs) && stmt_ref(rhs),
    };
    if valid {
        Ok(())
    } else {
        Err(SpaError::query_error(format!("invalid arguments {}, {} for {}", lhs, rhs, kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn prog_line_declaration() {
        let query = parse_query("prog_line n; Select n such that Next*(1, n)");
        assert_eq!(query.declarations.get("n"), Some(&EntityType::ProgLine));
        assert_eq!(query.clauses[0].kind, ClauseType::NextT);
    }

    #[test]
    fn wildcard_first_argument_of_uses_is_rejected() {
        assert!(parse_query("variable v; Select v such that Uses(_, v)").is_empty());
    }
}
