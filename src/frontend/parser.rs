use crate::ast::{NodeKind, TNode};
use crate::config::keywords;
use crate::errors::{SpaError, SpaResult};
use crate::frontend::lexer::tokenize;
use crate::frontend::token::{Token, TokenType};
use log::debug;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self, ahead: usize) -> Option<TokenType> {
        self.tokens.get(self.pos + ahead).map(|t| t.kind)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn next(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenType) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    fn expect(&mut self, expected: TokenType) -> SpaResult<&'a Token> {
        match self.current() {
            Some(token) if token.kind == expected => {
                self.next();
                Ok(token)
            }
            Some(token) => Err(SpaError::syntax_error(expected.to_string(), token.kind.to_string(), token.line)),
            None => Err(SpaError::unexpected_eof(expected.to_string())),
        }
    }

    fn expect_name(&mut self) -> SpaResult<&'a Token> {
        self.expect(TokenType::Name)
    }

    fn expect_keyword(&mut self, keyword: &str) -> SpaResult<&'a Token> {
        match self.current() {
            Some(token) if token.is_name(keyword) => {
                self.next();
                Ok(token)
            }
            Some(token) => Err(SpaError::syntax_error(format!("'{}'", keyword), token.to_string(), token.line)),
            None => Err(SpaError::unexpected_eof(format!("'{}'", keyword))),
        }
    }

    /// program = procedure { procedure }
    pub fn parse(&mut self) -> SpaResult<TNode> {
        let program = self.program()?;
        debug!("parsed {} procedure(s)", program.children.len());
        Ok(program)
    }

    fn program(&mut self) -> SpaResult<TNode> {
        let mut program = TNode::new(NodeKind::Program, None);
        loop {
            program.add_child(self.procedure()?);
            if self.at_end() {
                break;
            }
        }
        Ok(program)
    }

    /// procedure = "procedure" name stmtLst
    fn procedure(&mut self) -> SpaResult<TNode> {
        let keyword = self.expect_keyword(keywords::PROCEDURE)?;
        let name = self.expect_name()?;
        let body = self.statement_list()?;
        let mut procedure = TNode::named(NodeKind::Procedure, Some(keyword.line), name.text.clone());
        procedure.add_child(body);
        Ok(procedure)
    }

    /// stmtLst = "{" stmt { stmt } "}"
    fn statement_list(&mut self) -> SpaResult<TNode> {
        let brace = self.expect(TokenType::LBrace)?;
        let mut list = TNode::new(NodeKind::StatementList, Some(brace.line));
        loop {
            list.add_child(self.statement()?);
            if self.check(TokenType::RBrace) {
                break;
            }
        }
        self.expect(TokenType::RBrace)?;
        Ok(list)
    }

    /// stmt = read | print | call | while | if | assign
    fn statement(&mut self) -> SpaResult<TNode> {
        if self.peek_kind(1) == Some(TokenType::SingleEq) {
            return self.assign();
        }
        let token = self.expect_name()?;
        // Keywords are only keywords in leading position, so rewind and let each production consume it
        self.pos -= 1;
        match token.text.as_str() {
            keywords::READ => self.read(),
            keywords::PRINT => self.print(),
            keywords::CALL => self.call(),
            keywords::WHILE => self.while_stmt(),
            keywords::IF => self.if_stmt(),
            _ => Err(SpaError::syntax_error("statement", token.to_string(), token.line)),
        }
    }

    /// read = "read" name ";"
    fn read(&mut self) -> SpaResult<TNode> {
        self.single_name_statement(keywords::READ, NodeKind::Read)
    }

    /// print = "print" name ";"
    fn print(&mut self) -> SpaResult<TNode> {
        self.single_name_statement(keywords::PRINT, NodeKind::Print)
    }

    /// call = "call" name ";"
    fn call(&mut self) -> SpaResult<TNode> {
        self.single_name_statement(keywords::CALL, NodeKind::Call)
    }

    fn single_name_statement(&mut self, keyword: &str, kind: NodeKind) -> SpaResult<TNode> {
        let keyword = self.expect_keyword(keyword)?;
        let variable = self.variable()?;
        self.expect(TokenType::Semicolon)?;
        Ok(TNode::with_children(kind, Some(keyword.line), vec![variable]))
    }

    /// while = "while" "(" cond_expr ")" stmtLst
    fn while_stmt(&mut self) -> SpaResult<TNode> {
        let keyword = self.expect_keyword(keywords::WHILE)?;
        self.expect(TokenType::LParen)?;
        let condition = self.condition()?;
        self.expect(TokenType::RParen)?;
        let body = self.statement_list()?;
        Ok(TNode::with_children(NodeKind::While, Some(keyword.line), vec![condition, body]))
    }

    /// if = "if" "(" cond_expr ")" "then" stmtLst "else" stmtLst
    fn if_stmt(&mut self) -> SpaResult<TNode> {
        let keyword = self.expect_keyword(keywords::IF)?;
        self.expect(TokenType::LParen)?;
        let condition = self.condition()?;
        self.expect(TokenType::RParen)?;
        self.expect_keyword(keywords::THEN)?;
        let then_block = self.statement_list()?;
        self.expect_keyword(keywords::ELSE)?;
        let else_block = self.statement_list()?;
        Ok(TNode::with_children(
            NodeKind::IfElse,
            Some(keyword.line),
            vec![condition, then_block, else_block],
        ))
    }

    /// assign = name "=" expr ";"
    fn assign(&mut self) -> SpaResult<TNode> {
        let lhs = self.variable()?;
        let eq = self.expect(TokenType::SingleEq)?;
        let rhs = self.expression()?;
        self.expect(TokenType::Semicolon)?;
        let target = lhs.name.clone();
        let mut assign = TNode::binary(NodeKind::Assign, eq.line, lhs, rhs);
        assign.name = target;
        Ok(assign)
    }

    /// cond_expr = rel_expr | "!" "(" cond_expr ")" | "(" cond_expr ")" ("&&" | "||") "(" cond_expr ")"
    fn condition(&mut self) -> SpaResult<TNode> {
        if let Some(relational) = self.try_relational_expression()? {
            return Ok(relational);
        }
        if self.check(TokenType::Not) {
            let not = self.expect(TokenType::Not)?;
            self.expect(TokenType::LParen)?;
            let inner = self.condition()?;
            self.expect(TokenType::RParen)?;
            return Ok(TNode::with_children(NodeKind::Not, Some(not.line), vec![inner]));
        }
        self.expect(TokenType::LParen)?;
        let lhs = self.condition()?;
        self.expect(TokenType::RParen)?;
        let (kind, line) = match self.current() {
            Some(token) if token.kind == TokenType::AndAnd => (NodeKind::And, token.line),
            Some(token) if token.kind == TokenType::OrOr => (NodeKind::Or, token.line),
            Some(token) => return Err(SpaError::syntax_error("ANDAND or OROR", token.kind.to_string(), token.line)),
            None => return Err(SpaError::unexpected_eof("ANDAND or OROR")),
        };
        self.next();
        self.expect(TokenType::LParen)?;
        let rhs = self.condition()?;
        self.expect(TokenType::RParen)?;
        Ok(TNode::binary(kind, line, lhs, rhs))
    }

    /// rel_expr = expr ( ">" | ">=" | "<" | "<=" | "==" | "!=" ) expr
    ///
    /// Failing before the relational operator rewinds and yields `None`. Errors after the
    /// operator propagate.
    fn try_relational_expression(&mut self) -> SpaResult<Option<TNode>> {
        let start = self.pos;
        let lhs = match self.expression() {
            Ok(lhs) => lhs,
            Err(SpaError::SyntaxError { .. }) | Err(SpaError::UnexpectedEof { .. }) => {
                self.pos = start;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let Some((kind, line)) = self.relational_operator() else {
            self.pos = start;
            return Ok(None);
        };
        self.next();
        let rhs = self.expression()?;
        Ok(Some(TNode::binary(kind, line, lhs, rhs)))
    }

    fn relational_operator(&self) -> Option<(NodeKind, usize)> {
        let token = self.current()?;
        let kind = match token.kind {
            TokenType::Gt => NodeKind::Greater,
            TokenType::Gte => NodeKind::GreaterThanOrEqual,
            TokenType::Lt => NodeKind::Lesser,
            TokenType::Lte => NodeKind::LesserThanOrEqual,
            TokenType::EqEq => NodeKind::Equal,
            TokenType::Neq => NodeKind::NotEqual,
            _ => return None,
        };
        Some((kind, token.line))
    }

    /// expr = term { ( "+" | "-" ) term }
    fn expression(&mut self) -> SpaResult<TNode> {
        let mut lhs = self.term()?;
        while let Some(token) = self.current() {
            let kind = match token.kind {
                TokenType::Plus => NodeKind::Plus,
                TokenType::Minus => NodeKind::Minus,
                _ => break,
            };
            self.next();
            let rhs = self.term()?;
            lhs = TNode::binary(kind, token.line, lhs, rhs);
        }
        Ok(lhs)
    }

    /// term = factor { ( "*" | "/" | "%" ) factor }
    fn term(&mut self) -> SpaResult<TNode> {
        let mut lhs = self.factor()?;
        while let Some(token) = self.current() {
            let kind = match token.kind {
                TokenType::Mult => NodeKind::Multiply,
                TokenType::Div => NodeKind::Divide,
                TokenType::Mod => NodeKind::Modulo,
                _ => break,
            };
            self.next();
            let rhs = self.factor()?;
            lhs = TNode::binary(kind, token.line, lhs, rhs);
        }
        Ok(lhs)
    }

    /// factor = name | integer | "(" expr ")"
    fn factor(&mut self) -> SpaResult<TNode> {
        match self.peek_kind(0) {
            Some(TokenType::Name) => self.variable(),
            Some(TokenType::Integer) => self.constant(),
            Some(TokenType::LParen) => {
                self.expect(TokenType::LParen)?;
                let inner = self.expression()?;
                self.expect(TokenType::RParen)?;
                Ok(inner)
            }
            Some(_) => {
                let token = &self.tokens[self.pos];
                Err(SpaError::syntax_error("factor", token.kind.to_string(), token.line))
            }
            None => Err(SpaError::unexpected_eof("factor")),
        }
    }

    fn variable(&mut self) -> SpaResult<TNode> {
        let token = self.expect_name()?;
        Ok(TNode::variable(token.text.clone(), token.line))
    }

    fn constant(&mut self) -> SpaResult<TNode> {
        let token = self.expect(TokenType::Integer)?;
        Ok(TNode::constant(token.text.clone(), token.line))
    }

    /// Parses a standalone arithmetic expression that must span every token.
    pub fn parse_expression(&mut self) -> SpaResult<TNode> {
        let expr = self.expression()?;
        if let Some(token) = self.current() {
            return Err(SpaError::syntax_error("end of expression", token.kind.to_string(), token.line));
        }
        Ok(expr)
    }
}

/// Lexes and parses a SIMPLE program.
pub fn parse_program(source: &str) -> SpaResult<TNode> {
    let tokens = tokenize(source)?;
    Parser::new(&tokens).parse()
}

/// Canonical, fully parenthesized rendering of an arithmetic expression string.
pub fn parse_expression_str(text: &str) -> SpaResult<String> {
    let tokens = tokenize(text)?;
    let expr = Parser::new(&tokens).parse_expression()?;
    Ok(expr.canonical())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn relational_attempt_rewinds_on_mismatch() {
        let tokens = tokenize("(a < b) && (c < d)").unwrap();
        let mut parser = Parser::new(&tokens);
        assert!(parser.try_relational_expression().unwrap().is_none());
        assert_eq!(parser.pos, 0);
        let cond = parser.condition().unwrap();
        assert_eq!(cond.kind, NodeKind::And);
    }

    #[test]
    fn keyword_as_assign_target() {
        let ast = parse_program("procedure while { while = read + 1; }").unwrap();
        let assign = &ast.children[0].children[0].children[0];
        assert_eq!(assign.kind, NodeKind::Assign);
        assert_eq!(assign.children[0].name, "while");
    }
}
