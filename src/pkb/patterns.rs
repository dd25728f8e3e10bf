use super::Pkb;
use crate::ast::NodeKind;
use crate::config::output::WILDCARD;
use crate::frontend::parse_expression_str;
use log::debug;
use std::collections::BTreeSet;

impl Pkb {
    /// Assignments to `assignee` (or any, for `_`) whose right-hand side equals `pattern`,
    /// or contains it when `is_sub_expr` is set. An empty sub-expression pattern matches every
    /// assignment to `assignee`. Unparsable patterns match nothing.
    pub fn match_assign_pattern(&self, assignee: &str, pattern: &str, is_sub_expr: bool) -> Vec<usize> {
        if pattern.trim().is_empty() {
            if !is_sub_expr {
                return Vec::new();
            }
            if assignee == WILDCARD {
                return self.assigns();
            }
            return self
                .statements_modifying(assignee)
                .into_iter()
                .filter(|&stmt| self.is_assign(stmt))
                .collect();
        }

        let canonical = match parse_expression_str(pattern) {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!("pattern '{}' rejected: {}", pattern, e);
                return Vec::new();
            }
        };
        let matches: BTreeSet<usize> = self
            .patterns
            .get(&canonical)
            .into_iter()
            .flatten()
            .filter(|entry| assignee == WILDCARD || entry.assignee == assignee)
            .filter(|entry| is_sub_expr || !entry.is_sub_expr)
            .map(|entry| entry.statement)
            .collect();
        matches.into_iter().collect()
    }

    /// While statements whose condition reads `variable`, or any variable for `_`.
    pub fn match_while_pattern(&self, variable: &str) -> Vec<usize> {
        self.match_condition_pattern(variable, NodeKind::While)
    }

    /// If statements whose condition reads `variable`, or any variable for `_`.
    pub fn match_if_pattern(&self, variable: &str) -> Vec<usize> {
        self.match_condition_pattern(variable, NodeKind::IfElse)
    }

    fn match_condition_pattern(&self, variable: &str, kind: NodeKind) -> Vec<usize> {
        let matches: BTreeSet<usize> = if variable == WILDCARD {
            self.condition_vars.values().flatten().copied().collect()
        } else {
            self.condition_vars.get(variable).into_iter().flatten().copied().collect()
        };
        matches.into_iter().filter(|&stmt| self.kind_of(stmt) == Some(kind)).collect()
    }

    /// Variables read by the condition of while/if statement `stmt`.
    pub fn condition_variables_of(&self, stmt: usize) -> Vec<String> {
        let mut vars: Vec<String> = self
            .condition_vars
            .iter()
            .filter(|(_, stmts)| stmts.contains(&stmt))
            .map(|(var, _)| var.clone())
            .collect();
        vars.sort();
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_program;
    use test_log::test;

    fn pkb(src: &str) -> Pkb {
        Pkb::new(&parse_program(src).unwrap()).unwrap()
    }

    #[test]
    fn precedence_normalized_lookup() {
        let pkb = pkb("procedure p { x = 1 + 2 * 3; y = (1 + 2) * 3; }");
        assert_eq!(pkb.match_assign_pattern("_", "1+(2*3)", false), vec![1]);
        assert_eq!(pkb.match_assign_pattern("_", " ( 1 + 2 ) * 3", false), vec![2]);
        assert_eq!(pkb.match_assign_pattern("_", "1+2", true), vec![2]);
        assert_eq!(pkb.match_assign_pattern("x", "2*3", true), vec![1]);
        assert!(pkb.match_assign_pattern("y", "2*3", true).is_empty());
    }

    #[test]
    fn empty_and_invalid_patterns() {
        let pkb = pkb("procedure p { x = a; read x; y = b; }");
        assert_eq!(pkb.match_assign_pattern("x", "", true), vec![1]);
        assert_eq!(pkb.match_assign_pattern("_", "", true), vec![1, 3]);
        assert!(pkb.match_assign_pattern("_", "", false).is_empty());
        assert!(pkb.match_assign_pattern("_", "a+", true).is_empty());
        assert!(pkb.match_assign_pattern("_", "a)", true).is_empty());
    }

    #[test]
    fn condition_patterns() {
        let pkb = pkb("procedure p { while (i < n) { if (k == 1) then { i = i + 1; } else { n = 0; } } }");
        assert_eq!(pkb.match_while_pattern("_"), vec![1]);
        assert_eq!(pkb.match_while_pattern("k"), Vec::<usize>::new());
        assert_eq!(pkb.match_if_pattern("k"), vec![2]);
        assert_eq!(pkb.condition_variables_of(1), vec!["i".to_string(), "n".to_string()]);
    }
}
