use super::numbering::StatementNumbers;
use crate::ast::{NodeKind, TNode};
use std::collections::HashMap;

/// One occurrence of a canonical expression on an assignment's right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub assignee: String,
    pub statement: usize,
    pub is_sub_expr: bool,
}

pub type PatternIndex = HashMap<String, Vec<PatternEntry>>;

/// Indexes every right-hand side and each of its sub-expressions by canonical text.
pub fn patterns_map(ast: &TNode, numbers: &StatementNumbers) -> PatternIndex {
    let mut index = PatternIndex::new();
    ast.walk(&mut |path, node| {
        if node.kind != NodeKind::Assign {
            return;
        }
        let Some(statement) = numbers.number_of(path) else {
            return;
        };
        let assignee = &node.children[0].name;
        let mut record = |canonical: String, is_sub_expr: bool| {
            index.entry(canonical).or_default().push(PatternEntry {
                assignee: assignee.clone(),
                statement,
                is_sub_expr,
            });
        };
        let root = post_order(&node.children[1], &mut |canonical| record(canonical, true));
        record(root, false);
    });
    index
}

// Emits every proper sub-expression, innermost first, and returns the canonical text of `node`.
fn post_order(node: &TNode, emit: &mut dyn FnMut(String)) -> String {
    match node.kind {
        NodeKind::Variable => node.name.clone(),
        NodeKind::Constant => node.constant.clone(),
        kind => {
            let lhs = post_order(&node.children[0], emit);
            emit(lhs.clone());
            let rhs = post_order(&node.children[1], emit);
            emit(rhs.clone());
            format!("({}{}{})", lhs, kind.operator().unwrap_or_default(), rhs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::assign_statement_numbers;
    use crate::frontend::parse_program;
    use test_log::test;

    #[test]
    fn records_root_and_sub_expressions() {
        let ast = parse_program("procedure p { x = a + b * 2; }").unwrap();
        let index = patterns_map(&ast, &assign_statement_numbers(&ast));
        let root = &index["(a+(b*2))"];
        assert_eq!(root.len(), 1);
        assert!(!root[0].is_sub_expr);
        assert!(index["(b*2)"][0].is_sub_expr);
        assert!(index["a"][0].is_sub_expr);
        assert_eq!(index["2"][0].assignee, "x");
        assert_eq!(index.len(), 5);
    }
}
