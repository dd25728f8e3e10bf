use crate::ast::{NodeKind, NodePath, TNode};
use std::collections::HashMap;

/// Bijection between statement nodes and their 1-based statement numbers.
#[derive(Debug, Default, Clone)]
pub struct StatementNumbers {
    by_path: HashMap<NodePath, usize>,
    by_number: Vec<NodePath>,
}

impl StatementNumbers {
    pub fn number_of(&self, path: &[usize]) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    pub fn path_of(&self, number: usize) -> Option<&NodePath> {
        number.checked_sub(1).and_then(|idx| self.by_number.get(idx))
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    /// Statement numbers of the direct children of the statement list at `list_path`.
    pub fn list_members(&self, ast: &TNode, list_path: &[usize]) -> Vec<usize> {
        let Some(list) = ast.at(list_path) else {
            return Vec::new();
        };
        let mut path = list_path.to_vec();
        (0..list.children.len())
            .filter_map(|idx| {
                path.push(idx);
                let number = self.number_of(&path);
                path.pop();
                number
            })
            .collect()
    }
}

/// Numbers statements in pre-order, left to right, skipping non-statement nodes.
pub fn assign_statement_numbers(ast: &TNode) -> StatementNumbers {
    let mut numbers = StatementNumbers::default();
    ast.walk(&mut |path, node| {
        if node.kind.is_statement() {
            numbers.by_number.push(path.clone());
            numbers.by_path.insert(path.clone(), numbers.by_number.len());
        }
    });
    numbers
}

/// Buckets every node of the tree by its kind.
pub fn index_nodes_by_kind(ast: &TNode) -> HashMap<NodeKind, Vec<NodePath>> {
    let mut index: HashMap<NodeKind, Vec<NodePath>> = HashMap::new();
    ast.walk(&mut |path, node| {
        index.entry(node.kind).or_default().push(path.clone());
    });
    index
}
