use super::numbering::StatementNumbers;
use crate::ast::{NodeKind, TNode};
use std::collections::{BTreeSet, HashMap};

pub type FollowsMaps = (HashMap<usize, usize>, HashMap<usize, usize>);
pub type ParentMaps = (HashMap<usize, usize>, HashMap<usize, BTreeSet<usize>>);

/// Returns `(follows, followed_by)`: `follows[a] = b` and `followed_by[b] = a` when b directly follows a.
pub fn follow_relation(ast: &TNode, numbers: &StatementNumbers) -> FollowsMaps {
    let mut follows = HashMap::new();
    let mut followed_by = HashMap::new();
    ast.walk(&mut |path, node| {
        if node.kind != NodeKind::StatementList {
            return;
        }
        for pair in numbers.list_members(ast, path).windows(2) {
            follows.insert(pair[0], pair[1]);
            followed_by.insert(pair[1], pair[0]);
        }
    });
    (follows, followed_by)
}

/// Returns `(parent_of, children_of)` for while and if containers.
pub fn parent_relation(ast: &TNode, numbers: &StatementNumbers) -> ParentMaps {
    let mut parent_of = HashMap::new();
    let mut children_of: HashMap<usize, BTreeSet<usize>> = HashMap::new();
    ast.walk(&mut |path, node| {
        if !node.kind.is_container() {
            return;
        }
        let Some(parent) = numbers.number_of(path) else {
            return;
        };
        // child 0 is the condition, the rest are statement lists
        let mut block_path = path.clone();
        for block in 1..node.children.len() {
            block_path.push(block);
            for child in numbers.list_members(ast, &block_path) {
                parent_of.insert(child, parent);
                children_of.entry(parent).or_default().insert(child);
            }
            block_path.pop();
        }
    });
    (parent_of, children_of)
}

/// Variables read by the condition of each while and if.
pub fn condition_variables(ast: &TNode, numbers: &StatementNumbers) -> HashMap<String, BTreeSet<usize>> {
    let mut index: HashMap<String, BTreeSet<usize>> = HashMap::new();
    ast.walk(&mut |path, node| {
        if !node.kind.is_container() {
            return;
        }
        let Some(stmt) = numbers.number_of(path) else {
            return;
        };
        for name in node.children[0].variable_names() {
            index.entry(name.to_string()).or_default().insert(stmt);
        }
    });
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::assign_statement_numbers;
    use crate::frontend::parse_program;
    use test_log::test;

    #[test]
    fn no_follows_across_nesting() {
        let ast = parse_program("procedure p { while (x > 0) { x = x - 1; y = 2; } z = 3; }").unwrap();
        let numbers = assign_statement_numbers(&ast);
        let (follows, followed_by) = follow_relation(&ast, &numbers);
        assert_eq!(follows.get(&1), Some(&4));
        assert_eq!(follows.get(&2), Some(&3));
        assert_eq!(follows.get(&3), None);
        assert_eq!(followed_by.get(&4), Some(&1));
    }
}
