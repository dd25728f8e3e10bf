use super::calls::CallGraph;
use crate::ast::{NodeKind, NodePath, TNode};
use std::collections::{BTreeSet, HashMap};

pub type VariableMapping = HashMap<NodePath, BTreeSet<String>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relation {
    Uses,
    Modifies,
}

/// Variables used by each statement and procedure node. Nodes using nothing are absent.
pub fn uses_mapping(ast: &TNode, graph: &CallGraph) -> VariableMapping {
    relation_mapping(ast, graph, Relation::Uses)
}

/// Variables modified by each statement and procedure node. Nodes modifying nothing are absent.
pub fn modifies_mapping(ast: &TNode, graph: &CallGraph) -> VariableMapping {
    relation_mapping(ast, graph, Relation::Modifies)
}

fn relation_mapping(ast: &TNode, graph: &CallGraph, relation: Relation) -> VariableMapping {
    let index: HashMap<&str, usize> = ast
        .children
        .iter()
        .enumerate()
        .map(|(idx, procedure)| (procedure.name.as_str(), idx))
        .collect();

    let mut collector = Collector {
        relation,
        by_procedure: HashMap::new(),
        mapping: HashMap::new(),
    };
    for name in &graph.order {
        let Some(&idx) = index.get(name.as_str()) else {
            continue;
        };
        let mut path = vec![idx];
        let vars = collector.collect(&ast.children[idx], &mut path);
        collector.by_procedure.insert(name.clone(), vars);
    }
    collector.mapping
}

struct Collector {
    relation: Relation,
    by_procedure: HashMap<String, BTreeSet<String>>,
    mapping: VariableMapping,
}

impl Collector {
    fn collect(&mut self, node: &TNode, path: &mut NodePath) -> BTreeSet<String> {
        let vars = match node.kind {
            NodeKind::Procedure | NodeKind::StatementList => self.collect_children(node, path, 0),
            NodeKind::Assign => match self.relation {
                Relation::Uses => names(&node.children[1]),
                Relation::Modifies => names(&node.children[0]),
            },
            NodeKind::Read => match self.relation {
                Relation::Uses => BTreeSet::new(),
                Relation::Modifies => names(&node.children[0]),
            },
            NodeKind::Print => match self.relation {
                Relation::Uses => names(&node.children[0]),
                Relation::Modifies => BTreeSet::new(),
            },
            NodeKind::Call => self
                .by_procedure
                .get(&node.children[0].name)
                .cloned()
                .unwrap_or_default(),
            NodeKind::While | NodeKind::IfElse => {
                let mut vars = self.collect_children(node, path, 1);
                if self.relation == Relation::Uses {
                    vars.extend(names(&node.children[0]));
                }
                vars
            }
            other => unreachable!("{:?} node in statement position", other),
        };
        if node.kind != NodeKind::StatementList && !vars.is_empty() {
            self.mapping.insert(path.clone(), vars.clone());
        }
        vars
    }

    fn collect_children(&mut self, node: &TNode, path: &mut NodePath, skip: usize) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        for (idx, child) in node.children.iter().enumerate().skip(skip) {
            path.push(idx);
            vars.extend(self.collect(child, path));
            path.pop();
        }
        vars
    }
}

fn names(node: &TNode) -> BTreeSet<String> {
    node.variable_names().into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::procedure_call_graph;
    use crate::frontend::parse_program;
    use test_log::test;

    #[test]
    fn call_inherits_callee_variables() {
        let ast = parse_program("procedure p { call q; } procedure q { read x; y = x + z; }").unwrap();
        let graph = procedure_call_graph(&ast).unwrap();
        let uses = uses_mapping(&ast, &graph);
        let modifies = modifies_mapping(&ast, &graph);
        let call_path = vec![0, 0, 0];
        let expected_uses: BTreeSet<String> = ["x", "z"].iter().map(|s| s.to_string()).collect();
        let expected_mods: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(uses.get(&call_path), Some(&expected_uses));
        assert_eq!(modifies.get(&call_path), Some(&expected_mods));
        assert_eq!(uses.get(&vec![0]), Some(&expected_uses));
        // read uses nothing
        assert_eq!(uses.get(&vec![1, 0, 0]), None);
    }
}
