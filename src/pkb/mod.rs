// Program knowledge base: read-only lookups over the extracted relation tables.

mod entities;
mod patterns;
mod relations;

use crate::ast::{NodeKind, TNode};
use crate::errors::SpaResult;
use crate::extractor::{self, FlowFacts, PatternIndex, StatementGraph, VariableMapping};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};

type Index<K, V> = HashMap<K, BTreeSet<V>>;

#[derive(Debug, Default)]
pub struct Pkb {
    // statement number - 1 -> kind
    kinds: Vec<NodeKind>,
    statements_by_kind: Index<NodeKind, usize>,
    variables: BTreeSet<String>,
    procedures: BTreeSet<String>,
    constants: BTreeSet<String>,

    // attribute lookups for call/read/print statements
    call_target: HashMap<usize, String>,
    calls_of: Index<String, usize>,
    read_target: HashMap<usize, String>,
    reads_of: Index<String, usize>,
    print_target: HashMap<usize, String>,
    prints_of: Index<String, usize>,

    follows: HashMap<usize, usize>,
    followed_by: HashMap<usize, usize>,
    parent_of: HashMap<usize, usize>,
    children_of: Index<usize, usize>,

    stmt_uses: Index<usize, String>,
    used_by_stmts: Index<String, usize>,
    proc_uses: Index<String, String>,
    used_by_procs: Index<String, String>,
    stmt_modifies: Index<usize, String>,
    modified_by_stmts: Index<String, usize>,
    proc_modifies: Index<String, String>,
    modified_by_procs: Index<String, String>,

    calls: Index<String, String>,
    called_by: Index<String, String>,

    next: StatementGraph,
    previous: StatementGraph,
    affects: StatementGraph,
    affected_by: StatementGraph,

    patterns: PatternIndex,
    condition_vars: Index<String, usize>,
}

impl Pkb {
    /// Validates `ast` and extracts every relation table from it.
    pub fn new(ast: &TNode) -> SpaResult<Self> {
        extractor::validate_program(ast)?;
        let numbers = extractor::assign_statement_numbers(ast);
        let by_kind = extractor::index_nodes_by_kind(ast);
        let graph = extractor::procedure_call_graph(ast)?;
        let mut pkb = Pkb::default();

        for number in 1..=numbers.len() {
            if let Some(node) = numbers.path_of(number).and_then(|path| ast.at(path)) {
                pkb.kinds.push(node.kind);
                pkb.statements_by_kind.entry(node.kind).or_default().insert(number);
                let target = node.children[0].name.clone();
                match node.kind {
                    NodeKind::Call => link(&mut pkb.call_target, &mut pkb.calls_of, number, target),
                    NodeKind::Read => link(&mut pkb.read_target, &mut pkb.reads_of, number, target),
                    NodeKind::Print => link(&mut pkb.print_target, &mut pkb.prints_of, number, target),
                    _ => {}
                }
            }
        }
        for path in by_kind.get(&NodeKind::Variable).into_iter().flatten() {
            // call targets are procedure names, not variables
            let parent = ast.at(&path[..path.len() - 1]).map(|node| node.kind);
            if let Some(node) = ast.at(path) {
                if parent != Some(NodeKind::Call) {
                    pkb.variables.insert(node.name.clone());
                }
            }
        }
        for path in by_kind.get(&NodeKind::Constant).into_iter().flatten() {
            if let Some(node) = ast.at(path) {
                pkb.constants.insert(node.constant.clone());
            }
        }
        pkb.procedures = ast.children.iter().map(|p| p.name.clone()).collect();

        (pkb.follows, pkb.followed_by) = extractor::follow_relation(ast, &numbers);
        (pkb.parent_of, pkb.children_of) = extractor::parent_relation(ast, &numbers);

        let uses = extractor::uses_mapping(ast, &graph);
        let modifies = extractor::modifies_mapping(ast, &graph);
        pkb.store_usage(ast, &numbers, uses, true);
        pkb.store_usage(ast, &numbers, modifies, false);

        for (caller, callees) in &graph.calls {
            for callee in callees {
                pkb.called_by.entry(callee.clone()).or_default().insert(caller.clone());
            }
        }
        pkb.calls = graph.calls;
        pkb.calls.retain(|_, callees| !callees.is_empty());

        (pkb.next, pkb.previous) = extractor::next_relation(ast, &numbers);
        let facts = FlowFacts {
            kinds: &pkb.kinds,
            next: &pkb.next,
            previous: &pkb.previous,
            modifies: &pkb.stmt_modifies,
            uses: &pkb.stmt_uses,
        };
        let (affects, affected_by) = extractor::affects_relation(&facts);
        pkb.affects = affects;
        pkb.affected_by = affected_by;

        pkb.patterns = extractor::patterns_map(ast, &numbers);
        pkb.condition_vars = extractor::condition_variables(ast, &numbers);

        info!(
            "knowledge base ready: {} statements, {} procedures, {} variables",
            pkb.kinds.len(),
            pkb.procedures.len(),
            pkb.variables.len()
        );
        debug!("{} canonical expressions indexed", pkb.patterns.len());
        Ok(pkb)
    }

    fn store_usage(&mut self, ast: &TNode, numbers: &extractor::StatementNumbers, mapping: VariableMapping, uses: bool) {
        for (path, vars) in mapping {
            let (by_stmt, by_var_stmt, by_proc, by_var_proc) = if uses {
                (&mut self.stmt_uses, &mut self.used_by_stmts, &mut self.proc_uses, &mut self.used_by_procs)
            } else {
                (
                    &mut self.stmt_modifies,
                    &mut self.modified_by_stmts,
                    &mut self.proc_modifies,
                    &mut self.modified_by_procs,
                )
            };
            if let Some(stmt) = numbers.number_of(&path) {
                for var in &vars {
                    by_var_stmt.entry(var.clone()).or_default().insert(stmt);
                }
                by_stmt.insert(stmt, vars);
            } else if let Some(procedure) = ast.at(&path).filter(|node| node.kind == NodeKind::Procedure) {
                for var in &vars {
                    by_var_proc.entry(var.clone()).or_default().insert(procedure.name.clone());
                }
                by_proc.insert(procedure.name.clone(), vars);
            }
        }
    }

    fn kind_of(&self, stmt: usize) -> Option<NodeKind> {
        stmt.checked_sub(1).and_then(|idx| self.kinds.get(idx)).copied()
    }
}

fn link(target: &mut HashMap<usize, String>, reverse: &mut Index<String, usize>, stmt: usize, name: String) {
    reverse.entry(name.clone()).or_default().insert(stmt);
    target.insert(stmt, name);
}

fn sorted<T: Clone + Ord>(set: Option<&BTreeSet<T>>) -> Vec<T> {
    set.map(|s| s.iter().cloned().collect()).unwrap_or_default()
}

fn keys<K: Clone + Ord, V>(map: &HashMap<K, V>) -> Vec<K> {
    let mut keys: Vec<K> = map.keys().cloned().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_program;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn shareable_across_threads() {
        assert_send_sync::<Pkb>();
    }

    #[test]
    fn call_targets_are_not_variables() {
        let ast = parse_program("procedure p { call q; } procedure q { x = 1; }").unwrap();
        let pkb = Pkb::new(&ast).unwrap();
        assert_eq!(pkb.variables(), vec!["x".to_string()]);
        assert_eq!(pkb.constants(), vec!["1".to_string()]);
    }
}
