use super::numbering::StatementNumbers;
use crate::ast::{NodeKind, TNode};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

pub type StatementGraph = HashMap<usize, BTreeSet<usize>>;

/// Control-flow successors and predecessors of every statement, within each procedure.
pub fn next_relation(ast: &TNode, numbers: &StatementNumbers) -> (StatementGraph, StatementGraph) {
    let mut next: StatementGraph = HashMap::new();
    // if statement -> (first then, last then, first else, last else)
    let mut branches: BTreeMap<usize, [usize; 4]> = BTreeMap::new();

    ast.walk(&mut |path, node| match node.kind {
        NodeKind::StatementList => {
            for pair in numbers.list_members(ast, path).windows(2) {
                next.entry(pair[0]).or_default().insert(pair[1]);
            }
        }
        NodeKind::While => {
            let Some(stmt) = numbers.number_of(path) else {
                return;
            };
            let body = block(ast, numbers, path, 1);
            if let (Some(&first), Some(&last)) = (body.first(), body.last()) {
                next.entry(stmt).or_default().insert(first);
                next.entry(last).or_default().insert(stmt);
            }
        }
        NodeKind::IfElse => {
            let Some(stmt) = numbers.number_of(path) else {
                return;
            };
            let then_block = block(ast, numbers, path, 1);
            let else_block = block(ast, numbers, path, 2);
            if let (Some(&a), Some(&b), Some(&c), Some(&d)) =
                (then_block.first(), then_block.last(), else_block.first(), else_block.last())
            {
                branches.insert(stmt, [a, b, c, d]);
            }
        }
        _ => {}
    });

    // Ascending order hands an outer if's exits to a nested if before that one is expanded
    for (stmt, [first_then, last_then, first_else, last_else]) in branches {
        let exits = next.remove(&stmt).unwrap_or_default();
        next.entry(last_then).or_default().extend(exits.iter().copied());
        next.entry(last_else).or_default().extend(exits);
        next.insert(stmt, BTreeSet::from([first_then, first_else]));
    }
    next.retain(|_, succ| !succ.is_empty());

    let previous = invert(&next);
    (next, previous)
}

fn block(ast: &TNode, numbers: &StatementNumbers, path: &[usize], child: usize) -> Vec<usize> {
    let mut block_path = path.to_vec();
    block_path.push(child);
    numbers.list_members(ast, &block_path)
}

pub fn invert(graph: &StatementGraph) -> StatementGraph {
    let mut inverse: StatementGraph = HashMap::new();
    for (&from, targets) in graph {
        for &to in targets {
            inverse.entry(to).or_default().insert(from);
        }
    }
    inverse
}

/// Per-statement facts the reaching-definitions pass needs.
pub struct FlowFacts<'a> {
    pub kinds: &'a [NodeKind],
    pub next: &'a StatementGraph,
    pub previous: &'a StatementGraph,
    pub modifies: &'a HashMap<usize, BTreeSet<String>>,
    pub uses: &'a HashMap<usize, BTreeSet<String>>,
}

type Definitions = HashMap<String, BTreeSet<usize>>;

/// Returns `(affects, affected_by)` from a worklist reaching-definitions analysis.
pub fn affects_relation(facts: &FlowFacts) -> (StatementGraph, StatementGraph) {
    let count = facts.kinds.len();
    let kind_of = |stmt: usize| facts.kinds[stmt - 1];
    let empty = BTreeSet::new();
    let modified = |stmt: usize| facts.modifies.get(&stmt).unwrap_or(&empty);

    let mut reaching_in: Vec<Definitions> = vec![HashMap::new(); count + 1];
    let mut reaching_out: Vec<Definitions> = vec![HashMap::new(); count + 1];
    for stmt in 1..=count {
        if kind_of(stmt) == NodeKind::Assign {
            for var in modified(stmt) {
                reaching_out[stmt].insert(var.clone(), BTreeSet::from([stmt]));
            }
        }
    }

    let mut worklist: VecDeque<usize> = (1..=count).collect();
    let mut rounds = 0usize;
    while let Some(stmt) = worklist.pop_front() {
        rounds += 1;
        let mut incoming = Definitions::new();
        for pred in facts.previous.get(&stmt).into_iter().flatten() {
            for (var, defs) in &reaching_out[*pred] {
                incoming.entry(var.clone()).or_default().extend(defs.iter().copied());
            }
        }
        let mut outgoing = incoming.clone();
        let kind = kind_of(stmt);
        if matches!(kind, NodeKind::Assign | NodeKind::Read | NodeKind::Call) {
            for var in modified(stmt) {
                outgoing.remove(var);
            }
        }
        if kind == NodeKind::Assign {
            for var in modified(stmt) {
                outgoing.insert(var.clone(), BTreeSet::from([stmt]));
            }
        }
        reaching_in[stmt] = incoming;
        if outgoing != reaching_out[stmt] {
            reaching_out[stmt] = outgoing;
            worklist.extend(facts.next.get(&stmt).into_iter().flatten().copied());
        }
    }
    debug!("reaching definitions settled after {} visits", rounds);

    let mut affects: StatementGraph = HashMap::new();
    for stmt in 1..=count {
        if kind_of(stmt) != NodeKind::Assign {
            continue;
        }
        for var in facts.uses.get(&stmt).into_iter().flatten() {
            for &source in reaching_in[stmt].get(var).into_iter().flatten() {
                affects.entry(source).or_default().insert(stmt);
            }
        }
    }
    let affected_by = invert(&affects);
    (affects, affected_by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::assign_statement_numbers;
    use crate::frontend::parse_program;
    use test_log::test;

    #[test]
    fn if_branches_rejoin() {
        let src = "procedure p { if (a == 1) then { b = 1; } else { c = 1; d = 2; } e = 3; }";
        let ast = parse_program(src).unwrap();
        let (next, previous) = next_relation(&ast, &assign_statement_numbers(&ast));
        assert_eq!(next[&1], BTreeSet::from([2, 3]));
        assert_eq!(next[&2], BTreeSet::from([5]));
        assert_eq!(next[&4], BTreeSet::from([5]));
        assert_eq!(previous[&5], BTreeSet::from([2, 4]));
        assert!(!next.contains_key(&5));
    }

    #[test]
    fn nested_if_at_end_of_while() {
        let src = "procedure p { while (x > 0) { if (x > 1) then { y = 1; } else { z = 1; } } w = 0; }";
        let ast = parse_program(src).unwrap();
        let (next, _) = next_relation(&ast, &assign_statement_numbers(&ast));
        assert_eq!(next[&1], BTreeSet::from([2, 5]));
        assert_eq!(next[&2], BTreeSet::from([3, 4]));
        assert_eq!(next[&3], BTreeSet::from([1]));
        assert_eq!(next[&4], BTreeSet::from([1]));
    }
}
