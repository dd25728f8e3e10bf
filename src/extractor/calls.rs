use crate::ast::{NodeKind, TNode};
use crate::errors::{SpaError, SpaResult};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct CallGraph {
    /// caller -> direct callees
    pub calls: HashMap<String, BTreeSet<String>>,
    /// Every procedure after all procedures it transitively calls.
    pub order: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Builds caller -> callee edges and a callees-first ordering. Fails on cyclic calls.
pub fn procedure_call_graph(ast: &TNode) -> SpaResult<CallGraph> {
    let mut graph = CallGraph::default();
    for procedure in &ast.children {
        let callees = graph.calls.entry(procedure.name.clone()).or_default();
        procedure.walk(&mut |_, node| {
            if node.kind == NodeKind::Call {
                callees.insert(node.children[0].name.clone());
            }
        });
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for procedure in &ast.children {
        visit(&procedure.name, &graph.calls, &mut marks, &mut graph.order)?;
    }
    Ok(graph)
}

fn visit<'g>(
    name: &'g str,
    calls: &'g HashMap<String, BTreeSet<String>>,
    marks: &mut HashMap<&'g str, Mark>,
    order: &mut Vec<String>,
) -> SpaResult<()> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            return Err(SpaError::semantic_error(format!("cyclic call involving procedure '{}'", name)));
        }
        None => {}
    }
    marks.insert(name, Mark::Visiting);
    if let Some(callees) = calls.get(name) {
        for callee in callees {
            visit(callee, calls, marks, order)?;
        }
    }
    marks.insert(name, Mark::Done);
    order.push(name.to_string());
    Ok(())
}

/// Rejects duplicate procedures, calls to undefined procedures and recursive calls.
pub fn validate_program(ast: &TNode) -> SpaResult<()> {
    let mut seen = HashSet::new();
    for procedure in &ast.children {
        if !seen.insert(procedure.name.as_str()) {
            return Err(SpaError::semantic_error(format!("duplicate procedure '{}'", procedure.name)));
        }
    }
    let mut missing = None;
    ast.walk(&mut |_, node| {
        if node.kind == NodeKind::Call && missing.is_none() && !seen.contains(node.children[0].name.as_str()) {
            missing = Some(node.children[0].name.clone());
        }
    });
    if let Some(name) = missing {
        return Err(SpaError::semantic_error(format!("call to undefined procedure '{}'", name)));
    }
    procedure_call_graph(ast).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_program;
    use test_log::test;

    #[test]
    fn callees_come_first() {
        let ast = parse_program("procedure a { call b; call c; } procedure b { call c; } procedure c { x = 1; }").unwrap();
        let graph = procedure_call_graph(&ast).unwrap();
        assert_eq!(graph.order, vec!["c", "b", "a"]);
    }

    #[test]
    fn rejects_recursion() {
        let ast = parse_program("procedure a { call b; } procedure b { call a; }").unwrap();
        assert!(matches!(validate_program(&ast), Err(SpaError::SemanticError { .. })));
        let ast = parse_program("procedure a { call a; }").unwrap();
        assert!(validate_program(&ast).is_err());
    }

    #[test]
    fn rejects_duplicates_and_missing() {
        let ast = parse_program("procedure a { x = 1; } procedure a { y = 1; }").unwrap();
        assert!(validate_program(&ast).is_err());
        let ast = parse_program("procedure a { call nowhere; }").unwrap();
        assert!(validate_program(&ast).is_err());
    }
}
