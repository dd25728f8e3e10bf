use simple_spa::ast::NodeKind;
use simple_spa::errors::{SpaError, SpaResult};
use simple_spa::extractor::{
    assign_statement_numbers, follow_relation, modifies_mapping, parent_relation, patterns_map, procedure_call_graph,
    uses_mapping, validate_program,
};
use simple_spa::frontend::parse_program;
use std::collections::BTreeSet;

const NESTED: &str = "procedure p {
    while (y == 3) { a = 1; }
    if (a > b) then { c = 2; } else { d = 3; }
    b = 2;
}";

#[test]
fn test_statement_numbers_are_contiguous() -> SpaResult<()> {
    let ast = parse_program(NESTED)?;
    let numbers = assign_statement_numbers(&ast);
    assert_eq!(numbers.len(), 6);
    let kinds: Vec<NodeKind> = (1..=6)
        .filter_map(|n| numbers.path_of(n).and_then(|path| ast.at(path)))
        .map(|node| node.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![NodeKind::While, NodeKind::Assign, NodeKind::IfElse, NodeKind::Assign, NodeKind::Assign, NodeKind::Assign]
    );
    for n in 1..=6 {
        let path = numbers.path_of(n).cloned().unwrap_or_default();
        assert_eq!(numbers.number_of(&path), Some(n));
    }
    Ok(())
}

#[test]
fn test_follows_and_parent() -> SpaResult<()> {
    let ast = parse_program(NESTED)?;
    let numbers = assign_statement_numbers(&ast);
    let (follows, followed_by) = follow_relation(&ast, &numbers);
    assert_eq!(follows.get(&1), Some(&3));
    assert_eq!(follows.get(&3), Some(&6));
    assert_eq!(follows.get(&2), None);
    assert_eq!(follows.get(&4), None);
    for (a, b) in &follows {
        assert_eq!(followed_by.get(b), Some(a));
    }

    let (parent_of, children_of) = parent_relation(&ast, &numbers);
    assert_eq!(parent_of.get(&2), Some(&1));
    assert_eq!(parent_of.get(&4), Some(&3));
    assert_eq!(parent_of.get(&5), Some(&3));
    assert_eq!(children_of.get(&3), Some(&BTreeSet::from([4, 5])));
    assert!(!parent_of.contains_key(&6));
    Ok(())
}

#[test]
fn test_uses_and_modifies_through_calls() -> SpaResult<()> {
    let ast = parse_program("procedure a { call b; x = y; } procedure b { read z; print w; }")?;
    let graph = procedure_call_graph(&ast)?;
    assert_eq!(graph.order, vec!["b".to_string(), "a".to_string()]);

    let uses = uses_mapping(&ast, &graph);
    let modifies = modifies_mapping(&ast, &graph);
    let call_path = vec![0, 0, 0];
    assert_eq!(uses[&call_path], BTreeSet::from(["w".to_string()]));
    assert_eq!(modifies[&call_path], BTreeSet::from(["z".to_string()]));
    let procedure_a = vec![0];
    assert_eq!(uses[&procedure_a], BTreeSet::from(["w".to_string(), "y".to_string()]));
    assert_eq!(modifies[&procedure_a], BTreeSet::from(["x".to_string(), "z".to_string()]));
    Ok(())
}

#[test]
fn test_pattern_index() -> SpaResult<()> {
    let ast = parse_program("procedure p { x = (a + b) * c; }")?;
    let index = patterns_map(&ast, &assign_statement_numbers(&ast));
    let whole = &index["((a+b)*c)"];
    assert_eq!(whole.len(), 1);
    assert!(!whole[0].is_sub_expr);
    assert_eq!(whole[0].assignee, "x");
    assert!(index["(a+b)"][0].is_sub_expr);
    assert!(!index.contains_key("(b*c)"));
    Ok(())
}

#[test]
fn test_invalid_programs() -> SpaResult<()> {
    let duplicate = parse_program("procedure p { x = 1; } procedure p { y = 1; }")?;
    assert!(matches!(validate_program(&duplicate), Err(SpaError::SemanticError { .. })));

    let undefined = parse_program("procedure p { call q; }")?;
    assert!(matches!(validate_program(&undefined), Err(SpaError::SemanticError { .. })));

    let cyclic = parse_program("procedure p { call q; } procedure q { call p; }")?;
    assert!(matches!(validate_program(&cyclic), Err(SpaError::SemanticError { .. })));

    let recursive = parse_program("procedure p { call p; }")?;
    assert!(validate_program(&recursive).is_err());
    Ok(())
}
