use simple_spa::query::{parse_query, ArgType, ClauseType, EntityType, Query, ReturnType};

#[test]
fn test_undeclared_synonym() {
    let query = parse_query("assign a; Select a such that Parent*(w, a)");
    assert_eq!(query, Query::default());
    assert!(query.is_empty());
}

#[test]
fn test_declarations_and_clauses() {
    let query = parse_query(
        "stmt s; assign a, a1; variable v; Select s such that Follows*(s, a) and Modifies(a, v) pattern a1(v, _\"x + 1\"_) with v.varName = \"x\"",
    );
    assert_eq!(query.declarations.len(), 4);
    assert_eq!(query.declarations["a1"], EntityType::Assign);
    assert_eq!(query.returns, vec![(ReturnType::Default, "s".to_string())]);
    let kinds: Vec<ClauseType> = query.clauses.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ClauseType::FollowsT, ClauseType::Modifies, ClauseType::AssignPatternSubExpr, ClauseType::With]
    );
    assert_eq!(query.clauses[2].pattern, "x + 1");
    assert_eq!(query.clauses[3].lhs.kind, ArgType::VarSynonym);
    assert_eq!(query.clauses[3].rhs.kind, ArgType::NameEntity);
}

#[test]
fn test_tuple_and_attributes() {
    let query = parse_query("call c; read r; Select <c.procName, r.varName, r, c.stmt#>");
    assert_eq!(
        query.returns,
        vec![
            (ReturnType::CallProcName, "c".to_string()),
            (ReturnType::ReadVarName, "r".to_string()),
            (ReturnType::Default, "r".to_string()),
            (ReturnType::StmtNo, "c".to_string()),
        ]
    );
}

#[test]
fn test_boolean_select() {
    let query = parse_query("Select BOOLEAN such that Calls(\"p\", _)");
    assert!(query.is_boolean());
    assert!(query.selected_synonyms().is_empty());

    let declared = parse_query("stmt BOOLEAN; Select BOOLEAN");
    assert!(!declared.is_boolean());
}

#[test]
fn test_if_and_while_patterns() {
    let query = parse_query("if ifs; while w; Select ifs pattern ifs(\"x\", _, _) and w(_, _)");
    assert_eq!(query.clauses[0].kind, ClauseType::IfPattern);
    assert_eq!(query.clauses[1].kind, ClauseType::WhilePattern);
    assert!(parse_query("if ifs; Select ifs pattern ifs(\"x\", _)").is_empty());
}

#[test]
fn test_with_prog_line() {
    let query = parse_query("prog_line n; Select n with n = 10");
    assert_eq!(query.clauses[0].lhs.kind, ArgType::StmtSynonym);
    assert_eq!(query.clauses[0].rhs.kind, ArgType::NumEntity);
}

#[test]
fn test_rejected_queries() {
    let rejected = [
        "stmt s; stmt s; Select s",
        "variable v; stmt s; Select s such that Follows(v, s)",
        "variable v; Select v such that Modifies(_, v)",
        "variable v; Select v.procName",
        "stmt s; Select s such that Follows(s, _) extra",
        "stmt s; Select s such that Nexts(s, _)",
        "stmt s; Select s such that Uses*(s, _)",
        "assign a; Select a pattern a(_, \"\")",
        "stmt s Select s",
    ];
    for text in rejected {
        assert!(parse_query(text).is_empty(), "{} was accepted", text);
    }
}

#[test]
fn test_pattern_expression_keeps_token_gaps() {
    let query = parse_query("assign a; Select a pattern a(_, \"1+2 3\")");
    assert_eq!(query.clauses[0].pattern, "1+2 3");
    let query = parse_query("assign a; Select a pattern a(_, _\"a  *(b)\"_)");
    assert_eq!(query.clauses[0].pattern, "a *(b)");
}
