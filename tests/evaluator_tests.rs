use simple_spa::errors::SpaResult;
use simple_spa::pkb::Pkb;
use simple_spa::query::{parse_query, QueryEvaluator};
use simple_spa::{analyze, evaluate_query};

const SOURCE: &str = "procedure main {
    read x;
    y = x + 1;
    while (y > 0) {
        y = y - 1;
        call helper;
    }
    if (x == y) then {
        print y;
    } else {
        z = x * 2 + y;
    }
    print z;
}
procedure helper {
    w = 3;
    read v;
}";

fn answers(pkb: &Pkb, query: &str) -> Vec<String> {
    evaluate_query(pkb, query)
}

#[test]
fn test_undeclared_synonym_has_no_answer() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert!(answers(&pkb, "assign a; Select a such that Parent*(w, a)").is_empty());
    Ok(())
}

#[test]
fn test_entity_selects() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert_eq!(answers(&pkb, "procedure p; Select p"), vec!["helper", "main"]);
    assert_eq!(answers(&pkb, "read r; Select r"), vec!["1", "11"]);
    assert_eq!(answers(&pkb, "read r; Select r.varName"), vec!["v", "x"]);
    assert_eq!(answers(&pkb, "call c; Select c.procName"), vec!["helper"]);
    assert_eq!(answers(&pkb, "stmt s; Select s such that Follows*(1, s)"), vec!["2", "3", "6", "9"]);
    Ok(())
}

#[test]
fn test_relations_with_literals() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert_eq!(answers(&pkb, "stmt s; Select s such that Parent(3, s)"), vec!["4", "5"]);
    assert_eq!(answers(&pkb, "stmt s; Select s such that Modifies(s, \"w\")"), vec!["3", "5", "10"]);
    assert_eq!(answers(&pkb, "procedure p; Select p such that Uses(p, \"x\")"), vec!["main"]);
    assert_eq!(answers(&pkb, "procedure p; Select p such that Calls(p, _)"), vec!["main"]);
    assert_eq!(answers(&pkb, "stmt s; Select s such that Next(s, 9)"), vec!["7", "8"]);
    assert_eq!(answers(&pkb, "assign a; Select a such that Affects(2, a)"), vec!["4", "8"]);
    assert_eq!(answers(&pkb, "variable v; Select v such that Uses(6, v)"), vec!["x", "y"]);
    Ok(())
}

#[test]
fn test_patterns() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert_eq!(answers(&pkb, "assign a; Select a pattern a(\"y\", _)"), vec!["2", "4"]);
    assert_eq!(answers(&pkb, "assign a; Select a pattern a(_, _\"x * 2\"_)"), vec!["8"]);
    assert_eq!(answers(&pkb, "assign a; Select a pattern a(_, \"x * 2 + y\")"), vec!["8"]);
    assert!(answers(&pkb, "assign a; Select a pattern a(_, \"x * 2\")").is_empty());
    assert_eq!(answers(&pkb, "assign a; variable v; Select v pattern a(v, _\"1\"_)"), vec!["y"]);
    assert_eq!(answers(&pkb, "while w; variable v; Select v pattern w(v, _)"), vec!["y"]);
    assert_eq!(answers(&pkb, "if ifs; Select ifs pattern ifs(\"x\", _, _)"), vec!["6"]);
    Ok(())
}

#[test]
fn test_with_clauses() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert_eq!(answers(&pkb, "stmt s; Select s with s.stmt# = 4"), vec!["4"]);
    assert_eq!(answers(&pkb, "read r; Select r with r.varName = \"v\""), vec!["11"]);
    assert_eq!(answers(&pkb, "procedure p; call c; Select p with p.procName = c.procName"), vec!["helper"]);
    assert_eq!(answers(&pkb, "prog_line n; Select n such that Next(n, 4) with n = 3"), vec!["3"]);
    assert!(answers(&pkb, "variable v; Select v with v.varName = 3").is_empty());
    assert!(answers(&pkb, "stmt s; Select s with 1 = 2").is_empty());
    assert_eq!(answers(&pkb, "stmt s; Select s with \"a\" = \"a\" such that Parent(6, s)"), vec!["7", "8"]);
    Ok(())
}

#[test]
fn test_tuples() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert_eq!(
        answers(&pkb, "assign a; variable v; Select <a, v> such that Modifies(a, v) pattern a(v, _\"1\"_)"),
        vec!["2 y", "4 y"]
    );
    assert_eq!(
        answers(&pkb, "stmt s1, s2; Select <s1, s2> such that Parent(s1, s2) and Follows(s2, _)"),
        vec!["3 4"]
    );
    assert_eq!(answers(&pkb, "read r; call c; Select <r, c.procName>"), vec!["1 helper", "11 helper"]);
    assert_eq!(
        answers(&pkb, "stmt s1, s2, s3; Select <s1, s3> such that Follows(s1, s2) and Follows(s2, s3) with s1.stmt# = 1"),
        vec!["1 3"]
    );
    Ok(())
}

#[test]
fn test_boolean() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    assert_eq!(answers(&pkb, "Select BOOLEAN such that Calls(\"main\", \"helper\")"), vec!["TRUE"]);
    assert_eq!(answers(&pkb, "Select BOOLEAN such that Calls(\"helper\", \"main\")"), vec!["FALSE"]);
    assert_eq!(answers(&pkb, "Select BOOLEAN such that Next*(4, 4) and Affects(4, 4)"), vec!["TRUE"]);
    assert_eq!(answers(&pkb, "stmt s; Select BOOLEAN such that Follows(s, s)"), vec!["FALSE"]);
    assert_eq!(answers(&pkb, "Select BOOLEAN"), vec!["TRUE"]);
    assert!(answers(&pkb, "Select BOOLEAN such that Follows(v, 1)").is_empty());
    Ok(())
}

#[test]
fn test_adding_clauses_only_narrows() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    let broad = answers(&pkb, "stmt s; Select s such that Next*(1, s)");
    let narrow = answers(&pkb, "stmt s; Select s such that Next*(1, s) and Parent(_, s)");
    let narrower = answers(&pkb, "stmt s; assign a; Select s such that Next*(1, s) and Parent(_, s) and Modifies(s, \"y\")");
    assert!(narrow.iter().all(|s| broad.contains(s)));
    assert!(narrower.iter().all(|s| narrow.contains(s)));
    assert_eq!(narrower, vec!["4"]);
    Ok(())
}

#[test]
fn test_evaluators_share_a_knowledge_base() -> SpaResult<()> {
    let pkb = analyze(SOURCE)?;
    let queries = [
        "stmt s; Select s such that Follows(s, 3)",
        "variable v; Select v such that Modifies(\"helper\", v)",
        "assign a; Select a such that Affects*(2, a)",
    ];
    let results: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = queries
            .iter()
            .map(|text| {
                let pkb = &pkb;
                scope.spawn(move || QueryEvaluator::new(pkb).evaluate(&parse_query(text)))
            })
            .collect();
        handles.into_iter().filter_map(|h| h.join().ok()).collect()
    });
    assert_eq!(results, vec![vec!["2".to_string()], vec!["v".to_string(), "w".to_string()], vec!["4".to_string(), "8".to_string()]]);
    Ok(())
}

#[test]
fn test_pattern_tokens_keep_their_spacing() -> SpaResult<()> {
    let pkb = analyze("procedure p { x = 1 + 23; y = ab; }")?;
    assert_eq!(answers(&pkb, "assign a; Select a pattern a(_, \"1 + 23\")"), vec!["1"]);
    assert_eq!(answers(&pkb, "assign a; Select a pattern a(_, _\"ab\"_)"), vec!["2"]);
    assert!(answers(&pkb, "assign a; Select a pattern a(_, \"1 + 2 3\")").is_empty());
    assert!(answers(&pkb, "assign a; Select a pattern a(_, _\"a b\"_)").is_empty());
    Ok(())
}
