use super::types::{Clause, ClauseType};
use crate::config::output::WILDCARD;
use crate::pkb::Pkb;
use std::collections::BTreeSet;

pub type Values = BTreeSet<String>;

/// One clause's relation, seen as a set of (left, right) value pairs over the program.
#[derive(Debug, Clone)]
pub enum Lookup {
    Relation(ClauseType),
    AssignPattern { expr: String, is_sub_expr: bool },
    WhilePattern,
    IfPattern,
}

fn numbers(values: Vec<usize>) -> Values {
    values.into_iter().map(|n| n.to_string()).collect()
}

fn names(values: Vec<String>) -> Values {
    values.into_iter().collect()
}

fn statement(value: &str) -> Option<usize> {
    value.parse().ok()
}

impl Lookup {
    pub fn for_clause(clause: &Clause) -> Option<Self> {
        let lookup = match clause.kind {
            ClauseType::AssignPatternExact => Lookup::AssignPattern {
                expr: clause.pattern.clone(),
                is_sub_expr: false,
            },
            ClauseType::AssignPatternSubExpr => Lookup::AssignPattern {
                expr: clause.pattern.clone(),
                is_sub_expr: true,
            },
            ClauseType::AssignPatternWildcard => Lookup::AssignPattern {
                expr: String::new(),
                is_sub_expr: true,
            },
            ClauseType::WhilePattern => Lookup::WhilePattern,
            ClauseType::IfPattern => Lookup::IfPattern,
            ClauseType::With => return None,
            kind => Lookup::Relation(kind),
        };
        Some(lookup)
    }

    /// Values `r` with `R(left, r)`.
    pub fn right_of(&self, pkb: &Pkb, left: &str) -> Values {
        match self {
            Lookup::Relation(kind) => relation_right(pkb, *kind, left),
            Lookup::AssignPattern { .. } | Lookup::WhilePattern | Lookup::IfPattern => {
                let Some(stmt) = statement(left) else {
                    return Values::new();
                };
                let candidates = match self {
                    Lookup::AssignPattern { .. } => pkb.variables_modified_by_statement(stmt),
                    _ => pkb.condition_variables_of(stmt),
                };
                candidates
                    .into_iter()
                    .filter(|var| self.left_of(pkb, var).contains(left))
                    .collect()
            }
        }
    }

    /// Values `l` with `R(l, right)`.
    pub fn left_of(&self, pkb: &Pkb, right: &str) -> Values {
        match self {
            Lookup::Relation(kind) => relation_left(pkb, *kind, right),
            Lookup::AssignPattern { expr, is_sub_expr } => numbers(pkb.match_assign_pattern(right, expr, *is_sub_expr)),
            Lookup::WhilePattern => numbers(pkb.match_while_pattern(right)),
            Lookup::IfPattern => numbers(pkb.match_if_pattern(right)),
        }
    }

    /// Values `l` with `R(l, _)`.
    pub fn any_left(&self, pkb: &Pkb) -> Values {
        match self {
            Lookup::Relation(kind) => relation_any_left(pkb, *kind),
            _ => self.left_of(pkb, WILDCARD),
        }
    }

    /// Values `r` with `R(_, r)`.
    pub fn any_right(&self, pkb: &Pkb) -> Values {
        match self {
            Lookup::Relation(kind) => relation_any_right(pkb, *kind),
            _ => self
                .any_left(pkb)
                .iter()
                .flat_map(|left| self.right_of(pkb, left))
                .collect(),
        }
    }
}

fn relation_right(pkb: &Pkb, kind: ClauseType, left: &str) -> Values {
    let stmt = statement(left);
    match (kind, stmt) {
        (ClauseType::Follows, Some(s)) => numbers(pkb.follows(s, false)),
        (ClauseType::FollowsT, Some(s)) => numbers(pkb.follows(s, true)),
        (ClauseType::Parent, Some(s)) => numbers(pkb.children_of(s)),
        (ClauseType::ParentT, Some(s)) => numbers(pkb.descendants_of(s)),
        (ClauseType::Next, Some(s)) => numbers(pkb.next(s, false)),
        (ClauseType::NextT, Some(s)) => numbers(pkb.next(s, true)),
        (ClauseType::Affects, Some(s)) => numbers(pkb.affects(s, false)),
        (ClauseType::AffectsT, Some(s)) => numbers(pkb.affects(s, true)),
        (ClauseType::Uses, Some(s)) => names(pkb.variables_used_by_statement(s)),
        (ClauseType::Uses, None) => names(pkb.variables_used_by_procedure(left)),
        (ClauseType::Modifies, Some(s)) => names(pkb.variables_modified_by_statement(s)),
        (ClauseType::Modifies, None) => names(pkb.variables_modified_by_procedure(left)),
        (ClauseType::Calls, None) => names(pkb.procedures_called_by(left, false)),
        (ClauseType::CallsT, None) => names(pkb.procedures_called_by(left, true)),
        _ => Values::new(),
    }
}

fn relation_left(pkb: &Pkb, kind: ClauseType, right: &str) -> Values {
    let stmt = statement(right);
    match (kind, stmt) {
        (ClauseType::Follows, Some(s)) => numbers(pkb.followed_by(s, false)),
        (ClauseType::FollowsT, Some(s)) => numbers(pkb.followed_by(s, true)),
        (ClauseType::Parent, Some(s)) => numbers(pkb.parent_of(s).into_iter().collect()),
        (ClauseType::ParentT, Some(s)) => numbers(pkb.ancestors_of(s)),
        (ClauseType::Next, Some(s)) => numbers(pkb.previous(s, false)),
        (ClauseType::NextT, Some(s)) => numbers(pkb.previous(s, true)),
        (ClauseType::Affects, Some(s)) => numbers(pkb.affected_by(s, false)),
        (ClauseType::AffectsT, Some(s)) => numbers(pkb.affected_by(s, true)),
        (ClauseType::Uses, None) => {
            let mut users = numbers(pkb.statements_using(right));
            users.extend(pkb.procedures_using(right));
            users
        }
        (ClauseType::Modifies, None) => {
            let mut modifiers = numbers(pkb.statements_modifying(right));
            modifiers.extend(pkb.procedures_modifying(right));
            modifiers
        }
        (ClauseType::Calls, None) => names(pkb.procedures_that_call(right, false)),
        (ClauseType::CallsT, None) => names(pkb.procedures_that_call(right, true)),
        _ => Values::new(),
    }
}

fn relation_any_left(pkb: &Pkb, kind: ClauseType) -> Values {
    match kind {
        ClauseType::Follows | ClauseType::FollowsT => numbers(pkb.statements_followed()),
        ClauseType::Parent | ClauseType::ParentT => numbers(pkb.statements_with_children()),
        ClauseType::Next | ClauseType::NextT => numbers(pkb.statements_with_next()),
        ClauseType::Affects | ClauseType::AffectsT => numbers(pkb.statements_that_affect()),
        ClauseType::Uses => {
            let mut users = numbers(pkb.statements_using_some_variable());
            users.extend(pkb.procedures_using_some_variable());
            users
        }
        ClauseType::Modifies => {
            let mut modifiers = numbers(pkb.statements_modifying_some_variable());
            modifiers.extend(pkb.procedures_modifying_some_variable());
            modifiers
        }
        ClauseType::Calls | ClauseType::CallsT => names(pkb.procedures_calling_some()),
        _ => Values::new(),
    }
}

fn relation_any_right(pkb: &Pkb, kind: ClauseType) -> Values {
    match kind {
        ClauseType::Follows | ClauseType::FollowsT => numbers(pkb.statements_that_follow()),
        ClauseType::Parent | ClauseType::ParentT => numbers(pkb.statements_with_parent()),
        ClauseType::Next | ClauseType::NextT => numbers(pkb.statements_with_previous()),
        ClauseType::Affects | ClauseType::AffectsT => numbers(pkb.statements_affected()),
        ClauseType::Uses => pkb
            .statements_using_some_variable()
            .into_iter()
            .flat_map(|s| pkb.variables_used_by_statement(s))
            .collect(),
        ClauseType::Modifies => pkb
            .statements_modifying_some_variable()
            .into_iter()
            .flat_map(|s| pkb.variables_modified_by_statement(s))
            .collect(),
        ClauseType::Calls | ClauseType::CallsT => names(pkb.procedures_called_by_some()),
        _ => Values::new(),
    }
}
