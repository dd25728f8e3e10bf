use super::lookup::{Lookup, Values};
use super::optimizer::optimize;
use super::result_table::ResultTable;
use super::types::{Arg, ArgClass, ArgType, Clause, ClauseType, EntityType, Query, ReturnType};
use crate::config::output::{FALSE, TRUE, TUPLE_SEPARATOR};
use crate::frontend::parse_expression_str;
use crate::pkb::Pkb;
use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Evaluation stops as soon as the query is known to have no answer.
#[derive(Debug)]
struct Unsatisfiable;

type Step = Result<(), Unsatisfiable>;
type Pairs = BTreeSet<(String, String)>;

pub struct QueryEvaluator<'a> {
    pkb: &'a Pkb,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(pkb: &'a Pkb) -> Self {
        Self { pkb }
    }

    /// Answers `query`. Invalid or unsatisfiable queries produce an empty list, or `FALSE` for
    /// `Select BOOLEAN`.
    pub fn evaluate(&self, query: &Query) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }
        let mut state = Evaluation::new(self.pkb, query);
        let outcome = state.run();
        if query.is_boolean() {
            let answer = if outcome.is_ok() { TRUE } else { FALSE };
            return vec![answer.to_string()];
        }
        match outcome.and_then(|_| state.project()) {
            Ok(results) => results,
            Err(Unsatisfiable) => Vec::new(),
        }
    }
}

struct Evaluation<'a, 'q> {
    pkb: &'a Pkb,
    query: &'q Query,
    domains: HashMap<String, Values>,
    // keyed by (smaller, larger) synonym name; pairs are ordered the same way
    constraints: HashMap<(String, String), Pairs>,
}

impl<'a, 'q> Evaluation<'a, 'q> {
    fn new(pkb: &'a Pkb, query: &'q Query) -> Self {
        Self {
            pkb,
            query,
            domains: HashMap::new(),
            constraints: HashMap::new(),
        }
    }

    fn run(&mut self) -> Step {
        let Some(groups) = optimize(&self.query.clauses, &self.query.selected_synonyms()) else {
            return Err(Unsatisfiable);
        };
        let plan: Vec<&Clause> = groups.iter().flatten().collect();
        for clause in &plan {
            self.apply(clause)?;
        }
        // Re-apply until no domain shrinks; narrowing late in the plan can prune earlier clauses
        let mut rounds = 1;
        loop {
            let before = self.domain_sizes();
            for clause in plan.iter().rev() {
                self.apply(clause)?;
            }
            rounds += 1;
            if self.domain_sizes() == before {
                break;
            }
        }
        debug!("query settled after {} round(s)", rounds);
        Ok(())
    }

    fn domain_sizes(&self) -> Vec<(String, usize)> {
        let mut sizes: Vec<(String, usize)> = self.domains.iter().map(|(k, v)| (k.clone(), v.len())).collect();
        sizes.sort();
        sizes
    }

    // Domains

    fn domain(&mut self, synonym: &str) -> &Values {
        if !self.domains.contains_key(synonym) {
            let initial = self.initial_domain(synonym);
            self.domains.insert(synonym.to_string(), initial);
        }
        &self.domains[synonym]
    }

    fn initial_domain(&self, synonym: &str) -> Values {
        let pkb = self.pkb;
        let numbers = |values: Vec<usize>| -> Values { values.into_iter().map(|n| n.to_string()).collect() };
        match self.query.declarations.get(synonym) {
            Some(EntityType::Stmt) | Some(EntityType::ProgLine) => numbers(pkb.statements()),
            Some(EntityType::Read) => numbers(pkb.reads()),
            Some(EntityType::Print) => numbers(pkb.prints()),
            Some(EntityType::Call) => numbers(pkb.calls()),
            Some(EntityType::While) => numbers(pkb.whiles()),
            Some(EntityType::If) => numbers(pkb.ifs()),
            Some(EntityType::Assign) => numbers(pkb.assigns()),
            Some(EntityType::Variable) => pkb.variables().into_iter().collect(),
            Some(EntityType::Constant) => pkb.constants().into_iter().collect(),
            Some(EntityType::Procedure) => pkb.procedures().into_iter().collect(),
            None => Values::new(),
        }
    }

    /// Shrinks a domain to its intersection with `allowed`, then propagates through constraints.
    fn narrow(&mut self, synonym: &str, allowed: &Values) -> Step {
        self.domain(synonym);
        let changed = match self.domains.get_mut(synonym) {
            Some(domain) => {
                let before = domain.len();
                domain.retain(|value| allowed.contains(value));
                domain.len() != before
            }
            None => false,
        };
        if changed {
            debug!("{} narrowed to {} candidate(s)", synonym, self.domains[synonym].len());
        }
        if self.domains[synonym].is_empty() {
            return Err(Unsatisfiable);
        }
        if changed {
            self.settle()?;
        }
        Ok(())
    }

    fn retain(&mut self, synonym: &str, keep: impl Fn(&str) -> bool) -> Step {
        let allowed: Values = self.domain(synonym).iter().filter(|v| keep(v)).cloned().collect();
        self.narrow(synonym, &allowed)
    }

    // Pairwise constraints

    fn constrain(&mut self, first: &str, second: &str, pairs: Pairs) -> Step {
        let (key, pairs) = if first <= second {
            ((first.to_string(), second.to_string()), pairs)
        } else {
            let flipped = pairs.into_iter().map(|(a, b)| (b, a)).collect();
            ((second.to_string(), first.to_string()), flipped)
        };
        let merged = match self.constraints.remove(&key) {
            Some(existing) => existing.intersection(&pairs).cloned().collect(),
            None => pairs,
        };
        self.constraints.insert(key, merged);
        self.settle()
    }

    // Filters every constraint to the live domains and every domain to its constraints, until stable.
    fn settle(&mut self) -> Step {
        loop {
            let mut changed = false;
            let keys: Vec<(String, String)> = self.constraints.keys().cloned().collect();
            for key in keys {
                let (a, b) = (&key.0, &key.1);
                self.domain(a);
                self.domain(b);
                let Some(pairs) = self.constraints.get_mut(&key) else {
                    continue;
                };
                let (dom_a, dom_b) = (&self.domains[a], &self.domains[b]);
                let before = pairs.len();
                pairs.retain(|(x, y)| dom_a.contains(x) && dom_b.contains(y));
                changed |= pairs.len() != before;
                let firsts: Values = pairs.iter().map(|(x, _)| x.clone()).collect();
                let seconds: Values = pairs.iter().map(|(_, y)| y.clone()).collect();
                for (synonym, allowed) in [(a, firsts), (b, seconds)] {
                    if let Some(domain) = self.domains.get_mut(synonym) {
                        let before = domain.len();
                        domain.retain(|value| allowed.contains(value));
                        changed |= domain.len() != before;
                        if domain.is_empty() {
                            return Err(Unsatisfiable);
                        }
                    }
                }
            }
            if !changed {
                return Ok(());
            }
        }
    }

    // Clauses

    fn apply(&mut self, clause: &Clause) -> Step {
        if clause.kind == ClauseType::With {
            return self.apply_with(clause);
        }
        if matches!(clause.kind, ClauseType::AssignPatternExact | ClauseType::AssignPatternSubExpr)
            && parse_expression_str(&clause.pattern).is_err()
        {
            debug!("invalid pattern expression in {}", clause);
            return Err(Unsatisfiable);
        }
        let Some(lookup) = Lookup::for_clause(clause) else {
            return Err(Unsatisfiable);
        };
        let pkb = self.pkb;
        let (lhs, rhs) = (&clause.lhs, &clause.rhs);
        match (lhs.class(), rhs.class()) {
            (ArgClass::Invalid, _) | (_, ArgClass::Invalid) => Err(Unsatisfiable),
            (ArgClass::Entity, ArgClass::Entity) => check(lookup.right_of(pkb, &lhs.value).contains(&rhs.value)),
            (ArgClass::Entity, ArgClass::Wildcard) => check(!lookup.right_of(pkb, &lhs.value).is_empty()),
            (ArgClass::Wildcard, ArgClass::Entity) => check(!lookup.left_of(pkb, &rhs.value).is_empty()),
            (ArgClass::Wildcard, ArgClass::Wildcard) => check(!lookup.any_left(pkb).is_empty()),
            (ArgClass::Synonym, ArgClass::Entity) => self.narrow(&lhs.value, &lookup.left_of(pkb, &rhs.value)),
            (ArgClass::Entity, ArgClass::Synonym) => self.narrow(&rhs.value, &lookup.right_of(pkb, &lhs.value)),
            (ArgClass::Synonym, ArgClass::Wildcard) => self.narrow(&lhs.value, &lookup.any_left(pkb)),
            (ArgClass::Wildcard, ArgClass::Synonym) => self.narrow(&rhs.value, &lookup.any_right(pkb)),
            (ArgClass::Synonym, ArgClass::Synonym) => self.apply_pair(&lookup, &lhs.value, &rhs.value),
        }
    }

    fn apply_pair(&mut self, lookup: &Lookup, first: &str, second: &str) -> Step {
        let pkb = self.pkb;
        if first == second {
            return self.retain(first, |value| lookup.right_of(pkb, value).contains(value));
        }
        let lefts: Vec<String> = self.domain(first).iter().cloned().collect();
        let rights = self.domain(second).clone();
        let mut pairs = Pairs::new();
        for left in lefts {
            for right in lookup.right_of(pkb, &left).intersection(&rights) {
                pairs.insert((left.clone(), right.clone()));
            }
        }
        self.constrain(first, second, pairs)
    }

    fn apply_with(&mut self, clause: &Clause) -> Step {
        let (lhs, rhs) = (&clause.lhs, &clause.rhs);
        match (lhs.kind.is_name_valued(), rhs.kind.is_name_valued()) {
            (Some(a), Some(b)) if a == b => {}
            _ => {
                debug!("type mismatch in {}", clause);
                return Err(Unsatisfiable);
            }
        }
        match (lhs.class(), rhs.class()) {
            (ArgClass::Entity, ArgClass::Entity) => check(lhs.value == rhs.value),
            (ArgClass::Synonym, ArgClass::Entity) => self.apply_with_value(lhs, &rhs.value),
            (ArgClass::Entity, ArgClass::Synonym) => self.apply_with_value(rhs, &lhs.value),
            (ArgClass::Synonym, ArgClass::Synonym) => self.apply_with_pair(lhs, rhs),
            _ => Err(Unsatisfiable),
        }
    }

    fn apply_with_value(&mut self, arg: &Arg, value: &str) -> Step {
        let pkb = self.pkb;
        self.retain(&arg.value, |candidate| attribute(pkb, arg.kind, candidate).as_deref() == Some(value))
    }

    fn apply_with_pair(&mut self, lhs: &Arg, rhs: &Arg) -> Step {
        let pkb = self.pkb;
        if lhs.value == rhs.value {
            return self.retain(&lhs.value, |candidate| {
                attribute(pkb, lhs.kind, candidate) == attribute(pkb, rhs.kind, candidate)
            });
        }
        let mut by_value: HashMap<String, Vec<String>> = HashMap::new();
        for candidate in self.domain(&rhs.value).clone() {
            if let Some(value) = attribute(pkb, rhs.kind, &candidate) {
                by_value.entry(value).or_default().push(candidate);
            }
        }
        let mut pairs = Pairs::new();
        for candidate in self.domain(&lhs.value).clone() {
            let Some(value) = attribute(pkb, lhs.kind, &candidate) else {
                continue;
            };
            for other in by_value.get(&value).into_iter().flatten() {
                pairs.insert((candidate.clone(), other.clone()));
            }
        }
        self.constrain(&lhs.value, &rhs.value, pairs)
    }

    // Projection

    fn project(&mut self) -> Result<Vec<String>, Unsatisfiable> {
        let query = self.query;
        let mut results: Vec<String> = if let [(kind, synonym)] = query.returns.as_slice() {
            let pkb = self.pkb;
            let values: BTreeSet<String> = self
                .domain(synonym)
                .iter()
                .filter_map(|candidate| projection(pkb, *kind, candidate))
                .collect();
            values.into_iter().collect()
        } else {
            self.project_tuples()?
        };
        results.sort_by(|a, b| compare_values(a, b));
        Ok(results)
    }

    fn project_tuples(&mut self) -> Result<Vec<String>, Unsatisfiable> {
        let query = self.query;
        let selected: Vec<String> = {
            let mut seen = HashSet::new();
            query
                .returns
                .iter()
                .map(|(_, synonym)| synonym.clone())
                .filter(|synonym| seen.insert(synonym.clone()))
                .collect()
        };

        // Every synonym linked to a selected one through some constraint joins the table
        let mut involved: HashSet<String> = selected.iter().cloned().collect();
        loop {
            let before = involved.len();
            for (a, b) in self.constraints.keys() {
                if involved.contains(a) || involved.contains(b) {
                    involved.insert(a.clone());
                    involved.insert(b.clone());
                }
            }
            if involved.len() == before {
                break;
            }
        }

        let mut pending: Vec<(String, String)> = self
            .constraints
            .keys()
            .filter(|(a, _)| involved.contains(a))
            .cloned()
            .collect();
        pending.sort();
        let mut table = ResultTable::default();
        while !pending.is_empty() {
            let idx = pending
                .iter()
                .position(|(a, b)| table.contains(a) || table.contains(b))
                .unwrap_or(0);
            let key = pending.remove(idx);
            let pairs = self.constraints[&key].clone();
            if !table.merge(ResultTable::from_pairs(&key.0, &key.1, pairs)) {
                return Err(Unsatisfiable);
            }
        }
        for synonym in &selected {
            let values = self.domain(synonym).clone();
            if !table.merge(ResultTable::from_values(synonym, values)) {
                return Err(Unsatisfiable);
            }
        }

        let columns: Vec<&str> = query.returns.iter().map(|(_, s)| s.as_str()).collect();
        let Some(rows) = table.tuples(&columns) else {
            return Err(Unsatisfiable);
        };
        let mut results = BTreeSet::new();
        for row in rows {
            let projected: Option<Vec<String>> = query
                .returns
                .iter()
                .zip(row.iter())
                .map(|((kind, _), value)| projection(self.pkb, *kind, value))
                .collect();
            if let Some(projected) = projected {
                results.insert(projected.join(TUPLE_SEPARATOR));
            }
        }
        Ok(results.into_iter().collect())
    }
}

fn check(holds: bool) -> Step {
    if holds {
        Ok(())
    } else {
        Err(Unsatisfiable)
    }
}

/// Value of the attribute `kind` reads from `candidate`.
fn attribute(pkb: &Pkb, kind: ArgType, candidate: &str) -> Option<String> {
    let stmt = || candidate.parse::<usize>().ok();
    match kind {
        ArgType::CallToProc => stmt().and_then(|s| pkb.procedure_called_at(s)).map(str::to_string),
        ArgType::ReadToVar => stmt().and_then(|s| pkb.variable_read_at(s)).map(str::to_string),
        ArgType::PrintToVar => stmt().and_then(|s| pkb.variable_printed_at(s)).map(str::to_string),
        _ => Some(candidate.to_string()),
    }
}

fn projection(pkb: &Pkb, kind: ReturnType, candidate: &str) -> Option<String> {
    match kind {
        ReturnType::CallProcName => attribute(pkb, ArgType::CallToProc, candidate),
        ReturnType::ReadVarName => attribute(pkb, ArgType::ReadToVar, candidate),
        ReturnType::PrintVarName => attribute(pkb, ArgType::PrintToVar, candidate),
        _ => Some(candidate.to_string()),
    }
}

// Numbers sort numerically, names lexically
fn compare_values(a: &str, b: &str) -> Ordering {
    let key = |s: &str| s.split(TUPLE_SEPARATOR).map(|part| (part.parse::<u64>().ok(), part.to_string())).collect::<Vec<_>>();
    key(a).cmp(&key(b))
}
