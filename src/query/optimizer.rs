use super::types::{ArgClass, Clause};
use log::debug;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// Clauses evaluated together, in order.
pub type ClauseGroup = Vec<Clause>;

/// A set of clauses over one synonym (entity edge) or one unordered synonym pair.
#[derive(Debug, Clone)]
struct ClauseEdge {
    is_entity: bool,
    weight: u32,
    clauses: Vec<Clause>,
    ends: (String, String),
    signature: String,
}

impl ClauseEdge {
    fn new(is_entity: bool, ends: (String, String), signature: String) -> Self {
        Self {
            is_entity,
            weight: 0,
            clauses: Vec::new(),
            ends,
            signature,
        }
    }

    fn push(&mut self, clause: Clause) {
        self.weight += clause.kind.weight();
        self.clauses.push(clause);
    }

    // Smaller sorts first: entity edges, then fewer clauses, then lighter ones
    fn priority(&self) -> (bool, usize, u32, &str) {
        (!self.is_entity, self.clauses.len(), self.weight, self.signature.as_str())
    }
}

impl PartialEq for ClauseEdge {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for ClauseEdge {}

impl PartialOrd for ClauseEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClauseEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.signature == other.signature {
            return Ordering::Equal;
        }
        self.priority().cmp(&other.priority())
    }
}

fn pair_signature(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

/// Groups clauses by connected synonyms and orders them for evaluation.
///
/// Clauses without synonyms come first, one group each. The remaining groups are ordered so
/// those touching a `selected` synonym come first, then by ascending clause count. Within a group
/// clauses follow a cheapest-edge-first traversal of the synonym graph.
/// Returns `None` when a clause carries an invalid argument.
pub fn optimize(clauses: &[Clause], selected: &HashSet<String>) -> Option<Vec<ClauseGroup>> {
    let mut fixed_groups: Vec<ClauseGroup> = Vec::new();
    let mut edges: HashMap<String, ClauseEdge> = HashMap::new();
    let mut adjacency: HashMap<String, BTreeSet<String>> = HashMap::new();

    for clause in clauses {
        let (lhs, rhs) = (clause.lhs.class(), clause.rhs.class());
        if lhs == ArgClass::Invalid || rhs == ArgClass::Invalid {
            debug!("no plan: invalid argument in {}", clause);
            return None;
        }
        let (ends, is_entity, signature) = match (lhs, rhs) {
            (ArgClass::Synonym, ArgClass::Synonym) => {
                let (a, b) = (clause.lhs.value.clone(), clause.rhs.value.clone());
                let signature = pair_signature(&a, &b);
                ((a, b), false, signature)
            }
            (ArgClass::Synonym, _) => {
                let a = clause.lhs.value.clone();
                ((a.clone(), a), true, format!("hash_{}", clause))
            }
            (_, ArgClass::Synonym) => {
                let b = clause.rhs.value.clone();
                ((b.clone(), b), true, format!("hash_{}", clause))
            }
            _ => {
                fixed_groups.push(vec![clause.clone()]);
                continue;
            }
        };
        for end in [&ends.0, &ends.1] {
            adjacency.entry(end.clone()).or_default().insert(signature.clone());
        }
        let edge = edges
            .entry(signature.clone())
            .or_insert_with(|| ClauseEdge::new(is_entity, ends, signature));
        if !edge.clauses.contains(clause) {
            edge.push(clause.clone());
        }
    }

    let mut groups: Vec<(bool, ClauseGroup)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut vertices: Vec<&String> = adjacency.keys().collect();
    vertices.sort();
    for vertex in vertices {
        if seen.contains(vertex) {
            continue;
        }
        let component = collect_component(vertex, &adjacency, &edges, &mut seen);
        let has_selected = component.iter().any(|v| selected.contains(v));
        let group = sort_group(&component, &adjacency, &edges);
        groups.push((has_selected, group));
    }
    groups.sort_by_key(|(has_selected, group)| (!*has_selected, group.len()));

    let plan: Vec<ClauseGroup> = fixed_groups
        .into_iter()
        .chain(groups.into_iter().map(|(_, group)| group))
        .collect();
    debug!("planned {} clause group(s)", plan.len());
    Some(plan)
}

// Depth-first collection of every synonym connected to `start`.
fn collect_component(
    start: &str,
    adjacency: &HashMap<String, BTreeSet<String>>,
    edges: &HashMap<String, ClauseEdge>,
    seen: &mut HashSet<String>,
) -> Vec<String> {
    let mut component = Vec::new();
    let mut stack = vec![start.to_string()];
    seen.insert(start.to_string());
    while let Some(vertex) = stack.pop() {
        for signature in adjacency.get(&vertex).into_iter().flatten() {
            let Some(edge) = edges.get(signature) else {
                continue;
            };
            for end in [&edge.ends.0, &edge.ends.1] {
                if seen.insert(end.clone()) {
                    stack.push(end.clone());
                }
            }
        }
        component.push(vertex);
    }
    component
}

// Emits the clauses of a component starting at its best edge, always expanding the best edge next.
fn sort_group(
    component: &[String],
    adjacency: &HashMap<String, BTreeSet<String>>,
    edges: &HashMap<String, ClauseEdge>,
) -> ClauseGroup {
    let mut group = ClauseGroup::new();
    let start = component
        .iter()
        .flat_map(|v| adjacency.get(v).into_iter().flatten())
        .filter_map(|signature| edges.get(signature))
        .min();
    let Some(start) = start else {
        return group;
    };

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut reached: HashSet<&str> = HashSet::new();
    let mut queue = BinaryHeap::new();
    queue.push(Reverse(start));
    while let Some(Reverse(edge)) = queue.pop() {
        if !emitted.insert(edge.signature.as_str()) {
            continue;
        }
        group.extend(edge.clauses.iter().cloned());
        for end in [&edge.ends.0, &edge.ends.1] {
            if !reached.insert(end.as_str()) {
                continue;
            }
            for signature in adjacency.get(end).into_iter().flatten() {
                if let Some(next) = edges.get(signature) {
                    if !emitted.contains(next.signature.as_str()) {
                        queue.push(Reverse(next));
                    }
                }
            }
        }
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::{Arg, ArgType, ClauseType};
    use test_log::test;

    fn syn(name: &str) -> Arg {
        Arg::new(ArgType::StmtSynonym, name)
    }

    #[test]
    fn merges_clauses_on_the_same_pair() {
        let clauses = vec![
            Clause::new(ClauseType::Follows, syn("a"), syn("b")),
            Clause::new(ClauseType::Parent, syn("b"), syn("a")),
        ];
        let plan = optimize(&clauses, &HashSet::new()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].len(), 2);
    }

    #[test]
    fn invalid_argument_has_no_plan() {
        let clauses = vec![Clause::new(ClauseType::Follows, syn("a"), Arg::new(ArgType::Invalid, "?"))];
        assert!(optimize(&clauses, &HashSet::new()).is_none());
    }
}
