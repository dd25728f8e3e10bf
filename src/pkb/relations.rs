use super::{keys, sorted, Pkb};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::Hash;

/// Every node reachable from `start` in one or more steps, in ascending order.
fn reachable<T>(graph: &HashMap<T, BTreeSet<T>>, start: &T) -> Vec<T>
where
    T: Clone + Ord + Hash,
{
    let mut visited = BTreeSet::new();
    let mut queue: VecDeque<&T> = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for succ in graph.get(node).into_iter().flatten() {
            if visited.insert(succ.clone()) {
                queue.push_back(succ);
            }
        }
    }
    visited.into_iter().collect()
}

fn related<T>(graph: &HashMap<T, BTreeSet<T>>, start: &T, transitive: bool) -> Vec<T>
where
    T: Clone + Ord + Hash,
{
    if transitive {
        reachable(graph, start)
    } else {
        sorted(graph.get(start))
    }
}

fn chain(map: &HashMap<usize, usize>, start: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = start;
    while let Some(&next) = map.get(&current) {
        path.push(next);
        current = next;
    }
    path
}

impl Pkb {
    // Follows

    /// Statements that follow `stmt` directly, or transitively.
    pub fn follows(&self, stmt: usize, transitive: bool) -> Vec<usize> {
        if transitive {
            chain(&self.follows, stmt)
        } else {
            self.follows.get(&stmt).copied().into_iter().collect()
        }
    }

    /// Statements that `stmt` follows directly, or transitively.
    pub fn followed_by(&self, stmt: usize, transitive: bool) -> Vec<usize> {
        if transitive {
            let mut before = chain(&self.followed_by, stmt);
            before.reverse();
            before
        } else {
            self.followed_by.get(&stmt).copied().into_iter().collect()
        }
    }

    /// Statements that follow some statement.
    pub fn statements_that_follow(&self) -> Vec<usize> {
        keys(&self.followed_by)
    }

    /// Statements that some statement follows.
    pub fn statements_followed(&self) -> Vec<usize> {
        keys(&self.follows)
    }

    // Parent

    pub fn parent_of(&self, stmt: usize) -> Option<usize> {
        self.parent_of.get(&stmt).copied()
    }

    pub fn children_of(&self, stmt: usize) -> Vec<usize> {
        sorted(self.children_of.get(&stmt))
    }

    pub fn ancestors_of(&self, stmt: usize) -> Vec<usize> {
        let mut ancestors = chain(&self.parent_of, stmt);
        ancestors.sort_unstable();
        ancestors
    }

    pub fn descendants_of(&self, stmt: usize) -> Vec<usize> {
        reachable(&self.children_of, &stmt)
    }

    pub fn statements_with_parent(&self) -> Vec<usize> {
        keys(&self.parent_of)
    }

    pub fn statements_with_children(&self) -> Vec<usize> {
        keys(&self.children_of)
    }

    // Uses

    pub fn variables_used_by_statement(&self, stmt: usize) -> Vec<String> {
        sorted(self.stmt_uses.get(&stmt))
    }

    pub fn variables_used_by_procedure(&self, procedure: &str) -> Vec<String> {
        sorted(self.proc_uses.get(procedure))
    }

    pub fn statements_using(&self, variable: &str) -> Vec<usize> {
        sorted(self.used_by_stmts.get(variable))
    }

    pub fn procedures_using(&self, variable: &str) -> Vec<String> {
        sorted(self.used_by_procs.get(variable))
    }

    pub fn statements_using_some_variable(&self) -> Vec<usize> {
        keys(&self.stmt_uses)
    }

    pub fn procedures_using_some_variable(&self) -> Vec<String> {
        keys(&self.proc_uses)
    }

    // Modifies

    pub fn variables_modified_by_statement(&self, stmt: usize) -> Vec<String> {
        sorted(self.stmt_modifies.get(&stmt))
    }

    pub fn variables_modified_by_procedure(&self, procedure: &str) -> Vec<String> {
        sorted(self.proc_modifies.get(procedure))
    }

    pub fn statements_modifying(&self, variable: &str) -> Vec<usize> {
        sorted(self.modified_by_stmts.get(variable))
    }

    pub fn procedures_modifying(&self, variable: &str) -> Vec<String> {
        sorted(self.modified_by_procs.get(variable))
    }

    pub fn statements_modifying_some_variable(&self) -> Vec<usize> {
        keys(&self.stmt_modifies)
    }

    pub fn procedures_modifying_some_variable(&self) -> Vec<String> {
        keys(&self.proc_modifies)
    }

    // Calls

    pub fn procedures_called_by(&self, procedure: &str, transitive: bool) -> Vec<String> {
        related(&self.calls, &procedure.to_string(), transitive)
    }

    pub fn procedures_that_call(&self, procedure: &str, transitive: bool) -> Vec<String> {
        related(&self.called_by, &procedure.to_string(), transitive)
    }

    pub fn procedures_calling_some(&self) -> Vec<String> {
        keys(&self.calls)
    }

    pub fn procedures_called_by_some(&self) -> Vec<String> {
        keys(&self.called_by)
    }

    // Next

    pub fn next(&self, stmt: usize, transitive: bool) -> Vec<usize> {
        related(&self.next, &stmt, transitive)
    }

    pub fn previous(&self, stmt: usize, transitive: bool) -> Vec<usize> {
        related(&self.previous, &stmt, transitive)
    }

    pub fn statements_with_next(&self) -> Vec<usize> {
        keys(&self.next)
    }

    pub fn statements_with_previous(&self) -> Vec<usize> {
        keys(&self.previous)
    }

    // Affects

    pub fn affects(&self, stmt: usize, transitive: bool) -> Vec<usize> {
        related(&self.affects, &stmt, transitive)
    }

    pub fn affected_by(&self, stmt: usize, transitive: bool) -> Vec<usize> {
        related(&self.affected_by, &stmt, transitive)
    }

    pub fn statements_that_affect(&self) -> Vec<usize> {
        keys(&self.affects)
    }

    pub fn statements_affected(&self) -> Vec<usize> {
        keys(&self.affected_by)
    }
}
