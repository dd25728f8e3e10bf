// Design extraction: derives the relation tables of a parsed program.

mod calls;
mod flow;
mod numbering;
mod patterns;
mod structure;
mod usage;

pub use calls::{procedure_call_graph, validate_program, CallGraph};
pub use flow::{affects_relation, invert, next_relation, FlowFacts, StatementGraph};
pub use numbering::{assign_statement_numbers, index_nodes_by_kind, StatementNumbers};
pub use patterns::{patterns_map, PatternEntry, PatternIndex};
pub use structure::{condition_variables, follow_relation, parent_relation, FollowsMaps, ParentMaps};
pub use usage::{modifies_mapping, uses_mapping, VariableMapping};
