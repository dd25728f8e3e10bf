//! PQL: preprocessing a query into clauses, planning their order and evaluating them against a `Pkb`.

pub mod evaluator;
pub mod lookup;
pub mod optimizer;
pub mod preprocessor;
pub mod result_table;
pub mod types;

pub use evaluator::QueryEvaluator;
pub use optimizer::{optimize, ClauseGroup};
pub use preprocessor::parse_query;
pub use result_table::ResultTable;
pub use types::{Arg, ArgType, Clause, ClauseType, EntityType, Query, ReturnType};
