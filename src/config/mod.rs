//! Plan file loading for rewrite.
//!
//! A plan file replaces the built-in target list. It can define extra rule-sets
//! and pick which rule-set runs against which file.

pub mod parser;
pub mod types;

pub use parser::{parse_plan_file, parse_plan_str};
pub use types::{Plan, RuleSetDef, TargetDef};
