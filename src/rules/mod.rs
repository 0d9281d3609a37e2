//! Rules and rule-sets for rewrite.
//!
//! This module handles:
//! - Compiling pattern/replacement pairs into ordered rule-sets
//! - The catalog of built-in migrations

pub mod catalog;
pub mod rule;

pub use catalog::{BuiltinRuleSet, Catalog};
pub use rule::{Rewritten, Rule, RuleSet, RuleSpec};
