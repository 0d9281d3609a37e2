use crate::error::{Result, RewriteError};
use crate::rules::rule::{RuleSet, RuleSpec};

/// The built-in migrations.
///
/// Each variant owns an ordered pattern table; see [`BuiltinRuleSet::specs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinRuleSet {
	/// `error(0|1, ...)` becomes `value_error(0|1, ...)`.
	CallNormalization,
	/// `%s` becomes `%t` when the argument came from `value_type_to_string`.
	FormatSpecifier,
	/// Capitalize error-category labels inside string literals.
	ErrorLabels,
	/// `run_test_statement` becomes `test_string`, anywhere.
	RenameTestStatement,
	/// `*x.field` becomes `x.field` and `*x->field` becomes `x->field`.
	DerefMemberAccess,
}

// `(^|[^_])` stands in for "not preceded by an underscore" and is written back
// unchanged. Literal-message variants run before the expression variants, and the
// trailing-argument form of each runs before the bare form.
//
// A match can still span a later `error(` on the same line, or consume the character
// in front of it, so this set is re-applied until the text stops changing. Every
// pass rewrites at least one unguarded `error(` and creates none, so it terminates.
const CALL_NORMALIZATION: &[(&str, &str)] = &[
	(
		r#"(^|[^_])error\(([01]), "(.+?)", (.+?)\)"#,
		r#"${1}value_error(${2}, "${3}", ${4})"#,
	),
	(
		r#"(^|[^_])error\(([01]), "(.+?)"\)"#,
		r#"${1}value_error(${2}, "${3}")"#,
	),
	(
		r"(^|[^_])error\(([01]), (.+?), (.+?)\)",
		r"${1}value_error(${2}, ${3}, ${4})",
	),
	(
		r"(^|[^_])error\(([01]), (.+?)\)",
		r"${1}value_error(${2}, ${3})",
	),
];

const FORMAT_SPECIFIER: &[(&str, &str)] = &[
	(
		r#"value_error\(([01]), "(.*?)%s(.*?)", value_type_to_string\((.+?)\)\)"#,
		r#"value_error(${1}, "${2}%t${3}", ${4})"#,
	),
	(
		r#"value_error\(([01]), "(.*?)%s(.*?)", value_to_string\((.+?)\)\)"#,
		r#"value_error(${1}, "${2}%s${3}", ${4})"#,
	),
];

const ERROR_LABELS: &[(&str, &str)] = &[
	(r#""Argument error: (.+?)""#, r#""Argument Error: ${1}""#),
	(r#""Memory error: (.+?)""#, r#""Memory Error: ${1}""#),
	(r#""Compiler error: (.+?)""#, r#""Compiler Error: ${1}""#),
	(r#""Domain error: (.+?)""#, r#""Domain Error: ${1}""#),
	(r#""File error: (.+?)""#, r#""IO Error: ${1}""#),
	(r#""IO error: (.+?)""#, r#""IO Error: ${1}""#),
	(r#""Syntax error: (.+?)""#, r#""Syntax Error: ${1}""#),
];

// No word boundary: `my_run_test_statement_helper` is rewritten too.
const RENAME_TEST_STATEMENT: &[(&str, &str)] = &[("run_test_statement", "test_string")];

// Multiplication without a space after `*` is rewritten too: `a *b.c` becomes `a b.c`.
const DEREF_MEMBER_ACCESS: &[(&str, &str)] = &[
	(r"\*(\w\S*?)\.(\w)", "${1}.${2}"),
	(r"\*(\w\S*?)->(\w)", "${1}->${2}"),
];

impl BuiltinRuleSet {
	pub const ALL: [BuiltinRuleSet; 5] = [
		BuiltinRuleSet::CallNormalization,
		BuiltinRuleSet::FormatSpecifier,
		BuiltinRuleSet::ErrorLabels,
		BuiltinRuleSet::RenameTestStatement,
		BuiltinRuleSet::DerefMemberAccess,
	];

	/// Name used in plan files and CLI output.
	pub fn name(self) -> &'static str {
		match self {
			BuiltinRuleSet::CallNormalization => "call-normalization",
			BuiltinRuleSet::FormatSpecifier => "format-specifier",
			BuiltinRuleSet::ErrorLabels => "error-labels",
			BuiltinRuleSet::RenameTestStatement => "rename-test-statement",
			BuiltinRuleSet::DerefMemberAccess => "deref-member-access",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			BuiltinRuleSet::CallNormalization => "rename error(0|1, ...) calls to value_error",
			BuiltinRuleSet::FormatSpecifier => {
				"use %t for value_type_to_string arguments in value_error calls"
			}
			BuiltinRuleSet::ErrorLabels => "normalize error-category labels in string literals",
			BuiltinRuleSet::RenameTestStatement => "rename run_test_statement to test_string",
			BuiltinRuleSet::DerefMemberAccess => "drop redundant * before member access",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|b| b.name() == name)
	}

	/// The ordered pattern table for this rule-set.
	pub fn specs(self) -> Vec<RuleSpec> {
		let table = match self {
			BuiltinRuleSet::CallNormalization => CALL_NORMALIZATION,
			BuiltinRuleSet::FormatSpecifier => FORMAT_SPECIFIER,
			BuiltinRuleSet::ErrorLabels => ERROR_LABELS,
			BuiltinRuleSet::RenameTestStatement => RENAME_TEST_STATEMENT,
			BuiltinRuleSet::DerefMemberAccess => DEREF_MEMBER_ACCESS,
		};
		table
			.iter()
			.map(|(pattern, replacement)| RuleSpec::new(*pattern, *replacement))
			.collect()
	}

	pub fn compile(self) -> Result<RuleSet> {
		let rule_set = RuleSet::compile(self.name(), &self.specs())?;
		Ok(match self {
			BuiltinRuleSet::CallNormalization => rule_set.until_stable(),
			_ => rule_set,
		})
	}
}

/// Every rule-set a plan can refer to, in registration order.
#[derive(Debug, Clone)]
pub struct Catalog {
	rule_sets: Vec<RuleSet>,
}

impl Catalog {
	/// Compile the five built-in rule-sets.
	pub fn builtin() -> Result<Self> {
		let rule_sets = BuiltinRuleSet::ALL
			.into_iter()
			.map(BuiltinRuleSet::compile)
			.collect::<Result<Vec<_>>>()?;
		Ok(Catalog { rule_sets })
	}

	/// Register an additional rule-set. Names must be unique.
	pub fn register(&mut self, rule_set: RuleSet) -> Result<()> {
		if self.get(rule_set.name()).is_some() {
			return Err(RewriteError::DuplicateRuleSet {
				name: rule_set.name().to_string(),
			});
		}
		self.rule_sets.push(rule_set);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&RuleSet> {
		self.rule_sets.iter().find(|set| set.name() == name)
	}

	/// Like [`Catalog::get`], but an unknown name is an error.
	pub fn resolve(&self, name: &str) -> Result<&RuleSet> {
		self.get(name).ok_or_else(|| RewriteError::UnknownRuleSet {
			name: name.to_string(),
		})
	}

	pub fn iter(&self) -> impl Iterator<Item = &RuleSet> {
		self.rule_sets.iter()
	}
}
