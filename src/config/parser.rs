use crate::config::types::Plan;
use crate::driver::validate_targets;
use crate::error::{Result, RewriteError};
use crate::rules::Catalog;
use std::path::Path;

/// Parse a plan file from the given path.
pub fn parse_plan_file(path: &Path) -> Result<(Plan, Catalog)> {
	let content = std::fs::read_to_string(path).map_err(|source| RewriteError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_plan_str(&content, path)
}

/// Parse a plan from a string (useful for testing).
///
/// Custom patterns are compiled and every target's rule-set is resolved here, so a
/// bad plan is rejected before any file is touched.
pub fn parse_plan_str(content: &str, path: &Path) -> Result<(Plan, Catalog)> {
	let plan: Plan = toml::from_str(content).map_err(|source| RewriteError::ConfigParse {
		path: path.to_path_buf(),
		source,
	})?;

	let catalog = plan.catalog()?;
	validate_targets(&plan.targets(), &catalog)?;

	Ok((plan, catalog))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::driver::FailurePolicy;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_plan() {
		let path = PathBuf::from("plan.toml");
		let (plan, catalog) = parse_plan_str("", &path).unwrap();

		assert!(!plan.keep_going);
		assert!(plan.rule_sets.is_empty());
		assert!(plan.targets.is_empty());
		assert_eq!(catalog.iter().count(), 5);
	}

	#[test]
	fn test_parse_targets_array_of_tables() {
		let content = r#"
keep-going = true

[[targets]]
path = "main.c"
rule-set = "call-normalization"

[[targets]]
path = "src/eval.c"
rule-set = "format-specifier"
"#;
		let path = PathBuf::from("plan.toml");
		let (plan, _) = parse_plan_str(content, &path).unwrap();

		assert_eq!(plan.failure_policy(), FailurePolicy::Continue);
		let targets = plan.targets();
		assert_eq!(targets.len(), 2);
		assert_eq!(targets[0].path, PathBuf::from("main.c"));
		assert_eq!(targets[0].rule_set, "call-normalization");
		assert_eq!(targets[1].path, PathBuf::from("src/eval.c"));
		assert_eq!(targets[1].rule_set, "format-specifier");
	}

	#[test]
	fn test_parse_custom_rule_set() {
		let content = r#"
[[rule-sets]]
name = "rename-foo"
rules = [
    { pattern = "foo_(\\w+)", replacement = "bar_${1}" },
    { pattern = "bar_old", replacement = "bar_new" },
]

[[targets]]
path = "a.c"
rule-set = "rename-foo"
"#;
		let path = PathBuf::from("plan.toml");
		let (plan, catalog) = parse_plan_str(content, &path).unwrap();

		assert_eq!(plan.rule_sets.len(), 1);
		let set = catalog.get("rename-foo").unwrap();
		assert_eq!(set.rules().len(), 2);
		assert_eq!(set.apply("foo_old foo_x").text, "bar_new bar_x");
	}

	#[test]
	fn test_invalid_custom_pattern() {
		let content = r#"
[[rule-sets]]
name = "broken"
rules = [{ pattern = "ok", replacement = "x" }, { pattern = "(unclosed", replacement = "x" }]
"#;
		let path = PathBuf::from("plan.toml");
		match parse_plan_str(content, &path).unwrap_err() {
			RewriteError::InvalidPattern {
				rule_set, index, ..
			} => {
				assert_eq!(rule_set, "broken");
				assert_eq!(index, 1);
			}
			other => panic!("Expected InvalidPattern error, got {other:?}"),
		}
	}

	#[test]
	fn test_custom_rule_set_cannot_shadow_builtin() {
		let content = r#"
[[rule-sets]]
name = "error-labels"
rules = []
"#;
		let path = PathBuf::from("plan.toml");
		assert!(matches!(
			parse_plan_str(content, &path),
			Err(RewriteError::DuplicateRuleSet { .. })
		));
	}

	#[test]
	fn test_unknown_rule_set_rejected() {
		let content = r#"
[[targets]]
path = "a.c"
rule-set = "does-not-exist"
"#;
		let path = PathBuf::from("plan.toml");
		match parse_plan_str(content, &path).unwrap_err() {
			RewriteError::UnknownRuleSet { name } => assert_eq!(name, "does-not-exist"),
			other => panic!("Expected UnknownRuleSet error, got {other:?}"),
		}
	}

	#[test]
	fn test_malformed_toml() {
		let path = PathBuf::from("plan.toml");
		assert!(matches!(
			parse_plan_str("invalid toml [[[", &path),
			Err(RewriteError::ConfigParse { .. })
		));
	}

	#[test]
	fn test_missing_plan_file() {
		let path = PathBuf::from("/nonexistent/plan.toml");
		assert!(matches!(
			parse_plan_file(&path),
			Err(RewriteError::ConfigRead { .. })
		));
	}

	#[test]
	fn test_builtin_plan_matches_default_targets() {
		let plan = Plan::builtin();
		assert_eq!(plan.failure_policy(), FailurePolicy::Stop);
		assert_eq!(plan.targets(), crate::driver::default_targets());
	}
}
