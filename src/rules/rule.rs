use crate::error::{Result, RewriteError};
use regex::{Captures, Regex};
use serde::Deserialize;

/// An uncompiled pattern/replacement pair, as written in a plan file or the built-in catalog.
///
/// The replacement uses `regex` template syntax: `${1}` for the first capture group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleSpec {
	pub pattern: String,
	pub replacement: String,
}

impl RuleSpec {
	pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
		RuleSpec {
			pattern: pattern.into(),
			replacement: replacement.into(),
		}
	}
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement template.
	pub replacement: String,
}

impl Rule {
	/// Replace every non-overlapping match in `input`.
	///
	/// Returns the new text and the number of matches replaced.
	pub fn apply(&self, input: &str) -> (String, usize) {
		let mut count = 0;
		let output = self.pattern.replace_all(input, |caps: &Captures| {
			count += 1;
			let mut expanded = String::new();
			caps.expand(&self.replacement, &mut expanded);
			expanded
		});
		(output.into_owned(), count)
	}
}

/// Result of running a rule-set over a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
	pub text: String,

	/// Total substitutions across all rules.
	pub replacements: usize,
}

impl Rewritten {
	pub fn changed(&self, original: &str) -> bool {
		self.text != original
	}
}

/// A named, ordered sequence of rules. Each rule sees the output of the previous one.
#[derive(Debug, Clone)]
pub struct RuleSet {
	name: String,
	rules: Vec<Rule>,
	until_stable: bool,
}

impl RuleSet {
	/// Compile every spec in order. Fails on the first bad pattern, naming its index.
	pub fn compile(name: impl Into<String>, specs: &[RuleSpec]) -> Result<Self> {
		let name = name.into();
		let rules = specs
			.iter()
			.enumerate()
			.map(|(index, spec)| {
				let pattern =
					Regex::new(&spec.pattern).map_err(|source| RewriteError::InvalidPattern {
						rule_set: name.clone(),
						index,
						pattern: spec.pattern.clone(),
						source,
					})?;
				Ok(Rule {
					pattern,
					replacement: spec.replacement.clone(),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(RuleSet {
			name,
			rules,
			until_stable: false,
		})
	}

	/// Re-run the whole rule list until a pass leaves the text unchanged.
	///
	/// Only for rule-sets where every rewrite removes a match and creates none,
	/// otherwise [`RuleSet::apply`] may not return.
	pub(crate) fn until_stable(mut self) -> Self {
		self.until_stable = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}

	/// Apply all rules left to right to `input`.
	pub fn apply(&self, input: &str) -> Rewritten {
		let mut text = input.to_string();
		let mut replacements = 0;

		loop {
			let mut pass = 0;
			for rule in &self.rules {
				let (next, count) = rule.apply(&text);
				text = next;
				pass += count;
			}
			replacements += pass;

			if !self.until_stable || pass == 0 {
				break;
			}
		}

		Rewritten { text, replacements }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_compile_valid_patterns() {
		let specs = [RuleSpec::new(r"foo", "bar"), RuleSpec::new(r"(\w+)!", "${1}?")];
		let set = RuleSet::compile("demo", &specs).unwrap();
		assert_eq!(set.name(), "demo");
		assert_eq!(set.rules().len(), 2);
	}

	#[test]
	fn test_compile_invalid_pattern_reports_index() {
		let specs = [RuleSpec::new(r"ok", "fine"), RuleSpec::new(r"[invalid", "x")];
		match RuleSet::compile("broken", &specs).unwrap_err() {
			RewriteError::InvalidPattern {
				rule_set,
				index,
				pattern,
				..
			} => {
				assert_eq!(rule_set, "broken");
				assert_eq!(index, 1);
				assert_eq!(pattern, "[invalid");
			}
			other => panic!("Expected InvalidPattern error, got {other:?}"),
		}
	}

	#[test]
	fn test_apply_is_global() {
		let set = RuleSet::compile("g", &[RuleSpec::new("foo", "bar")]).unwrap();
		let out = set.apply("foo foo foo");
		assert_eq!(out.text, "bar bar bar");
		assert_eq!(out.replacements, 3);
	}

	#[test]
	fn test_apply_with_capture_groups() {
		let set = RuleSet::compile("caps", &[RuleSpec::new(r"(\w+)=(\w+)", "${2}=${1}")]).unwrap();
		assert_eq!(set.apply("a=b c=d").text, "b=a d=c");
	}

	#[test]
	fn test_rules_feed_into_each_other() {
		let specs = [RuleSpec::new("alpha", "beta"), RuleSpec::new("beta", "gamma")];
		let set = RuleSet::compile("chain", &specs).unwrap();
		assert_eq!(set.apply("alpha").text, "gamma");

		// Reversed order: the second rule never sees "beta".
		let specs = [RuleSpec::new("beta", "gamma"), RuleSpec::new("alpha", "beta")];
		let set = RuleSet::compile("chain", &specs).unwrap();
		assert_eq!(set.apply("alpha").text, "beta");
	}

	#[test]
	fn test_replacement_count_matches_single_pass() {
		let set = RuleSet::compile("count", &[RuleSpec::new(r"(\d+)", "<${1}>")]).unwrap();
		let out = set.apply("1 22 333");
		assert_eq!(out.text, "<1> <22> <333>");
		assert_eq!(out.replacements, 3);
	}

	#[test]
	fn test_until_stable_repeats_passes() {
		// Each match consumes the character before the next `ab`, so one pass
		// only reaches every other occurrence.
		let specs = [RuleSpec::new(r"(^|[^_])ab", "${1}_ab")];
		let once = RuleSet::compile("step", &specs).unwrap();
		assert_eq!(once.apply("ababab").text, "_abab_ab");

		let stable = RuleSet::compile("step", &specs).unwrap().until_stable();
		let out = stable.apply("ababab");
		assert_eq!(out.text, "_ab_ab_ab");
		assert_eq!(out.replacements, 3);
	}

	#[test]
	fn test_no_match_leaves_text_identical() {
		let set = RuleSet::compile("none", &[RuleSpec::new("zzz", "yyy")]).unwrap();
		let input = "line one\r\nline two\n";
		let out = set.apply(input);
		assert_eq!(out.text, input);
		assert_eq!(out.replacements, 0);
		assert!(!out.changed(input));
	}
}
