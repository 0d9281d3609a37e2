use crate::driver::{FailurePolicy, Target, default_targets};
use crate::error::Result;
use crate::rules::{Catalog, RuleSet, RuleSpec};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level contents of a plan file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Plan {
	/// If true, keep going after a target fails instead of stopping.
	#[serde(default)]
	pub keep_going: bool,

	/// Custom rule-sets, available to targets alongside the built-in ones.
	#[serde(default)]
	pub rule_sets: Vec<RuleSetDef>,

	/// Files to rewrite, in order.
	#[serde(default)]
	pub targets: Vec<TargetDef>,
}

/// A user-defined rule-set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSetDef {
	pub name: String,

	/// Applied in order; each rule sees the output of the previous one.
	#[serde(default)]
	pub rules: Vec<RuleSpec>,
}

/// A file bound to a rule-set name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDef {
	pub path: PathBuf,
	pub rule_set: String,
}

impl Plan {
	/// The plan a bare invocation runs.
	pub fn builtin() -> Self {
		Plan {
			keep_going: false,
			rule_sets: Vec::new(),
			targets: default_targets()
				.into_iter()
				.map(|t| TargetDef {
					path: t.path,
					rule_set: t.rule_set,
				})
				.collect(),
		}
	}

	pub fn failure_policy(&self) -> FailurePolicy {
		if self.keep_going {
			FailurePolicy::Continue
		} else {
			FailurePolicy::Stop
		}
	}

	pub fn targets(&self) -> Vec<Target> {
		self.targets
			.iter()
			.map(|t| Target::new(t.path.clone(), t.rule_set.clone()))
			.collect()
	}

	/// Built-in rule-sets plus this plan's custom ones, all compiled.
	pub fn catalog(&self) -> Result<Catalog> {
		let mut catalog = Catalog::builtin()?;
		for def in &self.rule_sets {
			catalog.register(RuleSet::compile(def.name.clone(), &def.rules)?)?;
		}
		Ok(catalog)
	}
}
