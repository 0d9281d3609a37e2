//! Runs a list of targets through the rewriter, one file at a time.

use crate::error::{Result, RewriteError};
use crate::rewriter::{self, FileOutcome};
use crate::rules::{BuiltinRuleSet, Catalog};
use std::path::{Path, PathBuf};

/// Files rewritten by a bare invocation, in order.
pub const DEFAULT_FILES: &[&str] = &[
	"main.c",
	"eval.c",
	"interpreter.c",
	"tools.c",
	"tree.c",
	"tests.c",
	"value.c",
	"value_string.c",
	"value_regex.c",
	"value_number.c",
	"value_array.c",
	"value_list.c",
	"value_hash.c",
	"value_range.c",
	"value_block.c",
];

/// Rule-set applied to [`DEFAULT_FILES`].
pub const DEFAULT_RULE_SET: BuiltinRuleSet = BuiltinRuleSet::DerefMemberAccess;

/// A file bound to the rule-set that should run on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
	pub path: PathBuf,
	pub rule_set: String,
}

impl Target {
	pub fn new(path: impl Into<PathBuf>, rule_set: impl Into<String>) -> Self {
		Target {
			path: path.into(),
			rule_set: rule_set.into(),
		}
	}
}

/// The built-in target list. Edit [`DEFAULT_FILES`] / [`DEFAULT_RULE_SET`] to retarget.
pub fn default_targets() -> Vec<Target> {
	DEFAULT_FILES
		.iter()
		.map(|file| Target::new(*file, DEFAULT_RULE_SET.name()))
		.collect()
}

/// What to do when a target fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
	/// Abort the run at the first failing target.
	#[default]
	Stop,
	/// Record the failure and move on to the next target.
	Continue,
}

/// Per-target result.
#[derive(Debug)]
pub enum TargetStatus {
	Done(FileOutcome),
	Failed(RewriteError),
}

#[derive(Debug)]
pub struct TargetReport {
	pub target: Target,
	pub status: TargetStatus,
}

/// Everything a run did, in target order.
#[derive(Debug, Default)]
pub struct RunReport {
	pub targets: Vec<TargetReport>,
}

impl RunReport {
	pub fn failures(&self) -> impl Iterator<Item = (&Target, &RewriteError)> {
		self.targets.iter().filter_map(|report| match &report.status {
			TargetStatus::Failed(err) => Some((&report.target, err)),
			TargetStatus::Done(_) => None,
		})
	}

	pub fn has_failures(&self) -> bool {
		self.failures().next().is_some()
	}

	pub fn files_written(&self) -> usize {
		self.targets
			.iter()
			.filter(|report| matches!(&report.status, TargetStatus::Done(o) if o.written))
			.count()
	}
}

/// Check every target names a known rule-set before any file is touched.
pub fn validate_targets(targets: &[Target], catalog: &Catalog) -> Result<()> {
	for target in targets {
		catalog.resolve(&target.rule_set)?;
	}
	Ok(())
}

/// Rewrite each target in order, resolving relative paths against `base_dir`.
///
/// `on_target` is called after each target with its report, so callers can print
/// progress as it happens. Under [`FailurePolicy::Stop`] the first failure is
/// returned as an error wrapped with its path and rule-set; under
/// [`FailurePolicy::Continue`] it is recorded in the report instead.
pub fn run_targets<F>(
	targets: &[Target],
	base_dir: &Path,
	catalog: &Catalog,
	policy: FailurePolicy,
	mut on_target: F,
) -> Result<RunReport>
where
	F: FnMut(&TargetReport),
{
	validate_targets(targets, catalog)?;

	let mut report = RunReport::default();

	for target in targets {
		let path = base_dir.join(&target.path);
		let rule_set = catalog.resolve(&target.rule_set)?;

		let status = match rewriter::apply(&path, rule_set) {
			Ok(outcome) => TargetStatus::Done(outcome),
			Err(source) => {
				let err = RewriteError::Target {
					path: path.clone(),
					rule_set: target.rule_set.clone(),
					source: Box::new(source),
				};
				if policy == FailurePolicy::Stop {
					return Err(err);
				}
				TargetStatus::Failed(err)
			}
		};

		let target_report = TargetReport {
			target: Target::new(path, target.rule_set.clone()),
			status,
		};
		on_target(&target_report);
		report.targets.push(target_report);
	}

	Ok(report)
}
