use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rewrite_cli::config::{Plan, parse_plan_file};
use rewrite_cli::driver::{FailurePolicy, TargetReport, TargetStatus, run_targets};
use rewrite_cli::RewriteError;
use rewrite_cli::rules::{BuiltinRuleSet, Catalog};

const WARNING: &str = "WARNING: rewrites are applied in place and cannot be undone. \
Commit or back up your sources first, and prefer your editor's project-wide \
find-and-replace where it can do the job.";

#[derive(Parser)]
#[command(name = "rewrite")]
#[command(
	author,
	version,
	about = "One-shot regex migrations over a fixed list of source files",
	after_help = WARNING
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Directory that relative target paths are resolved against
	#[arg(long, value_name = "DIR", global = true)]
	dir: Option<PathBuf>,

	/// Run the targets from this plan file instead of the built-in list
	#[arg(long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Keep going after a target fails (exit status is still non-zero)
	#[arg(long)]
	keep_going: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// List available rule-sets and their rules, in application order
	List,
	/// Show which rule-set runs on which file, without touching anything
	Plan,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	let (plan, catalog) = load_plan(cli.config.as_deref())?;

	if let Some(command) = cli.command {
		return match command {
			Commands::List => handle_list(&catalog),
			Commands::Plan => handle_plan(&plan, cli.dir.as_deref()),
		};
	}

	let policy = if cli.keep_going {
		FailurePolicy::Continue
	} else {
		plan.failure_policy()
	};
	let base_dir = cli.dir.unwrap_or_default();

	handle_rewrite(&plan, &catalog, &base_dir, policy)
}

fn load_plan(config: Option<&Path>) -> Result<(Plan, Catalog)> {
	match config {
		Some(path) => parse_plan_file(path)
			.with_context(|| format!("Failed to load plan {}", path.display())),
		None => {
			let catalog = Catalog::builtin().context("Failed to compile built-in rule-sets")?;
			Ok((Plan::builtin(), catalog))
		}
	}
}

fn handle_list(catalog: &Catalog) -> Result<ExitCode> {
	for rule_set in catalog.iter() {
		match BuiltinRuleSet::from_name(rule_set.name()) {
			Some(builtin) => println!("{} - {}", rule_set.name(), builtin.description()),
			None => println!("{} (custom)", rule_set.name()),
		}
		for (i, rule) in rule_set.rules().iter().enumerate() {
			println!("  {}. {}  =>  {}", i + 1, rule.pattern.as_str(), rule.replacement);
		}
		println!();
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_plan(plan: &Plan, dir: Option<&Path>) -> Result<ExitCode> {
	if let Some(dir) = dir {
		println!("# base directory: {}", dir.display());
	}
	println!("# keep-going: {}", plan.keep_going);

	let targets = plan.targets();
	if targets.is_empty() {
		println!("No targets.");
		return Ok(ExitCode::SUCCESS);
	}

	for target in &targets {
		println!("{}  [{}]", target.path.display(), target.rule_set);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_rewrite(
	plan: &Plan,
	catalog: &Catalog,
	base_dir: &Path,
	policy: FailurePolicy,
) -> Result<ExitCode> {
	let targets = plan.targets();

	let report = run_targets(&targets, base_dir, catalog, policy, print_progress).map_err(|e| {
		let message = format!("Rewrite stopped ({})", failure_kind(&e));
		anyhow::Error::new(e).context(message)
	})?;

	let failed = report.failures().count();
	println!(
		"{} of {} files rewritten",
		report.files_written(),
		report.targets.len()
	);

	if failed > 0 {
		anyhow::bail!("{} of {} targets failed", failed, report.targets.len());
	}
	Ok(ExitCode::SUCCESS)
}

fn print_progress(report: &TargetReport) {
	let path = report.target.path.display();
	let rule_set = &report.target.rule_set;

	match &report.status {
		TargetStatus::Done(outcome) if outcome.written => {
			println!(
				"rewrote {} [{}] ({} replacements)",
				path, rule_set, outcome.replacements
			);
		}
		TargetStatus::Done(_) => println!("unchanged {} [{}]", path, rule_set),
		TargetStatus::Failed(err) => {
			eprintln!("failed ({}) {}", failure_kind(err), error_chain(err))
		}
	}
}

fn failure_kind(err: &RewriteError) -> &'static str {
	if err.is_file_access() {
		"file access error"
	} else {
		"rewrite error"
	}
}

/// Render an error and all of its sources on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
