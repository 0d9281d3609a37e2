//! Rewrite - one-shot regex migrations over a fixed list of source files.
//!
//! This library provides the core functionality for rewrite, including:
//! - Ordered, named rule-sets and the built-in migration catalog
//! - Whole-file rewriting with atomic replacement
//! - A driver that walks a target list with an explicit failure policy
//! - Optional TOML plan files
//!
//! Rewrites are destructive and cannot be undone. Commit or back up first.
//!
//! # Example
//!
//! ```no_run
//! use rewrite_cli::driver::{FailurePolicy, default_targets, run_targets};
//! use rewrite_cli::rules::Catalog;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let catalog = Catalog::builtin().unwrap();
//!
//! let report = run_targets(&default_targets(), &cwd, &catalog, FailurePolicy::Stop, |r| {
//!     println!("{}", r.target.path.display());
//! })
//! .unwrap();
//! assert!(!report.has_failures());
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod rewriter;
pub mod rules;

pub use error::{Result, RewriteError};
