//! Whole-file rewriting.
//!
//! A file is read into memory once, run through a [`RuleSet`], and, if the text
//! changed, replaced in a single rename so a crash never leaves it half written.

use crate::error::{Result, RewriteError};
use crate::rules::RuleSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
	/// Total substitutions made by the rule-set.
	pub replacements: usize,

	/// Whether the file on disk was replaced.
	pub written: bool,
}

/// Apply `rule_set` to the file at `path`, replacing its content in place.
///
/// The file is left untouched when no rule changes the text.
pub fn apply(path: &Path, rule_set: &RuleSet) -> Result<FileOutcome> {
	let original = fs::read_to_string(path).map_err(|source| RewriteError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;

	let rewritten = rule_set.apply(&original);
	if !rewritten.changed(&original) {
		return Ok(FileOutcome {
			replacements: rewritten.replacements,
			written: false,
		});
	}

	replace_file(path, &rewritten.text).map_err(|source| RewriteError::FileWrite {
		path: path.to_path_buf(),
		source,
	})?;

	Ok(FileOutcome {
		replacements: rewritten.replacements,
		written: true,
	})
}

/// Write `content` to a sibling temp file, then rename it over `path`.
///
/// The original permissions are carried over to the new file.
fn replace_file(path: &Path, content: &str) -> std::io::Result<()> {
	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};
	let permissions = fs::metadata(path)?.permissions();

	let mut temp = tempfile::NamedTempFile::new_in(parent)?;
	temp.write_all(content.as_bytes())?;
	temp.as_file().sync_all()?;
	fs::set_permissions(temp.path(), permissions)?;

	temp.persist(path).map_err(|e| e.error)?;
	Ok(())
}
