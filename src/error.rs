use std::path::PathBuf;

/// Library-level structured errors for rewrite.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
	#[error("Failed to read file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write file: {path}")]
	FileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid regex pattern in rule-set {rule_set} (rule {index}): {pattern}")]
	InvalidPattern {
		rule_set: String,
		index: usize,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Rewrite of {path} with rule-set {rule_set} failed")]
	Target {
		path: PathBuf,
		rule_set: String,
		#[source]
		source: Box<RewriteError>,
	},

	#[error("Unknown rule-set: {name}")]
	UnknownRuleSet { name: String },

	#[error("Rule-set defined more than once: {name}")]
	DuplicateRuleSet { name: String },

	#[error("Failed to read plan file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse plan file: {path}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

impl RewriteError {
	/// True for failures opening, reading or replacing a file on disk.
	pub fn is_file_access(&self) -> bool {
		match self {
			RewriteError::FileRead { .. } | RewriteError::FileWrite { .. } => true,
			RewriteError::Target { source, .. } => source.is_file_access(),
			_ => false,
		}
	}
}

/// Result type alias using RewriteError.
pub type Result<T> = std::result::Result<T, RewriteError>;
