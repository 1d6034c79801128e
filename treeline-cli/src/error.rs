//! CLI-specific error types and exit code mapping

use treeline_build_tree::BuildTreeError;
use treeline_core::error::TreelineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Build tool output could not be turned into a tree.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (input read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from treeline-core.
    #[error("{0}")]
    Core(#[from] TreelineError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                     |
    /// |------|-----------------------------|
    /// | 0    | Success                     |
    /// | 1    | General / command error     |
    /// | 2    | Configuration error         |
    /// | 3    | Build tool output unusable  |
    /// | 10   | IO error                    |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Parse(_) => 3,
            Self::Io(_) => 10,
            Self::Core(TreelineError::Config(_)) => 2,
            Self::Core(TreelineError::Parse(_)) => 3,
            Self::Core(TreelineError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<BuildTreeError> for CliError {
    fn from(e: BuildTreeError) -> Self {
        match e {
            // 잘못된 --project-name/--project-version 은 사용자 인자 문제
            BuildTreeError::InvalidSeed { .. } => Self::Command(e.to_string()),
            BuildTreeError::Io { path, source } => {
                Self::Io(std::io::Error::new(source.kind(), format!("{path}: {source}")))
            }
            BuildTreeError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Parse(other.to_string()),
        }
    }
}
