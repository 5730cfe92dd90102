use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for depsel operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DepselError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid resolve configuration (e.g. depsel.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check depsel.toml for unknown keys or bad values"))]
    Config { message: String },

    /// A dependency declaration could not be parsed.
    #[error("Invalid dependency declaration `{input}`: {message}")]
    #[diagnostic(help(
        "Use `group:name:version`, `group:name`, or `project(:path)` notation"
    ))]
    Declaration { input: String, message: String },

    /// Resolution could not proceed (as opposed to a selector failing).
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DepselResult<T> = miette::Result<T>;
