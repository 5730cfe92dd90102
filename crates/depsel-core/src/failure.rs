use miette::Diagnostic;
use thiserror::Error;

/// An expected failure to resolve a selector or a component.
///
/// These are recorded on selector and component state, not raised: the
/// caller driving the resolve decides whether a failure aborts the build.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ResolveFailure {
    /// The declaration itself is invalid; attached before resolution starts.
    #[error("Invalid dependency declaration `{selector}`: {message}")]
    InvalidDeclaration { selector: String, message: String },

    /// No component id could be produced for the selector.
    #[error("Could not find a version of `{selector}` matching `{constraint}`")]
    #[diagnostic(help("Check the declared constraint against the versions the repositories offer"))]
    NotFound {
        selector: String,
        constraint: String,
        available: Vec<String>,
    },

    /// An id was produced but fetching its metadata failed.
    #[error("Could not resolve metadata for `{component}`: {message}")]
    MetadataUnavailable { component: String, message: String },
}

impl ResolveFailure {
    pub fn not_found(selector: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::NotFound {
            selector: selector.into(),
            constraint: constraint.into(),
            available: Vec::new(),
        }
    }
}
