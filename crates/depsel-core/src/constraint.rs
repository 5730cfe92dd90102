use serde::{Deserialize, Serialize};
use std::fmt;

/// A version constraint exactly as it was declared.
///
/// Interpretation (ranges, dynamic versions, ordering) belongs to the
/// identifier resolver; this type only carries the declared strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConstraint {
    /// Exact version (`1.0`), Maven range (`[1.0,2.0)`), or dynamic (`+`, `latest`).
    /// Empty means any version.
    #[serde(default)]
    pub requires: String,
    #[serde(default)]
    pub prefers: Option<String>,
    #[serde(default)]
    pub rejects: Vec<String>,
}

impl VersionConstraint {
    pub fn requires(version: impl Into<String>) -> Self {
        Self {
            requires: version.into(),
            ..Self::default()
        }
    }

    pub fn with_preferred(mut self, version: impl Into<String>) -> Self {
        self.prefers = Some(version.into());
        self
    }

    pub fn with_rejected(mut self, version: impl Into<String>) -> Self {
        self.rejects.push(version.into());
        self
    }

    /// True when the required version does not pin a single release.
    pub fn is_dynamic(&self) -> bool {
        let r = self.requires.trim();
        r.is_empty()
            || r == "+"
            || r.eq_ignore_ascii_case("latest")
            || r.starts_with('[')
            || r.starts_with('(')
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.requires.is_empty() {
            f.write_str("*")?;
        } else {
            f.write_str(&self.requires)?;
        }
        if let Some(ref prefers) = self.prefers {
            write!(f, " (prefer {prefers})")?;
        }
        if !self.rejects.is_empty() {
            write!(f, " (reject {})", self.rejects.join(", "))?;
        }
        Ok(())
    }
}
