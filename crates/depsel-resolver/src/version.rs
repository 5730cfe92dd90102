//! Version ordering and the version selectors a constraint is made of.
//!
//! Versions are split into items on `.`, `-`, `_` and at every switch between
//! digits and letters, so `1.0rc1` reads as `1 . 0 . rc . 1`. Items compare
//! as follows:
//! - numbers compare numerically and sort above any qualifier or word
//! - known qualifiers rank
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < release < `sp`
//! - unknown words sort below a release and compare case-insensitively
//!
//! A missing item counts as a release (`1.0` == `1.0.0`), so `1.0-SNAPSHOT`
//! sorts before `1.0`.

use std::cmp::Ordering;
use std::fmt;

/// A published version, ordered by its items.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    pub original: String,
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Number(u64),
    Qualifier(Qualifier),
    Word(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl Item {
    fn classify(token: &str) -> Self {
        if let Ok(n) = token.parse() {
            return Self::Number(n);
        }
        let qualifier = match token.to_ascii_lowercase().as_str() {
            "alpha" | "a" => Qualifier::Alpha,
            "beta" | "b" => Qualifier::Beta,
            "milestone" | "m" => Qualifier::Milestone,
            "rc" | "cr" => Qualifier::Rc,
            "snapshot" => Qualifier::Snapshot,
            "ga" | "final" | "release" => Qualifier::Release,
            "sp" => Qualifier::Sp,
            _ => return Self::Word(token.to_ascii_lowercase()),
        };
        Self::Qualifier(qualifier)
    }

    /// Where the item sits relative to a release when the other side has run out.
    fn against_release(&self) -> Ordering {
        match self {
            Self::Number(0) => Ordering::Equal,
            Self::Number(_) => Ordering::Greater,
            Self::Qualifier(q) => q.cmp(&Qualifier::Release),
            Self::Word(_) => Ordering::Less,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Qualifier(a), Self::Qualifier(b)) => a.cmp(b),
            (Self::Word(a), Self::Word(b)) => a.cmp(b),
            (Self::Number(_), _) => Ordering::Greater,
            (_, Self::Number(_)) => Ordering::Less,
            // Words sit just below a release.
            (Self::Qualifier(q), Self::Word(_)) if *q >= Qualifier::Release => Ordering::Greater,
            (Self::Qualifier(_), Self::Word(_)) => Ordering::Less,
            (Self::Word(_), Self::Qualifier(_)) => other.compare(self).reverse(),
        }
    }
}

fn tokenize(version: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut token = String::new();
    let mut digits = false;

    for ch in version.chars() {
        if matches!(ch, '.' | '-' | '_') {
            if !token.is_empty() {
                items.push(Item::classify(&token));
                token.clear();
            }
            continue;
        }
        if !token.is_empty() && ch.is_ascii_digit() != digits {
            items.push(Item::classify(&token));
            token.clear();
        }
        digits = ch.is_ascii_digit();
        token.push(ch);
    }
    if !token.is_empty() {
        items.push(Item::classify(&token));
    }
    items
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            items: tokenize(version),
        }
    }

    pub fn is_snapshot(&self) -> bool {
        self.items.last() == Some(&Item::Qualifier(Qualifier::Snapshot))
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        (0..len)
            .map(|i| match (self.items.get(i), other.items.get(i)) {
                (Some(a), Some(b)) => a.compare(b),
                (Some(a), None) => a.against_release(),
                (None, Some(b)) => b.against_release().reverse(),
                (None, None) => Ordering::Equal,
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for MavenVersion {}

/// One end of a [`VersionRange`].
#[derive(Debug, Clone)]
pub struct Bound {
    pub version: MavenVersion,
    pub inclusive: bool,
}

/// A bracketed range: `[1.0,2.0)`, `[1.0,)`, `(,2.0]`, or `[1.5]` for exactly one version.
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl VersionRange {
    /// Parse range notation. `None` for anything that is not a well-formed range.
    pub fn parse(notation: &str) -> Option<Self> {
        let s = notation.trim();
        let lower_inclusive = match s.chars().next()? {
            '[' => true,
            '(' => false,
            _ => return None,
        };
        let upper_inclusive = match s.chars().last()? {
            ']' => true,
            ')' => false,
            _ => return None,
        };
        let inner = s.get(1..s.len() - 1)?.trim();

        let bound = |v: &str, inclusive| {
            let v = v.trim();
            (!v.is_empty()).then(|| Bound {
                version: MavenVersion::parse(v),
                inclusive,
            })
        };
        match inner.split_once(',') {
            Some((lower, upper)) => Some(Self {
                lower: bound(lower, lower_inclusive),
                upper: bound(upper, upper_inclusive),
            }),
            None if inner.is_empty() || !(lower_inclusive && upper_inclusive) => None,
            None => Some(Self {
                lower: bound(inner, true),
                upper: bound(inner, true),
            }),
        }
    }

    pub fn contains(&self, version: &MavenVersion) -> bool {
        let above_lower = self.lower.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Greater => true,
            Ordering::Equal => b.inclusive,
            Ordering::Less => false,
        });
        let below_upper = self.upper.as_ref().map_or(true, |b| match version.cmp(&b.version) {
            Ordering::Less => true,
            Ordering::Equal => b.inclusive,
            Ordering::Greater => false,
        });
        above_lower && below_upper
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower = self.lower.as_ref().map(|b| b.version.original.as_str());
        let upper = self.upper.as_ref().map(|b| b.version.original.as_str());
        if let (Some(l), Some(u)) = (lower, upper) {
            if l == u {
                return write!(f, "[{l}]");
            }
        }
        let open = if self.lower.as_ref().is_some_and(|b| b.inclusive) { '[' } else { '(' };
        let close = if self.upper.as_ref().is_some_and(|b| b.inclusive) { ']' } else { ')' };
        write!(f, "{open}{},{}{close}", lower.unwrap_or(""), upper.unwrap_or(""))
    }
}

/// How a single version string in a constraint selects versions.
#[derive(Debug, Clone)]
pub enum VersionSelector {
    /// Empty, `+`, or `latest`.
    Any,
    /// `1.+` style prefix match.
    Prefix(String),
    Range(VersionRange),
    Exact(MavenVersion),
}

impl VersionSelector {
    /// Parse a version selector. Returns `None` for a malformed range.
    pub fn parse(notation: &str) -> Option<Self> {
        let s = notation.trim();
        if s.is_empty() || s == "+" || s.eq_ignore_ascii_case("latest") {
            return Some(Self::Any);
        }
        if s.starts_with('[') || s.starts_with('(') {
            return VersionRange::parse(s).map(Self::Range);
        }
        if let Some(prefix) = s.strip_suffix('+') {
            return Some(Self::Prefix(prefix.to_string()));
        }
        Some(Self::Exact(MavenVersion::parse(s)))
    }

    pub fn matches(&self, version: &MavenVersion) -> bool {
        match self {
            Self::Any => true,
            Self::Prefix(prefix) => version.original.starts_with(prefix.as_str()),
            Self::Range(range) => range.contains(version),
            Self::Exact(exact) => exact == version,
        }
    }

    /// True unless the selector pins a single version.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Exact(_))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("+"),
            Self::Prefix(p) => write!(f, "{p}+"),
            Self::Range(r) => write!(f, "{r}"),
            Self::Exact(v) => write!(f, "{v}"),
        }
    }
}
