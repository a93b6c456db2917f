use std::{cmp::Ordering, str::FromStr};

use compact_str::CompactString;
use derive_more::{Debug, Display};
use serde::{Deserialize, Serialize};

use crate::{InvalidVersion, error};

/// A single dot-separated prerelease or build identifier,
/// such as `alpha` or `11` in `1.0.0-alpha.11`.
///
/// Equality and [`Ord`] on this type are plain string comparisons,
/// which lets identifiers live in ordered collections.
/// SemVer precedence is computed by [`compare_identifier`] instead.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Debug, Serialize, Deserialize)]
#[display("{_0}")]
#[debug("{_0:?}")]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(CompactString);

impl Identifier {
    /// Parse a single identifier.
    ///
    /// Identifiers are non-empty runs of ASCII alphanumerics and `-`.
    /// Leading zeros are accepted here; they are only forbidden
    /// for numeric prerelease identifiers, which [`Version`](crate::Version) checks.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, InvalidVersion> {
        let input = input.as_ref();
        if input.is_empty() {
            error::fatal!(InvalidVersion::Empty);
        }
        if let Some(bad) = input.find(|c: char| !is_identifier_char(c)) {
            error::fatal!(InvalidVersion::Syntax {
                input: input.to_string(),
                span: (bad, 1).into(),
            });
        }
        Ok(Self(input.into()))
    }

    /// Wrap text already validated by a parser.
    pub(crate) fn from_trusted(input: &str) -> Self {
        Self(input.into())
    }

    /// View the identifier as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the identifier consists only of digits.
    pub fn is_numeric(&self) -> bool {
        is_numeric(self.as_str())
    }

    /// Whether the identifier is numeric and carries a leading zero.
    pub(crate) fn has_leading_zero(&self) -> bool {
        has_leading_zero(self.as_str())
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Identifier {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0.into()
    }
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `s` is a multi-digit number starting with `0`.
pub(crate) fn has_leading_zero(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0') && is_numeric(s)
}

/// Compare two identifiers by SemVer precedence.
///
/// - Numeric identifiers compare by value, without any size limit.
/// - A numeric identifier always sorts before a non-numeric one.
/// - Everything else compares in ASCII order.
///
/// ```
/// # use std::cmp::Ordering;
/// # use semantic_version::compare_identifier;
/// assert_eq!(compare_identifier("9", "10"), Ordering::Less);
/// assert_eq!(compare_identifier("10", "9a"), Ordering::Less);
/// assert_eq!(compare_identifier("aa", "ab"), Ordering::Less);
/// ```
pub fn compare_identifier(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Compare two identifier lists by SemVer precedence.
///
/// The first differing pair decides; if one list is a prefix of the other,
/// the shorter list sorts first.
pub fn compare_identifier_list<A, B>(a: &[A], b: &[B]) -> Ordering
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    a.iter()
        .zip(b)
        .map(|(a, b)| compare_identifier(a.as_ref(), b.as_ref()))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}
