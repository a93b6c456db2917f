//! Parsing, formatting, and precedence of individual versions.

use std::{borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use bon::bon;
use derivative::Derivative;
use documented::Documented;
use duplicate::duplicate;
use lazy_regex::{regex, regex_find};
use nom::{
    Finish, IResult, Parser,
    bytes::complete::take_while,
    character::complete::{char, digit1},
    combinator::{all_consuming, opt},
    sequence::preceded,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{
    Identifier, Incomparable, InvalidVersion, compare_identifier_list, error,
    identifier::{has_leading_zero, is_identifier_char},
};

/// The components of a version, from most to least significant.
///
/// Used to select a [`Version::truncate`] level and to report
/// which component of an input failed to parse.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The major number.
    Major,

    /// The minor number.
    Minor,

    /// The patch number.
    Patch,

    /// The prerelease identifiers.
    Prerelease,

    /// The build metadata identifiers.
    Build,
}

/// A semantic version, such as `1.2.3-rc.1+build.5`.
///
/// Versions come in two shapes:
/// - Strict versions always carry major, minor, and patch numbers,
///   and a (possibly empty) list of prerelease and build identifiers.
/// - Partial versions may leave trailing components absent, like `1`, `1.2`, or `1.2.3-`.
///   Absent components act as wildcards when compared.
///
/// Equality and hashing are structural: two versions are equal when every
/// component is equal, where an absent component differs from an empty one.
/// Precedence is reported by [`Version::compare`]; versions whose build
/// metadata differ have no precedence relation, so this type implements
/// [`PartialOrd`] but not [`Ord`].
///
/// [`PartialOrd`] stays consistent with equality: a partial version that
/// [`Version::compare`] reports as `Equal` to a version it is not equal to
/// (`1.2` against `1.2.5`) has no [`partial_cmp`](PartialOrd::partial_cmp)
/// ordering, so `<=` and `>=` are both `false` for that pair.
/// Use [`Version::compare`] for wildcard-aware comparison.
#[derive(Derivative, Documented, Clone)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Version {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
    prerelease: Option<Vec<Identifier>>,
    build: Option<Vec<Identifier>>,

    /// Partial-ness is fully described by which components are absent.
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    partial: bool,
}

#[bon]
impl Version {
    /// Create a version from its parts.
    ///
    /// Strict versions require `minor` and `patch`; absent build `metadata` becomes an empty list.
    /// Partial versions may leave trailing numbers absent,
    /// but cannot have a `patch` without a `minor`.
    ///
    /// ```
    /// # use semantic_version::Version;
    /// let version = Version::builder()
    ///     .major(1)
    ///     .minor(2)
    ///     .patch(3)
    ///     .prerelease(vec!["rc".parse()?, "1".parse()?])
    ///     .build()?;
    /// assert_eq!(version.to_string(), "1.2.3-rc.1");
    /// # Ok::<(), semantic_version::InvalidVersion>(())
    /// ```
    #[builder]
    pub fn new(
        major: u64,
        minor: Option<u64>,
        patch: Option<u64>,
        prerelease: Option<Vec<Identifier>>,
        metadata: Option<Vec<Identifier>>,
        #[builder(default)] partial: bool,
    ) -> Result<Self, InvalidVersion> {
        let missing = match (minor, patch) {
            (None, Some(_)) => Some(Level::Minor),
            (None, None) if !partial => Some(Level::Minor),
            (Some(_), None) if !partial => Some(Level::Patch),
            _ => None,
        };
        if let Some(component) = missing {
            error::fatal!(InvalidVersion::Incomplete { component });
        }
        if let Some(zeroed) = prerelease.iter().flatten().find(|id| id.has_leading_zero()) {
            let input = zeroed.to_string();
            error::fatal!(InvalidVersion::LeadingZero {
                span: (0, input.len()).into(),
                input,
                component: Level::Prerelease,
            });
        }

        let absent = if partial { None } else { Some(Vec::new()) };
        Ok(Self {
            major,
            minor,
            patch,
            prerelease: prerelease.or_else(|| absent.clone()),
            build: metadata.or(absent),
            partial,
        })
    }
}

impl Version {
    /// Create a strict release version with no prerelease or build metadata.
    pub const fn release(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor: Some(minor),
            patch: Some(patch),
            prerelease: Some(Vec::new()),
            build: Some(Vec::new()),
            partial: false,
        }
    }

    /// Parse a strict version, like `1.2.3` or `1.2.3-rc.1+build.5`.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, InvalidVersion> {
        Self::parse_text(input.as_ref(), false)
    }

    /// Parse a partial version, like `1`, `1.2`, or `1.2.3-`.
    ///
    /// Absent components stay absent. A trailing `-` or `+` records
    /// an empty, but present, prerelease or build list.
    pub fn parse_partial(input: impl AsRef<str>) -> Result<Self, InvalidVersion> {
        Self::parse_text(input.as_ref(), true)
    }

    /// Coerce an arbitrary version string into a strict version.
    ///
    /// - Missing minor and patch numbers are filled with zeros.
    /// - Characters outside `[a-zA-Z0-9+.-]` become `-`.
    /// - Extra dot-separated numbers become build metadata.
    ///
    /// ```
    /// # use semantic_version::Version;
    /// assert_eq!(Version::coerce("0.1")?.to_string(), "0.1.0");
    /// assert_eq!(Version::coerce("0.1.2.3+4")?.to_string(), "0.1.2+3.4");
    /// assert_eq!(Version::coerce("0.1+2-3+4_5")?.to_string(), "0.1.0+2-3.4-5");
    /// # Ok::<(), semantic_version::InvalidVersion>(())
    /// ```
    pub fn coerce(input: impl AsRef<str>) -> Result<Self, InvalidVersion> {
        Self::coerce_text(input.as_ref(), false)
    }

    /// Coerce an arbitrary version string into a partial version.
    ///
    /// Behaves like [`Version::coerce`], except missing numbers stay absent.
    pub fn coerce_partial(input: impl AsRef<str>) -> Result<Self, InvalidVersion> {
        Self::coerce_text(input.as_ref(), true)
    }

    /// The major number.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor number, absent only in partial versions.
    pub fn minor(&self) -> Option<u64> {
        self.minor
    }

    /// The patch number, absent only in partial versions.
    pub fn patch(&self) -> Option<u64> {
        self.patch
    }

    /// The prerelease identifiers, absent only in partial versions.
    pub fn prerelease(&self) -> Option<&[Identifier]> {
        self.prerelease.as_deref()
    }

    /// The build metadata identifiers, absent only in partial versions.
    pub fn build(&self) -> Option<&[Identifier]> {
        self.build.as_deref()
    }

    /// Whether the version has at least one prerelease identifier.
    pub fn is_prerelease(&self) -> bool {
        self.prerelease().is_some_and(|pre| !pre.is_empty())
    }

    /// Whether the version has at least one build metadata identifier.
    pub fn has_build(&self) -> bool {
        self.build().is_some_and(|build| !build.is_empty())
    }

    /// Whether the version was created in partial mode.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Compare two versions by SemVer precedence.
    ///
    /// Returns `None` when the versions differ only by build metadata,
    /// which carries no ordering.
    /// If either side is partial, absent minor, patch, or build components
    /// compare equal to anything.
    ///
    /// ```
    /// # use std::cmp::Ordering;
    /// # use semantic_version::Version;
    /// let alpha = Version::parse("1.0.0-alpha")?;
    /// let release = Version::parse("1.0.0")?;
    /// assert_eq!(alpha.compare(&release), Some(Ordering::Less));
    ///
    /// let a = Version::parse("1.0.0+a")?;
    /// let b = Version::parse("1.0.0+b")?;
    /// assert_eq!(a.compare(&b), None);
    /// # Ok::<(), semantic_version::InvalidVersion>(())
    /// ```
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let partial = self.partial || other.partial;
        let component = |a: Option<u64>, b: Option<u64>| match (a, b) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ if partial => Ordering::Equal,
            (a, b) => a.cmp(&b),
        };

        let ordering = self
            .major
            .cmp(&other.major)
            .then(component(self.minor, other.minor))
            .then(component(self.patch, other.patch))
            .then_with(|| compare_prerelease(self.prerelease(), other.prerelease()));
        if ordering.is_ne() {
            return Some(ordering);
        }

        match (&self.build, &other.build) {
            (a, b) if a == b => Some(Ordering::Equal),
            (None, _) | (_, None) if partial => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Compare two versions, failing if they have no precedence relation.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, Incomparable> {
        self.compare(other).ok_or_else(|| Incomparable {
            left: self.to_string(),
            right: other.to_string(),
        })
    }

    /// The next major version.
    ///
    /// A prerelease of an `X.0.0` version bumps to `X.0.0` itself.
    /// The result never carries prerelease or build metadata.
    /// Numbers saturate at [`u64::MAX`]; see [`Version::checked_next_major`].
    ///
    /// ```
    /// # use semantic_version::Version;
    /// assert_eq!(Version::parse("1.2.3")?.next_major(), Version::release(2, 0, 0));
    /// assert_eq!(Version::parse("1.0.0-rc.1")?.next_major(), Version::release(1, 0, 0));
    /// # Ok::<(), semantic_version::InvalidVersion>(())
    /// ```
    pub fn next_major(&self) -> Self {
        self.checked_next_major()
            .unwrap_or_else(|| self.with_numbers(u64::MAX, Some(0), Some(0), None))
    }

    /// The next minor version.
    ///
    /// A prerelease of an `X.Y.0` version bumps to `X.Y.0` itself.
    pub fn next_minor(&self) -> Self {
        self.checked_next_minor()
            .unwrap_or_else(|| self.with_numbers(self.major, Some(u64::MAX), Some(0), None))
    }

    /// The next patch version.
    ///
    /// A prerelease bumps to its own release.
    pub fn next_patch(&self) -> Self {
        self.checked_next_patch().unwrap_or_else(|| {
            let minor = self.minor.unwrap_or_default();
            self.with_numbers(self.major, Some(minor), Some(u64::MAX), None)
        })
    }

    /// Like [`Version::next_major`], but `None` if the major number would overflow
    /// instead of saturating at [`u64::MAX`].
    ///
    /// ```
    /// # use semantic_version::Version;
    /// assert_eq!(Version::release(u64::MAX, 1, 0).checked_next_major(), None);
    /// assert_eq!(Version::release(1, 2, 3).checked_next_major(), Some(Version::release(2, 0, 0)));
    /// ```
    pub fn checked_next_major(&self) -> Option<Self> {
        let major = if self.is_prerelease() && self.minor == Some(0) && self.patch == Some(0) {
            self.major
        } else {
            self.major.checked_add(1)?
        };
        Some(self.with_numbers(major, Some(0), Some(0), None))
    }

    /// Like [`Version::next_minor`], but `None` on overflow.
    pub fn checked_next_minor(&self) -> Option<Self> {
        let minor = self.minor.unwrap_or_default();
        let minor = if self.is_prerelease() && self.patch == Some(0) {
            minor
        } else {
            minor.checked_add(1)?
        };
        Some(self.with_numbers(self.major, Some(minor), Some(0), None))
    }

    /// Like [`Version::next_patch`], but `None` on overflow.
    pub fn checked_next_patch(&self) -> Option<Self> {
        let patch = self.patch.unwrap_or_default();
        let patch = if self.is_prerelease() {
            patch
        } else {
            patch.checked_add(1)?
        };
        let minor = self.minor.unwrap_or_default();
        Some(self.with_numbers(self.major, Some(minor), Some(patch), None))
    }

    /// Drop all information below `level`.
    ///
    /// Strict versions fill dropped numbers with zeros;
    /// partial versions leave them absent.
    ///
    /// ```
    /// # use semantic_version::{Level, Version};
    /// let version = Version::parse("1.2.3-rc.1+build.5")?;
    /// assert_eq!(version.truncate(Level::Prerelease).to_string(), "1.2.3-rc.1");
    /// assert_eq!(version.truncate(Level::Minor).to_string(), "1.2.0");
    /// # Ok::<(), semantic_version::InvalidVersion>(())
    /// ```
    pub fn truncate(&self, level: Level) -> Self {
        let dropped = if self.partial { None } else { Some(0) };
        match level {
            Level::Build => self.clone(),
            Level::Prerelease => {
                self.with_numbers(self.major, self.minor, self.patch, self.prerelease.clone())
            }
            Level::Patch => self.with_numbers(self.major, self.minor, self.patch, None),
            Level::Minor => self.with_numbers(self.major, self.minor, dropped, None),
            Level::Major => self.with_numbers(self.major, dropped, dropped, None),
        }
    }

    /// The lowest version sharing this version's major, minor, and patch numbers:
    /// `M.m.p-0`, since `0` is the lowest possible prerelease identifier.
    pub(crate) fn floor(&self) -> Self {
        self.with_numbers(
            self.major,
            Some(self.minor.unwrap_or_default()),
            Some(self.patch.unwrap_or_default()),
            Some(vec![Identifier::from_trusted("0")]),
        )
    }

    /// Whether both versions share major, minor, and patch numbers.
    pub(crate) fn same_release(&self, other: &Self) -> bool {
        self.truncate(Level::Patch).compare(&other.truncate(Level::Patch)) == Some(Ordering::Equal)
    }

    /// Rebuild with new numbers and prerelease, keeping partial-ness and dropping build metadata.
    fn with_numbers(
        &self,
        major: u64,
        minor: Option<u64>,
        patch: Option<u64>,
        prerelease: Option<Vec<Identifier>>,
    ) -> Self {
        let absent = if self.partial { None } else { Some(Vec::new()) };
        Self {
            major,
            minor,
            patch,
            prerelease: prerelease.or_else(|| absent.clone()),
            build: absent,
            partial: self.partial,
        }
    }

    fn parse_text(input: &str, partial: bool) -> Result<Self, InvalidVersion> {
        if input.is_empty() {
            error::fatal!(InvalidVersion::Empty);
        }

        let syntax = |rest: &str| InvalidVersion::Syntax {
            input: input.to_string(),
            span: error::span(input, rest),
        };
        let (_, parts) = all_consuming(Fragments::parse)
            .parse(input)
            .finish()
            .map_err(|err| syntax(err.input))?;

        if !partial {
            let end = &input[input.len()..];
            if parts.minor.is_none() || parts.patch.is_none() {
                error::fatal!(syntax(end));
            }
            if let Some(empty) = [parts.prerelease, parts.build]
                .into_iter()
                .flatten()
                .find(|text| text.is_empty())
            {
                error::fatal!(syntax(empty));
            }
        }

        let major = number(input, parts.major, Level::Major)?;
        let minor = parts
            .minor
            .map(|text| number(input, text, Level::Minor))
            .transpose()?;
        let patch = parts
            .patch
            .map(|text| number(input, text, Level::Patch))
            .transpose()?;

        let (prerelease, build) = match (parts.prerelease, parts.build) {
            (None, None) if partial => (None, None),
            (prerelease, build) => {
                let prerelease = prerelease
                    .map(|text| identifiers(input, text, Level::Prerelease))
                    .transpose()?
                    .unwrap_or_default();
                let build = match build {
                    Some(text) => Some(identifiers(input, text, Level::Build)?),
                    None if partial => None,
                    None => Some(Vec::new()),
                };
                (Some(prerelease), build)
            }
        };

        Ok(Self {
            major,
            minor,
            patch,
            prerelease,
            build,
            partial,
        })
    }

    #[tracing::instrument]
    fn coerce_text(input: &str, partial: bool) -> Result<Self, InvalidVersion> {
        let Some(numbers) = regex_find!(r"^[0-9]+(?:\.[0-9]+(?:\.[0-9]+)?)?", input) else {
            error::fatal!(InvalidVersion::NotNumeric {
                input: input.to_string()
            });
        };

        let mut version = String::from(numbers);
        if !partial {
            for _ in numbers.matches('.').count()..2 {
                version.push_str(".0");
            }
        }

        let rest = regex!(r"[^a-zA-Z0-9+.-]").replace_all(&input[numbers.len()..], "-");
        let (prerelease, build) = match rest.strip_prefix(|c: char| c == '+' || c == '.') {
            Some(build) => ("", build),
            None => {
                let rest = rest.strip_prefix('-').unwrap_or(&rest);
                rest.split_once('+').unwrap_or((rest, ""))
            }
        };

        if !prerelease.is_empty() {
            version.push('-');
            version.push_str(prerelease);
        }
        if !build.is_empty() {
            version.push('+');
            version.push_str(&build.replace('+', "."));
        }

        debug!(%version, "coerced");
        Self::parse_text(&version, partial)
    }
}

/// The raw text of each component of a version, before validation.
struct Fragments<'a> {
    major: &'a str,
    minor: Option<&'a str>,
    patch: Option<&'a str>,
    prerelease: Option<&'a str>,
    build: Option<&'a str>,
}

impl<'a> Fragments<'a> {
    fn parse(input: &'a str) -> IResult<&'a str, Self> {
        let (input, (major, numbers, prerelease, build)) = (
            digit1,
            opt((
                preceded(char('.'), digit1),
                opt(preceded(char('.'), digit1)),
            )),
            opt(preceded(char('-'), segment)),
            opt(preceded(char('+'), segment)),
        )
            .parse(input)?;

        let (minor, patch) = match numbers {
            Some((minor, patch)) => (Some(minor), patch),
            None => (None, None),
        };
        Ok((
            input,
            Self {
                major,
                minor,
                patch,
                prerelease,
                build,
            },
        ))
    }
}

/// A run of identifier characters and dots, possibly empty.
pub(crate) fn segment(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| is_identifier_char(c) || c == '.').parse(input)
}

/// Parse a numeric component, rejecting leading zeros.
pub(crate) fn number(input: &str, text: &str, component: Level) -> Result<u64, InvalidVersion> {
    if has_leading_zero(text) {
        error::fatal!(InvalidVersion::LeadingZero {
            input: input.to_string(),
            component,
            span: error::span(input, text),
        });
    }
    text.parse().map_err(|_| InvalidVersion::Overflow {
        input: input.to_string(),
        component,
        span: error::span(input, text),
    })
}

/// Split a dot-separated identifier list; the empty string is the empty list.
pub(crate) fn identifiers(
    input: &str,
    text: &str,
    level: Level,
) -> Result<Vec<Identifier>, InvalidVersion> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split('.')
        .map(|id| {
            if id.is_empty() {
                return Err(InvalidVersion::EmptyIdentifier {
                    input: input.to_string(),
                    span: error::span(input, text),
                });
            }
            if level == Level::Prerelease && has_leading_zero(id) {
                return Err(InvalidVersion::LeadingZero {
                    input: input.to_string(),
                    component: level,
                    span: error::span(input, id),
                });
            }
            Ok(Identifier::from_trusted(id))
        })
        .collect()
}

/// A version without prerelease identifiers sorts after one with them.
fn compare_prerelease(a: Option<&[Identifier]>, b: Option<&[Identifier]>) -> Ordering {
    let (a, b) = (a.unwrap_or_default(), b.unwrap_or_default());
    match (a.is_empty(), b.is_empty()) {
        (false, false) => compare_identifier_list(a, b),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Renders identifiers joined by dots.
struct Dotted<'a>(&'a [Identifier]);

impl fmt::Display for Dotted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(id.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }

        match &self.prerelease {
            Some(pre) if !pre.is_empty() => write!(f, "-{}", Dotted(pre))?,
            Some(_) if self.partial && self.build.is_none() => f.write_str("-")?,
            _ => {}
        }
        match &self.build {
            Some(build) if !build.is_empty() => write!(f, "+{}", Dotted(build))?,
            Some(_) if self.partial => f.write_str("+")?,
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.partial {
            write!(f, "Version({self}, partial)")
        } else {
            write!(f, "Version({self})")
        }
    }
}

/// Orders versions by precedence where that agrees with equality.
///
/// Returns `None` both for differing build metadata and for partial
/// wildcards that [`Version::compare`] reports as `Equal` to an unequal version.
///
/// ```
/// # use std::cmp::Ordering;
/// # use semantic_version::Version;
/// let partial = Version::parse_partial("1.2")?;
/// let strict = Version::parse("1.2.5")?;
/// assert_eq!(partial.compare(&strict), Some(Ordering::Equal));
/// assert_eq!(partial.partial_cmp(&strict), None);
/// assert!(!(partial <= strict) && !(partial >= strict));
/// # Ok::<(), semantic_version::InvalidVersion>(())
/// ```
impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.compare(other) {
            // Partial wildcards compare equal without being equal.
            Some(Ordering::Equal) if self != other => None,
            ordering => ordering,
        }
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

duplicate! {
    [
        ty;
        [ &str ];
        [ &String ];
        [ String ];
    ]
    impl TryFrom<ty> for Version {
        type Error = InvalidVersion;
        fn try_from(s: ty) -> Result<Self, Self::Error> {
            Self::parse(s)
        }
    }
}

impl From<&Version> for Version {
    fn from(value: &Version) -> Self {
        value.clone()
    }
}

impl From<semver::Version> for Version {
    fn from(value: semver::Version) -> Self {
        let identifiers = |text: &str| {
            if text.is_empty() {
                Vec::new()
            } else {
                text.split('.').map(Identifier::from_trusted).collect()
            }
        };
        Self {
            major: value.major,
            minor: Some(value.minor),
            patch: Some(value.patch),
            prerelease: Some(identifiers(value.pre.as_str())),
            build: Some(identifiers(value.build.as_str())),
            partial: false,
        }
    }
}

impl From<&semver::Version> for Version {
    fn from(value: &semver::Version) -> Self {
        Self::from(value.clone())
    }
}

impl TryFrom<&Version> for semver::Version {
    type Error = InvalidVersion;

    fn try_from(value: &Version) -> Result<Self, Self::Error> {
        let (Some(minor), Some(patch)) = (value.minor, value.patch) else {
            error::fatal!(InvalidVersion::Incomplete {
                component: if value.minor.is_none() {
                    Level::Minor
                } else {
                    Level::Patch
                }
            });
        };
        let convert = |err: semver::Error| InvalidVersion::Semver {
            input: value.to_string(),
            message: err.to_string(),
        };
        let prerelease = Dotted(value.prerelease().unwrap_or_default()).to_string();
        let build = Dotted(value.build().unwrap_or_default()).to_string();
        Ok(semver::Version {
            major: value.major,
            minor,
            patch,
            pre: semver::Prerelease::new(&prerelease).map_err(convert)?,
            build: semver::BuildMetadata::new(&build).map_err(convert)?,
        })
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

/// Serialize and deserialize partial versions,
/// for use with `#[serde(with = "semantic_version::version::partial")]`.
pub mod partial {
    use serde::Deserialize;

    use super::Version;

    /// Serialize a version as its display string.
    pub fn serialize<S>(version: &Version, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(version)
    }

    /// Deserialize a version from a string in partial mode.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Version, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Version::parse_partial(s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for Version {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!("1.0.0"),
                json!("1.0.0-rc.1"),
                json!("1.0.0-beta.11+build.5"),
            ])
            .min_length(Some(5))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for Version {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Version")
    }
}
