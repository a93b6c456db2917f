//! Version range expressions and the grammars that parse them.

use std::{borrow::Borrow, borrow::Cow, cmp::Ordering, fmt, str::FromStr};

use compact_str::CompactString;
use derivative::Derivative;
use documented::Documented;
use getset::{CopyGetters, Getters};
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, one_of},
    combinator::{map, opt, value},
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
    Clause, InvalidSpec, InvalidVersion, Level, Version, error,
    version::{identifiers, number, segment},
};

pub mod npm;
pub mod simple;

/// The grammars a [`Spec`] can be written in, keyed by name.
///
/// ```
/// # use semantic_version::Syntax;
/// assert_eq!(Syntax::from_name("npm")?, Syntax::Npm);
/// assert_eq!(Syntax::default().to_string(), "simple");
/// assert!(Syntax::from_name("cargo").is_err());
/// # Ok::<(), semantic_version::InvalidSpec>(())
/// ```
#[derive(
    Copy,
    Clone,
    Default,
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
    ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// Comma-separated comparisons, like `>=1.2.3,<2.0.0` or `^1.2`.
    /// See [`simple`].
    #[default]
    Simple,

    /// NPM ranges, like `1.2.3 - 2.3.4 || ^3.0.0`.
    /// See [`npm`].
    Npm,
}

impl Syntax {
    /// Look up a syntax by its registered name.
    pub fn from_name(name: &str) -> Result<Self, InvalidSpec> {
        name.parse().map_err(|_| InvalidSpec::UnknownSyntax {
            name: name.to_string(),
        })
    }

    /// Compile an expression written in this syntax.
    fn compile(self, expression: &str) -> Result<Clause, InvalidSpec> {
        match self {
            Syntax::Simple => simple::parse(expression),
            Syntax::Npm => npm::parse(expression),
        }
    }
}

/// A parsed version range expression.
///
/// A spec remembers the text and syntax it was parsed from,
/// but equality and hashing only consider the simplified [`Clause`] it compiles to:
/// differently written expressions that mean the same thing compare equal.
///
/// ```
/// # use semantic_version::{Spec, version};
/// let spec = Spec::simple(">=0.1.1,<0.2.0")?;
/// assert!(spec.matches(&version!(0, 1, 5)));
/// assert!(!spec.matches(&version!(0, 2, 0)));
///
/// let candidates = [version!(0, 1, 0), version!(0, 1, 5), version!(0, 2, 0)];
/// assert_eq!(spec.select(&candidates), Some(&version!(0, 1, 5)));
///
/// assert_eq!(Spec::npm(">=1.2.3")?, Spec::npm(">= 1.2.3")?);
/// # Ok::<(), semantic_version::InvalidSpec>(())
/// ```
#[derive(Derivative, Documented, Clone, Getters, CopyGetters, Serialize, Deserialize)]
#[derivative(PartialEq, Eq, Hash)]
#[serde(into = "SpecRepr", try_from = "SpecRepr")]
pub struct Spec {
    /// The expression the spec was parsed from.
    #[getset(get = "pub")]
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    expression: CompactString,

    /// The grammar the expression was written in.
    #[getset(get_copy = "pub")]
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    syntax: Syntax,

    /// The simplified clause the expression compiles to.
    #[getset(get = "pub")]
    clause: Clause,
}

impl Spec {
    /// Parse an expression written in the provided syntax.
    #[tracing::instrument]
    pub fn parse(expression: &str, syntax: Syntax) -> Result<Self, InvalidSpec> {
        let clause = syntax.compile(expression)?.simplify();
        debug!(%clause, "compiled");
        Ok(Self {
            expression: expression.into(),
            syntax,
            clause,
        })
    }

    /// Parse an expression written in the [`Syntax::Simple`] grammar.
    pub fn simple(expression: impl AsRef<str>) -> Result<Self, InvalidSpec> {
        Self::parse(expression.as_ref(), Syntax::Simple)
    }

    /// Parse an expression written in the [`Syntax::Npm`] grammar.
    pub fn npm(expression: impl AsRef<str>) -> Result<Self, InvalidSpec> {
        Self::parse(expression.as_ref(), Syntax::Npm)
    }

    /// Report whether `version` satisfies the spec.
    pub fn matches(&self, version: &Version) -> bool {
        self.clause.matches(version)
    }

    /// Report whether `version` satisfies the spec.
    pub fn contains(&self, version: &Version) -> bool {
        self.matches(version)
    }

    /// Lazily yield the versions satisfying the spec, in input order.
    pub fn filter<I>(&self, versions: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
        I::Item: Borrow<Version>,
    {
        versions
            .into_iter()
            .filter(|version| self.matches(<I::Item as Borrow<Version>>::borrow(version)))
    }

    /// Select the highest version satisfying the spec.
    ///
    /// Returns `None` if no version matches.
    /// Among candidates of equal precedence, the first one wins.
    pub fn select<I>(&self, versions: I) -> Option<I::Item>
    where
        I: IntoIterator,
        I::Item: Borrow<Version>,
    {
        let version = <I::Item as Borrow<Version>>::borrow;
        self.filter(versions).fold(None, |best, candidate| match best {
            Some(best) if version(&candidate).compare(version(&best)) != Some(Ordering::Greater) => {
                Some(best)
            }
            _ => Some(candidate),
        })
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Spec({}: {:?})", self.syntax, self.expression)
    }
}

impl FromStr for Spec {
    type Err = InvalidSpec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::simple(s)
    }
}

/// The serialized form of a [`Spec`].
#[derive(Serialize, Deserialize)]
struct SpecRepr {
    #[serde(default)]
    syntax: Syntax,
    expression: String,
}

impl From<Spec> for SpecRepr {
    fn from(spec: Spec) -> Self {
        Self {
            syntax: spec.syntax,
            expression: spec.expression.into(),
        }
    }
}

impl TryFrom<SpecRepr> for Spec {
    type Error = InvalidSpec;

    fn try_from(repr: SpecRepr) -> Result<Self, Self::Error> {
        Self::parse(&repr.expression, repr.syntax)
    }
}

impl PartialSchema for Spec {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .property("syntax", Syntax::schema())
            .property(
                "expression",
                ObjectBuilder::new()
                    .schema_type(Type::String)
                    .examples([json!(">=1.2.3,<2.0.0"), json!("^1.2.3 || 2.x")]),
            )
            .required("expression")
            .examples([json!({ "syntax": "npm", "expression": "^1.2.3" })])
            .build()
            .into()
    }
}

impl ToSchema for Spec {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Spec")
    }
}

/// A numeric component of a term's version pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Component<'a> {
    /// `*`, `x`, or `X`.
    Wildcard,
    Number(&'a str),
}

/// The version part of a spec term, like `1.2.x` or `1.2.3-rc.1`, before validation.
#[derive(Clone, Debug)]
pub(crate) struct Pattern<'a> {
    text: &'a str,
    major: Component<'a>,
    minor: Option<Component<'a>>,
    patch: Option<Component<'a>>,
    prerelease: Option<&'a str>,
    build: Option<&'a str>,
}

impl<'a> Pattern<'a> {
    pub(crate) fn parse(input: &'a str) -> IResult<&'a str, Self> {
        fn component(input: &str) -> IResult<&str, Component<'_>> {
            alt((
                value(Component::Wildcard, one_of("*xX")),
                map(digit1, Component::Number),
            ))
            .parse(input)
        }

        let (rest, (major, numbers, prerelease, build)) = (
            component,
            opt((
                preceded(char('.'), component),
                opt(preceded(char('.'), component)),
            )),
            opt(preceded(char('-'), segment)),
            opt(preceded(char('+'), segment)),
        )
            .parse(input)?;

        let (minor, patch) = match numbers {
            Some((minor, patch)) => (Some(minor), patch),
            None => (None, None),
        };
        let text = &input[..input.len() - rest.len()];
        Ok((
            rest,
            Self {
                text,
                major,
                minor,
                patch,
                prerelease,
                build,
            },
        ))
    }

    /// Validate the pattern and compute its target version.
    ///
    /// Absent and wildcard numbers are filled with zeros in the target;
    /// a wildcard major makes the whole target `0.0.0`.
    /// `expression` is the full expression the pattern was parsed from.
    pub(crate) fn resolve(&self, expression: &str) -> Result<Term<'a>, InvalidSpec> {
        let invalid = |source| InvalidSpec::Version {
            input: expression.to_string(),
            source,
        };
        let numeric = |component: Option<Component<'_>>, level| match component {
            Some(Component::Number(text)) => number(expression, text, level).map(Some),
            _ => Ok(None),
        };

        let major = numeric(Some(self.major), Level::Major).map_err(invalid)?;
        let minor = numeric(self.minor, Level::Minor).map_err(invalid)?;
        let patch = numeric(self.patch, Level::Patch).map_err(invalid)?;

        let decorated = [self.prerelease, self.build]
            .into_iter()
            .flatten()
            .any(|text| !text.is_empty());
        let target = match (major, minor, patch) {
            (Some(major), Some(minor), Some(patch)) => {
                let prerelease = self
                    .prerelease
                    .map(|text| identifiers(expression, text, Level::Prerelease))
                    .transpose()
                    .map_err(invalid)?;
                let metadata = self
                    .build
                    .map(|text| identifiers(expression, text, Level::Build))
                    .transpose()
                    .map_err(invalid)?;
                Version::builder()
                    .major(major)
                    .minor(minor)
                    .patch(patch)
                    .maybe_prerelease(prerelease)
                    .maybe_metadata(metadata)
                    .build()
                    .map_err(invalid)?
            }
            _ if decorated => {
                error::fatal!(InvalidSpec::Incomplete {
                    input: expression.to_string(),
                    span: error::span(expression, self.text),
                })
            }
            (None, ..) => Version::release(0, 0, 0),
            (Some(major), None, _) => Version::release(major, 0, 0),
            (Some(major), Some(minor), None) => Version::release(major, minor, 0),
        };

        Ok(Term {
            text: self.text,
            major,
            minor,
            patch,
            prerelease: self.prerelease,
            build: self.build,
            target,
        })
    }
}

/// A validated spec term pattern.
#[derive(Clone, Debug)]
pub(crate) struct Term<'a> {
    pub(crate) text: &'a str,
    pub(crate) major: Option<u64>,
    pub(crate) minor: Option<u64>,
    pub(crate) patch: Option<u64>,
    pub(crate) prerelease: Option<&'a str>,
    pub(crate) build: Option<&'a str>,
    pub(crate) target: Version,
}

impl Term<'_> {
    pub(crate) fn is_wildcard(&self) -> bool {
        self.major.is_none()
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.major.is_some() && self.minor.is_some() && self.patch.is_some()
    }

    /// The lowest version above everything the pattern covers,
    /// for patterns missing their minor or patch number:
    /// `1` yields `2.0.0` and `1.2` yields `1.3.0`.
    pub(crate) fn next_unit(&self, expression: &str) -> Result<Option<Version>, InvalidSpec> {
        match (self.major, self.minor, self.patch) {
            (Some(_), None, _) => self.ceiling(expression, Level::Major, &self.target).map(Some),
            (Some(_), Some(_), None) => {
                self.ceiling(expression, Level::Minor, &self.target).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Bump `version` at `level` to find an exclusive upper bound for this term.
    ///
    /// Levels below minor bump the patch. Fails if the bumped number
    /// does not fit in 64 bits, since no version lies above it.
    pub(crate) fn ceiling(
        &self,
        expression: &str,
        level: Level,
        version: &Version,
    ) -> Result<Version, InvalidSpec> {
        let next = match level {
            Level::Major => version.checked_next_major(),
            Level::Minor => version.checked_next_minor(),
            _ => version.checked_next_patch(),
        };
        next.ok_or_else(|| InvalidSpec::Version {
            input: expression.to_string(),
            source: InvalidVersion::Overflow {
                input: expression.to_string(),
                component: level,
                span: error::span(expression, self.text),
            },
        })
    }
}
