//! A boolean algebra of version predicates.
//!
//! Grammars compile spec expressions into a [`Clause`] tree:
//! [`Range`] leaves compare a version against a target,
//! and [`Clause::AllOf`] / [`Clause::AnyOf`] combine them.

use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    ops::{BitAnd, BitOr},
};

use bon::bon;
use enum_assoc::Assoc;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Identifier, InvalidSpec, Level, Version, error};

/// The comparison performed by a [`Range`].
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
    Assoc,
)]
#[func(const fn orderless(&self) -> bool)]
pub enum Operator {
    /// Matches versions equal to the target.
    #[strum(serialize = "==")]
    #[assoc(orderless = true)]
    Equal,

    /// Matches versions with higher precedence than the target.
    #[strum(serialize = ">")]
    #[assoc(orderless = false)]
    Greater,

    /// Matches versions with at least the target's precedence.
    #[strum(serialize = ">=")]
    #[assoc(orderless = false)]
    GreaterEqual,

    /// Matches versions with lower precedence than the target.
    #[strum(serialize = "<")]
    #[assoc(orderless = false)]
    Less,

    /// Matches versions with at most the target's precedence.
    #[strum(serialize = "<=")]
    #[assoc(orderless = false)]
    LessEqual,

    /// Matches versions not equal to the target.
    #[strum(serialize = "!=")]
    #[assoc(orderless = true)]
    NotEqual,
}

impl Operator {
    /// Whether the operator can compare against a target carrying build metadata.
    ///
    /// Build metadata has no ordering, so only equality operators accept it.
    pub const fn allows_build(&self) -> bool {
        self.orderless()
    }
}

/// How a [`Range`] treats versions carrying prerelease identifiers.
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
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PrereleasePolicy {
    /// `<1.2.3` and `!=1.2.3` do not match prereleases of `1.2.3`.
    #[default]
    Natural,

    /// Prereleases compare by plain precedence: `<1.2.3` matches `1.2.3-rc.1`.
    Always,

    /// Prereleases only match when they share major, minor, and patch with the target.
    SamePatch,
}

/// How a [`Range`] treats build metadata on the version under test.
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
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BuildPolicy {
    /// Build metadata is ignored: `==1.2.3` matches `1.2.3+4`.
    #[default]
    Implicit,

    /// Build metadata must match exactly: `==1.2.3+` matches only `1.2.3`.
    Strict,
}

/// A single comparison of a version against a target.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Getters, CopyGetters)]
pub struct Range {
    /// The comparison to perform.
    #[getset(get_copy = "pub")]
    operator: Operator,

    /// The version compared against.
    #[getset(get = "pub")]
    target: Version,

    /// How versions carrying prerelease identifiers are treated.
    #[getset(get_copy = "pub")]
    prerelease_policy: PrereleasePolicy,

    /// How build metadata on the version under test is treated.
    #[getset(get_copy = "pub")]
    build_policy: BuildPolicy,
}

#[bon]
impl Range {
    /// Create a range.
    ///
    /// Build metadata has no ordering, so a target carrying build metadata
    /// is only valid with [`Operator::Equal`] and [`Operator::NotEqual`],
    /// and always forces [`BuildPolicy::Strict`].
    ///
    /// ```
    /// # use semantic_version::{Operator, Range, version};
    /// let range = Range::builder()
    ///     .operator(Operator::GreaterEqual)
    ///     .target(version!(1, 2, 3))
    ///     .build()?;
    /// assert!(range.matches(&version!(1, 3, 0)));
    ///
    /// let invalid = Range::builder()
    ///     .operator(Operator::Less)
    ///     .target(version!("1.2.3+build"))
    ///     .build();
    /// assert!(invalid.is_err());
    /// # Ok::<(), semantic_version::InvalidSpec>(())
    /// ```
    #[builder]
    pub fn new(
        operator: Operator,
        #[builder(into)] target: Version,
        #[builder(default)] prerelease_policy: PrereleasePolicy,
        #[builder(default)] build_policy: BuildPolicy,
    ) -> Result<Self, InvalidSpec> {
        if target.has_build() && !operator.allows_build() {
            let input = format!("{operator}{target}");
            error::fatal!(InvalidSpec::BuildOrdering {
                span: (0, input.len()).into(),
                input,
                operator: operator.to_string(),
            });
        }

        let build_policy = if target.has_build() {
            BuildPolicy::Strict
        } else {
            build_policy
        };
        Ok(Self {
            operator,
            target,
            prerelease_policy,
            build_policy,
        })
    }
}

impl Range {
    /// Report whether `version` satisfies the range.
    pub fn matches(&self, version: &Version) -> bool {
        let version = match self.build_policy {
            BuildPolicy::Strict => Cow::Borrowed(version),
            BuildPolicy::Implicit => Cow::Owned(version.truncate(Level::Prerelease)),
        };

        if version.is_prerelease()
            && self.prerelease_policy == PrereleasePolicy::SamePatch
            && !self.target.same_release(&version)
        {
            return false;
        }

        let ordering = version.compare(&self.target);
        match (self.operator, self.build_policy) {
            (Operator::Equal, BuildPolicy::Strict) => self.equals_exactly(&version),
            (Operator::Equal, BuildPolicy::Implicit) => ordering == Some(Ordering::Equal),
            (Operator::Greater, _) => ordering == Some(Ordering::Greater),
            (Operator::GreaterEqual, _) => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
            (Operator::Less, _) => {
                !self.excludes_prerelease(&version) && ordering == Some(Ordering::Less)
            }
            (Operator::LessEqual, _) => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            (Operator::NotEqual, BuildPolicy::Strict) => !self.equals_exactly(&version),
            (Operator::NotEqual, BuildPolicy::Implicit) => {
                !self.excludes_prerelease(&version) && ordering != Some(Ordering::Equal)
            }
        }
    }

    /// Equal up to prerelease, with identical build metadata.
    fn equals_exactly(&self, version: &Version) -> bool {
        let target = self.target.truncate(Level::Prerelease);
        target.compare(&version.truncate(Level::Prerelease)) == Some(Ordering::Equal)
            && version.build() == self.target.build()
    }

    /// Under the natural policy, prereleases of a release target sit outside `<` and `!=`.
    fn excludes_prerelease(&self, version: &Version) -> bool {
        self.prerelease_policy == PrereleasePolicy::Natural
            && version.is_prerelease()
            && !self.target.is_prerelease()
            && self.target.same_release(version)
    }

    /// Structural ordering used to keep clause sets canonical.
    fn key(
        &self,
    ) -> (
        Operator,
        (
            u64,
            Option<u64>,
            Option<u64>,
            Option<&[Identifier]>,
            Option<&[Identifier]>,
        ),
        PrereleasePolicy,
        BuildPolicy,
    ) {
        let target = &self.target;
        (
            self.operator,
            (
                target.major(),
                target.minor(),
                target.patch(),
                target.prerelease(),
                target.build(),
            ),
            self.prerelease_policy,
            self.build_policy,
        )
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.target)
    }
}

/// A boolean expression over a single version.
///
/// Composite clauses hold ordered sets, so duplicate children collapse
/// and equality ignores the order children were added in.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Clause {
    /// Matches every version.
    Always,

    /// Matches no version.
    Never,

    /// Matches versions satisfying a single comparison.
    Range(Range),

    /// Matches versions satisfying every child.
    AllOf(BTreeSet<Clause>),

    /// Matches versions satisfying at least one child.
    AnyOf(BTreeSet<Clause>),
}

impl Clause {
    /// Conjunction of the provided clauses.
    pub fn all_of(clauses: impl IntoIterator<Item = Clause>) -> Self {
        Self::AllOf(clauses.into_iter().collect())
    }

    /// Disjunction of the provided clauses.
    pub fn any_of(clauses: impl IntoIterator<Item = Clause>) -> Self {
        Self::AnyOf(clauses.into_iter().collect())
    }

    /// Report whether `version` satisfies the clause.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Clause::Always => true,
            Clause::Never => false,
            Clause::Range(range) => range.matches(version),
            Clause::AllOf(clauses) => clauses.iter().all(|c| c.matches(version)),
            Clause::AnyOf(clauses) => clauses.iter().any(|c| c.matches(version)),
        }
    }

    /// Return an equivalent clause with nested composites flattened,
    /// identities removed, and singleton composites collapsed.
    ///
    /// ```
    /// # use semantic_version::{Clause, Operator, Range, version};
    /// let range = Clause::from(Range::builder().operator(Operator::Less).target(version!(2, 0, 0)).build()?);
    /// let clause = Clause::all_of([Clause::Always, range.clone()]);
    /// assert_eq!(clause.simplify(), range);
    /// # Ok::<(), semantic_version::InvalidSpec>(())
    /// ```
    pub fn simplify(&self) -> Self {
        match self {
            Clause::AllOf(clauses) => {
                let mut flat = BTreeSet::new();
                for clause in clauses.iter().map(Clause::simplify) {
                    match clause {
                        Clause::AllOf(inner) => flat.extend(inner),
                        Clause::Always => {}
                        Clause::Never => return Clause::Never,
                        other => {
                            flat.insert(other);
                        }
                    }
                }
                Self::collapse(flat, Clause::Always, Clause::AllOf)
            }
            Clause::AnyOf(clauses) => {
                let mut flat = BTreeSet::new();
                for clause in clauses.iter().map(Clause::simplify) {
                    match clause {
                        Clause::AnyOf(inner) => flat.extend(inner),
                        Clause::Never => {}
                        Clause::Always => return Clause::Always,
                        other => {
                            flat.insert(other);
                        }
                    }
                }
                Self::collapse(flat, Clause::Never, Clause::AnyOf)
            }
            other => other.clone(),
        }
    }

    fn collapse(
        mut clauses: BTreeSet<Clause>,
        identity: Clause,
        wrap: fn(BTreeSet<Clause>) -> Clause,
    ) -> Clause {
        match clauses.len() {
            0 => identity,
            1 => clauses.pop_first().unwrap_or(identity),
            _ => wrap(clauses),
        }
    }

    /// Combine with `other` so that both must match.
    ///
    /// [`Clause::Always`] is the identity and [`Clause::Never`] absorbs;
    /// conjunctions merge instead of nesting.
    pub fn and(self, other: Clause) -> Clause {
        match (self, other) {
            (Clause::Never, _) | (_, Clause::Never) => Clause::Never,
            (Clause::Always, other) | (other, Clause::Always) => other,
            (Clause::AllOf(mut a), Clause::AllOf(b)) => {
                a.extend(b);
                Clause::AllOf(a)
            }
            (Clause::AllOf(mut set), other) | (other, Clause::AllOf(mut set)) => {
                set.insert(other);
                Clause::AllOf(set)
            }
            (a, b) => Clause::all_of([a, b]),
        }
    }

    /// Combine with `other` so that either may match.
    ///
    /// [`Clause::Never`] is the identity and [`Clause::Always`] absorbs;
    /// disjunctions merge instead of nesting.
    pub fn or(self, other: Clause) -> Clause {
        match (self, other) {
            (Clause::Always, _) | (_, Clause::Always) => Clause::Always,
            (Clause::Never, other) | (other, Clause::Never) => other,
            (Clause::AnyOf(mut a), Clause::AnyOf(b)) => {
                a.extend(b);
                Clause::AnyOf(a)
            }
            (Clause::AnyOf(mut set), other) | (other, Clause::AnyOf(mut set)) => {
                set.insert(other);
                Clause::AnyOf(set)
            }
            (a, b) => Clause::any_of([a, b]),
        }
    }
}

impl From<Range> for Clause {
    fn from(range: Range) -> Self {
        Clause::Range(range)
    }
}

impl BitAnd for Clause {
    type Output = Clause;

    fn bitand(self, rhs: Clause) -> Clause {
        self.and(rhs)
    }
}

impl BitOr for Clause {
    type Output = Clause;

    fn bitor(self, rhs: Clause) -> Clause {
        self.or(rhs)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Always => f.write_str("*"),
            Clause::Never => f.write_str("!*"),
            Clause::Range(range) => write!(f, "{range}"),
            Clause::AllOf(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    match clause {
                        Clause::AnyOf(_) => write!(f, "({clause})")?,
                        _ => write!(f, "{clause}")?,
                    }
                }
                Ok(())
            }
            Clause::AnyOf(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" || ")?;
                    }
                    write!(f, "{clause}")?;
                }
                Ok(())
            }
        }
    }
}
