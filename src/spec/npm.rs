//! The NPM range grammar.
//!
//! An expression is a `||`-separated list of alternatives.
//! Each alternative is either a hyphen range (`1.2.3 - 2.3.4`)
//! or a whitespace-separated list of comparators, all of which must match:
//!
//! | Comparator  | Expands to             |
//! |-------------|------------------------|
//! | `1.2.x`     | `>=1.2.0 <1.3.0`       |
//! | `*`, empty  | `>=0.0.0`              |
//! | `>1.2`      | `>=1.3.0`              |
//! | `<=1`       | `<2.0.0`               |
//! | `~1.2.3`    | `>=1.2.3 <1.3.0`       |
//! | `~1`        | `>=1.0.0 <2.0.0`       |
//! | `^1.2.3`    | `>=1.2.3 <2.0.0`       |
//! | `^0.2.3`    | `>=0.2.3 <0.3.0`       |
//! | `^0.0.3`    | `>=0.0.3 <0.0.4`       |
//! | `1.2 - 2.3` | `>=1.2.0 <2.4.0`       |
//!
//! Build metadata is accepted and ignored.
//!
//! Prereleases only match an alternative if one of its comparators
//! names a prerelease of the same major, minor, and patch:
//! `>1.2.3-alpha.3` matches `1.2.3-alpha.7` but not `3.4.5-alpha.9`.

use derive_new::new;
use nom::{
    Finish, IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, opt, success, value},
    multi::separated_list1,
    sequence::preceded,
};
use strum::Display;
use tracing::{debug, warn};

use super::{Pattern, Syntax, Term};
use crate::{Clause, InvalidSpec, Level, Operator, PrereleasePolicy, Range, Version, error};

/// The operator written before a comparator's version.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
enum Sigil {
    #[strum(serialize = "^")]
    Caret,
    #[strum(serialize = "~")]
    Tilde,
    #[strum(serialize = "=")]
    Equal,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,
}

/// A single expanded comparison against a release or prerelease target.
#[derive(Clone, Debug, new)]
struct Comparison {
    operator: Operator,
    target: Version,
}

impl Comparison {
    fn at_least(target: Version) -> Self {
        Self::new(Operator::GreaterEqual, target)
    }

    fn below(target: Version) -> Self {
        Self::new(Operator::Less, target)
    }

    fn clause(&self) -> Result<Clause, InvalidSpec> {
        range(self.operator, self.target.clone(), PrereleasePolicy::Always)
    }
}

/// Parse an expression into a clause.
///
/// Empty alternatives match every release, so `""` and `"||"` mean the same as `"*"`.
#[tracing::instrument]
pub fn parse(expression: &str) -> Result<Clause, InvalidSpec> {
    expression
        .split("||")
        .try_fold(Clause::Never, |clause, alternative| {
            let alternative = alternative.trim();
            let comparisons = if alternative.is_empty() {
                vec![Comparison::at_least(Version::release(0, 0, 0))]
            } else {
                compile(expression, alternative)?
            };
            Ok(clause.or(encode(&comparisons)?))
        })
}

fn sigil(input: &str) -> IResult<&str, Sigil> {
    alt((
        value(Sigil::LessEqual, tag("<=")),
        value(Sigil::GreaterEqual, tag(">=")),
        value(Sigil::Less, tag("<")),
        value(Sigil::Greater, tag(">")),
        value(Sigil::Equal, tag("=")),
        value(Sigil::Tilde, tag("~>")),
        value(Sigil::Tilde, tag("~")),
        value(Sigil::Caret, tag("^")),
        success(Sigil::Equal),
    ))
    .parse(input)
}

fn version(input: &str) -> IResult<&str, Pattern<'_>> {
    preceded(opt(char('v')), Pattern::parse).parse(input)
}

fn comparator(input: &str) -> IResult<&str, (Sigil, Pattern<'_>)> {
    (sigil, preceded(multispace0, version)).parse(input)
}

fn hyphen(input: &str) -> IResult<&str, (Pattern<'_>, Pattern<'_>)> {
    all_consuming((
        version,
        preceded((multispace1, char('-'), multispace1), version),
    ))
    .parse(input)
}

fn comparators(input: &str) -> IResult<&str, Vec<(Sigil, Pattern<'_>)>> {
    all_consuming(separated_list1(multispace1, comparator)).parse(input)
}

/// Compile one alternative of `expression` into the comparisons it requires.
fn compile(expression: &str, text: &str) -> Result<Vec<Comparison>, InvalidSpec> {
    if let Ok((_, (low, high))) = hyphen(text).finish() {
        let low = low.resolve(expression)?;
        let high = high.resolve(expression)?;
        let comparisons = expand_hyphen(expression, low, high)?;
        debug!(alternative = text, ?comparisons, "expanded hyphen range");
        return Ok(comparisons);
    }

    let (_, atoms) = comparators(text).finish().map_err(|err| {
        warn!(alternative = text, "invalid comparator");
        InvalidSpec::Syntax {
            input: expression.to_string(),
            syntax: Syntax::Npm,
            span: error::span(expression, err.input),
        }
    })?;

    let mut comparisons = Vec::new();
    for (sigil, pattern) in atoms {
        let term = pattern.resolve(expression)?;
        if term.is_wildcard() && !matches!(sigil, Sigil::Equal | Sigil::GreaterEqual) {
            error::fatal!(InvalidSpec::Wildcard {
                input: expression.to_string(),
                operator: sigil.to_string(),
                span: error::span(expression, term.text),
            });
        }
        comparisons.extend(expand(expression, sigil, term)?);
    }
    debug!(alternative = text, ?comparisons, "expanded comparators");
    Ok(comparisons)
}

fn expand_hyphen(
    expression: &str,
    low: Term<'_>,
    high: Term<'_>,
) -> Result<Vec<Comparison>, InvalidSpec> {
    let mut comparisons = vec![Comparison::at_least(release_part(&low))];
    if !high.is_wildcard() {
        comparisons.push(match high.next_unit(expression)? {
            Some(ceiling) => Comparison::below(ceiling),
            None => Comparison::new(Operator::LessEqual, release_part(&high)),
        });
    }
    Ok(comparisons)
}

fn expand(
    expression: &str,
    sigil: Sigil,
    term: Term<'_>,
) -> Result<Vec<Comparison>, InvalidSpec> {
    let target = release_part(&term);
    let release = target.truncate(Level::Patch);
    let ceiling = |level| term.ceiling(expression, level, &release);
    Ok(match sigil {
        Sigil::Equal if term.is_wildcard() => vec![Comparison::at_least(target)],
        Sigil::Equal => match term.next_unit(expression)? {
            Some(ceiling) => vec![Comparison::at_least(target), Comparison::below(ceiling)],
            None => vec![Comparison::new(Operator::Equal, target)],
        },
        Sigil::Caret => {
            let ceiling = if release.major() != 0 || term.minor.is_none() {
                ceiling(Level::Major)?
            } else if release.minor() != Some(0) || term.patch.is_none() {
                ceiling(Level::Minor)?
            } else {
                ceiling(Level::Patch)?
            };
            vec![Comparison::at_least(target), Comparison::below(ceiling)]
        }
        Sigil::Tilde => {
            let ceiling = match term.minor {
                Some(_) => ceiling(Level::Minor)?,
                None => ceiling(Level::Major)?,
            };
            vec![Comparison::at_least(target), Comparison::below(ceiling)]
        }
        Sigil::Greater => match term.next_unit(expression)? {
            Some(floor) => vec![Comparison::at_least(floor)],
            None => vec![Comparison::new(Operator::Greater, target)],
        },
        Sigil::GreaterEqual => vec![Comparison::at_least(target)],
        Sigil::Less => vec![Comparison::below(target)],
        Sigil::LessEqual => match term.next_unit(expression)? {
            Some(ceiling) => vec![Comparison::below(ceiling)],
            None => vec![Comparison::new(Operator::LessEqual, target)],
        },
    })
}

/// The term's target without build metadata.
fn release_part(term: &Term<'_>) -> Version {
    term.target.truncate(Level::Prerelease)
}

/// Encode one alternative's comparisons as a clause.
///
/// Releases match when every comparison does. A prerelease additionally
/// needs the alternative to name a prerelease target with the same
/// major, minor, and patch, so each such target opens a window
/// `[M.m.p-0, M.m.p]` in which prereleases are let through.
fn encode(comparisons: &[Comparison]) -> Result<Clause, InvalidSpec> {
    let bounds = comparisons
        .iter()
        .map(Comparison::clause)
        .collect::<Result<Vec<_>, _>>()?;

    let releases = range(
        Operator::GreaterEqual,
        Version::release(0, 0, 0),
        PrereleasePolicy::SamePatch,
    )?;
    let releases = Clause::all_of(bounds.iter().cloned().chain([releases]));

    comparisons
        .iter()
        .filter(|comparison| comparison.target.is_prerelease())
        .try_fold(releases, |clause, comparison| {
            let floor = comparison.target.floor();
            let ceiling = comparison.target.truncate(Level::Patch);
            let window = [
                range(Operator::GreaterEqual, floor, PrereleasePolicy::Always)?,
                range(Operator::LessEqual, ceiling, PrereleasePolicy::Always)?,
            ];
            Ok(clause.or(Clause::all_of(bounds.iter().cloned().chain(window))))
        })
}

fn range(
    operator: Operator,
    target: Version,
    prerelease_policy: PrereleasePolicy,
) -> Result<Clause, InvalidSpec> {
    Ok(Range::builder()
        .operator(operator)
        .target(target)
        .prerelease_policy(prerelease_policy)
        .build()?
        .into())
}
