//! The native spec grammar.
//!
//! An expression is a comma-separated list of terms, all of which must match.
//! Each term is an optional prefix followed by a version pattern:
//!
//! | Term        | Matches                                   |
//! |-------------|-------------------------------------------|
//! | `1.2.3`     | exactly `1.2.3`, ignoring build metadata  |
//! | `==1.2.3+`  | exactly `1.2.3`, without build metadata   |
//! | `==1.2`     | `>=1.2.0,<1.3.0`                          |
//! | `*`         | every release                             |
//! | `!=1.x`     | `<1.0.0` or `>=2.0.0`                     |
//! | `>1.2`      | `>=1.3.0`                                 |
//! | `<=1.2`     | `<1.3.0`                                  |
//! | `<1.2.3`    | below `1.2.3`, excluding `1.2.3-*`        |
//! | `<1.2.3-`   | below `1.2.3`, including `1.2.3-*`        |
//! | `^1.2.3`    | `>=1.2.3,<2.0.0`                          |
//! | `^0.2.3`    | `>=0.2.3,<0.3.0`                          |
//! | `~1.2.3`    | `>=1.2.3,<1.3.0`                          |
//! | `~1`        | `>=1.0.0,<2.0.0`                          |
//! | `~=1.2.3`   | `>=1.2.3,<1.3.0`                          |
//! | `~=1.2`     | `>=1.2.0,<2.0.0`                          |
//!
//! Build metadata may only be used with `==` and `!=`,
//! and a wildcard major (`*`, `x`, `X`) only with `==` and `>=`.
//! Whitespace is not allowed anywhere in an expression.

use nom::{
    Finish, IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    combinator::{all_consuming, success, value},
};
use strum::Display;
use tracing::{debug, warn};

use super::{Pattern, Syntax, Term};
use crate::{
    BuildPolicy, Clause, InvalidSpec, Level, Operator, PrereleasePolicy, Range, Version, error,
};

/// The prefix of a term.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
enum Prefix {
    #[strum(serialize = "^")]
    Caret,
    #[strum(serialize = "~")]
    Tilde,
    #[strum(serialize = "~=")]
    Compatible,
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessEqual,
}

/// Parse an expression into a clause.
#[tracing::instrument]
pub fn parse(expression: &str) -> Result<Clause, InvalidSpec> {
    if expression.trim().is_empty() {
        warn!("empty expression");
        error::fatal!(InvalidSpec::Empty);
    }

    expression.split(',').try_fold(Clause::Always, |clause, term| {
        Ok(clause.and(compile(expression, term)?))
    })
}

fn prefix(input: &str) -> IResult<&str, Prefix> {
    alt((
        value(Prefix::Compatible, tag("~=")),
        value(Prefix::Equal, tag("==")),
        value(Prefix::NotEqual, tag("!=")),
        value(Prefix::LessEqual, tag("<=")),
        value(Prefix::GreaterEqual, tag(">=")),
        value(Prefix::Less, tag("<")),
        value(Prefix::Greater, tag(">")),
        value(Prefix::Equal, tag("=")),
        value(Prefix::Caret, tag("^")),
        value(Prefix::Tilde, tag("~")),
        success(Prefix::Equal),
    ))
    .parse(input)
}

fn term(input: &str) -> IResult<&str, (Prefix, Pattern<'_>)> {
    all_consuming((prefix, Pattern::parse)).parse(input)
}

/// Compile a single term of `expression` into a clause.
fn compile(expression: &str, text: &str) -> Result<Clause, InvalidSpec> {
    let (_, (prefix, pattern)) = term(text).finish().map_err(|err| {
        warn!(term = text, "invalid term");
        InvalidSpec::Syntax {
            input: expression.to_string(),
            syntax: Syntax::Simple,
            span: error::span(expression, err.input),
        }
    })?;
    let term = pattern.resolve(expression)?;

    if term.is_wildcard() && !matches!(prefix, Prefix::Equal | Prefix::GreaterEqual) {
        error::fatal!(InvalidSpec::Wildcard {
            input: expression.to_string(),
            operator: prefix.to_string(),
            span: error::span(expression, term.text),
        });
    }
    if term.build.is_some() && !matches!(prefix, Prefix::Equal | Prefix::NotEqual) {
        error::fatal!(InvalidSpec::BuildOrdering {
            input: expression.to_string(),
            operator: prefix.to_string(),
            span: error::span(expression, term.text),
        });
    }

    let clause = expand(expression, prefix, term)?;
    debug!(term = text, %clause, "expanded");
    Ok(clause)
}

fn expand(expression: &str, prefix: Prefix, term: Term<'_>) -> Result<Clause, InvalidSpec> {
    let target = term.target.clone();
    let ceiling = |level| term.ceiling(expression, level, &target);
    match prefix {
        Prefix::Caret => {
            let high = if target.major() != 0 {
                ceiling(Level::Major)?
            } else if target.minor() != Some(0) {
                ceiling(Level::Minor)?
            } else {
                ceiling(Level::Patch)?
            };
            between(target, high)
        }
        Prefix::Tilde => {
            let high = match term.minor {
                Some(_) => ceiling(Level::Minor)?,
                None => ceiling(Level::Major)?,
            };
            between(target, high)
        }
        Prefix::Compatible => {
            let high = if term.is_complete() {
                ceiling(Level::Minor)?
            } else {
                ceiling(Level::Major)?
            };
            between(target, high)
        }
        Prefix::Equal if term.is_wildcard() => range(Operator::GreaterEqual, target),
        Prefix::Equal => match term.next_unit(expression)? {
            Some(high) => between(target, high),
            None if term.build == Some("") => strict(Operator::Equal, target),
            None => range(Operator::Equal, target),
        },
        Prefix::NotEqual => match term.next_unit(expression)? {
            Some(high) => Ok(range(Operator::Less, target)?.or(range(Operator::GreaterEqual, high)?)),
            None if term.prerelease == Some("") => Ok(Range::builder()
                .operator(Operator::NotEqual)
                .target(target)
                .prerelease_policy(PrereleasePolicy::Always)
                .build()?
                .into()),
            None if term.build == Some("") => strict(Operator::NotEqual, target),
            None => range(Operator::NotEqual, target),
        },
        Prefix::Greater => match term.next_unit(expression)? {
            Some(low) => range(Operator::GreaterEqual, low),
            None => range(Operator::Greater, target),
        },
        Prefix::GreaterEqual => range(Operator::GreaterEqual, target),
        Prefix::Less if term.prerelease == Some("") => Ok(Range::builder()
            .operator(Operator::Less)
            .target(target)
            .prerelease_policy(PrereleasePolicy::Always)
            .build()?
            .into()),
        Prefix::Less => range(Operator::Less, target),
        Prefix::LessEqual => match term.next_unit(expression)? {
            Some(high) => range(Operator::Less, high),
            None => range(Operator::LessEqual, target),
        },
    }
}

fn range(operator: Operator, target: Version) -> Result<Clause, InvalidSpec> {
    Ok(Range::builder()
        .operator(operator)
        .target(target)
        .build()?
        .into())
}

fn strict(operator: Operator, target: Version) -> Result<Clause, InvalidSpec> {
    Ok(Range::builder()
        .operator(operator)
        .target(target)
        .build_policy(BuildPolicy::Strict)
        .build()?
        .into())
}

/// `[low, high)`
fn between(low: Version, high: Version) -> Result<Clause, InvalidSpec> {
    Ok(range(Operator::GreaterEqual, low)?.and(range(Operator::Less, high)?))
}
