use miette::{Diagnostic, SourceSpan};
use nom::Offset;
use thiserror::Error;

use crate::{Level, Syntax};

/// Records all errors reported by this library.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Errors encountered while parsing or constructing a version.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Version(#[from] InvalidVersion),

    /// Errors encountered while parsing a spec expression.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Spec(#[from] InvalidSpec),

    /// A total ordering was requested between versions that have none.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Incomparable(#[from] Incomparable),
}

/// Errors encountered when parsing or constructing a [`Version`](crate::Version).
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum InvalidVersion {
    /// The provided value was empty.
    #[error("version input was empty")]
    Empty,

    /// The input did not match the version grammar.
    #[error("'{input}' is not a valid version")]
    Syntax {
        /// The input originally provided.
        #[source_code]
        input: String,

        /// The location of the error.
        #[label("unexpected input")]
        span: SourceSpan,
    },

    /// A numeric component or prerelease identifier has a leading zero.
    #[error("{component} of '{input}' has a leading zero")]
    LeadingZero {
        /// The input originally provided.
        #[source_code]
        input: String,

        /// The component holding the offending number.
        component: Level,

        /// The location of the error.
        #[label("leading zero")]
        span: SourceSpan,
    },

    /// A prerelease or build list contains an empty identifier.
    #[error("'{input}' contains an empty identifier")]
    EmptyIdentifier {
        /// The input originally provided.
        #[source_code]
        input: String,

        /// The location of the error.
        #[label("identifier list")]
        span: SourceSpan,
    },

    /// A numeric component does not fit in 64 bits.
    #[error("{component} of '{input}' is too large")]
    Overflow {
        /// The input originally provided.
        #[source_code]
        input: String,

        /// The component holding the offending number.
        component: Level,

        /// The location of the error.
        #[label("number")]
        span: SourceSpan,
    },

    /// Coercion found no leading number to work from.
    #[error("'{input}' does not start with a number")]
    NotNumeric {
        /// The input originally provided.
        input: String,
    },

    /// A version constructed from parts is missing a required component.
    #[error("version is missing its {component}")]
    Incomplete {
        /// The missing component.
        component: Level,
    },

    /// Conversion to or from a [`semver::Version`] failed.
    #[error("'{input}' cannot be converted: {message}")]
    Semver {
        /// The version being converted.
        input: String,

        /// Why the conversion failed.
        message: String,
    },
}

/// Errors encountered when parsing a [`Spec`](crate::Spec).
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum InvalidSpec {
    /// The provided expression was empty.
    #[error("spec expression was empty")]
    Empty,

    /// The expression did not match the grammar of its syntax.
    #[error("'{input}' is not a valid {syntax} spec")]
    Syntax {
        /// The expression originally provided.
        #[source_code]
        input: String,

        /// The grammar the expression was parsed with.
        syntax: Syntax,

        /// The location of the error.
        #[label("unexpected input")]
        span: SourceSpan,
    },

    /// The version inside a spec term is invalid.
    #[error("invalid version in spec '{input}'")]
    Version {
        /// The expression originally provided.
        input: String,

        /// The underlying version error.
        #[source]
        source: InvalidVersion,
    },

    /// Build metadata was combined with an ordering operator.
    #[error("build metadata has no ordering and cannot be used with '{operator}' in '{input}'")]
    BuildOrdering {
        /// The expression originally provided.
        #[source_code]
        input: String,

        /// The operator the build metadata was used with.
        operator: String,

        /// The location of the error.
        #[label("term")]
        span: SourceSpan,
    },

    /// A wildcard major was combined with an operator that cannot express it.
    #[error("wildcard version cannot be used with '{operator}' in '{input}'")]
    Wildcard {
        /// The expression originally provided.
        #[source_code]
        input: String,

        /// The operator the wildcard was used with.
        operator: String,

        /// The location of the error.
        #[label("term")]
        span: SourceSpan,
    },

    /// Prerelease or build metadata was attached to an incomplete version.
    #[error("prerelease or build metadata requires a complete version in '{input}'")]
    Incomplete {
        /// The expression originally provided.
        #[source_code]
        input: String,

        /// The location of the error.
        #[label("term")]
        span: SourceSpan,
    },

    /// No grammar is registered under the requested name.
    #[error("unknown spec syntax '{name}'")]
    UnknownSyntax {
        /// The requested name.
        name: String,
    },
}

/// Two versions have differing build metadata and therefore no relative order.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[error("'{left}' and '{right}' have no precedence relation")]
pub struct Incomparable {
    /// The left-hand version.
    pub left: String,

    /// The right-hand version.
    pub right: String,
}

/// Return the span of `fragment` inside `text`.
///
/// `fragment` must be a subslice of `text`, as produced by the parsers in this crate.
pub(crate) fn span(text: &str, fragment: &str) -> SourceSpan {
    (text.offset(fragment), fragment.len()).into()
}

/// Shorthand for conversion into the function's error type and returning.
macro_rules! fatal {
    ($err:expr) => {
        return Err($err.into())
    };
}
pub(crate) use fatal;
