#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::cmp::Ordering;

mod clause;
mod error;
mod identifier;
pub mod spec;
pub mod version;

pub use clause::*;
pub use error::*;
pub use identifier::{Identifier, compare_identifier, compare_identifier_list};
pub use spec::{Spec, Syntax};
pub use version::{Level, Version};

/// Compare two strict version strings by precedence.
///
/// ```
/// # use std::cmp::Ordering;
/// assert_eq!(semantic_version::compare("1.0.0-rc.1", "1.0.0")?, Ordering::Less);
/// assert!(semantic_version::compare("1.0.0+a", "1.0.0+b").is_err());
/// # Ok::<(), semantic_version::Error>(())
/// ```
pub fn compare(a: &str, b: &str) -> Result<Ordering, Error> {
    let a = Version::parse(a)?;
    let b = Version::parse(b)?;
    Ok(a.try_cmp(&b)?)
}

/// Report whether a strict version string satisfies a simple spec expression.
///
/// ```
/// assert!(semantic_version::matches(">=1.0.0,<2.0.0", "1.4.2")?);
/// assert!(!semantic_version::matches("^1.2", "2.0.0")?);
/// # Ok::<(), semantic_version::Error>(())
/// ```
pub fn matches(spec: &str, version: &str) -> Result<bool, Error> {
    let spec = Spec::simple(spec)?;
    let version = Version::parse(version)?;
    Ok(spec.matches(&version))
}

/// Report whether `text` is a valid strict version.
///
/// ```
/// assert!(semantic_version::validate("1.2.3-rc.1+build.5"));
/// assert!(!semantic_version::validate("1.2"));
/// assert!(!semantic_version::validate("01.2.3"));
/// ```
pub fn validate(text: &str) -> bool {
    Version::parse(text).is_ok()
}

/// Create a [`Version`], panicking if it is invalid.
///
/// Intended for literals in tests and examples;
/// use [`Version::parse`] for untrusted input.
///
/// ```
/// # use semantic_version::{Version, version};
/// assert_eq!(version!(1, 2, 3), Version::release(1, 2, 3));
/// assert_eq!(version!("1.2.3-rc.1").to_string(), "1.2.3-rc.1");
///
/// let partial = version!(partial => "1.2");
/// assert!(partial.is_partial());
/// assert_eq!(partial.patch(), None);
/// ```
#[macro_export]
macro_rules! version {
    ($major:expr, $minor:expr, $patch:expr) => {
        $crate::Version::release($major, $minor, $patch)
    };
    (partial => $input:expr) => {
        $crate::Version::parse_partial($input).expect("parse partial version")
    };
    ($input:expr) => {
        $crate::Version::parse($input).expect("parse version")
    };
}
