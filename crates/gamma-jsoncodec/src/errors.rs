//! Codec error types.
//!
//! Every argument error names the 1-based position of the offending
//! argument (and element, for arrays) plus the shape that was expected,
//! so the message can be shown to the user as is.

use thiserror::Error;

use crate::args::SUPPORTED_TYPES;

/// Argument conversion errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// `*Array` tag carrying something other than a list of strings.
    #[error("Argument {position}'s Type is marked as an Array and its Value should contain an array of strings\nCurrently {found}")]
    ExpectedArray {
        /// 1-based argument position
        position: usize,
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// Scalar tag carrying something other than a string.
    #[error("Argument {position}'s Type is marked as a Scalar and its Value should contain a string\nCurrently {found}")]
    ExpectedScalar {
        /// 1-based argument position
        position: usize,
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// Scalar value that does not parse as its tag.
    #[error("Value of argument {position} should be a string containing {expected}\n{reason}Current value: '{value}'")]
    InvalidValue {
        /// 1-based argument position
        position: usize,
        /// Expected format
        expected: &'static str,
        /// Decoder detail, newline terminated, may be empty
        reason: String,
        /// Offending input
        value: String,
    },

    /// Array element that does not parse as the array's element tag.
    #[error("Value of array argument {position}, element {element} should be a string containing {expected}\n{reason}Current value: '{value}'")]
    InvalidElement {
        /// 1-based argument position
        position: usize,
        /// 1-based element position
        element: usize,
        /// Expected format
        expected: &'static str,
        /// Decoder detail, newline terminated, may be empty
        reason: String,
        /// Offending input
        value: String,
    },

    /// Type tag that is not one of the supported tags.
    #[error("Type of argument {position} '{tag}' is unsupported\n\n{}", SUPPORTED_TYPES)]
    UnsupportedType {
        /// 1-based argument position
        position: usize,
        /// The unknown tag
        tag: String,
    },

    /// `gamma:keys-file-address` id the resolver could not satisfy.
    #[error("Value of argument {position} should be an id from the keys file\n{reason}")]
    KeyResolution {
        /// 1-based argument position
        position: usize,
        /// Resolver message
        reason: String,
    },

    /// `-argN` override for an argument the input file does not define.
    #[error("Cannot override argument {position}, the input file defines only {available} arguments")]
    MissingArgument {
        /// 1-based argument position
        position: usize,
        /// Number of arguments in the input file
        available: usize,
    },
}
