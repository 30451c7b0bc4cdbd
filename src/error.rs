// Copyright (c) 2016 rust-threshold-secret-sharing developers
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Error taxonomy for the crate's public operations.
//!
//! Every fallible public operation returns `Result<_, SssError>`. None of
//! the variants below ever carry secret-derived bytes (hex secrets, field
//! elements, share payloads) in their `Display` output, only the shapes
//! of the inputs (counts, widths, indices).

use std::fmt;

/// Machine-readable error code, stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidParameter,
    InitError,
    InvalidRngError,
    InvalidShareError,
    MismatchedSharesError,
    RngFailureError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidParameter => "InvalidParameter",
            ErrorCode::InitError => "InitError",
            ErrorCode::InvalidRngError => "InvalidRngError",
            ErrorCode::InvalidShareError => "InvalidShareError",
            ErrorCode::MismatchedSharesError => "MismatchedSharesError",
            ErrorCode::RngFailureError => "RngFailureError",
        };
        f.write_str(s)
    }
}

/// Error surface for the public API.
///
/// Each variant carries a stable [`ErrorCode`] (via [`SssError::code`]) plus
/// a human-readable message. Validation messages mirror the "must be an
/// integer between X and Y, inclusive" phrasing used throughout the
/// reference corpus so downstream CLIs get consistent diagnostics.
#[derive(thiserror::Error, Debug)]
pub enum SssError {
    #[error("{message}")]
    InvalidParameter { message: String },

    #[error("{message}")]
    InitError { message: String },

    #[error("{message}")]
    InvalidRngError { message: String },

    #[error("{message}")]
    InvalidShareError { message: String },

    #[error("{message}")]
    MismatchedSharesError { message: String },

    #[error("{message}")]
    RngFailureError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl SssError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SssError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            SssError::InitError { .. } => ErrorCode::InitError,
            SssError::InvalidRngError { .. } => ErrorCode::InvalidRngError,
            SssError::InvalidShareError { .. } => ErrorCode::InvalidShareError,
            SssError::MismatchedSharesError { .. } => ErrorCode::MismatchedSharesError,
            SssError::RngFailureError { .. } => ErrorCode::RngFailureError,
        }
    }

    pub(crate) fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        SssError::InvalidParameter {
            message: message.into(),
        }
    }

    pub(crate) fn between_inclusive(name: &str, lo: i64, hi: i64) -> Self {
        SssError::invalid_parameter(format!(
            "{name} must be an integer between {lo} and {hi}, inclusive"
        ))
    }

    pub(crate) fn init<S: Into<String>>(message: S) -> Self {
        SssError::InitError {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_rng<S: Into<String>>(message: S) -> Self {
        SssError::InvalidRngError {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_share<S: Into<String>>(message: S) -> Self {
        SssError::InvalidShareError {
            message: message.into(),
        }
    }

    pub(crate) fn mismatched_shares<S: Into<String>>(message: S) -> Self {
        SssError::MismatchedSharesError {
            message: message.into(),
        }
    }

    pub(crate) fn rng_failure<S: Into<String>>(message: S) -> Self {
        SssError::RngFailureError {
            message: message.into(),
            source: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SssError>;
