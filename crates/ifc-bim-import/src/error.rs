// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for decoding

use ifc_bim_model::ParseError;
use thiserror::Error;

/// Result type alias for decoder operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Decoder errors
///
/// Only [`ImportError::Parse`] escapes [`crate::decode`]; the others describe
/// why a single element was skipped and end up as warnings.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be opened
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Geometry could not be read
    #[error("{0}")]
    Geometry(#[from] ifc_bim_geometry::Error),

    /// Neither parametric nor mesh geometry is usable
    #[error("no usable geometry")]
    NoGeometry,

    /// Door or window without a wall to sit in
    #[error("no host wall found")]
    NoHostWall,

    /// Element attributes that cannot describe a valid element
    #[error("{0}")]
    Invalid(String),
}

impl ImportError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ImportError::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_pass_through() {
        let err: ImportError = ParseError::UnsupportedSchema("IFC5".into()).into();
        assert_eq!(err.to_string(), ParseError::UnsupportedSchema("IFC5".into()).to_string());
    }
}
