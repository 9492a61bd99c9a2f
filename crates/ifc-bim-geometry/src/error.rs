// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Errors raised while reading element geometry

use ifc_bim_model::EntityId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why an element's geometry could not be read or meshed
///
/// Messages are lower-case; the decoder embeds them in its per-element
/// warnings.
#[derive(Error, Debug)]
pub enum Error {
    /// Input that cannot produce a solid, such as a zero-depth extrusion
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("{0} does not exist")]
    EntityNotFound(EntityId),

    #[error("attribute {index}: {message}")]
    InvalidAttribute { index: usize, message: String },

    #[error("bad profile: {0}")]
    Profile(String),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    /// No body representation, or no swept solid in it
    #[error("no body representation: {0}")]
    NoRepresentation(String),

    /// Representation item the kernel has no processor for
    #[error("{0} is not supported")]
    UnsupportedType(String),
}

impl Error {
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Error::Degenerate(msg.into())
    }

    pub fn profile(msg: impl Into<String>) -> Self {
        Error::Profile(msg.into())
    }

    pub fn triangulation(msg: impl Into<String>) -> Self {
        Error::Triangulation(msg.into())
    }

    pub fn entity_not_found(id: EntityId) -> Self {
        Error::EntityNotFound(id)
    }

    pub fn invalid_attribute(index: usize, msg: impl Into<String>) -> Self {
        Error::InvalidAttribute {
            index,
            message: msg.into(),
        }
    }

    pub fn no_representation(msg: impl Into<String>) -> Self {
        Error::NoRepresentation(msg.into())
    }

    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Error::UnsupportedType(type_name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_read_inside_warnings() {
        assert_eq!(Error::entity_not_found(EntityId(7)).to_string(), "#7 does not exist");
        assert_eq!(
            Error::unsupported_type("IFCBOOLEANRESULT").to_string(),
            "IFCBOOLEANRESULT is not supported"
        );
    }
}
