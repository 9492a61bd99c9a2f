// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Errors raised while opening or reading an entity graph

use crate::EntityId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Failures of the read surface
///
/// `InvalidFormat` and `UnsupportedSchema` stop a decode outright; the
/// lookup errors only ever cost the element that needed the entity.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Not a STEP file: no DATA section, not UTF-8
    #[error("not a readable STEP file: {0}")]
    InvalidFormat(String),

    /// FILE_SCHEMA names neither IFC2X3 nor an IFC4 schema
    #[error("unsupported schema {0}")]
    UnsupportedSchema(String),

    #[error("{0} does not exist")]
    EntityNotFound(EntityId),

    /// Attribute expected to hold a reference holds something else
    #[error("attribute {attribute} of {entity} is not a reference")]
    InvalidReference { entity: EntityId, attribute: usize },

    #[error("{entity} has no attribute {attribute}")]
    MissingAttribute { entity: EntityId, attribute: usize },
}

impl ParseError {
    pub fn format(msg: impl Into<String>) -> Self {
        ParseError::InvalidFormat(msg.into())
    }

    pub fn missing(entity: EntityId, attribute: usize) -> Self {
        ParseError::MissingAttribute { entity, attribute }
    }
}
