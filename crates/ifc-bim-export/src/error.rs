// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for encoding

use ifc_bim_model::EntityId;
use thiserror::Error;

/// Result type alias for encoder operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that abort an encode
///
/// Element-level problems (degenerate geometry, missing host wall) are not
/// errors; the element is logged and skipped.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Write to an id that was never allocated
    #[error("Entity {0} was written before being allocated")]
    UnallocatedId(EntityId),

    /// Reference to an entity that does not exist yet
    #[error("Entity {entity} references {target}, which has not been written")]
    DanglingReference { entity: EntityId, target: EntityId },

    /// An attribute value that cannot be represented
    #[error("Invalid entity {id}: {message}")]
    Entity { id: EntityId, message: String },

    /// Formatting the output buffer failed
    #[error("Failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
}

impl ExportError {
    /// Create an invalid entity error
    pub fn entity(id: EntityId, msg: impl Into<String>) -> Self {
        ExportError::Entity {
            id,
            message: msg.into(),
        }
    }

    pub fn dangling(entity: EntityId, target: EntityId) -> Self {
        ExportError::DanglingReference { entity, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_both_entities() {
        let err = ExportError::dangling(EntityId(7), EntityId(9));
        assert_eq!(err.to_string(), "Entity #7 references #9, which has not been written");
    }
}
