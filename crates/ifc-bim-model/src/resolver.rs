// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving entities

use crate::{AttributeValue, DecodedEntity, EntityId, IfcType};
use std::sync::Arc;

/// Entity lookup and reference resolution
///
/// This is the sole read surface of an opened entity graph. Implementations
/// should provide O(1) lookup by entity ID.
///
/// # Example
///
/// ```ignore
/// use ifc_bim_model::{EntityResolver, EntityId};
///
/// fn placement_of(resolver: &dyn EntityResolver, wall_id: EntityId) {
///     if let Some(wall) = resolver.get(wall_id) {
///         // ObjectPlacement of a product
///         if let Some(placement) = wall.get(5).and_then(|a| resolver.resolve_ref(a)) {
///             println!("placed by {}", placement.id);
///         }
///     }
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Get entity by ID
    ///
    /// Returns the decoded entity if it exists, wrapped in an Arc for
    /// cheap sharing between lookups.
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>>;

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Resolve a list of entity references, skipping broken ones
    fn resolve_ref_list(&self, attr: &AttributeValue) -> Vec<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| self.resolve_ref(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Get all entities of a specific type, in ascending id order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>>;

    /// Count entities of a specific type
    fn count_by_type(&self, ifc_type: &IfcType) -> usize;

    /// Get total entity count
    fn entity_count(&self) -> usize;
}

/// Extension methods for EntityResolver
pub trait EntityResolverExt: EntityResolver {
    /// Check if an entity exists
    fn exists(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Get entity or return error
    fn get_or_err(&self, id: EntityId) -> crate::Result<Arc<DecodedEntity>> {
        self.get(id).ok_or(crate::ParseError::EntityNotFound(id))
    }

    /// Follow the reference stored at `attr_index` of `entity`
    fn follow(
        &self,
        entity: &DecodedEntity,
        attr_index: usize,
    ) -> crate::Result<Arc<DecodedEntity>> {
        let target = entity
            .get_ref(attr_index)
            .ok_or(crate::ParseError::InvalidReference {
                entity: entity.id,
                attribute: attr_index,
            })?;
        self.get_or_err(target)
    }

    /// Entities of any of the given types, merged in ascending id order
    fn entities_by_types(&self, types: &[IfcType]) -> Vec<Arc<DecodedEntity>> {
        let mut all: Vec<Arc<DecodedEntity>> = types
            .iter()
            .flat_map(|ty| self.entities_by_type(ty))
            .collect();
        all.sort_by_key(|e| e.id);
        all
    }
}

// Blanket implementation for all EntityResolver types
impl<T: EntityResolver + ?Sized> EntityResolverExt for T {}
