// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relationship lookups over an opened entity graph

use crate::EntityId;

/// Objectified relationships, indexed for lookup from either end
///
/// Covers IfcRelAggregates, IfcRelContainedInSpatialStructure,
/// IfcRelFillsElement and IfcRelVoidsElement.
pub trait RelationQuery: Send + Sync {
    /// The spatial structure element (usually a storey) containing `element`
    fn containing_structure(&self, element: EntityId) -> Option<EntityId>;

    /// Objects aggregated under `parent`, in file order
    fn aggregated_children(&self, parent: EntityId) -> Vec<EntityId>;

    /// The opening element that `filling` (a door or window) fills
    fn filled_opening(&self, filling: EntityId) -> Option<EntityId>;

    /// The element (usually a wall) voided by `opening`
    fn voided_element(&self, opening: EntityId) -> Option<EntityId>;

    /// Host element of a door or window: fills, then voids
    fn host_of_filling(&self, filling: EntityId) -> Option<EntityId> {
        self.filled_opening(filling)
            .and_then(|opening| self.voided_element(opening))
    }
}
