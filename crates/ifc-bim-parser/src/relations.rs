// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RelationQuery implementation built from objectified relationships

use ifc_bim_model::{EntityId, EntityResolver, IfcType, RelationQuery};
use rustc_hash::FxHashMap;

/// Lookup tables for aggregation, containment, fills and voids
///
/// When an object appears in several relationships of one kind, the first
/// relationship in id order wins.
#[derive(Default)]
pub struct RelationIndex {
    /// Contained element -> spatial structure
    container: FxHashMap<EntityId, EntityId>,
    /// Aggregate -> parts, in file order
    children: FxHashMap<EntityId, Vec<EntityId>>,
    /// Door or window -> opening it fills
    fills: FxHashMap<EntityId, EntityId>,
    /// Opening -> element it voids
    voids: FxHashMap<EntityId, EntityId>,
}

impl RelationIndex {
    pub fn build(resolver: &dyn EntityResolver) -> Self {
        let mut index = Self::default();

        // RelatingObject 4, RelatedObjects 5
        for rel in resolver.entities_by_type(&IfcType::IfcRelAggregates) {
            if let Some(parent) = rel.get_ref(4) {
                index.children.entry(parent).or_default().extend(rel.get_refs(5));
            }
        }

        // RelatedElements 4, RelatingStructure 5
        for rel in resolver.entities_by_type(&IfcType::IfcRelContainedInSpatialStructure) {
            if let Some(structure) = rel.get_ref(5) {
                for element in rel.get_refs(4) {
                    index.container.entry(element).or_insert(structure);
                }
            }
        }

        // RelatingOpeningElement 4, RelatedBuildingElement 5
        for rel in resolver.entities_by_type(&IfcType::IfcRelFillsElement) {
            if let (Some(opening), Some(filling)) = (rel.get_ref(4), rel.get_ref(5)) {
                index.fills.entry(filling).or_insert(opening);
            }
        }

        // RelatingBuildingElement 4, RelatedOpeningElement 5
        for rel in resolver.entities_by_type(&IfcType::IfcRelVoidsElement) {
            if let (Some(element), Some(opening)) = (rel.get_ref(4), rel.get_ref(5)) {
                index.voids.entry(opening).or_insert(element);
            }
        }

        log::debug!(
            "Relation index: {} contained, {} aggregates, {} fills, {} voids",
            index.container.len(),
            index.children.len(),
            index.fills.len(),
            index.voids.len()
        );

        index
    }
}

impl RelationQuery for RelationIndex {
    fn containing_structure(&self, element: EntityId) -> Option<EntityId> {
        self.container.get(&element).copied()
    }

    fn aggregated_children(&self, parent: EntityId) -> Vec<EntityId> {
        self.children.get(&parent).cloned().unwrap_or_default()
    }

    fn filled_opening(&self, filling: EntityId) -> Option<EntityId> {
        self.fills.get(&filling).copied()
    }

    fn voided_element(&self, opening: EntityId) -> Option<EntityId> {
        self.voids.get(&opening).copied()
    }
}
