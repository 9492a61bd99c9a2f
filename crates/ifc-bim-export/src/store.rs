// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity graph store
//!
//! Append-only collection of numbered entities built during one encode.
//! Ids are allocated from 1 upwards; every reference an entity carries must
//! point at an entity that is already in the graph.

use crate::error::{ExportError, Result};
use ifc_bim_model::{AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Numbered entities of one encode session
#[derive(Debug, Default)]
pub struct EntityGraph {
    /// Last allocated id; 0 before the first allocation
    last_id: u64,
    entities: BTreeMap<EntityId, Arc<DecodedEntity>>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than every id handed out before
    pub fn allocate_id(&mut self) -> EntityId {
        self.last_id += 1;
        EntityId(self.last_id)
    }

    /// Insert or overwrite the entity at `id`
    ///
    /// Fails if `id` was never allocated or if any reference in `attributes`
    /// points at an entity that has not been written.
    pub fn write(
        &mut self,
        id: EntityId,
        ifc_type: IfcType,
        attributes: Vec<AttributeValue>,
    ) -> Result<()> {
        if id.0 == 0 || id.0 > self.last_id {
            return Err(ExportError::UnallocatedId(id));
        }

        let mut dangling = None;
        for value in &attributes {
            value.for_each_ref(&mut |target| {
                if dangling.is_none() && !self.entities.contains_key(&target) {
                    dangling = Some(target);
                }
            });
        }
        if let Some(target) = dangling {
            return Err(ExportError::dangling(id, target));
        }

        self.entities.insert(
            id,
            Arc::new(DecodedEntity {
                id,
                ifc_type,
                attributes,
            }),
        );
        Ok(())
    }

    /// Allocate an id and write the entity in one step
    pub fn add(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Result<EntityId> {
        let id = self.allocate_id();
        self.write(id, ifc_type, attributes)?;
        Ok(id)
    }

    /// Entities in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &DecodedEntity> {
        self.entities.values().map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity and restart numbering at 1
    pub fn clear(&mut self) {
        self.last_id = 0;
        self.entities.clear();
    }
}

impl EntityResolver for EntityGraph {
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        self.entities.get(&id).cloned()
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        self.entities
            .values()
            .filter(|e| &e.ifc_type == ifc_type)
            .cloned()
            .collect()
    }

    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.entities.values().filter(|e| &e.ifc_type == ifc_type).count()
    }

    fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(graph: &mut EntityGraph) -> EntityId {
        graph
            .add(IfcType::IfcCartesianPoint, vec![AttributeValue::floats([0.0, 0.0, 0.0])])
            .unwrap()
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut graph = EntityGraph::new();
        let a = point(&mut graph);
        let b = point(&mut graph);
        assert_eq!((a, b), (EntityId(1), EntityId(2)));
        assert_eq!(graph.entity_count(), 2);
    }

    #[test]
    fn test_write_rejects_dangling_reference() {
        let mut graph = EntityGraph::new();
        let id = graph.allocate_id();
        let result = graph.write(
            id,
            IfcType::IfcPolyline,
            vec![AttributeValue::refs([EntityId(5)])],
        );
        assert!(matches!(
            result,
            Err(ExportError::DanglingReference { target, .. }) if target == EntityId(5)
        ));
    }

    #[test]
    fn test_write_rejects_unallocated_id() {
        let mut graph = EntityGraph::new();
        assert!(matches!(
            graph.write(EntityId(1), IfcType::IfcDirection, vec![]),
            Err(ExportError::UnallocatedId(_))
        ));
    }

    #[test]
    fn test_overwrite_and_clear() {
        let mut graph = EntityGraph::new();
        let p = point(&mut graph);
        graph
            .write(p, IfcType::IfcCartesianPoint, vec![AttributeValue::floats([1.0, 2.0])])
            .unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(p).unwrap().get_list(0).unwrap().len(), 2);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.allocate_id(), EntityId(1));
    }
}
