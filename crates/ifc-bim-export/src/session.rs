// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encode session
//!
//! [`Encoder`] owns the entity graph and the id maps of one encode. Every
//! call to [`Encoder::encode`] starts from an empty graph and empty maps, so
//! one instance can serve many sequential calls; concurrent calls need one
//! instance each.

use crate::elements;
use crate::error::Result;
use crate::options::ExportOptions;
use crate::step::write_step;
use crate::store::EntityGraph;
use ifc_bim_model::{
    BimElement, BuildingInfo, ElementData, EntityId, ProjectInfo, SiteInfo, StoreyInfo, WallData,
};
use rustc_hash::FxHashMap;
use uuid::Uuid;

/// Entities shared by every element of a file
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SharedIds {
    pub owner_history: EntityId,
    pub model_context: EntityId,
    pub body_context: EntityId,
    pub origin: EntityId,
    pub axis_z: EntityId,
    pub axis_x: EntityId,
}

/// An encoded storey
#[derive(Clone, Copy, Debug)]
pub(crate) struct StoreyRef {
    pub entity: EntityId,
    pub placement: EntityId,
}

/// An encoded wall, kept for the doors and windows it hosts
#[derive(Clone, Debug)]
pub(crate) struct WallRef {
    pub entity: EntityId,
    pub data: WallData,
}

/// Encoder for IFC2X3 STEP files
pub struct Encoder {
    pub(crate) options: ExportOptions,
    pub(crate) graph: EntityGraph,
    pub(crate) shared: SharedIds,
    pub(crate) storeys: FxHashMap<Uuid, StoreyRef>,
    pub(crate) first_storey: Option<Uuid>,
    pub(crate) walls: FxHashMap<Uuid, WallRef>,
    pub(crate) elements: FxHashMap<Uuid, EntityId>,
}

impl Encoder {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            graph: EntityGraph::new(),
            shared: SharedIds::default(),
            storeys: FxHashMap::default(),
            first_storey: None,
            walls: FxHashMap::default(),
            elements: FxHashMap::default(),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Graph produced by the last encode
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Entity written for an element or storey by the last encode
    pub fn entity_of(&self, id: &Uuid) -> Option<EntityId> {
        self.elements
            .get(id)
            .copied()
            .or_else(|| self.storeys.get(id).map(|s| s.entity))
    }

    fn reset(&mut self) {
        self.graph.clear();
        self.shared = SharedIds::default();
        self.storeys.clear();
        self.first_storey = None;
        self.walls.clear();
        self.elements.clear();
    }

    /// Encode a complete building model into STEP bytes
    ///
    /// Elements that cannot be encoded are logged and left out. Walls are
    /// written before the doors and windows they host.
    pub fn encode(
        &mut self,
        project: &ProjectInfo,
        site: &SiteInfo,
        building: &BuildingInfo,
        storeys: &[StoreyInfo],
        elements: &[BimElement],
    ) -> Result<Vec<u8>> {
        self.reset();
        log::debug!(
            "Encoding {} storeys and {} elements",
            storeys.len(),
            elements.len()
        );

        self.write_context()?;
        self.write_hierarchy(project, site, building, storeys)?;

        let mut ordered: Vec<&BimElement> = elements.iter().collect();
        ordered.sort_by_key(|e| encode_rank(&e.data));

        let mut skipped = 0usize;
        for element in ordered {
            if self.encode_element(element)?.is_none() {
                skipped += 1;
            }
        }

        let step = write_step(&self.graph, &self.options)?;
        log::debug!(
            "Encoded {} entities ({} elements skipped)",
            self.graph.len(),
            skipped
        );
        Ok(step.into_bytes())
    }

    /// Encode one element, `None` when it was skipped
    fn encode_element(&mut self, element: &BimElement) -> Result<Option<EntityId>> {
        let Some(storey_id) = element
            .parent_storey_id
            .filter(|id| self.storeys.contains_key(id))
            .or(self.first_storey)
        else {
            log::warn!(
                "Skipping {} '{}': no storey to place it in",
                element.element_type(),
                element.name
            );
            return Ok(None);
        };

        if let Some(field) = elements::non_finite_input(element) {
            log::warn!(
                "Skipping {} '{}': non-finite {}",
                element.element_type(),
                element.name,
                field
            );
            return Ok(None);
        }

        let written = match &element.data {
            ElementData::Wall(wall) => self.encode_wall(element, wall, storey_id)?,
            ElementData::Door(fill) | ElementData::Window(fill) => {
                self.encode_fill(element, fill, storey_id)?
            }
            ElementData::Slab(slab) => self.encode_slab(element, slab, storey_id)?,
            ElementData::Column(column) => self.encode_column(element, column, storey_id)?,
            ElementData::Counter(counter) => self.encode_counter(element, counter, storey_id)?,
            ElementData::Furniture(furniture) => {
                self.encode_furniture(element, furniture, storey_id)?
            }
            ElementData::Space(space) => self.encode_space(element, space, storey_id)?,
            ElementData::Stair(stair) => self.encode_stair(element, stair, storey_id)?,
        };

        let Some(entity) = written else {
            return Ok(None);
        };

        self.elements.insert(element.id, entity);
        self.write_property_sets(entity, &element.property_sets)?;
        self.write_containment(entity, storey_id)?;
        Ok(Some(entity))
    }

    pub(crate) fn storey(&self, id: Uuid) -> Option<StoreyRef> {
        self.storeys.get(&id).copied()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

/// Hosts before the elements that reference them
fn encode_rank(data: &ElementData) -> u8 {
    match data {
        ElementData::Wall(_) => 0,
        ElementData::Door(_) | ElementData::Window(_) => 2,
        _ => 1,
    }
}

/// Encode with default options
pub fn encode(
    project: &ProjectInfo,
    site: &SiteInfo,
    building: &BuildingInfo,
    storeys: &[StoreyInfo],
    elements: &[BimElement],
) -> Result<Vec<u8>> {
    Encoder::default().encode(project, site, building, storeys, elements)
}
