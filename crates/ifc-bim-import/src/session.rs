// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decode session
//!
//! One [`Session`] walks one opened model: hierarchy first, then walls,
//! then the doors and windows they host, then everything else. Failures
//! of single elements become warnings.

use crate::error::{ImportError, Result};
use crate::guard::ModelGuard;
use crate::hierarchy::{entity_uuid, read_hierarchy, Hierarchy, StoreyEntry};
use crate::options::ImportOptions;
use crate::result::{ImportResult, ImportStats};
use ifc_bim_geometry::{mesh_bounds, resolve_placement, GeometryRouter, WorldPlacement};
use ifc_bim_model::{
    BimElement, Bounds3, DecodedEntity, ElementData, ElementType, EntityId, EntityResolver,
    GeometryKernel, IfcModel, IfcType, Opening,
};
use rustc_hash::FxHashMap;

/// Entity types decoded for each element type, in decode order
const DECODE_ORDER: [(ElementType, &[IfcType]); 8] = [
    (ElementType::Wall, &[IfcType::IfcWall, IfcType::IfcWallStandardCase]),
    (ElementType::Door, &[IfcType::IfcDoor]),
    (ElementType::Window, &[IfcType::IfcWindow]),
    (ElementType::Slab, &[IfcType::IfcSlab]),
    (ElementType::Column, &[IfcType::IfcColumn]),
    (
        ElementType::Furniture,
        &[
            IfcType::IfcFurnishingElement,
            IfcType::IfcFurniture,
            IfcType::IfcBuildingElementProxy,
        ],
    ),
    (ElementType::Space, &[IfcType::IfcSpace]),
    (ElementType::Stair, &[IfcType::IfcStair]),
];

/// Opening to add to a decoded wall once all fillings are known
pub(crate) struct PendingOpening {
    pub wall: usize,
    pub opening: Opening,
}

pub(crate) struct Session<'m> {
    pub model: &'m ModelGuard,
    pub options: &'m ImportOptions,
    pub router: GeometryRouter,
    pub unit_scale: f64,
    pub hierarchy: Hierarchy,
    /// Wall entity -> index into `elements`
    pub walls: FxHashMap<EntityId, usize>,
    pub openings: Vec<PendingOpening>,
    pub elements: Vec<BimElement>,
    pub warnings: Vec<String>,
    pub stats: ImportStats,
}

impl<'m> Session<'m> {
    pub fn new(model: &'m ModelGuard, options: &'m ImportOptions) -> Self {
        let unit_scale = model.unit_scale();
        let hierarchy = read_hierarchy(model.resolver(), unit_scale);
        let stats = ImportStats {
            entity_count: model.resolver().entity_count(),
            ..ImportStats::default()
        };

        Self {
            model,
            options,
            router: GeometryRouter::with_unit_scale(unit_scale)
                .with_output(options.coordinate_system),
            unit_scale,
            hierarchy,
            walls: FxHashMap::default(),
            openings: Vec::new(),
            elements: Vec::new(),
            warnings: Vec::new(),
            stats,
        }
    }

    pub fn resolver(&self) -> &'m dyn EntityResolver {
        self.model.resolver()
    }

    pub fn run(mut self) -> ImportResult {
        if self.hierarchy.storeys.is_empty() {
            self.warn("No building storeys found; elements cannot be placed".to_string());
        }

        for (element_type, ifc_types) in DECODE_ORDER {
            if !self.options.imports(element_type) {
                continue;
            }
            for ifc_type in ifc_types {
                for entity in self.resolver().entities_by_type(ifc_type) {
                    self.decode_one(element_type, &entity);
                }
            }
        }
        self.attach_openings();

        log::debug!(
            "Decoded {} elements, skipped {}",
            self.stats.total_imported(),
            self.stats.total_skipped()
        );

        ImportResult {
            project: self.hierarchy.project,
            site: self.hierarchy.site,
            building: self.hierarchy.building,
            storeys: self.hierarchy.storeys,
            elements: self.elements,
            warnings: self.warnings,
            stats: self.stats,
            metadata: self.model.metadata().clone(),
        }
    }

    fn decode_one(&mut self, element_type: ElementType, entity: &DecodedEntity) {
        match self.decode_element(element_type, entity) {
            Ok(element) => {
                if matches!(element.data, ElementData::Wall(_)) {
                    self.walls.insert(entity.id, self.elements.len());
                }
                self.elements.push(element);
                self.stats.record_imported(element_type);
            }
            Err(e) => {
                self.warn(format!("Failed to parse {element_type} {}: {e}", entity.id));
                self.stats.record_skipped(element_type);
            }
        }
    }

    fn decode_element(
        &mut self,
        element_type: ElementType,
        entity: &DecodedEntity,
    ) -> Result<BimElement> {
        let storey = self
            .storey_of(entity.id)
            .ok_or_else(|| ImportError::invalid("no parent storey found"))?;

        let id = entity_uuid(entity);
        let mut element = match element_type {
            ElementType::Wall => self.decode_wall(entity, &storey)?,
            ElementType::Door | ElementType::Window => {
                self.decode_fill(entity, id, element_type, &storey)?
            }
            ElementType::Slab => self.decode_slab(entity, &storey)?,
            ElementType::Column => self.decode_column(entity, &storey)?,
            ElementType::Counter | ElementType::Furniture => {
                self.decode_furniture(entity, &storey)?
            }
            ElementType::Space => self.decode_space(entity, &storey)?,
            ElementType::Stair => self.decode_stair(entity, &storey)?,
        };

        element.id = id;
        element.parent_storey_id = Some(storey.id);
        element.name = entity
            .get_string(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} {}", entity.ifc_type.name(), entity.id));
        if self.options.import_property_sets {
            element.property_sets = self.model.properties().property_sets(entity.id);
        }
        Ok(element)
    }

    /// Containing storey, or the lowest storey when containment is missing
    fn storey_of(&self, entity: EntityId) -> Option<StoreyEntry> {
        self.model
            .relations()
            .containing_structure(entity)
            .and_then(|structure| self.hierarchy.entries.get(&structure).copied())
            .or_else(|| self.hierarchy.first_storey())
    }

    /// Each decoded door and window becomes an opening of its host wall
    fn attach_openings(&mut self) {
        for pending in std::mem::take(&mut self.openings) {
            let host = self.elements.get_mut(pending.wall).map(|e| &mut e.data);
            if let Some(ElementData::Wall(wall)) = host {
                wall.openings.push(pending.opening);
            }
        }
    }

    pub fn warn(&mut self, message: String) {
        log::warn!("{message}");
        self.warnings.push(message);
    }

    /// Object placement in metres; identity when absent
    pub fn world_placement(&self, entity: &DecodedEntity) -> WorldPlacement {
        entity
            .get_ref(5)
            .map(|p| resolve_placement(self.resolver(), p))
            .unwrap_or_default()
            .scaled(self.unit_scale)
    }

    /// Z-up world box of the element's meshes, metres
    pub fn world_bounds(&self, entity: &DecodedEntity) -> Option<Bounds3> {
        let meshes = self.router.element_meshes(self.resolver(), entity.id);
        mesh_bounds(&meshes, self.router.output_convention())
    }
}

/// Decode an opened model
pub(crate) fn decode_model(model: &ModelGuard, options: &ImportOptions) -> ImportResult {
    Session::new(model, options).run()
}
