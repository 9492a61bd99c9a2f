// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project, site, building and storeys

use ifc_bim_geometry::resolve_placement;
use ifc_bim_model::{
    expand_guid, order_storeys, BuildingInfo, DecodedEntity, EntityId, EntityResolver, IfcType,
    ProjectInfo, SiteInfo, StoreyInfo, DEFAULT_STOREY_HEIGHT,
};
use rustc_hash::FxHashMap;
use uuid::Uuid;

/// A decoded storey as seen by element decoders
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StoreyEntry {
    pub id: Uuid,
    /// World height of the storey placement; element heights are relative to it
    pub origin_z: f64,
}

pub(crate) struct Hierarchy {
    pub project: ProjectInfo,
    pub site: SiteInfo,
    pub building: BuildingInfo,
    /// Ascending by elevation
    pub storeys: Vec<StoreyInfo>,
    pub entries: FxHashMap<EntityId, StoreyEntry>,
}

impl Hierarchy {
    /// Lowest storey, the default container
    pub fn first_storey(&self) -> Option<StoreyEntry> {
        let first = self.storeys.first()?;
        self.entries.values().find(|e| e.id == first.id).copied()
    }
}

/// UUID behind an entity's GlobalId, or a fresh one when it is malformed
pub(crate) fn entity_uuid(entity: &DecodedEntity) -> Uuid {
    entity
        .get_string(0)
        .and_then(expand_guid)
        .unwrap_or_else(Uuid::new_v4)
}

fn entity_name(entity: &DecodedEntity) -> Option<String> {
    entity
        .get_string(2)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn read_hierarchy(resolver: &dyn EntityResolver, unit_scale: f64) -> Hierarchy {
    let first = |ifc_type: IfcType| resolver.entities_by_type(&ifc_type).into_iter().next();

    let project = match first(IfcType::IfcProject) {
        Some(entity) => ProjectInfo {
            id: entity_uuid(&entity),
            name: entity_name(&entity).unwrap_or_else(|| "Project".to_string()),
            description: entity.get_string(3).map(str::to_string),
        },
        None => ProjectInfo::default(),
    };
    let site = match first(IfcType::IfcSite) {
        Some(entity) => SiteInfo {
            id: entity_uuid(&entity),
            name: entity_name(&entity).unwrap_or_else(|| "Site".to_string()),
        },
        None => SiteInfo::default(),
    };
    let building = match first(IfcType::IfcBuilding) {
        Some(entity) => BuildingInfo {
            id: entity_uuid(&entity),
            name: entity_name(&entity).unwrap_or_else(|| "Building".to_string()),
        },
        None => BuildingInfo::default(),
    };

    let mut storeys = Vec::new();
    let mut entries = FxHashMap::default();
    for (index, entity) in resolver
        .entities_by_type(&IfcType::IfcBuildingStorey)
        .iter()
        .enumerate()
    {
        let origin_z = entity
            .get_ref(5)
            .map(|p| resolve_placement(resolver, p).scaled(unit_scale).position.z);
        // Elevation at index 9, else the placement height
        let elevation = entity
            .get_float(9)
            .map(|e| e * unit_scale)
            .or(origin_z)
            .unwrap_or(0.0);

        let id = entity_uuid(entity);
        storeys.push(StoreyInfo {
            id,
            name: entity_name(entity).unwrap_or_else(|| format!("Storey {}", index + 1)),
            elevation,
            height: DEFAULT_STOREY_HEIGHT,
        });
        entries.insert(
            entity.id,
            StoreyEntry {
                id,
                origin_z: origin_z.unwrap_or(elevation),
            },
        );
    }
    order_storeys(&mut storeys, DEFAULT_STOREY_HEIGHT);

    Hierarchy {
        project,
        site,
        building,
        storeys,
        entries,
    }
}
