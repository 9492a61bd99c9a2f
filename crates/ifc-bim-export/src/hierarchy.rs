// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial hierarchy and relationships
//!
//! Written in dependency order: ownership, units, representation contexts,
//! then project, site, building and storeys with their aggregations.

use crate::error::Result;
use crate::session::{Encoder, StoreyRef};
use ifc_bim_model::{
    compress_guid, new_global_id, AttributeValue as V, BuildingInfo, EntityId, IfcType,
    ProjectInfo, Quantity, QuantitySet, SiteInfo, StoreyInfo,
};

impl Encoder {
    /// Ownership, shared axes and the body representation context
    pub(crate) fn write_context(&mut self) -> Result<()> {
        let person = self.graph.add(
            IfcType::IfcPerson,
            vec![
                V::Null,
                non_empty(&self.options.author),
                V::Null,
                V::Null,
                V::Null,
                V::Null,
                V::Null,
                V::Null,
            ],
        )?;
        let organization = self.graph.add(
            IfcType::IfcOrganization,
            vec![
                V::Null,
                non_empty_or(&self.options.organization, "Unknown"),
                V::Null,
                V::Null,
                V::Null,
            ],
        )?;
        let user = self.graph.add(
            IfcType::IfcPersonAndOrganization,
            vec![person.into(), organization.into(), V::Null],
        )?;
        let application = self.graph.add(
            IfcType::IfcApplication,
            vec![
                organization.into(),
                self.options.application_version.as_str().into(),
                self.options.application_name.as_str().into(),
                self.options.application_name.as_str().into(),
            ],
        )?;
        let created = self.options.creation_time();
        self.shared.owner_history = self.graph.add(
            IfcType::IfcOwnerHistory,
            vec![
                user.into(),
                application.into(),
                V::Null,
                V::enumeration("ADDED"),
                V::Null,
                V::Null,
                V::Null,
                V::Integer(created),
            ],
        )?;

        self.shared.origin = self.cartesian_point(&[0.0, 0.0, 0.0])?;
        self.shared.axis_z = self.direction(0.0, 0.0, 1.0)?;
        self.shared.axis_x = self.direction(1.0, 0.0, 0.0)?;

        let world = self.graph.add(
            IfcType::IfcAxis2Placement3D,
            vec![self.shared.origin.into(), self.shared.axis_z.into(), self.shared.axis_x.into()],
        )?;
        let true_north = self.graph.add(IfcType::IfcDirection, vec![V::floats([0.0, 1.0])])?;
        let model_context = self.graph.add(
            IfcType::IfcGeometricRepresentationContext,
            vec![
                V::Null,
                "Model".into(),
                V::Integer(3),
                V::Float(1.0e-5),
                world.into(),
                true_north.into(),
            ],
        )?;
        self.shared.body_context = self.graph.add(
            IfcType::IfcGeometricRepresentationSubContext,
            vec![
                "Body".into(),
                "Model".into(),
                V::Derived,
                V::Derived,
                V::Derived,
                V::Derived,
                model_context.into(),
                V::Null,
                V::enumeration("MODEL_VIEW"),
                V::Null,
            ],
        )?;
        self.shared.model_context = model_context;
        Ok(())
    }

    fn si_unit(&mut self, unit_type: &str, name: &str) -> Result<EntityId> {
        self.graph.add(
            IfcType::IfcSIUnit,
            vec![V::Derived, V::enumeration(unit_type), V::Null, V::enumeration(name)],
        )
    }

    fn write_units(&mut self) -> Result<EntityId> {
        let units = vec![
            self.si_unit("LENGTHUNIT", "METRE")?,
            self.si_unit("AREAUNIT", "SQUARE_METRE")?,
            self.si_unit("VOLUMEUNIT", "CUBIC_METRE")?,
            self.si_unit("PLANEANGLEUNIT", "RADIAN")?,
        ];
        self.graph.add(IfcType::IfcUnitAssignment, vec![V::refs(units)])
    }

    /// Project, site, building and storeys with their aggregations
    ///
    /// Site and building sit at the world origin; each storey placement is
    /// lifted to its elevation.
    pub(crate) fn write_hierarchy(
        &mut self,
        project: &ProjectInfo,
        site: &SiteInfo,
        building: &BuildingInfo,
        storeys: &[StoreyInfo],
    ) -> Result<()> {
        let owner = self.shared.owner_history;
        let units = self.write_units()?;
        let project_id = self.graph.add(
            IfcType::IfcProject,
            vec![
                compress_guid(&project.id).into(),
                owner.into(),
                project.name.as_str().into(),
                project.description.as_deref().map(V::text).unwrap_or(V::Null),
                V::Null,
                V::Null,
                V::Null,
                V::refs([self.shared.model_context]),
                units.into(),
            ],
        )?;

        let site_placement = self.local_placement(None, 0.0, 0.0, 0.0, 0.0)?;
        let site_id = self.graph.add(
            IfcType::IfcSite,
            vec![
                compress_guid(&site.id).into(),
                owner.into(),
                site.name.as_str().into(),
                V::Null,
                V::Null,
                site_placement.into(),
                V::Null,
                V::Null,
                V::enumeration("ELEMENT"),
                V::Null,
                V::Null,
                V::Null,
                V::Null,
                V::Null,
            ],
        )?;

        let building_placement = self.local_placement(Some(site_placement), 0.0, 0.0, 0.0, 0.0)?;
        let building_id = self.graph.add(
            IfcType::IfcBuilding,
            vec![
                compress_guid(&building.id).into(),
                owner.into(),
                building.name.as_str().into(),
                V::Null,
                V::Null,
                building_placement.into(),
                V::Null,
                V::Null,
                V::enumeration("ELEMENT"),
                V::Null,
                V::Null,
                V::Null,
            ],
        )?;

        let mut storey_ids = Vec::with_capacity(storeys.len());
        for storey in storeys {
            let placement =
                self.local_placement(Some(building_placement), 0.0, 0.0, storey.elevation, 0.0)?;
            let entity = self.graph.add(
                IfcType::IfcBuildingStorey,
                vec![
                    compress_guid(&storey.id).into(),
                    owner.into(),
                    storey.name.as_str().into(),
                    V::Null,
                    V::Null,
                    placement.into(),
                    V::Null,
                    V::Null,
                    V::enumeration("ELEMENT"),
                    storey.elevation.into(),
                ],
            )?;
            self.storeys.insert(storey.id, StoreyRef { entity, placement });

            let height = if storey.height.is_finite() && storey.height > 0.0 {
                storey.height
            } else {
                self.options.default_storey_height
            };
            let mut quantities = QuantitySet::new("BaseQuantities");
            quantities.push(Quantity::length("GrossHeight", height));
            self.write_quantity_set(entity, &quantities)?;

            self.first_storey.get_or_insert(storey.id);
            storey_ids.push(entity);
        }

        self.aggregate(project_id, &[site_id])?;
        self.aggregate(site_id, &[building_id])?;
        if !storey_ids.is_empty() {
            self.aggregate(building_id, &storey_ids)?;
        }
        Ok(())
    }

    fn aggregate(&mut self, relating: EntityId, related: &[EntityId]) -> Result<EntityId> {
        self.graph.add(
            IfcType::IfcRelAggregates,
            vec![
                new_global_id().into(),
                self.shared.owner_history.into(),
                V::Null,
                V::Null,
                relating.into(),
                V::refs(related.iter().copied()),
            ],
        )
    }

    /// Place `element` in its storey
    pub(crate) fn write_containment(
        &mut self,
        element: EntityId,
        storey: uuid::Uuid,
    ) -> Result<()> {
        let Some(structure) = self.storey(storey) else {
            return Ok(());
        };
        self.graph.add(
            IfcType::IfcRelContainedInSpatialStructure,
            vec![
                new_global_id().into(),
                self.shared.owner_history.into(),
                V::Null,
                V::Null,
                V::refs([element]),
                structure.entity.into(),
            ],
        )?;
        Ok(())
    }

    /// `opening` cuts `wall`
    pub(crate) fn write_void(&mut self, wall: EntityId, opening: EntityId) -> Result<EntityId> {
        self.graph.add(
            IfcType::IfcRelVoidsElement,
            vec![
                new_global_id().into(),
                self.shared.owner_history.into(),
                V::Null,
                V::Null,
                wall.into(),
                opening.into(),
            ],
        )
    }

    /// `element` fills `opening`
    pub(crate) fn write_fill(&mut self, opening: EntityId, element: EntityId) -> Result<EntityId> {
        self.graph.add(
            IfcType::IfcRelFillsElement,
            vec![
                new_global_id().into(),
                self.shared.owner_history.into(),
                V::Null,
                V::Null,
                opening.into(),
                element.into(),
            ],
        )
    }
}

fn non_empty(s: &str) -> V {
    if s.trim().is_empty() {
        V::Null
    } else {
        V::text(s)
    }
}

fn non_empty_or(s: &str, fallback: &str) -> V {
    if s.trim().is_empty() {
        V::text(fallback)
    } else {
        V::text(s)
    }
}
