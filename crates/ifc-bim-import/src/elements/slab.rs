// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{bounds_outline, rectangle_corners, SolidFrame};
use crate::error::{ImportError, Result};
use crate::hierarchy::StoreyEntry;
use crate::session::Session;
use ifc_bim_geometry::{extract_swept_solid, ProfileShape, SweptSolid};
use ifc_bim_model::{BimElement, DecodedEntity, ElementData, Point2, SlabData, SlabType};

/// Thinnest slab recovered from a bounding box
const MIN_SLAB_THICKNESS: f64 = 0.1;

/// Plan outline in world coordinates for polygon and rectangle profiles
pub(crate) fn profile_outline(frame: &SolidFrame<'_>, solid: &SweptSolid) -> Result<Vec<Point2>> {
    let local: Vec<(f64, f64)> = match &solid.profile {
        ProfileShape::Polygon(points) => points.iter().map(|p| (p.x, p.y)).collect(),
        ProfileShape::Rectangle { x_dim, y_dim, position } => {
            rectangle_corners(*x_dim, *y_dim, position)
        }
        ProfileShape::Circle { .. } => return Err(ImportError::invalid("circular outline")),
    };
    if local.len() < 3 {
        return Err(ImportError::invalid("outline has fewer than 3 points"));
    }
    Ok(local.into_iter().map(|(x, y)| frame.to_world(x, y)).collect())
}

impl Session<'_> {
    /// Outline and thickness; `PredefinedType` (8) `.ROOF.` makes a ceiling
    pub(crate) fn decode_slab(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        let (outline, thickness, base_z) = match self.parametric_slab(entity) {
            Ok(slab) => slab,
            Err(reason) => {
                log::info!("Slab {}: {reason}; using mesh bounds", entity.id);
                let bounds = self.world_bounds(entity).ok_or(ImportError::NoGeometry)?;
                (
                    bounds_outline(&bounds),
                    bounds.size().z.max(MIN_SLAB_THICKNESS),
                    bounds.min.z,
                )
            }
        };

        let slab_type = match entity.get_enum(8) {
            Some("ROOF") => SlabType::Ceiling,
            _ => SlabType::Floor,
        };
        // Floors hang below their offset, ceilings sit on it
        let relative_base = base_z - storey.origin_z;
        let elevation_offset = match slab_type {
            SlabType::Floor => relative_base + thickness,
            SlabType::Ceiling => relative_base,
        };

        Ok(BimElement::new(
            String::new(),
            ElementData::Slab(SlabData {
                outline,
                thickness,
                slab_type,
                elevation_offset,
            }),
        ))
    }

    fn parametric_slab(&self, entity: &DecodedEntity) -> Result<(Vec<Point2>, f64, f64)> {
        let solid = extract_swept_solid(self.resolver(), entity)?;
        let placement = self.world_placement(entity);
        let frame = SolidFrame {
            placement: &placement,
            solid: &solid,
            unit_scale: self.unit_scale,
        };
        let outline = profile_outline(&frame, &solid)?;
        Ok((outline, frame.length(solid.depth), frame.base_z()))
    }
}
