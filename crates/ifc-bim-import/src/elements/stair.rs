// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::{ImportError, Result};
use crate::hierarchy::StoreyEntry;
use crate::session::Session;
use ifc_bim_model::{
    BimElement, Bounds3, DecodedEntity, ElementData, IfcModel, Placement, Point3, Quaternion,
    StairData,
};

/// Riser height assumed when only a bounding box is known
const NOMINAL_RISER_HEIGHT: f64 = 0.175;

/// Share of a tread added as top landing to the gross length
const LANDING_FACTOR: f64 = 0.5;

impl Session<'_> {
    /// Flight parameters from the base quantities, or estimated from the
    /// bounding box
    pub(crate) fn decode_stair(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        let bounds = self.world_bounds(entity);
        let stair = match self.stair_from_quantities(entity) {
            Some(stair) => stair,
            None => {
                log::info!("Stair {}: no base quantities; using mesh bounds", entity.id);
                stair_from_bounds(bounds.as_ref().ok_or(ImportError::NoGeometry)?)
            }
        };

        let placement = self.world_placement(entity);
        let position = Point3::new(
            placement.position.x,
            placement.position.y,
            placement.position.z - storey.origin_z,
        );
        let mut element = BimElement::new(String::new(), ElementData::Stair(stair))
            .with_placement(Placement::new(position, Quaternion::from_yaw(placement.rotation_z)));
        element.geometry.bounds = bounds;
        Ok(element)
    }

    fn stair_from_quantities(&self, entity: &DecodedEntity) -> Option<StairData> {
        let properties = self.model.properties();
        let quantity = |name: &str| {
            properties
                .quantity(entity.id, name)
                .filter(|v| v.is_finite() && *v > 0.0)
        };

        let stair = StairData {
            width: quantity("Width")? * self.unit_scale,
            total_rise: quantity("GrossHeight")? * self.unit_scale,
            riser_count: quantity("NumberOfRiser")?.round() as u32,
            tread_depth: quantity("TreadLength")? * self.unit_scale,
        };
        (stair.riser_count > 0).then_some(stair)
    }
}

/// Narrow side as width, long side as run, risers at a nominal height
fn stair_from_bounds(bounds: &Bounds3) -> StairData {
    let size = bounds.size();
    let riser_count = (size.z / NOMINAL_RISER_HEIGHT).round().max(1.0) as u32;
    let run = size.x.max(size.y);
    StairData {
        width: size.x.min(size.y),
        total_rise: size.z,
        riser_count,
        tread_depth: run / (riser_count as f64 - 1.0 + LANDING_FACTOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stair_from_bounds() {
        let bounds = Bounds3 {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(4.25, 1.0, 2.8),
        };
        let stair = stair_from_bounds(&bounds);
        assert_eq!(stair.riser_count, 16);
        assert_relative_eq!(stair.width, 1.0);
        // Run plus half a landing tread spans the box
        let run = stair.run_length() + stair.tread_depth * LANDING_FACTOR;
        assert_relative_eq!(run, 4.25, epsilon = 1e-12);
    }
}
