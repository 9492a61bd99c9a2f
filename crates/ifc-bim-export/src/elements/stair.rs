// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{positive, Product};
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{
    AttributeValue as V, BimElement, EntityId, IfcType, Point2, Quantity, QuantitySet, StairData,
};
use uuid::Uuid;

/// Thickness of the waist slab under the flight
const STAIR_SLAB_THICKNESS: f64 = 0.15;

/// Landing past the last step, as a fraction of the tread depth
const LANDING_FACTOR: f64 = 0.5;

/// Side profile of a straight flight: X along the run, Y up
///
/// Steps from the origin, a short landing at the top, then the sloped
/// underside back to just below the start.
pub fn stair_profile(stair: &StairData) -> Vec<Point2> {
    let n = stair.riser_count as usize;
    let riser = stair.riser_height();
    let tread = stair.tread_depth;

    let mut points = Vec::with_capacity(2 * n + 3);
    points.push(Point2::new(0.0, 0.0));
    for i in 0..n {
        let x = i as f64 * tread;
        let z = (i + 1) as f64 * riser;
        points.push(Point2::new(x, z));
        if i + 1 < n {
            points.push(Point2::new(x + tread, z));
        }
    }
    let end = stair.run_length() + tread * LANDING_FACTOR;
    points.push(Point2::new(end, stair.total_rise));
    points.push(Point2::new(end, stair.total_rise - STAIR_SLAB_THICKNESS));
    points.push(Point2::new(0.0, -STAIR_SLAB_THICKNESS));
    points
}

impl Encoder {
    /// The side profile is stood upright and extruded across the width,
    /// centred on the stair's axis
    pub(crate) fn encode_stair(
        &mut self,
        element: &BimElement,
        stair: &StairData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        if stair.riser_count == 0
            || !positive(stair.width)
            || !positive(stair.total_rise)
            || !positive(stair.tread_depth)
        {
            log::warn!("Skipping stair '{}': degenerate dimensions", element.name);
            return Ok(None);
        }

        let profile = self.arbitrary_profile(&stair_profile(stair))?;
        // Local Z along -Y, local X along +X: profile Y maps to world Z
        let location = self.cartesian_point(&[0.0, stair.width / 2.0, 0.0])?;
        let axis = self.direction(0.0, -1.0, 0.0)?;
        let position = self.graph.add(
            IfcType::IfcAxis2Placement3D,
            vec![location.into(), axis.into(), self.shared.axis_x.into()],
        )?;
        let solid = self.extrude_at(profile, position, self.shared.axis_z, stair.width)?;
        let shape = self.product_shape(&[solid], "SweptSolid")?;

        let p = element.placement.position;
        let yaw = element.placement.rotation.yaw();
        let placement = self.element_placement(storey, p.x, p.y, p.z, yaw)?;
        let entity = self.write_product(
            IfcType::IfcStair,
            Product::of(element, placement, shape),
            vec![V::enumeration("STRAIGHT_RUN_STAIR")],
        )?;
        self.write_quantity_set(entity, &stair_quantities(stair))?;
        Ok(Some(entity))
    }
}

pub(crate) fn stair_quantities(stair: &StairData) -> QuantitySet {
    let mut set = QuantitySet::new("BaseQuantities");
    set.push(Quantity::length("Width", stair.width));
    set.push(Quantity::length("GrossHeight", stair.total_rise));
    let length = stair.run_length() + stair.tread_depth * LANDING_FACTOR;
    set.push(Quantity::length("GrossLength", length));
    set.push(Quantity::count("NumberOfRiser", stair.riser_count as f64));
    set.push(Quantity::length("RiserHeight", stair.riser_height()));
    set.push(Quantity::length("TreadLength", stair.tread_depth));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stair() -> StairData {
        StairData {
            width: 1.0,
            total_rise: 0.54,
            riser_count: 3,
            tread_depth: 0.3,
        }
    }

    #[test]
    fn test_profile_steps_and_underside() {
        let points = stair_profile(&stair());
        // origin, 3 risers, 2 treads, landing, underside, return
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], Point2::new(0.0, 0.0));
        assert_relative_eq!(points[1].y, 0.18, epsilon = 1e-12);
        assert_relative_eq!(points[2].x, 0.3);
        assert_relative_eq!(points[6].x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(points[6].y, 0.54);
        assert_relative_eq!(points[7].y, 0.39, epsilon = 1e-12);
        assert_eq!(points[8], Point2::new(0.0, -STAIR_SLAB_THICKNESS));
    }

    #[test]
    fn test_quantities() {
        let set = stair_quantities(&stair());
        assert_eq!(set.get("NumberOfRiser"), Some(3.0));
        assert_relative_eq!(set.get("RiserHeight").unwrap(), 0.18, epsilon = 1e-12);
        assert_relative_eq!(set.get("GrossLength").unwrap(), 0.75, epsilon = 1e-12);
    }
}
