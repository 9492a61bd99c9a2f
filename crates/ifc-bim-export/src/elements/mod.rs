// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-element encoders
//!
//! Each encoder returns `Ok(None)` when the element cannot be written
//! (degenerate parameters, missing host); the reason is logged.

mod column;
mod counter;
mod furniture;
mod opening;
mod slab;
mod space;
mod stair;
mod wall;

pub use counter::{counter_sections, offset_polyline, CounterSection};
pub use stair::stair_profile;

use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{
    compress_guid, AttributeValue as V, BimElement, ElementData, EntityId, IfcType, Point2,
};
use uuid::Uuid;

/// Attributes shared by every product entity
pub(crate) struct Product<'a> {
    pub global_id: String,
    pub name: &'a str,
    pub object_type: V,
    pub placement: EntityId,
    pub shape: EntityId,
    /// Slot 7: `Tag` on elements, `LongName` on spatial elements
    pub label: V,
}

impl<'a> Product<'a> {
    pub fn of(element: &'a BimElement, placement: EntityId, shape: EntityId) -> Self {
        Self {
            global_id: compress_guid(&element.id),
            name: &element.name,
            object_type: V::Null,
            placement,
            shape,
            label: V::Null,
        }
    }

    pub fn object_type(mut self, object_type: &str) -> Self {
        self.object_type = V::text(object_type);
        self
    }

    pub fn label(mut self, label: V) -> Self {
        self.label = label;
        self
    }
}

impl Encoder {
    /// Write a product entity: the eight rooted product attributes, then `extra`
    pub(crate) fn write_product(
        &mut self,
        ifc_type: IfcType,
        product: Product<'_>,
        extra: Vec<V>,
    ) -> Result<EntityId> {
        let mut attributes = Vec::with_capacity(8 + extra.len());
        attributes.extend([
            product.global_id.into(),
            self.shared.owner_history.into(),
            product.name.into(),
            V::Null,
            product.object_type,
            product.placement.into(),
            product.shape.into(),
            product.label,
        ]);
        attributes.extend(extra);
        self.graph.add(ifc_type, attributes)
    }

    /// Placement of an element inside its storey
    ///
    /// `x`/`y` are world plan coordinates, `z` is relative to the storey
    /// elevation.
    pub(crate) fn element_placement(
        &mut self,
        storey: Uuid,
        x: f64,
        y: f64,
        z: f64,
        rotation_z: f64,
    ) -> Result<EntityId> {
        let parent = self.storey(storey).map(|s| s.placement);
        self.local_placement(parent, x, y, z, rotation_z)
    }
}

/// Enclosed area of a ring (shoelace), always positive
pub(crate) fn polygon_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() * 0.5
}

/// Closed ring length
pub(crate) fn polygon_perimeter(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| points[i].distance(&points[(i + 1) % n])).sum()
}

/// First numeric input of an element that is NaN or infinite
///
/// Checked before any entity is written so a bad element leaves no partial
/// entities behind.
pub(crate) fn non_finite_input(element: &BimElement) -> Option<&'static str> {
    let p = &element.placement;
    if ![p.position.x, p.position.y, p.position.z].iter().all(|v| v.is_finite()) {
        return Some("placement position");
    }
    if ![p.rotation.x, p.rotation.y, p.rotation.z, p.rotation.w].iter().all(|v| v.is_finite()) {
        return Some("placement rotation");
    }
    if let Some(mesh) = &element.geometry.mesh {
        if !mesh.positions.iter().all(|v| v.is_finite()) {
            return Some("mesh vertex");
        }
    }

    let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
    let finite_ring = |points: &[Point2]| points.iter().all(|q| q.x.is_finite() && q.y.is_finite());

    let (field, ok) = match &element.data {
        ElementData::Wall(wall) => (
            "wall geometry",
            finite_ring(&[wall.start, wall.end]) && finite(&[wall.thickness, wall.height]),
        ),
        ElementData::Door(fill) | ElementData::Window(fill) => (
            "fill dimensions",
            finite(&[fill.position_on_wall, fill.width, fill.height, fill.sill_height]),
        ),
        ElementData::Slab(slab) => (
            "slab outline",
            finite_ring(&slab.outline) && finite(&[slab.thickness, slab.elevation_offset]),
        ),
        ElementData::Column(column) => {
            ("column dimensions", finite(&[column.width, column.depth, column.height]))
        }
        ElementData::Counter(c) => (
            "counter path",
            finite_ring(&c.path)
                && finite(&[
                    c.depth,
                    c.height,
                    c.top_thickness,
                    c.overhang,
                    c.kick_height,
                    c.kick_recess,
                    c.footrest_height,
                ]),
        ),
        ElementData::Furniture(f) => {
            ("furniture dimensions", finite(&[f.width, f.depth, f.height]))
        }
        ElementData::Space(space) => (
            "space boundary",
            finite_ring(&space.boundary)
                && finite(&[space.height, space.net_floor_area.unwrap_or(0.0)]),
        ),
        ElementData::Stair(stair) => {
            ("stair dimensions", finite(&[stair.width, stair.total_rise, stair.tread_depth]))
        }
    };
    (!ok).then_some(field)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polygon_measures() {
        let rect = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        assert_relative_eq!(polygon_area(&rect), 12.0);
        assert_relative_eq!(polygon_perimeter(&rect), 14.0);

        let mut clockwise = rect;
        clockwise.reverse();
        assert_relative_eq!(polygon_area(&clockwise), 12.0);
        assert_eq!(polygon_area(&rect[..2]), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_are_named() {
        use ifc_bim_model::{ColumnData, ColumnProfile, OpeningFillData};

        let column = BimElement::new(
            "Column",
            ElementData::Column(ColumnData {
                profile: ColumnProfile::Rectangular,
                width: 0.3,
                depth: 0.3,
                height: 3.0,
            }),
        );
        assert_eq!(non_finite_input(&column), None);

        let mut moved = column.clone();
        moved.placement.position.x = f64::NAN;
        assert_eq!(non_finite_input(&moved), Some("placement position"));

        let door = BimElement::new(
            "Door",
            ElementData::Door(OpeningFillData {
                host_wall_id: None,
                position_on_wall: f64::INFINITY,
                width: 0.9,
                height: 2.1,
                sill_height: 0.0,
            }),
        );
        assert_eq!(non_finite_input(&door), Some("fill dimensions"));
    }
}
