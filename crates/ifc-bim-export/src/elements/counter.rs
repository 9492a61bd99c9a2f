// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Counters
//!
//! A counter run is swept along its front polyline; depth is measured to
//! the left of travel. Up to four bands are extruded separately and written
//! as one multi-solid body.

use super::Product;
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{AttributeValue as V, BimElement, CounterData, EntityId, IfcType, Point2};
use uuid::Uuid;

/// Footrest bar spans this band behind the front edge
const FOOTREST_FRONT: f64 = 0.02;
const FOOTREST_BACK: f64 = 0.05;
const FOOTREST_THICKNESS: f64 = 0.03;

/// One extruded band of a counter
#[derive(Clone, Debug, PartialEq)]
pub struct CounterSection {
    /// Closed plan outline: front edge forwards, back edge backwards
    pub outline: Vec<Point2>,
    /// Underside above the counter base
    pub z: f64,
    pub height: f64,
}

/// Offset a polyline sideways; positive `distance` moves it to the left
///
/// Interior vertices are mitred so both adjoining segments stay parallel
/// to the input.
pub fn offset_polyline(path: &[Point2], distance: f64) -> Vec<Point2> {
    if path.len() < 2 {
        return path.to_vec();
    }

    let mut normals: Vec<(f64, f64)> = Vec::with_capacity(path.len() - 1);
    for pair in path.windows(2) {
        let (dx, dy) = (pair[1].x - pair[0].x, pair[1].y - pair[0].y);
        let len = dx.hypot(dy);
        let normal = if len > f64::EPSILON {
            (-dy / len, dx / len)
        } else {
            normals.last().copied().unwrap_or((0.0, 0.0))
        };
        normals.push(normal);
    }

    path.iter()
        .enumerate()
        .map(|(i, p)| {
            let (nx, ny) = if i == 0 {
                normals[0]
            } else if i == path.len() - 1 {
                normals[i - 1]
            } else {
                let (a, b) = (normals[i - 1], normals[i]);
                let (mx, my) = (a.0 + b.0, a.1 + b.1);
                let len = mx.hypot(my);
                let cos = if len > f64::EPSILON { (mx * b.0 + my * b.1) / len } else { 0.0 };
                if cos < 0.1 {
                    // Hairpin turn, keep the outgoing normal
                    b
                } else {
                    (mx / len / cos, my / len / cos)
                }
            };
            Point2::new(p.x + nx * distance, p.y + ny * distance)
        })
        .collect()
}

fn band(front: Vec<Point2>, back: Vec<Point2>, z: f64, height: f64) -> Option<CounterSection> {
    let mut outline = front;
    outline.extend(back.into_iter().rev());
    (outline.len() >= 3 && height.is_finite() && height > 0.0).then_some(CounterSection {
        outline,
        z,
        height,
    })
}

/// Bands making up a counter: kick, body, top and optional footrest
///
/// The kick solid is present only when it has both a height and a recess,
/// but the body always starts at the kick height. A path with fewer than two
/// points has no bands.
pub fn counter_sections(counter: &CounterData) -> Vec<CounterSection> {
    let path = &counter.path;
    if path.len() < 2 {
        return Vec::new();
    }

    let has_kick = counter.kick_height > 0.0 && counter.kick_recess > 0.0;
    let body_base = counter.kick_height.max(0.0);
    let top_z = counter.height - counter.top_thickness;
    let back = offset_polyline(path, counter.depth);

    let mut sections = Vec::with_capacity(4);
    if has_kick {
        sections.push(band(
            path.clone(),
            offset_polyline(path, counter.depth - counter.kick_recess),
            0.0,
            counter.kick_height,
        ));
    }
    sections.push(band(path.clone(), back.clone(), body_base, top_z - body_base));
    sections.push(band(
        offset_polyline(path, -counter.overhang),
        back,
        top_z,
        counter.top_thickness,
    ));
    if counter.has_footrest {
        sections.push(band(
            offset_polyline(path, FOOTREST_FRONT),
            offset_polyline(path, FOOTREST_BACK),
            counter.footrest_height,
            FOOTREST_THICKNESS,
        ));
    }
    sections.into_iter().flatten().collect()
}

impl Encoder {
    /// Written as a building element proxy with object type `Counter`
    pub(crate) fn encode_counter(
        &mut self,
        element: &BimElement,
        counter: &CounterData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        let sections = counter_sections(counter);
        if sections.is_empty() {
            log::warn!("Skipping counter '{}': no solid sections", element.name);
            return Ok(None);
        }

        let mut solids = Vec::with_capacity(sections.len());
        for section in &sections {
            let profile = self.arbitrary_profile(&section.outline)?;
            solids.push(self.extrude(profile, section.height, section.z)?);
        }
        let shape = self.product_shape(&solids, "SweptSolid")?;
        let z = element.placement.position.z;
        let placement = self.element_placement(storey, 0.0, 0.0, z, 0.0)?;

        let entity = self.write_product(
            IfcType::IfcBuildingElementProxy,
            Product::of(element, placement, shape).object_type("Counter"),
            vec![V::Null],
        )?;
        Ok(Some(entity))
    }
}
