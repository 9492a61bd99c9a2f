// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building elements
//!
//! The in-memory building model exchanged with the codec. World coordinates
//! are Z-up, in metres. Plan points (`Point2`) are world X/Y; element
//! placement heights are relative to the element's storey elevation.

use crate::{MeshData, PropertySet};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A point in plan
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A point or vector in 3D
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Drop the height
    pub fn plan(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Rotation quaternion
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Rotation about +Z by `angle` radians
    pub fn from_yaw(angle: f64) -> Self {
        let half = angle * 0.5;
        Self {
            x: 0.0,
            y: 0.0,
            z: half.sin(),
            w: half.cos(),
        }
    }

    /// Rotation about +Z: `atan2(2(wz + xy), 1 - 2(y² + z²))`
    pub fn yaw(&self) -> f64 {
        let siny = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        siny.atan2(cosy)
    }
}

/// Position and orientation of an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// X/Y in world plan, Z relative to the storey elevation
    pub position: Point3,
    pub rotation: Quaternion,
}

impl Placement {
    pub fn new(position: Point3, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }
}

/// Axis-aligned box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    /// Extents along X, Y and Z
    pub fn size(&self) -> Point3 {
        Point3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }
}

/// What is known about an element's shape besides its parameters
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometrySummary {
    /// Triangle mesh in element-local, Y-up coordinates (renderer convention)
    pub mesh: Option<MeshData>,
    /// World bounding box, Z-up
    pub bounds: Option<Bounds3>,
}

/// Element kind, without payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Wall,
    Door,
    Window,
    Slab,
    Column,
    Counter,
    Furniture,
    Space,
    Stair,
}

impl ElementType {
    pub const ALL: [ElementType; 9] = [
        ElementType::Wall,
        ElementType::Door,
        ElementType::Window,
        ElementType::Slab,
        ElementType::Column,
        ElementType::Counter,
        ElementType::Furniture,
        ElementType::Space,
        ElementType::Stair,
    ];

    /// Lower-case name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Wall => "wall",
            ElementType::Door => "door",
            ElementType::Window => "window",
            ElementType::Slab => "slab",
            ElementType::Column => "column",
            ElementType::Counter => "counter",
            ElementType::Furniture => "furniture",
            ElementType::Space => "space",
            ElementType::Stair => "stair",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Door or window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// A void in a wall, filled by a door or window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: Uuid,
    pub kind: OpeningKind,
    /// The door or window filling this opening
    pub element_id: Uuid,
    /// Fraction along the wall axis, in [0, 1]
    pub position_on_wall: f64,
    pub width: f64,
    pub height: f64,
    pub sill_height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallData {
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
    pub height: f64,
    /// Openings hosted by this wall only
    #[serde(default)]
    pub openings: Vec<Opening>,
}

impl WallData {
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Run direction, radians from +X
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    /// Point at fraction `t` along the wall axis
    pub fn point_on_wall(&self, t: f64) -> Point2 {
        Point2::new(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }
}

/// Payload shared by doors and windows
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpeningFillData {
    pub host_wall_id: Option<Uuid>,
    pub position_on_wall: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub sill_height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlabType {
    #[default]
    Floor,
    Ceiling,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlabData {
    pub outline: Vec<Point2>,
    pub thickness: f64,
    #[serde(default)]
    pub slab_type: SlabType,
    #[serde(default)]
    pub elevation_offset: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnProfile {
    #[default]
    Rectangular,
    Circular,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnData {
    #[serde(default)]
    pub profile: ColumnProfile,
    /// Diameter for circular columns
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

/// Counter run: a polyline front edge with depth going to the left of travel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterData {
    pub path: Vec<Point2>,
    pub depth: f64,
    pub height: f64,
    pub top_thickness: f64,
    #[serde(default)]
    pub overhang: f64,
    #[serde(default)]
    pub kick_height: f64,
    #[serde(default)]
    pub kick_recess: f64,
    #[serde(default)]
    pub has_footrest: bool,
    #[serde(default)]
    pub footrest_height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FurnitureData {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpaceType {
    #[default]
    Internal,
    External,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceData {
    pub boundary: Vec<Point2>,
    pub height: f64,
    #[serde(default)]
    pub space_type: SpaceType,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub net_floor_area: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StairData {
    pub width: f64,
    pub total_rise: f64,
    pub riser_count: u32,
    pub tread_depth: f64,
}

impl StairData {
    pub fn riser_height(&self) -> f64 {
        if self.riser_count == 0 {
            0.0
        } else {
            self.total_rise / self.riser_count as f64
        }
    }

    /// Horizontal run of the flight, without the landing
    pub fn run_length(&self) -> f64 {
        self.tread_depth * self.riser_count.saturating_sub(1) as f64
    }
}

/// Type-specific payload; exactly one variant per element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementData {
    Wall(WallData),
    Door(OpeningFillData),
    Window(OpeningFillData),
    Slab(SlabData),
    Column(ColumnData),
    Counter(CounterData),
    Furniture(FurnitureData),
    Space(SpaceData),
    Stair(StairData),
}

impl ElementData {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementData::Wall(_) => ElementType::Wall,
            ElementData::Door(_) => ElementType::Door,
            ElementData::Window(_) => ElementType::Window,
            ElementData::Slab(_) => ElementType::Slab,
            ElementData::Column(_) => ElementType::Column,
            ElementData::Counter(_) => ElementType::Counter,
            ElementData::Furniture(_) => ElementType::Furniture,
            ElementData::Space(_) => ElementType::Space,
            ElementData::Stair(_) => ElementType::Stair,
        }
    }
}

/// One element of the building model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BimElement {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub geometry: GeometrySummary,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub property_sets: Vec<PropertySet>,
    pub parent_storey_id: Option<Uuid>,
    pub data: ElementData,
}

impl BimElement {
    /// New element with a random id and default placement
    pub fn new(name: impl Into<String>, data: ElementData) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            geometry: GeometrySummary::default(),
            placement: Placement::default(),
            property_sets: Vec::new(),
            parent_storey_id: None,
            data,
        }
    }

    pub fn with_storey(mut self, storey_id: Uuid) -> Self {
        self.parent_storey_id = Some(storey_id);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_property_set(mut self, pset: PropertySet) -> Self {
        self.property_sets.push(pset);
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_yaw_round_trip() {
        for angle in [0.0, 0.3, FRAC_PI_2, -2.0] {
            assert_abs_diff_eq!(Quaternion::from_yaw(angle).yaw(), angle, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(Quaternion::IDENTITY.yaw(), 0.0);
    }

    #[test]
    fn test_wall_geometry_helpers() {
        let wall = WallData {
            start: Point2::new(1.0, 1.0),
            end: Point2::new(1.0, 5.0),
            thickness: 0.2,
            height: 3.0,
            openings: Vec::new(),
        };
        assert_abs_diff_eq!(wall.length(), 4.0);
        assert_abs_diff_eq!(wall.angle(), FRAC_PI_2);
        assert_eq!(wall.point_on_wall(0.25), Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_element_type_follows_payload() {
        let element = BimElement::new(
            "Table",
            ElementData::Furniture(FurnitureData {
                width: 1.0,
                depth: 0.6,
                height: 0.75,
            }),
        );
        assert_eq!(element.element_type(), ElementType::Furniture);
    }

    #[test]
    fn test_element_serializes_with_type_tag() {
        let element = BimElement::new(
            "Stair",
            ElementData::Stair(StairData {
                width: 1.0,
                total_rise: 2.8,
                riser_count: 16,
                tread_depth: 0.28,
            }),
        );
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["data"]["type"], "stair");
        let back: BimElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }
}
