// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for STEP entity graphs
//!
//! This module defines the fundamental types shared by the reader and the
//! writer side of the codec.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw express id (e.g., #123 becomes EntityId(123))
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

macro_rules! ifc_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// IFC entity type enumeration
        ///
        /// Covers the IFC2X3 subset this codec reads and writes. Other types are
        /// captured with their upper-cased name.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum IfcType {
            $($variant,)*
            /// Unknown type - stores the upper-cased type name
            Unknown(String),
        }

        impl IfcType {
            /// Parse a type name string into an IfcType
            pub fn parse(s: &str) -> Self {
                let upper = s.to_ascii_uppercase();
                match upper.as_str() {
                    $($name => IfcType::$variant,)*
                    _ => IfcType::Unknown(upper),
                }
            }

            /// Get the STEP type name (upper case)
            pub fn name(&self) -> &str {
                match self {
                    $(IfcType::$variant => $name,)*
                    IfcType::Unknown(s) => s,
                }
            }
        }
    };
}

ifc_types! {
    // Spatial structure
    IfcProject => "IFCPROJECT",
    IfcSite => "IFCSITE",
    IfcBuilding => "IFCBUILDING",
    IfcBuildingStorey => "IFCBUILDINGSTOREY",
    IfcSpace => "IFCSPACE",

    // Building elements
    IfcWall => "IFCWALL",
    IfcWallStandardCase => "IFCWALLSTANDARDCASE",
    IfcSlab => "IFCSLAB",
    IfcColumn => "IFCCOLUMN",
    IfcDoor => "IFCDOOR",
    IfcWindow => "IFCWINDOW",
    IfcStair => "IFCSTAIR",
    IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",
    IfcFurnishingElement => "IFCFURNISHINGELEMENT",
    IfcFurniture => "IFCFURNITURE",
    IfcOpeningElement => "IFCOPENINGELEMENT",

    // Actors and ownership
    IfcPerson => "IFCPERSON",
    IfcOrganization => "IFCORGANIZATION",
    IfcPersonAndOrganization => "IFCPERSONANDORGANIZATION",
    IfcApplication => "IFCAPPLICATION",
    IfcOwnerHistory => "IFCOWNERHISTORY",

    // Units
    IfcSIUnit => "IFCSIUNIT",
    IfcConversionBasedUnit => "IFCCONVERSIONBASEDUNIT",
    IfcMeasureWithUnit => "IFCMEASUREWITHUNIT",
    IfcDimensionalExponents => "IFCDIMENSIONALEXPONENTS",
    IfcUnitAssignment => "IFCUNITASSIGNMENT",

    // Geometric context and placement
    IfcGeometricRepresentationContext => "IFCGEOMETRICREPRESENTATIONCONTEXT",
    IfcGeometricRepresentationSubContext => "IFCGEOMETRICREPRESENTATIONSUBCONTEXT",
    IfcCartesianPoint => "IFCCARTESIANPOINT",
    IfcDirection => "IFCDIRECTION",
    IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
    IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
    IfcLocalPlacement => "IFCLOCALPLACEMENT",

    // Profiles and solids
    IfcPolyline => "IFCPOLYLINE",
    IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
    IfcCircleProfileDef => "IFCCIRCLEPROFILEDEF",
    IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
    IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
    IfcFacetedBrep => "IFCFACETEDBREP",
    IfcClosedShell => "IFCCLOSEDSHELL",
    IfcFace => "IFCFACE",
    IfcFaceOuterBound => "IFCFACEOUTERBOUND",
    IfcFaceBound => "IFCFACEBOUND",
    IfcPolyLoop => "IFCPOLYLOOP",
    IfcTriangulatedFaceSet => "IFCTRIANGULATEDFACESET",
    IfcCartesianPointList3D => "IFCCARTESIANPOINTLIST3D",

    // Representation
    IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
    IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",

    // Properties and quantities
    IfcPropertySet => "IFCPROPERTYSET",
    IfcPropertySingleValue => "IFCPROPERTYSINGLEVALUE",
    IfcPropertyEnumeratedValue => "IFCPROPERTYENUMERATEDVALUE",
    IfcElementQuantity => "IFCELEMENTQUANTITY",
    IfcQuantityLength => "IFCQUANTITYLENGTH",
    IfcQuantityArea => "IFCQUANTITYAREA",
    IfcQuantityVolume => "IFCQUANTITYVOLUME",
    IfcQuantityCount => "IFCQUANTITYCOUNT",
    IfcQuantityWeight => "IFCQUANTITYWEIGHT",

    // Relationships
    IfcRelAggregates => "IFCRELAGGREGATES",
    IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
    IfcRelVoidsElement => "IFCRELVOIDSELEMENT",
    IfcRelFillsElement => "IFCRELFILLSELEMENT",
    IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Check if this type is one of the wall types
    pub fn is_wall(&self) -> bool {
        matches!(self, IfcType::IfcWall | IfcType::IfcWallStandardCase)
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in an entity's attribute list, on
/// the way in (tokenizer) and on the way out (STEP writer).
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Boolean value (.T. / .F.)
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value (unescaped)
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Shorthand for a string attribute
    pub fn text(s: impl Into<String>) -> Self {
        AttributeValue::String(s.into())
    }

    /// Shorthand for an enumeration attribute
    pub fn enumeration(s: impl Into<String>) -> Self {
        AttributeValue::Enum(s.into())
    }

    /// Shorthand for a list of references
    pub fn refs(ids: impl IntoIterator<Item = EntityId>) -> Self {
        AttributeValue::List(ids.into_iter().map(AttributeValue::EntityRef).collect())
    }

    /// Shorthand for a list of reals
    pub fn floats(values: impl IntoIterator<Item = f64>) -> Self {
        AttributeValue::List(values.into_iter().map(AttributeValue::Float).collect())
    }

    /// Shorthand for a typed value with one argument
    pub fn typed(type_name: impl Into<String>, value: AttributeValue) -> Self {
        AttributeValue::TypedValue(type_name.into(), vec![value])
    }

    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_float(),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Enum(s) => match s.to_uppercase().as_str() {
                "TRUE" | "T" => Some(true),
                "FALSE" | "F" => Some(false),
                _ => None,
            },
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_bool(),
            _ => None,
        }
    }

    /// Try to get as enum string
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Visit every entity reference in this value, including nested lists
    pub fn for_each_ref(&self, f: &mut impl FnMut(EntityId)) {
        match self {
            AttributeValue::EntityRef(id) => f(*id),
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                for item in items {
                    item.for_each_ref(f);
                }
            }
            _ => {}
        }
    }
}

impl From<EntityId> for AttributeValue {
    fn from(id: EntityId) -> Self {
        AttributeValue::EntityRef(id)
    }
}

impl From<Option<EntityId>> for AttributeValue {
    fn from(id: Option<EntityId>) -> Self {
        id.map_or(AttributeValue::Null, AttributeValue::EntityRef)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

/// Decoded IFC entity
///
/// Represents a fully decoded entity with its id, type and attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float at index
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get list at index
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Get enum string at index
    pub fn get_enum(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_enum())
    }

    /// Get list of entity references at index
    pub fn get_refs(&self, index: usize) -> Vec<EntityId> {
        self.get_list(index)
            .map(|list| list.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }

    /// Check whether the list at `index` references `id`
    pub fn list_contains(&self, index: usize, id: EntityId) -> bool {
        self.get_list(index)
            .is_some_and(|list| list.iter().any(|v| v.as_entity_ref() == Some(id)))
    }
}

/// Triangle mesh data
///
/// Flattened vertex and index buffers, as exchanged with renderers and
/// geometry kernels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions as flattened [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals as flattened [nx, ny, nz, ...]; may be empty
    #[serde(default)]
    pub normals: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from positions and indices only
    pub fn from_buffers(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            indices,
        }
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Model metadata extracted from the STEP header
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4")
    pub schema_version: String,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// Preprocessor version
    pub preprocessor_version: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
    /// File description
    pub file_description: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Organization
    pub organization: Option<String>,
    /// Timestamp
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for name in ["IFCWALLSTANDARDCASE", "IfcRelFillsElement", "ifcpolyloop"] {
            let ty = IfcType::parse(name);
            assert!(!matches!(ty, IfcType::Unknown(_)), "{name}");
            assert_eq!(IfcType::parse(ty.name()), ty);
        }
    }

    #[test]
    fn test_unknown_type_keeps_name() {
        let ty = IfcType::parse("IfcFlowTerminal");
        assert_eq!(ty, IfcType::Unknown("IFCFLOWTERMINAL".into()));
        assert_eq!(ty.name(), "IFCFLOWTERMINAL");
    }

    #[test]
    fn test_attribute_accessors() {
        let label = AttributeValue::typed("IFCLABEL", "abc".into());
        assert_eq!(label.as_string(), Some("abc"));

        let flag = AttributeValue::typed("IFCBOOLEAN", AttributeValue::enumeration("T"));
        assert_eq!(flag.as_bool(), Some(true));

        let n = AttributeValue::Integer(3);
        assert_eq!(n.as_float(), Some(3.0));
    }

    #[test]
    fn test_for_each_ref_visits_nested_lists() {
        let value = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(1)),
            AttributeValue::List(vec![AttributeValue::EntityRef(EntityId(7))]),
            AttributeValue::Float(2.0),
        ]);
        let mut seen = Vec::new();
        value.for_each_ref(&mut |id| seen.push(id.0));
        assert_eq!(seen, vec![1, 7]);
    }

    #[test]
    fn test_list_contains() {
        let entity = DecodedEntity {
            id: EntityId(10),
            ifc_type: IfcType::IfcRelContainedInSpatialStructure,
            attributes: vec![
                AttributeValue::text("g"),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::refs([EntityId(3), EntityId(4)]),
                AttributeValue::EntityRef(EntityId(2)),
            ],
        };
        assert!(entity.list_contains(4, EntityId(4)));
        assert!(!entity.list_contains(4, EntityId(2)));
        assert_eq!(entity.get_refs(4), vec![EntityId(3), EntityId(4)]);
    }
}
