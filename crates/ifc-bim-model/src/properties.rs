// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property sets and quantities

use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A scalar property value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Convert a JSON value; arrays and objects have no scalar form
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(PropertyValue::Null),
            serde_json::Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(PropertyValue::Number),
            serde_json::Value::String(s) => Some(PropertyValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// The value as it may be written to a file, or `None` if it must be dropped
    ///
    /// Text is trimmed and dropped when empty, numbers must be finite, nulls
    /// are dropped.
    pub fn sanitized(&self) -> Option<PropertyValue> {
        match self {
            PropertyValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| PropertyValue::Text(trimmed.to_string()))
            }
            PropertyValue::Number(n) => n.is_finite().then_some(PropertyValue::Number(*n)),
            PropertyValue::Bool(b) => Some(PropertyValue::Bool(*b)),
            PropertyValue::Null => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// A named bag of scalar properties
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// Property set name (e.g., "Pset_WallCommon")
    pub name: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl PropertySet {
    /// Create a new, empty property set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Build a set from a JSON object, skipping non-scalar entries
    pub fn from_json(
        name: impl Into<String>,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let mut set = Self::new(name);
        for (key, value) in object {
            if let Some(value) = PropertyValue::from_json(value) {
                set.properties.insert(key.clone(), value);
            }
        }
        set
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Quantity types supported in IFC2X3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityType {
    /// Linear measurement (IfcQuantityLength)
    Length,
    /// Area measurement (IfcQuantityArea)
    Area,
    /// Volume measurement (IfcQuantityVolume)
    Volume,
    /// Count (IfcQuantityCount)
    Count,
    /// Weight/mass measurement (IfcQuantityWeight)
    Weight,
}

impl QuantityType {
    /// Get default unit for this quantity type
    pub fn default_unit(&self) -> &'static str {
        match self {
            QuantityType::Length => "m",
            QuantityType::Area => "m²",
            QuantityType::Volume => "m³",
            QuantityType::Count => "",
            QuantityType::Weight => "kg",
        }
    }
}

/// A quantity value with type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Quantity name (e.g., "GrossVolume")
    pub name: String,
    pub value: f64,
    pub quantity_type: QuantityType,
}

impl Quantity {
    pub fn new(name: impl Into<String>, value: f64, quantity_type: QuantityType) -> Self {
        Self {
            name: name.into(),
            value,
            quantity_type,
        }
    }

    pub fn length(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, QuantityType::Length)
    }

    pub fn area(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, QuantityType::Area)
    }

    pub fn volume(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, QuantityType::Volume)
    }

    pub fn count(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, QuantityType::Count)
    }

    /// Unit of measurement
    pub fn unit(&self) -> &'static str {
        self.quantity_type.default_unit()
    }
}

/// A named set of quantities (IfcElementQuantity)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantitySet {
    /// Set name (e.g., "BaseQuantities")
    pub name: String,
    pub quantities: Vec<Quantity>,
}

impl QuantitySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantities: Vec::new(),
        }
    }

    pub fn push(&mut self, quantity: Quantity) {
        self.quantities.push(quantity);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.quantities
            .iter()
            .find(|q| q.name == name)
            .map(|q| q.value)
    }
}

/// Property and quantity access for entities
///
/// Follows IfcRelDefinesByProperties from an object to the definitions
/// attached to it.
pub trait PropertyReader: Send + Sync {
    /// All property sets attached to an entity
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet>;

    /// All element quantity sets attached to an entity
    fn quantity_sets(&self, id: EntityId) -> Vec<QuantitySet>;

    /// First quantity named `name` across all quantity sets of an entity
    fn quantity(&self, id: EntityId, name: &str) -> Option<f64> {
        self.quantity_sets(id).iter().find_map(|set| set.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitized_rules() {
        assert_eq!(
            PropertyValue::Text("  Pump ".into()).sanitized(),
            Some(PropertyValue::Text("Pump".into()))
        );
        assert_eq!(PropertyValue::Text("   ".into()).sanitized(), None);
        assert_eq!(PropertyValue::Number(f64::NAN).sanitized(), None);
        assert_eq!(PropertyValue::Number(f64::INFINITY).sanitized(), None);
        assert_eq!(
            PropertyValue::Bool(false).sanitized(),
            Some(PropertyValue::Bool(false))
        );
        assert_eq!(PropertyValue::Null.sanitized(), None);
    }

    #[test]
    fn test_from_json_skips_nested_values() {
        let value = json!({"name": "Pump", "flow": 12.5, "obj": {"a": 1}, "list": [1, 2]});
        let set = PropertySet::from_json("Pset_Pump", value.as_object().unwrap());
        assert_eq!(set.properties.len(), 2);
        assert_eq!(set.get("flow"), Some(&PropertyValue::Number(12.5)));
    }

    #[test]
    fn test_quantity_set_lookup() {
        let mut set = QuantitySet::new("BaseQuantities");
        set.push(Quantity::length("Width", 1.2));
        set.push(Quantity::count("NumberOfRisers", 16.0));
        assert_eq!(set.get("NumberOfRisers"), Some(16.0));
        assert_eq!(set.get("Missing"), None);
        assert_eq!(set.quantities[0].unit(), "m");
    }
}
