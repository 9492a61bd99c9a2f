// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PropertyReader trait implementation

use ifc_bim_model::{
    AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType, PropertyReader,
    PropertySet, PropertyValue, Quantity, QuantitySet, QuantityType,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Property reader backed by an IfcRelDefinesByProperties index
pub struct PropertyReaderImpl {
    resolver: Arc<dyn EntityResolver>,
    /// Object ID -> property set IDs, in relationship order
    pset_cache: FxHashMap<EntityId, Vec<EntityId>>,
    /// Object ID -> element quantity IDs, in relationship order
    qset_cache: FxHashMap<EntityId, Vec<EntityId>>,
}

impl PropertyReaderImpl {
    /// Index every property relationship in the model
    pub fn new(resolver: Arc<dyn EntityResolver>) -> Self {
        let mut pset_cache: FxHashMap<EntityId, Vec<EntityId>> = FxHashMap::default();
        let mut qset_cache: FxHashMap<EntityId, Vec<EntityId>> = FxHashMap::default();

        // RelatedObjects at index 4, RelatingPropertyDefinition at index 5
        for rel in resolver.entities_by_type(&IfcType::IfcRelDefinesByProperties) {
            let Some(definition_id) = rel.get_ref(5) else {
                continue;
            };
            let Some(definition) = resolver.get(definition_id) else {
                continue;
            };
            let cache = match definition.ifc_type {
                IfcType::IfcPropertySet => &mut pset_cache,
                IfcType::IfcElementQuantity => &mut qset_cache,
                _ => continue,
            };
            for object in rel.get_refs(4) {
                cache.entry(object).or_default().push(definition_id);
            }
        }

        Self {
            resolver,
            pset_cache,
            qset_cache,
        }
    }

    /// Decode one property set; `None` when it carries no readable property
    fn read_property_set(&self, pset: &DecodedEntity) -> Option<PropertySet> {
        let mut set = PropertySet::new(pset.get_string(2).unwrap_or_default());

        // HasProperties at index 4
        for prop in self.resolver.resolve_ref_list(pset.get(4)?) {
            let Some(name) = prop.get_string(0) else {
                continue;
            };
            let value = match prop.ifc_type {
                IfcType::IfcPropertySingleValue => prop.get(2).map(nominal_value),
                IfcType::IfcPropertyEnumeratedValue => prop.get_list(2).map(|values| {
                    let joined: Vec<String> =
                        values.iter().filter_map(display_value).collect();
                    PropertyValue::Text(joined.join(", "))
                }),
                _ => None,
            };
            if let Some(value) = value {
                set.properties.insert(name.to_string(), value);
            }
        }

        (!set.is_empty()).then_some(set)
    }

    fn read_quantity_set(&self, qset: &DecodedEntity) -> QuantitySet {
        let mut set = QuantitySet::new(qset.get_string(2).unwrap_or_default());

        // Quantities at index 5, each value at index 3
        if let Some(list) = qset.get(5) {
            for qty in self.resolver.resolve_ref_list(list) {
                let quantity_type = match qty.ifc_type {
                    IfcType::IfcQuantityLength => QuantityType::Length,
                    IfcType::IfcQuantityArea => QuantityType::Area,
                    IfcType::IfcQuantityVolume => QuantityType::Volume,
                    IfcType::IfcQuantityCount => QuantityType::Count,
                    IfcType::IfcQuantityWeight => QuantityType::Weight,
                    _ => continue,
                };
                if let (Some(name), Some(value)) = (qty.get_string(0), qty.get_float(3)) {
                    set.push(Quantity::new(name, value, quantity_type));
                }
            }
        }

        set
    }
}

/// Convert a NominalValue into a property value
///
/// Labels spelling `true`/`false` become booleans, since booleans are
/// written as labels.
fn nominal_value(attr: &AttributeValue) -> PropertyValue {
    match attr {
        AttributeValue::TypedValue(type_name, args) => {
            let Some(inner) = args.first() else {
                return PropertyValue::Null;
            };
            match type_name.as_str() {
                "IFCBOOLEAN" | "IFCLOGICAL" => inner
                    .as_bool()
                    .map(PropertyValue::Bool)
                    .unwrap_or(PropertyValue::Null),
                "IFCLABEL" | "IFCTEXT" | "IFCIDENTIFIER" => match inner.as_string() {
                    Some(s) if s.eq_ignore_ascii_case("true") => PropertyValue::Bool(true),
                    Some(s) if s.eq_ignore_ascii_case("false") => PropertyValue::Bool(false),
                    Some(s) => PropertyValue::Text(s.to_string()),
                    None => PropertyValue::Null,
                },
                _ => nominal_value(inner),
            }
        }
        AttributeValue::Float(f) => PropertyValue::Number(*f),
        AttributeValue::Integer(i) => PropertyValue::Number(*i as f64),
        AttributeValue::String(s) => PropertyValue::Text(s.clone()),
        AttributeValue::Bool(b) => PropertyValue::Bool(*b),
        AttributeValue::Enum(_) => attr
            .as_bool()
            .map(PropertyValue::Bool)
            .unwrap_or(PropertyValue::Null),
        _ => PropertyValue::Null,
    }
}

fn display_value(attr: &AttributeValue) -> Option<String> {
    match attr {
        AttributeValue::String(s) | AttributeValue::Enum(s) => Some(s.clone()),
        AttributeValue::Integer(i) => Some(i.to_string()),
        AttributeValue::Float(f) => Some(f.to_string()),
        AttributeValue::Bool(b) => Some(b.to_string()),
        AttributeValue::TypedValue(_, args) => args.first().and_then(display_value),
        _ => None,
    }
}

impl PropertyReader for PropertyReaderImpl {
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet> {
        self.pset_cache
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|pset_id| self.resolver.get(*pset_id))
                    .filter_map(|pset| self.read_property_set(&pset))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn quantity_sets(&self, id: EntityId) -> Vec<QuantitySet> {
        self.qset_cache
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|qset_id| self.resolver.get(*qset_id))
                    .map(|qset| self.read_quantity_set(&qset))
                    .collect()
            })
            .unwrap_or_default()
    }
}
