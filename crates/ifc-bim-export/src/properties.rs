// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property and quantity set encoder

use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{
    new_global_id, AttributeValue as V, EntityId, IfcType, PropertySet, PropertyValue, QuantitySet,
    QuantityType,
};

/// Nominal value for a property, `None` when it must be dropped
///
/// Numbers are written as reals and booleans as `'true'`/`'false'` labels.
pub fn nominal_value(value: &PropertyValue) -> Option<V> {
    match value.sanitized()? {
        PropertyValue::Text(s) => Some(V::typed("IFCLABEL", V::String(s))),
        PropertyValue::Number(n) => Some(V::typed("IFCREAL", V::Float(n))),
        PropertyValue::Bool(b) => {
            Some(V::typed("IFCLABEL", V::text(if b { "true" } else { "false" })))
        }
        PropertyValue::Null => None,
    }
}

impl Encoder {
    /// Attach every non-empty property set to `element`
    pub(crate) fn write_property_sets(
        &mut self,
        element: EntityId,
        sets: &[PropertySet],
    ) -> Result<()> {
        for set in sets {
            let name = set.name.trim();
            if name.is_empty() {
                log::warn!("Skipping unnamed property set on {element}");
                continue;
            }

            let mut properties = Vec::with_capacity(set.properties.len());
            for (key, value) in &set.properties {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                let Some(nominal) = nominal_value(value) else {
                    log::debug!("Dropping property {name}.{key} on {element}");
                    continue;
                };
                properties.push(self.graph.add(
                    IfcType::IfcPropertySingleValue,
                    vec![key.into(), V::Null, nominal, V::Null],
                )?);
            }
            if properties.is_empty() {
                continue;
            }

            let pset = self.graph.add(
                IfcType::IfcPropertySet,
                vec![
                    new_global_id().into(),
                    self.shared.owner_history.into(),
                    name.into(),
                    V::Null,
                    V::refs(properties),
                ],
            )?;
            self.define(element, pset)?;
        }
        Ok(())
    }

    /// Attach a quantity set; non-finite quantities are dropped
    pub(crate) fn write_quantity_set(
        &mut self,
        element: EntityId,
        set: &QuantitySet,
    ) -> Result<()> {
        let mut quantities = Vec::with_capacity(set.quantities.len());
        for quantity in &set.quantities {
            if !quantity.value.is_finite() {
                continue;
            }
            let ifc_type = match quantity.quantity_type {
                QuantityType::Length => IfcType::IfcQuantityLength,
                QuantityType::Area => IfcType::IfcQuantityArea,
                QuantityType::Volume => IfcType::IfcQuantityVolume,
                QuantityType::Count => IfcType::IfcQuantityCount,
                QuantityType::Weight => IfcType::IfcQuantityWeight,
            };
            quantities.push(self.graph.add(
                ifc_type,
                vec![quantity.name.as_str().into(), V::Null, V::Null, quantity.value.into()],
            )?);
        }
        if quantities.is_empty() {
            return Ok(());
        }

        let qset = self.graph.add(
            IfcType::IfcElementQuantity,
            vec![
                new_global_id().into(),
                self.shared.owner_history.into(),
                set.name.as_str().into(),
                V::Null,
                V::Null,
                V::refs(quantities),
            ],
        )?;
        self.define(element, qset)
    }

    fn define(&mut self, element: EntityId, definition: EntityId) -> Result<()> {
        self.graph.add(
            IfcType::IfcRelDefinesByProperties,
            vec![
                new_global_id().into(),
                self.shared.owner_history.into(),
                V::Null,
                V::Null,
                V::refs([element]),
                definition.into(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_bim_model::{EntityResolver, Quantity};

    #[test]
    fn test_nominal_values() {
        assert_eq!(
            nominal_value(&PropertyValue::Text("  Oak ".into())),
            Some(V::typed("IFCLABEL", V::text("Oak")))
        );
        assert_eq!(
            nominal_value(&PropertyValue::Bool(false)),
            Some(V::typed("IFCLABEL", V::text("false")))
        );
        assert_eq!(nominal_value(&PropertyValue::Number(f64::NAN)), None);
        assert_eq!(nominal_value(&PropertyValue::Text("   ".into())), None);
        assert_eq!(nominal_value(&PropertyValue::Null), None);
    }

    #[test]
    fn test_empty_sets_are_not_written() {
        let mut encoder = Encoder::default();
        encoder.write_context().unwrap();
        let element = encoder.cartesian_point(&[0.0, 0.0, 0.0]).unwrap();

        let sets = vec![
            PropertySet::new("Pset_Empty").with("bad", f64::INFINITY),
            PropertySet::new("").with("ok", 1.0),
            PropertySet::new("Pset_Kept").with("ok", 1.0),
        ];
        encoder.write_property_sets(element, &sets).unwrap();

        let mut quantities = QuantitySet::new("BaseQuantities");
        quantities.push(Quantity::length("Length", f64::NAN));
        encoder.write_quantity_set(element, &quantities).unwrap();

        let graph = encoder.graph();
        assert_eq!(graph.count_by_type(&IfcType::IfcPropertySet), 1);
        assert_eq!(graph.count_by_type(&IfcType::IfcElementQuantity), 0);
        assert_eq!(graph.count_by_type(&IfcType::IfcRelDefinesByProperties), 1);
    }
}
