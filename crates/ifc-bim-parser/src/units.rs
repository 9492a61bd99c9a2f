// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit scale extraction

use ifc_bim_model::{AttributeValue, DecodedEntity, EntityResolver, EntityResolverExt, IfcType};

/// Conversion-based units may point at other conversion-based units
const MAX_UNIT_DEPTH: usize = 4;

/// Scale from the file's length unit to metres
///
/// Reads the project's unit assignment (IfcProject attribute 8). Returns 1.0
/// when the file declares no length unit.
pub fn extract_unit_scale(resolver: &dyn EntityResolver) -> f64 {
    let Some(project) = resolver.entities_by_type(&IfcType::IfcProject).into_iter().next() else {
        return 1.0;
    };
    let Ok(assignment) = resolver.follow(&project, 8) else {
        return 1.0;
    };

    assignment
        .get(0)
        .map(|units| resolver.resolve_ref_list(units))
        .unwrap_or_default()
        .iter()
        .find_map(|unit| length_unit_scale(unit, resolver, 0))
        .filter(|scale| scale.is_finite() && *scale > 0.0)
        .unwrap_or(1.0)
}

fn length_unit_scale(
    unit: &DecodedEntity,
    resolver: &dyn EntityResolver,
    depth: usize,
) -> Option<f64> {
    if depth > MAX_UNIT_DEPTH || unit.get_enum(1)? != "LENGTHUNIT" {
        return None;
    }

    match unit.ifc_type {
        // IFCSIUNIT(*, UnitType, Prefix, Name)
        IfcType::IfcSIUnit => {
            if unit.get_enum(3)? != "METRE" {
                return None;
            }
            Some(unit.get_enum(2).map(si_prefix).unwrap_or(1.0))
        }
        // IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
        IfcType::IfcConversionBasedUnit => {
            let factor = resolver.follow(unit, 3).ok()?;
            if factor.ifc_type != IfcType::IfcMeasureWithUnit {
                return None;
            }
            let value = factor.get(0).and_then(AttributeValue::as_float)?;
            let base = resolver
                .follow(&factor, 1)
                .ok()
                .and_then(|base| length_unit_scale(&base, resolver, depth + 1))
                .unwrap_or(1.0);
            Some(value * base)
        }
        _ => None,
    }
}

fn si_prefix(prefix: &str) -> f64 {
    match prefix {
        "EXA" => 1e18,
        "PETA" => 1e15,
        "TERA" => 1e12,
        "GIGA" => 1e9,
        "MEGA" => 1e6,
        "KILO" => 1e3,
        "HECTO" => 1e2,
        "DECA" => 1e1,
        "DECI" => 1e-1,
        "CENTI" => 1e-2,
        "MILLI" => 1e-3,
        "MICRO" => 1e-6,
        "NANO" => 1e-9,
        "PICO" => 1e-12,
        "FEMTO" => 1e-15,
        "ATTO" => 1e-18,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverImpl;
    use approx::assert_relative_eq;

    fn scale_of(units: &str) -> f64 {
        let content = format!(
            "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC2X3'));\nENDSEC;\nDATA;\n\
             #1=IFCPROJECT('g',$,'P',$,$,$,$,$,#2);\n{units}\nENDSEC;\nEND-ISO-10303-21;\n"
        );
        extract_unit_scale(&ResolverImpl::new(content))
    }

    #[test]
    fn test_millimetres() {
        let scale = scale_of(
            "#2=IFCUNITASSIGNMENT((#4,#3));\n\
             #3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);\n\
             #4=IFCSIUNIT(*,.AREAUNIT.,$,.SQUARE_METRE.);",
        );
        assert_relative_eq!(scale, 0.001);
    }

    #[test]
    fn test_metres_without_prefix() {
        let scale = scale_of(
            "#2=IFCUNITASSIGNMENT((#3));\n#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);",
        );
        assert_relative_eq!(scale, 1.0);
    }

    #[test]
    fn test_feet_via_conversion_based_unit() {
        let scale = scale_of(
            "#2=IFCUNITASSIGNMENT((#3));\n\
             #3=IFCCONVERSIONBASEDUNIT(#6,.LENGTHUNIT.,'FOOT',#4);\n\
             #4=IFCMEASUREWITHUNIT(IFCLENGTHMEASURE(0.3048),#5);\n\
             #5=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);\n\
             #6=IFCDIMENSIONALEXPONENTS(1,0,0,0,0,0,0);",
        );
        assert_relative_eq!(scale, 0.3048);
    }

    #[test]
    fn test_missing_units_default_to_metres() {
        assert_relative_eq!(scale_of("#2=IFCUNITASSIGNMENT(());"), 1.0);
        assert_relative_eq!(scale_of(""), 1.0);
    }
}
