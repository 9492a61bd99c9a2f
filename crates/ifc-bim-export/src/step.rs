// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP physical file writer

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::store::EntityGraph;
use ifc_bim_model::{AttributeValue, EntityId};
use std::fmt::Write;

/// Schema written to `FILE_SCHEMA`
pub const SCHEMA: &str = "IFC2X3";

/// Serialize `graph` as a complete STEP file
pub fn write_step(graph: &EntityGraph, options: &ExportOptions) -> Result<String> {
    let mut out = String::with_capacity(graph.len() * 64 + 512);

    writeln!(out, "ISO-10303-21;")?;
    writeln!(out, "HEADER;")?;
    writeln!(out, "FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');")?;
    writeln!(
        out,
        "FILE_NAME({},{},({}),({}),{},{},'');",
        quote(&options.file_name),
        quote(&options.header_timestamp()),
        quote(&options.author),
        quote(&options.organization),
        quote(&format!("{} {}", options.application_name, options.application_version)),
        quote(&options.application_name),
    )?;
    writeln!(out, "FILE_SCHEMA(('{SCHEMA}'));")?;
    writeln!(out, "ENDSEC;")?;
    writeln!(out, "DATA;")?;

    for entity in graph.iter() {
        write!(out, "{}={}(", entity.id, entity.ifc_type.name())?;
        for (i, value) in entity.attributes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_value(&mut out, value, entity.id)?;
        }
        writeln!(out, ");")?;
    }

    writeln!(out, "ENDSEC;")?;
    writeln!(out, "END-ISO-10303-21;")?;
    Ok(out)
}

/// Append one attribute value
pub fn write_value(out: &mut String, value: &AttributeValue, owner: EntityId) -> Result<()> {
    match value {
        AttributeValue::Null => out.push('$'),
        AttributeValue::Derived => out.push('*'),
        AttributeValue::EntityRef(id) => write!(out, "{id}")?,
        AttributeValue::Bool(b) => out.push_str(if *b { ".T." } else { ".F." }),
        AttributeValue::Integer(i) => write!(out, "{i}")?,
        AttributeValue::Float(f) => {
            let real = format_real(*f)
                .ok_or_else(|| ExportError::entity(owner, format!("non-finite real {f}")))?;
            out.push_str(&real);
        }
        AttributeValue::String(s) => out.push_str(&quote(s)),
        AttributeValue::Enum(e) => write!(out, ".{e}.")?,
        AttributeValue::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, owner)?;
            }
            out.push(')');
        }
        AttributeValue::TypedValue(name, args) => {
            out.push_str(name);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, arg, owner)?;
            }
            out.push(')');
        }
    }
    Ok(())
}

/// STEP real: always a decimal point, exponent form for tiny magnitudes
///
/// Returns `None` for NaN and infinities.
pub fn format_real(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    // Normalise -0.0
    let value = if value == 0.0 { 0.0 } else { value };

    if value != 0.0 && value.abs() < 1e-4 {
        // `{:E}` gives "1E-5" or "1.5E-5"
        let formatted = format!("{value:E}");
        let (mantissa, exponent) = formatted.split_once('E')?;
        let exponent: i32 = exponent.parse().ok()?;
        let dot = if mantissa.contains('.') { "" } else { "." };
        let sign = if exponent < 0 { '-' } else { '+' };
        return Some(format!("{mantissa}{dot}E{sign}{:02}", exponent.abs()));
    }

    let mut s = format!("{value}");
    if !s.contains('.') {
        s.push('.');
    }
    Some(s)
}

/// Quote and escape a string
///
/// `'` and `\` are doubled; characters outside printable ASCII are written
/// as `\X2\HHHH\X0\` runs of UTF-16 code units.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');

    let mut wide: Vec<u16> = Vec::new();
    let flush = |wide: &mut Vec<u16>, out: &mut String| {
        if !wide.is_empty() {
            out.push_str("\\X2\\");
            for unit in wide.drain(..) {
                out.push_str(&format!("{unit:04X}"));
            }
            out.push_str("\\X0\\");
        }
    };

    for c in s.chars() {
        if (' '..='~').contains(&c) {
            flush(&mut wide, &mut out);
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        } else {
            let mut buf = [0u16; 2];
            wide.extend_from_slice(c.encode_utf16(&mut buf));
        }
    }
    flush(&mut wide, &mut out);

    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reals_always_carry_a_point() {
        assert_eq!(format_real(1.0).unwrap(), "1.");
        assert_eq!(format_real(0.5).unwrap(), "0.5");
        assert_eq!(format_real(-3.0).unwrap(), "-3.");
        assert_eq!(format_real(-0.0).unwrap(), "0.");
        assert_eq!(format_real(1e-5).unwrap(), "1.E-05");
        assert_eq!(format_real(2.5e-7).unwrap(), "2.5E-07");
        assert_eq!(format_real(1e21).unwrap(), "1000000000000000000000.");
        assert!(format_real(f64::NAN).is_none());
        assert!(format_real(f64::INFINITY).is_none());
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("O'Brien"), "'O''Brien'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("Küche"), "'K\\X2\\00FC\\X0\\che'");
        assert_eq!(quote("日本"), "'\\X2\\65E5672C\\X0\\'");
    }

    #[test]
    fn test_write_nested_values() {
        let mut out = String::new();
        let value = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(3)),
            AttributeValue::Null,
            AttributeValue::typed("IFCLABEL", "x".into()),
            AttributeValue::enumeration("AREA"),
            AttributeValue::Bool(false),
        ]);
        write_value(&mut out, &value, EntityId(1)).unwrap();
        assert_eq!(out, "(#3,$,IFCLABEL('x'),.AREA.,.F.)");
    }

    #[test]
    fn test_non_finite_real_is_an_error() {
        let mut out = String::new();
        let result = write_value(&mut out, &AttributeValue::Float(f64::NAN), EntityId(4));
        assert!(matches!(result, Err(ExportError::Entity { id, .. }) if id == EntityId(4)));
    }
}
