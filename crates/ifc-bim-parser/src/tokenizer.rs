// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP entity tokenizer using nom combinators
//!
//! Parses `#id=TYPE(attr,...);` records into tokens, then into owned
//! attribute values with STEP string escapes resolved.

use ifc_bim_model::{AttributeValue, DecodedEntity, EntityId, IfcType};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Raw token from a STEP record (before conversion to AttributeValue)
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    /// Entity reference (#123)
    EntityRef(u64),
    /// String value, still escaped ('it''s')
    String(&'a str),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enumeration (.VALUE.)
    Enum(&'a str),
    /// List of tokens
    List(Vec<Token<'a>>),
    /// Typed value like IFCLABEL('text')
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value ($)
    Null,
    /// Derived value (*)
    Derived,
}

impl<'a> Token<'a> {
    /// Convert token to owned AttributeValue
    pub fn to_attribute_value(&self) -> AttributeValue {
        match self {
            Token::EntityRef(id) => AttributeValue::EntityRef(EntityId(*id)),
            Token::String(s) => AttributeValue::String(decode_step_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(s) => AttributeValue::Enum((*s).to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(|t| t.to_attribute_value()).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::TypedValue(
                name.to_ascii_uppercase(),
                args.iter().map(|t| t.to_attribute_value()).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }
}

// ============================================================================
// String escapes
// ============================================================================

/// Resolve STEP string escapes
///
/// Handles `''`, `\\`, `\X2\hhhh...\X0\` (UTF-16), `\X\hh` (ISO 8859-1) and
/// `\S\c` (upper half of ISO 8859-1). Unrecognised escapes are kept verbatim.
pub fn decode_step_string(raw: &str) -> String {
    if !raw.contains('\'') && !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        if c == '\'' && rest.starts_with("''") {
            out.push('\'');
            rest = &rest[2..];
        } else if c == '\\' {
            if let Some((decoded, tail)) = decode_escape(rest) {
                out.push_str(&decoded);
                rest = tail;
            } else {
                out.push('\\');
                rest = &rest[1..];
            }
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

/// Decode one escape sequence at the start of `s` (which begins with `\`)
fn decode_escape(s: &str) -> Option<(String, &str)> {
    if let Some(tail) = s.strip_prefix("\\\\") {
        return Some(("\\".to_string(), tail));
    }

    if let Some(body) = s.strip_prefix("\\X2\\") {
        let end = body.find("\\X0\\")?;
        let hex = &body[..end];
        if hex.len() % 4 != 0 {
            return None;
        }
        let units = (0..hex.len())
            .step_by(4)
            .map(|i| u16::from_str_radix(&hex[i..i + 4], 16).ok())
            .collect::<Option<Vec<u16>>>()?;
        let decoded = char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        return Some((decoded, &body[end + 4..]));
    }

    if let Some(body) = s.strip_prefix("\\X\\") {
        let hex = body.get(..2)?;
        let code = u8::from_str_radix(hex, 16).ok()?;
        return Some(((code as char).to_string(), &body[2..]));
    }

    if let Some(body) = s.strip_prefix("\\S\\") {
        let c = body.chars().next()?;
        if !c.is_ascii() {
            return None;
        }
        let code = c as u8 + 128;
        return Some(((code as char).to_string(), &body[1..]));
    }

    None
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Parse whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

/// Parse an entity reference (#123)
fn entity_ref(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = lexical_core::parse::<u64>(digits.as_bytes()).unwrap_or(0);
    Ok((input, Token::EntityRef(id)))
}

/// Parse a STEP string ('text' with '' for escaped quotes)
fn step_string(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('\'')(input)?;

    // Find the closing quote, skipping doubled quotes
    let bytes = input.as_bytes();
    let mut end = 0;
    loop {
        if end >= bytes.len() {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )));
        }
        if bytes[end] == b'\'' {
            if bytes.get(end + 1) == Some(&b'\'') {
                end += 2;
                continue;
            }
            break;
        }
        end += 1;
    }

    Ok((&input[end + 1..], Token::String(&input[..end])))
}

/// Parse a number (integer or float)
fn number(input: &str) -> IResult<&str, Token> {
    let (input, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    // Use lexical-core for fast parsing
    if num_str.contains(['.', 'e', 'E']) {
        let f: f64 = lexical_core::parse(num_str.as_bytes()).unwrap_or(0.0);
        Ok((input, Token::Float(f)))
    } else {
        let i: i64 = lexical_core::parse(num_str.trim_start_matches('+').as_bytes()).unwrap_or(0);
        Ok((input, Token::Integer(i)))
    }
}

/// Parse an enumeration (.VALUE.)
fn enumeration(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, Token::Enum(name)))
}

/// Parse null ($)
fn null_value(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('$')(input)?;
    Ok((input, Token::Null))
}

/// Parse derived (*)
fn derived_value(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('*')(input)?;
    Ok((input, Token::Derived))
}

/// Parse a parenthesised, comma separated token list
fn token_list(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), token),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a list of tokens
fn list(input: &str) -> IResult<&str, Token> {
    let (input, items) = token_list(input)?;
    Ok((input, Token::List(items)))
}

/// Parse a typed value like IFCLABEL('text')
fn typed_value(input: &str) -> IResult<&str, Token> {
    let (input, type_name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = ws(input)?;
    let (input, args) = token_list(input)?;
    Ok((input, Token::TypedValue(type_name, args)))
}

/// Parse any token
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
        typed_value,
    ))
    .parse(input)
}

// ============================================================================
// Entity Parsing
// ============================================================================

/// Parse a complete entity definition
///
/// Format: `#123=IFCWALL(attr1,attr2,...);`
pub fn parse_entity(input: &str) -> Result<DecodedEntity, String> {
    let input = input.trim_start();

    let (input, _) = char::<&str, nom::error::Error<&str>>('#')
        .parse(input)
        .map_err(|_| "Expected # at start of entity")?;

    let (input, id_str) = take_while1::<_, &str, nom::error::Error<&str>>(|c: char| {
        c.is_ascii_digit()
    })
    .parse(input)
    .map_err(|_| "Expected entity ID")?;

    let id: u64 = id_str.parse().map_err(|_| "Invalid entity ID")?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| "Expected = after entity ID")?;

    let (input, type_name) =
        take_while1::<_, &str, nom::error::Error<&str>>(|c: char| c.is_alphanumeric() || c == '_')
            .parse(input)
            .map_err(|_| "Expected type name")?;

    let (input, _) = ws(input).unwrap_or((input, ()));

    let (_, tokens) =
        token_list(input).map_err(|e| format!("Failed to parse attributes of #{id}: {e:?}"))?;

    Ok(DecodedEntity {
        id: EntityId(id),
        ifc_type: IfcType::parse(type_name),
        attributes: tokens.iter().map(|t| t.to_attribute_value()).collect(),
    })
}

/// Parse a parenthesised argument list such as a header record body
///
/// `('a.ifc','2024-01-01',('me'))` yields three attribute values.
pub fn parse_arguments(input: &str) -> Result<Vec<AttributeValue>, String> {
    let (_, tokens) = token_list(input.trim_start())
        .map_err(|e| format!("Failed to parse argument list: {e:?}"))?;
    Ok(tokens.iter().map(|t| t.to_attribute_value()).collect())
}

/// Parse entity from content at given byte range
pub fn parse_entity_at(content: &str, start: usize, end: usize) -> Result<DecodedEntity, String> {
    let slice = content
        .get(start..end)
        .ok_or_else(|| format!("Byte range {start}..{end} out of bounds"))?;
    parse_entity(slice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_ref() {
        let (remaining, token) = entity_ref("#123").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::EntityRef(123));
    }

    #[test]
    fn test_parse_string_with_escaped_quote() {
        let (remaining, token) = step_string("'it''s a test',").unwrap();
        assert_eq!(remaining, ",");
        assert_eq!(token, Token::String("it''s a test"));
        assert_eq!(token.to_attribute_value(), AttributeValue::text("it's a test"));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(step_string("'never closed").is_err());
    }

    #[test]
    fn test_decode_unicode_escapes() {
        assert_eq!(decode_step_string("K\\X2\\00FC\\X0\\che"), "Küche");
        assert_eq!(decode_step_string("\\X2\\00C400D6\\X0\\"), "ÄÖ");
        assert_eq!(decode_step_string("Stra\\X\\DFe"), "Straße");
        assert_eq!(decode_step_string("a\\\\b"), "a\\b");
        assert_eq!(decode_step_string("\\S\\D"), "Ä");
        assert_eq!(decode_step_string("plain"), "plain");
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(number("42").unwrap().1, Token::Integer(42));
        assert_eq!(number("-7").unwrap().1, Token::Integer(-7));

        match number("1.E-05").unwrap() {
            ("", Token::Float(f)) => assert!((f - 1e-5).abs() < 1e-15),
            other => panic!("unexpected {other:?}"),
        }
        match number("3.").unwrap() {
            ("", Token::Float(f)) => assert_eq!(f, 3.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_enum() {
        let (remaining, token) = enumeration(".NOTDEFINED.").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(token, Token::Enum("NOTDEFINED"));
    }

    #[test]
    fn test_parse_nested_list() {
        let (remaining, token) = list("((0.,1.),(2.,3.))").unwrap();
        assert_eq!(remaining, "");
        match token {
            Token::List(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(&items[1], Token::List(inner) if inner.len() == 2));
            }
            other => panic!("Expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_entity_with_typed_value() {
        let entity =
            parse_entity("#12=IFCPROPERTYSINGLEVALUE('flow',$,IFCREAL(12.5),$);").unwrap();
        assert_eq!(entity.id, EntityId(12));
        assert_eq!(entity.ifc_type, IfcType::IfcPropertySingleValue);
        assert_eq!(
            entity.get(2),
            Some(&AttributeValue::TypedValue(
                "IFCREAL".into(),
                vec![AttributeValue::Float(12.5)]
            ))
        );
    }

    #[test]
    fn test_parse_entity_rejects_garbage() {
        assert!(parse_entity("IFCWALL('x');").is_err());
        assert!(parse_entity("#1=IFCWALL('x'").is_err());
    }
}
