// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast entity scanner using SIMD-accelerated byte searching
//!
//! Scans the DATA section to discover entity records without decoding their
//! attributes, and reads the HEADER section into [`ModelMetadata`].

use crate::tokenizer::parse_arguments;
use ifc_bim_model::{AttributeValue, ModelMetadata};
use memchr::{memchr, memmem};
use rustc_hash::FxHashMap;

/// Entity index mapping ID to byte offsets
pub type EntityIndex = FxHashMap<u64, (usize, usize)>;

/// Byte offset just past the `DATA;` keyword, if the file has a DATA section
pub fn data_section_start(content: &str) -> Option<usize> {
    memmem::find(content.as_bytes(), b"DATA;").map(|p| p + 5)
}

/// Fast entity scanner for STEP files
///
/// Uses memchr to find `#` quickly and only inspects the bytes around it.
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned at the start of the DATA section
    pub fn new(content: &'a str) -> Self {
        let pos = data_section_start(content).unwrap_or(content.len());
        Self { content, pos }
    }

    /// Scan to find the next entity
    ///
    /// Returns (id, type_name, start_byte, end_byte)
    pub fn next_entity(&mut self) -> Option<(u64, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let hash_pos = memchr(b'#', &bytes[self.pos..])?;
            self.pos += hash_pos;

            // A record starts a line or follows the previous record's `;`.
            // References inside attribute lists fail this test.
            if !self.at_record_start() {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            self.pos += 1;
            let id_start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == id_start {
                continue;
            }
            let Ok(id) = self.content[id_start..self.pos].parse::<u64>() else {
                continue;
            };

            self.skip_blanks();
            if self.pos >= bytes.len() || bytes[self.pos] != b'=' {
                continue;
            }
            self.pos += 1;
            self.skip_blanks();

            let type_start = self.pos;
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == type_start {
                continue;
            }
            let type_name = &self.content[type_start..self.pos];

            let end = self.find_entity_end()?;
            return Some((id, type_name, start, end));
        }

        None
    }

    fn at_record_start(&self) -> bool {
        let bytes = self.content.as_bytes();
        let mut i = self.pos;
        while i > 0 {
            match bytes[i - 1] {
                b' ' | b'\t' => i -= 1,
                b'\n' | b'\r' | b';' => return true,
                _ => return false,
            }
        }
        true
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && (bytes[self.pos] == b' ' || bytes[self.pos] == b'\t') {
            self.pos += 1;
        }
    }

    /// Find the end of an entity (semicolon), handling quoted strings
    fn find_entity_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' => {
                    if in_string && bytes.get(self.pos + 1) == Some(&b'\'') {
                        self.pos += 2;
                        continue;
                    }
                    in_string = !in_string;
                }
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }

    /// Build an index of all entities (ID -> byte offsets)
    ///
    /// A repeated id keeps its first record.
    pub fn build_index(content: &'a str) -> EntityIndex {
        let mut scanner = Self::new(content);
        let mut index = FxHashMap::default();

        while let Some((id, _, start, end)) = scanner.next_entity() {
            index.entry(id).or_insert((start, end));
        }

        index
    }

    /// Count entities by upper-cased type name
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut scanner = Self::new(content);
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();

        while let Some((_, type_name, _, _)) = scanner.next_entity() {
            *counts.entry(type_name.to_ascii_uppercase()).or_insert(0) += 1;
        }

        counts
    }
}

/// Read the HEADER section into file metadata
///
/// Missing or malformed header records leave their fields empty.
pub fn parse_header(content: &str) -> ModelMetadata {
    let mut metadata = ModelMetadata::default();

    let header_start = content.find("HEADER;").unwrap_or(0);
    let header_end = content[header_start..]
        .find("ENDSEC;")
        .map(|p| header_start + p)
        .unwrap_or(content.len());
    let header = &content[header_start..header_end];

    if let Some(args) = header_record(header, "FILE_DESCRIPTION") {
        metadata.file_description = args.first().and_then(first_text);
    }

    if let Some(args) = header_record(header, "FILE_NAME") {
        let text_at = |i: usize| args.get(i).and_then(first_text);
        metadata.file_name = text_at(0);
        metadata.timestamp = text_at(1);
        metadata.author = text_at(2);
        metadata.organization = text_at(3);
        metadata.preprocessor_version = text_at(4);
        metadata.originating_system = text_at(5);
    }

    if let Some(args) = header_record(header, "FILE_SCHEMA") {
        if let Some(schema) = args.first().and_then(first_text) {
            metadata.schema_version = schema;
        }
    }

    metadata
}

/// Arguments of the header record `keyword(...)`
fn header_record(header: &str, keyword: &str) -> Option<Vec<AttributeValue>> {
    let at = header.find(keyword)?;
    let body = &header[at + keyword.len()..];
    parse_arguments(body).ok()
}

/// A string, or the first non-empty string of a list
fn first_text(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::String(s) if !s.is_empty() => Some(s.clone()),
        AttributeValue::List(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPROJECT('guid',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
  #4 = IFCWALL('it''s;here',$,'Wall 1',$,$,#5,#6,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_scanner_finds_entities() {
        let mut scanner = EntityScanner::new(TEST_IFC);
        let mut entities = Vec::new();

        while let Some((id, type_name, _, _)) = scanner.next_entity() {
            entities.push((id, type_name.to_string()));
        }

        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0], (1, "IFCPROJECT".to_string()));
        assert_eq!(entities[3], (4, "IFCWALL".to_string()));
    }

    #[test]
    fn test_semicolon_inside_string_does_not_end_record() {
        let index = EntityScanner::build_index(TEST_IFC);
        let (start, end) = index[&4];
        assert!(TEST_IFC[start..end].ends_with("#6,$);"));
    }

    #[test]
    fn test_count_by_type() {
        let counts = EntityScanner::count_by_type(TEST_IFC);
        assert_eq!(counts.get("IFCPROJECT"), Some(&1));
        assert_eq!(counts.get("IFCWALL"), Some(&1));
    }

    #[test]
    fn test_no_data_section_yields_nothing() {
        assert!(EntityScanner::build_index("ISO-10303-21;\n#1=IFCWALL();").is_empty());
    }

    #[test]
    fn test_parse_header() {
        let info = parse_header(TEST_IFC);
        assert_eq!(info.schema_version, "IFC2X3");
        assert_eq!(info.file_name.as_deref(), Some("test.ifc"));
        assert_eq!(info.timestamp.as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(info.author.as_deref(), Some("Author"));
        assert_eq!(info.organization.as_deref(), Some("Org"));
        assert_eq!(info.originating_system.as_deref(), Some("App"));
        assert_eq!(
            info.file_description.as_deref(),
            Some("ViewDefinition [CoordinationView]")
        );
    }
}
