// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ParsedModel - Main IFC model implementation

use crate::properties::PropertyReaderImpl;
use crate::relations::RelationIndex;
use crate::resolver::ResolverImpl;
use crate::scanner::{data_section_start, parse_header};
use crate::units::extract_unit_scale;

use ifc_bim_model::{
    EntityResolver, IfcModel, ModelMetadata, ParseError, PropertyReader, RelationQuery, Result,
};
use std::sync::Arc;

/// Schema prefixes the decoder accepts
const SUPPORTED_SCHEMAS: &[&str] = &["IFC2X3", "IFC4"];

/// Parsed IFC model implementing the `IfcModel` trait
pub struct ParsedModel {
    resolver: Arc<ResolverImpl>,
    relations: RelationIndex,
    properties: PropertyReaderImpl,
    /// Unit scale (file units to meters)
    unit_scale: f64,
    metadata: ModelMetadata,
}

impl ParsedModel {
    /// Parse STEP content and index it
    ///
    /// Fails when there is no DATA section or when the header names a schema
    /// other than IFC2X3 or IFC4. A missing FILE_SCHEMA is accepted.
    pub fn parse(content: &str) -> Result<Self> {
        if data_section_start(content).is_none() {
            return Err(ParseError::format("missing DATA section"));
        }

        let metadata = parse_header(content);
        check_schema(&metadata.schema_version)?;

        let resolver = Arc::new(ResolverImpl::new(content.to_string()));
        log::debug!(
            "Indexed {} entities of {} types (schema {})",
            resolver.entity_count(),
            resolver.type_count(),
            if metadata.schema_version.is_empty() {
                "unspecified"
            } else {
                metadata.schema_version.as_str()
            }
        );

        let unit_scale = extract_unit_scale(resolver.as_ref());
        if unit_scale != 1.0 {
            log::debug!("Length unit scale {unit_scale}");
        }

        let relations = RelationIndex::build(resolver.as_ref());
        let properties = PropertyReaderImpl::new(resolver.clone());

        Ok(Self {
            resolver,
            relations,
            properties,
            unit_scale,
            metadata,
        })
    }

    /// Get the resolver (for geometry processing, etc.)
    pub fn resolver_arc(&self) -> Arc<ResolverImpl> {
        self.resolver.clone()
    }
}

fn check_schema(schema: &str) -> Result<()> {
    let upper = schema.to_ascii_uppercase();
    if upper.is_empty() || SUPPORTED_SCHEMAS.iter().any(|s| upper.starts_with(s)) {
        Ok(())
    } else {
        Err(ParseError::UnsupportedSchema(schema.to_string()))
    }
}

impl IfcModel for ParsedModel {
    fn resolver(&self) -> &dyn EntityResolver {
        self.resolver.as_ref()
    }

    fn relations(&self) -> &dyn RelationQuery {
        &self.relations
    }

    fn properties(&self) -> &dyn PropertyReader {
        &self.properties
    }

    fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
