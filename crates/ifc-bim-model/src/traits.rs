// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for opened entity graphs

use crate::{EntityResolver, ModelMetadata, PropertyReader, RelationQuery, Result};
use std::sync::Arc;

/// Entry point for opening STEP content
///
/// # Example
///
/// ```ignore
/// use ifc_bim_model::{IfcParser, IfcModel};
///
/// let model = parser.parse(ifc_content)?;
/// println!("Schema: {}", model.metadata().schema_version);
/// ```
pub trait IfcParser: Send + Sync {
    /// Parse IFC content and return a model
    ///
    /// Fails when the content is not a STEP file or declares a schema the
    /// codec does not read.
    fn parse(&self, content: &str) -> Result<Arc<dyn IfcModel>>;
}

/// Read-only access to an opened entity graph
pub trait IfcModel: Send + Sync {
    /// Entity lookups and reference resolution
    fn resolver(&self) -> &dyn EntityResolver;

    /// Aggregation, containment, fill and void relationships
    fn relations(&self) -> &dyn RelationQuery;

    /// Property sets and quantities
    fn properties(&self) -> &dyn PropertyReader;

    /// Scale factor from file length units to metres
    ///
    /// - 1.0 for metres
    /// - 0.001 for millimetres
    /// - 0.3048 for feet
    fn unit_scale(&self) -> f64;

    /// File metadata (schema version, originating system, etc.)
    fn metadata(&self) -> &ModelMetadata;
}
