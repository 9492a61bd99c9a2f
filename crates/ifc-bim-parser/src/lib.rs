// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP reader for IFC entity graphs
//!
//! Implements the traits defined in `ifc-bim-model`.
//!
//! # Features
//!
//! - **Fast tokenization** using `nom` combinators
//! - **SIMD-accelerated scanning** using `memchr`
//! - **Lazy entity decoding** - only parse entities when needed
//! - **Relationship indexes** for containment, aggregation, fills and voids
//!
//! # Example
//!
//! ```ignore
//! use ifc_bim_model::{IfcType, IfcParser};
//! use ifc_bim_parser::StepParser;
//!
//! let model = StepParser::new().parse(ifc_content)?;
//! let walls = model.resolver().entities_by_type(&IfcType::IfcWall);
//! println!("Found {} walls", walls.len());
//! ```

mod model;
mod properties;
mod relations;
mod resolver;
mod scanner;
mod tokenizer;
mod units;

pub use model::ParsedModel;
pub use relations::RelationIndex;
pub use resolver::ResolverImpl;
pub use scanner::{parse_header, EntityScanner};
pub use tokenizer::{decode_step_string, parse_entity, Token};

use ifc_bim_model::{IfcModel, IfcParser, Result};
use std::sync::Arc;

/// Main STEP/IFC parser implementing `IfcParser` trait
#[derive(Default)]
pub struct StepParser;

impl StepParser {
    pub fn new() -> Self {
        Self
    }
}

impl IfcParser for StepParser {
    fn parse(&self, content: &str) -> Result<Arc<dyn IfcModel>> {
        ParsedModel::parse(content).map(|m| Arc::new(m) as Arc<dyn IfcModel>)
    }
}

/// Quick parse function for simple use cases
pub fn parse(content: &str) -> Result<Arc<dyn IfcModel>> {
    StepParser::new().parse(content)
}
