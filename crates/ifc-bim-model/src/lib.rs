// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-BIM Model - Shared types for the building-model codec
//!
//! This crate holds everything the encoder and the decoder agree on: the
//! STEP-level view of a file (entity ids, types, attribute values and the
//! [`EntityResolver`] read surface) and the building-level view (the
//! [`BimElement`] sum type, property sets and the spatial hierarchy).
//!
//! # Architecture
//!
//! - [`EntityResolver`] - Entity lookup and reference resolution
//! - [`RelationQuery`] - Containment, aggregation, fill and void lookups
//! - [`PropertyReader`] - Property sets and quantities attached to an entity
//! - [`IfcModel`] - An opened entity graph bundling the above
//! - [`GeometryKernel`] - Collaborator that turns an element into placed meshes
//!
//! # Example
//!
//! ```ignore
//! use ifc_bim_model::{IfcModel, IfcType};
//!
//! let model = parser.parse(content)?;
//! for wall in model.resolver().entities_by_type(&IfcType::IfcWallStandardCase) {
//!     let storey = model.relations().containing_structure(wall.id);
//!     println!("{} in {:?}", wall.id, storey);
//! }
//! ```

pub mod element;
pub mod error;
pub mod geometry;
pub mod guid;
pub mod properties;
pub mod relations;
pub mod resolver;
pub mod spatial;
pub mod traits;
pub mod types;

// Re-export all public types
pub use element::*;
pub use error::*;
pub use geometry::*;
pub use guid::*;
pub use properties::*;
pub use relations::*;
pub use resolver::*;
pub use spatial::*;
pub use traits::*;
pub use types::*;
