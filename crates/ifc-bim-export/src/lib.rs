// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-BIM Export
//!
//! Encodes a building model into an IFC2X3 STEP file.
//!
//! The [`Encoder`] session writes entities into an append-only
//! [`EntityGraph`]: ownership and units first, then the spatial hierarchy,
//! then every element with its geometry, property sets and relationships.
//! References are checked as they are written, so a finished graph never
//! points at a missing entity.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_bim_export::{Encoder, ExportOptions};
//!
//! let mut encoder = Encoder::new(ExportOptions::default());
//! let bytes = encoder.encode(&project, &site, &building, &storeys, &elements)?;
//! std::fs::write("model.ifc", bytes)?;
//! ```

mod elements;
pub mod error;
mod geometry;
mod hierarchy;
pub mod options;
pub mod properties;
pub mod session;
pub mod step;
pub mod store;

pub use elements::{counter_sections, offset_polyline, stair_profile, CounterSection};
pub use error::{ExportError, Result};
pub use options::ExportOptions;
pub use properties::nominal_value;
pub use session::{encode, Encoder};
pub use step::{format_real, quote, write_step, SCHEMA};
pub use store::EntityGraph;
