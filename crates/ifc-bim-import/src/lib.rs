// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-BIM Import
//!
//! Decodes an IFC2X3 STEP file into a building model.
//!
//! The spatial hierarchy is read first. Walls follow, then the doors and
//! windows they host, then slabs, columns, furniture, spaces and stairs.
//! Parametric values are recovered from swept solids where possible;
//! otherwise elements are sized from their mesh bounds. An element that
//! cannot be decoded is skipped with a warning and never fails the import.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_bim_import::{decode, ImportOptions};
//!
//! let bytes = std::fs::read("model.ifc")?;
//! let result = decode(&bytes, &ImportOptions::default())?;
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

mod elements;
pub mod error;
pub mod guard;
mod hierarchy;
pub mod options;
pub mod relations;
pub mod result;
mod session;

pub use error::{ImportError, Result};
pub use guard::ModelGuard;
pub use options::ImportOptions;
pub use relations::{choose_position, position_on_wall, WallPosition};
pub use result::{ImportResult, ImportStats};

/// Decode STEP bytes into a building model
///
/// Fails only when the file cannot be opened at all.
pub fn decode(bytes: &[u8], options: &ImportOptions) -> Result<ImportResult> {
    let model = ModelGuard::open(bytes)?;
    Ok(session::decode_model(&model, options))
}
