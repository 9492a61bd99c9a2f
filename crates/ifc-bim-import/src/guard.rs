// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opened-model handle
//!
//! The parsed graph lives exactly as long as one decode. Dropping the guard
//! releases it on every exit path, early returns included.

use crate::error::Result;
use ifc_bim_model::{EntityResolver, IfcModel, ParseError};
use ifc_bim_parser::ParsedModel;
use std::ops::Deref;

pub struct ModelGuard {
    model: ParsedModel,
}

impl ModelGuard {
    /// Open a model from raw bytes
    ///
    /// Fails on non-UTF-8 input, a missing DATA section or an unsupported
    /// schema.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| ParseError::format(format!("input is not valid UTF-8: {e}")))?;
        let model = ParsedModel::parse(content)?;
        log::debug!("Opened model with {} entities", model.resolver().entity_count());
        Ok(Self { model })
    }
}

impl Deref for ModelGuard {
    type Target = ParsedModel;

    fn deref(&self) -> &ParsedModel {
        &self.model
    }
}

impl Drop for ModelGuard {
    fn drop(&mut self) {
        log::debug!("Released model ({} entities)", self.model.resolver().entity_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImportError;

    #[test]
    fn test_rejects_non_utf8() {
        let result = ModelGuard::open(&[0x49, 0x53, 0xff, 0xfe]);
        assert!(matches!(result, Err(ImportError::Parse(ParseError::InvalidFormat(_)))));
    }

    #[test]
    fn test_rejects_missing_data_section() {
        let result = ModelGuard::open(b"ISO-10303-21;\nHEADER;\nENDSEC;\nEND-ISO-10303-21;\n");
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }
}
