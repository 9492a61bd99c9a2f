// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encoder configuration

use chrono::{DateTime, Utc};
use ifc_bim_model::DEFAULT_STOREY_HEIGHT;
use serde::{Deserialize, Serialize};

/// Header and ownership details written into every file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub application_name: String,
    pub application_version: String,
    pub author: String,
    pub organization: String,
    pub file_name: String,
    pub default_storey_height: f64,
    /// Fixed creation time, seconds since the epoch; the current time if unset
    pub timestamp: Option<i64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            application_name: "ifc-bim".to_string(),
            application_version: env!("CARGO_PKG_VERSION").to_string(),
            author: String::new(),
            organization: String::new(),
            file_name: "model.ifc".to_string(),
            default_storey_height: DEFAULT_STOREY_HEIGHT,
            timestamp: None,
        }
    }
}

impl ExportOptions {
    /// Load options from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Creation time in seconds since the epoch
    pub fn creation_time(&self) -> i64 {
        self.timestamp.unwrap_or_else(|| Utc::now().timestamp())
    }

    /// ISO-8601 creation time for `FILE_NAME`
    pub fn header_timestamp(&self) -> String {
        DateTime::<Utc>::from_timestamp(self.creation_time(), 0)
            .unwrap_or_default()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }
}
