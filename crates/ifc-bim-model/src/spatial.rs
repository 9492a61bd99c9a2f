// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial hierarchy: project, site, building, storeys

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Height given to the top storey, which has no storey above it
pub const DEFAULT_STOREY_HEIGHT: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
        }
    }
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self::new("Project")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub id: Uuid,
    pub name: String,
}

impl SiteInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self::new("Site")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub id: Uuid,
    pub name: String,
}

impl BuildingInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Default for BuildingInfo {
    fn default() -> Self {
        Self::new("Building")
    }
}

/// One building level
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreyInfo {
    pub id: Uuid,
    pub name: String,
    /// Floor level above the building origin, metres
    pub elevation: f64,
    /// Gap to the next storey up
    pub height: f64,
}

impl StoreyInfo {
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            elevation,
            height: DEFAULT_STOREY_HEIGHT,
        }
    }
}

/// Sort storeys by ascending elevation and derive their heights
///
/// Each storey's height becomes the gap to the next one; the top storey gets
/// `top_height`.
pub fn order_storeys(storeys: &mut [StoreyInfo], top_height: f64) {
    storeys.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));

    let elevations: Vec<f64> = storeys.iter().map(|s| s.elevation).collect();
    for (i, storey) in storeys.iter_mut().enumerate() {
        storey.height = match elevations.get(i + 1) {
            Some(next) => next - storey.elevation,
            None => top_height,
        };
    }
}
