// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoder configuration

use ifc_bim_model::{CoordinateSystem, ElementType};
use serde::{Deserialize, Serialize};

/// Which elements to decode and how meshes are oriented
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportOptions {
    pub import_walls: bool,
    pub import_doors: bool,
    pub import_windows: bool,
    pub import_columns: bool,
    pub import_slabs: bool,
    /// Also covers counters and building element proxies
    pub import_furniture: bool,
    pub import_spaces: bool,
    pub import_stairs: bool,
    pub import_property_sets: bool,
    /// Convention of the meshes the geometry kernel hands back
    pub coordinate_system: CoordinateSystem,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            import_walls: true,
            import_doors: true,
            import_windows: true,
            import_columns: true,
            import_slabs: true,
            import_furniture: true,
            import_spaces: true,
            import_stairs: true,
            import_property_sets: true,
            coordinate_system: CoordinateSystem::ZUp,
        }
    }
}

impl ImportOptions {
    /// Load options from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Whether elements of `element_type` are decoded
    pub fn imports(&self, element_type: ElementType) -> bool {
        match element_type {
            ElementType::Wall => self.import_walls,
            ElementType::Door => self.import_doors,
            ElementType::Window => self.import_windows,
            ElementType::Slab => self.import_slabs,
            ElementType::Column => self.import_columns,
            ElementType::Counter | ElementType::Furniture => self.import_furniture,
            ElementType::Space => self.import_spaces,
            ElementType::Stair => self.import_stairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_on_by_default() {
        let options = ImportOptions::default();
        assert!(ElementType::ALL.iter().all(|t| options.imports(*t)));
        assert!(options.import_property_sets);
        assert_eq!(options.coordinate_system, CoordinateSystem::ZUp);
    }

    #[test]
    fn test_from_json() {
        let options = ImportOptions::from_json(
            r#"{"importWindows": false, "coordinateSystem": "y-up"}"#,
        )
        .unwrap();
        assert!(!options.imports(ElementType::Window));
        assert!(options.imports(ElementType::Door));
        assert_eq!(options.coordinate_system, CoordinateSystem::YUp);
    }
}
