// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decode output

use ifc_bim_model::{
    BimElement, BuildingInfo, ElementType, ModelMetadata, ProjectInfo, SiteInfo, StoreyInfo,
};
use std::collections::BTreeMap;

/// Imported and skipped counts per element type
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportStats {
    /// Entities in the opened file
    pub entity_count: usize,
    pub imported: BTreeMap<ElementType, usize>,
    pub skipped: BTreeMap<ElementType, usize>,
}

impl ImportStats {
    pub(crate) fn record_imported(&mut self, element_type: ElementType) {
        *self.imported.entry(element_type).or_default() += 1;
    }

    pub(crate) fn record_skipped(&mut self, element_type: ElementType) {
        *self.skipped.entry(element_type).or_default() += 1;
    }

    pub fn imported(&self, element_type: ElementType) -> usize {
        self.imported.get(&element_type).copied().unwrap_or(0)
    }

    pub fn skipped(&self, element_type: ElementType) -> usize {
        self.skipped.get(&element_type).copied().unwrap_or(0)
    }

    pub fn total_imported(&self) -> usize {
        self.imported.values().sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// A decoded building model
#[derive(Clone, Debug)]
pub struct ImportResult {
    pub project: ProjectInfo,
    pub site: SiteInfo,
    pub building: BuildingInfo,
    /// Ascending by elevation
    pub storeys: Vec<StoreyInfo>,
    pub elements: Vec<BimElement>,
    /// One line per element or property that could not be decoded
    pub warnings: Vec<String>,
    pub stats: ImportStats,
    pub metadata: ModelMetadata,
}

impl ImportResult {
    /// Elements of one type, in decode order
    pub fn elements_of(&self, element_type: ElementType) -> impl Iterator<Item = &BimElement> {
        self.elements
            .iter()
            .filter(move |e| e.element_type() == element_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counts() {
        let mut stats = ImportStats::default();
        stats.record_imported(ElementType::Wall);
        stats.record_imported(ElementType::Wall);
        stats.record_skipped(ElementType::Door);

        assert_eq!(stats.imported(ElementType::Wall), 2);
        assert_eq!(stats.imported(ElementType::Door), 0);
        assert_eq!(stats.skipped(ElementType::Door), 1);
        assert_eq!(stats.total_imported(), 2);
        assert_eq!(stats.total_skipped(), 1);
    }
}
