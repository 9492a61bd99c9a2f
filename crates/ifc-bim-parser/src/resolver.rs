// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EntityResolver trait implementation

use crate::scanner::{EntityIndex, EntityScanner};
use crate::tokenizer::parse_entity_at;
use ifc_bim_model::{DecodedEntity, EntityId, EntityResolver, IfcType};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe, lazily decoding entity resolver
///
/// Records are located once by the scanner and decoded on first access.
pub struct ResolverImpl {
    /// Raw STEP content (owned for thread safety)
    content: String,
    /// Entity ID -> (start, end) byte offsets
    index: EntityIndex,
    /// Decoded entity cache
    cache: RwLock<FxHashMap<u64, Arc<DecodedEntity>>>,
    /// Type -> entity IDs, each list ascending
    type_index: FxHashMap<IfcType, Vec<EntityId>>,
}

impl ResolverImpl {
    /// Scan `content` and index every entity record by id and type
    pub fn new(content: String) -> Self {
        let mut index = EntityIndex::default();
        let mut type_index: FxHashMap<IfcType, Vec<EntityId>> = FxHashMap::default();

        let mut scanner = EntityScanner::new(&content);
        while let Some((id, type_name, start, end)) = scanner.next_entity() {
            if index.contains_key(&id) {
                log::warn!("Duplicate entity #{id}; keeping the first record");
                continue;
            }
            index.insert(id, (start, end));
            type_index
                .entry(IfcType::parse(type_name))
                .or_default()
                .push(EntityId(id));
        }

        for ids in type_index.values_mut() {
            ids.sort_unstable();
        }

        Self {
            content,
            index,
            cache: RwLock::new(FxHashMap::default()),
            type_index,
        }
    }

    /// Number of distinct entity types present
    pub fn type_count(&self) -> usize {
        self.type_index.len()
    }

    /// Decode and cache an entity
    fn decode_and_cache(&self, id: u64) -> Option<Arc<DecodedEntity>> {
        {
            let cache = self.cache.read().ok()?;
            if let Some(cached) = cache.get(&id) {
                return Some(Arc::clone(cached));
            }
        }

        let (start, end) = self.index.get(&id)?;
        let entity = match parse_entity_at(&self.content, *start, *end) {
            Ok(entity) => entity,
            Err(e) => {
                log::debug!("Skipping undecodable record #{id}: {e}");
                return None;
            }
        };
        let arc = Arc::new(entity);

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id, Arc::clone(&arc));
        }

        Some(arc)
    }
}

impl EntityResolver for ResolverImpl {
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        self.decode_and_cache(id.0)
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        self.type_index
            .get(ifc_type)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.type_index.get(ifc_type).map(Vec::len).unwrap_or(0)
    }

    fn entity_count(&self) -> usize {
        self.index.len()
    }
}
