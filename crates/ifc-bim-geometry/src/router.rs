// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Router - Dynamic dispatch to geometry processors
//!
//! Routes representation items to the processor registered for their type,
//! then places the resulting meshes with the element's placement chain.

use crate::extraction::body_items;
use crate::placement::placement_matrix;
use crate::{Error, Mesh, Result};
use ifc_bim_model::{
    CoordinateSystem, DecodedEntity, EntityId, EntityResolver, GeometryKernel, IfcType, PlacedMesh,
};
use nalgebra::Matrix4;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Geometry processor trait
///
/// Each processor handles one or more representation item types and
/// produces a mesh in the item's coordinate frame, in file units.
pub trait GeometryProcessor: Send + Sync {
    /// Process entity into mesh
    fn process(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Mesh>;

    /// Get supported IFC types
    fn supported_types(&self) -> Vec<IfcType>;
}

/// Geometry router - routes entities to processors
pub struct GeometryRouter {
    /// Registered processors by type
    processors: FxHashMap<IfcType, Arc<dyn GeometryProcessor>>,
    /// Unit scale factor (e.g., 0.001 for millimeters -> meters)
    unit_scale: f64,
    /// Up-axis of produced meshes
    output: CoordinateSystem,
}

impl GeometryRouter {
    /// Create new router without any processors registered
    pub fn new() -> Self {
        Self {
            processors: FxHashMap::default(),
            unit_scale: 1.0,
            output: CoordinateSystem::ZUp,
        }
    }

    /// Create router with default processors registered
    ///
    /// - `ExtrudedAreaSolidProcessor` (IfcExtrudedAreaSolid)
    /// - `TriangulatedFaceSetProcessor` (IfcTriangulatedFaceSet)
    /// - `FacetedBrepProcessor` (IfcFacetedBrep)
    pub fn with_default_processors() -> Self {
        use crate::processors::{
            ExtrudedAreaSolidProcessor, FacetedBrepProcessor, TriangulatedFaceSetProcessor,
        };

        let mut router = Self::new();
        router.register(Arc::new(ExtrudedAreaSolidProcessor::new()));
        router.register(Arc::new(TriangulatedFaceSetProcessor::new()));
        router.register(Arc::new(FacetedBrepProcessor::new()));
        router
    }

    /// Create router with default processors and specific unit scale
    pub fn with_unit_scale(unit_scale: f64) -> Self {
        let mut router = Self::with_default_processors();
        router.unit_scale = unit_scale;
        router
    }

    /// Produce meshes in the given up-axis convention
    pub fn with_output(mut self, output: CoordinateSystem) -> Self {
        self.output = output;
        self
    }

    /// Get the current unit scale factor
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Register a geometry processor
    pub fn register(&mut self, processor: Arc<dyn GeometryProcessor>) {
        for ifc_type in processor.supported_types() {
            self.processors.insert(ifc_type, Arc::clone(&processor));
        }
    }

    /// Check if a type has a registered processor
    pub fn has_processor(&self, ifc_type: &IfcType) -> bool {
        self.processors.contains_key(ifc_type)
    }

    /// Process a single representation item, in file units
    pub fn process_representation_item(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Mesh> {
        let processor = self
            .processors
            .get(&entity.ifc_type)
            .ok_or_else(|| Error::unsupported_type(entity.ifc_type.name()))?;
        processor.process(entity, resolver)
    }

    /// Body items of `element`, merged, in element-local Z-up metres
    ///
    /// Items that fail to process are skipped.
    pub fn element_local_mesh(
        &self,
        element: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Mesh {
        let mut combined = Mesh::new();
        for mesh in self.item_meshes(element, resolver) {
            combined.merge(&mesh);
        }
        if self.unit_scale != 1.0 {
            combined.transform(&Matrix4::new_scaling(self.unit_scale));
        }
        combined
    }

    /// One placed mesh per body item of `element`
    ///
    /// Vertices stay in element-local file units; each transform is
    /// `axis swap * unit scale * placement chain`, column-major.
    pub fn process_element(
        &self,
        element: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Vec<PlacedMesh>> {
        let items = self.item_meshes(element, resolver);
        if items.is_empty() {
            return Err(Error::no_representation(format!("{} has no processable body", element.id)));
        }

        let placement = element
            .get_ref(5)
            .map(|id| placement_matrix(resolver, id))
            .unwrap_or_else(Matrix4::identity);
        let world = self.output_swap() * Matrix4::new_scaling(self.unit_scale) * placement;

        let mut transform = [0.0; 16];
        transform.copy_from_slice(world.as_slice());

        Ok(items
            .into_iter()
            .map(|mesh| PlacedMesh {
                transform,
                vertices: mesh.positions,
                indices: mesh.indices,
            })
            .collect())
    }

    fn item_meshes(&self, element: &DecodedEntity, resolver: &dyn EntityResolver) -> Vec<Mesh> {
        body_items(resolver, element)
            .iter()
            .filter_map(|item| match self.process_representation_item(item, resolver) {
                Ok(mesh) if !mesh.is_empty() => Some(mesh),
                Ok(_) => None,
                Err(e) => {
                    log::debug!("Skipping item {} of {}: {e}", item.id, element.id);
                    None
                }
            })
            .collect()
    }

    fn output_swap(&self) -> Matrix4<f64> {
        match self.output {
            CoordinateSystem::ZUp => Matrix4::identity(),
            CoordinateSystem::YUp => {
                let mut swap = Matrix4::zeros();
                swap[(0, 0)] = 1.0;
                swap[(1, 2)] = 1.0;
                swap[(2, 1)] = 1.0;
                swap[(3, 3)] = 1.0;
                swap
            }
        }
    }
}

impl Default for GeometryRouter {
    fn default() -> Self {
        Self::with_default_processors()
    }
}

impl GeometryKernel for GeometryRouter {
    fn output_convention(&self) -> CoordinateSystem {
        self.output
    }

    fn element_meshes(&self, resolver: &dyn EntityResolver, element: EntityId) -> Vec<PlacedMesh> {
        let Some(entity) = resolver.get(element) else {
            return Vec::new();
        };
        self.process_element(&entity, resolver).unwrap_or_else(|e| {
            log::debug!("No mesh for {element}: {e}");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_processors_registered() {
        let router = GeometryRouter::with_default_processors();
        assert!(router.has_processor(&IfcType::IfcExtrudedAreaSolid));
        assert!(router.has_processor(&IfcType::IfcFacetedBrep));
        assert!(router.has_processor(&IfcType::IfcTriangulatedFaceSet));
        assert!(!router.has_processor(&IfcType::IfcPolyline));
    }

    #[test]
    fn test_output_swap_exchanges_y_and_z() {
        let router = GeometryRouter::new().with_output(CoordinateSystem::YUp);
        let p = router.output_swap().transform_point(&nalgebra::Point3::new(1.0, 2.0, 3.0));
        assert_eq!((p.x, p.y, p.z), (1.0, 3.0, 2.0));
        assert_eq!(router.output_convention(), CoordinateSystem::YUp);
    }
}
