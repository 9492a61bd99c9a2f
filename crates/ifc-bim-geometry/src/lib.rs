// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-BIM Geometry
//!
//! Geometry support for the building-model decoder. Everything here reads an
//! opened entity graph through the `EntityResolver` trait from
//! `ifc-bim-model`, so it does not depend on a particular parser.
//!
//! ## Overview
//!
//! - **Placement**: `IfcLocalPlacement` chains, as a plan view or a 4x4 matrix
//! - **Extraction**: swept-solid parameters (profile, depth, position)
//! - **Meshing**: extruded solids, faceted breps and triangulated face sets
//! - **Bounds**: world boxes of placed meshes for the bounding-box fallback
//!
//! [`GeometryRouter`] implements the model's `GeometryKernel` collaborator.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_bim_geometry::{mesh_bounds, GeometryRouter};
//! use ifc_bim_model::{CoordinateSystem, GeometryKernel};
//!
//! let router = GeometryRouter::with_unit_scale(model.unit_scale());
//! let meshes = router.element_meshes(model.resolver(), wall_id);
//! let bounds = mesh_bounds(&meshes, router.output_convention());
//! ```

pub mod bbox;
pub mod error;
pub mod extraction;
pub mod extrusion;
pub mod mesh;
pub mod placement;
pub mod processors;
pub mod profile;
pub mod router;
pub mod triangulation;

pub use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

pub use bbox::mesh_bounds;
pub use error::{Error, Result};
pub use extraction::{
    body_items, extract_swept_solid, read_polyline, read_profile, ProfileShape, SweptSolid,
};
pub use extrusion::{direction_shear, extrude_profile};
pub use mesh::Mesh;
pub use placement::{placement_matrix, resolve_placement, WorldPlacement};
pub use profile::{calculate_circle_segments, Profile2D, Triangulation};
pub use router::{GeometryProcessor, GeometryRouter};
pub use triangulation::{polygon_normal, triangulate_polygon, PlaneBasis};

pub use processors::{
    ExtrudedAreaSolidProcessor, FacetedBrepProcessor, TriangulatedFaceSetProcessor,
};
