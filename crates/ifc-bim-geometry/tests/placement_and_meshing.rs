// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement chains, swept-solid extraction and meshing against parsed STEP

use approx::assert_relative_eq;
use ifc_bim_geometry::{
    extract_swept_solid, mesh_bounds, placement_matrix, resolve_placement, GeometryRouter,
    ProfileShape, WorldPlacement,
};
use ifc_bim_model::{CoordinateSystem, EntityId, EntityResolver, GeometryKernel};
use ifc_bim_parser::ResolverImpl;
use nalgebra::{Isometry3, Vector3};
use std::f64::consts::FRAC_PI_2;

const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCCARTESIANPOINT((1.,0.,0.));
#2=IFCDIRECTION((0.,0.,1.));
#3=IFCDIRECTION((0.8660254037844387,0.5,0.));
#4=IFCAXIS2PLACEMENT3D(#1,#2,#3);
#5=IFCLOCALPLACEMENT($,#4);
#6=IFCCARTESIANPOINT((0.,1.,0.));
#7=IFCDIRECTION((0.8660254037844387,-0.5,0.));
#8=IFCAXIS2PLACEMENT3D(#6,#2,#7);
#9=IFCLOCALPLACEMENT(#5,#8);
#10=IFCCARTESIANPOINT((0.,0.,2.));
#11=IFCDIRECTION((0.,1.,0.));
#12=IFCAXIS2PLACEMENT3D(#10,#2,#11);
#13=IFCLOCALPLACEMENT(#9,#12);
#20=IFCLOCALPLACEMENT(#20,#4);
#21=IFCLOCALPLACEMENT(#22,#4);
#22=IFCLOCALPLACEMENT(#21,#8);
#30=IFCCARTESIANPOINT((2.,0.));
#31=IFCAXIS2PLACEMENT2D(#30,$);
#32=IFCRECTANGLEPROFILEDEF(.AREA.,$,#31,4.,0.2);
#33=IFCCARTESIANPOINT((0.,0.,0.));
#34=IFCAXIS2PLACEMENT3D(#33,$,$);
#35=IFCEXTRUDEDAREASOLID(#32,#34,#2,3.);
#36=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#35));
#37=IFCPRODUCTDEFINITIONSHAPE($,$,(#36));
#39=IFCCARTESIANPOINT((10.,0.,0.));
#40=IFCAXIS2PLACEMENT3D(#39,$,$);
#41=IFCLOCALPLACEMENT($,#40);
#42=IFCWALLSTANDARDCASE('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall',$,$,#41,#37,$);
#50=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(0.,1.,0.)));
#51=IFCTRIANGULATEDFACESET(#50,$,.T.,((1,2,3),(1,2,9),(0,1,2)),$);
#52=IFCSHAPEREPRESENTATION($,'Body','Tessellation',(#51));
#53=IFCPRODUCTDEFINITIONSHAPE($,$,(#52));
#54=IFCFURNISHINGELEMENT('1kTvXnbbzCWw8lcMd1dR4o',$,'Chair',$,$,#41,#53,$);
#60=IFCCARTESIANPOINT((0.,0.));
#61=IFCCARTESIANPOINT((3.,0.));
#62=IFCCARTESIANPOINT((3.,2.));
#63=IFCPOLYLINE((#60,#61,#62,#60));
#64=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#63);
#65=IFCEXTRUDEDAREASOLID(#64,#34,#2,0.5);
#66=IFCSHAPEREPRESENTATION($,'Axis','Curve2D',(#63));
#67=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#65));
#68=IFCPRODUCTDEFINITIONSHAPE($,$,(#66,#67));
#69=IFCSLAB('3HJpmZVQ5DZRRXr2ls1qfa',$,'Slab',$,$,#41,#68,$,.FLOOR.);
ENDSEC;
END-ISO-10303-21;
"#;

fn resolver() -> ResolverImpl {
    ResolverImpl::new(TEST_IFC.to_string())
}

fn isometry(x: f64, y: f64, z: f64, degrees: f64) -> Isometry3<f64> {
    Isometry3::new(Vector3::new(x, y, z), Vector3::z() * degrees.to_radians())
}

#[test]
fn test_three_level_chain_matches_closed_form() {
    let resolver = resolver();
    let world = resolve_placement(&resolver, EntityId(13));

    let expected = isometry(1.0, 0.0, 0.0, 30.0)
        * isometry(0.0, 1.0, 0.0, -30.0)
        * isometry(0.0, 0.0, 2.0, 90.0);
    let t = expected.translation.vector;

    assert_relative_eq!(world.rotation_z, FRAC_PI_2, epsilon = 1e-9);
    assert_relative_eq!(world.position.x, t.x, epsilon = 1e-9);
    assert_relative_eq!(world.position.y, t.y, epsilon = 1e-9);
    assert_relative_eq!(world.position.z, t.z, epsilon = 1e-9);

    let matrix = placement_matrix(&resolver, EntityId(13));
    assert_relative_eq!(matrix, expected.to_homogeneous(), epsilon = 1e-9);
}

#[test]
fn test_cyclic_chains_resolve_to_identity() {
    let resolver = resolver();
    assert_eq!(resolve_placement(&resolver, EntityId(20)), WorldPlacement::IDENTITY);
    assert_eq!(resolve_placement(&resolver, EntityId(21)), WorldPlacement::IDENTITY);
    assert_eq!(placement_matrix(&resolver, EntityId(22)), nalgebra::Matrix4::identity());
}

#[test]
fn test_missing_placement_is_identity() {
    assert_eq!(resolve_placement(&resolver(), EntityId(999)), WorldPlacement::IDENTITY);
}

#[test]
fn test_extract_rectangle_swept_solid() {
    let resolver = resolver();
    let wall = resolver.get(EntityId(42)).unwrap();
    let solid = extract_swept_solid(&resolver, &wall).unwrap();

    assert_relative_eq!(solid.depth, 3.0);
    assert_relative_eq!(solid.base_z(), 0.0);
    match solid.profile {
        ProfileShape::Rectangle { x_dim, y_dim, .. } => {
            assert_relative_eq!(x_dim, 4.0);
            assert_relative_eq!(y_dim, 0.2);
        }
        other => panic!("unexpected profile {other:?}"),
    }
    assert_relative_eq!(solid.profile.center().x, 2.0);
}

#[test]
fn test_extract_skips_non_body_representations() {
    let resolver = resolver();
    let slab = resolver.get(EntityId(69)).unwrap();
    let solid = extract_swept_solid(&resolver, &slab).unwrap();
    match solid.profile {
        ProfileShape::Polygon(points) => assert_eq!(points.len(), 3),
        other => panic!("unexpected profile {other:?}"),
    }

    let chair = resolver.get(EntityId(54)).unwrap();
    assert!(extract_swept_solid(&resolver, &chair).is_err());
}

#[test]
fn test_router_places_and_scales_meshes() {
    let resolver = resolver();
    let router = GeometryRouter::with_unit_scale(0.001);
    let meshes = router.element_meshes(&resolver, EntityId(42));
    assert_eq!(meshes.len(), 1);

    let bounds = mesh_bounds(&meshes, router.output_convention()).unwrap();
    assert_relative_eq!(bounds.min.x, 0.010, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.x, 0.014, epsilon = 1e-9);
    assert_relative_eq!(bounds.min.y, -0.0001, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.z, 0.003, epsilon = 1e-9);
}

#[test]
fn test_y_up_output_round_trips_through_bounds() {
    let resolver = resolver();
    let router = GeometryRouter::with_default_processors().with_output(CoordinateSystem::YUp);
    let meshes = router.element_meshes(&resolver, EntityId(42));

    // Raw transform puts height on Y
    let top = meshes[0].transformed_vertex(0).unwrap();
    assert_relative_eq!(top[1], 0.0, epsilon = 1e-9);

    let bounds = mesh_bounds(&meshes, router.output_convention()).unwrap();
    assert_relative_eq!(bounds.max.z, 3.0, epsilon = 1e-6);
    assert_relative_eq!(bounds.max.y, 0.1, epsilon = 1e-6);
}

#[test]
fn test_triangulated_face_set_drops_invalid_triangles() {
    let resolver = resolver();
    let router = GeometryRouter::with_default_processors();
    let meshes = router.element_meshes(&resolver, EntityId(54));
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].indices, vec![0, 1, 2]);
}

#[test]
fn test_element_without_body_has_no_meshes() {
    let resolver = resolver();
    let router = GeometryRouter::with_default_processors();
    assert!(router.element_meshes(&resolver, EntityId(5)).is_empty());
    assert!(router.element_meshes(&resolver, EntityId(1000)).is_empty());
}
