// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encode with ifc-bim-export, decode again, compare

use approx::assert_relative_eq;
use ifc_bim_export::{Encoder, ExportOptions};
use ifc_bim_import::{decode, ImportOptions, ImportResult};
use ifc_bim_model::{
    BimElement, BuildingInfo, ColumnData, ColumnProfile, CounterData, ElementData, ElementType,
    OpeningFillData, OpeningKind, Placement, Point2, Point3, ProjectInfo, PropertySet,
    PropertyValue, Quaternion, SiteInfo, SlabData, SlabType, SpaceData, SpaceType, StairData,
    StoreyInfo, WallData,
};
use serde_json::json;
use uuid::Uuid;

const EPS: f64 = 1e-4;

struct Fixture {
    storeys: Vec<StoreyInfo>,
    elements: Vec<BimElement>,
}

fn fill(wall: Uuid, t: f64, width: f64, height: f64, sill: f64) -> OpeningFillData {
    OpeningFillData {
        host_wall_id: Some(wall),
        position_on_wall: t,
        width,
        height,
        sill_height: sill,
    }
}

fn fixture() -> Fixture {
    // Listed upper first; the decoder orders by elevation
    let storeys = vec![StoreyInfo::new("First", 3.0), StoreyInfo::new("Ground", 0.0)];
    let first = storeys[0].id;
    let ground = storeys[1].id;

    let pump = json!({"name": "Pump", "flow": 12.5, "active": true, "": "x", "obj": {"a": 1}});
    let properties =
        PropertySet::from_json("Pset_Pump", pump.as_object().unwrap()).with("bad", f64::NAN);

    let wall = BimElement::new(
        "North wall",
        ElementData::Wall(WallData {
            start: Point2::new(1.0, 2.0),
            end: Point2::new(6.0, 2.0),
            thickness: 0.2,
            height: 2.7,
            openings: vec![],
        }),
    )
    .with_storey(first)
    .with_property_set(properties);

    let door = BimElement::new("Door", ElementData::Door(fill(wall.id, 0.3, 0.9, 2.1, 0.0)))
        .with_storey(first);
    let window = BimElement::new("Window", ElementData::Window(fill(wall.id, 0.7, 1.2, 1.0, 0.9)))
        .with_storey(first);

    let slab = BimElement::new(
        "Ground floor",
        ElementData::Slab(SlabData {
            outline: vec![
                Point2::new(0.0, 0.0),
                Point2::new(6.0, 0.0),
                Point2::new(6.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            thickness: 0.25,
            slab_type: SlabType::Floor,
            elevation_offset: 0.0,
        }),
    )
    .with_storey(ground);

    let counter = BimElement::new(
        "Kitchen",
        ElementData::Counter(CounterData {
            path: vec![Point2::new(0.5, 3.0), Point2::new(3.0, 3.0)],
            depth: 0.6,
            height: 0.9,
            top_thickness: 0.04,
            overhang: 0.02,
            kick_height: 0.1,
            kick_recess: 0.05,
            has_footrest: false,
            footrest_height: 0.0,
        }),
    )
    .with_storey(ground);

    let round_column = BimElement::new(
        "Round column",
        ElementData::Column(ColumnData {
            profile: ColumnProfile::Circular,
            width: 0.4,
            depth: 0.4,
            height: 3.0,
        }),
    )
    .with_storey(ground)
    .with_placement(Placement::new(Point3::new(2.0, 3.0, 0.0), Quaternion::from_yaw(0.0)));

    let square_column = BimElement::new(
        "Square column",
        ElementData::Column(ColumnData {
            profile: ColumnProfile::Rectangular,
            width: 0.3,
            depth: 0.5,
            height: 2.8,
        }),
    )
    .with_storey(ground)
    .with_placement(Placement::new(Point3::new(-1.0, 1.0, 0.0), Quaternion::from_yaw(0.0)));

    let terrace = BimElement::new(
        "Terrace",
        ElementData::Space(SpaceData {
            boundary: vec![
                Point2::new(0.0, 0.0),
                Point2::new(5.0, 0.0),
                Point2::new(5.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            height: 2.5,
            space_type: SpaceType::External,
            long_name: Some("Roof terrace".into()),
            net_floor_area: Some(18.0),
        }),
    )
    .with_storey(first);

    let stair = BimElement::new(
        "Stair",
        ElementData::Stair(StairData {
            width: 1.0,
            total_rise: 2.8,
            riser_count: 16,
            tread_depth: 0.28,
        }),
    )
    .with_storey(ground)
    .with_placement(Placement::new(Point3::new(3.0, 0.5, 0.0), Quaternion::from_yaw(0.0)));

    Fixture {
        storeys,
        elements: vec![
            wall,
            door,
            window,
            slab,
            counter,
            round_column,
            square_column,
            terrace,
            stair,
        ],
    }
}

fn encode(fixture: &Fixture) -> Vec<u8> {
    let options = ExportOptions {
        timestamp: Some(1_700_000_000),
        ..ExportOptions::default()
    };
    Encoder::new(options)
        .encode(
            &ProjectInfo::new("Round trip"),
            &SiteInfo::default(),
            &BuildingInfo::default(),
            &fixture.storeys,
            &fixture.elements,
        )
        .unwrap()
}

fn round_trip(options: &ImportOptions) -> (Fixture, ImportResult) {
    let fixture = fixture();
    let result = decode(&encode(&fixture), options).unwrap();
    (fixture, result)
}

fn find(result: &ImportResult, id: Uuid) -> &BimElement {
    result.elements.iter().find(|e| e.id == id).unwrap()
}

#[test]
fn test_storeys_ordered_by_elevation() {
    let (fixture, result) = round_trip(&ImportOptions::default());

    let names: Vec<&str> = result.storeys.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Ground", "First"]);
    assert_relative_eq!(result.storeys[0].elevation, 0.0, epsilon = EPS);
    assert_relative_eq!(result.storeys[1].elevation, 3.0, epsilon = EPS);
    assert_relative_eq!(result.storeys[0].height, 3.0, epsilon = EPS);
    assert_eq!(result.storeys[1].id, fixture.storeys[0].id);
    assert_eq!(result.project.name, "Round trip");
}

#[test]
fn test_wall_survives() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let wall = find(&result, fixture.elements[0].id);

    assert_eq!(wall.name, "North wall");
    assert_eq!(wall.parent_storey_id, Some(fixture.storeys[0].id));
    let ElementData::Wall(data) = &wall.data else {
        panic!("expected a wall, got {:?}", wall.data);
    };
    assert_relative_eq!(data.start.x, 1.0, epsilon = EPS);
    assert_relative_eq!(data.start.y, 2.0, epsilon = EPS);
    assert_relative_eq!(data.end.x, 6.0, epsilon = EPS);
    assert_relative_eq!(data.end.y, 2.0, epsilon = EPS);
    assert_relative_eq!(data.thickness, 0.2, epsilon = EPS);
    assert_relative_eq!(data.height, 2.7, epsilon = EPS);
    assert_relative_eq!(wall.placement.position.z, 0.0, epsilon = EPS);
}

#[test]
fn test_doors_and_windows_survive_with_wall_openings() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let wall_id = fixture.elements[0].id;

    let door = find(&result, fixture.elements[1].id);
    let ElementData::Door(door) = &door.data else {
        panic!("expected a door");
    };
    assert_eq!(door.host_wall_id, Some(wall_id));
    assert_relative_eq!(door.position_on_wall, 0.3, epsilon = EPS);
    assert_relative_eq!(door.width, 0.9, epsilon = EPS);
    assert_relative_eq!(door.height, 2.1, epsilon = EPS);
    assert_relative_eq!(door.sill_height, 0.0, epsilon = EPS);

    let window = find(&result, fixture.elements[2].id);
    let ElementData::Window(window) = &window.data else {
        panic!("expected a window");
    };
    assert_relative_eq!(window.position_on_wall, 0.7, epsilon = EPS);
    assert_relative_eq!(window.width, 1.2, epsilon = EPS);
    assert_relative_eq!(window.height, 1.0, epsilon = EPS);
    assert_relative_eq!(window.sill_height, 0.9, epsilon = EPS);

    let ElementData::Wall(wall) = &find(&result, wall_id).data else {
        panic!("expected a wall");
    };
    let mut kinds: Vec<(OpeningKind, Uuid)> =
        wall.openings.iter().map(|o| (o.kind, o.element_id)).collect();
    kinds.sort_by_key(|(kind, _)| *kind == OpeningKind::Window);
    assert_eq!(
        kinds,
        [
            (OpeningKind::Door, fixture.elements[1].id),
            (OpeningKind::Window, fixture.elements[2].id)
        ]
    );
}

#[test]
fn test_property_set_survives_sanitized() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let wall = find(&result, fixture.elements[0].id);

    let set = wall.property_sets.iter().find(|s| s.name == "Pset_Pump").unwrap();
    assert_eq!(set.properties.len(), 3);
    assert_eq!(set.get("name"), Some(&PropertyValue::Text("Pump".into())));
    assert_eq!(set.get("flow"), Some(&PropertyValue::Number(12.5)));
    assert_eq!(set.get("active"), Some(&PropertyValue::Bool(true)));
    assert!(set.get("bad").is_none());
}

#[test]
fn test_floor_slab_survives() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let slab = find(&result, fixture.elements[3].id);

    let ElementData::Slab(data) = &slab.data else {
        panic!("expected a slab");
    };
    assert_eq!(data.slab_type, SlabType::Floor);
    assert_eq!(data.outline.len(), 4);
    assert_relative_eq!(data.thickness, 0.25, epsilon = EPS);
    assert_relative_eq!(data.elevation_offset, 0.0, epsilon = EPS);
    let max_x = data.outline.iter().map(|p| p.x).fold(f64::MIN, f64::max);
    assert_relative_eq!(max_x, 6.0, epsilon = EPS);
}

#[test]
fn test_counter_comes_back_as_furniture_mesh() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let counter = find(&result, fixture.elements[4].id);

    assert_eq!(counter.element_type(), ElementType::Furniture);
    assert_eq!(counter.name, "Kitchen");
    assert!(counter.geometry.mesh.as_ref().is_some_and(|m| !m.is_empty()));
    let ElementData::Furniture(data) = &counter.data else {
        panic!("expected furniture");
    };
    assert_relative_eq!(data.height, 0.9, epsilon = EPS);
    assert_eq!(result.stats.imported(ElementType::Furniture), 1);
}

#[test]
fn test_columns_survive() {
    let (fixture, result) = round_trip(&ImportOptions::default());

    let round = find(&result, fixture.elements[5].id);
    let ElementData::Column(data) = &round.data else {
        panic!("expected a column, got {:?}", round.data);
    };
    assert_eq!(data.profile, ColumnProfile::Circular);
    assert_relative_eq!(data.width, 0.4, epsilon = EPS);
    assert_relative_eq!(data.height, 3.0, epsilon = EPS);
    assert_relative_eq!(round.placement.position.x, 2.0, epsilon = EPS);
    assert_relative_eq!(round.placement.position.y, 3.0, epsilon = EPS);

    let square = find(&result, fixture.elements[6].id);
    let ElementData::Column(data) = &square.data else {
        panic!("expected a column, got {:?}", square.data);
    };
    assert_eq!(data.profile, ColumnProfile::Rectangular);
    assert_relative_eq!(data.width, 0.3, epsilon = EPS);
    assert_relative_eq!(data.depth, 0.5, epsilon = EPS);
    assert_relative_eq!(data.height, 2.8, epsilon = EPS);
    assert_relative_eq!(square.placement.position.x, -1.0, epsilon = EPS);
    assert_relative_eq!(square.placement.position.y, 1.0, epsilon = EPS);
    assert_relative_eq!(square.placement.rotation.yaw(), 0.0, epsilon = EPS);
}

#[test]
fn test_external_space_keeps_long_name() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let space = find(&result, fixture.elements[7].id);

    assert_eq!(space.name, "Terrace");
    assert_eq!(space.parent_storey_id, Some(fixture.storeys[0].id));
    let ElementData::Space(data) = &space.data else {
        panic!("expected a space, got {:?}", space.data);
    };
    assert_eq!(data.space_type, SpaceType::External);
    assert_eq!(data.long_name.as_deref(), Some("Roof terrace"));
    assert_eq!(data.boundary.len(), 4);
    assert_relative_eq!(data.height, 2.5, epsilon = EPS);
    assert_relative_eq!(data.net_floor_area.unwrap(), 18.0, epsilon = EPS);
}

#[test]
fn test_stair_survives() {
    let (fixture, result) = round_trip(&ImportOptions::default());
    let stair = find(&result, fixture.elements[8].id);

    let ElementData::Stair(data) = &stair.data else {
        panic!("expected a stair, got {:?}", stair.data);
    };
    assert_eq!(data.riser_count, 16);
    assert_relative_eq!(data.width, 1.0, epsilon = EPS);
    assert_relative_eq!(data.total_rise, 2.8, epsilon = EPS);
    assert_relative_eq!(data.tread_depth, 0.28, epsilon = EPS);
    assert_relative_eq!(stair.placement.position.x, 3.0, epsilon = EPS);
    assert_relative_eq!(stair.placement.position.y, 0.5, epsilon = EPS);
}

#[test]
fn test_disabled_types_are_not_decoded() {
    let options = ImportOptions {
        import_doors: false,
        import_windows: false,
        ..ImportOptions::default()
    };
    let (fixture, result) = round_trip(&options);

    assert_eq!(result.elements_of(ElementType::Door).count(), 0);
    assert_eq!(result.elements_of(ElementType::Window).count(), 0);
    let ElementData::Wall(wall) = &find(&result, fixture.elements[0].id).data else {
        panic!("expected a wall");
    };
    assert!(wall.openings.is_empty());
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

const HOSTLESS_DOOR: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('door.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCCARTESIANPOINT((0.,0.,0.));
#2=IFCAXIS2PLACEMENT3D(#1,$,$);
#3=IFCLOCALPLACEMENT($,#2);
#10=IFCBUILDINGSTOREY('0ZmB3nYf9DPh2ltJ4mFRxk',$,'Ground',$,$,#3,$,$,.ELEMENT.,0.);
#20=IFCCARTESIANPOINT((2.,0.,0.));
#21=IFCAXIS2PLACEMENT3D(#20,$,$);
#22=IFCLOCALPLACEMENT(#3,#21);
#30=IFCDOOR('1hQW9mV3zCKOEBsDgWbYFR',$,'Lonely door',$,$,#22,$,$,2.1,0.9);
#40=IFCRELCONTAINEDINSPATIALSTRUCTURE('2Nd2kYx5D5ZPTjYoLqUe0w',$,$,$,(#30),#10);
ENDSEC;
END-ISO-10303-21;
"#;

#[test]
fn test_door_without_host_is_skipped_with_warning() {
    let result = decode(HOSTLESS_DOOR.as_bytes(), &ImportOptions::default()).unwrap();

    assert!(result.elements.is_empty());
    assert_eq!(result.storeys.len(), 1);
    assert_eq!(result.stats.skipped(ElementType::Door), 1);
    assert_eq!(result.warnings, ["Failed to parse door #30: no host wall found"]);
}

#[test]
fn test_unreadable_input_is_an_error() {
    assert!(decode(b"not a step file", &ImportOptions::default()).is_err());
}
