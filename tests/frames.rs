use approx::assert_abs_diff_eq;
use missionframe::prelude::*;
use uom::si::{angle::degree, f64::Angle, length::meter};

fn sf() -> GeodeticCoordinate {
    GeodeticCoordinate::from_degrees(37.7749, -122.4194, 0.0)
}

#[test]
fn waypoint_through_every_frame() {
    let waypoint = GeodeticCoordinate::from_degrees(37.7759, -122.4184, 25.0);

    let local = geodetic_to_local(waypoint, sf()).expect("coordinates are valid");
    assert_abs_diff_eq!(local.east.get::<meter>(), 88.099, epsilon = 0.02);
    assert_abs_diff_eq!(local.north.get::<meter>(), 110.993, epsilon = 0.02);
    assert_abs_diff_eq!(local.up.get::<meter>(), 25.0, epsilon = 0.01);

    let scene = local_to_scene(local).expect("local is finite");
    assert_eq!(scene.x, local.east);
    assert_eq!(scene.y, local.up);
    assert_eq!(scene.z, -local.north);

    let ned = local_to_ned(scene_to_local(scene).expect("scene is finite"))
        .expect("local is finite");
    assert_eq!(ned.north, local.north);
    assert_eq!(ned.east, local.east);
    assert_eq!(ned.down, -local.up);

    let back = local_to_geodetic(ned_to_local(ned).expect("ned is finite"), sf())
        .expect("coordinates are valid");
    assert_abs_diff_eq!(back.latitude.get::<degree>(), 37.7759, epsilon = 1e-9);
    assert_abs_diff_eq!(back.longitude.get::<degree>(), -122.4184, epsilon = 1e-9);
    assert_abs_diff_eq!(back.altitude.get::<meter>(), 25.0, epsilon = 1e-6);
}

#[test]
fn body_conventions_agree_on_position() {
    let local = LocalCoordinate::from_meters(12.0, -7.5, 3.0);

    for convention in [BodyConvention::Standard, BodyConvention::Ned] {
        let body = local_to_body(local, convention).expect("local is finite");
        assert_eq!(body.convention(), convention);
        assert_eq!(body_to_local(body), Ok(local));
    }
}

#[test]
fn heading_turns_forward_axis() {
    let ahead = LocalCoordinate::from_meters(0.0, 10.0, 0.0);
    let flu = local_to_flu(ahead, Angle::new::<degree>(90.0)).expect("inputs are finite");

    // Facing East, a point due North is off the left side.
    assert_abs_diff_eq!(flu.forward.get::<meter>(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(flu.left.get::<meter>(), 10.0, epsilon = 1e-9);
}

#[test]
fn camera_on_turned_vehicle_looks_along_heading() {
    let vehicle: Orientation<LocalLevel> = Orientation::from_degrees(90.0, 0.0, 0.0);
    let gimbal: Orientation<VehicleBody> = Orientation::from_degrees(0.0, -30.0, 0.0);
    let rotation = mount_on(vehicle, gimbal).expect("angles are finite");

    let view = rotation.view_direction();
    let (sin, cos) = 30f64.to_radians().sin_cos();
    assert_abs_diff_eq!(view.x, cos, epsilon = 1e-9);
    assert_abs_diff_eq!(view.y, -sin, epsilon = 1e-9);
    assert_abs_diff_eq!(view.z, 0.0, epsilon = 1e-9);
}

#[test]
fn rejects_bad_input_at_every_boundary() {
    let nan = f64::NAN;

    assert!(matches!(
        geodetic_to_local(GeodeticCoordinate::from_degrees(91.0, 0.0, 0.0), sf()),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        local_to_geodetic(LocalCoordinate::from_meters(nan, 0.0, 0.0), sf()),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        scene_to_local(SceneCoordinate::from_meters(0.0, f64::INFINITY, 0.0)),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        rotate_orientation_to_scene(Orientation::from_degrees(nan, 0.0, 0.0)),
        Err(Error::InvalidInput(_))
    ));
}
