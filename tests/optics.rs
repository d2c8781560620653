use approx::assert_relative_eq;
use missionframe::prelude::*;
use rstest::rstest;
use uom::si::{
    angle::degree,
    f64::Length,
    length::{meter, millimeter},
};

fn full_frame() -> CameraSpec {
    CameraSpec::from_millimeters(36.0, 24.0)
}

fn zoom() -> LensSpec {
    LensSpec::zoom(
        Length::new::<millimeter>(24.0),
        Length::new::<millimeter>(70.0),
        [2.8, 4.0, 5.6, 8.0, 11.0],
    )
}

#[test]
fn pinned_zoom_matches_prime() {
    let pinned = zoom()
        .at_focal_length(Length::new::<millimeter>(50.0))
        .expect("50 mm is in range");
    let prime = LensSpec::prime(Length::new::<millimeter>(50.0), [8.0]);

    let from_zoom = compute_field_of_view(&full_frame(), &pinned).expect("hardware is valid");
    let from_prime = compute_field_of_view(&full_frame(), &prime).expect("hardware is valid");
    assert_eq!(from_zoom, from_prime);
    assert_relative_eq!(
        from_zoom.horizontal_fov().get::<degree>(),
        39.5978,
        epsilon = 1e-4
    );
}

#[test]
fn operator_focus_drives_depth_of_field() {
    let lens = zoom()
        .at_focal_length(Length::new::<millimeter>(50.0))
        .expect("50 mm is in range");
    let focus = FocusState::new(Length::new::<meter>(10.0), 8.0, &lens).expect("stop is offered");

    let dof = compute_depth_of_field_for(&focus, &full_frame(), &lens).expect("hardware is valid");
    assert_relative_eq!(
        dof.hyperfocal_distance.get::<millimeter>(),
        10466.667,
        epsilon = 1e-3
    );
    assert_relative_eq!(dof.near_limit.get::<millimeter>(), 5114.566, epsilon = 1e-3);
    let far = dof.far_limit.finite().expect("focused inside hyperfocal");
    assert_relative_eq!(far.get::<millimeter>(), 223214.286, epsilon = 1e-3);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
fn rejects_f_stop(#[case] f_stop: f64) {
    let lens = LensSpec::prime(Length::new::<millimeter>(50.0), [8.0]);
    assert!(matches!(
        compute_depth_of_field(Length::new::<meter>(10.0), &full_frame(), &lens, f_stop),
        Err(Error::InvalidHardwareParameters(_))
    ));
}

#[rstest]
#[case(CameraSpec::from_millimeters(0.0, 24.0))]
#[case(CameraSpec::from_millimeters(36.0, -24.0))]
#[case(CameraSpec::from_millimeters(f64::INFINITY, 24.0))]
fn rejects_sensor(#[case] camera: CameraSpec) {
    let lens = LensSpec::prime(Length::new::<millimeter>(50.0), [8.0]);
    assert!(matches!(
        compute_field_of_view(&camera, &lens),
        Err(Error::InvalidHardwareParameters(_))
    ));
}

#[test]
fn unpinned_zoom_has_no_field_of_view() {
    assert!(matches!(
        compute_field_of_view(&full_frame(), &zoom()),
        Err(Error::InvalidHardwareParameters(_))
    ));
}

#[test]
fn hyperfocal_focus_reaches_infinity() {
    let lens = LensSpec::prime(Length::new::<millimeter>(35.0), [11.0]);
    let hyperfocal = hyperfocal_distance(&lens, 11.0).expect("hardware is valid");

    let dof = compute_depth_of_field(hyperfocal, &full_frame(), &lens, 11.0)
        .expect("hardware is valid");
    assert_eq!(dof.near_limit, hyperfocal / 2.0);
    assert!(dof.far_limit.is_infinite());
    assert!(dof.total_depth.is_infinite());

    let frustum = compute_field_of_view(&full_frame(), &lens).expect("hardware is valid");
    let planes = depth_of_field_planes(&frustum, &dof, hyperfocal, &FrustumDisplay::default())
        .expect("distances are valid");
    assert!(planes.far.clipped);
    assert_eq!(planes.near.distance, hyperfocal / 2.0);
}
