//! Plane sizes and placements a renderer needs to draw a camera frustum and
//! its depth of field.
//!
//! Everything here is plain numeric geometry in scene space. The renderer
//! decides what meshes and materials to build from it.

use crate::{
    error::{Error, Result},
    optic::{DepthOfField, FrustumGeometry, Limit},
    scene::{SceneCoordinate, SceneRotation},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::{
    ConstZero,
    si::{f64::Length, length::meter},
};

/// Display settings for frustum visualisation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrustumDisplay {
    /// Distance at which an unbounded far plane is drawn. Defaults to 100 m.
    pub far_clip: Length,

    /// Whether a plane is drawn at the focus distance. Defaults to `true`.
    pub focus_plane: bool,
}

impl Default for FrustumDisplay {
    fn default() -> Self {
        Self {
            far_clip: Length::new::<meter>(100.),
            focus_plane: true,
        }
    }
}

/// A rectangle perpendicular to the view axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneGeometry {
    pub distance: Length,
    pub width: Length,
    pub height: Length,

    /// `true` if the plane was pulled in to [`FrustumDisplay::far_clip`].
    pub clipped: bool,
}

impl PlaneGeometry {
    fn at(frustum: &FrustumGeometry, distance: Length, clipped: bool) -> Self {
        Self {
            distance,
            width: frustum.width_at_distance(distance),
            height: frustum.height_at_distance(distance),
            clipped,
        }
    }
}

/// Planes bounding the region of acceptable sharpness.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DofPlanes {
    pub near: PlaneGeometry,
    pub focus: Option<PlaneGeometry>,
    pub far: PlaneGeometry,
}

/// Sizes the near, focus and far planes of `dof`.
///
/// An infinite far limit, or one beyond `display.far_clip`, is drawn at
/// `far_clip` and marked as clipped.
pub fn depth_of_field_planes(
    frustum: &FrustumGeometry,
    dof: &DepthOfField,
    focus_distance: Length,
    display: &FrustumDisplay,
) -> Result<DofPlanes> {
    ensure_distance("focus distance", focus_distance)?;
    ensure_distance("far clip", display.far_clip)?;

    let far_distance = dof.far_limit.clip(display.far_clip);
    let far_clipped = match dof.far_limit {
        Limit::Finite(far) => far > display.far_clip,
        Limit::Infinite => true,
    };

    Ok(DofPlanes {
        near: PlaneGeometry::at(frustum, dof.near_limit, false),
        focus: display
            .focus_plane
            .then(|| PlaneGeometry::at(frustum, focus_distance, false)),
        far: PlaneGeometry::at(frustum, far_distance, far_clipped),
    })
}

/// Corners of the frustum cross-section `distance` along the view axis of a
/// camera at `position` with attitude `rotation`.
///
/// Corners are ordered top left, top right, bottom right, bottom left as seen
/// through the camera.
pub fn footprint_corners(
    position: SceneCoordinate,
    rotation: &SceneRotation,
    frustum: &FrustumGeometry,
    distance: Length,
) -> Result<[SceneCoordinate; 4]> {
    position.validate()?;
    ensure_distance("footprint distance", distance)?;

    let half_width = frustum.width_at_distance(distance) / 2.;
    let half_height = frustum.height_at_distance(distance) / 2.;
    let corner = |right: f64, up: f64| {
        let offset = rotation.rotate(SceneCoordinate::new(
            half_width * right,
            half_height * up,
            -distance,
        ));
        SceneCoordinate::new(
            position.x + offset.x,
            position.y + offset.y,
            position.z + offset.z,
        )
    };

    Ok([
        corner(-1., 1.),
        corner(1., 1.),
        corner(1., -1.),
        corner(-1., -1.),
    ])
}

fn ensure_distance(what: &str, distance: Length) -> Result<()> {
    if !distance.is_finite() || distance < Length::ZERO {
        return Err(Error::input(format!(
            "expected {what} to be finite and not negative but got: {} m",
            distance.get::<meter>()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::{CameraSpec, LensSpec},
        optic::{compute_depth_of_field, compute_field_of_view},
        scene::{Orientation, rotate_orientation_to_scene},
    };
    use approx::assert_abs_diff_eq;
    use uom::si::length::millimeter;

    fn m(value: f64) -> Length {
        Length::new::<meter>(value)
    }

    fn setup() -> (CameraSpec, LensSpec, FrustumGeometry) {
        let camera = CameraSpec::from_millimeters(36.0, 24.0);
        let lens = LensSpec::prime(Length::new::<millimeter>(50.0), [2.8, 8.0]);
        let frustum = compute_field_of_view(&camera, &lens).expect("hardware is valid");
        (camera, lens, frustum)
    }

    #[test]
    fn finite_dof_planes() {
        let (camera, lens, frustum) = setup();
        let dof = compute_depth_of_field(m(10.0), &camera, &lens, 8.0).expect("hardware is valid");
        let display = FrustumDisplay {
            far_clip: m(1000.0),
            ..Default::default()
        };

        let planes =
            depth_of_field_planes(&frustum, &dof, m(10.0), &display).expect("distances are valid");

        assert_eq!(planes.near.distance, dof.near_limit);
        assert!(!planes.far.clipped);
        assert_eq!(Limit::Finite(planes.far.distance), dof.far_limit);
        let focus = planes.focus.expect("focus plane is enabled");
        assert_abs_diff_eq!(focus.width.get::<meter>(), 10.0 * 36.0 / 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(focus.height.get::<meter>(), 10.0 * 24.0 / 50.0, epsilon = 1e-9);
    }

    #[test]
    fn infinite_far_plane_is_clipped() {
        let (camera, lens, frustum) = setup();
        let dof = compute_depth_of_field(m(50.0), &camera, &lens, 8.0).expect("hardware is valid");
        assert!(dof.far_limit.is_infinite());

        let display = FrustumDisplay {
            focus_plane: false,
            ..Default::default()
        };
        let planes =
            depth_of_field_planes(&frustum, &dof, m(50.0), &display).expect("distances are valid");

        assert!(planes.far.clipped);
        assert_eq!(planes.far.distance, m(100.0));
        assert_eq!(planes.focus, None);
    }

    #[test]
    fn corners_ahead_of_level_camera() {
        let (_, _, frustum) = setup();
        let corners = footprint_corners(
            SceneCoordinate::from_meters(0.0, 0.0, 0.0),
            &SceneRotation::identity(),
            &frustum,
            m(10.0),
        )
        .expect("inputs are valid");

        let expected = [
            [-3.6, 2.4, -10.0],
            [3.6, 2.4, -10.0],
            [3.6, -2.4, -10.0],
            [-3.6, -2.4, -10.0],
        ];
        for (corner, expected) in corners.iter().zip(expected) {
            assert_abs_diff_eq!(corner.x.get::<meter>(), expected[0], epsilon = 1e-9);
            assert_abs_diff_eq!(corner.y.get::<meter>(), expected[1], epsilon = 1e-9);
            assert_abs_diff_eq!(corner.z.get::<meter>(), expected[2], epsilon = 1e-9);
        }
    }

    #[test]
    fn nadir_footprint_touches_ground() {
        let (_, _, frustum) = setup();
        let rotation = rotate_orientation_to_scene(Orientation::from_degrees(0.0, -90.0, 0.0))
            .expect("angles are finite");
        let corners = footprint_corners(
            SceneCoordinate::from_meters(5.0, 100.0, -5.0),
            &rotation,
            &frustum,
            m(100.0),
        )
        .expect("inputs are valid");

        for corner in corners {
            assert_abs_diff_eq!(corner.y.get::<meter>(), 0.0, epsilon = 1e-9);
        }
        // The top of the image points North, towards -z.
        assert_abs_diff_eq!(corners[0].x.get::<meter>(), 5.0 - 36.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corners[0].z.get::<meter>(), -5.0 - 24.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corners[2].x.get::<meter>(), 5.0 + 36.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corners[2].z.get::<meter>(), -5.0 + 24.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_negative_distance() {
        let (_, _, frustum) = setup();
        assert!(matches!(
            footprint_corners(
                SceneCoordinate::from_meters(0.0, 0.0, 0.0),
                &SceneRotation::identity(),
                &frustum,
                m(-1.0),
            ),
            Err(Error::InvalidInput(_))
        ));
    }
}
