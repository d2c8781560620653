//! Field of view and depth of field for a camera and lens.
//!
//! Inputs and outputs are `uom` quantities. The thin lens formulas below are
//! evaluated in millimeters; conversion happens once on the way in and once
//! on the way out.

use crate::{
    camera::{CameraSpec, FocusState, LensSpec, ensure_positive},
    error::{Error, Result},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;
use uom::si::{
    angle::radian,
    f64::{Angle, Length},
    length::{meter, millimeter},
};

/// Circle of confusion in millimeters.
///
/// Full frame equivalent. The same value is used for every sensor; there is no
/// per sensor table.
pub const CIRCLE_OF_CONFUSION_MM: f64 = 0.03;

/// Angular field of view of a camera and lens.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrustumGeometry {
    horizontal_fov: Angle,
    vertical_fov: Angle,

    /// Footprint width per unit distance, `2 tan(hfov / 2)`.
    width_ratio: f64,

    /// Footprint height per unit distance, `2 tan(vfov / 2)`.
    height_ratio: f64,
}

impl FrustumGeometry {
    pub fn horizontal_fov(&self) -> Angle {
        self.horizontal_fov
    }

    pub fn vertical_fov(&self) -> Angle {
        self.vertical_fov
    }

    /// Width of the view's cross-section `distance` along the view axis.
    ///
    /// Zero at the camera and linear in `distance`.
    pub fn width_at_distance(&self, distance: Length) -> Length {
        distance * self.width_ratio
    }

    /// Height of the view's cross-section `distance` along the view axis.
    pub fn height_at_distance(&self, distance: Length) -> Length {
        distance * self.height_ratio
    }
}

/// Computes the field of view of `camera` behind `lens`.
///
/// A zoom lens must first be pinned with [`LensSpec::at_focal_length`].
/// Fails with [`Error::InvalidHardwareParameters`] for a non-positive focal
/// length or sensor dimension.
pub fn compute_field_of_view(camera: &CameraSpec, lens: &LensSpec) -> Result<FrustumGeometry> {
    camera.validate()?;
    let f = lens.effective_focal_length()?.get::<millimeter>();
    let w = camera.sensor_width.get::<millimeter>();
    let h = camera.sensor_height.get::<millimeter>();

    // 2 tan(atan(w / 2f)) reduces to w / f.
    Ok(FrustumGeometry {
        horizontal_fov: Angle::new::<radian>(2. * (w / (2. * f)).atan()),
        vertical_fov: Angle::new::<radian>(2. * (h / (2. * f)).atan()),
        width_ratio: w / f,
        height_ratio: h / f,
    })
}

/// A depth of field boundary that may lie at infinity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Limit {
    Finite(Length),
    Infinite,
}

impl Limit {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Limit::Infinite)
    }

    /// Returns the distance if it is finite.
    pub fn finite(&self) -> Option<Length> {
        match self {
            Limit::Finite(distance) => Some(*distance),
            Limit::Infinite => None,
        }
    }

    /// The limit, or `max` if the limit lies beyond it.
    pub fn clip(&self, max: Length) -> Length {
        match self {
            Limit::Finite(distance) if *distance < max => *distance,
            _ => max,
        }
    }
}

/// Range of acceptable sharpness around the focus distance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepthOfField {
    pub near_limit: Length,
    pub far_limit: Limit,
    pub total_depth: Limit,
    pub hyperfocal_distance: Length,
}

/// Computes the hyperfocal distance `f^2 / (N c) + f` of `lens` at `f_stop`.
pub fn hyperfocal_distance(lens: &LensSpec, f_stop: f64) -> Result<Length> {
    let f = lens.effective_focal_length()?.get::<millimeter>();
    ensure_f_stop(f_stop)?;
    Ok(Length::new::<millimeter>(hyperfocal_mm(f, f_stop)))
}

fn hyperfocal_mm(f: f64, f_stop: f64) -> f64 {
    f * f / (f_stop * CIRCLE_OF_CONFUSION_MM) + f
}

fn ensure_f_stop(f_stop: f64) -> Result<()> {
    if !f_stop.is_finite() || f_stop <= 0. {
        return Err(Error::hardware(format!(
            "expected f-stop greater than zero but got: {f_stop}"
        )));
    }

    Ok(())
}

/// Computes the near and far limits of acceptable sharpness using the
/// hyperfocal distance method.
///
/// With `H` the hyperfocal distance, `f` the focal length and `s` the focus
/// distance:
///
/// ```text
/// s >= H:  near = H / 2,                      far = infinity
/// s <  H:  near = s (H - f) / (H + s - 2f),   far = s (H - f) / (H - s)
/// ```
///
/// Fails with [`Error::InvalidHardwareParameters`] if `f_stop` or the focal
/// length is not positive, if `focus_distance` is not beyond the focal length,
/// or if `camera` is not physical.
pub fn compute_depth_of_field(
    focus_distance: Length,
    camera: &CameraSpec,
    lens: &LensSpec,
    f_stop: f64,
) -> Result<DepthOfField> {
    camera.validate()?;
    ensure_positive("focus distance", focus_distance)?;
    ensure_f_stop(f_stop)?;
    let f = lens.effective_focal_length()?.get::<millimeter>();

    let s = focus_distance.get::<millimeter>();
    if s <= f {
        return Err(Error::hardware(format!(
            "expected focus distance beyond the {f} mm focal length but got: {s} mm"
        )));
    }

    let h = hyperfocal_mm(f, f_stop);
    let hyperfocal = Length::new::<millimeter>(h);

    // Either comparison selects the hyperfocal branch, so the finite branch
    // always has `s < h` in the units the formulas are evaluated in.
    let (near_limit, far_limit) = if s >= h || focus_distance >= hyperfocal {
        debug!(
            focus_m = focus_distance.get::<meter>(),
            hyperfocal_m = hyperfocal.get::<meter>(),
            "focused at or beyond hyperfocal distance"
        );
        (hyperfocal / 2., Limit::Infinite)
    } else {
        let near = s * (h - f) / (h + s - 2. * f);
        let far = s * (h - f) / (h - s);
        debug!(near_mm = near, far_mm = far, "finite depth of field");

        (
            Length::new::<millimeter>(near),
            Limit::Finite(Length::new::<millimeter>(far)),
        )
    };

    let total_depth = match far_limit {
        Limit::Finite(far) => Limit::Finite(far - near_limit),
        Limit::Infinite => Limit::Infinite,
    };

    Ok(DepthOfField {
        near_limit,
        far_limit,
        total_depth,
        hyperfocal_distance: hyperfocal,
    })
}

/// [`compute_depth_of_field`] for the operator's current [`FocusState`].
pub fn compute_depth_of_field_for(
    focus: &FocusState,
    camera: &CameraSpec,
    lens: &LensSpec,
) -> Result<DepthOfField> {
    compute_depth_of_field(focus.focus_distance(), camera, lens, focus.f_stop())
}
