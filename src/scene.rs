//! The Y-up, right-handed render space and attitude conversions into it.
//!
//! Scene space shares its origin with the local East-North-Up frame:
//!
//! ```text
//! scene.x =  east
//! scene.y =  up
//! scene.z = -north
//! ```
//!
//! The mapping is fixed. Every consumer converts through [`local_to_scene`]
//! and [`scene_to_local`].

use crate::{
    error::{Result, ensure_finite},
    local::LocalCoordinate,
};
use nalgebra::{UnitQuaternion, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use uom::si::{
    angle::{degree, radian},
    f64::{Angle, Length},
    length::meter,
};

/// A position in the render space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneCoordinate {
    pub x: Length,
    pub y: Length,
    pub z: Length,
}

impl SceneCoordinate {
    pub fn new(x: Length, y: Length, z: Length) -> Self {
        Self { x, y, z }
    }

    pub fn from_meters(x: f64, y: f64, z: f64) -> Self {
        Self::new(
            Length::new::<meter>(x),
            Length::new::<meter>(y),
            Length::new::<meter>(z),
        )
    }

    /// Returns `Ok` if every component is finite.
    pub fn validate(&self) -> Result<()> {
        ensure_finite(
            "scene coordinate",
            &[
                ("x", self.x.get::<meter>()),
                ("y", self.y.get::<meter>()),
                ("z", self.z.get::<meter>()),
            ],
        )
    }

    pub(crate) fn as_meters(&self) -> Vector3<f64> {
        Vector3::new(
            self.x.get::<meter>(),
            self.y.get::<meter>(),
            self.z.get::<meter>(),
        )
    }

    pub(crate) fn from_vector(v: &Vector3<f64>) -> Self {
        Self::from_meters(v.x, v.y, v.z)
    }
}

/// Maps a local East-North-Up coordinate into scene space.
pub fn local_to_scene(point: LocalCoordinate) -> Result<SceneCoordinate> {
    point.validate()?;
    Ok(SceneCoordinate::new(point.east, point.up, -point.north))
}

/// The exact inverse of [`local_to_scene`].
pub fn scene_to_local(point: SceneCoordinate) -> Result<LocalCoordinate> {
    point.validate()?;
    Ok(LocalCoordinate::new(point.x, -point.z, point.y))
}

/// Marks the reference an [`Orientation`] is measured against.
pub trait OrientationFrame: Copy + Clone {}

/// Attitude relative to the local tangent plane, heading from true North.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalLevel;
impl OrientationFrame for LocalLevel {}

/// Attitude relative to the airframe, eg gimbal pan, tilt and roll.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleBody;
impl OrientationFrame for VehicleBody {}

/// Heading, pitch and roll measured in `Frame`.
///
/// - heading is clockwise from the frame's forward axis (North for
///   [`LocalLevel`]), so 90 degrees faces East.
/// - pitch is positive nose (or lens) up.
/// - roll is positive right side down.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orientation<Frame: OrientationFrame> {
    heading: Angle,
    pitch: Angle,
    roll: Angle,
    _phan: PhantomData<Frame>,
}

impl<Frame: OrientationFrame> Orientation<Frame> {
    pub fn new(heading: Angle, pitch: Angle, roll: Angle) -> Self {
        Self {
            heading,
            pitch,
            roll,
            _phan: PhantomData,
        }
    }

    pub fn from_degrees(heading: f64, pitch: f64, roll: f64) -> Self {
        Self::new(
            Angle::new::<degree>(heading),
            Angle::new::<degree>(pitch),
            Angle::new::<degree>(roll),
        )
    }

    /// Heading zero, level.
    pub fn level() -> Self {
        Self::from_degrees(0.0, 0.0, 0.0)
    }

    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn pitch(&self) -> Angle {
        self.pitch
    }

    pub fn roll(&self) -> Angle {
        self.roll
    }

    /// Returns `Ok` if every angle is finite.
    pub fn validate(&self) -> Result<()> {
        ensure_finite(
            "orientation",
            &[
                ("heading", self.heading.get::<degree>()),
                ("pitch", self.pitch.get::<degree>()),
                ("roll", self.roll.get::<degree>()),
            ],
        )
    }

    /// Builds the rotation in intrinsic Y-X-Z order.
    ///
    /// 1. yaw about +Y by -heading (clockwise seen from above),
    /// 2. pitch about the yawed +X by +pitch,
    /// 3. roll about the pitched +Z by -roll.
    ///
    /// Signs follow from the frame's forward axis being -Z and its right axis
    /// being +X.
    fn to_quaternion(self) -> Result<UnitQuaternion<f64>> {
        self.validate()?;
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -self.heading.get::<radian>());
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.pitch.get::<radian>());
        let roll = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -self.roll.get::<radian>());

        Ok(yaw * pitch * roll)
    }
}

/// A rotation of scene space, as consumed by the renderer.
///
/// An identity rotation looks along -Z (North) with +Y (up) overhead.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneRotation {
    rotation: UnitQuaternion<f64>,
}

impl SceneRotation {
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
        }
    }

    pub fn as_unit_quaternion(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }

    /// The quaternion components in `[w, x, y, z]` order.
    pub fn quaternion_wxyz(&self) -> [f64; 4] {
        let q = self.rotation.quaternion();
        [q.w, q.i, q.j, q.k]
    }

    /// Decomposes into Euler angles about `(x, y, z)` applied in Y-X-Z order.
    ///
    /// This is the order a Y-up renderer applies a rotation vector in. Pitch
    /// beyond +/-90 degrees is folded back by the decomposition.
    pub fn euler_yxz(&self) -> (Angle, Angle, Angle) {
        let m = self.rotation.to_rotation_matrix().into_inner();
        let m23 = m[(1, 2)].clamp(-1.0, 1.0);
        let x = (-m23).asin();

        let (y, z) = if m23.abs() < 0.9999999 {
            (m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
        } else {
            // Gimbal lock, roll is folded into yaw.
            ((-m[(2, 0)]).atan2(m[(0, 0)]), 0.0)
        };

        (
            Angle::new::<radian>(x),
            Angle::new::<radian>(y),
            Angle::new::<radian>(z),
        )
    }

    /// Rotates an offset from the rotation's origin.
    pub fn rotate(&self, offset: SceneCoordinate) -> SceneCoordinate {
        SceneCoordinate::from_vector(&(self.rotation * offset.as_meters()))
    }

    /// The unit vector the rotated frame looks along.
    pub fn view_direction(&self) -> Vector3<f64> {
        self.rotation * -Vector3::z()
    }

    /// The unit vector pointing out of the rotated frame's top.
    pub fn up_direction(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }
}

/// Converts a heading, pitch and roll into a [`SceneRotation`].
///
/// The rotation is built in intrinsic Tait-Bryan Y-X-Z order: yaw (heading)
/// first, then pitch, then roll. See [`Orientation`] for the sign
/// conventions.
pub fn rotate_orientation_to_scene(orientation: Orientation<LocalLevel>) -> Result<SceneRotation> {
    Ok(SceneRotation {
        rotation: orientation.to_quaternion()?,
    })
}

/// Attitude of a gimbal-mounted camera.
///
/// `gimbal` is measured against the airframe whose attitude is `vehicle`. The
/// vehicle rotation is applied first.
pub fn mount_on(
    vehicle: Orientation<LocalLevel>,
    gimbal: Orientation<VehicleBody>,
) -> Result<SceneRotation> {
    Ok(SceneRotation {
        rotation: vehicle.to_quaternion()? * gimbal.to_quaternion()?,
    })
}
