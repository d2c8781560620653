//! Robot body frames.
//!
//! Two conventions are supported, and each direction of each conversion is a
//! separately named function:
//!
//! - [`FluCoordinate`], the ROS standard forward-left-up body frame.
//! - [`NedCoordinate`], the aircraft North-East-Down frame used by MAVLink
//!   local setpoints.
//!
//! The forward-left-up conversion needs the vehicle heading. Planning code
//! that treats the vehicle as facing North uses
//! [`local_to_flu_assuming_north_heading`], which is also what
//! [`local_to_body`] dispatches to. Everything that knows the live heading
//! uses [`local_to_flu`].

use crate::{
    error::{Result, ensure_finite},
    local::LocalCoordinate,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::{degree, radian},
    f64::{Angle, Length},
    length::meter,
};

/// Forward-left-up body coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FluCoordinate {
    pub forward: Length,
    pub left: Length,
    pub up: Length,
}

impl FluCoordinate {
    pub fn new(forward: Length, left: Length, up: Length) -> Self {
        Self { forward, left, up }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite(
            "forward-left-up coordinate",
            &[
                ("forward", self.forward.get::<meter>()),
                ("left", self.left.get::<meter>()),
                ("up", self.up.get::<meter>()),
            ],
        )
    }
}

/// North-east-down coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NedCoordinate {
    pub north: Length,
    pub east: Length,
    pub down: Length,
}

impl NedCoordinate {
    pub fn new(north: Length, east: Length, down: Length) -> Self {
        Self { north, east, down }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite(
            "north-east-down coordinate",
            &[
                ("north", self.north.get::<meter>()),
                ("east", self.east.get::<meter>()),
                ("down", self.down.get::<meter>()),
            ],
        )
    }
}

/// Names a body frame convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyConvention {
    /// Forward-left-up, vehicle facing North.
    Standard,
    Ned,
}

/// A body frame coordinate tagged with its convention.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyCoordinate {
    Standard(FluCoordinate),
    Ned(NedCoordinate),
}

impl BodyCoordinate {
    pub fn convention(&self) -> BodyConvention {
        match self {
            BodyCoordinate::Standard(_) => BodyConvention::Standard,
            BodyCoordinate::Ned(_) => BodyConvention::Ned,
        }
    }
}

/// forward = north, left = -east, up = up.
pub fn local_to_flu_assuming_north_heading(point: LocalCoordinate) -> Result<FluCoordinate> {
    point.validate()?;
    Ok(FluCoordinate::new(point.north, -point.east, point.up))
}

/// The exact inverse of [`local_to_flu_assuming_north_heading`].
pub fn flu_to_local_assuming_north_heading(point: FluCoordinate) -> Result<LocalCoordinate> {
    point.validate()?;
    Ok(LocalCoordinate::new(-point.left, point.forward, point.up))
}

/// Expresses `point` in the forward-left-up frame of a vehicle at `heading`.
///
/// `heading` is clockwise from North. The vehicle is assumed level, so `up`
/// passes through unchanged.
pub fn local_to_flu(point: LocalCoordinate, heading: Angle) -> Result<FluCoordinate> {
    point.validate()?;
    ensure_finite("heading", &[("heading", heading.get::<degree>())])?;
    let (sin, cos) = heading.get::<radian>().sin_cos();

    Ok(FluCoordinate::new(
        point.east * sin + point.north * cos,
        -point.east * cos + point.north * sin,
        point.up,
    ))
}

/// The inverse of [`local_to_flu`].
pub fn flu_to_local(point: FluCoordinate, heading: Angle) -> Result<LocalCoordinate> {
    point.validate()?;
    ensure_finite("heading", &[("heading", heading.get::<degree>())])?;
    let (sin, cos) = heading.get::<radian>().sin_cos();

    Ok(LocalCoordinate::new(
        point.forward * sin - point.left * cos,
        point.forward * cos + point.left * sin,
        point.up,
    ))
}

/// north = north, east = east, down = -up.
pub fn local_to_ned(point: LocalCoordinate) -> Result<NedCoordinate> {
    point.validate()?;
    Ok(NedCoordinate::new(point.north, point.east, -point.up))
}

/// The exact inverse of [`local_to_ned`].
pub fn ned_to_local(point: NedCoordinate) -> Result<LocalCoordinate> {
    point.validate()?;
    Ok(LocalCoordinate::new(point.east, point.north, -point.down))
}

/// Converts into the body frame named by `convention`.
///
/// [`BodyConvention::Standard`] assumes the vehicle faces North.
pub fn local_to_body(point: LocalCoordinate, convention: BodyConvention) -> Result<BodyCoordinate> {
    match convention {
        BodyConvention::Standard => {
            local_to_flu_assuming_north_heading(point).map(BodyCoordinate::Standard)
        }
        BodyConvention::Ned => local_to_ned(point).map(BodyCoordinate::Ned),
    }
}

/// The exact inverse of [`local_to_body`].
pub fn body_to_local(point: BodyCoordinate) -> Result<LocalCoordinate> {
    match point {
        BodyCoordinate::Standard(flu) => flu_to_local_assuming_north_heading(flu),
        BodyCoordinate::Ned(ned) => ned_to_local(ned),
    }
}
