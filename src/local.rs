//! The local tangent plane (East-North-Up) anchored at a mission origin.
//!
//! A [`LocalCoordinate`] is only meaningful together with the [`LocalFrame`]
//! it was computed in. Moving a coordinate from one mission origin to another
//! goes through [`LocalFrame::rebase`], never through arithmetic on the raw
//! components.
//!
//! The frame is built from the WGS84 ellipsoid: the origin's ECEF position
//! and its east, north and up basis vectors. It is accurate for points within
//! a few hundred kilometers of the origin. Points near the poles or the
//! antipode of the origin are outside the supported envelope and are not
//! treated specially.
//!
//! Converting back to WGS84 is only defined between 10 km below and 50 km
//! above the ellipsoid. [`LocalFrame::to_geodetic`] rejects local points
//! outside that band with `InvalidInput`.

use crate::{
    error::{Error, Result, ensure_finite},
    geodetic::GeodeticCoordinate,
};
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sguaba::{Coordinate, coordinate, math::RigidBodyTransform, system, systems::Ecef};
use std::fmt;
use tracing::{debug, trace};
use uom::{
    ConstZero,
    si::{angle::degree, f64::Length, length::meter},
};

system!(struct MissionEnu using ENU);

const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
const SEMI_MINOR_AXIS_M: f64 = SEMI_MAJOR_AXIS_M * (1.0 - 1.0 / 298.257_223_563);
const MIN_ALTITUDE_M: f64 = -10_000.0;
const MAX_ALTITUDE_M: f64 = 50_000.0;

/// A position in meters east, north and up of a mission origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalCoordinate {
    pub east: Length,
    pub north: Length,
    pub up: Length,
}

impl LocalCoordinate {
    pub fn new(east: Length, north: Length, up: Length) -> Self {
        Self { east, north, up }
    }

    /// Create a `LocalCoordinate` from meters.
    pub fn from_meters(east: f64, north: f64, up: f64) -> Self {
        Self::new(
            Length::new::<meter>(east),
            Length::new::<meter>(north),
            Length::new::<meter>(up),
        )
    }

    /// The origin of any local frame.
    pub fn origin() -> Self {
        Self::new(Length::ZERO, Length::ZERO, Length::ZERO)
    }

    /// Returns `Ok` if every component is finite.
    pub fn validate(&self) -> Result<()> {
        ensure_finite(
            "local coordinate",
            &[
                ("east", self.east.get::<meter>()),
                ("north", self.north.get::<meter>()),
                ("up", self.up.get::<meter>()),
            ],
        )
    }

    fn in_mission_enu(&self) -> Coordinate<MissionEnu> {
        coordinate!(e = self.east, n = self.north, u = self.up; in MissionEnu)
    }

    fn from_mission_enu(coord: Coordinate<MissionEnu>) -> Self {
        Self::new(coord.enu_east(), coord.enu_north(), coord.enu_up())
    }
}

/// An East-North-Up tangent plane anchored at a geodetic origin.
///
/// Typically the origin is the mission's first takeoff point.
#[derive(Clone, Copy)]
pub struct LocalFrame {
    origin: GeodeticCoordinate,
    ecef_to_enu: RigidBodyTransform<Ecef, MissionEnu>,
}

impl LocalFrame {
    /// Create a `LocalFrame` anchored at `origin`.
    ///
    /// Fails with [`Error::InvalidInput`](crate::error::Error::InvalidInput)
    /// if `origin` is not a valid geodetic coordinate.
    pub fn new(origin: GeodeticCoordinate) -> Result<Self> {
        let wgs84 = origin.to_wgs84()?;
        debug!(
            latitude = origin.latitude.get::<degree>(),
            longitude = origin.longitude.get::<degree>(),
            altitude = origin.altitude.get::<meter>(),
            "anchored local frame"
        );

        // SAFETY: the origin of `MissionEnu` is `origin` for every coordinate
        // produced or consumed through this frame.
        let ecef_to_enu = unsafe { RigidBodyTransform::ecef_to_enu_at(&wgs84) };

        Ok(Self {
            origin,
            ecef_to_enu,
        })
    }

    pub fn origin(&self) -> GeodeticCoordinate {
        self.origin
    }

    /// Project `point` onto this frame's east, north and up axes.
    pub fn to_local(&self, point: GeodeticCoordinate) -> Result<LocalCoordinate> {
        let ecef = Coordinate::<Ecef>::from_wgs84(&point.to_wgs84()?);
        Ok(LocalCoordinate::from_mission_enu(
            self.ecef_to_enu.transform(ecef),
        ))
    }

    /// The exact inverse of [`LocalFrame::to_local`].
    ///
    /// Fails with [`Error::InvalidInput`] if `point` is not finite or lies
    /// outside -10 km to 50 km altitude.
    pub fn to_geodetic(&self, point: LocalCoordinate) -> Result<GeodeticCoordinate> {
        point.validate()?;
        let ecef = self.ecef_to_enu.inverse_transform(point.in_mission_enu());

        // The ECEF solver only accepts points inside this geocentric shell.
        let [x, y, z] = ecef.to_cartesian().map(|c| c.get::<meter>());
        let distance_sq = x * x + y * y + z * z;
        let min = SEMI_MINOR_AXIS_M + MIN_ALTITUDE_M;
        let max = SEMI_MAJOR_AXIS_M + MAX_ALTITUDE_M;
        if !(min * min..=max * max).contains(&distance_sq) {
            return Err(outside_altitude_band(point));
        }

        let geodetic = GeodeticCoordinate::from_wgs84(&ecef.to_wgs84())?;
        if !(MIN_ALTITUDE_M..=MAX_ALTITUDE_M).contains(&geodetic.altitude.get::<meter>()) {
            return Err(outside_altitude_band(point));
        }

        Ok(geodetic)
    }

    /// Re-express `point`, given relative to this frame, relative to `to`.
    pub fn rebase(&self, point: LocalCoordinate, to: &LocalFrame) -> Result<LocalCoordinate> {
        point.validate()?;
        let ecef = self.ecef_to_enu.inverse_transform(point.in_mission_enu());
        Ok(LocalCoordinate::from_mission_enu(
            to.ecef_to_enu.transform(ecef),
        ))
    }

    /// Converts a batch of points in parallel.
    ///
    /// Fails if any point is invalid.
    pub fn par_to_local(&self, points: &[GeodeticCoordinate]) -> Result<Vec<LocalCoordinate>> {
        trace!(count = points.len(), "converting points to local frame");
        points.par_iter().map(|point| self.to_local(*point)).collect()
    }
}

fn outside_altitude_band(point: LocalCoordinate) -> Error {
    Error::input(format!(
        "local coordinate ({} m, {} m, {} m) is outside the supported altitude range \
         {MIN_ALTITUDE_M}..{MAX_ALTITUDE_M} m",
        point.east.get::<meter>(),
        point.north.get::<meter>(),
        point.up.get::<meter>(),
    ))
}

impl fmt::Debug for LocalFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFrame")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl PartialEq for LocalFrame {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
    }
}

/// Converts `point` into the East-North-Up frame anchored at `origin`.
pub fn geodetic_to_local(
    point: GeodeticCoordinate,
    origin: GeodeticCoordinate,
) -> Result<LocalCoordinate> {
    LocalFrame::new(origin)?.to_local(point)
}

/// Converts `point`, relative to `origin`, back into WGS84.
pub fn local_to_geodetic(
    point: LocalCoordinate,
    origin: GeodeticCoordinate,
) -> Result<GeodeticCoordinate> {
    LocalFrame::new(origin)?.to_geodetic(point)
}
