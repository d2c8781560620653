use crate::error::{Error, Result, ensure_finite};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use sguaba::systems::Wgs84;
use uom::si::{
    angle::degree,
    f64::{Angle, Length},
    length::meter,
};

/// A WGS84 latitude, longitude and altitude above the ellipsoid.
///
/// Values are not checked on construction. Every transform validates its
/// geodetic inputs and fails with [`Error::InvalidInput`] when the latitude is
/// outside -90 to 90 degrees, the longitude is outside -180 to 180 degrees or
/// any component is not finite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticCoordinate {
    pub latitude: Angle,
    pub longitude: Angle,
    pub altitude: Length,
}

impl GeodeticCoordinate {
    pub fn new(latitude: Angle, longitude: Angle, altitude: Length) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Create a `GeodeticCoordinate` from degrees and meters.
    pub fn from_degrees(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self::new(
            Angle::new::<degree>(latitude),
            Angle::new::<degree>(longitude),
            Length::new::<meter>(altitude),
        )
    }

    /// Returns `Ok` if the coordinate is on the ellipsoid's valid domain.
    pub fn validate(&self) -> Result<()> {
        let latitude = self.latitude.get::<degree>();
        let longitude = self.longitude.get::<degree>();
        ensure_finite(
            "geodetic coordinate",
            &[
                ("latitude", latitude),
                ("longitude", longitude),
                ("altitude", self.altitude.get::<meter>()),
            ],
        )?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::input(format!(
                "expected latitude in range [-90, 90] but got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::input(format!(
                "expected longitude in range [-180, 180] but got: {longitude}"
            )));
        }

        Ok(())
    }

    /// Converts into the `sguaba` representation after validating.
    pub(crate) fn to_wgs84(self) -> Result<Wgs84> {
        self.validate()?;
        Ok(Wgs84::builder()
            .latitude(self.latitude)
            // `validate` enforces this.
            .expect("latitude is between -90 and 90")
            .longitude(self.longitude)
            .altitude(self.altitude)
            .build())
    }

    /// Converts from the `sguaba` representation, wrapping the longitude onto
    /// -180 to 180 degrees.
    pub(crate) fn from_wgs84(wgs84: &Wgs84) -> Result<Self> {
        let coord = Self::new(
            wgs84.latitude(),
            wrap_longitude(wgs84.longitude()),
            wgs84.altitude(),
        );
        coord.validate()?;
        Ok(coord)
    }
}

fn wrap_longitude(mut longitude: Angle) -> Angle {
    let full_turn = Angle::HALF_TURN * 2.;
    while longitude > Angle::HALF_TURN {
        longitude -= full_turn;
    }

    while longitude < -Angle::HALF_TURN {
        longitude += full_turn;
    }

    longitude
}
