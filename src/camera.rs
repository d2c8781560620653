use crate::error::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::{
    ConstZero,
    si::{f64::Length, length::millimeter},
};

/// Physical dimensions of an image sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraSpec {
    pub sensor_width: Length,
    pub sensor_height: Length,
}

impl CameraSpec {
    pub fn new(sensor_width: Length, sensor_height: Length) -> Self {
        Self {
            sensor_width,
            sensor_height,
        }
    }

    pub fn from_millimeters(sensor_width: f64, sensor_height: f64) -> Self {
        Self::new(
            Length::new::<millimeter>(sensor_width),
            Length::new::<millimeter>(sensor_height),
        )
    }

    /// Returns `Ok` if both sensor dimensions are finite and positive.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("sensor width", self.sensor_width)?;
        ensure_positive("sensor height", self.sensor_height)
    }
}

/// The focal length a lens offers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FocalLength {
    Prime(Length),
    Zoom { min: Length, max: Length },
}

/// A lens and the f-numbers it can be stopped to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LensSpec {
    focal_length: FocalLength,

    /// Ascending, without duplicates.
    aperture_stops: Vec<f64>,
}

impl LensSpec {
    /// Create a `LensSpec` from a `focal_length` and a list of f-numbers.
    ///
    /// The stops are sorted and deduplicated. Stops that are not finite are
    /// dropped.
    pub fn new(focal_length: FocalLength, aperture_stops: impl IntoIterator<Item = f64>) -> Self {
        let mut aperture_stops: Vec<f64> = aperture_stops
            .into_iter()
            .filter(|stop| stop.is_finite())
            .collect();
        aperture_stops.sort_by(f64::total_cmp);
        aperture_stops.dedup();

        Self {
            focal_length,
            aperture_stops,
        }
    }

    pub fn prime(focal_length: Length, aperture_stops: impl IntoIterator<Item = f64>) -> Self {
        Self::new(FocalLength::Prime(focal_length), aperture_stops)
    }

    pub fn zoom(min: Length, max: Length, aperture_stops: impl IntoIterator<Item = f64>) -> Self {
        Self::new(FocalLength::Zoom { min, max }, aperture_stops)
    }

    pub fn focal_length(&self) -> FocalLength {
        self.focal_length
    }

    pub fn aperture_stops(&self) -> &[f64] {
        &self.aperture_stops
    }

    /// Returns `true` if the lens can be stopped to `f_stop`.
    pub fn offers_stop(&self, f_stop: f64) -> bool {
        self.aperture_stops
            .iter()
            .any(|stop| (stop - f_stop).abs() <= 1e-9 * stop.abs().max(1.0))
    }

    /// Pins the lens to the focal length currently in effect.
    ///
    /// A zoom lens accepts any `focal_length` within its range. A prime lens
    /// only accepts its own focal length.
    pub fn at_focal_length(&self, focal_length: Length) -> Result<LensSpec> {
        ensure_positive("focal length", focal_length)?;
        let in_range = match self.focal_length {
            FocalLength::Prime(prime) => prime == focal_length,
            FocalLength::Zoom { min, max } => min <= focal_length && focal_length <= max,
        };

        if !in_range {
            return Err(Error::hardware(format!(
                "focal length of {} mm is not offered by lens {:?}",
                focal_length.get::<millimeter>(),
                self.focal_length
            )));
        }

        Ok(Self {
            focal_length: FocalLength::Prime(focal_length),
            aperture_stops: self.aperture_stops.clone(),
        })
    }

    /// The focal length in effect.
    ///
    /// Fails for a zoom lens that has not been pinned with
    /// [`LensSpec::at_focal_length`]; no end of the range is picked on the
    /// caller's behalf.
    pub fn effective_focal_length(&self) -> Result<Length> {
        match self.focal_length {
            FocalLength::Prime(focal_length) => {
                ensure_positive("focal length", focal_length)?;
                Ok(focal_length)
            }
            FocalLength::Zoom { min, max } => Err(Error::hardware(format!(
                "zoom lens ({} to {} mm) needs the focal length in effect",
                min.get::<millimeter>(),
                max.get::<millimeter>()
            ))),
        }
    }
}

/// The operator controlled focus and aperture.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FocusState {
    focus_distance: Length,
    f_stop: f64,
}

impl FocusState {
    /// Create a new `FocusState` for `lens`.
    ///
    /// Fails if `focus_distance` is not positive or `lens` can not be stopped
    /// to `f_stop`.
    pub fn new(focus_distance: Length, f_stop: f64, lens: &LensSpec) -> Result<Self> {
        ensure_positive("focus distance", focus_distance)?;
        if !lens.offers_stop(f_stop) {
            return Err(Error::hardware(format!(
                "f/{f_stop} is not one of the lens stops {:?}",
                lens.aperture_stops()
            )));
        }

        Ok(Self {
            focus_distance,
            f_stop,
        })
    }

    pub fn focus_distance(&self) -> Length {
        self.focus_distance
    }

    pub fn f_stop(&self) -> f64 {
        self.f_stop
    }
}

/// Fails with [`Error::InvalidHardwareParameters`] unless `value` is finite and
/// greater than zero.
pub(crate) fn ensure_positive(what: &str, value: Length) -> Result<()> {
    if !value.is_finite() || value <= Length::ZERO {
        return Err(Error::hardware(format!(
            "expected {what} greater than zero but got: {} mm",
            value.get::<millimeter>()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mm(value: f64) -> Length {
        Length::new::<millimeter>(value)
    }

    #[test]
    fn stops_are_ordered() {
        let lens = LensSpec::prime(mm(50.0), [8.0, 2.8, 4.0, 2.8, f64::NAN, 16.0]);
        assert_eq!(lens.aperture_stops(), &[2.8, 4.0, 8.0, 16.0]);
    }

    #[rstest]
    #[case(mm(24.0), true)]
    #[case(mm(50.0), true)]
    #[case(mm(70.0), true)]
    #[case(mm(18.0), false)]
    #[case(mm(105.0), false)]
    fn zoom_range(#[case] focal_length: Length, #[case] offered: bool) {
        let lens = LensSpec::zoom(mm(24.0), mm(70.0), [4.0]);
        assert_eq!(lens.at_focal_length(focal_length).is_ok(), offered);
    }

    #[test]
    fn unpinned_zoom_has_no_focal_length() {
        let lens = LensSpec::zoom(mm(24.0), mm(70.0), [4.0]);
        assert!(matches!(
            lens.effective_focal_length(),
            Err(Error::InvalidHardwareParameters(_))
        ));

        let pinned = lens.at_focal_length(mm(35.0)).expect("35 mm is in range");
        assert_eq!(pinned.effective_focal_length(), Ok(mm(35.0)));
        assert_eq!(pinned.aperture_stops(), lens.aperture_stops());
    }

    #[test]
    fn prime_only_offers_itself() {
        let lens = LensSpec::prime(mm(50.0), [1.8]);
        assert!(lens.at_focal_length(mm(50.0)).is_ok());
        assert!(lens.at_focal_length(mm(35.0)).is_err());
    }

    #[rstest]
    #[case(0.0, 24.0)]
    #[case(36.0, -1.0)]
    #[case(f64::NAN, 24.0)]
    fn invalid_sensor(#[case] width: f64, #[case] height: f64) {
        assert!(matches!(
            CameraSpec::from_millimeters(width, height).validate(),
            Err(Error::InvalidHardwareParameters(_))
        ));
    }

    #[rstest]
    #[case(10.0, 8.0, true)]
    #[case(10.0, 5.6, false)]
    #[case(0.0, 8.0, false)]
    #[case(-3.0, 8.0, false)]
    fn focus_state(#[case] distance_m: f64, #[case] f_stop: f64, #[case] valid: bool) {
        let lens = LensSpec::prime(mm(50.0), [2.8, 4.0, 8.0]);
        assert_eq!(
            FocusState::new(mm(distance_m * 1000.), f_stop, &lens).is_ok(),
            valid
        );
    }
}
