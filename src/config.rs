//! Mission descriptions as read from disk, and the plan derived from them.
//!
//! The file format uses plain numbers with their unit in the field name, eg
//! `sensor_width_mm`, so it can be written by hand. Every conversion into the
//! core types validates and reports [`Error`].

use crate::{
    body::{BodyConvention, BodyCoordinate, local_to_body},
    camera::{CameraSpec, FocusState, LensSpec},
    error::{Error, Result},
    geodetic::GeodeticCoordinate,
    local::{LocalCoordinate, LocalFrame},
    optic::{DepthOfField, FrustumGeometry, compute_depth_of_field_for, compute_field_of_view},
    planes::{DofPlanes, FrustumDisplay, depth_of_field_planes, footprint_corners},
    scene::{
        LocalLevel, Orientation, OrientationFrame, SceneCoordinate, SceneRotation, VehicleBody,
        local_to_scene, mount_on,
    },
};
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::Length,
    length::{meter, millimeter},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeodeticDegrees {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl From<GeodeticDegrees> for GeodeticCoordinate {
    fn from(value: GeodeticDegrees) -> Self {
        GeodeticCoordinate::from_degrees(value.latitude_deg, value.longitude_deg, value.altitude_m)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttitudeDegrees {
    #[serde(default)]
    pub heading_deg: f64,
    #[serde(default)]
    pub pitch_deg: f64,
    #[serde(default)]
    pub roll_deg: f64,
}

impl AttitudeDegrees {
    fn orientation<Frame: OrientationFrame>(&self) -> Orientation<Frame> {
        Orientation::from_degrees(self.heading_deg, self.pitch_deg, self.roll_deg)
    }
}

/// A single focal length, or a `[min, max]` zoom range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FocalLengthMm {
    Prime(f64),
    Zoom([f64; 2]),
}

/// Camera hardware as described in a mission file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    pub sensor_width_mm: f64,
    pub sensor_height_mm: f64,
    pub focal_length_mm: FocalLengthMm,
    pub aperture_stops: Vec<f64>,

    /// Focal length in effect for a zoom lens.
    #[serde(default)]
    pub zoom_mm: Option<f64>,
}

impl CameraProfile {
    pub fn camera(&self) -> CameraSpec {
        CameraSpec::from_millimeters(self.sensor_width_mm, self.sensor_height_mm)
    }

    /// The lens, pinned to `zoom_mm` when one is given.
    pub fn lens(&self) -> Result<LensSpec> {
        let stops = self.aperture_stops.iter().copied();
        let lens = match self.focal_length_mm {
            FocalLengthMm::Prime(focal_length) => {
                LensSpec::prime(Length::new::<millimeter>(focal_length), stops)
            }
            FocalLengthMm::Zoom([min, max]) => LensSpec::zoom(
                Length::new::<millimeter>(min),
                Length::new::<millimeter>(max),
                stops,
            ),
        };

        match self.zoom_mm {
            Some(zoom) => lens.at_focal_length(Length::new::<millimeter>(zoom)),
            None => Ok(lens),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusSettings {
    pub distance_m: f64,
    pub f_stop: f64,
}

impl FocusSettings {
    pub fn focus_state(&self, lens: &LensSpec) -> Result<FocusState> {
        FocusState::new(Length::new::<meter>(self.distance_m), self.f_stop, lens)
    }
}

fn default_body_convention() -> BodyConvention {
    BodyConvention::Ned
}

/// A mission file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Anchor of the mission's local frame, typically the takeoff point.
    pub origin: GeodeticDegrees,
    #[serde(default)]
    pub waypoints: Vec<GeodeticDegrees>,
    pub camera: CameraProfile,
    pub focus: FocusSettings,

    /// Vehicle attitude, level and facing North when omitted.
    #[serde(default)]
    pub vehicle: Option<AttitudeDegrees>,

    /// Gimbal attitude relative to the vehicle, level when omitted.
    #[serde(default)]
    pub gimbal: Option<AttitudeDegrees>,

    /// Body frame the waypoints are reported in. Defaults to NED.
    #[serde(default = "default_body_convention")]
    pub body_convention: BodyConvention,

    #[serde(default)]
    pub display: FrustumDisplay,
}

/// A waypoint in every frame a consumer may ask for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointPlan {
    pub geodetic: GeodeticCoordinate,
    pub local: LocalCoordinate,
    pub scene: SceneCoordinate,
    pub body: BodyCoordinate,

    /// Camera footprint at the focus distance, seen from this waypoint.
    pub footprint: [SceneCoordinate; 4],
}

/// Everything derived from a [`MissionConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub origin: GeodeticCoordinate,
    pub waypoints: Vec<WaypointPlan>,
    pub camera_rotation: SceneRotation,
    pub frustum: FrustumGeometry,
    pub depth_of_field: DepthOfField,
    pub planes: DofPlanes,
}

impl MissionConfig {
    /// Runs the mission through the transform and optics engines.
    pub fn plan(&self) -> Result<MissionPlan> {
        let frame = LocalFrame::new(self.origin.into())?;
        let camera = self.camera.camera();
        let lens = self.camera.lens()?;
        let focus = self.focus.focus_state(&lens)?;

        let frustum = compute_field_of_view(&camera, &lens)?;
        let depth_of_field = compute_depth_of_field_for(&focus, &camera, &lens)?;
        let planes =
            depth_of_field_planes(&frustum, &depth_of_field, focus.focus_distance(), &self.display)?;

        let vehicle: Orientation<LocalLevel> = self
            .vehicle
            .map(|attitude| attitude.orientation())
            .unwrap_or_else(Orientation::level);
        let gimbal: Orientation<VehicleBody> = self
            .gimbal
            .map(|attitude| attitude.orientation())
            .unwrap_or_else(Orientation::level);
        let camera_rotation = mount_on(vehicle, gimbal)?;

        let geodetic: Vec<GeodeticCoordinate> =
            self.waypoints.iter().map(|&waypoint| waypoint.into()).collect();
        let waypoints = frame
            .par_to_local(&geodetic)?
            .into_iter()
            .zip(geodetic)
            .map(|(local, geodetic)| -> Result<WaypointPlan> {
                let scene = local_to_scene(local)?;
                Ok(WaypointPlan {
                    geodetic,
                    local,
                    scene,
                    body: local_to_body(local, self.body_convention)?,
                    footprint: footprint_corners(
                        scene,
                        &camera_rotation,
                        &frustum,
                        focus.focus_distance(),
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MissionPlan {
            origin: frame.origin(),
            waypoints,
            camera_rotation,
            frustum,
            depth_of_field,
            planes,
        })
    }
}

impl std::str::FromStr for FocalLengthMm {
    type Err = Error;

    /// Parses `50` or `24-70`.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |value: &str| {
            value.trim().parse::<f64>().map_err(|err| {
                Error::hardware(format!("focal length `{value}` is not a number: {err}"))
            })
        };

        match s.split_once('-') {
            Some((min, max)) => Ok(FocalLengthMm::Zoom([parse(min)?, parse(max)?])),
            None => Ok(FocalLengthMm::Prime(parse(s)?)),
        }
    }
}
