//! Coordinate frames and camera optics for drone mission planning.
//!
//! Positions move between four frames:
//!
//! - WGS84 geodetic ([`geodetic`]),
//! - East-North-Up about a mission origin ([`local`]),
//! - the Y-up render space ([`scene`]),
//! - robot body frames ([`body`]).
//!
//! The optics side ([`camera`], [`optic`]) derives field of view, frustum
//! footprint and depth of field from sensor and lens parameters. [`planes`]
//! combines the two into plane geometry a renderer can place.
//!
//! Every operation is a pure function of its inputs and returns a
//! [`Result`](error::Result); bad input is reported, never replaced by a
//! plausible default.

#[allow(missing_docs)]
pub mod error;

pub mod body;
pub mod camera;
#[cfg(feature = "serde")]
pub mod config;
pub mod geodetic;
pub mod local;
pub mod optic;
pub mod planes;
pub mod scene;

pub mod prelude {
    pub use crate::{
        body::{
            BodyConvention, BodyCoordinate, FluCoordinate, NedCoordinate, body_to_local,
            flu_to_local, flu_to_local_assuming_north_heading, local_to_body, local_to_flu,
            local_to_flu_assuming_north_heading, local_to_ned, ned_to_local,
        },
        camera::{CameraSpec, FocalLength, FocusState, LensSpec},
        error::Error,
        geodetic::GeodeticCoordinate,
        local::{LocalCoordinate, LocalFrame, geodetic_to_local, local_to_geodetic},
        optic::{
            CIRCLE_OF_CONFUSION_MM, DepthOfField, FrustumGeometry, Limit, compute_depth_of_field,
            compute_depth_of_field_for, compute_field_of_view, hyperfocal_distance,
        },
        planes::{DofPlanes, FrustumDisplay, PlaneGeometry, depth_of_field_planes, footprint_corners},
        scene::{
            LocalLevel, Orientation, SceneCoordinate, SceneRotation, VehicleBody, local_to_scene,
            mount_on, rotate_orientation_to_scene, scene_to_local,
        },
    };
}
