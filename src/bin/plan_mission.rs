use clap::Parser;
use missionframe::{
    body::BodyConvention,
    config::{FocalLengthMm, MissionConfig},
};
use std::{error::Error, fs, io::Write, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convert a mission file into local, scene and body coordinates plus camera
/// optics, written as JSON to stdout.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Mission description in JSON.
    mission: PathBuf,

    /// Override the lens, eg `50` or `24-70`.
    #[arg(long)]
    focal_length: Option<FocalLengthMm>,

    /// Override the focal length in effect for a zoom lens.
    #[arg(long)]
    zoom: Option<f64>,

    /// Override the focus distance in meters.
    #[arg(long)]
    focus: Option<f64>,

    /// Override the f-stop.
    #[arg(long)]
    f_stop: Option<f64>,

    /// Report waypoints in the forward-left-up body frame instead of NED.
    #[arg(long)]
    flu: bool,

    /// Indent the output.
    #[arg(short, long)]
    pretty: bool,
}

impl Args {
    fn apply(&self, config: &mut MissionConfig) {
        if let Some(focal_length) = self.focal_length {
            config.camera.focal_length_mm = focal_length;
        }

        if let Some(zoom) = self.zoom {
            config.camera.zoom_mm = Some(zoom);
        }

        if let Some(focus) = self.focus {
            config.focus.distance_m = focus;
        }

        if let Some(f_stop) = self.f_stop {
            config.focus.f_stop = f_stop;
        }

        if self.flu {
            config.body_convention = BodyConvention::Standard;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let serialized = fs::read_to_string(&args.mission)?;
    let mut config: MissionConfig = serde_json::from_str(&serialized)?;
    args.apply(&mut config);

    let plan = config.plan()?;
    info!(
        waypoints = plan.waypoints.len(),
        far_infinite = plan.depth_of_field.far_limit.is_infinite(),
        "planned {}",
        args.mission.display()
    );

    let json = match args.pretty {
        true => serde_json::to_string_pretty(&plan)?,
        false => serde_json::to_string(&plan)?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
