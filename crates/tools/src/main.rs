use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::{LatLon, Point};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use world::WorldOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "Origin-relative Web Mercator projection tools")]
struct Args {
    /// World options as JSON (session only)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forward-project a "lat,lon" coordinate
    Project {
        #[arg(allow_hyphen_values = true)]
        coord: LatLon,
    },

    /// Inverse-project a scene-space point (y south)
    Unproject {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Convert a coordinate into the local frame of an origin
    Local {
        #[arg(long, default_value = tools::MOSCOW, allow_hyphen_values = true)]
        origin: LatLon,
        #[arg(allow_hyphen_values = true)]
        coord: LatLon,
    },

    /// Local scale factor of the projection at a coordinate
    Scale {
        #[arg(allow_hyphen_values = true)]
        coord: LatLon,
        /// Use the ellipsoidal (WGS84) formula
        #[arg(long)]
        accurate: bool,
    },

    /// Convert real-world metres to world units
    Metres {
        metres: f64,
        #[arg(long, default_value = tools::MOSCOW, allow_hyphen_values = true)]
        at: LatLon,
        #[arg(long)]
        zoom: Option<u32>,
        #[arg(long)]
        accurate: bool,
    },

    /// Great-circle distance in metres
    Distance {
        #[arg(allow_hyphen_values = true)]
        a: LatLon,
        #[arg(allow_hyphen_values = true)]
        b: LatLon,
        /// Haversine instead of the law of cosines
        #[arg(long)]
        accurate: bool,
    },

    /// Run a scripted session and print every event
    Session {
        #[arg(long, default_value = tools::MOSCOW, allow_hyphen_values = true)]
        origin: LatLon,
        /// Camera target; repeat for several moves
        #[arg(long = "to", allow_hyphen_values = true, default_value = "55.76,37.62")]
        targets: Vec<LatLon>,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    debug!(?args, "parsed arguments");

    match args.command {
        Command::Project { coord } => print_json(&tools::project(coord)?),
        Command::Unproject { x, y } => print_json(&tools::unproject(Point::new(x, y))?),
        Command::Local { origin, coord } => print_json(&tools::local(origin, coord)?),
        Command::Scale { coord, accurate } => print_json(&tools::scale(coord, accurate)?),
        Command::Metres {
            metres,
            at,
            zoom,
            accurate,
        } => print_json(&tools::metres(metres, at, zoom, accurate)?),
        Command::Distance { a, b, accurate } => {
            print_json(&serde_json::json!({ "metres": tools::distance(a, b, accurate)? }))
        }
        Command::Session {
            origin,
            targets,
            dt,
        } => {
            let options = load_options(args.config)?;
            print_json(&tools::session(options, origin, &targets, dt)?)
        }
    }
}

fn load_options(path: Option<PathBuf>) -> Result<WorldOptions, String> {
    let Some(path) = path else {
        return Ok(WorldOptions::default());
    };
    let text = fs::read_to_string(&path).map_err(|e| format!("read {path:?}: {e}"))?;
    WorldOptions::from_json(&text).map_err(|e| format!("{path:?}: {e}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}
