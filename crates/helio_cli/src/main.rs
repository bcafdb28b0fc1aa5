use std::path::PathBuf;

use clap::{Parser, Subcommand};
use helio_config::{ConfigError, HelioConfig};
use helio_coords::{
    b0, carrington_longitude, get_earth, Coordinate, Frame, FrameKind, ObsTime, Observer,
    TransformError, TransformGraph,
};
use helio_ephem::AU_KM;
use helio_time::{Epoch, LeapSecondKernel, TimeError};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "helio", about = "Solar coordinate transforms")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform one point between frames
    Transform {
        /// Source frame (name, class name or abbreviation, e.g. HGS)
        #[arg(long)]
        from: FrameKind,
        /// Destination frame
        #[arg(long)]
        to: FrameKind,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Distance from the frame origin in km (direction-only when omitted)
        #[arg(long)]
        distance: Option<f64>,
        /// Source obstime, UTC (YYYY-MM-DDThh:mm:ss) or J2000
        #[arg(long)]
        obstime: Option<String>,
        /// Destination obstime; defaults to the source obstime
        #[arg(long)]
        to_obstime: Option<String>,
        /// Observer for helioprojective and heliocentric frames
        #[arg(long, default_value = "earth")]
        observer: String,
        /// Place direction-only helioprojective points on the solar surface
        #[arg(long)]
        on_disk: bool,
    },
    /// Earth's heliographic position, L0 and B0
    Earth {
        /// UTC datetime (YYYY-MM-DDThh:mm:ss)
        #[arg(long)]
        date: String,
    },
    /// Hop sequence the graph takes between two frames
    Path {
        #[arg(long)]
        from: FrameKind,
        #[arg(long)]
        to: FrameKind,
    },
    /// Graphviz DOT description of the transform graph
    Graph {
        /// Frames to keep; everything else collapses into one placeholder
        #[arg(long, value_delimiter = ',')]
        keep: Vec<String>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

struct Session {
    graph: TransformGraph,
    lsk: LeapSecondKernel,
    rsun_km: f64,
}

impl Session {
    fn new(config: &HelioConfig) -> Result<Self, CliError> {
        Ok(Self {
            graph: TransformGraph::analytic(config.ephemeris_config(), config.transform_config())?,
            lsk: config.leap_second_kernel()?,
            rsun_km: config.transform.rsun_km,
        })
    }

    fn epoch(&self, input: &str) -> Result<Epoch, CliError> {
        Ok(self.lsk.parse_time(input)?)
    }

    fn frame(
        &self,
        kind: FrameKind,
        obstime: Option<Epoch>,
        observer: &str,
    ) -> Result<Frame, CliError> {
        let mut frame = Frame::new(kind);
        if let Some(t) = obstime
            && kind.has_obstime()
        {
            frame = frame.with_obstime(t)?;
        }
        if kind.has_observer() {
            frame = frame
                .with_observer(Observer::named(observer))?
                .resolve_observer(&self.graph)?;
        }
        Ok(frame)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<HelioConfig, ConfigError> {
    match path {
        Some(path) => HelioConfig::from_file(path),
        None => Ok(HelioConfig::default()),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&config.logging.level);
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "loaded configuration");
    }

    if let Err(e) = run(cli.command, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &HelioConfig) -> Result<(), CliError> {
    let session = Session::new(config)?;

    match command {
        Commands::Transform {
            from,
            to,
            lon,
            lat,
            distance,
            obstime,
            to_obstime,
            observer,
            on_disk,
        } => {
            let t_from = obstime.as_deref().map(|s| session.epoch(s)).transpose()?;
            let t_to = match to_obstime.as_deref() {
                Some(s) => Some(session.epoch(s)?),
                None => t_from,
            };
            let src = session.frame(from, t_from, &observer)?;
            let dst = session.frame(to, t_to, &observer)?;

            let mut coord = match distance {
                Some(d) => Coordinate::from_spherical(src, lon, lat, d)?,
                None => Coordinate::from_lon_lat(src, lon, lat)?,
            };
            if on_disk && distance.is_none() {
                coord = if from == FrameKind::Helioprojective {
                    coord.calculate_distance(session.rsun_km)?
                } else {
                    Coordinate::on_surface(coord.frame().clone(), lon, lat, session.rsun_km)?
                };
            }
            debug!(from = %from, to = %to, "transforming");

            let (out, stats) = session.graph.transform_with_stats(&coord, &dst)?;
            let s = out.spherical()[0];
            let xyz = out.cartesian()[0];
            println!("{} ({})", to.class_name(), to.abbreviation());
            if out.data().has_distance() {
                println!(
                    "  lon = {:.6} deg, lat = {:.6} deg, distance = {:.3} km",
                    s.lon_deg, s.lat_deg, s.distance_km
                );
                println!("  x = {:.3} km, y = {:.3} km, z = {:.3} km", xyz[0], xyz[1], xyz[2]);
            } else {
                println!("  lon = {:.6} deg, lat = {:.6} deg", s.lon_deg, s.lat_deg);
            }
            debug!(edges = stats.edges, "transform complete");
        }

        Commands::Earth { date } => {
            let t = session.epoch(&date)?;
            let earth = get_earth(&session.graph, &ObsTime::from(t))?;
            let s = earth.spherical()[0];
            println!("Earth at {t}");
            println!(
                "  HGS lon = {:.6} deg, lat = {:.6} deg, radius = {:.3} km ({:.8} AU)",
                s.lon_deg,
                s.lat_deg,
                s.distance_km,
                s.distance_km / AU_KM
            );
            println!("  L0 = {:.4} deg", carrington_longitude(&session.graph, t)?);
            println!("  B0 = {:.4} deg", b0(&session.graph, t)?);
        }

        Commands::Path { from, to } => {
            let hops: Vec<&str> = session
                .graph
                .path(from, to)?
                .iter()
                .map(|k| k.abbreviation())
                .collect();
            println!("{}", hops.join(" -> "));
        }

        Commands::Graph { keep } => {
            let diagram = session.graph.diagram();
            let diagram = if keep.is_empty() {
                diagram
            } else {
                let names: Vec<&str> = keep.iter().map(String::as_str).collect();
                diagram.prune(&names)?
            };
            print!("{}", diagram.to_dot());
        }
    }

    Ok(())
}
