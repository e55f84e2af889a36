use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use roof::{DetectionConfig, Detector, GeoBoundingBox, LatLng, RoofProject};
use roof_cli::{config_to_string, load_config, load_polygon, save_config, ConfigFormat};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect roof sections in a captured map image
    Detect {
        /// Path to the PNG or JPEG capture
        #[arg(short, long)]
        image: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        ne_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        ne_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        sw_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        sw_lng: f64,
        /// Detection thresholds (.toml or .json); defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Where to write the project GeoJSON
        #[arg(short, long, default_value = "roof.geojson")]
        output: PathBuf,
        /// Project address stored with the sections
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Measure a polygon given as a JSON array of {lat, lng} points
    Measure {
        #[arg(short, long)]
        polygon: PathBuf,
    },
    /// Print the area report of a saved project
    Report {
        #[arg(short, long)]
        geojson: PathBuf,
    },
    /// Write the default detection config (.toml or .json)
    DefaultConfig {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Detect { image, ne_lat, ne_lng, sw_lat, sw_lng, config, output, address } => {
            let bounds = GeoBoundingBox::new(
                LatLng::new(*ne_lat, *ne_lng),
                LatLng::new(*sw_lat, *sw_lng),
            );
            detect(image, bounds, config.as_deref(), output, address)?;
        }
        Commands::Measure { polygon } => {
            let points = load_polygon(polygon)?;
            println!("{}", roof::measure(&points));
        }
        Commands::Report { geojson } => {
            let project = RoofProject::from_geojson_file(&geojson.to_string_lossy())?;
            println!("{}", serde_json::to_string_pretty(&project.report())?);
        }
        Commands::DefaultConfig { output } => {
            let config = DetectionConfig::default();
            match output {
                Some(path) => {
                    save_config(&config, path)?;
                    info!("📄 Default configuration saved to: {:?}", path);
                }
                None => println!("{}", config_to_string(&config, ConfigFormat::Toml)?),
            }
        }
    }

    Ok(())
}

fn detect(
    image_path: &Path,
    bounds: GeoBoundingBox,
    config_path: Option<&Path>,
    output: &Path,
    address: &str,
) -> Result<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => DetectionConfig::default(),
    };
    let detector = Detector::builder().with_config(config).build()?;
    info!("{}", detector.info());

    let image = image::open(image_path)?;
    info!("🛰️  Capture {:?}: {}x{}", image_path, image.width(), image.height());

    let detection = detector.detect(&image, bounds)?;
    if let Some(reason) = detection.diagnostic() {
        warn!("{}", reason);
        println!("{}", reason);
        return Ok(());
    }

    let mut project = RoofProject::new(address);
    project.replace_with(detection);

    for summary in project.section_summaries() {
        info!("{}: {} sqft, pitch {}", summary.section, summary.area, summary.pitch);
    }
    info!("Total: {} sqft", project.total_area_sqft());

    project.save_geojson(&output.to_string_lossy())?;
    info!("✅ Sections saved to: {:?}", output);
    Ok(())
}
