//! botaniq CLI
//!
//! Runs the same predictions the HTTP server exposes, against local files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use botaniq::backend::{backend_name, default_device, InferenceBackend};
use botaniq::species::{species_in, SpeciesGroup, SpeciesRef};
use botaniq::stress::{classify_reading, condition_distances, SensorReading};
use botaniq::utils::logging::{init_logging, LogConfig};
use botaniq::{HealthPredictor, ImageClassifier, ModelDir};

/// Plant species and plant health inference
#[derive(Parser, Debug)]
#[command(name = "botaniq")]
#[command(version)]
#[command(about = "Plant species and plant health inference with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Sensor values shared by the health subcommands
#[derive(clap::Args, Debug)]
struct SensorArgs {
    /// Soil moisture (%)
    #[arg(long)]
    soil_moisture: f64,

    /// Ambient temperature (°C)
    #[arg(long)]
    ambient_temp: f64,

    /// Soil temperature (°C)
    #[arg(long)]
    soil_temp: Option<f64>,

    /// Relative humidity (%)
    #[arg(long)]
    humidity: f64,

    /// Light intensity (lux)
    #[arg(long)]
    light_intensity: f64,
}

impl SensorArgs {
    fn reading(&self) -> SensorReading {
        let reading = SensorReading::new(
            self.soil_moisture,
            self.ambient_temp,
            self.humidity,
            self.light_intensity,
        );
        match self.soil_temp {
            Some(soil_temp) => reading.with_soil_temp(soil_temp),
            None => reading,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List supported species by group
    Species,

    /// Classify plant stress from sensor readings using the reference vectors
    Status {
        /// Species name or index into the species list
        #[arg(short, long)]
        species: SpeciesRef,

        #[command(flatten)]
        sensors: SensorArgs,
    },

    /// Identify the species in a photo
    Classify {
        /// Path to the input image
        #[arg(short, long)]
        image: PathBuf,

        /// Directory holding the model artifacts
        #[arg(short, long, default_value = "models")]
        models_dir: PathBuf,
    },

    /// Predict plant health with the learned health model
    PredictHealth {
        /// Directory holding the model artifacts
        #[arg(short, long, default_value = "models")]
        models_dir: PathBuf,

        #[command(flatten)]
        sensors: SensorArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };

    let _ = init_logging(&log_config);

    match cli.command {
        Commands::Species => cmd_species(),
        Commands::Status { species, sensors } => cmd_status(&species, &sensors.reading())?,
        Commands::Classify { image, models_dir } => cmd_classify(&image, &models_dir)?,
        Commands::PredictHealth {
            models_dir,
            sensors,
        } => cmd_predict_health(&models_dir, &sensors.reading())?,
    }

    Ok(())
}

fn cmd_species() {
    for group in SpeciesGroup::ALL {
        let members = species_in(group);
        println!("{} ({})", group.to_string().green().bold(), members.len());
        for name in members {
            println!("  {}", name);
        }
    }
}

fn cmd_status(species: &SpeciesRef, reading: &SensorReading) -> Result<()> {
    if !reading.is_finite() {
        bail!("sensor values must be finite numbers");
    }

    let Some(name) = species.resolve() else {
        println!("{} {}", "Species not recognized:".red(), species);
        return Ok(());
    };

    let distances = condition_distances(name, reading).context("species has no reference vectors")?;
    let condition = classify_reading(name, reading)
        .context("no reference vector is comparable with this reading")?;

    println!("{} {}", "Species:".cyan(), name);
    for (candidate, distance) in &distances {
        println!("  {:<16} distance {:>10.3}", candidate.name(), distance);
    }
    println!("{} {}", "Predicted health status:".green().bold(), condition);

    Ok(())
}

fn cmd_classify(image_path: &Path, models_dir: &Path) -> Result<()> {
    let dir = ModelDir::new(models_dir);
    let device = default_device();
    info!("Running image classifier on {}", backend_name());

    let classifier = ImageClassifier::<InferenceBackend>::load(&dir, &device)
        .with_context(|| format!("loading image model from {:?}", models_dir))?;

    let image = image::open(image_path).with_context(|| format!("opening {:?}", image_path))?;
    let result = classifier.classify(&image)?;

    println!("{} {:?}", "Image:".cyan(), image_path);
    println!("{}", result.display());
    Ok(())
}

fn cmd_predict_health(models_dir: &Path, reading: &SensorReading) -> Result<()> {
    let dir = ModelDir::new(models_dir);
    let device = default_device();
    info!("Running health model on {}", backend_name());

    let predictor = HealthPredictor::<InferenceBackend>::load(&dir, &device)
        .with_context(|| format!("loading health model from {:?}", models_dir))?;

    let result = predictor.predict_reading(reading)?;
    println!("{}", result.display());
    Ok(())
}
