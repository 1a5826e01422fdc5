//! Command-line front end: turns arguments into a plant table.
//!
//! This module defines [`Cli`], the parsed arguments, and [`App`], which
//! owns the resolved configuration and leaf shapes and runs the assembly.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use maize_core::leaf_shape::LeafShapeParams;
use maize_core::{LeafShapeDb, PhytomerRecord, PlantConfig, assemble_seeded};
use tracing::info;

/// Number of stations of the generated leaf shapes when no database is given.
const DEFAULT_LEAF_SEGMENTS: usize = 50;

/// Generate the architecture of a maize plant from global parameters.
///
/// The table is printed to stdout as JSON, one object per phytomer.
#[derive(Parser, Debug, Default)]
#[command(name = "simple-maize", version)]
pub struct Cli {
    /// JSON plant configuration; unspecified fields take their defaults
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON leaf shape database; parametric leaves are generated otherwise
    #[arg(long, value_name = "FILE")]
    pub leaf_db: Option<PathBuf>,

    /// Number of phytomers
    #[arg(long)]
    pub phytomer: Option<u32>,

    /// Total leaf area of the plant
    #[arg(long)]
    pub plant_area: Option<f64>,

    /// Stem height
    #[arg(long)]
    pub plant_height: Option<f64>,

    /// Seed of the azimuth jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Decimal leaf stage to interpolate the plant at
    #[arg(long)]
    pub stage: Option<f64>,

    /// Alternating instead of spiral phyllotaxy
    #[arg(long)]
    pub alternate: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Resolved run: configuration, leaf shapes and output options.
pub struct App {
    config: PlantConfig,
    leaves: LeafShapeDb,
    pretty: bool,
}

impl App {
    /// Resolves the configuration file, command-line overrides and leaf shapes.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => PlantConfig::from_json_file(path)
                .with_context(|| format!("reading configuration {}", path.display()))?,
            None => PlantConfig::default(),
        };

        if let Some(phytomer) = cli.phytomer {
            config.phytomer = phytomer;
        }
        if let Some(area) = cli.plant_area {
            config.plant_area = area;
        }
        if let Some(height) = cli.plant_height {
            config.plant_height = height;
        }
        if cli.seed.is_some() {
            config.seed = cli.seed;
        }
        if cli.stage.is_some() {
            config.stage = cli.stage;
        }
        if cli.alternate {
            config.spiral = false;
        }

        let leaves = match &cli.leaf_db {
            Some(path) => LeafShapeDb::load(path)
                .with_context(|| format!("loading leaf shape database {}", path.display()))?,
            None => LeafShapeDb::parametric(
                &config,
                &LeafShapeParams::default(),
                DEFAULT_LEAF_SEGMENTS,
            )
            .context("generating parametric leaf shapes")?,
        };

        Ok(Self {
            config,
            leaves,
            pretty: cli.pretty,
        })
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    /// Assembles the plant (and interpolates it when a stage is configured).
    pub fn run(&self) -> Result<Vec<PhytomerRecord>> {
        let table = assemble_seeded(&self.config, &self.leaves).context("assembling plant")?;
        info!(rows = table.len(), "plant table ready");
        Ok(table)
    }

    /// Writes `table` as JSON followed by a newline.
    pub fn write(&self, table: &[PhytomerRecord], out: &mut impl Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, table)?;
        } else {
            serde_json::to_writer(&mut *out, table)?;
        }
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "simple-maize",
            "--phytomer",
            "12",
            "--seed",
            "42",
            "--stage",
            "5.5",
            "--alternate",
        ]);
        let app = App::from_cli(&cli).unwrap();
        let cfg = app.config();
        assert_eq!(cfg.phytomer, 12);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.stage, Some(5.5));
        assert!(!cfg.spiral);
        assert_eq!(cfg.plant_area, 10000.0);
    }

    #[test]
    fn run_produces_one_row_per_phytomer() {
        let cli = Cli {
            phytomer: Some(10),
            seed: Some(1),
            ..Cli::default()
        };
        let app = App::from_cli(&cli).unwrap();
        let table = app.run().unwrap();
        assert_eq!(table.len(), 10);
    }

    #[test]
    fn output_is_a_json_array_of_records() {
        let cli = Cli {
            phytomer: Some(4),
            seed: Some(2),
            ..Cli::default()
        };
        let app = App::from_cli(&cli).unwrap();
        let table = app.run().unwrap();
        let mut buf = Vec::new();
        app.write(&table, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["leaf_rank"], 1);
        assert!(rows[0]["leaf_shape"]["x"].is_array());
        assert!(rows[0]["development"].is_null());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/plant.json")),
            ..Cli::default()
        };
        let err = App::from_cli(&cli).err().unwrap();
        assert!(format!("{err:#}").contains("reading configuration"));
    }
}
