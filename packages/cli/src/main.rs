#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Exporter for the SF Bay Area jobs map.
//!
//! Loads the tract and basemap documents once, then either renders the
//! view given on the command line (`render`, `density`) or opens an
//! interactive menu for choosing category, mode, density floor and frame
//! and exporting the result as SVG.
//!
//! Uses `indicatif-log-bridge` (via [`jobs_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and download bars never fight for the terminal.

mod interactive;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jobs_map_cli_utils::IndicatifProgress;
use jobs_map_fetch::{SessionData, Source};
use jobs_map_jobs::{load_config, map_config};
use jobs_map_jobs_models::config::LevelScale;
use jobs_map_jobs_models::{Category, DensityFloor, Mode, ViewState};
use jobs_map_render::{Export, Session};

#[derive(Parser)]
#[command(name = "jobs_map", about = "SF Bay Area jobs map exporter")]
struct Cli {
    /// Tract topology URL or file (defaults to the configured URL)
    #[arg(long, global = true)]
    tracts: Option<String>,
    /// Basemap topology URL or file (defaults to the configured URL)
    #[arg(long, global = true)]
    basemap: Option<String>,
    /// Map configuration TOML (defaults to the built-in configuration)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory exported SVG files are written to
    #[arg(long, global = true, default_value = "data/exports")]
    out: PathBuf,
    /// Level-mode classification: `cluster` or `quantile`
    #[arg(long, global = true)]
    level_scale: Option<LevelScale>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one view and export its map and legend
    Render {
        /// Job category: make, serv, prof or supp
        #[arg(long, default_value = "prof")]
        category: Category,
        /// Mapped value: change or level
        #[arg(long, default_value = "level")]
        mode: Mode,
        /// Lowest density quintile (0-4) drawn at full opacity
        #[arg(long, default_value = "1", value_parser = parse_floor)]
        floor: DensityFloor,
        /// Leave out the print crop frame
        #[arg(long)]
        no_frame: bool,
    },
    /// Export the job density map and legend
    Density,
}

fn parse_floor(value: &str) -> Result<DensityFloor, String> {
    let value: u8 = value.parse::<u8>().map_err(|e| e.to_string())?;
    DensityFloor::new(value).map_err(|e| e.to_string())
}

/// Writes `exports` into `out` and prints the written paths.
fn write_exports(out: &Path, exports: &[Export]) -> Result<(), Box<dyn std::error::Error>> {
    for export in exports {
        let path = export.write_to(out)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = jobs_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => map_config(),
    };
    if let Some(scale) = cli.level_scale {
        config.level.scale = scale;
    }

    let tracts = Source::parse(cli.tracts.as_deref().unwrap_or(&config.data.tracts_url));
    let basemap = Source::parse(cli.basemap.as_deref().unwrap_or(&config.data.basemap_url));
    let data = SessionData::new(tracts, basemap).with_progress(
        IndicatifProgress::download_bar(&multi, "Tracts"),
        IndicatifProgress::download_bar(&multi, "Basemap"),
    );
    let (tracts, basemap) = data.load_all().await?;

    let mut session = Session::new(config, tracts, basemap)?;

    match cli.command {
        Some(Commands::Render {
            category,
            mode,
            floor,
            no_frame,
        }) => {
            let view = ViewState::default()
                .with_category(category)
                .with_mode(mode)
                .with_floor(floor)
                .with_frame(!no_frame);
            session.update(view)?;
            write_exports(&cli.out, &[session.export_map()?, session.export_legend()?])?;
        }
        Some(Commands::Density) => {
            write_exports(
                &cli.out,
                &[session.export_density_map(), session.export_density_legend()],
            )?;
        }
        None => interactive::run(&mut session, &cli.out)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_flags() {
        let cli = Cli::try_parse_from([
            "jobs_map",
            "render",
            "--category",
            "make",
            "--mode",
            "change",
            "--floor",
            "0",
            "--no-frame",
            "--level-scale",
            "quantile",
        ])
        .unwrap();

        assert_eq!(cli.level_scale, Some(LevelScale::Quantile));
        assert_eq!(cli.out, PathBuf::from("data/exports"));
        let Some(Commands::Render {
            category,
            mode,
            floor,
            no_frame,
        }) = cli.command
        else {
            panic!("expected render command");
        };
        assert_eq!(category, Category::Make);
        assert_eq!(mode, Mode::Change);
        assert_eq!(floor.value(), 0);
        assert!(no_frame);
    }

    #[test]
    fn rejects_out_of_range_floor() {
        assert!(Cli::try_parse_from(["jobs_map", "render", "--floor", "5"]).is_err());
        assert!(Cli::try_parse_from(["jobs_map", "--level-scale", "jenks"]).is_err());
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["jobs_map", "--tracts", "tracts.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.tracts.as_deref(), Some("tracts.json"));
    }
}
