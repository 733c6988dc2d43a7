//! Headless front end: render a region file onto its image, or validate one.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use region_editor::config::{ConfigError, EditorConfig};
use region_editor::constants::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use region_editor::format::{FormatError, RegionDocument};
use region_editor::render::{Color, RasterSurface, RenderError};
use region_editor::{EditMode, EditSession, NoopCallback};

#[derive(Parser)]
#[command(name = "region-editor")]
#[command(version, about = "Rectangle region annotation tool", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the regions of a region file over its image
    Render {
        /// Image file
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Region file (export document or bare array)
        #[arg(value_name = "REGIONS_JSON")]
        regions: PathBuf,

        /// Output PNG (defaults to <IMAGE>.regions.png)
        #[arg(short, long, value_name = "PNG")]
        out: Option<PathBuf>,

        /// Surface width in pixels
        #[arg(long, value_name = "W", default_value_t = DEFAULT_SURFACE_WIDTH)]
        width: u32,

        /// Surface height in pixels
        #[arg(long, value_name = "H", default_value_t = DEFAULT_SURFACE_HEIGHT)]
        height: u32,

        /// Index of the region to draw as selected
        #[arg(long, value_name = "N")]
        select: Option<usize>,

        /// Edit mode whose markers are drawn on the selected region
        #[arg(long, value_enum, default_value = "move")]
        mode: ModeArg,
    },

    /// Validate a region file and print it normalized
    Check {
        /// Region file (export document or bare array)
        #[arg(value_name = "REGIONS_JSON")]
        regions: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Move,
    Expand,
    Shrink,
}

impl From<ModeArg> for EditMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Move => EditMode::Move,
            ModeArg::Expand => EditMode::Expand,
            ModeArg::Shrink => EditMode::Shrink,
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{0}")]
    InvalidArgument(String),
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Commands::Render {
            image,
            regions,
            out,
            width,
            height,
            select,
            mode,
        } => cmd_render(&config, &image, &regions, out, (width, height), select, mode.into()),
        Commands::Check { regions } => cmd_check(&regions),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &EditorConfig) {
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();
}

/// An explicit config path must load; the default path is best-effort.
fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    match path {
        Some(path) => Ok(EditorConfig::load(path)?),
        None => Ok(EditorConfig::load_from_default_path().unwrap_or_default()),
    }
}

fn cmd_render(
    config: &EditorConfig,
    image_path: &Path,
    regions_path: &Path,
    out: Option<PathBuf>,
    (width, height): (u32, u32),
    select: Option<usize>,
    mode: EditMode,
) -> Result<(), CliError> {
    let surface = RasterSurface::new(width, height, Color::BLACK)?;
    let image = RasterSurface::load_image(image_path)?;
    let image_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut session = EditSession::new(surface, image, image_name, NoopCallback, config);
    let count = session.import_file(regions_path)?;

    let controller = session.controller_mut();
    if let Some(index) = select {
        let handle = controller
            .regions()
            .get(index)
            .map(|r| r.handle)
            .ok_or_else(|| {
                CliError::InvalidArgument(format!(
                    "--select {} out of range ({} regions)",
                    index, count
                ))
            })?;
        controller.set_selected_region(Some(handle));
    }
    controller.set_mode(mode);
    controller.redraw();

    let out = out.unwrap_or_else(|| image_path.with_extension("regions.png"));
    session.dispose().save(&out)?;
    println!("Rendered {} regions to {}", count, out.display());
    Ok(())
}

fn cmd_check(regions_path: &Path) -> Result<(), CliError> {
    let document = RegionDocument::read(regions_path)?;
    let regions = document.to_regions()?;

    let mut normalized = RegionDocument::new(document.file, &regions);
    if let Some(ids) = document.image_ids {
        normalized = normalized.with_image_ids(ids);
    }
    println!("{}", normalized.to_json()?);
    log::info!("{} regions OK", regions.len());
    Ok(())
}
