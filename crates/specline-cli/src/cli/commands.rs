use super::CliError;
use super::helpers::{
    build_grid, read_spectrum_file, read_state_file, write_spectrum_file, write_state_file,
};
use anyhow::Context;
use globset::Glob;
use specline_core::{ModelConfig, SparseLineModel, SpeclineError, doppler_grid};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(clap::Args)]
pub(super) struct DetectArgs {
    /// Two-column (wavelength, flux) text spectrum
    #[arg(long)]
    pub input: PathBuf,
    /// Destination for the fitted state record (JSON)
    #[arg(long)]
    pub output: PathBuf,
    /// Prominence threshold for line detection
    #[arg(long)]
    pub prominence: Option<f64>,
    /// Window width in pixels evaluated around each line
    #[arg(long, default_value_t = 1000)]
    pub wing_cut_pixels: usize,
}

#[derive(clap::Args)]
pub(super) struct ReconstructArgs {
    /// Fitted state record (JSON)
    #[arg(long)]
    pub state: PathBuf,
    /// Wavelength grid source: a two-column spectrum file whose first column
    /// is reused as the native grid
    #[arg(long, conflicts_with_all = ["grid_start", "grid_stop"])]
    pub grid: Option<PathBuf>,
    /// Synthesized grid start wavelength
    #[arg(long, requires = "grid_stop")]
    pub grid_start: Option<f64>,
    /// Synthesized grid stop wavelength
    #[arg(long, requires = "grid_start")]
    pub grid_stop: Option<f64>,
    /// Per-pixel velocity spacing of the synthesized grid, km/s
    #[arg(long, default_value_t = 2.0)]
    pub velocity_step: f64,
    /// Destination for the reconstructed two-column spectrum
    #[arg(long)]
    pub output: PathBuf,
    /// Radial velocity applied to every line center, km/s
    #[arg(long, default_value_t = 0.0)]
    pub radial_velocity: f64,
    /// Evaluate the additive emission variant instead of absorption
    #[arg(long)]
    pub emission: bool,
    /// Window width in pixels evaluated around each line
    #[arg(long, default_value_t = 1000)]
    pub wing_cut_pixels: usize,
}

#[derive(clap::Args)]
pub(super) struct BatchDetectArgs {
    /// Directory containing input spectra
    #[arg(long)]
    pub input_dir: PathBuf,
    /// Glob pattern selecting spectrum files inside the input directory
    #[arg(long, default_value = "*.txt")]
    pub glob: String,
    /// Directory receiving one state record per input spectrum
    #[arg(long)]
    pub output_dir: PathBuf,
    /// Prominence threshold for line detection
    #[arg(long)]
    pub prominence: Option<f64>,
    /// Window width in pixels evaluated around each line
    #[arg(long, default_value_t = 1000)]
    pub wing_cut_pixels: usize,
}

pub(super) fn run_detect_command(args: DetectArgs) -> Result<i32, CliError> {
    let (wavelength, flux) = read_spectrum_file(&args.input)?;
    let grid = build_grid(wavelength, &args.input)?;

    let model = SparseLineModel::build(
        grid,
        Some(&flux),
        ModelConfig {
            prominence: args.prominence,
            wing_cut_pixels: args.wing_cut_pixels,
            init_state: None,
        },
    )?;

    info!(
        "detected {} lines in '{}'",
        model.n_lines(),
        args.input.display()
    );
    write_state_file(&args.output, &model.state())?;
    Ok(0)
}

pub(super) fn run_reconstruct_command(args: ReconstructArgs) -> Result<i32, CliError> {
    let state = read_state_file(&args.state)?;

    let grid = match (&args.grid, args.grid_start, args.grid_stop) {
        (Some(path), _, _) => {
            let (wavelength, _) = read_spectrum_file(path)?;
            build_grid(wavelength, path)?
        }
        (None, Some(start), Some(stop)) => {
            let samples = doppler_grid(start, stop, args.velocity_step).map_err(|source| {
                SpeclineError::input_validation("INPUT.GRID_SHAPE", source.to_string())
            })?;
            build_grid(samples, &args.state)?
        }
        _ => {
            return Err(CliError::Compute(SpeclineError::input_validation(
                "INPUT.GRID_SOURCE",
                "either --grid or both --grid-start and --grid-stop must be provided",
            )));
        }
    };

    let mut model = SparseLineModel::from_state(grid, &state, args.wing_cut_pixels)?;
    model.set_radial_velocity(args.radial_velocity);

    if args.emission {
        let flux = model.reconstruct_emission()?;
        write_spectrum_file(&args.output, model.grid().samples(), &flux)?;
    } else {
        let flux = model.reconstruct()?;
        let wavelengths = model.active_wavelengths();
        write_spectrum_file(&args.output, &wavelengths, &flux)?;
    }

    info!(
        "reconstructed {} lines onto '{}'",
        model.n_lines(),
        args.output.display()
    );
    Ok(0)
}

pub(super) fn run_batch_detect_command(args: BatchDetectArgs) -> Result<i32, CliError> {
    let matcher = Glob::new(&args.glob)
        .with_context(|| format!("invalid glob pattern '{}'", args.glob))?
        .compile_matcher();

    let entries = std::fs::read_dir(&args.input_dir).map_err(|source| {
        SpeclineError::io_system(
            "IO.BATCH_INPUT_DIR",
            format!(
                "failed to read input directory '{}': {}",
                args.input_dir.display(),
                source
            ),
        )
    })?;

    let mut selected: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| matcher.is_match(name))
        })
        .collect();
    selected.sort();

    if selected.is_empty() {
        warn!(
            "no spectra matching '{}' under '{}'",
            args.glob,
            args.input_dir.display()
        );
        return Ok(0);
    }

    let mut failures = 0;
    for input in &selected {
        let detect_args = DetectArgs {
            input: input.clone(),
            output: state_output_path(&args.output_dir, input),
            prominence: args.prominence,
            wing_cut_pixels: args.wing_cut_pixels,
        };

        match run_detect_command(detect_args) {
            Ok(_) => {}
            Err(error) => {
                failures += 1;
                eprintln!("{}", error.as_specline_error().diagnostic_line());
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Compute(SpeclineError::computation(
            "RUN.BATCH_DETECT",
            format!("{failures} of {} spectra failed detection", selected.len()),
        )));
    }
    Ok(0)
}

fn state_output_path(output_dir: &std::path::Path, input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spectrum".to_string());
    output_dir.join(format!("{stem}.json"))
}
