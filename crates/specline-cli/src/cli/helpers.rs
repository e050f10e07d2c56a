use specline_core::{ModelState, SpeclineError, WavelengthGrid};
use std::path::Path;

/// Read a two-column whitespace-separated (wavelength, flux) text spectrum.
/// Blank lines and `#` comments are skipped.
pub(super) fn read_spectrum_file(path: &Path) -> Result<(Vec<f64>, Vec<f64>), SpeclineError> {
    let source = std::fs::read_to_string(path).map_err(|source| {
        SpeclineError::io_system(
            "IO.SPECTRUM_READ",
            format!("failed to read spectrum '{}': {}", path.display(), source),
        )
    })?;

    let mut wavelength = Vec::new();
    let mut flux = Vec::new();
    for (line_number, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut columns = trimmed.split_whitespace();
        let wl = parse_column(columns.next(), path, line_number + 1, "wavelength")?;
        let fl = parse_column(columns.next(), path, line_number + 1, "flux")?;
        wavelength.push(wl);
        flux.push(fl);
    }

    Ok((wavelength, flux))
}

fn parse_column(
    column: Option<&str>,
    path: &Path,
    line_number: usize,
    label: &str,
) -> Result<f64, SpeclineError> {
    let raw = column.ok_or_else(|| {
        SpeclineError::input_validation(
            "INPUT.SPECTRUM_COLUMNS",
            format!(
                "missing {} column in '{}' at line {}",
                label,
                path.display(),
                line_number
            ),
        )
    })?;

    raw.parse::<f64>().map_err(|_| {
        SpeclineError::input_validation(
            "INPUT.SPECTRUM_COLUMNS",
            format!(
                "invalid {} value '{}' in '{}' at line {}",
                label,
                raw,
                path.display(),
                line_number
            ),
        )
    })
}

pub(super) fn build_grid(samples: Vec<f64>, path: &Path) -> Result<WavelengthGrid, SpeclineError> {
    WavelengthGrid::new(samples).map_err(|source| {
        SpeclineError::input_validation(
            "INPUT.GRID_SHAPE",
            format!("wavelength grid in '{}' is invalid: {}", path.display(), source),
        )
    })
}

pub(super) fn read_state_file(path: &Path) -> Result<ModelState, SpeclineError> {
    let source = std::fs::read_to_string(path).map_err(|source| {
        SpeclineError::io_system(
            "IO.STATE_READ",
            format!("failed to read state record '{}': {}", path.display(), source),
        )
    })?;

    ModelState::from_json_str(&source).map_err(|source| {
        SpeclineError::input_validation(
            "INPUT.STATE_JSON",
            format!("state record '{}' is not valid JSON: {}", path.display(), source),
        )
    })
}

pub(super) fn write_state_file(path: &Path, state: &ModelState) -> Result<(), SpeclineError> {
    let rendered = state.to_json_string().map_err(|source| {
        SpeclineError::internal(
            "SYS.STATE_ENCODE",
            format!("failed to encode state record: {source}"),
        )
    })?;
    write_text_file(path, &rendered, "IO.STATE_WRITE")
}

pub(super) fn write_spectrum_file(
    path: &Path,
    wavelength: &[f64],
    flux: &[f64],
) -> Result<(), SpeclineError> {
    let mut lines = Vec::with_capacity(flux.len() + 1);
    lines.push("# wavelength flux".to_string());
    for (wl, fl) in wavelength.iter().zip(flux) {
        lines.push(format!("{wl:.6} {fl:.8e}"));
    }
    write_text_file(path, &lines.join("\n"), "IO.SPECTRUM_WRITE")
}

fn write_text_file(
    path: &Path,
    contents: &str,
    placeholder: &'static str,
) -> Result<(), SpeclineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| {
                SpeclineError::io_system(
                    placeholder,
                    format!(
                        "failed to create output directory '{}': {}",
                        parent.display(),
                        source
                    ),
                )
            })?;
        }
    }

    std::fs::write(path, contents).map_err(|source| {
        SpeclineError::io_system(
            placeholder,
            format!("failed to write '{}': {}", path.display(), source),
        )
    })
}
