//! Peak primitives over one-dimensional signals.
//!
//! Local maxima are strict: a sample (or the midpoint of a flat plateau)
//! surrounded by strictly smaller neighbors. Prominence is topographic: the
//! drop from the peak to the higher of the two interval minima reached before
//! a taller sample or the signal edge.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProminenceData {
    pub prominence: f64,
    pub left_base: usize,
    pub right_base: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeakError {
    #[error("peak index {index} is out of range for a signal of length {len}")]
    PeakOutOfRange { index: usize, len: usize },
    #[error("signal length mismatch: wavelength={wavelength}, flux={flux}")]
    LengthMismatch { wavelength: usize, flux: usize },
    #[error("prominence bases [{left_base}, {right_base}] do not bracket peak {peak}")]
    InvalidBases {
        peak: usize,
        left_base: usize,
        right_base: usize,
    },
}

/// Find interior local maxima, resolving flat plateaus to their midpoint, and
/// keep only peaks separated by at least `min_distance` samples (the taller
/// peak wins a conflict).
pub fn local_maxima(signal: &[f64], min_distance: usize) -> Vec<usize> {
    let peaks = strict_maxima(signal);
    if min_distance <= 1 || peaks.len() < 2 {
        return peaks;
    }
    select_by_distance(&peaks, signal, min_distance)
}

fn strict_maxima(signal: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                let left_edge = i;
                let right_edge = ahead - 1;
                peaks.push(left_edge + (right_edge - left_edge) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

fn select_by_distance(peaks: &[usize], signal: &[f64], min_distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    // Visit peaks from tallest to shortest; each kept peak suppresses every
    // unresolved neighbor closer than the separation floor.
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| {
        signal[peaks[a]]
            .total_cmp(&signal[peaks[b]])
            .then(a.cmp(&b))
    });

    for &candidate in order.iter().rev() {
        if !keep[candidate] {
            continue;
        }

        let mut neighbor = candidate;
        while neighbor > 0 && peaks[candidate] - peaks[neighbor - 1] < min_distance {
            neighbor -= 1;
            keep[neighbor] = false;
        }

        let mut neighbor = candidate + 1;
        while neighbor < peaks.len() && peaks[neighbor] - peaks[candidate] < min_distance {
            keep[neighbor] = false;
            neighbor += 1;
        }
    }

    peaks
        .iter()
        .zip(&keep)
        .filter_map(|(&peak, &kept)| kept.then_some(peak))
        .collect()
}

/// Topographic prominence of `peak`, together with the indices of the two
/// interval minima that define it.
pub fn peak_prominence(signal: &[f64], peak: usize) -> Result<ProminenceData, PeakError> {
    if peak >= signal.len() {
        return Err(PeakError::PeakOutOfRange {
            index: peak,
            len: signal.len(),
        });
    }

    let height = signal[peak];

    let mut left_min = height;
    let mut left_base = peak;
    let mut i = peak;
    while i > 0 && signal[i - 1] <= height {
        i -= 1;
        if signal[i] < left_min {
            left_min = signal[i];
            left_base = i;
        }
    }

    let mut right_min = height;
    let mut right_base = peak;
    let mut i = peak;
    while i + 1 < signal.len() && signal[i + 1] <= height {
        i += 1;
        if signal[i] < right_min {
            right_min = signal[i];
            right_base = i;
        }
    }

    Ok(ProminenceData {
        prominence: height - left_min.max(right_min),
        left_base,
        right_base,
    })
}

/// Width of `peak` in fractional samples at half its prominence, with the
/// crossings linearly interpolated and the search bounded by the bases.
pub fn width_at_half_prominence(
    signal: &[f64],
    peak: usize,
    data: &ProminenceData,
) -> Result<f64, PeakError> {
    if peak >= signal.len() {
        return Err(PeakError::PeakOutOfRange {
            index: peak,
            len: signal.len(),
        });
    }
    if data.left_base > peak || data.right_base < peak || data.right_base >= signal.len() {
        return Err(PeakError::InvalidBases {
            peak,
            left_base: data.left_base,
            right_base: data.right_base,
        });
    }

    let height = signal[peak] - data.prominence * 0.5;

    let mut i = peak;
    while i > data.left_base && signal[i] > height {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if signal[i] < height {
        left_ip += (height - signal[i]) / (signal[i + 1] - signal[i]);
    }

    let mut i = peak;
    while i < data.right_base && signal[i] > height {
        i += 1;
    }
    let mut right_ip = i as f64;
    if signal[i] < height {
        right_ip -= (height - signal[i]) / (signal[i - 1] - signal[i]);
    }

    Ok(right_ip - left_ip)
}
