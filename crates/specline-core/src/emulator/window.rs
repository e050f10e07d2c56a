//! Fixed-width pixel windows around each line center.
//!
//! Built once at model construction; the forward passes only ever touch
//! pixels inside these windows. Invariants: every window is a contiguous run
//! of exactly `wing_cut_pixels` indices and every index is in `[0, n_pix)`.

use crate::emulator::grid::WavelengthGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowIndex {
    wing_cut_pixels: usize,
    n_lines: usize,
    indices: Vec<usize>,
    wavelengths: Vec<f64>,
}

impl WindowIndex {
    /// Pure function of the line centers, the grid, and the window width.
    ///
    /// A window is centered on the line's nearest pixel; windows that would
    /// overhang an edge are shifted fully inside the grid, never shortened.
    pub fn build(grid: &WavelengthGrid, centers: &[f64], wing_cut_pixels: usize) -> Self {
        let n_pix = grid.len() as i64;
        let wing = wing_cut_pixels as i64;

        let mut indices = Vec::with_capacity(centers.len() * wing_cut_pixels);
        let mut wavelengths = Vec::with_capacity(centers.len() * wing_cut_pixels);
        let samples = grid.samples();

        for &center in centers {
            let center_index = grid.nearest_index(center) as i64;
            let mut start = center_index - wing / 2;
            if start < 0 {
                start = 0;
            }
            if start + wing > n_pix {
                start = (n_pix - wing - 1).max(0);
            }

            let start = start as usize;
            for offset in 0..wing_cut_pixels {
                let index = start + offset;
                indices.push(index);
                wavelengths.push(samples[index]);
            }
        }

        Self {
            wing_cut_pixels,
            n_lines: centers.len(),
            indices,
            wavelengths,
        }
    }

    pub fn wing_cut_pixels(&self) -> usize {
        self.wing_cut_pixels
    }

    pub fn n_lines(&self) -> usize {
        self.n_lines
    }

    /// Native-grid pixel indices of one line's window.
    pub fn line_indices(&self, line: usize) -> &[usize] {
        let start = line * self.wing_cut_pixels;
        &self.indices[start..start + self.wing_cut_pixels]
    }

    /// Grid wavelengths at the same window positions.
    pub fn line_wavelengths(&self, line: usize) -> &[f64] {
        let start = line * self.wing_cut_pixels;
        &self.wavelengths[start..start + self.wing_cut_pixels]
    }

    pub fn flat_indices(&self) -> &[usize] {
        &self.indices
    }
}
