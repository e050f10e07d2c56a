pub mod grid;
pub mod model;
pub mod state;
pub mod window;

pub use grid::{GridError, WavelengthGrid, doppler_grid};
pub use model::{ModelConfig, SparseLineModel};
pub use state::{ModelState, StateError};
pub use window::WindowIndex;
