mod grid;
mod placement;

pub use grid::*;
pub use placement::*;
