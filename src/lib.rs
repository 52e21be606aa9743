#![warn(missing_docs)]

//! Line segments drawn over a square tile grid, stored as per-tile line
//! fragments and saved to `.plane` world files.

mod config;
mod editor;
mod error;
mod fragment;
mod grid;
mod loader {
    pub mod plane_loader;
}
mod raster;
mod transform;
mod writer {
    pub mod plane_writer;
}

pub use config::EditorConfig;
pub use editor::{CommitReport, Editor, Segment};
pub use error::WorldError;
pub use fragment::{
    build_fragments, register_fragments, Domain, Fragment, LineEquation, TileFragment,
    VERTICAL_SLOPE,
};
pub use grid::{Tile, TileGrid, FRAGMENT_ID_FLOOR, RESERVED_TILE_IDS};
pub use loader::plane_loader::{decode_world, load_world};
pub use raster::{
    Crossing, Direction, Outcome, Rasterizer, StepAxis, TileVisit, Traversal, DEFAULT_MAX_STEPS,
};
pub use transform::{TileCoord, TileSpace};
pub use writer::plane_writer::{encode_world, save_world, FRAGMENT_COLOR};
