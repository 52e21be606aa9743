use crate::config::EditorConfig;
use crate::error::WorldError;
use crate::fragment::{build_fragments, register_fragments};
use crate::grid::TileGrid;
use crate::loader::plane_loader::load_world;
use crate::raster::{Outcome, Rasterizer};
use crate::transform::{TileCoord, TileSpace};
use crate::writer::plane_writer::save_world;
use macroquad::math::{Rect, Vec2};
use std::path::{Path, PathBuf};

/// A drawn segment in screen pixels, kept for re-rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Where the drag started
    pub start: Vec2,
    /// Where the drag was released
    pub end: Vec2,
}

/// What one committed segment produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    /// Whether the walk reached the end tile
    pub outcome: Outcome,
    /// Visited tiles in walk order
    pub tiles: Vec<TileCoord>,
    /// Tile id each fragment was stored on
    pub tile_ids: Vec<u32>,
}

/// Editing session: the grid plus everything drawn so far.
pub struct Editor {
    rasterizer: Rasterizer,
    grid: TileGrid,
    segments: Vec<Segment>,
    highlights: Vec<Rect>,
    project_file: PathBuf,
}

impl Editor {
    /// Start an empty session.
    pub fn new(config: &EditorConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let tile_count = config.tile_count();
        let space = TileSpace::new(config.tile_px, tile_count);
        Ok(Self {
            rasterizer: Rasterizer::new(space, config.max_steps),
            grid: TileGrid::new(tile_count),
            segments: Vec::new(),
            highlights: Vec::new(),
            project_file: config.project_file.clone(),
        })
    }

    /// Current grid.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Coordinate mapping for this session.
    pub fn space(&self) -> &TileSpace {
        self.rasterizer.space()
    }

    /// Every committed segment, oldest first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Screen rectangles of every tile a segment has passed through.
    pub fn highlights(&self) -> &[Rect] {
        &self.highlights
    }

    /// World file used by [`Editor::save`] and [`Editor::load`].
    pub fn project_file(&self) -> &Path {
        &self.project_file
    }

    /// Turn a finished drag into fragments and store them.
    pub fn commit_segment(&mut self, start: Vec2, end: Vec2) -> CommitReport {
        let traversal = self.rasterizer.traverse(start, end);
        let space = *self.rasterizer.space();
        self.highlights
            .extend(traversal.tiles().map(|t| space.tile_rect(t)));

        let fragments = build_fragments(&traversal);
        let tile_ids = register_fragments(&mut self.grid, &fragments);
        self.segments.push(Segment { start, end });

        log::debug!(
            "segment {:?} -> {:?}: {} tiles, {:?}",
            start,
            end,
            traversal.visits.len(),
            traversal.outcome
        );

        CommitReport {
            outcome: traversal.outcome,
            tiles: traversal.tiles().collect(),
            tile_ids,
        }
    }

    /// Write the grid to the project file.
    pub fn save(&self) -> Result<(), WorldError> {
        save_world(&self.grid, &self.project_file)
    }

    /// Replace the grid with the project file's content.
    ///
    /// Drawn segments and highlights belong to the old grid and are dropped.
    pub fn load(&mut self) -> Result<(), WorldError> {
        let grid = load_world(&self.project_file)?;
        if grid.tile_count() != self.grid.tile_count() {
            return Err(WorldError::InvalidWorld(format!(
                "world is {0}x{0} tiles, session expects {1}x{1}",
                grid.tile_count(),
                self.grid.tile_count()
            )));
        }
        self.grid = grid;
        self.segments.clear();
        self.highlights.clear();
        Ok(())
    }
}
