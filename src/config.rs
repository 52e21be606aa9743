use crate::error::WorldError;
use crate::raster::DEFAULT_MAX_STEPS;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Session settings for the editor.
///
/// Every field has a default, so a settings file only needs to name the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window width in pixels
    pub window_width: u32,
    /// Window height in pixels
    pub window_height: u32,
    /// Edge length of one tile in pixels
    pub tile_px: u32,
    /// Target frame rate of the front end
    pub fps: u32,
    /// Where the world file is written
    pub project_file: PathBuf,
    /// Upper bound on tiles visited per segment
    pub max_steps: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 1000,
            tile_px: 64,
            fps: 60,
            project_file: PathBuf::from("generated.plane"),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl EditorConfig {
    /// Read settings from a JSON file. Unknown fields are ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| WorldError::Io {
            path: p.to_path_buf(),
            source,
        })?;
        let cfg: EditorConfig = serde_json::from_str(&txt).map_err(|source| WorldError::Json {
            path: p.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Tiles along each axis of the square grid.
    pub fn tile_count(&self) -> usize {
        if self.tile_px == 0 {
            return 0;
        }
        (self.window_width.min(self.window_height) / self.tile_px) as usize
    }

    /// Reject settings that cannot produce a grid.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.tile_px == 0 {
            return Err(WorldError::InvalidConfig("tile_px must be positive".into()));
        }
        if self.tile_count() == 0 {
            return Err(WorldError::InvalidConfig(format!(
                "window {}x{} is smaller than one {}px tile",
                self.window_width, self.window_height, self.tile_px
            )));
        }
        if self.max_steps == 0 {
            return Err(WorldError::InvalidConfig("max_steps must be positive".into()));
        }
        Ok(())
    }
}
