use macroquad::math::{DVec2, Rect, Vec2};

/// Integer tile address. Y grows upward, row 0 is the bottom of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row, counted from the bottom
    pub y: i32,
}

impl TileCoord {
    /// Build a coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Maps screen pixels to tile space and back.
///
/// Screen pixels grow right and down from the top-left corner of the grid,
/// tile space grows right and up, one unit per tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpace {
    tile_px: f64,
    tile_count: i32,
}

impl TileSpace {
    /// `tile_px` is the tile edge in pixels, `tile_count` the tiles per axis.
    pub fn new(tile_px: u32, tile_count: usize) -> Self {
        Self {
            tile_px: f64::from(tile_px),
            tile_count: tile_count as i32,
        }
    }

    /// Tile edge in pixels.
    #[inline]
    pub fn tile_px(&self) -> f64 {
        self.tile_px
    }

    /// Tiles per axis.
    #[inline]
    pub fn tile_count(&self) -> i32 {
        self.tile_count
    }

    /// Screen pixel to tile coordinates.
    ///
    /// Without `global` only the position inside the pixel's tile is
    /// returned: x in `[0, 1)`, y in `(0, 1]` since pixel rows grow downward.
    /// With `global` the tile index is added.
    pub fn screen_to_tile(&self, p: Vec2, global: bool) -> DVec2 {
        let px = f64::from(p.x);
        let py = f64::from(p.y);
        let mut fx = px.rem_euclid(self.tile_px) / self.tile_px;
        let mut fy = 1.0 - py.rem_euclid(self.tile_px) / self.tile_px;
        if global {
            fx += (px / self.tile_px).floor();
            fy += f64::from(self.tile_count - 1) - (py / self.tile_px).floor();
        }
        DVec2::new(fx, fy)
    }

    /// Top-left pixel of a tile.
    pub fn tile_to_screen(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            (f64::from(tile.x) * self.tile_px) as f32,
            (f64::from(self.tile_count - 1 - tile.y) * self.tile_px) as f32,
        )
    }

    /// Screen rectangle covered by a tile.
    pub fn tile_rect(&self, tile: TileCoord) -> Rect {
        let origin = self.tile_to_screen(tile);
        let size = self.tile_px as f32;
        Rect::new(origin.x, origin.y, size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn space() -> TileSpace {
        TileSpace::new(64, 10)
    }

    #[test]
    fn local_coordinates_flip_y() {
        let local = space().screen_to_tile(vec2(96.0, 16.0), false);
        assert_eq!(local, DVec2::new(0.5, 0.75));
    }

    #[test]
    fn global_coordinates_add_tile_offset() {
        let global = space().screen_to_tile(vec2(96.0, 16.0), true);
        assert_eq!(global, DVec2::new(1.5, 9.75));
    }

    #[test]
    fn pixel_on_row_boundary_is_top_of_lower_tile() {
        let global = space().screen_to_tile(vec2(0.0, 192.0), true);
        assert_eq!(global, DVec2::new(0.0, 7.0));
    }

    #[test]
    fn tile_to_screen_flips_rows() {
        assert_eq!(space().tile_to_screen(TileCoord::new(0, 9)), vec2(0.0, 0.0));
        assert_eq!(space().tile_to_screen(TileCoord::new(2, 0)), vec2(128.0, 576.0));
        let r = space().tile_rect(TileCoord::new(1, 8));
        assert_eq!((r.x, r.y, r.w, r.h), (64.0, 64.0, 64.0, 64.0));
    }
}
