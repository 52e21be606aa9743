//! Tile-by-tile walk of a line segment (2D DDA).

use crate::transform::{TileCoord, TileSpace};
use macroquad::math::{DVec2, Vec2};

/// Step budget used when the settings do not override it.
pub const DEFAULT_MAX_STEPS: usize = 128;

/// Orientation of a segment in tile space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    /// No vertical movement, slope 0
    Horizontal,
    /// No horizontal movement. Zero-length segments land here too.
    Vertical,
    /// Any other line, carrying `dy / dx`
    Oblique(f64),
}

impl Direction {
    fn of(dir: DVec2) -> Self {
        if dir.x == 0.0 {
            Direction::Vertical
        } else if dir.y == 0.0 {
            Direction::Horizontal
        } else {
            Direction::Oblique(dir.y / dir.x)
        }
    }

    /// `dy / dx`, `None` for vertical lines.
    pub fn slope(self) -> Option<f64> {
        match self {
            Direction::Horizontal => Some(0.0),
            Direction::Vertical => None,
            Direction::Oblique(m) => Some(m),
        }
    }
}

/// Axis along which the walk crossed into a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAxis {
    /// Crossed a vertical tile edge
    X,
    /// Crossed a horizontal tile edge
    Y,
}

/// Where the walk entered a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Hit point on the tile edge, global tile coordinates
    pub point: DVec2,
    /// Axis that was stepped
    pub axis: StepAxis,
}

/// One tile on the walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileVisit {
    /// Tile coordinate, possibly outside the grid
    pub tile: TileCoord,
    /// `None` for the start tile
    pub crossing: Option<Crossing>,
}

impl TileVisit {
    /// Crossing point relative to this tile's lower-left corner.
    pub fn local_hit(&self) -> Option<DVec2> {
        self.crossing.map(|c| c.point - tile_origin(self.tile))
    }
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The destination tile was visited
    Reached,
    /// The step budget ran out, or the walk passed the end point, before
    /// the destination tile was visited
    Exhausted,
}

/// Result of walking one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    /// Visited tiles in walk order
    pub visits: Vec<TileVisit>,
    /// Unit direction in tile space, zero for a zero-length segment
    pub dir: DVec2,
    /// Orientation and slope
    pub direction: Direction,
    /// Start point inside the start tile
    pub local_start: DVec2,
    /// End point inside the destination tile
    pub local_end: DVec2,
    /// Tile holding the end point
    pub destination: TileCoord,
    /// Whether `destination` was reached
    pub outcome: Outcome,
}

impl Traversal {
    /// Visited tile coordinates in order.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.visits.iter().map(|v| v.tile)
    }

    /// `true` when the walk reached the destination tile.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Reached
    }
}

/// Progress along one axis.
struct AxisWalk {
    step: i32,
    delta: Option<f64>,
    next: Option<f64>,
}

impl AxisWalk {
    fn new(origin: f64, dir: f64, cell: i32) -> Self {
        if dir == 0.0 {
            return Self {
                step: 1,
                delta: None,
                next: None,
            };
        }
        let step = if dir < 0.0 { -1 } else { 1 };
        let delta = 1.0 / dir.abs();
        let to_edge = if step > 0 {
            f64::from(cell) + 1.0 - origin
        } else {
            origin - f64::from(cell)
        };
        Self {
            step,
            delta: Some(delta),
            next: Some(to_edge * delta),
        }
    }

    fn advance(&mut self) -> i32 {
        if let (Some(next), Some(delta)) = (self.next, self.delta) {
            self.next = Some(next + delta);
        }
        self.step
    }
}

fn tile_origin(tile: TileCoord) -> DVec2 {
    DVec2::new(f64::from(tile.x), f64::from(tile.y))
}

/// Cell index of `g`. A value sitting on a tile edge belongs to the tile on
/// its positive side when `positive` is set, otherwise to the one below it.
fn edge_cell(g: f64, positive: bool) -> i32 {
    if positive {
        g.floor() as i32
    } else {
        (g.ceil() - 1.0) as i32
    }
}

/// Walks segments over a [`TileSpace`].
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    space: TileSpace,
    max_steps: usize,
}

impl Rasterizer {
    /// `max_steps` bounds the number of tiles one walk may visit.
    pub fn new(space: TileSpace, max_steps: usize) -> Self {
        Self { space, max_steps }
    }

    /// Coordinate mapping in use.
    #[inline]
    pub fn space(&self) -> &TileSpace {
        &self.space
    }

    /// Walk the segment between two screen points.
    ///
    /// An end point lying exactly on a tile edge is attributed to the tile
    /// the segment is inside of at that point, so a segment that stops on an
    /// edge does not visit the tile beyond it. The start tile and destination
    /// are not clamped to the grid.
    pub fn traverse(&self, start: Vec2, end: Vec2) -> Traversal {
        let global_start = self.space.screen_to_tile(start, true);
        let global_end = self.space.screen_to_tile(end, true);

        let raw = DVec2::new(
            f64::from(end.x) - f64::from(start.x),
            f64::from(start.y) - f64::from(end.y),
        );
        let length = raw.length();
        let dir = if length == 0.0 { DVec2::ZERO } else { raw / length };
        let direction = Direction::of(dir);
        let span = length / self.space.tile_px();

        let first = TileCoord::new(
            edge_cell(global_start.x, dir.x >= 0.0),
            edge_cell(global_start.y, dir.y > 0.0),
        );
        let destination = TileCoord::new(
            edge_cell(global_end.x, dir.x <= 0.0),
            edge_cell(global_end.y, dir.y < 0.0),
        );

        let mut walk_x = AxisWalk::new(global_start.x, dir.x, first.x);
        let mut walk_y = AxisWalk::new(global_start.y, dir.y, first.y);

        let mut visits = Vec::new();
        let mut tile = first;
        let mut crossing = None;
        let mut outcome = Outcome::Exhausted;

        for _ in 0..self.max_steps {
            visits.push(TileVisit { tile, crossing });
            if tile == destination {
                outcome = Outcome::Reached;
                break;
            }

            let (axis, t) = match (walk_x.next, walk_y.next) {
                (Some(tx), Some(ty)) if tx < ty => (StepAxis::X, tx),
                (Some(_), Some(ty)) => (StepAxis::Y, ty),
                (Some(tx), None) => (StepAxis::X, tx),
                (None, Some(ty)) => (StepAxis::Y, ty),
                (None, None) => break,
            };
            // the end point lies on or before this edge
            if t >= span - 1e-9 * (1.0 + span) {
                break;
            }

            match axis {
                StepAxis::X => tile.x += walk_x.advance(),
                StepAxis::Y => tile.y += walk_y.advance(),
            }
            crossing = Some(Crossing {
                point: global_start + dir * t,
                axis,
            });
        }

        if outcome == Outcome::Exhausted {
            log::warn!(
                "segment walk from {:?} stopped after {} tiles without reaching {:?}",
                first,
                visits.len(),
                destination
            );
        }

        Traversal {
            visits,
            dir,
            direction,
            local_start: global_start - tile_origin(first),
            local_end: global_end - tile_origin(destination),
            destination,
            outcome,
        }
    }
}
