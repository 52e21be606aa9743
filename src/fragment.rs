//! Per-tile line equations derived from a walked segment.

use crate::grid::TileGrid;
use crate::raster::{Direction, StepAxis, TileVisit, Traversal};
use crate::transform::TileCoord;
use macroquad::math::DVec2;

/// Slope written to world files for vertical lines.
pub const VERTICAL_SLOPE: f64 = 1e30;

/// Line equation in a tile's local unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEquation {
    /// `y = slope * x + intercept`
    Sloped {
        /// `dy / dx`
        slope: f64,
        /// `y` at local `x = 0`
        intercept: f64,
    },
    /// `x = const`
    Vertical {
        /// Local x of the line
        x: f64,
    },
}

impl LineEquation {
    /// Line with `direction` passing through local point `p`.
    pub fn through(direction: Direction, p: DVec2) -> Self {
        match direction.slope() {
            Some(slope) => LineEquation::Sloped {
                slope,
                intercept: p.y - slope * p.x,
            },
            None => LineEquation::Vertical { x: p.x },
        }
    }

    /// Axis the fragment's domain is measured along.
    pub fn domain_axis(&self) -> StepAxis {
        match self {
            LineEquation::Sloped { .. } => StepAxis::X,
            LineEquation::Vertical { .. } => StepAxis::Y,
        }
    }

    /// `(slope, intercept)` pair as stored in world files.
    pub fn slope_intercept(&self) -> (f64, f64) {
        match *self {
            LineEquation::Sloped { slope, intercept } => (slope, intercept),
            LineEquation::Vertical { x } => (VERTICAL_SLOPE, -VERTICAL_SLOPE * x),
        }
    }

    /// Inverse of [`LineEquation::slope_intercept`].
    pub fn from_slope_intercept(slope: f64, intercept: f64) -> Self {
        if slope.abs() >= VERTICAL_SLOPE {
            LineEquation::Vertical {
                x: -intercept / slope,
            }
        } else {
            LineEquation::Sloped { slope, intercept }
        }
    }
}

/// Interval along the domain axis where a fragment is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Lower end
    pub start: f64,
    /// Upper end
    pub end: f64,
}

impl Domain {
    /// The whole unit interval.
    pub const FULL: Domain = Domain {
        start: 0.0,
        end: 1.0,
    };

    /// Build a domain.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// A line fragment registered on a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Per-tile id, strictly increasing in insertion order
    pub id: u32,
    /// Local line equation
    pub equation: LineEquation,
    /// Valid part of the line
    pub domain: Domain,
}

/// A fragment not yet stored in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFragment {
    /// Tile the fragment belongs to
    pub tile: TileCoord,
    /// Local line equation
    pub equation: LineEquation,
    /// Valid part of the line
    pub domain: Domain,
}

/// Local entry point into a tile the walk stepped into: the stepped axis sits
/// on the tile edge (0 moving forward, 1 moving backward), the other axis is
/// the hit position inside the tile.
fn displacement(dir: DVec2, visit: &TileVisit) -> Option<DVec2> {
    let crossing = visit.crossing?;
    let hit = visit.local_hit()?;
    let edge = |d: f64| if d >= 0.0 { 0.0 } else { 1.0 };
    Some(match crossing.axis {
        StepAxis::X => DVec2::new(edge(dir.x), hit.y),
        StepAxis::Y => DVec2::new(hit.x, edge(dir.y)),
    })
}

/// One fragment per visited tile.
///
/// The first fragment starts at the true start point and the last ends at
/// the true end point; everything between covers the full unit interval.
/// When the walk runs backward along the domain axis the true values swap
/// ends. An exhausted walk has no true end, so its last fragment stays full.
pub fn build_fragments(traversal: &Traversal) -> Vec<TileFragment> {
    let count = traversal.visits.len();
    let mut out = Vec::with_capacity(count);

    for (i, visit) in traversal.visits.iter().enumerate() {
        let entry = displacement(traversal.dir, visit).unwrap_or(traversal.local_start);
        let equation = LineEquation::through(traversal.direction, entry);

        let (true_start, true_end, forward) = match equation.domain_axis() {
            StepAxis::X => (
                traversal.local_start.x,
                traversal.local_end.x,
                traversal.dir.x >= 0.0,
            ),
            StepAxis::Y => (
                traversal.local_start.y,
                traversal.local_end.y,
                traversal.dir.y >= 0.0,
            ),
        };
        let first = i == 0;
        let last = i + 1 == count && traversal.is_complete();

        let domain = if forward {
            Domain::new(
                if first { true_start } else { 0.0 },
                if last { true_end } else { 1.0 },
            )
        } else {
            Domain::new(
                if last { true_end } else { 0.0 },
                if first { true_start } else { 1.0 },
            )
        };

        out.push(TileFragment {
            tile: visit.tile,
            equation,
            domain,
        });
    }

    out
}

/// Store fragments in the grid, assigning tile ids as needed. Returns the
/// tile id each fragment landed on.
pub fn register_fragments(grid: &mut TileGrid, fragments: &[TileFragment]) -> Vec<u32> {
    fragments
        .iter()
        .map(|f| {
            let id = grid.assign_id(f.tile);
            grid.add_fragment(f.tile, f.equation, f.domain);
            id
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Crossing, Outcome};

    fn visit(x: i32, y: i32, crossing: Option<Crossing>) -> TileVisit {
        TileVisit {
            tile: TileCoord::new(x, y),
            crossing,
        }
    }

    #[test]
    fn displacement_on_x_step_backward() {
        let v = visit(
            2,
            4,
            Some(Crossing {
                point: DVec2::new(3.0, 4.25),
                axis: StepAxis::X,
            }),
        );
        let d = displacement(DVec2::new(-0.8, 0.6), &v).expect("crossing");
        assert_eq!(d, DVec2::new(1.0, 0.25));
    }

    #[test]
    fn displacement_on_y_step_forward() {
        let v = visit(
            1,
            5,
            Some(Crossing {
                point: DVec2::new(1.75, 5.0),
                axis: StepAxis::Y,
            }),
        );
        let d = displacement(DVec2::new(0.6, 0.8), &v).expect("crossing");
        assert_eq!(d, DVec2::new(0.75, 0.0));
    }

    #[test]
    fn vertical_equation_round_trips_through_sentinel() {
        let eq = LineEquation::Vertical { x: 0.25 };
        let (m, b) = eq.slope_intercept();
        assert_eq!(m, VERTICAL_SLOPE);
        match LineEquation::from_slope_intercept(m, b) {
            LineEquation::Vertical { x } => assert!((x - 0.25).abs() < 1e-12),
            other => panic!("expected vertical, got {:?}", other),
        }
    }

    #[test]
    fn backward_single_tile_swaps_domain_ends() {
        let t = Traversal {
            visits: vec![visit(0, 0, None)],
            dir: DVec2::new(-1.0, 0.0),
            direction: Direction::Horizontal,
            local_start: DVec2::new(0.8, 0.5),
            local_end: DVec2::new(0.2, 0.5),
            destination: TileCoord::new(0, 0),
            outcome: Outcome::Reached,
        };
        let f = build_fragments(&t);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].domain, Domain::new(0.2, 0.8));
        assert_eq!(
            f[0].equation,
            LineEquation::Sloped {
                slope: 0.0,
                intercept: 0.5
            }
        );
    }

    #[test]
    fn register_reuses_tile_ids() {
        let mut grid = TileGrid::new(3);
        let frag = TileFragment {
            tile: TileCoord::new(1, 1),
            equation: LineEquation::Vertical { x: 0.5 },
            domain: Domain::FULL,
        };
        let ids = register_fragments(&mut grid, &[frag, frag]);
        assert_eq!(ids[0], ids[1]);
        let stored: Vec<u32> = grid
            .get(TileCoord::new(1, 1))
            .fragments()
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(stored, vec![11, 12]);
    }
}
