use crate::error::WorldError;
use crate::fragment::{Domain, LineEquation};
use crate::grid::TileGrid;
use crate::transform::TileCoord;
use std::collections::HashSet;
use std::path::Path;

fn number<T: std::str::FromStr>(line: usize, field: &str, what: &str) -> Result<T, WorldError> {
    field
        .parse()
        .map_err(|_| WorldError::parse(line, format!("bad {what} '{field}'")))
}

fn expect_tag(line: usize, found: &str, tag: &str) -> Result<(), WorldError> {
    if found == tag {
        Ok(())
    } else {
        Err(WorldError::parse(line, format!("expected '{tag}', found '{found}'")))
    }
}

/// Parse world file text into a grid.
///
/// Tile ids are restored as written and fragments are appended in file
/// order, which re-creates their per-tile ids.
pub fn decode_world(text: &str) -> Result<TileGrid, WorldError> {
    let mut grid: Option<TileGrid> = None;
    let mut rows_read = 0usize;
    let mut seen = HashSet::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut fields = raw.split_whitespace();
        let Some(tag) = fields.next() else {
            continue;
        };
        let rest: Vec<&str> = fields.collect();

        match tag {
            "s" => {
                if grid.is_some() {
                    return Err(WorldError::parse(line, "duplicate size record"));
                }
                if rest.len() != 2 {
                    return Err(WorldError::parse(line, "size record needs width and height"));
                }
                let w: usize = number(line, rest[0], "width")?;
                let h: usize = number(line, rest[1], "height")?;
                if w != h {
                    return Err(WorldError::parse(line, format!("grid must be square, got {w}x{h}")));
                }
                if w == 0 {
                    return Err(WorldError::parse(line, "grid size must be positive"));
                }
                grid = Some(TileGrid::new(w));
            }
            "w" => {
                let g = grid
                    .as_mut()
                    .ok_or_else(|| WorldError::parse(line, "row before size record"))?;
                let n = g.tile_count();
                if rows_read >= n {
                    return Err(WorldError::parse(line, format!("more than {n} rows")));
                }
                if rest.len() != n {
                    return Err(WorldError::parse(
                        line,
                        format!("row has {} tiles, expected {n}", rest.len()),
                    ));
                }
                let y = (n - 1 - rows_read) as i32;
                for (x, field) in rest.iter().enumerate() {
                    let id: u32 = number(line, field, "tile id")?;
                    if id != 0 && !seen.insert(id) {
                        return Err(WorldError::parse(line, format!("tile id {id} used twice")));
                    }
                    g.set_id(TileCoord::new(x as i32, y), id);
                }
                rows_read += 1;
            }
            "t" => {
                let g = grid
                    .as_mut()
                    .ok_or_else(|| WorldError::parse(line, "fragment before size record"))?;
                if rows_read != g.tile_count() {
                    return Err(WorldError::parse(line, "fragment before all rows"));
                }
                if rest.len() != 11 {
                    return Err(WorldError::parse(line, "fragment record has wrong field count"));
                }
                let id: u32 = number(line, rest[0], "tile id")?;
                expect_tag(line, rest[1], "l")?;
                let slope: f64 = number(line, rest[2], "slope")?;
                let intercept: f64 = number(line, rest[3], "intercept")?;
                expect_tag(line, rest[4], "d")?;
                let start: f64 = number(line, rest[5], "domain start")?;
                let end: f64 = number(line, rest[6], "domain end")?;
                expect_tag(line, rest[7], "c")?;
                for channel in &rest[8..] {
                    let _: u8 = number(line, channel, "color channel")?;
                }

                let tile = g
                    .tile_by_id_mut(id)
                    .ok_or_else(|| WorldError::parse(line, format!("no tile with id {id}")))?;
                tile.push_fragment(
                    LineEquation::from_slope_intercept(slope, intercept),
                    Domain::new(start, end),
                );
            }
            other => {
                return Err(WorldError::parse(line, format!("unknown record '{other}'")));
            }
        }
    }

    let grid = grid.ok_or_else(|| WorldError::InvalidWorld("missing size record".into()))?;
    if rows_read != grid.tile_count() {
        return Err(WorldError::InvalidWorld(format!(
            "expected {} rows, found {rows_read}",
            grid.tile_count()
        )));
    }
    if let Some(bare) = grid.active_tiles().iter().find(|t| t.fragments().is_empty()) {
        return Err(WorldError::InvalidWorld(format!(
            "tile {} has no fragments",
            bare.id()
        )));
    }
    Ok(grid)
}

/// Read and decode a world file.
pub fn load_world<P: AsRef<Path>>(path: P) -> Result<TileGrid, WorldError> {
    let p = path.as_ref();
    let txt = std::fs::read_to_string(p).map_err(|source| WorldError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    let grid = decode_world(&txt)?;
    log::info!(
        "loaded {}x{} world with {} active tiles from {}",
        grid.tile_count(),
        grid.tile_count(),
        grid.active_tiles().len(),
        p.display()
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_scientific_notation() {
        let text = "s 1 1\nw 21\nt 21 l 1e30 -5e29 d 0 1.0E0 c 255 255 255\n";
        let grid = decode_world(text).expect("decode");
        let frag = &grid.get(TileCoord::new(0, 0)).fragments()[0];
        match frag.equation {
            LineEquation::Vertical { x } => assert!((x - 0.5).abs() < 1e-9),
            other => panic!("expected vertical, got {:?}", other),
        }
        assert_eq!(frag.domain, Domain::FULL);
    }

    #[test]
    fn rejects_unknown_record() {
        let err = decode_world("s 1 1\nw 0\nx 1\n").expect_err("expected error");
        assert!(matches!(err, WorldError::Parse { line: 3, .. }));
    }

    #[test]
    fn rejects_short_row() {
        let err = decode_world("s 2 2\nw 0\n").expect_err("expected error");
        assert!(matches!(err, WorldError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_fragment_for_missing_tile() {
        let text = "s 1 1\nw 0\nt 21 l 0 0 d 0 1 c 255 255 255\n";
        let err = decode_world(text).expect_err("expected error");
        assert!(matches!(err, WorldError::Parse { line: 3, .. }));
    }

    #[test]
    fn rejects_duplicate_tile_ids() {
        let err = decode_world("s 2 2\nw 21 0\nw 0 21\n").expect_err("expected error");
        assert!(matches!(err, WorldError::Parse { line: 3, .. }));
    }

    #[test]
    fn rejects_missing_rows() {
        let err = decode_world("s 2 2\nw 0 0\n").expect_err("expected error");
        assert!(matches!(err, WorldError::InvalidWorld(_)));
    }

    #[test]
    fn rejects_non_square_size() {
        let err = decode_world("s 2 3\n").expect_err("expected error");
        assert!(matches!(err, WorldError::Parse { line: 1, .. }));
    }
}
