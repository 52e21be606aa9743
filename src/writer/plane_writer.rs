use crate::error::WorldError;
use crate::grid::TileGrid;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Color triple attached to every fragment record.
pub const FRAGMENT_COLOR: [u8; 3] = [255, 255, 255];

/// Render the whole grid as world file text.
///
/// ```text
/// s <count> <count>
/// w <id> <id> ...                               one per row, top first
/// t <tile> l <slope> <intercept> d <from> <to> c 255 255 255
/// ```
pub fn encode_world(grid: &TileGrid) -> String {
    let n = grid.tile_count();
    let mut out = String::new();
    let _ = writeln!(out, "s {} {}", n, n);

    for row in grid.rows() {
        out.push('w');
        for tile in row {
            let _ = write!(out, " {}", tile.id());
        }
        out.push('\n');
    }

    let [r, g, b] = FRAGMENT_COLOR;
    for tile in grid.active_tiles() {
        for frag in tile.fragments() {
            let (slope, intercept) = frag.equation.slope_intercept();
            let _ = writeln!(
                out,
                "t {} l {} {} d {} {} c {} {} {}",
                tile.id(),
                slope,
                intercept,
                frag.domain.start,
                frag.domain.end,
                r,
                g,
                b
            );
        }
    }
    out
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "world".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a full snapshot of `grid` to `path`.
///
/// The text goes to a sibling `.tmp` file first and is then renamed over
/// `path`, so a failed save leaves the previous file intact.
pub fn save_world<P: AsRef<Path>>(grid: &TileGrid, path: P) -> Result<(), WorldError> {
    let path = path.as_ref();
    let tmp = temp_path(path);
    let io_err = |p: &Path| {
        let p = p.to_path_buf();
        move |source: std::io::Error| WorldError::Io { path: p, source }
    };

    let text = encode_world(grid);
    let mut file = File::create(&tmp).map_err(io_err(&tmp))?;
    file.write_all(text.as_bytes()).map_err(io_err(&tmp))?;
    file.sync_all().map_err(io_err(&tmp))?;
    drop(file);

    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(WorldError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    log::info!(
        "saved {} active tiles to {}",
        grid.active_tiles().len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Domain, LineEquation};
    use crate::transform::TileCoord;

    #[test]
    fn empty_grid_has_only_size_and_rows() {
        let text = encode_world(&TileGrid::new(2));
        assert_eq!(text, "s 2 2\nw 0 0\nw 0 0\n");
    }

    #[test]
    fn fragments_follow_rows() {
        let mut grid = TileGrid::new(2);
        grid.add_fragment(
            TileCoord::new(0, 1),
            LineEquation::Sloped {
                slope: 0.5,
                intercept: -0.25,
            },
            Domain::new(0.5, 1.0),
        );
        let text = encode_world(&grid);
        assert_eq!(
            text,
            "s 2 2\nw 21 0\nw 0 0\nt 21 l 0.5 -0.25 d 0.5 1 c 255 255 255\n"
        );
    }

    #[test]
    fn temp_file_sits_next_to_target() {
        let tmp = temp_path(Path::new("/data/generated.plane"));
        assert_eq!(tmp, PathBuf::from("/data/generated.plane.tmp"));
    }
}
