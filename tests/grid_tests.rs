// tests/grid_tests.rs

use plane_editor::{
    decode_world, encode_world, Domain, LineEquation, Tile, TileCoord, TileGrid, WorldError,
    RESERVED_TILE_IDS,
};

fn line(slope: f64, intercept: f64) -> LineEquation {
    LineEquation::Sloped { slope, intercept }
}

#[test]
fn assign_id_is_idempotent() {
    let mut grid = TileGrid::new(5);
    let c = TileCoord::new(2, 3);
    let first = grid.assign_id(c);
    let second = grid.assign_id(c);
    assert_eq!(first, second);
    assert!(first > RESERVED_TILE_IDS);
}

#[test]
fn add_fragment_ids_strictly_increase() {
    let mut grid = TileGrid::new(5);
    let c = TileCoord::new(4, 0);
    let a = grid.add_fragment(c, line(0.5, 0.1), Domain::FULL);
    let b = grid.add_fragment(c, line(-2.0, 0.9), Domain::new(0.2, 0.4));
    assert!(b > a);

    let tile = grid.get(c);
    assert_eq!(tile.fragments().len(), 2);
    assert_eq!(tile.fragments()[1].domain, Domain::new(0.2, 0.4));
}

#[test]
fn writes_off_grid_land_on_edge_tiles() {
    let mut grid = TileGrid::new(3);
    grid.add_fragment(TileCoord::new(-4, 7), line(0.0, 0.5), Domain::FULL);

    let corner = grid.get(TileCoord::new(0, 2));
    assert!(corner.is_active());
    assert_eq!(corner.fragments().len(), 1);
}

#[test]
fn fragments_exist_only_on_active_tiles() {
    let mut grid = TileGrid::new(4);
    grid.add_fragment(TileCoord::new(1, 1), line(1.0, 0.0), Domain::FULL);
    grid.add_fragment(TileCoord::new(3, 2), line(1.0, -1.0), Domain::FULL);

    for row in grid.rows() {
        for tile in row {
            assert_eq!(tile.is_active(), !tile.fragments().is_empty());
        }
    }
}

#[test]
fn set_refuses_a_second_copy_of_an_active_tile() {
    let mut grid = TileGrid::new(4);
    grid.add_fragment(TileCoord::new(0, 0), line(0.0, 0.25), Domain::FULL);
    let copy: Tile = grid.get(TileCoord::new(0, 0)).clone();
    let before = grid.clone();

    let err = grid
        .set(TileCoord::new(2, 2), copy)
        .expect_err("duplicate id accepted");
    assert!(matches!(err, WorldError::InvalidWorld(_)));
    assert_eq!(grid, before);
    decode_world(&encode_world(&grid)).expect("grid still encodes to a loadable world");
}

#[test]
fn set_moves_a_tile_into_another_grid() {
    let mut grid = TileGrid::new(4);
    grid.add_fragment(TileCoord::new(0, 0), line(0.0, 0.25), Domain::FULL);
    let copy: Tile = grid.get(TileCoord::new(0, 0)).clone();

    let mut other = TileGrid::new(4);
    other.set(TileCoord::new(3, 3), copy.clone()).expect("set");
    assert_eq!(other.get(TileCoord::new(3, 3)), &copy);
    assert!(other.assign_id(TileCoord::new(1, 1)) > copy.id());
}

#[test]
fn set_keeps_fragments_of_an_active_tile() {
    let mut grid = TileGrid::new(4);
    let c = TileCoord::new(1, 2);
    grid.add_fragment(c, line(1.0, 0.0), Domain::FULL);

    assert!(grid.set(c, Tile::default()).is_err());
    assert_eq!(grid.get(c).fragments().len(), 1);

    grid.set(TileCoord::new(3, 0), Tile::default()).expect("clearing an empty tile");
    assert!(!grid.get(TileCoord::new(3, 0)).is_active());
}
