use crate::error::WorldError;
use crate::fragment::{Domain, Fragment, LineEquation};
use crate::transform::TileCoord;

/// Tile ids up to and including this value are reserved.
pub const RESERVED_TILE_IDS: u32 = 20;

/// Fragment ids on a tile start right after this value.
pub const FRAGMENT_ID_FLOOR: u32 = 10;

/// One grid cell. `id == 0` means the tile holds no fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    id: u32,
    fragments: Vec<Fragment>,
}

impl Tile {
    /// Tile id, 0 when unassigned.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Whether any fragment has been registered on the tile.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.id != 0
    }

    /// Fragments in insertion order.
    #[inline]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    fn next_fragment_id(&self) -> u32 {
        self.fragments
            .iter()
            .map(|f| f.id)
            .fold(FRAGMENT_ID_FLOOR, u32::max)
            + 1
    }

    pub(crate) fn push_fragment(&mut self, equation: LineEquation, domain: Domain) -> u32 {
        let id = self.next_fragment_id();
        self.fragments.push(Fragment {
            id,
            equation,
            domain,
        });
        id
    }
}

/// Square grid of tiles.
///
/// Storage is row-major with row 0 at the top of the screen, so tile-space
/// row `y` lives in storage row `tile_count - 1 - y`. Every accessor clamps
/// its coordinates into the grid instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    tile_count: usize,
    tiles: Vec<Tile>,
    last_id: u32,
}

impl TileGrid {
    /// Empty grid of `tile_count` x `tile_count` tiles. A count of 0 is
    /// raised to 1.
    pub fn new(tile_count: usize) -> Self {
        let tile_count = tile_count.max(1);
        Self {
            tile_count,
            tiles: vec![Tile::default(); tile_count * tile_count],
            last_id: RESERVED_TILE_IDS,
        }
    }

    /// Tiles per axis.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Largest tile id handed out so far, or the reserved ceiling.
    #[inline]
    pub fn last_id(&self) -> u32 {
        self.last_id
    }

    fn index(&self, coord: TileCoord) -> usize {
        let max = self.tile_count.saturating_sub(1) as i32;
        let x = coord.x.clamp(0, max) as usize;
        let y = coord.y.clamp(0, max) as usize;
        let row = self.tile_count - 1 - y;
        row * self.tile_count + x
    }

    /// Tile at `coord`, clamped to the nearest edge tile when off-grid.
    pub fn get(&self, coord: TileCoord) -> &Tile {
        &self.tiles[self.index(coord)]
    }

    /// Place `tile` at `coord` (clamped). The id counter is raised past
    /// `tile`'s id so later allocations never collide with it.
    ///
    /// Fails without touching the grid when the target tile is active, or
    /// when `tile`'s id is already carried by another tile.
    pub fn set(&mut self, coord: TileCoord, tile: Tile) -> Result<(), WorldError> {
        let idx = self.index(coord);
        if self.tiles[idx].is_active() {
            return Err(WorldError::InvalidWorld(format!(
                "tile ({}, {}) already holds id {}",
                coord.x, coord.y, self.tiles[idx].id
            )));
        }
        if tile.is_active() && self.tiles.iter().any(|t| t.id == tile.id) {
            return Err(WorldError::InvalidWorld(format!(
                "tile id {} is already in use",
                tile.id
            )));
        }
        self.store(idx, tile);
        Ok(())
    }

    /// Store a bare id at `coord`, used when restoring a saved world.
    pub(crate) fn set_id(&mut self, coord: TileCoord, id: u32) {
        let idx = self.index(coord);
        self.store(
            idx,
            Tile {
                id,
                fragments: Vec::new(),
            },
        );
    }

    fn store(&mut self, idx: usize, tile: Tile) {
        self.last_id = self.last_id.max(tile.id);
        self.tiles[idx] = tile;
    }

    /// Id of the tile at `coord`, allocating a fresh one if it is unassigned.
    pub fn assign_id(&mut self, coord: TileCoord) -> u32 {
        let idx = self.index(coord);
        if self.tiles[idx].id == 0 {
            self.last_id += 1;
            self.tiles[idx].id = self.last_id;
        }
        self.tiles[idx].id
    }

    /// Append a fragment to the tile at `coord` and return its id.
    pub fn add_fragment(&mut self, coord: TileCoord, equation: LineEquation, domain: Domain) -> u32 {
        self.assign_id(coord);
        let idx = self.index(coord);
        self.tiles[idx].push_fragment(equation, domain)
    }

    /// Storage rows, top of the screen first.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.tile_count.max(1))
    }

    /// Active tiles ordered by id.
    pub fn active_tiles(&self) -> Vec<&Tile> {
        let mut active: Vec<&Tile> = self.tiles.iter().filter(|t| t.is_active()).collect();
        active.sort_unstable_by_key(|t| t.id);
        active
    }

    /// Mutable access to the tile carrying `id`, used by the world loader.
    pub(crate) fn tile_by_id_mut(&mut self, id: u32) -> Option<&mut Tile> {
        if id == 0 {
            return None;
        }
        self.tiles.iter_mut().find(|t| t.id == id)
    }
}
