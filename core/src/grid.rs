use serde::{Deserialize, Serialize};

use crate::errors::Match3Error;

/// A cell coordinate, top-left origin, Y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, zero-based.
    pub x: i32,
    /// Row, zero-based.
    pub y: i32,
}

impl Position {
    /// Builds a position from raw coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if `other` is one cardinal step away from `self`.
    pub fn is_cardinally_adjacent(&self, other: Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }

    /// Chebyshev distance to `other`.
    pub fn chebyshev_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// A 2-D float vector used for tile render position / velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Builds a vector from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Tile color, including the absence of a tile and the Rainbow wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// No tile occupies the cell.
    None,
    /// Plain color.
    Red,
    /// Plain color.
    Green,
    /// Plain color.
    Blue,
    /// Plain color.
    Yellow,
    /// Plain color.
    Purple,
    /// Plain color.
    Orange,
    /// Wildcard color produced by color bombs; matches any color.
    Rainbow,
}

impl TileType {
    /// The plain colors a level can be configured with, in a stable order
    /// used for diversity/balance accounting.
    pub const PLAIN_COLORS: [TileType; 6] = [
        TileType::Red,
        TileType::Green,
        TileType::Blue,
        TileType::Yellow,
        TileType::Purple,
        TileType::Orange,
    ];

    /// True for any tile except `None`.
    pub fn is_present(self) -> bool {
        !matches!(self, TileType::None)
    }

    /// True for a plain, non-wildcard color.
    pub fn is_plain_color(self) -> bool {
        !matches!(self, TileType::None | TileType::Rainbow)
    }
}

/// Bomb charge carried by a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BombType {
    /// No bomb.
    None,
    /// Clears the full row through its origin.
    Horizontal,
    /// Clears the full column through its origin.
    Vertical,
    /// Clears a 5x5 area centred on its origin.
    Square5x5,
    /// Launches N projectiles at scarce-color targets.
    Ufo,
    /// Clears all tiles of a chosen color.
    Color,
}

impl BombType {
    /// True for any bomb other than `None`.
    pub fn is_present(self) -> bool {
        !matches!(self, BombType::None)
    }
}

/// A single grid cell's tile state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Unique id within the session; monotonically assigned.
    pub id: u64,
    /// Color / wildcard state.
    pub kind: TileType,
    /// Bomb charge carried by this tile.
    pub bomb: BombType,
    /// The cell this tile is assigned to at rest.
    pub grid_pos: Position,
    /// Current render position (may differ from `grid_pos` while falling).
    pub render_pos: Vec2,
    /// Current fall velocity.
    pub velocity: Vec2,
    /// True while the tile is animating toward `grid_pos`.
    pub is_falling: bool,
}

impl Tile {
    /// An empty slot tile, not falling, with no id claimed.
    pub fn empty(grid_pos: Position) -> Self {
        Self {
            id: 0,
            kind: TileType::None,
            bomb: BombType::None,
            grid_pos,
            render_pos: Vec2::new(grid_pos.x as f32, grid_pos.y as f32),
            velocity: Vec2::ZERO,
            is_falling: false,
        }
    }
}

/// Obstacle type layered on top of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverType {
    /// No cover.
    None,
    /// Blocks swap, match, and fall; static.
    Cage,
    /// Blocks swap and fall, but not match; static.
    Chain,
    /// Blocks swap only; travels with its tile.
    Bubble,
}

impl CoverType {
    /// Whether this cover type travels with its host tile when it falls.
    pub fn is_dynamic(self) -> bool {
        matches!(self, CoverType::Bubble)
    }

    /// Whether a non-destroyed cover of this type blocks a swap.
    pub fn blocks_swap(self) -> bool {
        !matches!(self, CoverType::None)
    }

    /// Whether a non-destroyed cover of this type blocks a match.
    pub fn blocks_match(self) -> bool {
        matches!(self, CoverType::Cage)
    }

    /// Whether a non-destroyed cover of this type blocks gravity.
    pub fn blocks_fall(self) -> bool {
        matches!(self, CoverType::Cage | CoverType::Chain)
    }
}

/// An obstacle overlaid on a tile cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    /// Obstacle kind.
    pub kind: CoverType,
    /// Remaining hit points; a cover at 0 health is treated as absent.
    pub health: u8,
    /// True if this cover travels with its tile when the tile falls.
    pub is_dynamic: bool,
}

impl Cover {
    /// No cover present.
    pub const NONE: Cover = Cover {
        kind: CoverType::None,
        health: 0,
        is_dynamic: false,
    };

    /// Builds a cover, deriving `is_dynamic` from `kind` per the blocking
    /// table invariant.
    pub fn new(kind: CoverType, health: u8) -> Self {
        Self {
            kind,
            health,
            is_dynamic: kind.is_dynamic(),
        }
    }

    /// True if this cover has no observable effect (absent, or destroyed).
    pub fn is_absent(&self) -> bool {
        matches!(self.kind, CoverType::None) || self.health == 0
    }
}

/// Obstacle type layered below a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundType {
    /// No ground.
    None,
    /// A destructible layer beneath the tile.
    Ice,
}

/// A destructible ground layer under a tile cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ground {
    /// Ground kind.
    pub kind: GroundType,
    /// Remaining hit points; a ground at 0 health is treated as absent.
    pub health: u8,
}

impl Ground {
    /// No ground present.
    pub const NONE: Ground = Ground {
        kind: GroundType::None,
        health: 0,
    };

    /// True if this ground has no observable effect.
    pub fn is_absent(&self) -> bool {
        matches!(self.kind, GroundType::None) || self.health == 0
    }
}

/// A flat `width * height` grid, indexed `y * width + x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Builds a grid of the given dimensions, filling every cell with
    /// `value`.
    pub fn filled(width: i32, height: i32, value: T) -> Self {
        debug_assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![value; (width * height) as usize],
        }
    }
}

impl<T> Grid<T> {
    /// Grid width.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// True if `pos` lies within `[0, width) x [0, height)`.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index_of(&self, pos: Position) -> Match3Result<usize> {
        if self.in_bounds(pos) {
            Ok((pos.y * self.width + pos.x) as usize)
        } else {
            Err(Match3Error::InvalidPosition(pos))
        }
    }

    /// Reads the cell at `pos`.
    pub fn get(&self, pos: Position) -> Match3Result<&T> {
        let idx = self.index_of(pos)?;
        Ok(&self.cells[idx])
    }

    /// Reads the cell at `pos`, panicking (debug-only) if out of range.
    /// Used on the hot path once a position is already bounds-checked.
    pub fn get_unchecked(&self, pos: Position) -> &T {
        debug_assert!(self.in_bounds(pos), "position out of range: {pos:?}");
        &self.cells[(pos.y * self.width + pos.x) as usize]
    }

    /// Writes the cell at `pos`.
    pub fn set(&mut self, pos: Position, value: T) -> Match3Result<()> {
        let idx = self.index_of(pos)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Writes the cell at `pos` without a bounds error; caller guarantees
    /// `pos` is valid.
    pub fn set_unchecked(&mut self, pos: Position, value: T) {
        debug_assert!(self.in_bounds(pos), "position out of range: {pos:?}");
        self.cells[(pos.y * self.width + pos.x) as usize] = value;
    }

    /// Iterates every `(Position, &T)` pair in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(idx, value)| {
            let idx = idx as i32;
            (Position::new(idx % width, idx / width), value)
        })
    }
}

type Match3Result<T> = Result<T, Match3Error>;
