use glam::Vec2;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::physics::Rect;

/// Terrain classification of a tile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Ground {
    Empty,
    #[default]
    Traversable,
    Wall,
    LowWall,
    DeepWater,
    ShallowWater,
    Grass,
    Hole,
    Ice,
    Lava,
    Prickle,
    Ladder,
}

impl Ground {
    /// Ground the hero can safely be put back on after a fall.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            Self::Empty | Self::Traversable | Self::Grass | Self::ShallowWater | Self::Ladder | Self::Ice
        )
    }

    /// One-character symbol used by scenario map rows.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            ' ' => Self::Empty,
            '.' => Self::Traversable,
            '#' => Self::Wall,
            '=' => Self::LowWall,
            '~' => Self::DeepWater,
            '-' => Self::ShallowWater,
            '"' => Self::Grass,
            'O' => Self::Hole,
            '*' => Self::Ice,
            '!' => Self::Lava,
            '^' => Self::Prickle,
            'H' => Self::Ladder,
            _ => return None,
        })
    }
}

/// Tile grid of grounds. Out-of-bounds points read as walls.
#[derive(Debug, Clone)]
pub struct GroundMap {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<Ground>,
}

impl GroundMap {
    pub const DEFAULT_TILE_SIZE: f32 = 8.0;

    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles: vec![Ground::Traversable; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }

    pub fn tile(&self, x: usize, y: usize) -> Ground {
        if x >= self.width || y >= self.height {
            return Ground::Wall;
        }
        self.tiles[y * self.width + x]
    }

    pub fn set_tile(&mut self, x: usize, y: usize, ground: Ground) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = ground;
        }
    }

    /// Fill the tiles covered by a pixel rectangle.
    pub fn fill(&mut self, rect: Rect, ground: Ground) {
        let (x0, y0, x1, y1) = self.tile_range(rect);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_tile(x as usize, y as usize, ground);
            }
        }
    }

    pub fn ground_at(&self, point: Vec2) -> Ground {
        if point.x < 0.0 || point.y < 0.0 {
            return Ground::Wall;
        }
        let x = (point.x / self.tile_size) as usize;
        let y = (point.y / self.tile_size) as usize;
        self.tile(x, y)
    }

    /// Every ground touched by `rect`, one entry per tile.
    pub fn grounds_under(&self, rect: Rect) -> impl Iterator<Item = Ground> + '_ {
        let (x0, y0, x1, y1) = self.tile_range(rect);
        (y0..=y1).flat_map(move |y| {
            (x0..=x1).map(move |x| {
                if x < 0 || y < 0 {
                    Ground::Wall
                } else {
                    self.tile(x as usize, y as usize)
                }
            })
        })
    }

    fn tile_range(&self, rect: Rect) -> (i64, i64, i64, i64) {
        let ts = self.tile_size;
        let x0 = (rect.min.x / ts).floor() as i64;
        let y0 = (rect.min.y / ts).floor() as i64;
        // max is exclusive
        let x1 = ((rect.max.x - 0.001) / ts).floor() as i64;
        let y1 = ((rect.max.y - 0.001) / ts).floor() as i64;
        (x0, y0, x1, y1)
    }
}
