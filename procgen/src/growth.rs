use crate::{Error, TerrainKind};
use coord_2d::Coord;
use direction::CardinalDirection;
use grid_2d::Grid;
use rand::Rng;

// Indexed by a uniform sample in 0..4
const GROWTH_DIRECTIONS: [CardinalDirection; 4] = [
    CardinalDirection::North,
    CardinalDirection::West,
    CardinalDirection::East,
    CardinalDirection::South,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStats {
    pub kind: TerrainKind,
    pub seed: Coord,
    /// Number of cells converted, including the seed.
    pub cells: usize,
}

// Region seeds are drawn from [1, width) x [1, height), skipping the first column and row
fn sample_seed<R: Rng>(
    terrain: &Grid<TerrainKind>,
    kind: TerrainKind,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Coord, Error> {
    let size = terrain.size();
    if size.width() < 2 || size.height() < 2 {
        return Err(Error::GridTooSmall {
            terrain: kind,
            size,
        });
    }
    for _ in 0..max_attempts {
        let coord = Coord::new(
            rng.gen_range(1..size.width()) as i32,
            rng.gen_range(1..size.height()) as i32,
        );
        if *terrain.get_checked(coord) == TerrainKind::Grass {
            return Ok(coord);
        }
    }
    Err(Error::NoGrassForSeed {
        terrain: kind,
        attempts: max_attempts,
    })
}

/// Seeds a region of `kind` on a grass cell then performs a random walk of `steps` steps. A step
/// whose target is out of bounds or not grass is still consumed, so the region holds at most
/// `steps + 1` cells.
pub fn grow_region<R: Rng>(
    terrain: &mut Grid<TerrainKind>,
    kind: TerrainKind,
    steps: u32,
    max_attempts: u32,
    rng: &mut R,
) -> Result<RegionStats, Error> {
    let seed = sample_seed(terrain, kind, max_attempts, rng)?;
    *terrain.get_checked_mut(seed) = kind;
    let mut cursor = seed;
    let mut cells = 1;
    for _ in 0..steps {
        let direction = GROWTH_DIRECTIONS[rng.gen_range(0..GROWTH_DIRECTIONS.len())];
        let next = cursor + direction.coord();
        if let Some(cell) = terrain.get_mut(next) {
            if *cell == TerrainKind::Grass {
                *cell = kind;
                cursor = next;
                cells += 1;
            }
        }
    }
    Ok(RegionStats { kind, seed, cells })
}
