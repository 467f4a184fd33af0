use coord_2d::{Coord, Size};
use direction::CardinalDirection;
use grid_2d::Grid;
use rand::Rng;
use serde::{Deserialize, Serialize};

mod growth;

pub use growth::RegionStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Grass,
    Swamp,
    Lake,
    Rock,
}

impl TerrainKind {
    /// Cost of stepping into a cell of this kind. Rock is never entered so it has no cost.
    pub fn entry_cost(self) -> Option<u32> {
        match self {
            Self::Grass => Some(1),
            Self::Swamp => Some(5),
            Self::Lake => Some(10),
            Self::Rock => None,
        }
    }

    pub fn is_walkable(self) -> bool {
        self.entry_cost().is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a {size:?} grid is too small to seed {terrain:?}")]
    GridTooSmall { terrain: TerrainKind, size: Size },
    #[error("no grass cell found for a {terrain:?} seed after {attempts} attempts")]
    NoGrassForSeed { terrain: TerrainKind, attempts: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    pub rock_seeds: u32,
    pub swamp_seeds: u32,
    pub lake_seeds: u32,
    pub swamp_growth_steps: u32,
    pub lake_growth_steps: u32,
    pub max_seed_attempts: u32,
}

impl Default for Spec {
    fn default() -> Self {
        Self {
            rock_seeds: 20,
            swamp_seeds: 2,
            lake_seeds: 1,
            swamp_growth_steps: 100,
            lake_growth_steps: 200,
            max_seed_attempts: 10_000,
        }
    }
}

// Summary of one call to `generate`, mostly useful for logging and tests
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    pub rock_clusters: Vec<Coord>,
    pub regions: Vec<RegionStats>,
}

// Converts the seed and its 4 orthogonal neighbours to rock. The seed must be interior.
fn place_rock_cluster(terrain: &mut Grid<TerrainKind>, centre: Coord) {
    *terrain.get_checked_mut(centre) = TerrainKind::Rock;
    for direction in CardinalDirection::all() {
        if let Some(cell) = terrain.get_mut(centre + direction.coord()) {
            *cell = TerrainKind::Rock;
        }
    }
}

fn sample_interior<R: Rng>(size: Size, rng: &mut R) -> Coord {
    let x = rng.gen_range(1..(size.width() - 1));
    let y = rng.gen_range(1..(size.height() - 1));
    Coord::new(x as i32, y as i32)
}

/// Populates `terrain` in place. Every cell is reset to grass first, then rocks, swamps and lakes
/// are applied in that order. Swamp and lake growth only ever converts grass, so later regions
/// never overwrite earlier ones.
pub fn generate<R: Rng>(
    terrain: &mut Grid<TerrainKind>,
    spec: &Spec,
    rng: &mut R,
) -> Result<Terrain, Error> {
    for cell in terrain.iter_mut() {
        *cell = TerrainKind::Grass;
    }
    let size = terrain.size();
    let mut summary = Terrain::default();
    if spec.rock_seeds > 0 {
        if size.width() < 3 || size.height() < 3 {
            return Err(Error::GridTooSmall {
                terrain: TerrainKind::Rock,
                size,
            });
        }
        for _ in 0..spec.rock_seeds {
            let centre = sample_interior(size, rng);
            place_rock_cluster(terrain, centre);
            summary.rock_clusters.push(centre);
        }
        log::debug!("placed {} rock clusters", summary.rock_clusters.len());
    }
    let regions = [
        (TerrainKind::Swamp, spec.swamp_seeds, spec.swamp_growth_steps),
        (TerrainKind::Lake, spec.lake_seeds, spec.lake_growth_steps),
    ];
    for (kind, seeds, steps) in regions {
        for _ in 0..seeds {
            let stats = growth::grow_region(terrain, kind, steps, spec.max_seed_attempts, rng)?;
            log::debug!(
                "grew {:?} region from {:?}: {} cells",
                kind,
                stats.seed,
                stats.cells
            );
            summary.regions.push(stats);
        }
    }
    Ok(summary)
}

/// Convenience wrapper which allocates a fresh grid of the given size.
pub fn generate_grid<R: Rng>(
    size: Size,
    spec: &Spec,
    rng: &mut R,
) -> Result<(Grid<TerrainKind>, Terrain), Error> {
    let mut terrain = Grid::new_copy(size, TerrainKind::Grass);
    let summary = generate(&mut terrain, spec, rng)?;
    Ok((terrain, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    fn empty_spec() -> Spec {
        Spec {
            rock_seeds: 0,
            swamp_seeds: 0,
            lake_seeds: 0,
            ..Spec::default()
        }
    }

    fn count(terrain: &Grid<TerrainKind>, kind: TerrainKind) -> usize {
        terrain.iter().filter(|&&k| k == kind).count()
    }

    #[test]
    fn entry_costs() {
        assert_eq!(TerrainKind::Grass.entry_cost(), Some(1));
        assert_eq!(TerrainKind::Swamp.entry_cost(), Some(5));
        assert_eq!(TerrainKind::Lake.entry_cost(), Some(10));
        assert_eq!(TerrainKind::Rock.entry_cost(), None);
        assert!(!TerrainKind::Rock.is_walkable());
    }

    #[test]
    fn no_seeds_leaves_all_grass() {
        let mut rng = Isaac64Rng::seed_from_u64(0);
        let mut terrain = Grid::new_copy(Size::new(10, 10), TerrainKind::Lake);
        generate(&mut terrain, &empty_spec(), &mut rng).unwrap();
        assert_eq!(count(&terrain, TerrainKind::Grass), 100);
    }

    #[test]
    fn single_rock_seed_is_plus_shaped() {
        for seed in 0..50 {
            let mut rng = Isaac64Rng::seed_from_u64(seed);
            let spec = Spec {
                rock_seeds: 1,
                ..empty_spec()
            };
            let (terrain, summary) = generate_grid(Size::new(12, 9), &spec, &mut rng).unwrap();
            let centre = summary.rock_clusters[0];
            assert!(centre.x >= 1 && centre.x <= 10);
            assert!(centre.y >= 1 && centre.y <= 7);
            assert_eq!(count(&terrain, TerrainKind::Rock), 5);
            assert_eq!(*terrain.get_checked(centre), TerrainKind::Rock);
            for direction in CardinalDirection::all() {
                assert_eq!(
                    *terrain.get_checked(centre + direction.coord()),
                    TerrainKind::Rock
                );
            }
        }
    }

    #[test]
    fn rocks_need_an_interior() {
        let mut rng = Isaac64Rng::seed_from_u64(0);
        let spec = Spec {
            rock_seeds: 1,
            ..empty_spec()
        };
        let result = generate_grid(Size::new(2, 10), &spec, &mut rng);
        assert!(matches!(
            result,
            Err(Error::GridTooSmall {
                terrain: TerrainKind::Rock,
                ..
            })
        ));
    }

    #[test]
    fn region_size_is_bounded_by_budget() {
        let mut rng = Isaac64Rng::seed_from_u64(7);
        let spec = Spec {
            swamp_seeds: 1,
            swamp_growth_steps: 100,
            ..empty_spec()
        };
        let (terrain, summary) = generate_grid(Size::new(30, 30), &spec, &mut rng).unwrap();
        let swamp = count(&terrain, TerrainKind::Swamp);
        // seed cell plus at most one cell per step
        assert!(swamp >= 1 && swamp <= 101);
        assert_eq!(summary.regions[0].cells, swamp);
    }

    #[test]
    fn later_regions_do_not_overwrite_earlier_ones() {
        for seed in 0..20 {
            let mut rng = Isaac64Rng::seed_from_u64(seed);
            let mut rocks_only_rng = Isaac64Rng::seed_from_u64(seed);
            let spec = Spec::default();
            let rock_spec = Spec {
                swamp_seeds: 0,
                lake_seeds: 0,
                ..Spec::default()
            };
            let (full, _) = generate_grid(Size::new(30, 20), &spec, &mut rng).unwrap();
            let (rocks, _) =
                generate_grid(Size::new(30, 20), &rock_spec, &mut rocks_only_rng).unwrap();
            // rock placement consumes the rng identically in both runs
            for (coord, &kind) in rocks.enumerate() {
                if kind == TerrainKind::Rock {
                    assert_eq!(*full.get_checked(coord), TerrainKind::Rock);
                }
            }
        }
    }

    #[test]
    fn unsatisfiable_seed_reports_error() {
        let mut rng = Isaac64Rng::seed_from_u64(3);
        let mut terrain = Grid::new_copy(Size::new(5, 5), TerrainKind::Grass);
        let spec = Spec {
            swamp_seeds: 40,
            swamp_growth_steps: 0,
            max_seed_attempts: 100,
            ..empty_spec()
        };
        // only 16 cells are eligible for seeds so the 17th seed can never find grass
        let result = generate(&mut terrain, &spec, &mut rng);
        assert!(matches!(
            result,
            Err(Error::NoGrassForSeed {
                terrain: TerrainKind::Swamp,
                attempts: 100
            })
        ));
    }

    #[test]
    fn generation_is_deterministic() {
        let mut a = Isaac64Rng::seed_from_u64(99);
        let mut b = Isaac64Rng::seed_from_u64(99);
        let (ta, _) = generate_grid(Size::new(30, 30), &Spec::default(), &mut a).unwrap();
        let (tb, _) = generate_grid(Size::new(30, 30), &Spec::default(), &mut b).unwrap();
        assert!(ta.iter().eq(tb.iter()));
    }
}
