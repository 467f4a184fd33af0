use crate::{world::WorldGrid, Config};
use rand::Rng;

pub fn procgen_spec(config: &Config) -> procgen::Spec {
    procgen::Spec {
        rock_seeds: config.rock_seeds,
        swamp_seeds: config.swamp_seeds,
        lake_seeds: config.lake_seeds,
        swamp_growth_steps: config.swamp_growth_steps,
        lake_growth_steps: config.lake_growth_steps,
        max_seed_attempts: config.max_placement_attempts,
    }
}

pub fn generate<R: Rng>(config: &Config, rng: &mut R) -> Result<WorldGrid, procgen::Error> {
    let (terrain, summary) = procgen::generate_grid(config.size(), &procgen_spec(config), rng)?;
    log::debug!(
        "generated {:?} terrain with {} rock clusters and {} regions",
        terrain.size(),
        summary.rock_clusters.len(),
        summary.regions.len()
    );
    Ok(WorldGrid::from_terrain(&terrain))
}
