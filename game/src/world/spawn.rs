use crate::{
    agent::Agent,
    world::{TerrainKind, WorldGrid},
};
use coord_2d::Coord;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("no cell for the agent after {attempts} attempts")]
    NoSpaceForAgent { attempts: u32 },
    #[error("no cell for food after {attempts} attempts")]
    NoSpaceForFood { attempts: u32 },
}

fn sample_coord<R: Rng>(grid: &WorldGrid, rng: &mut R) -> Option<Coord> {
    if grid.width() == 0 || grid.height() == 0 {
        return None;
    }
    Some(Coord::new(
        rng.gen_range(0..grid.width()) as i32,
        rng.gen_range(0..grid.height()) as i32,
    ))
}

/// Creates an agent on a uniformly sampled cell which is neither rock nor lake.
pub fn place_agent<R: Rng>(
    grid: &mut WorldGrid,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Agent, SpawnError> {
    for _ in 0..max_attempts {
        let coord = match sample_coord(grid, rng) {
            Some(coord) => coord,
            None => break,
        };
        if let Some(cell) = grid.get_mut(coord) {
            if matches!(cell.kind, TerrainKind::Rock | TerrainKind::Lake) {
                continue;
            }
            cell.has_agent = true;
            log::debug!("agent placed at {:?}", coord);
            return Ok(Agent::new(coord));
        }
    }
    Err(SpawnError::NoSpaceForAgent {
        attempts: max_attempts,
    })
}

/// Moves the food to a uniformly sampled non-rock cell and retargets the agent at it. Food which
/// lands on the agent's own cell is not shown there, but remains the agent's target.
pub fn place_food<R: Rng>(
    grid: &mut WorldGrid,
    agent: &mut Agent,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Coord, SpawnError> {
    grid.clear_food();
    for _ in 0..max_attempts {
        let coord = match sample_coord(grid, rng) {
            Some(coord) => coord,
            None => break,
        };
        if let Some(cell) = grid.get_mut(coord) {
            if cell.kind == TerrainKind::Rock || cell.has_food {
                continue;
            }
            cell.has_food = coord != agent.position();
            agent.set_target(coord);
            log::info!("food placed at {:?}", coord);
            return Ok(coord);
        }
    }
    Err(SpawnError::NoSpaceForFood {
        attempts: max_attempts,
    })
}
