use crate::{
    agent::{Agent, AgentTick},
    ExternalEvent, MovementPeriods,
};
use coord_2d::{Coord, Size};
use rand::Rng;

mod data;
mod grid;
pub mod spawn;

pub use data::{Cell, TerrainKind};
pub use grid::{WorldGrid, EXPANSION_ORDER};
use spawn::SpawnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("{0:?} is outside the grid")]
    OutOfBounds(Coord),
    #[error("{0:?} holds the agent or the food and cannot become rock")]
    Occupied(Coord),
}

#[derive(Debug, Clone)]
pub struct World {
    pub grid: WorldGrid,
    pub agent: Agent,
}

impl World {
    /// Spawns the agent then the first food on an already generated grid.
    pub fn populate<R: Rng>(
        mut grid: WorldGrid,
        max_attempts: u32,
        rng: &mut R,
        events: &mut Vec<ExternalEvent>,
    ) -> Result<Self, SpawnError> {
        let mut agent = spawn::place_agent(&mut grid, max_attempts, rng)?;
        let food = spawn::place_food(&mut grid, &mut agent, max_attempts, rng)?;
        events.push(ExternalEvent::FoodPlaced(food));
        Ok(Self { grid, agent })
    }

    pub fn size(&self) -> Size {
        self.grid.size()
    }

    /// Advances the agent by one unit of work. When the agent reaches its target the food there
    /// is consumed and new food is placed. Food the agent cannot reach is moved elsewhere.
    pub fn tick<R: Rng>(
        &mut self,
        generation: u64,
        periods: &MovementPeriods,
        max_attempts: u32,
        rng: &mut R,
        events: &mut Vec<ExternalEvent>,
    ) -> Result<AgentTick, SpawnError> {
        let tick = self.agent.tick(&mut self.grid, generation, periods, events);
        match tick {
            AgentTick::Working => Ok(tick),
            AgentTick::NoPath(kind) => {
                log::info!("{} found no path, moving food", kind);
                let food = spawn::place_food(&mut self.grid, &mut self.agent, max_attempts, rng)?;
                events.push(ExternalEvent::FoodPlaced(food));
                Ok(tick)
            }
            AgentTick::Arrived(coord) => {
                log::info!("agent reached food at {:?}", coord);
                if let Some(cell) = self.grid.get_mut(coord) {
                    cell.has_food = false;
                }
                events.push(ExternalEvent::FoodConsumed(coord));
                self.agent.complete_arrival(&mut self.grid);
                let food = spawn::place_food(&mut self.grid, &mut self.agent, max_attempts, rng)?;
                events.push(ExternalEvent::FoodPlaced(food));
                Ok(tick)
            }
        }
    }

    /// Overwrites the terrain of one cell. Any search or path in progress is abandoned since it
    /// was computed against the old terrain.
    pub fn edit_cell(
        &mut self,
        coord: Coord,
        kind: TerrainKind,
        events: &mut Vec<ExternalEvent>,
    ) -> Result<(), EditError> {
        let cell = self.grid.get(coord).ok_or(EditError::OutOfBounds(coord))?;
        let occupied =
            cell.has_food || coord == self.agent.position() || coord == self.agent.target();
        if kind == TerrainKind::Rock && occupied {
            return Err(EditError::Occupied(coord));
        }
        if let Some(cancelled) = self.agent.cancel(&mut self.grid) {
            events.push(ExternalEvent::SearchCancelled(cancelled));
        }
        self.grid.set_kind(coord, kind);
        log::debug!("cell {:?} set to {:?}", coord, kind);
        Ok(())
    }
}
