pub use coord_2d::{Coord, Size};
pub use direction::CardinalDirection;
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod agent;
pub mod search;
mod terrain;
pub mod world;

use agent::AgentTick;
pub use agent::{Agent, AgentState};
pub use search::{ParseSearchKindError, Path, Search, SearchKind, StepOutcome};
pub use world::{spawn::SpawnError, Cell, EditError, TerrainKind, World, WorldGrid};

/// Neither grid dimension may exceed this, whatever the config asks for.
pub const MAX_GRID_DIMENSION: u32 = 30;

/// Number of driver ticks the agent waits on a cell of each kind before moving on. Rock is never
/// occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementPeriods {
    pub grass: u32,
    pub swamp: u32,
    pub lake: u32,
}

impl Default for MovementPeriods {
    fn default() -> Self {
        Self {
            grass: 20,
            swamp: 40,
            lake: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: u32,
    pub rows: u32,
    pub rock_seeds: u32,
    pub swamp_seeds: u32,
    pub lake_seeds: u32,
    pub swamp_growth_steps: u32,
    pub lake_growth_steps: u32,
    pub movement_period: MovementPeriods,
    /// Upper bound on every reject-and-resample loop.
    pub max_placement_attempts: u32,
    pub tick_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: 30,
            rows: 20,
            rock_seeds: 20,
            swamp_seeds: 2,
            lake_seeds: 1,
            swamp_growth_steps: 100,
            lake_growth_steps: 200,
            movement_period: MovementPeriods::default(),
            max_placement_attempts: 10_000,
            tick_duration_ms: 16,
        }
    }
}

impl Config {
    /// Requested dimensions clamped to 1..=MAX_GRID_DIMENSION.
    pub fn size(&self) -> Size {
        Size::new(
            self.columns.clamp(1, MAX_GRID_DIMENSION),
            self.rows.clamp(1, MAX_GRID_DIMENSION),
        )
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_duration_ms.max(1))
    }
}

/// Events which the game reports back to the io layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalEvent {
    SearchStarted(SearchKind),
    PathFound {
        kind: SearchKind,
        steps: usize,
        cost: u32,
    },
    PathNotFound(SearchKind),
    SearchCancelled(SearchKind),
    FoodPlaced(Coord),
    FoodConsumed(Coord),
    WorldReset,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terrain generation failed: {0}")]
    Generation(#[from] procgen::Error),
    #[error("spawning failed: {0}")]
    Spawn(#[from] SpawnError),
}

pub struct Game {
    config: Config,
    rng: Isaac64Rng,
    world: World,
    generation: u64,
    selection: Option<SearchKind>,
    events: Vec<ExternalEvent>,
    food_consumed: u64,
    since_last_tick: Duration,
}

impl Game {
    pub fn new<R: Rng>(config: &Config, base_rng: &mut R) -> Result<Self, Error> {
        let mut rng = Isaac64Rng::seed_from_u64(base_rng.gen());
        let mut events = Vec::new();
        let world = Self::generate_world(config, &mut rng, &mut events)?;
        Ok(Self {
            config: config.clone(),
            rng,
            world,
            generation: 0,
            selection: None,
            events,
            food_consumed: 0,
            since_last_tick: Duration::from_millis(0),
        })
    }

    fn generate_world(
        config: &Config,
        rng: &mut Isaac64Rng,
        events: &mut Vec<ExternalEvent>,
    ) -> Result<World, Error> {
        let grid = terrain::generate(config, rng)?;
        let world = World::populate(grid, config.max_placement_attempts, rng, events)?;
        Ok(world)
    }

    /// Sets the strategy used for every subsequent food. If the agent is idle the search starts
    /// straight away, otherwise it starts once the current search or walk ends. Returns true if
    /// a search was started.
    pub fn select_strategy(&mut self, selection: Option<SearchKind>) -> bool {
        self.selection = selection;
        match selection {
            Some(kind) => self.world.agent.start_search(
                kind,
                &mut self.world.grid,
                self.generation,
                &mut self.events,
            ),
            None => false,
        }
    }

    /// One discrete unit of work.
    pub fn tick(&mut self) -> Result<(), Error> {
        if let Some(kind) = self.selection {
            if self.world.agent.is_idle() {
                self.world.agent.start_search(
                    kind,
                    &mut self.world.grid,
                    self.generation,
                    &mut self.events,
                );
            }
        }
        match self.world.tick(
            self.generation,
            &self.config.movement_period,
            self.config.max_placement_attempts,
            &mut self.rng,
            &mut self.events,
        )? {
            AgentTick::Working | AgentTick::NoPath(_) => (),
            AgentTick::Arrived(_) => self.food_consumed += 1,
        }
        Ok(())
    }

    pub fn handle_tick(&mut self, since_last_tick: Duration) -> Result<(), Error> {
        let tick_duration = self.config.tick_duration();
        self.since_last_tick += since_last_tick;
        while let Some(remaining) = self.since_last_tick.checked_sub(tick_duration) {
            self.since_last_tick = remaining;
            self.tick()?;
        }
        Ok(())
    }

    /// Replaces the world with a freshly generated one. Any search still referring to the old
    /// world is invalidated by the generation change.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.generation += 1;
        self.selection = None;
        self.since_last_tick = Duration::from_millis(0);
        self.events.push(ExternalEvent::WorldReset);
        self.world = Self::generate_world(&self.config, &mut self.rng, &mut self.events)?;
        log::info!("world reset (generation {})", self.generation);
        Ok(())
    }

    pub fn edit_cell(&mut self, coord: Coord, kind: TerrainKind) -> Result<(), EditError> {
        self.world.edit_cell(coord, kind, &mut self.events)?;
        self.generation += 1;
        Ok(())
    }

    pub fn events(&mut self) -> impl '_ + Iterator<Item = ExternalEvent> {
        self.events.drain(..)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.world.grid
    }

    pub fn agent(&self) -> &Agent {
        &self.world.agent
    }

    pub fn selection(&self) -> Option<SearchKind> {
        self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn food_consumed(&self) -> u64 {
        self.food_consumed
    }

    pub fn size(&self) -> Size {
        self.world.size()
    }
}
