use crate::{
    search::{Search, SearchKind, StepOutcome},
    world::{TerrainKind, WorldGrid},
    ExternalEvent, MovementPeriods,
};
use coord_2d::Coord;
use direction::CardinalDirection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    Idle,
    Searching,
    PathFound,
    Moving,
    Arrived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentTick {
    /// Nothing happened, or a unit of search or movement work was done.
    Working,
    /// The agent stepped onto its target this tick.
    Arrived(Coord),
    /// The search ran out of cells without reaching the target.
    NoPath(SearchKind),
}

#[derive(Debug, Clone)]
pub struct Agent {
    position: Coord,
    target: Coord,
    state: AgentState,
    active: Option<SearchKind>,
    path: Vec<CardinalDirection>,
    cursor: usize,
    search: Option<Search>,
    move_countdown: u32,
}

impl Agent {
    pub fn new(position: Coord) -> Self {
        Self {
            position,
            target: position,
            state: AgentState::Idle,
            active: None,
            path: Vec::new(),
            cursor: 0,
            search: None,
            move_countdown: 0,
        }
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn target(&self) -> Coord {
        self.target
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn active_kind(&self) -> Option<SearchKind> {
        self.active
    }

    pub fn path(&self) -> &[CardinalDirection] {
        &self.path
    }

    pub fn path_cursor(&self) -> usize {
        self.cursor
    }

    pub fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.state == AgentState::Idle
    }

    pub fn set_target(&mut self, target: Coord) {
        self.target = target;
    }

    /// Begins a search for the current target. Returns false without side effects unless the
    /// agent is idle.
    pub fn start_search(
        &mut self,
        kind: SearchKind,
        grid: &mut WorldGrid,
        generation: u64,
        events: &mut Vec<ExternalEvent>,
    ) -> bool {
        if self.state != AgentState::Idle {
            log::debug!(
                "ignoring {} selection while {:?} with {:?}",
                kind,
                self.state,
                self.active
            );
            return false;
        }
        grid.clear_search_flags();
        log::info!(
            "starting {} search from {:?} to {:?}",
            kind,
            self.position,
            self.target
        );
        self.search = Some(Search::new(
            kind,
            grid,
            self.position,
            self.target,
            generation,
        ));
        self.active = Some(kind);
        self.state = AgentState::Searching;
        events.push(ExternalEvent::SearchStarted(kind));
        true
    }

    /// One unit of work: a search step while searching, otherwise a movement tick.
    pub fn tick(
        &mut self,
        grid: &mut WorldGrid,
        generation: u64,
        periods: &MovementPeriods,
        events: &mut Vec<ExternalEvent>,
    ) -> AgentTick {
        match self.state {
            AgentState::Idle | AgentState::Arrived => AgentTick::Working,
            AgentState::Searching => self.search_tick(grid, generation, periods, events),
            AgentState::PathFound | AgentState::Moving => self.movement_tick(grid, periods),
        }
    }

    fn search_tick(
        &mut self,
        grid: &mut WorldGrid,
        generation: u64,
        periods: &MovementPeriods,
        events: &mut Vec<ExternalEvent>,
    ) -> AgentTick {
        let (kind, outcome) = match self.search.as_mut() {
            Some(search) => (search.kind(), search.step(grid, generation)),
            None => {
                self.reset();
                return AgentTick::Working;
            }
        };
        match outcome {
            StepOutcome::Continue => AgentTick::Working,
            StepOutcome::Found(path) => {
                for coord in path.coords() {
                    if let Some(cell) = grid.get_mut(coord) {
                        cell.on_final_path = true;
                    }
                }
                events.push(ExternalEvent::PathFound {
                    kind,
                    steps: path.len(),
                    cost: path.cost(),
                });
                self.search = None;
                self.path = path.into_directions();
                self.cursor = 0;
                self.state = AgentState::PathFound;
                self.move_countdown = self.period_here(grid, periods);
                AgentTick::Working
            }
            StepOutcome::Exhausted => {
                log::info!("{} search found no path to {:?}", kind, self.target);
                events.push(ExternalEvent::PathNotFound(kind));
                grid.clear_search_flags();
                self.reset();
                AgentTick::NoPath(kind)
            }
            StepOutcome::Cancelled => {
                log::info!("{} search cancelled", kind);
                events.push(ExternalEvent::SearchCancelled(kind));
                self.reset();
                AgentTick::Working
            }
        }
    }

    fn period_here(&self, grid: &WorldGrid, periods: &MovementPeriods) -> u32 {
        grid.kind(self.position)
            .map(|kind| periods.period(kind))
            .unwrap_or(periods.grass)
    }

    fn movement_tick(&mut self, grid: &mut WorldGrid, periods: &MovementPeriods) -> AgentTick {
        self.move_countdown = self.move_countdown.saturating_sub(1);
        if self.move_countdown > 0 {
            return AgentTick::Working;
        }
        let direction = match self.path.get(self.cursor) {
            Some(&direction) => direction,
            None => {
                if self.position == self.target {
                    self.state = AgentState::Arrived;
                    return AgentTick::Arrived(self.position);
                }
                log::warn!(
                    "path ended at {:?} short of {:?}; abandoning",
                    self.position,
                    self.target
                );
                grid.clear_search_flags();
                self.reset();
                return AgentTick::Working;
            }
        };
        let next = self.position + direction.coord();
        if !grid.is_walkable(next) {
            log::warn!("path blocked at {:?}; abandoning", next);
            grid.clear_search_flags();
            self.reset();
            return AgentTick::Working;
        }
        if let Some(cell) = grid.get_mut(self.position) {
            cell.has_agent = false;
        }
        if let Some(cell) = grid.get_mut(next) {
            cell.has_agent = true;
        }
        self.position = next;
        self.cursor += 1;
        self.state = AgentState::Moving;
        self.move_countdown = self.period_here(grid, periods);
        if self.position == self.target {
            self.state = AgentState::Arrived;
            AgentTick::Arrived(self.position)
        } else {
            AgentTick::Working
        }
    }

    /// Arrived -> Idle. Clears the visualisation and the committed path.
    pub fn complete_arrival(&mut self, grid: &mut WorldGrid) {
        grid.clear_search_flags();
        self.reset();
    }

    /// Abandons any search or path in progress, returning to Idle. Returns the kind of the
    /// abandoned search, if one was running.
    pub fn cancel(&mut self, grid: &mut WorldGrid) -> Option<SearchKind> {
        let cancelled = if self.state == AgentState::Searching {
            self.active
        } else {
            None
        };
        if !self.is_idle() {
            grid.clear_search_flags();
        }
        self.reset();
        cancelled
    }

    fn reset(&mut self) {
        self.state = AgentState::Idle;
        self.active = None;
        self.search = None;
        self.path.clear();
        self.cursor = 0;
        self.move_countdown = 0;
    }
}

impl MovementPeriods {
    /// Ticks spent on a cell of `kind` before moving on.
    pub fn period(&self, kind: TerrainKind) -> u32 {
        match kind {
            TerrainKind::Grass => self.grass,
            TerrainKind::Swamp => self.swamp,
            TerrainKind::Lake | TerrainKind::Rock => self.lake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coord_2d::Size;

    const FAST: MovementPeriods = MovementPeriods {
        grass: 1,
        swamp: 2,
        lake: 3,
    };

    fn agent_at(grid: &mut WorldGrid, position: Coord, target: Coord) -> Agent {
        let mut agent = Agent::new(position);
        agent.set_target(target);
        grid.get_mut(position).unwrap().has_agent = true;
        agent
    }

    fn run(agent: &mut Agent, grid: &mut WorldGrid, events: &mut Vec<ExternalEvent>) -> usize {
        for ticks in 1..10_000 {
            match agent.tick(grid, 0, &FAST, events) {
                AgentTick::Arrived(_) | AgentTick::NoPath(_) => return ticks,
                AgentTick::Working => (),
            }
        }
        panic!("agent never settled");
    }

    #[test]
    fn search_then_walk_to_target() {
        let mut grid = WorldGrid::new(Size::new(6, 6));
        let target = Coord::new(4, 3);
        let mut agent = agent_at(&mut grid, Coord::new(1, 1), target);
        let mut events = Vec::new();
        assert!(agent.start_search(SearchKind::AStar, &mut grid, 0, &mut events));
        assert_eq!(agent.state(), AgentState::Searching);
        run(&mut agent, &mut grid, &mut events);
        assert_eq!(agent.state(), AgentState::Arrived);
        assert_eq!(agent.position(), target);
        assert_eq!(agent.path_cursor(), agent.path().len());
        assert!(grid.get(target).unwrap().has_agent);
        assert_eq!(grid.iter().filter(|cell| cell.has_agent).count(), 1);
        assert!(events.contains(&ExternalEvent::PathFound {
            kind: SearchKind::AStar,
            steps: 5,
            cost: 5
        }));
        agent.complete_arrival(&mut grid);
        assert!(agent.is_idle());
        assert_eq!(agent.active_kind(), None);
        assert!(agent.path().is_empty());
        assert!(grid
            .iter()
            .all(|cell| !cell.visited && !cell.frontier && !cell.on_final_path));
    }

    #[test]
    fn selection_while_busy_is_ignored() {
        let mut grid = WorldGrid::new(Size::new(6, 6));
        let mut agent = agent_at(&mut grid, Coord::new(0, 0), Coord::new(5, 5));
        let mut events = Vec::new();
        assert!(agent.start_search(SearchKind::BreadthFirst, &mut grid, 0, &mut events));
        agent.tick(&mut grid, 0, &FAST, &mut events);
        assert!(!agent.start_search(SearchKind::DepthFirst, &mut grid, 0, &mut events));
        assert_eq!(agent.active_kind(), Some(SearchKind::BreadthFirst));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn exhausted_search_returns_to_idle_and_clears_flags() {
        let mut grid = WorldGrid::from_ascii(
            "
            ..#..
            ..#..
            ",
        );
        let mut agent = agent_at(&mut grid, Coord::new(0, 0), Coord::new(4, 1));
        let mut events = Vec::new();
        agent.start_search(SearchKind::UniformCost, &mut grid, 0, &mut events);
        run(&mut agent, &mut grid, &mut events);
        assert!(agent.is_idle());
        assert!(agent.path().is_empty());
        assert_eq!(agent.path_cursor(), 0);
        assert_eq!(
            events.last(),
            Some(&ExternalEvent::PathNotFound(SearchKind::UniformCost))
        );
        assert!(grid
            .iter()
            .all(|cell| !cell.visited && !cell.frontier && !cell.on_final_path));
    }

    #[test]
    fn movement_speed_depends_on_current_cell() {
        let mut grid = WorldGrid::from_ascii(
            "
            .~.
            ",
        );
        let mut agent = agent_at(&mut grid, Coord::new(0, 0), Coord::new(2, 0));
        let mut events = Vec::new();
        agent.start_search(SearchKind::BreadthFirst, &mut grid, 0, &mut events);
        while agent.state() == AgentState::Searching {
            agent.tick(&mut grid, 0, &FAST, &mut events);
        }
        // one tick on grass, then three ticks on the lake
        assert_eq!(agent.tick(&mut grid, 0, &FAST, &mut events), AgentTick::Working);
        assert_eq!(agent.position(), Coord::new(1, 0));
        assert_eq!(agent.state(), AgentState::Moving);
        assert_eq!(agent.tick(&mut grid, 0, &FAST, &mut events), AgentTick::Working);
        assert_eq!(agent.tick(&mut grid, 0, &FAST, &mut events), AgentTick::Working);
        assert_eq!(
            agent.tick(&mut grid, 0, &FAST, &mut events),
            AgentTick::Arrived(Coord::new(2, 0))
        );
    }

    #[test]
    fn empty_path_arrives_on_next_movement_tick() {
        let mut grid = WorldGrid::new(Size::new(3, 3));
        let here = Coord::new(1, 1);
        let mut agent = agent_at(&mut grid, here, here);
        let mut events = Vec::new();
        agent.start_search(SearchKind::Greedy, &mut grid, 0, &mut events);
        assert_eq!(agent.tick(&mut grid, 0, &FAST, &mut events), AgentTick::Working);
        assert_eq!(agent.state(), AgentState::PathFound);
        assert_eq!(
            agent.tick(&mut grid, 0, &FAST, &mut events),
            AgentTick::Arrived(here)
        );
    }

    #[test]
    fn stale_generation_cancels_search() {
        let mut grid = WorldGrid::new(Size::new(4, 4));
        let mut agent = agent_at(&mut grid, Coord::new(0, 0), Coord::new(3, 3));
        let mut events = Vec::new();
        agent.start_search(SearchKind::DepthFirst, &mut grid, 3, &mut events);
        agent.tick(&mut grid, 4, &FAST, &mut events);
        assert!(agent.is_idle());
        assert_eq!(
            events.last(),
            Some(&ExternalEvent::SearchCancelled(SearchKind::DepthFirst))
        );
    }

    #[test]
    fn blocked_path_is_abandoned() {
        let mut grid = WorldGrid::new(Size::new(4, 1));
        let mut agent = agent_at(&mut grid, Coord::new(0, 0), Coord::new(3, 0));
        let mut events = Vec::new();
        agent.start_search(SearchKind::BreadthFirst, &mut grid, 0, &mut events);
        while agent.state() == AgentState::Searching {
            agent.tick(&mut grid, 0, &FAST, &mut events);
        }
        grid.set_kind(Coord::new(1, 0), TerrainKind::Rock);
        agent.tick(&mut grid, 0, &FAST, &mut events);
        assert!(agent.is_idle());
        assert_eq!(agent.position(), Coord::new(0, 0));
    }
}
