//! Step-wise graph search over a `WorldGrid`.
//!
//! A `Search` is created for one (start, target) pair and advanced one expansion at a time with
//! `Search::step`, so a driver can observe the frontier and visited flags between steps. All five
//! strategies share the same run state and differ only in their frontier discipline and in how
//! they decide whether a newly reached cell is worth pushing.

use crate::world::WorldGrid;
use coord_2d::Coord;
use direction::CardinalDirection;
use grid_2d::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod frontier;
mod path;

use frontier::{Frontier, StackEntry};
pub use path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    Greedy,
    AStar,
}

impl SearchKind {
    pub const ALL: [Self; 5] = [
        Self::BreadthFirst,
        Self::DepthFirst,
        Self::UniformCost,
        Self::Greedy,
        Self::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BreadthFirst => "breadth-first",
            Self::DepthFirst => "depth-first",
            Self::UniformCost => "uniform-cost",
            Self::Greedy => "greedy",
            Self::AStar => "a-star",
        }
    }

    fn priority(self, cost: u32, coord: Coord, target: Coord) -> u32 {
        match self {
            Self::UniformCost => cost,
            Self::Greedy => manhattan_distance(coord, target),
            Self::AStar => cost + manhattan_distance(coord, target),
            Self::BreadthFirst | Self::DepthFirst => 0,
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search strategy {0:?} (expected one of bfs, dfs, ucs, greedy, astar)")]
pub struct ParseSearchKindError(pub String);

impl FromStr for SearchKind {
    type Err = ParseSearchKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Self::BreadthFirst),
            "dfs" | "depth-first" => Ok(Self::DepthFirst),
            "ucs" | "uniform-cost" => Ok(Self::UniformCost),
            "greedy" => Ok(Self::Greedy),
            "astar" | "a-star" => Ok(Self::AStar),
            _ => Err(ParseSearchKindError(s.to_string())),
        }
    }
}

pub fn manhattan_distance(a: Coord, b: Coord) -> u32 {
    let delta = a - b;
    delta.x.unsigned_abs() + delta.y.unsigned_abs()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Found(Path),
    Exhausted,
    /// The world changed under the search. Nothing was mutated.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Search {
    kind: SearchKind,
    start: Coord,
    target: Coord,
    generation: u64,
    frontier: Frontier,
    /// Cells which have been pushed at least once.
    discovered: Grid<bool>,
    /// Cells which have been expanded.
    closed: Grid<bool>,
    /// Lowest accumulated entry cost seen so far, for the cost-aware variants.
    best_cost: Grid<Option<u32>>,
    came_from: Grid<Option<CardinalDirection>>,
    expansion_order: Vec<Coord>,
    finished: bool,
}

impl Search {
    /// Starts a search from `start` to `target`. `start` is pushed onto the frontier and flagged
    /// on `grid`. `generation` ties the search to the world it was started in.
    pub fn new(
        kind: SearchKind,
        grid: &mut WorldGrid,
        start: Coord,
        target: Coord,
        generation: u64,
    ) -> Self {
        let size = grid.size();
        let frontier = match kind {
            SearchKind::BreadthFirst => Frontier::fifo(),
            SearchKind::DepthFirst => Frontier::lifo(),
            SearchKind::UniformCost | SearchKind::Greedy | SearchKind::AStar => {
                Frontier::priority()
            }
        };
        let mut search = Self {
            kind,
            start,
            target,
            generation,
            frontier,
            discovered: Grid::new_copy(size, false),
            closed: Grid::new_copy(size, false),
            best_cost: Grid::new_copy(size, None),
            came_from: Grid::new_copy(size, None),
            expansion_order: Vec::new(),
            finished: false,
        };
        if grid.is_walkable(start) {
            search.push(grid, start, None, 0);
        }
        search
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Cells in the order they were expanded.
    pub fn expansion_order(&self) -> &[Coord] {
        &self.expansion_order
    }

    /// Expands at most one cell. Once a terminal outcome has been returned every further call
    /// returns `Exhausted`.
    pub fn step(&mut self, grid: &mut WorldGrid, generation: u64) -> StepOutcome {
        if generation != self.generation || grid.size() != self.closed.size() {
            return StepOutcome::Cancelled;
        }
        if self.finished {
            return StepOutcome::Exhausted;
        }
        let (current, cost) = match self.pop(grid) {
            Some(next) => next,
            None => return self.finish(grid, StepOutcome::Exhausted),
        };
        if let Some(closed) = self.closed.get_mut(current) {
            *closed = true;
        }
        if let Some(cell) = grid.get_mut(current) {
            cell.frontier = false;
            cell.visited = true;
        }
        self.expansion_order.push(current);
        if current == self.target {
            let outcome = match path::reconstruct(&self.came_from, grid, self.start, self.target)
            {
                Some(path) => StepOutcome::Found(path),
                None => StepOutcome::Exhausted,
            };
            return self.finish(grid, outcome);
        }
        let neighbours = grid.walkable_neighbours(current).collect::<Vec<_>>();
        for (direction, neighbour) in neighbours {
            if self.is_closed(neighbour) {
                continue;
            }
            let entry_cost = match grid.entry_cost(neighbour) {
                Some(entry_cost) => entry_cost,
                None => continue,
            };
            let neighbour_cost = cost + entry_cost;
            match self.kind {
                SearchKind::BreadthFirst | SearchKind::Greedy => {
                    // first discovery wins
                    if self.is_discovered(neighbour) {
                        continue;
                    }
                    self.set_came_from(neighbour, direction);
                }
                SearchKind::DepthFirst => (),
                SearchKind::UniformCost | SearchKind::AStar => {
                    let improves = self
                        .best_cost
                        .get(neighbour)
                        .map(|best| best.map_or(true, |best| neighbour_cost < best))
                        .unwrap_or(false);
                    if !improves {
                        continue;
                    }
                    self.set_came_from(neighbour, direction);
                }
            }
            self.push(grid, neighbour, Some(direction), neighbour_cost);
        }
        StepOutcome::Continue
    }

    fn is_closed(&self, coord: Coord) -> bool {
        self.closed.get(coord).copied().unwrap_or(true)
    }

    fn is_discovered(&self, coord: Coord) -> bool {
        self.discovered.get(coord).copied().unwrap_or(true)
    }

    fn set_came_from(&mut self, coord: Coord, direction: CardinalDirection) {
        if let Some(came_from) = self.came_from.get_mut(coord) {
            *came_from = Some(direction);
        }
    }

    fn push(
        &mut self,
        grid: &mut WorldGrid,
        coord: Coord,
        via: Option<CardinalDirection>,
        cost: u32,
    ) {
        match self.kind {
            SearchKind::BreadthFirst => self.frontier.push_back(coord),
            SearchKind::DepthFirst => self.frontier.push_stack(StackEntry { coord, via }),
            SearchKind::UniformCost | SearchKind::Greedy | SearchKind::AStar => {
                let priority = self.kind.priority(cost, coord, self.target);
                self.frontier.push_priority(coord, priority, cost);
            }
        }
        if let Some(discovered) = self.discovered.get_mut(coord) {
            *discovered = true;
        }
        if let Some(best) = self.best_cost.get_mut(coord) {
            *best = Some(best.map_or(cost, |best| best.min(cost)));
        }
        if let Some(cell) = grid.get_mut(coord) {
            cell.frontier = true;
        }
    }

    // Pops the next cell to expand along with its accumulated cost, discarding entries for cells
    // which have already been expanded and heap entries which have since been improved upon.
    fn pop(&mut self, grid: &WorldGrid) -> Option<(Coord, u32)> {
        match self.kind {
            SearchKind::BreadthFirst => {
                let coord = self.frontier.pop_front()?;
                let cost = self.best_cost.get(coord).copied().flatten().unwrap_or(0);
                Some((coord, cost))
            }
            SearchKind::DepthFirst => loop {
                let StackEntry { coord, via } = self.frontier.pop_stack()?;
                if self.is_closed(coord) || !grid.is_walkable(coord) {
                    continue;
                }
                if let Some(direction) = via {
                    self.set_came_from(coord, direction);
                }
                let cost = match via {
                    Some(direction) => {
                        let parent = coord - direction.coord();
                        let parent_cost = self.best_cost.get(parent).copied().flatten();
                        parent_cost.unwrap_or(0) + grid.entry_cost(coord).unwrap_or(0)
                    }
                    None => 0,
                };
                if let Some(best) = self.best_cost.get_mut(coord) {
                    *best = Some(cost);
                }
                break Some((coord, cost));
            },
            SearchKind::UniformCost | SearchKind::Greedy | SearchKind::AStar => loop {
                let entry = self.frontier.pop_priority()?;
                if self.is_closed(entry.coord) {
                    continue;
                }
                if self.kind != SearchKind::Greedy {
                    let best = self.best_cost.get(entry.coord).copied().flatten();
                    if best.map_or(false, |best| entry.cost > best) {
                        continue;
                    }
                }
                break Some((entry.coord, entry.cost));
            },
        }
    }

    fn finish(&mut self, grid: &mut WorldGrid, outcome: StepOutcome) -> StepOutcome {
        self.finished = true;
        grid.clear_frontier();
        match &outcome {
            StepOutcome::Found(path) => log::info!(
                "{} search found a path of {} steps with cost {} after {} expansions",
                self.kind,
                path.len(),
                path.cost(),
                self.expansion_order.len()
            ),
            StepOutcome::Exhausted => log::info!(
                "{} search exhausted the frontier after {} expansions",
                self.kind,
                self.expansion_order.len()
            ),
            StepOutcome::Continue | StepOutcome::Cancelled => (),
        }
        outcome
    }
}

/// The terminal result of running a search without pacing.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub path: Option<Path>,
    pub expansion_order: Vec<Coord>,
}

/// Drives a search to completion on `grid`, stepping until a terminal outcome.
pub fn run_to_completion(
    kind: SearchKind,
    grid: &mut WorldGrid,
    start: Coord,
    target: Coord,
) -> SearchResult {
    let mut search = Search::new(kind, grid, start, target, 0);
    let path = loop {
        match search.step(grid, 0) {
            StepOutcome::Continue => (),
            StepOutcome::Found(path) => break Some(path),
            StepOutcome::Exhausted | StepOutcome::Cancelled => break None,
        }
    };
    SearchResult {
        path,
        expansion_order: search.expansion_order,
    }
}
