use crate::world::WorldGrid;
use coord_2d::Coord;
use direction::CardinalDirection;
use grid_2d::Grid;
use serde::{Deserialize, Serialize};

/// Sequence of orthogonal moves from `start`. Applying every direction in order from `start`
/// lands on the search's target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    start: Coord,
    directions: Vec<CardinalDirection>,
    cost: u32,
}

impl Path {
    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn directions(&self) -> &[CardinalDirection] {
        &self.directions
    }

    pub fn into_directions(self) -> Vec<CardinalDirection> {
        self.directions
    }

    /// Sum of the entry costs of every cell after the start.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Every cell on the path, start and end included.
    pub fn coords(&self) -> impl '_ + Iterator<Item = Coord> {
        std::iter::once(self.start).chain(self.directions.iter().scan(
            self.start,
            |coord, direction| {
                *coord = *coord + direction.coord();
                Some(*coord)
            },
        ))
    }

    pub fn end(&self) -> Coord {
        self.directions
            .iter()
            .fold(self.start, |coord, direction| coord + direction.coord())
    }
}

/// Walks `came_from` backwards from `target` to `start`. Returns `None` if the chain is broken.
pub(super) fn reconstruct(
    came_from: &Grid<Option<CardinalDirection>>,
    grid: &WorldGrid,
    start: Coord,
    target: Coord,
) -> Option<Path> {
    let mut directions = Vec::new();
    let mut cost = 0;
    let mut current = target;
    while current != start {
        let direction = (*came_from.get(current)?)?;
        cost += grid.entry_cost(current)?;
        directions.push(direction);
        current = current - direction.coord();
    }
    directions.reverse();
    Some(Path {
        start,
        directions,
        cost,
    })
}
