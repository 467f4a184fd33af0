use crate::world::data::{Cell, TerrainKind};
use coord_2d::{Coord, Size};
use direction::CardinalDirection;
use grid_2d::Grid;

/// Order in which neighbours are generated by every search: up, down, left, right.
pub const EXPANSION_ORDER: [CardinalDirection; 4] = [
    CardinalDirection::North,
    CardinalDirection::South,
    CardinalDirection::West,
    CardinalDirection::East,
];

/// Row-major arena of cells. All access is bounds checked; out of bounds reads return `None` and
/// out of bounds writes are refused.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    cells: Grid<Cell>,
}

impl WorldGrid {
    pub fn new(size: Size) -> Self {
        Self {
            cells: Grid::new_copy(size, Cell::default()),
        }
    }

    pub fn from_terrain(terrain: &Grid<TerrainKind>) -> Self {
        Self {
            cells: Grid::new_fn(terrain.size(), |coord| Cell::new(*terrain.get_checked(coord))),
        }
    }

    /// Parses rows of `.` grass, `,` swamp, `~` lake and `#` rock. Any other character is grass.
    /// Rows shorter than the first are padded with grass.
    pub fn from_ascii(s: &str) -> Self {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        let size = Size::new(width as u32, rows.len() as u32);
        let mut grid = Self::new(size);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    ',' => TerrainKind::Swamp,
                    '~' => TerrainKind::Lake,
                    '#' => TerrainKind::Rock,
                    _ => TerrainKind::Grass,
                };
                grid.set_kind(Coord::new(x as i32, y as i32), kind);
            }
        }
        grid
    }

    pub fn size(&self) -> Size {
        self.cells.size()
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.get(coord).is_some()
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(coord)
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.cells.get_mut(coord)
    }

    pub fn kind(&self, coord: Coord) -> Option<TerrainKind> {
        self.get(coord).map(|cell| cell.kind)
    }

    /// In bounds and not rock.
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.get(coord).map(Cell::is_walkable).unwrap_or(false)
    }

    pub fn entry_cost(&self, coord: Coord) -> Option<u32> {
        self.get(coord).and_then(Cell::entry_cost)
    }

    /// Returns false if the coordinate is out of bounds.
    pub fn set_kind(&mut self, coord: Coord, kind: TerrainKind) -> bool {
        if let Some(cell) = self.get_mut(coord) {
            cell.kind = kind;
            true
        } else {
            false
        }
    }

    /// Walkable orthogonal neighbours of `coord` in expansion order, with the direction taken
    /// to reach each one.
    pub fn walkable_neighbours(
        &self,
        coord: Coord,
    ) -> impl '_ + Iterator<Item = (CardinalDirection, Coord)> {
        EXPANSION_ORDER.into_iter().filter_map(move |direction| {
            let neighbour = coord + direction.coord();
            if self.is_walkable(neighbour) {
                Some((direction, neighbour))
            } else {
                None
            }
        })
    }

    pub fn iter(&self) -> impl '_ + Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn enumerate(&self) -> impl '_ + Iterator<Item = (Coord, &Cell)> {
        self.cells.enumerate()
    }

    pub fn rows(&self) -> impl '_ + Iterator<Item = &[Cell]> {
        self.cells.rows()
    }

    pub fn clear_search_flags(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clear_search_flags();
        }
    }

    pub fn clear_frontier(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.frontier = false;
        }
    }

    pub fn food_coords(&self) -> impl '_ + Iterator<Item = Coord> {
        self.enumerate()
            .filter(|(_, cell)| cell.has_food)
            .map(|(coord, _)| coord)
    }

    pub fn clear_food(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.has_food = false;
        }
    }
}
