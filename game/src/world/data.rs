pub use procgen::TerrainKind;
use serde::{Deserialize, Serialize};

/// One square of the world. `kind` only changes on generation or an explicit edit; the flags are
/// written by the active search and by the agent, and read by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: TerrainKind,
    pub visited: bool,
    pub frontier: bool,
    pub on_final_path: bool,
    pub has_agent: bool,
    pub has_food: bool,
}

impl Cell {
    pub fn new(kind: TerrainKind) -> Self {
        Self {
            kind,
            visited: false,
            frontier: false,
            on_final_path: false,
            has_agent: false,
            has_food: false,
        }
    }

    pub fn entry_cost(&self) -> Option<u32> {
        self.kind.entry_cost()
    }

    pub fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }

    pub fn clear_search_flags(&mut self) {
        self.visited = false;
        self.frontier = false;
        self.on_final_path = false;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(TerrainKind::Grass)
    }
}
