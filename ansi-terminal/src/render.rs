use chargrid::prelude::*;
use forage_game::{Cell, Game, TerrainKind, WorldGrid};

const FOOD: Rgba32 = Rgba32::new_rgb(0xFF, 0xD0, 0x40);
const AGENT: Rgba32 = Rgba32::new_rgb(0xFF, 0xFF, 0xFF);
const PATH: Rgba32 = Rgba32::new_rgb(0xFF, 0x40, 0x40);
const FRONTIER: Rgba32 = Rgba32::new_rgb(0x40, 0xFF, 0x80);
const VISITED: Rgba32 = Rgba32::new_rgb(0x80, 0x80, 0xFF);

fn terrain_background(kind: TerrainKind) -> Rgba32 {
    match kind {
        TerrainKind::Grass => Rgba32::new_rgb(0x20, 0x60, 0x20),
        TerrainKind::Swamp => Rgba32::new_rgb(0x50, 0x40, 0x20),
        TerrainKind::Lake => Rgba32::new_rgb(0x20, 0x40, 0x90),
        TerrainKind::Rock => Rgba32::new_grey(0x50),
    }
}

/// The agent and food hide search markers, which in turn hide the terrain glyph.
pub fn cell_char(cell: &Cell) -> char {
    if cell.has_agent {
        '@'
    } else if cell.has_food {
        '*'
    } else if cell.on_final_path {
        'o'
    } else if cell.frontier {
        '+'
    } else if cell.visited {
        ':'
    } else {
        match cell.kind {
            TerrainKind::Grass => '.',
            TerrainKind::Swamp => ',',
            TerrainKind::Lake => '~',
            TerrainKind::Rock => '#',
        }
    }
}

fn cell_foreground(cell: &Cell) -> Rgba32 {
    if cell.has_agent {
        AGENT
    } else if cell.has_food {
        FOOD
    } else if cell.on_final_path {
        PATH
    } else if cell.frontier {
        FRONTIER
    } else if cell.visited {
        VISITED
    } else {
        Rgba32::new_grey(187)
    }
}

pub fn cell_to_render_cell(cell: &Cell) -> RenderCell {
    RenderCell {
        character: Some(cell_char(cell)),
        style: Style::new()
            .with_bold(cell.has_agent || cell.has_food)
            .with_foreground(cell_foreground(cell))
            .with_background(terrain_background(cell.kind)),
    }
}

pub fn render_grid(grid: &WorldGrid, ctx: Ctx, fb: &mut FrameBuffer) {
    for (coord, cell) in grid.enumerate() {
        fb.set_cell_relative_to_ctx(ctx, coord, 0, cell_to_render_cell(cell));
    }
}

pub fn status_line(game: &Game) -> String {
    let agent = game.agent();
    let strategy = agent
        .active_kind()
        .or(game.selection())
        .map(|kind| kind.name())
        .unwrap_or("none");
    format!(
        "{:?} | strategy: {} | eaten: {}",
        agent.state(),
        strategy,
        game.food_consumed(),
    )
}

pub const HELP: &str = "1-5: strategy  r: regenerate  esc: quit";
