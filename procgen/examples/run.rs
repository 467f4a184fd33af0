use chargrid::{control_flow::*, core::*};
use chargrid::core::rgb_int::Rgba32;
use chargrid_ansi_terminal::{col_encode, Context};
use coord_2d::Size;
use grid_2d::Grid;
use procgen::{generate_grid, Spec, TerrainKind};
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

struct Args {
    size: Size,
    spec: Spec,
    rng: Isaac64Rng,
}

impl Args {
    fn parser() -> impl meap::Parser<Item = Self> {
        meap::let_map! {
            let {
                rng_seed = opt_opt::<u64, _>("INT", 'r').name("rng-seed").desc("rng seed")
                    .with_default_lazy_general(|| rand::thread_rng().gen());
                width = opt_opt("INT", 'x').name("width").with_default(30);
                height = opt_opt("INT", 'y').name("height").with_default(20);
                rock_seeds = opt_opt("INT", "rocks").desc("number of rock seeds").with_default(20);
                swamp_seeds = opt_opt("INT", "swamps").desc("number of swamp seeds").with_default(2);
                lake_seeds = opt_opt("INT", "lakes").desc("number of lake seeds").with_default(1);
            } in {{
                eprintln!("RNG Seed: {}", rng_seed);
                let rng = Isaac64Rng::seed_from_u64(rng_seed);
                let size = Size::new(width, height);
                let spec = Spec {
                    rock_seeds,
                    swamp_seeds,
                    lake_seeds,
                    ..Spec::default()
                };
                Self {
                    size,
                    spec,
                    rng,
                }
            }}
        }
    }
}

fn render_cell(kind: TerrainKind) -> RenderCell {
    let (character, background) = match kind {
        TerrainKind::Grass => ('.', Rgba32::new_rgb(0x20, 0x60, 0x20)),
        TerrainKind::Swamp => (',', Rgba32::new_rgb(0x50, 0x40, 0x20)),
        TerrainKind::Lake => ('~', Rgba32::new_rgb(0x20, 0x40, 0x90)),
        TerrainKind::Rock => ('#', Rgba32::new_grey(0x50)),
    };
    RenderCell::default()
        .with_character(character)
        .with_foreground(Rgba32::new_grey(187))
        .with_background(background)
}

fn app(terrain: Grid<TerrainKind>) -> App {
    render(move |ctx, fb| {
        for (coord, &kind) in terrain.enumerate() {
            fb.set_cell_relative_to_ctx(ctx, coord, 0, render_cell(kind));
        }
    })
    .press_any_key()
    .map(|()| app::Exit)
}

fn run(terrain: Grid<TerrainKind>) {
    let context = Context::new().unwrap();
    let app = app(terrain);
    context.run(app, col_encode::XtermTrueColour);
}

fn main() {
    use meap::Parser;
    let Args {
        size,
        spec,
        mut rng,
    } = Args::parser().with_help_default().parse_env_or_exit();
    match generate_grid(size, &spec, &mut rng) {
        Ok((terrain, _)) => run(terrain),
        Err(e) => eprintln!("{}", e),
    }
}
