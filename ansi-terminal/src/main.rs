use chargrid_ansi_terminal::{col_encode, Context};
use forage_game::{Config, Game, SearchKind};
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

mod app;
mod render;

struct Args {
    rng_seed: u64,
    config_path: Option<String>,
    search: SearchKind,
    ticks: Option<u64>,
    headless: bool,
    food: Option<u64>,
}

impl Args {
    fn parser() -> impl meap::Parser<Item = Self> {
        meap::let_map! {
            let {
                rng_seed = opt_opt::<u64, _>("INT", 'r').name("rng-seed").desc("rng seed")
                    .with_default_lazy_general(|| rand::thread_rng().gen());
                config_path = opt_opt::<String, _>("PATH", 'c').name("config")
                    .desc("json config file");
                search = opt_opt::<SearchKind, _>("STRATEGY", 's').name("search")
                    .desc("bfs, dfs, ucs, greedy or astar")
                    .with_default(SearchKind::AStar);
                ticks = opt_opt::<u64, _>("INT", 't').name("ticks")
                    .desc("stop after this many ticks (frames when drawing)");
                headless = flag("headless").desc("log events without drawing frames");
                food = opt_opt::<u64, _>("INT", 'n').name("food").desc("stop after eating this much food");
            } in {
                Self {
                    rng_seed,
                    config_path,
                    search,
                    ticks,
                    headless,
                    food,
                }
            }
        }
    }
}

fn load_config(path: &str) -> Config {
    let result = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| serde_json::from_str(&contents).map_err(|e| e.to_string()));
    match result {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config from {}: {}", path, e);
            Config::default()
        }
    }
}

fn run_headless(mut game: Game, limits: app::Limits) {
    let mut tick_count = 0;
    while !limits.frames.map_or(false, |ticks| tick_count >= ticks)
        && !limits.food.map_or(false, |food| game.food_consumed() >= food)
    {
        if let Err(e) = game.tick() {
            log::error!("{}", e);
            std::process::exit(1);
        }
        tick_count += 1;
        game.events().for_each(app::log_event);
    }
    println!("{} food eaten in {} ticks", game.food_consumed(), tick_count);
}

fn main() {
    use meap::Parser;
    env_logger::init();
    let Args {
        rng_seed,
        config_path,
        search,
        ticks,
        headless,
        food,
    } = Args::parser().with_help_default().parse_env_or_exit();
    println!("RNG Seed: {}", rng_seed);
    let config = config_path.as_deref().map(load_config).unwrap_or_default();
    let mut rng = Isaac64Rng::seed_from_u64(rng_seed);
    let mut game = match Game::new(&config, &mut rng) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    game.select_strategy(Some(search));
    let limits = app::Limits {
        frames: ticks,
        food,
    };
    if headless {
        run_headless(game, limits);
        return;
    }
    let context = match Context::new() {
        Ok(context) => context,
        Err(e) => {
            log::error!("Failed to initialise terminal: {:?}", e);
            std::process::exit(1);
        }
    };
    context.run(app::app(game, limits), col_encode::XtermTrueColour);
}
