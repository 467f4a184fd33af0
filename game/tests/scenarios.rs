use forage_game::{
    search, Agent, AgentState, Config, Coord, ExternalEvent, Game, MovementPeriods, SearchKind,
    Size, TerrainKind, WorldGrid,
};
use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

#[test]
fn open_ten_by_ten() {
    let start = Coord::new(0, 0);
    let target = Coord::new(5, 5);
    for kind in SearchKind::ALL {
        let mut grid = WorldGrid::new(Size::new(10, 10));
        let path = search::run_to_completion(kind, &mut grid, start, target)
            .path
            .expect("open grid is always solvable");
        assert_eq!(path.end(), target);
        match kind {
            SearchKind::BreadthFirst => assert_eq!(path.len(), 10),
            SearchKind::UniformCost | SearchKind::AStar => assert_eq!(path.cost(), 10),
            SearchKind::DepthFirst | SearchKind::Greedy => assert!(path.cost() >= 10),
        }
    }
}

#[test]
fn rock_wall_blocks_every_strategy() {
    let terrain = "
        ...#....
        .,.#..~.
        ...#....
        ~..#..,.
        ...#....
    ";
    for kind in SearchKind::ALL {
        let mut grid = WorldGrid::from_ascii(terrain);
        let mut agent = Agent::new(Coord::new(1, 2));
        agent.set_target(Coord::new(6, 2));
        let mut events = Vec::new();
        let periods = MovementPeriods::default();
        assert!(agent.start_search(kind, &mut grid, 0, &mut events));
        for _ in 0..1000 {
            agent.tick(&mut grid, 0, &periods, &mut events);
            if agent.is_idle() {
                break;
            }
        }
        assert_eq!(agent.state(), AgentState::Idle);
        assert_eq!(events.last(), Some(&ExternalEvent::PathNotFound(kind)));
        assert!(agent.path().is_empty());
        assert!(grid
            .iter()
            .all(|cell| !cell.visited && !cell.frontier && !cell.on_final_path));
    }
}

#[test]
fn spawn_constraints_hold_for_generated_worlds() {
    for seed in 0..100 {
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        let game = Game::new(&Config::default(), &mut rng).unwrap();
        let agent = game.agent().position();
        let agent_kind = game.grid().kind(agent).unwrap();
        assert!(!matches!(agent_kind, TerrainKind::Rock | TerrainKind::Lake));
        let food = game.agent().target();
        assert_ne!(game.grid().kind(food), Some(TerrainKind::Rock));
        assert!(game.grid().food_coords().count() <= 1);
        assert_eq!(game.grid().iter().filter(|cell| cell.has_agent).count(), 1);
        assert!(game
            .grid()
            .iter()
            .all(|cell| cell.kind != TerrainKind::Rock || (!cell.has_food && !cell.has_agent)));
    }
}

#[test]
fn food_cycles_keep_one_food_and_one_agent() {
    let config = Config {
        columns: 15,
        rows: 15,
        rock_seeds: 0,
        movement_period: MovementPeriods {
            grass: 1,
            swamp: 1,
            lake: 1,
        },
        ..Config::default()
    };
    let mut game = Game::new(&config, &mut Isaac64Rng::seed_from_u64(7)).unwrap();
    game.select_strategy(Some(SearchKind::UniformCost));
    let mut consumed = Vec::new();
    let mut placed = Vec::new();
    for _ in 0..20_000 {
        game.tick().unwrap();
        for event in game.events() {
            match event {
                ExternalEvent::FoodConsumed(coord) => consumed.push(coord),
                ExternalEvent::FoodPlaced(coord) => placed.push(coord),
                _ => (),
            }
        }
        assert!(game.grid().food_coords().count() <= 1);
        assert_eq!(game.grid().iter().filter(|cell| cell.has_agent).count(), 1);
        assert!(game.grid().get(game.agent().position()).unwrap().has_agent);
    }
    assert!(game.food_consumed() > 0);
    assert_eq!(consumed.len() as u64, game.food_consumed());
    // the initial placement, then one per consumption
    assert_eq!(placed.len(), consumed.len() + 1);
    for coord in placed {
        assert_ne!(game.grid().kind(coord), Some(TerrainKind::Rock));
    }
}

#[test]
fn edit_mid_search_restarts_with_selection() {
    let config = Config {
        rock_seeds: 0,
        ..Config::default()
    };
    let mut game = Game::new(&config, &mut Isaac64Rng::seed_from_u64(3)).unwrap();
    game.select_strategy(Some(SearchKind::BreadthFirst));
    let before = game.generation();
    let agent = game.agent().position();
    let coord = Coord::new(if agent.x == 0 { 1 } else { 0 }, agent.y);
    game.edit_cell(coord, TerrainKind::Swamp).unwrap();
    assert_eq!(game.generation(), before + 1);
    assert!(game.agent().is_idle());
    game.tick().unwrap();
    assert_eq!(game.agent().active_kind(), Some(SearchKind::BreadthFirst));
    let events = game.events().collect::<Vec<_>>();
    assert!(events.contains(&ExternalEvent::SearchCancelled(SearchKind::BreadthFirst)));
}
