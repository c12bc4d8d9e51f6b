use std::time::Duration;

use labyrinth_core::{
    ActorKind, Command, Coordinate, Event, Grid, GridError, ScriptedRandom, SeededRandom,
};
use labyrinth_system_spawning::{Config, EnemyMilestone, Spawning};
use labyrinth_world::{self as world, query, World};

fn corridor() -> Grid {
    let mut grid = Grid::new(7, 5);
    for x in 1..6 {
        grid.set_path(Coordinate::new(x, 2)).expect("interior cell");
    }
    grid
}

fn elapsed(seconds: u64) -> Vec<Event> {
    vec![Event::TimeAdvanced {
        dt: Duration::from_secs(seconds),
    }]
}

fn spawned(commands: &[Command]) -> Vec<(ActorKind, Coordinate)> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnActor { kind, at } => (*kind, *at),
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn coins_spawn_once_per_period() {
    let grid = corridor();
    let mut spawning = Spawning::default();
    let mut random = ScriptedRandom::new(vec![0, 1, 2]);
    let mut commands = Vec::new();

    spawning
        .handle(&elapsed(2), &grid, None, 0, 0, &mut random, &mut commands)
        .expect("maze has paths");
    assert!(commands.is_empty(), "no spawn before a full period");

    spawning
        .handle(&elapsed(7), &grid, None, 0, 0, &mut random, &mut commands)
        .expect("maze has paths");

    assert_eq!(
        spawned(&commands),
        vec![
            (ActorKind::Coin, Coordinate::new(1, 2)),
            (ActorKind::Coin, Coordinate::new(2, 2)),
            (ActorKind::Coin, Coordinate::new(3, 2)),
        ]
    );
}

#[test]
fn coins_stop_at_the_live_cap() {
    let grid = corridor();
    let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 3));
    let mut random = SeededRandom::new(11);
    let mut commands = Vec::new();

    spawning
        .handle(&elapsed(5), &grid, None, 1, 0, &mut random, &mut commands)
        .expect("maze has paths");

    assert_eq!(commands.len(), 2);
}

#[test]
fn coins_avoid_the_player() {
    let grid = corridor();
    let player = Coordinate::new(1, 2);
    let mut spawning = Spawning::new(Config::new(Duration::from_secs(1), 100));
    let mut random = SeededRandom::new(3);
    let mut commands = Vec::new();

    spawning
        .handle(
            &elapsed(64),
            &grid,
            Some(player),
            0,
            0,
            &mut random,
            &mut commands,
        )
        .expect("maze has paths");

    assert_eq!(commands.len(), 64);
    assert!(spawned(&commands).iter().all(|(_, at)| *at != player));
}

#[test]
fn single_cell_maze_skips_coins_but_not_enemies() {
    let mut grid = Grid::new(5, 5);
    grid.set_path(Coordinate::new(2, 2)).expect("interior cell");
    let config = Config::new(Duration::from_secs(1), 10)
        .with_milestones(vec![EnemyMilestone::new(0, ActorKind::Zombie)]);
    let mut spawning = Spawning::new(config);
    let mut random = SeededRandom::new(5);
    let mut commands = Vec::new();

    spawning
        .handle(
            &elapsed(1),
            &grid,
            Some(Coordinate::new(2, 2)),
            0,
            0,
            &mut random,
            &mut commands,
        )
        .expect("maze has a path");

    assert_eq!(
        spawned(&commands),
        vec![(ActorKind::Zombie, Coordinate::new(2, 2))]
    );
}

#[test]
fn milestones_fire_in_order_and_only_once() {
    let grid = corridor();
    let mut spawning = Spawning::new(
        Config::new(Duration::from_secs(3), 0).with_milestones(vec![
            EnemyMilestone::new(5, ActorKind::Zombie),
            EnemyMilestone::new(10, ActorKind::Mummy),
        ]),
    );
    let mut random = ScriptedRandom::new(vec![4]);
    let mut commands = Vec::new();

    spawning
        .handle(&elapsed(3), &grid, None, 0, 4, &mut random, &mut commands)
        .expect("maze has paths");
    assert!(commands.is_empty());

    spawning
        .handle(&elapsed(3), &grid, None, 0, 12, &mut random, &mut commands)
        .expect("maze has paths");
    spawning
        .handle(&elapsed(3), &grid, None, 0, 12, &mut random, &mut commands)
        .expect("maze has paths");

    assert_eq!(
        spawned(&commands),
        vec![
            (ActorKind::Zombie, Coordinate::new(5, 2)),
            (ActorKind::Mummy, Coordinate::new(5, 2)),
        ]
    );
}

#[test]
fn empty_maze_reports_missing_paths() {
    let grid = Grid::new(5, 5);
    let mut spawning = Spawning::default();
    let mut random = SeededRandom::new(1);
    let mut commands = Vec::new();

    let result = spawning.handle(&elapsed(3), &grid, None, 0, 0, &mut random, &mut commands);

    assert_eq!(result, Err(GridError::NoPathAvailable));
}

#[test]
fn game_over_stops_spawning_until_next_maze() {
    let grid = corridor();
    let mut spawning = Spawning::default();
    let mut random = SeededRandom::new(9);
    let mut commands = Vec::new();

    let mut events = elapsed(30);
    events.insert(
        0,
        Event::GameOver {
            caught_by: ActorKind::Zombie,
            coins_collected: 2,
        },
    );
    spawning
        .handle(&events, &grid, None, 0, 0, &mut random, &mut commands)
        .expect("maze has paths");
    assert!(commands.is_empty());

    let mut events = vec![Event::MazeLoaded {
        width: 7,
        height: 5,
        path_cells: 5,
    }];
    events.extend(elapsed(3));
    spawning
        .handle(&events, &grid, None, 0, 0, &mut random, &mut commands)
        .expect("maze has paths");
    assert_eq!(commands.len(), 1);
}

#[test]
fn spawn_commands_are_accepted_by_the_world() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::LoadMaze { grid: corridor() }, &mut events);

    let mut spawning = Spawning::default();
    let mut random = SeededRandom::new(0x5eed);
    let mut commands = Vec::new();
    spawning
        .handle(
            &elapsed(12),
            query::grid(&world),
            None,
            query::live_coin_count(&world),
            query::session(&world).coins_collected(),
            &mut random,
            &mut commands,
        )
        .expect("maze has paths");

    events.clear();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(query::live_coin_count(&world), 4);
    assert!(events
        .iter()
        .all(|event| matches!(event, Event::ActorSpawned { .. })));
}
