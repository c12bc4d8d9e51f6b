use std::time::Duration;

use labyrinth_core::{ActorKind, Command, Coordinate, Direction, Event, Grid, SeededRandom};
use labyrinth_system_maze_generation::MazeGenerator;
use labyrinth_system_movement::{step, Movement, StepOutcome};
use labyrinth_world::{self as world, query, World};

fn grid_with_paths(paths: &[(u32, u32)]) -> Grid {
    let mut grid = Grid::new(7, 7);
    for &(x, y) in paths {
        grid.set_path(Coordinate::new(x, y)).expect("interior cell");
    }
    grid
}

#[test]
fn blocked_turn_continues_north() {
    let grid = grid_with_paths(&[(3, 3), (3, 4), (3, 5)]);

    let outcome = step(
        &grid,
        Coordinate::new(3, 3),
        Direction::North,
        Direction::East,
    );

    assert_eq!(
        outcome,
        StepOutcome {
            coordinate: Coordinate::new(3, 4),
            facing: Direction::North,
        }
    );
}

#[test]
fn buffered_turn_is_taken_once_it_opens() {
    let grid = grid_with_paths(&[(3, 3), (3, 4), (4, 4)]);

    let first = step(
        &grid,
        Coordinate::new(3, 3),
        Direction::North,
        Direction::East,
    );
    let second = step(&grid, first.coordinate, first.facing, Direction::East);

    assert_eq!(first.coordinate, Coordinate::new(3, 4));
    assert_eq!(
        second,
        StepOutcome {
            coordinate: Coordinate::new(4, 4),
            facing: Direction::East,
        }
    );
}

#[test]
fn blocked_forward_step_is_idempotent() {
    let grid = grid_with_paths(&[(3, 3), (3, 2)]);

    let first = step(
        &grid,
        Coordinate::new(3, 3),
        Direction::North,
        Direction::North,
    );
    let second = step(&grid, first.coordinate, first.facing, Direction::North);

    assert_eq!(first.coordinate, Coordinate::new(3, 3));
    assert_eq!(first, second);
}

#[test]
fn steps_never_leave_the_maze() {
    let directions = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Invalid,
    ];

    for seed in 0..32_u64 {
        let mut grid = Grid::new(11, 9);
        let _ = MazeGenerator::new().generate(&mut grid, &mut SeededRandom::new(seed));

        for origin in grid.path_coordinates() {
            for facing in directions {
                for requested in directions {
                    let outcome = step(&grid, origin, facing, requested);
                    assert!(grid.is_path(outcome.coordinate));
                    assert!(outcome.coordinate.manhattan_distance(origin) <= 1);
                }
            }
        }
    }
}

fn corridor_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    let grid = grid_with_paths(&[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]);
    world::apply(&mut world, Command::LoadMaze { grid }, &mut events);
    world
}

fn run_frame(world: &mut World, movement: &mut Movement, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let snapshots = query::actor_view(world).into_vec();
    let mut commands = Vec::new();
    movement.handle(&events, &snapshots, query::grid(world), &mut commands);

    let mut step_events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut step_events);
    }
    step_events
}

#[test]
fn system_waits_for_time_to_advance() {
    let mut world = corridor_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Player,
            at: Coordinate::new(1, 1),
        },
        &mut events,
    );

    let snapshots = query::actor_view(&world).into_vec();
    let mut commands = Vec::new();
    let mut movement = Movement::new();
    movement.handle(&events, &snapshots, query::grid(&world), &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn player_runs_along_the_corridor_at_its_own_pace() {
    let mut world = corridor_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Player,
            at: Coordinate::new(1, 1),
        },
        &mut events,
    );
    let player = query::player(&world).expect("player spawned").id;
    world::apply(
        &mut world,
        Command::RequestDirection {
            actor: player,
            direction: Direction::East,
        },
        &mut events,
    );

    let mut movement = Movement::new();
    let frame = Duration::from_millis(125);
    let mut advanced = 0;
    for _ in 0..8 {
        advanced += run_frame(&mut world, &mut movement, frame)
            .iter()
            .filter(|event| matches!(event, Event::ActorAdvanced { .. }))
            .count();
    }

    assert_eq!(advanced, 4);
    assert_eq!(
        query::player(&world).map(|snapshot| snapshot.coordinate),
        Some(Coordinate::new(5, 1))
    );
}

#[test]
fn animating_actors_are_skipped() {
    let mut world = corridor_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Zombie,
            at: Coordinate::new(1, 1),
        },
        &mut events,
    );
    let zombie = query::actor_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("zombie spawned");
    world::apply(
        &mut world,
        Command::RequestDirection {
            actor: zombie,
            direction: Direction::East,
        },
        &mut events,
    );

    let mut movement = Movement::new();
    let first = run_frame(&mut world, &mut movement, Duration::from_millis(10));
    let second = run_frame(&mut world, &mut movement, Duration::from_millis(10));

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[test]
fn game_over_halts_the_system() {
    let mut movement = Movement::new();
    let grid = grid_with_paths(&[(1, 1)]);
    let mut commands = Vec::new();

    movement.handle(
        &[
            Event::GameOver {
                caught_by: ActorKind::Zombie,
                coins_collected: 3,
            },
            Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            },
        ],
        &[],
        &grid,
        &mut commands,
    );
    movement.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }],
        &[],
        &grid,
        &mut commands,
    );

    assert!(movement.is_halted());
    assert!(commands.is_empty());
}

#[test]
fn loading_a_maze_resumes_after_game_over() {
    let mut movement = Movement::new();
    let mut world = corridor_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnActor {
            kind: ActorKind::Player,
            at: Coordinate::new(1, 1),
        },
        &mut events,
    );
    let mut commands = Vec::new();
    movement.handle(
        &[Event::GameOver {
            caught_by: ActorKind::Mummy,
            coins_collected: 0,
        }],
        &[],
        query::grid(&world),
        &mut commands,
    );
    assert!(movement.is_halted());

    let grid = query::grid(&world).clone();
    let snapshots = query::actor_view(&world).into_vec();
    movement.handle(
        &[
            Event::MazeLoaded {
                width: grid.width(),
                height: grid.height(),
                path_cells: 5,
            },
            Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            },
        ],
        &snapshots,
        &grid,
        &mut commands,
    );

    assert!(!movement.is_halted());
    assert_eq!(commands.len(), 1);
}
