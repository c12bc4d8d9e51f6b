use std::time::Duration;

use labyrinth_core::{
    ActorId, ActorKind, ActorPhase, ActorSnapshot, Command, Coordinate, Direction, Event, Grid,
    ScriptedRandom,
};
use labyrinth_system_navigation::{
    effective_direction, Config, Navigation, NavigationController, NavigationPolicy,
};

fn grid_with_paths(paths: &[(u32, u32)]) -> Grid {
    let mut grid = Grid::new(7, 7);
    for &(x, y) in paths {
        grid.set_path(Coordinate::new(x, y)).expect("interior cell");
    }
    grid
}

fn open_grid() -> Grid {
    let mut paths = Vec::new();
    for y in 1..6 {
        for x in 1..6 {
            paths.push((x, y));
        }
    }
    grid_with_paths(&paths)
}

fn enemy(id: u32, at: Coordinate, facing: Direction) -> ActorSnapshot {
    ActorSnapshot {
        id: ActorId::new(id),
        kind: ActorKind::Zombie,
        coordinate: at,
        facing,
        requested: facing,
        phase: ActorPhase::Ready,
    }
}

fn time_advanced() -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(16),
    }
}

#[test]
fn right_hand_rule_prefers_right_then_straight_then_left_then_back() {
    let origin = Coordinate::new(3, 3);
    let mut controller = NavigationController::new();

    let crossroads = grid_with_paths(&[(3, 3), (3, 4), (3, 2), (2, 3), (4, 3)]);
    assert_eq!(
        controller.follow_wall(&crossroads, origin, Direction::North),
        Direction::East
    );

    let tee = grid_with_paths(&[(3, 3), (3, 4), (3, 2), (2, 3)]);
    assert_eq!(
        controller.follow_wall(&tee, origin, Direction::North),
        Direction::North
    );

    let corner = grid_with_paths(&[(3, 3), (3, 2), (2, 3)]);
    assert_eq!(
        controller.follow_wall(&corner, origin, Direction::North),
        Direction::West
    );

    let dead_end = grid_with_paths(&[(3, 3), (3, 2)]);
    assert_eq!(
        controller.follow_wall(&dead_end, origin, Direction::North),
        Direction::South
    );
    assert_eq!(controller.previous(), Direction::South);
}

#[test]
fn wall_following_reverses_only_at_dead_ends() {
    let grid = grid_with_paths(&[(1, 3), (2, 3), (3, 3), (4, 3), (5, 3)]);
    let mut controller = NavigationController::new();
    let mut position = Coordinate::new(2, 3);
    let mut facing = Direction::East;
    let mut chosen = Vec::new();

    for _ in 0..6 {
        facing = controller.follow_wall(&grid, position, facing);
        chosen.push(facing);
        position = position.step(facing).expect("corridor stays in grid");
    }

    assert_eq!(
        chosen,
        vec![
            Direction::East,
            Direction::East,
            Direction::East,
            Direction::West,
            Direction::West,
            Direction::West,
        ]
    );
    assert_eq!(position, Coordinate::new(2, 3));
}

#[test]
fn surrounded_actor_gets_no_direction() {
    let grid = grid_with_paths(&[(3, 3)]);
    let mut controller = NavigationController::new();
    assert_eq!(
        controller.follow_wall(&grid, Coordinate::new(3, 3), Direction::North),
        Direction::Invalid
    );
    assert_eq!(
        controller.follow_wall(&grid, Coordinate::new(3, 3), Direction::Invalid),
        Direction::Invalid
    );
}

#[test]
fn effective_direction_prefers_the_open_axis() {
    let grid = grid_with_paths(&[(1, 1), (2, 1), (3, 1), (3, 2), (3, 3)]);
    assert_eq!(
        effective_direction(&grid, Coordinate::new(1, 1), Coordinate::new(3, 3)),
        Direction::East
    );

    let corridor = grid_with_paths(&[(1, 3), (2, 3), (3, 3), (4, 3), (5, 3)]);
    assert_eq!(
        effective_direction(&corridor, Coordinate::new(1, 3), Coordinate::new(5, 3)),
        Direction::East
    );
    assert_eq!(
        effective_direction(&corridor, Coordinate::new(3, 3), Coordinate::new(3, 3)),
        Direction::Invalid
    );
}

#[test]
fn pursuit_skips_the_last_wall_following_choice() {
    let grid = open_grid();
    let origin = Coordinate::new(3, 3);
    let target = Coordinate::new(3, 5);
    let mut controller = NavigationController::new();

    assert_eq!(
        controller.follow_wall(&grid, origin, Direction::West),
        Direction::North
    );
    assert_eq!(
        controller.pursue(&grid, origin, Direction::North, target),
        Direction::East
    );
    assert_eq!(controller.previous(), Direction::East);
    assert_eq!(
        controller.pursue(&grid, origin, Direction::North, target),
        Direction::North
    );
    assert_eq!(controller.previous(), Direction::Invalid);
}

#[test]
fn pursuit_without_target_follows_the_wall() {
    let grid = grid_with_paths(&[(3, 3), (3, 4), (4, 3)]);
    let mut controller = NavigationController::new();
    let mut random = ScriptedRandom::new(vec![0]);

    let direction = controller.decide(
        NavigationPolicy::Pursuit,
        &grid,
        &enemy(0, Coordinate::new(3, 3), Direction::North),
        None,
        &mut random,
    );

    assert_eq!(direction, Direction::East);
    assert_eq!(random.draws(), 0);
}

#[test]
fn wander_draws_one_cardinal_per_decision() {
    let grid = open_grid();
    let mut controller = NavigationController::new();
    let mut random = ScriptedRandom::new(vec![2, 1, 3, 0]);
    let snapshot = enemy(0, Coordinate::new(3, 3), Direction::North);

    let drawn: Vec<Direction> = (0..4)
        .map(|_| {
            controller.decide(
                NavigationPolicy::Wander,
                &grid,
                &snapshot,
                Some(Coordinate::new(1, 1)),
                &mut random,
            )
        })
        .collect();

    assert_eq!(
        drawn,
        vec![
            Direction::East,
            Direction::South,
            Direction::West,
            Direction::North,
        ]
    );
}

#[test]
fn system_requests_directions_for_ready_enemies_only() {
    let grid = open_grid();
    let mut navigation = Navigation::new(Config::new(Some(1)));
    let mut random = ScriptedRandom::new(vec![0]);
    let mut animating = enemy(1, Coordinate::new(2, 2), Direction::North);
    animating.phase = ActorPhase::Animating {
        remaining: Duration::from_millis(500),
    };
    let enemies = [
        enemy(0, Coordinate::new(3, 3), Direction::North),
        animating,
    ];
    let mut commands = Vec::new();

    navigation.handle(&[], &enemies, &grid, None, 0, &mut random, &mut commands);
    assert!(commands.is_empty());

    navigation.handle(
        &[time_advanced()],
        &enemies,
        &grid,
        Some(Coordinate::new(3, 5)),
        1,
        &mut random,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::RequestDirection {
            actor: ActorId::new(0),
            direction: Direction::North,
        }]
    );
    assert!(navigation.controller(ActorId::new(1)).is_none());
}

#[test]
fn despawned_enemies_lose_their_controller() {
    let grid = open_grid();
    let mut navigation = Navigation::default();
    let mut random = ScriptedRandom::new(vec![0]);
    let enemies = [enemy(4, Coordinate::new(3, 3), Direction::North)];
    let mut commands = Vec::new();

    navigation.handle(
        &[time_advanced()],
        &enemies,
        &grid,
        None,
        0,
        &mut random,
        &mut commands,
    );
    assert!(navigation.controller(ActorId::new(4)).is_some());

    navigation.handle(
        &[Event::ActorDespawned {
            actor: ActorId::new(4),
            kind: ActorKind::Zombie,
        }],
        &[],
        &grid,
        None,
        0,
        &mut random,
        &mut commands,
    );
    assert!(navigation.controller(ActorId::new(4)).is_none());
}

#[test]
fn game_over_silences_the_system() {
    let grid = open_grid();
    let mut navigation = Navigation::default();
    let mut random = ScriptedRandom::new(vec![0]);
    let enemies = [enemy(0, Coordinate::new(3, 3), Direction::North)];
    let mut commands = Vec::new();

    navigation.handle(
        &[
            Event::GameOver {
                caught_by: ActorKind::Zombie,
                coins_collected: 0,
            },
            time_advanced(),
        ],
        &enemies,
        &grid,
        None,
        0,
        &mut random,
        &mut commands,
    );

    assert!(commands.is_empty());
}
