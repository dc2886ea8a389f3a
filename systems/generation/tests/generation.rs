use std::collections::{BTreeSet, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use venue_maze_core::{GridPos, RoomId};
use venue_maze_system_generation::{Config, MazeGenerator, MazeLayout};

fn reachable_from_start(layout: &MazeLayout) -> BTreeSet<RoomId> {
    let mut seen = BTreeSet::from([layout.start()]);
    let mut queue = VecDeque::from([layout.start()]);
    while let Some(current) = queue.pop_front() {
        let room = layout.room(current).expect("room referenced by an exit");
        for (_, neighbour) in room.exits().iter() {
            if seen.insert(neighbour) {
                queue.push_back(neighbour);
            }
        }
    }
    seen
}

fn assert_well_formed(layout: &MazeLayout) {
    assert_eq!(
        reachable_from_start(layout).len(),
        layout.len(),
        "every room must be reachable from the start"
    );

    for room in layout.rooms() {
        for (direction, neighbour) in room.exits().iter() {
            let other = layout.room(neighbour).expect("neighbour exists");
            assert_eq!(
                other.exits().get(direction.opposite()),
                Some(room.id()),
                "door {direction} of {} is not mirrored",
                room.id()
            );
        }
        assert!(room.exits().len() <= 4);
    }

    let cells: BTreeSet<GridPos> = layout.rooms().iter().map(|room| room.grid()).collect();
    assert_eq!(cells.len(), layout.len(), "grid cells must be unique");
}

#[test]
fn layouts_are_connected_and_symmetric_for_many_sizes() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0001);
    for room_count in 1..=60 {
        let layout = MazeGenerator::new(Config::new(room_count))
            .generate(&mut rng)
            .expect("unbounded grid never stalls");
        assert_eq!(layout.len(), room_count);
        assert_well_formed(&layout);
    }
}

#[test]
fn thousand_mazes_of_thirty_rooms_end_at_room_twenty_nine() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x0ff1_ce00);
    let generator = MazeGenerator::new(Config::new(30));
    for _ in 0..1_000 {
        let layout = generator.generate(&mut rng).expect("layout");
        assert_eq!(layout.start(), RoomId::new(0));
        assert_eq!(layout.goal(), RoomId::new(29));
        assert!(layout.room(layout.goal()).is_some());
        assert_eq!(layout.rooms()[0].grid(), GridPos::ORIGIN);
        assert_well_formed(&layout);
    }
}

#[test]
fn bounded_grid_retries_until_layout_fits() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    // A 5x5 grid always fits 20 rooms because growth fills every free cell.
    let generator = MazeGenerator::new(Config::new(20).with_max_extent(Some(2)));
    let layout = generator
        .generate_with_retries(4, &mut rng)
        .expect("grid is large enough");
    assert_well_formed(&layout);
    assert!(layout.rooms().iter().all(|room| room.grid().extent() <= 2));
}

#[test]
fn identical_seeds_produce_identical_layouts() {
    let generator = MazeGenerator::new(Config::new(30));
    let first = generator
        .generate(&mut ChaCha8Rng::seed_from_u64(3))
        .expect("layout");
    let second = generator
        .generate(&mut ChaCha8Rng::seed_from_u64(3))
        .expect("layout");
    assert_eq!(first, second);
}

#[test]
fn without_loops_the_graph_is_a_tree() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let layout = MazeGenerator::new(Config::new(25).with_loop_chance(0.0))
        .generate(&mut rng)
        .expect("layout");
    let doors: usize = layout.rooms().iter().map(|room| room.exits().len()).sum();
    assert_eq!(doors / 2, layout.len() - 1);
}
