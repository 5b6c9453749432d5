//! End-to-end scenarios over the public API

use glam::Vec2;

use mirror_maze::platform::MemoryStorage;
use mirror_maze::sim::level::{Bounds, PieceBudget, Source};
use mirror_maze::sim::trace::{Surface, find_nearest_hit};
use mirror_maze::sim::{CommonConfig, Level, LevelSet, PieceKind, Scene, tick, trace};
use mirror_maze::{Session, SessionEvent};

fn room() -> Scene {
    let level = Level {
        id: 1,
        name: "room".into(),
        source: Source {
            x: 100.0,
            y: 100.0,
            dir_deg: 0.0,
            color: None,
        },
        targets: Vec::new(),
        blockers: Vec::new(),
        filters: Vec::new(),
        portals: Vec::new(),
        available_pieces: PieceBudget::default(),
        hint_pieces: Vec::new(),
    };
    let bounds = Bounds {
        width: 1000.0,
        height: 1000.0,
        wall_thickness: 20.0,
    };
    Scene::new(level, bounds, CommonConfig::default())
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-2
}

#[test]
fn test_empty_room_hits_right_wall() {
    let scene = room();
    let traced = trace(&scene);
    assert_eq!(traced.segments.len(), 1);
    assert!(close(traced.segments[0].to, Vec2::new(980.0, 100.0)));

    let hit = find_nearest_hit(&scene, Vec2::new(100.0, 100.0), Vec2::X).unwrap();
    assert_eq!(hit.surface, Surface::Wall { normal: Vec2::NEG_X });
}

#[test]
fn test_mirror_turns_beam_onto_floor() {
    let mut scene = room();
    scene.add_piece(PieceKind::Mirror, Vec2::new(400.0, 100.0), 45f32.to_radians());

    let traced = trace(&scene);
    assert_eq!(traced.segments.len(), 2);
    assert!(close(traced.segments[0].to, Vec2::new(400.0, 100.0)));
    let down = traced.segments[1];
    assert!((down.to.x - 400.0).abs() < 1e-2);
    assert!((down.to.y - 980.0).abs() < 1e-2);
}

#[test]
fn test_tick_publishes_beams() {
    let mut scene = room();
    assert!(scene.beams.is_empty());
    let events = tick(&mut scene, 1.0 / 60.0);
    assert!(events.is_empty());
    assert_eq!(scene.beams.len(), 1);
}

#[test]
fn test_every_builtin_level_solved_by_its_hint() {
    let levels = LevelSet::builtin().unwrap();
    let count = levels.len();
    let mut session = Session::new(levels, Box::new(MemoryStorage::new())).unwrap();

    for index in 0..count {
        session.start_level(index, true).unwrap();
        // Fresh pieces never solve a level on their own
        let early: Vec<_> = (0..4).flat_map(|_| session.frame(0.25)).collect();
        assert!(
            !early.iter().any(|e| matches!(e, SessionEvent::LevelComplete { .. })),
            "level {} solved without moving a piece",
            index + 1
        );

        session.start_level(index, true).unwrap();
        assert!(session.apply_hint_solution() > 0);
        let events: Vec<_> = (0..12).flat_map(|_| session.frame(0.25)).collect();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SessionEvent::LevelComplete { index: i, .. } if *i == index)),
            "hint placement does not solve level {}",
            index + 1
        );
        assert!(session.progress().best_times.get(index).is_some());
    }
}

#[test]
fn test_first_level_completes_through_timestamps() {
    let levels = LevelSet::builtin().unwrap();
    let mut session = Session::new(levels, Box::new(MemoryStorage::new())).unwrap();
    session.apply_hint_solution();

    let mut now = 1000.0;
    let mut completed = false;
    // 16ms frames for two seconds
    for _ in 0..125 {
        now += 16.0;
        completed |= session
            .frame_at(now)
            .iter()
            .any(|e| matches!(e, SessionEvent::LevelComplete { .. }));
    }
    assert!(completed);
    assert!(session.view().completed);
}
