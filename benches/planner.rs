use criterion::{Criterion, black_box, criterion_group, criterion_main};

use kshetra_cover::{CoveragePlanner, ObstacleGrid, PlannerConfig, Pose2D, WorldPoint};

fn room_with_pillars() -> ObstacleGrid {
    // 10 x 8 m room at 5 cm resolution
    let mut map = ObstacleGrid::empty(200, 160, 0.05, WorldPoint::ZERO).unwrap();
    for y in 50..80 {
        for x in 80..110 {
            map.set_occupied(x, y, true);
        }
    }
    for y in 110..140 {
        for x in 150..170 {
            map.set_occupied(x, y, true);
        }
    }
    map
}

fn bench_plan(c: &mut Criterion) {
    let map = room_with_pillars();
    let config = PlannerConfig {
        // Keep the rotation fan-out moderate so one iteration stays short
        manoeuvre_resolution: 16,
        max_overlap_turn: 2,
        max_overlap_forward: 0,
        ..PlannerConfig::default()
    };
    let planner = CoveragePlanner::new(config).unwrap();
    let start = Pose2D::new(1.0, 1.0, 0.0);

    c.bench_function("plan_10x8m_room", |b| {
        b.iter(|| {
            let plan = planner.plan(black_box(&map), black_box(start)).unwrap();
            black_box(plan.metrics.visited_count)
        })
    });
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
