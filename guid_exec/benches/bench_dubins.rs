//! # Dubins Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use guid_lib::{
    dubins,
    dubins_exec::{follow_wpp_dubins, ExecInput, GuidanceState},
    path::Configuration,
};
use nalgebra::Vector3;

fn dubins_benchmark(c: &mut Criterion) {
    // ---- Planner ----

    let start = Configuration::new(Vector3::new(0.0, 0.0, -100.0), 0.3);
    let end = Configuration::new(Vector3::new(400.0, -700.0, -100.0), 2.5);

    c.bench_function("dubins::plan", |b| {
        b.iter(|| dubins::plan(black_box(&start), black_box(&end), 100.0).unwrap())
    });

    let path = dubins::plan(&start, &end, 100.0).unwrap();
    c.bench_function("DubinsPath::sample", |b| {
        b.iter(|| path.sample(black_box(1.0)))
    });

    // ---- Executor ----

    let waypoints = vec![
        Vector3::new(0.0, 0.0, -100.0),
        Vector3::new(1000.0, 0.0, -100.0),
        Vector3::new(1000.0, 1000.0, -100.0),
    ];
    let courses = vec![0.0, 0.0, std::f64::consts::FRAC_PI_2];

    c.bench_function("follow_wpp_dubins", |b| {
        let mut state = GuidanceState::new();
        b.iter(|| {
            follow_wpp_dubins(
                &mut state,
                &ExecInput {
                    waypoints_m_ned: &waypoints,
                    courses_rad: &courses,
                    config: Configuration::new(Vector3::new(500.0, 10.0, -100.0), 0.0),
                    new_path: false,
                },
                100.0,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, dubins_benchmark);
criterion_main!(benches);
