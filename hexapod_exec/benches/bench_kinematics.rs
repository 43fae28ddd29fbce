//! # Leg Kinematics Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hexapod_lib::leg_ctrl::{
    kinematics::{forward_kinematics, inverse_kinematics},
    JointAngles, JointLimits, LegArray, LegCmd, LimitPolicy, LinkParams, TipPosition,
};

fn kinematics_benchmark(c: &mut Criterion) {
    let links = LinkParams::default();
    let joints = JointAngles::new(0.3, -0.6, -0.9);
    let target = forward_kinematics(&links, &joints);

    c.bench_function("forward_kinematics", |b| {
        b.iter(|| forward_kinematics(black_box(&links), black_box(&joints)))
    });

    c.bench_function("inverse_kinematics", |b| {
        b.iter(|| inverse_kinematics(black_box(&links), black_box(&target)).unwrap())
    });

    // A locked array solves the target once per leg
    let mut legs = LegArray::new(links, JointLimits::default(), LimitPolicy::Clamp, 0.1);
    legs.set_locked(true);

    let cmd = LegCmd::SetTarget(TipPosition::new(0.12, -0.05, 0.02));

    c.bench_function("LegArray::apply::broadcast_target", |b| {
        b.iter(|| legs.apply(black_box(&cmd)))
    });
}

criterion_group!(benches, kinematics_benchmark);
criterion_main!(benches);
