// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for coordinator bookkeeping
//!
//! Covers entity churn, signature-driven subscription updates and the
//! pairwise collision pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecs_core::ecs::components::{Gravity, RectangleCollider, Transform};
use ecs_core::ecs::systems::CollisionSystem;
use ecs_core::Coordinator;

fn setup() -> Coordinator {
    let mut coordinator = Coordinator::new();
    coordinator.register_component::<Transform>().unwrap();
    coordinator.register_component::<Gravity>().unwrap();
    coordinator.register_component::<RectangleCollider>().unwrap();
    coordinator.register_system::<CollisionSystem>().unwrap();
    coordinator
}

fn populate(coordinator: &mut Coordinator, count: u32) {
    for i in 0..count {
        let entity = coordinator.create_entity(&format!("body{}", i)).unwrap();
        let x = (i % 64) as f64 * 12.0;
        let y = (i / 64) as f64 * 12.0;
        coordinator
            .add_component(entity, Transform::new(x, y, 0.0))
            .unwrap();
        coordinator
            .add_component(entity, RectangleCollider::new(14.0, 14.0))
            .unwrap();
        coordinator.add_default_component::<Gravity>(entity).unwrap();
    }
}

/// Benchmark: Create, populate and destroy N entities
fn bench_entity_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_churn");

    for count in [100u32, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                setup,
                |mut coordinator| {
                    populate(&mut coordinator, count);
                    black_box(coordinator.destroy_all_entities())
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark: Toggle a component that changes subscription membership
fn bench_signature_toggle(c: &mut Criterion) {
    let mut coordinator = setup();
    populate(&mut coordinator, 1000);
    let entity = coordinator.entity("body500").unwrap();

    c.bench_function("signature_toggle", |b| {
        b.iter(|| {
            let collider = coordinator
                .remove_component::<RectangleCollider>(entity)
                .unwrap();
            coordinator.add_component(entity, collider).unwrap();
        });
    });
}

/// Benchmark: One collision pass over N subscribed entities
fn bench_collision_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_pass");

    for count in [64u32, 256, 1024] {
        let mut coordinator = setup();
        populate(&mut coordinator, count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            b.iter(|| coordinator.run_system::<CollisionSystem>().unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    coordinator_benches,
    bench_entity_churn,
    bench_signature_toggle,
    bench_collision_pass
);
criterion_main!(coordinator_benches);
