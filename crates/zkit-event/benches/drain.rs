//! Dispatch benchmarks using criterion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use zkit_event::{Binding, DispatchQueue, Event, EventGroup, Listener};

struct Relay {
    remaining: u32,
}

impl Listener for Relay {
    fn bindings(&self) -> Vec<Binding<Self>> {
        vec![
            Binding::new("on_relay", "relay", |relay: &mut Relay, _, _, ctx| {
                if relay.remaining > 0 {
                    relay.remaining -= 1;
                    ctx.publish(Event::new("relay").with_priority(i64::from(relay.remaining % 4)));
                }
                Ok(())
            }),
            Binding::new("on_key", "KEYDOWN", |_: &mut Relay, _, _, _| Ok(()))
                .with_filter("key", "K_SPACE"),
        ]
    }
}

fn queue_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");

    for count in [100u64, 10_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("push_pop", count), &count, |b, &count| {
            b.iter(|| {
                let mut queue = DispatchQueue::new();
                for i in 0..count {
                    queue.push(None, Event::new("e").with_priority((i % 8) as i64));
                }
                while let Some(queued) = queue.pop() {
                    black_box(queued);
                }
            });
        });
    }

    group.finish();
}

fn drain_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");

    for chain in [100u32, 10_000] {
        group.throughput(Throughput::Elements(u64::from(chain)));
        group.bench_with_input(BenchmarkId::new("relay_chain", chain), &chain, |b, &chain| {
            b.iter(|| {
                let mut events = EventGroup::new();
                events.add(Relay { remaining: chain });
                black_box(events.update(&[Event::new("relay")], 16.0).ok());
            });
        });
    }

    group.finish();
}

fn match_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("match");

    for members in [10usize, 1000] {
        group.bench_with_input(
            BenchmarkId::new("filtered_frame", members),
            &members,
            |b, &members| {
                let mut events = EventGroup::new();
                events.add_all((0..members).map(|_| Relay { remaining: 0 }));
                let frame = [
                    Event::new("KEYDOWN").with_attr("key", "K_SPACE"),
                    Event::new("KEYDOWN").with_attr("key", "K_ESCAPE"),
                ];
                b.iter(|| black_box(events.update(&frame, 16.0).ok()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, queue_benchmarks, drain_benchmarks, match_benchmarks);
criterion_main!(benches);
