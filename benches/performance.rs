//! Performance benchmarks for the message relay.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion,
};
use message_relay::{Message, MessageStore, Relay};
use serde_json::json;

fn metric_event(account: &str, id: u64) -> Message {
    Message::from_value(json!({
        "account": account,
        "id": id,
        "date": "2016-05-01",
        "costs": 1.5,
        "shows": 10,
        "clicks": 2,
    }))
    .unwrap()
}

/// Merge throughput: repeated pushes onto a single hot key.
fn bench_merge_hot_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_hot_key");

    for batch in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("pushes", batch), &batch, |b, &batch| {
            let event = metric_event("acct1", 1);

            b.iter(|| {
                let relay = Relay::new();
                for _ in 0..batch {
                    relay.push(event.clone()).unwrap();
                }
                black_box(relay.subscribe("acct1").try_recv().unwrap());
            });
        });
    }

    group.finish();
}

/// Ordered-scan pop cost as the number of stored channels grows.
fn bench_pop_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop_scan");

    for stored in [10u64, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("stored_channels", stored),
            &stored,
            |b, &stored| {
                let last_channel = format!("acct{}", stored - 1);

                b.iter_batched(
                    || {
                        let mut store = MessageStore::new();
                        for i in 0..stored {
                            store.insert(metric_event(&format!("acct{}", i), i));
                        }
                        store
                    },
                    // Worst case: the match sits at the end of the scan.
                    |mut store| black_box(store.pop_for_channel(&last_channel)),
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Full long-poll cycle: subscribe, push, resume, receive.
fn bench_delivery_cycle(c: &mut Criterion) {
    let relay = Relay::new();
    let event = metric_event("acct1", 1);

    c.bench_function("delivery_cycle", |b| {
        b.iter(|| {
            let handle = relay.subscribe("acct1");
            relay.push(event.clone()).unwrap();
            black_box(handle.try_recv().unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_merge_hot_key,
    bench_pop_scan,
    bench_delivery_cycle
);
criterion_main!(benches);
