//! Benchmarks for predicate compilation.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use predikit::{
    AggregateComparison, FieldCache, Predicate, StringOptions, SubqueryMatch,
};

struct Kraken;
predikit::reflectable!(Kraken { title, age, isAwesome, friends });

struct Cerberus;
predikit::reflectable!(Cerberus { isHungry, isAwesome, subordinates });

fn bench_leaf_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_compile");

    group.bench_function("string_equals", |b| {
        b.iter(|| {
            black_box(Predicate::build::<Kraken, _>(|q| {
                q.string("title").equals("Kraken", StringOptions::NONE);
            }))
        })
    });

    group.bench_function("number_bound", |b| {
        b.iter(|| {
            black_box(Predicate::build::<Kraken, _>(|q| {
                q.number("age").is_greater_than(5);
            }))
        })
    });

    group.finish();
}

fn bench_combination(c: &mut Criterion) {
    let mut group = c.benchmark_group("combination");

    group.bench_function("and_3", |b| {
        b.iter(|| {
            black_box(Predicate::build::<Kraken, _>(|q| {
                let title = q.string("title").equals("Kraken", StringOptions::NONE);
                let age = q.number("age").is_greater_than(5);
                let awesome = q.boolean("isAwesome").is_true();
                title.and(&age).and(&awesome);
            }))
        })
    });

    for size in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("and_chain", size), &size, |b, &size| {
            b.iter(|| {
                black_box(Predicate::build::<Kraken, _>(|q| {
                    let chain = q.number("age").is_greater_than(0);
                    for i in 1..size {
                        chain.and(&q.number("age").is_greater_than(i as i64));
                    }
                }))
            })
        });
    }

    group.finish();
}

fn bench_subquery(c: &mut Criterion) {
    let mut group = c.benchmark_group("subquery");

    group.bench_function("count_aggregate", |b| {
        b.iter(|| {
            black_box(Predicate::build::<Kraken, _>(|q| {
                q.collection("friends").subquery::<Cerberus, _>(|friend| {
                    let hungry = friend.boolean("isHungry").is_true();
                    let awesome = friend.boolean("isAwesome").is_true();
                    hungry.and(&awesome);
                    SubqueryMatch::count(AggregateComparison::Equals, 0)
                });
            }))
        })
    });

    group.bench_function("nested", |b| {
        b.iter(|| {
            black_box(Predicate::build::<Kraken, _>(|q| {
                q.collection("friends").subquery::<Cerberus, _>(|friend| {
                    friend
                        .collection("subordinates")
                        .subquery::<Cerberus, _>(|subordinate| {
                            subordinate.boolean("isHungry").is_true();
                            SubqueryMatch::any()
                        });
                    SubqueryMatch::any()
                });
            }))
        })
    });

    group.finish();
}

fn bench_field_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_cache");

    group.bench_function("throwaway_cache", |b| {
        b.iter(|| {
            black_box(Predicate::build::<Kraken, _>(|q| {
                q.number("age").equals(1);
            }))
        })
    });

    group.bench_function("shared_cache", |b| {
        let cache = Arc::new(FieldCache::new());
        b.iter(|| {
            black_box(Predicate::build_with_cache::<Kraken, _>(&cache, |q| {
                q.number("age").equals(1);
            }))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_leaf_compile,
    bench_combination,
    bench_subquery,
    bench_field_cache
);
criterion_main!(benches);
