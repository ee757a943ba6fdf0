//! Catalog query throughput on a store of realistic size

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use lefty_lib::domain::{AvailabilityScore, Filter, OrderBy, Product, ProductRepository};
use lefty_lib::infrastructure::product_store::InMemoryProductStore;

const MANUFACTURERS: [&str; 6] = ["Fender", "Gibson", "Ibanez", "Schecter", "Warwick", "Yamaha"];
const RETAILERS: [&str; 2] = ["Thomann", "Musik Produktiv"];

fn catalog(size: usize) -> InMemoryProductStore {
    let scores = [
        AvailabilityScore::Available,
        AvailabilityScore::WithinDays,
        AvailabilityScore::WithinWeeks,
        AvailabilityScore::Unknown,
    ];

    let products = (0..size)
        .map(|i| Product {
            retailer: RETAILERS[i % RETAILERS.len()].to_string(),
            manufacturer: MANUFACTURERS[i % MANUFACTURERS.len()].to_string(),
            model: format!("Model {i} LH"),
            availability_score: scores[i % scores.len()],
            price: ((i * 7919) % 3000) as f64 + 99.0,
            ..Default::default()
        })
        .collect();

    let store = InMemoryProductStore::new();
    store.upsert(products).unwrap();
    store
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_store_query");

    for size in [500, 5_000] {
        let store = catalog(size);

        group.bench_with_input(BenchmarkId::new("default_page", size), &store, |b, store| {
            b.iter(|| store.query(black_box(&Filter::default())).unwrap());
        });

        let search = Filter {
            search: "fender".into(),
            order_by: OrderBy::AvailabilityAsc,
            page: 3,
            products_per_page: 25,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("search_page_3", size), &store, |b, store| {
            b.iter(|| store.query(black_box(&search)).unwrap());
        });
    }

    group.finish();
}

fn bench_upsert(c: &mut Criterion) {
    c.bench_function("product_store_reupsert_5000", |b| {
        let store = catalog(5_000);
        let batch = store
            .find_all(&Filter { products_per_page: 5_000, ..Default::default() })
            .unwrap();
        b.iter(|| store.upsert(black_box(batch.clone())).unwrap());
    });
}

criterion_group!(benches, bench_queries, bench_upsert);
criterion_main!(benches);
