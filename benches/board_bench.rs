use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rackboard_core::filter::evaluate;
use rackboard_core::grouping::group_records;
use rackboard_core::{
    Condition, Environment, Field, FilterDimension, Machine, MachineType, Operator, Product, SimpleFilters,
    Status, View,
};

fn create_products() -> Vec<Product> {
    vec![
        Product::new("prod-1", "E-Commerce Platform", &["API", "Workers", "Database"]),
        Product::new("prod-2", "Analytics Engine", &["Ingestion", "Processing", "Storage"]),
        Product::new("prod-3", "Mobile Backend", &["Auth", "Notifications", "CDN"]),
    ]
}

fn create_fleet(count: usize) -> Vec<Machine> {
    let subs = ["API", "Workers", "Database", "Ingestion", "Processing", "Auth"];
    let tags = ["gpu", "k8s-node", "loaner", "ssd"];
    (0..count)
        .map(|i| Machine {
            id: format!("m-{}", i),
            hostname: format!("host-{:05}", i),
            machine_type: MachineType::ALL[i % 3],
            product_id: (i % 7 != 0).then(|| format!("prod-{}", i % 3 + 1)),
            sub_product: Some(subs[i % subs.len()].to_string()),
            environment: Environment::ALL[i % 4],
            owner: (i % 5 != 0).then(|| format!("owner-{}@company.com", i % 11)),
            status: if i % 13 == 0 { Status::Idle } else { Status::Active },
            tags: vec![tags[i % tags.len()].to_string()],
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let mut filters = SimpleFilters::default();
    filters.set(FilterDimension::Environments, vec!["prod".to_string(), "staging".to_string()]);
    filters.set(FilterDimension::Tags, vec!["gpu".to_string(), "ssd".to_string()]);
    let conditions = vec![
        Condition::new(Field::Hostname, Operator::Contains, "1"),
        Condition::new(Field::Owner, Operator::EndsWith, "@company.com"),
    ];

    for size in [100, 1_000, 10_000] {
        let fleet = create_fleet(size);
        group.bench_with_input(BenchmarkId::new("evaluate", size), &fleet, |b, fleet| {
            b.iter(|| black_box(evaluate(black_box(fleet), &filters, &conditions).len()))
        });
    }

    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    let products = create_products();

    for size in [100, 1_000, 10_000] {
        let fleet = create_fleet(size);
        let refs: Vec<&Machine> = fleet.iter().collect();
        for view in [View::Product, View::Environment, View::Owner] {
            group.bench_with_input(BenchmarkId::new(view.as_str(), size), &refs, |b, refs| {
                b.iter(|| black_box(group_records(black_box(refs), view, &products).groups.len()))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filter, bench_grouping);
criterion_main!(benches);
