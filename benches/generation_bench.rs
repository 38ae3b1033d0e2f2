//! Generation performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use routegen::*;

/// Seven RESTful routes per resource, spread across plain, admin and api scopes
fn route_table(resources: usize) -> Vec<RawRoute> {
    let mut routes = Vec::new();
    for i in 0..resources {
        let (prefix, helper_prefix) = match i % 3 {
            0 => (String::new(), String::new()),
            1 => ("/admin".to_string(), "admin_".to_string()),
            _ => ("/api/v1".to_string(), "api_v1_".to_string()),
        };
        let plural = format!("widgets{}", i);
        let singular = format!("widget{}", i);
        let base = format!("{}/{}", prefix, plural);
        let member = format!("{}/:id", base);

        let collection = format!("{}{}", helper_prefix, plural);
        let resource = format!("{}{}", helper_prefix, singular);

        routes.push(RawRoute::new(&collection, "GET", &base, "index"));
        routes.push(RawRoute::new(&collection, "POST", &base, "create"));
        routes.push(RawRoute::new(&format!("new_{}{}", helper_prefix, singular), "GET", &format!("{}/new", base), "new"));
        routes.push(RawRoute::new(&format!("edit_{}{}", helper_prefix, singular), "GET", &format!("{}/edit", member), "edit"));
        routes.push(RawRoute::new(&resource, "GET", &member, "show"));
        routes.push(RawRoute::new(&resource, "PATCH", &member, "update"));
        routes.push(RawRoute::new(&resource, "DELETE", &member, "destroy"));
    }
    routes
}

fn bench_classic_simple(c: &mut Criterion) {
    let routes = route_table(50);
    let options = GeneratorOptions::default();

    c.bench_function("classic_simple_generation", |b| {
        b.iter(|| generate(black_box(&routes), black_box(&options)).unwrap())
    });
}

fn bench_classic_rich(c: &mut Criterion) {
    let routes = route_table(50);
    let options = GeneratorOptions {
        variant: OutputVariant::Rich,
        with_methods: true,
        with_forms: true,
        url_helpers: true,
        ..GeneratorOptions::default()
    };

    c.bench_function("classic_rich_generation", |b| {
        b.iter(|| generate(black_box(&routes), black_box(&options)).unwrap())
    });
}

fn bench_resource_generation(c: &mut Criterion) {
    let routes = route_table(50);
    let options = GeneratorOptions {
        style: OutputStyle::Resource,
        with_forms: true,
        ..GeneratorOptions::default()
    };

    c.bench_function("resource_generation", |b| {
        b.iter(|| generate(black_box(&routes), black_box(&options)).unwrap())
    });
}

fn bench_large_route_table(c: &mut Criterion) {
    let routes = route_table(1000);
    let options = GeneratorOptions::default();

    c.bench_function("large_route_table_generation", |b| {
        b.iter(|| generate(black_box(&routes), black_box(&options)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_classic_simple,
    bench_classic_rich,
    bench_resource_generation,
    bench_large_route_table
);
criterion_main!(benches);
