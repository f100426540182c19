use criterion::{criterion_group, criterion_main};

mod system;

criterion_group!(
    benches,
    system::router::bench_tokenize,
    system::router::bench_resolve,
    system::router::bench_path_resolve
);
criterion_main!(benches);
