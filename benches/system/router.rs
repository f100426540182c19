use angusto::fs::path;
use angusto::system::commands::COMMANDS;
use angusto::system::router::{self, Resolution};
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};

const LINES: [(&str, &str); 3] = [
    ("short", "ls"),
    ("nested", "device register heater 15 out"),
    ("long", "device register sensor_with_long_name 26 adc down extra tokens here"),
];

pub fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for (name, line) in LINES {
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| router::tokenize(black_box(line)).map(|tokens| tokens.len()))
        });
    }
    group.finish();
}

pub fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for (name, line) in LINES.iter().chain([("unknown", "frobnicate now")].iter()) {
        let tokens = router::tokenize(line).expect("line fits");
        group.bench_with_input(BenchmarkId::from_parameter(name), &tokens, |b, tokens| {
            b.iter(|| match router::resolve(&COMMANDS, black_box(tokens)) {
                Resolution::Dispatch { args, .. } => args.len(),
                Resolution::Subcommands { .. } => 0,
                Resolution::Unknown => usize::MAX,
            })
        });
    }
    group.finish();
}

pub fn bench_path_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolve");
    let cases = [
        ("relative", "/lib/drivers", "sensor.txt"),
        ("dotdot", "/a/b/c/d", "../../x/./y/../z.txt"),
        ("absolute", "/lib", "/config.json"),
    ];
    for (name, cwd, input) in cases {
        group.bench_function(name, |b| {
            b.iter(|| path::resolve(black_box(cwd), black_box(input)).map(|p| p.len()))
        });
    }
    group.finish();
}
