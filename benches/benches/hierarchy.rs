// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use serde::Deserialize;
use understory_hierarchy::{Hierarchy, Input, descending_value, split_path};

/// A flat sales row: `region/store/item` with a quantity.
#[derive(Clone, Debug)]
struct Row {
    path: String,
    parent: Option<String>,
    value: f64,
}

/// Rows for a three-level tree: 8 regions, 64 stores, `len` items.
fn rows(len: usize) -> Vec<Row> {
    let mut out = Vec::with_capacity(len + 73);
    out.push(Row {
        path: "all".into(),
        parent: None,
        value: 0.0,
    });
    for region in 0..8 {
        out.push(Row {
            path: format!("all/r{region}"),
            parent: Some("all".into()),
            value: 0.0,
        });
    }
    for store in 0..64 {
        out.push(Row {
            path: format!("all/r{}/s{store}", store % 8),
            parent: Some(format!("all/r{}", store % 8)),
            value: 0.0,
        });
    }
    for item in 0..len {
        let store = item % 64;
        let parent = format!("all/r{}/s{store}", store % 8);
        out.push(Row {
            path: format!("{parent}/i{item}"),
            parent: Some(parent),
            value: ((item * 7919) % 1000) as f64,
        });
    }
    out
}

fn paths(rows: Vec<Row>) -> Input<'static, Row> {
    Input::Paths {
        records: rows,
        path: Box::new(|r: &Row| split_path(&r.path)),
    }
}

fn stratified(rows: Vec<Row>) -> Input<'static, Row> {
    Input::Stratified {
        records: rows,
        id: Box::new(|r: &Row| Some(r.path.clone())),
        parent_id: Box::new(|r: &Row| r.parent.clone()),
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy/build");

    for len in [1_024usize, 16_384] {
        let data = rows(len);
        group.throughput(Throughput::Elements(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("paths", len), &data, |b, data| {
            b.iter_batched(
                || paths(data.clone()),
                |input| black_box(Hierarchy::build(input).unwrap()),
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("stratified", len), &data, |b, data| {
            b.iter_batched(
                || stratified(data.clone()),
                |input| black_box(Hierarchy::build(input).unwrap()),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

#[derive(Clone, Debug, Deserialize)]
struct Flare {
    name: String,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    children: Vec<Flare>,
}

/// A nested document of `fanout^depth` leaves, round-tripped through JSON.
fn flare(fanout: usize, depth: usize) -> Flare {
    fn node(name: String, fanout: usize, depth: usize) -> serde_json::Value {
        if depth == 0 {
            return serde_json::json!({ "name": name, "value": name.len() });
        }
        let children: Vec<_> = (0..fanout)
            .map(|i| node(format!("{name}.{i}"), fanout, depth - 1))
            .collect();
        serde_json::json!({ "name": name, "children": children })
    }
    serde_json::from_value(node("flare".into(), fanout, depth)).unwrap()
}

fn bench_build_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy/build_nested");

    for (fanout, depth) in [(4usize, 5usize), (8, 4)] {
        let doc = flare(fanout, depth);
        group.throughput(Throughput::Elements(fanout.pow(depth as u32) as u64));

        group.bench_with_input(
            BenchmarkId::new("children", format!("{fanout}^{depth}")),
            &doc,
            |b, doc| {
                b.iter_batched(
                    || doc.clone(),
                    |root| {
                        black_box(
                            Hierarchy::build(Input::Nested {
                                root,
                                children: Box::new(|f: &Flare| f.children.clone()),
                                id: Some(Box::new(|f: &Flare| Some(f.name.clone()))),
                            })
                            .unwrap(),
                        )
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_aggregate_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy/aggregate_sort");

    for len in [1_024usize, 16_384] {
        let tree = Hierarchy::build(paths(rows(len))).unwrap();
        group.throughput(Throughput::Elements(tree.len() as u64));

        group.bench_with_input(BenchmarkId::new("sum", len), &tree, |b, tree| {
            b.iter_batched(
                || tree.clone(),
                |mut h| {
                    h.sum(|r| Some(r.value));
                    black_box(h);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("sum_then_sort", len), &tree, |b, tree| {
            b.iter_batched(
                || tree.clone(),
                |mut h| {
                    h.sum(|r| Some(r.value)).sort_by(descending_value);
                    black_box(h);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_nested_values(c: &mut Criterion) {
    let doc = flare(6, 4);
    let tree = Hierarchy::build(Input::Nested {
        root: doc,
        children: Box::new(|f: &Flare| f.children.clone()),
        id: None,
    })
    .unwrap();

    c.bench_function("hierarchy/aggregate_nested", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut h| {
                h.aggregate(Some(|f: &Flare| f.value));
                black_box(h);
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_build_nested,
    bench_aggregate_and_sort,
    bench_nested_values
);
criterion_main!(benches);
