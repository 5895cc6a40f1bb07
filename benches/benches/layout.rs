// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use overstory_hierarchy::{Encodings, RadialTreeChart, TreemapChart};
use understory_hierarchy::{Hierarchy, Input, descending_value, split_path};
use understory_hierarchy_layout::{Padding, RadialTreeLayout, TileStrategy, TreemapLayout};

type Item = (String, f64);

/// `len` leaves spread over 16 groups of 16 subgroups, with uneven values.
fn items(len: usize) -> Vec<Item> {
    (0..len)
        .map(|i| {
            let path = format!("g{}/s{}/i{i}", i % 16, (i / 16) % 16);
            (path, ((i * 7919) % 997 + 1) as f64)
        })
        .collect()
}

fn input(items: Vec<Item>) -> Input<'static, Item> {
    Input::Paths {
        records: items,
        path: Box::new(|r: &Item| split_path(&r.0)),
    }
}

fn tree(len: usize) -> Hierarchy<Item> {
    let mut h = Hierarchy::build(input(items(len))).unwrap();
    h.sum(|r| Some(r.1)).sort_by(descending_value);
    h
}

fn bench_treemap_tiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/treemap");

    for len in [1_024usize, 16_384] {
        let h = tree(len);
        group.throughput(Throughput::Elements(h.len() as u64));

        for tile in TileStrategy::ALL {
            let layout = TreemapLayout::new(1280.0, 800.0)
                .with_padding(Padding::uniform(1.0))
                .with_tile(tile)
                .with_round(true);
            group.bench_with_input(BenchmarkId::new(tile.name(), len), &h, |b, h| {
                b.iter_batched(
                    || h.clone(),
                    |mut h| {
                        layout.layout(&mut h).unwrap();
                        black_box(h);
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_radial(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/radial");

    for len in [1_024usize, 16_384] {
        let h = tree(len);
        group.throughput(Throughput::Elements(h.len() as u64));

        for (name, layout) in [
            ("tidy", RadialTreeLayout::new(400.0)),
            ("cluster", RadialTreeLayout::cluster(400.0)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, len), &h, |b, h| {
                b.iter_batched(
                    || h.clone(),
                    |mut h| {
                        layout.layout(&mut h).unwrap();
                        black_box(h);
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_chart_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/chart_run");
    let len = 4_096usize;
    let data = items(len);
    group.throughput(Throughput::Elements(len as u64));

    let encodings = Encodings::default()
        .with_value(|r: &Item| Some(r.1))
        .with_group(|r: &Item| split_path(&r.0)[0].clone())
        .with_label(|n| n.id().to_string());

    let treemap = TreemapChart::default();
    group.bench_function("treemap", |b| {
        b.iter_batched(
            || input(data.clone()),
            |input| black_box(treemap.run(input, &encodings).unwrap()),
            BatchSize::LargeInput,
        );
    });

    let radial = RadialTreeChart::default();
    group.bench_function("radial", |b| {
        b.iter_batched(
            || input(data.clone()),
            |input| black_box(radial.run(input, &encodings).unwrap()),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_treemap_tiles, bench_radial, bench_chart_runs);
criterion_main!(benches);
