//! Benchmarks for tree build and completion.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::hint::black_box;

use cmdtree::{CommandEntry, CommandTree, TreeCompleter};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn create_entries(roots: usize) -> Vec<CommandEntry> {
    let mut entries = Vec::with_capacity(roots * 16);
    for r in 0..roots {
        let root = format!("cmd{r}");
        entries.push(CommandEntry::new("root", root.clone()));
        for c in 0..5 {
            let sub = format!("{root} sub{c}");
            entries.push(CommandEntry::new(root.clone(), format!("sub{c}")));
            entries.push(CommandEntry::new(sub.clone(), "<ARG>"));
            entries.push(CommandEntry::new(format!("{sub} <ARG>"), format!("--flag{c}")));
        }
    }
    entries
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for roots in [10, 100, 1_000] {
        let entries = create_entries(roots);
        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(roots), &entries, |b, entries| {
            b.iter(|| CommandTree::build(black_box(entries)));
        });
    }

    group.finish();
}

fn bench_completion(c: &mut Criterion) {
    let tree = CommandTree::build(&create_entries(1_000));
    let completer = TreeCompleter::new(&tree);
    let mut group = c.benchmark_group("completion");

    for buffer in ["cmd99", "cmd999 sub3 ", "cmd999 sub3 value --fl", "cmd1 "] {
        group.bench_with_input(BenchmarkId::from_parameter(buffer), buffer, |b, buffer| {
            b.iter(|| completer.complete(black_box(buffer)));
        });
    }

    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_quoted", |b| {
        b.iter(|| cmdtree::tokenize(black_box("set \"display name\" --level 3 \"a b c\" tail")));
    });
}

criterion_group!(benches, bench_tree_build, bench_completion, bench_tokenize);
criterion_main!(benches);
