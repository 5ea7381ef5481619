use criterion::{criterion_group, criterion_main, Criterion};
use howdoi_core::InvertedIndex;

fn corpus() -> InvertedIndex {
    let words = ["git", "docker", "list", "files", "remote", "branch", "network", "disk", "process", "kill"];
    let mut idx = InvertedIndex::new();
    for i in 0..10_000usize {
        let text = format!("{} {} {} note{}", words[i % 10], words[(i / 10) % 10], words[(i / 100) % 10], i);
        idx.add_document(&text, &[]).expect("ids available");
    }
    idx
}

fn bench_search(c: &mut Criterion) {
    let idx = corpus();
    c.bench_function("search_single_term", |b| b.iter(|| idx.search(["git"])));
    c.bench_function("search_three_terms", |b| b.iter(|| idx.search(["git", "docker", "disk"])));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
