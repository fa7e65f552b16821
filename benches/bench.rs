use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ring_index::Ring;
use ring_index::bwt::StaticColumn;
use ring_index::ring::Triple;

const N: usize = 20_000;
const ALPHABET: usize = 2_000;

fn dataset() -> Vec<Triple> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..N)
        .map(|_| {
            (
                rng.gen_range(1..=ALPHABET),
                rng.gen_range(1..=(ALPHABET / 20).max(1)),
                rng.gen_range(1..=ALPHABET),
            )
        })
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    let triples = dataset();
    let mut group = c.benchmark_group("construction");
    group.sample_size(10);
    group.bench_function("from_triples (static)", |b| {
        b.iter(|| Ring::<StaticColumn>::from_triples(triples.clone()))
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let ring = Ring::<StaticColumn>::from_triples(dataset());
    let mut rng = StdRng::seed_from_u64(7);
    let probes: Vec<usize> = (0..1000).map(|_| rng.gen_range(1..=ALPHABET)).collect();

    let mut group = c.benchmark_group("query");
    group.bench_function("1.1 init_s over random subjects", |b| {
        b.iter(|| {
            for &s in &probes {
                let _ = ring.init_s(s);
            }
        })
    });
    group.bench_function("2.1 PSO enumeration under a bound predicate", |b| {
        b.iter(|| {
            let mut p_int = ring.init_p(1);
            let mut s = ring.min_s_in_p(&mut p_int);
            let mut count = 0usize;
            while ring.there_are_s_in_p(&p_int) {
                let s_int = ring.down_p_s(&p_int, s);
                count += ring.all_o_in_range(&s_int).len();
                s = ring.next_s_in_p(&mut p_int, s + 1);
            }
            count
        })
    });
    group.finish();
}

criterion_group!(benches, bench_construction, bench_query);
criterion_main!(benches);
