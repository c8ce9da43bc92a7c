//! Trinomial tree pricing benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ql_methods::lattice::{
    AmericanVanillaOptionFunction, CoxRossRubinsteinLatticeSpecification, Dividends,
    EuropeanVanillaOptionFunction, OptionType, RecombiningTrinomialTreeData, TrinomialTree,
};

fn bench_trinomial(c: &mut Criterion) {
    let tree = TrinomialTree::new();
    let lattice = CoxRossRubinsteinLatticeSpecification;
    let dividends = Dividends::Continuous(0.02);
    let european = EuropeanVanillaOptionFunction::new(100.0, 1.0, OptionType::Call, 500).unwrap();
    let american = AmericanVanillaOptionFunction::new(100.0, 1.0, OptionType::Put, 500).unwrap();

    c.bench_function("trinomial_european_call_500", |b| {
        b.iter(|| {
            tree.option_price(&european, &lattice, black_box(100.0), 0.2, 0.05, &dividends)
                .unwrap()
        })
    });

    c.bench_function("trinomial_american_put_500", |b| {
        b.iter(|| {
            tree.option_price(&american, &lattice, black_box(100.0), 0.2, 0.05, &dividends)
                .unwrap()
        })
    });

    c.bench_function("trinomial_american_put_greeks_500", |b| {
        b.iter(|| {
            tree.option_price_adjoint(&american, &lattice, black_box(100.0), 0.2, 0.05, &dividends)
                .unwrap()
        })
    });

    let data =
        RecombiningTrinomialTreeData::uniform(&lattice, 100.0, 0.2, 0.05, 0.02, 1.0, 500).unwrap();
    c.bench_function("trinomial_tree_data_american_put_500", |b| {
        b.iter(|| tree.option_price_from_data(black_box(&american), &data).unwrap())
    });
}

criterion_group!(benches, bench_trinomial);
criterion_main!(benches);
