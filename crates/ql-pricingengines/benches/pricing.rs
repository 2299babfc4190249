use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ql_instruments::{BondContract, OptionContract, OptionType, PricingEngine};
use ql_pricingengines::{
    AnalyticEuropeanEngine, BinomialSettings, BinomialVanillaEngine, BondYieldSolver,
    DiscountingBondEngine, ImpliedVolatilitySolver,
};
use ql_time::Frequency;

fn bench_black_scholes_european(c: &mut Criterion) {
    let option =
        OptionContract::european(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
    let engine = AnalyticEuropeanEngine::new();

    c.bench_function("black_scholes_european_call", |b| {
        b.iter(|| {
            let result = engine.calculate(black_box(&option)).unwrap();
            black_box(result.price)
        })
    });
}

fn bench_american_binomial_steps(c: &mut Criterion) {
    let option =
        OptionContract::american(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
    let mut group = c.benchmark_group("american_binomial_put");

    for steps in [100_usize, 500, 1000] {
        let engine = BinomialVanillaEngine::new(BinomialSettings::with_steps(steps)).unwrap();
        group.bench_with_input(BenchmarkId::new("npv", steps), &steps, |b, _| {
            b.iter(|| black_box(engine.npv(black_box(&option)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("with_greeks", steps), &steps, |b, _| {
            b.iter(|| black_box(engine.calculate(black_box(&option)).unwrap().price))
        });
    }

    group.finish();
}

fn bench_bond_yield(c: &mut Criterion) {
    let bond = BondContract::new(1000.0, 0.05, 10.0, Frequency::Semiannual).unwrap();
    let price = DiscountingBondEngine::new(0.0625).unwrap().npv(&bond).unwrap();
    let solver = BondYieldSolver::default();

    c.bench_function("bond_yield_10y_semiannual", |b| {
        b.iter(|| black_box(solver.solve(black_box(&bond), black_box(price)).unwrap()))
    });
}

fn bench_implied_volatility(c: &mut Criterion) {
    let solver = ImpliedVolatilitySolver::default();
    let mut group = c.benchmark_group("implied_volatility_call");

    for strike in [80.0, 100.0, 125.0] {
        let option =
            OptionContract::european(OptionType::Call, 100.0, strike, 0.03, 0.01, 0.35, 0.75)
                .unwrap();
        let price = AnalyticEuropeanEngine::new().calculate(&option).unwrap().price;
        group.bench_with_input(BenchmarkId::from_parameter(strike), &strike, |b, &k| {
            b.iter(|| {
                black_box(
                    solver
                        .solve(OptionType::Call, black_box(price), 100.0, k, 0.03, 0.01, 0.75)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_black_scholes_european,
    bench_american_binomial_steps,
    bench_bond_yield,
    bench_implied_volatility
);
criterion_main!(benches);
