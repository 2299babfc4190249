//! Properties every valid input must satisfy: parity, monotonicity and the
//! two solver round trips.

use ql_calculator::{
    price_bond, price_european_option, solve_bond_yield, solve_implied_volatility,
    BinomialSettings, Calculator, CalculatorConfig, OptionType,
};
use ql_calculator::pricingengines::option_price_bounds;
use proptest::prelude::*;

fn option_type() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

fn frequency() -> impl Strategy<Value = i64> {
    prop::sample::select(vec![1_i64, 2, 3, 4, 6, 12])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn put_call_parity(
        spot in 1.0..1000.0_f64,
        strike in 1.0..1000.0_f64,
        rate in -0.02..0.15_f64,
        dividend_yield in 0.0..0.10_f64,
        volatility in 0.01..2.0_f64,
        maturity in 0.01..10.0_f64,
    ) {
        let call = price_european_option(OptionType::Call, spot, strike, rate, dividend_yield, volatility, maturity).unwrap();
        let put = price_european_option(OptionType::Put, spot, strike, rate, dividend_yield, volatility, maturity).unwrap();
        let forward_value = spot * (-dividend_yield * maturity).exp() - strike * (-rate * maturity).exp();
        let tolerance = 1e-9 * spot.max(strike);
        prop_assert!(
            (call.price - put.price - forward_value).abs() <= tolerance,
            "C − P = {}, S·e^(−qT) − K·e^(−rT) = {}",
            call.price - put.price,
            forward_value
        );
    }

    #[test]
    fn european_price_increases_with_volatility(
        kind in option_type(),
        strike in 70.0..130.0_f64,
        rate in 0.0..0.08_f64,
        volatility in 0.15..1.5_f64,
        bump in 0.01..0.5_f64,
        maturity in 0.5..3.0_f64,
    ) {
        let low = price_european_option(kind, 100.0, strike, rate, 0.01, volatility, maturity).unwrap();
        let high = price_european_option(kind, 100.0, strike, rate, 0.01, volatility + bump, maturity).unwrap();
        prop_assert!(high.price > low.price, "{} <= {}", high.price, low.price);
    }

    #[test]
    fn european_call_decreases_with_strike(
        strike in 60.0..140.0_f64,
        step in 1.0..20.0_f64,
        rate in 0.0..0.08_f64,
        volatility in 0.2..0.8_f64,
        maturity in 0.5..3.0_f64,
    ) {
        let near = price_european_option(OptionType::Call, 100.0, strike, rate, 0.0, volatility, maturity).unwrap();
        let far = price_european_option(OptionType::Call, 100.0, strike + step, rate, 0.0, volatility, maturity).unwrap();
        prop_assert!(far.price < near.price, "{} >= {}", far.price, near.price);
    }

    #[test]
    fn implied_volatility_round_trip(
        kind in option_type(),
        strike in 50.0..200.0_f64,
        rate in 0.0..0.08_f64,
        dividend_yield in 0.0..0.05_f64,
        volatility in 1.0e-3..3.0_f64,
        maturity in 0.5..2.0_f64,
    ) {
        let spot = 100.0;
        let quote = price_european_option(kind, spot, strike, rate, dividend_yield, volatility, maturity)
            .unwrap();
        let solved = solve_implied_volatility(kind, quote.price, spot, strike, rate, dividend_yield, maturity);
        let (lower, upper) = option_price_bounds(kind, spot, strike, rate, dividend_yield, maturity).unwrap();
        if quote.price <= lower || quote.price >= upper {
            // The price has rounded onto a bound: no volatility reproduces it.
            prop_assert!(solved.unwrap_err().is_invalid_input());
        } else {
            // Below this vega, rounding in the price outweighs any change in σ.
            prop_assume!(quote.vega >= 1e-6 * strike.max(spot));
            let sigma = solved.unwrap();
            prop_assert!((sigma - volatility).abs() < 1e-6, "σ = {volatility}, solved {sigma}");
        }
    }

    #[test]
    fn bond_yield_round_trip(
        face_value in 100.0..10_000.0_f64,
        coupon_rate in 0.0..0.15_f64,
        yield_rate in -0.02..0.30_f64,
        maturity in 0.5..30.0_f64,
        frequency in frequency(),
    ) {
        let price = price_bond(face_value, coupon_rate, yield_rate, maturity, frequency).unwrap();
        let solved = solve_bond_yield(price, face_value, coupon_rate, maturity, frequency).unwrap();
        prop_assert!((solved - yield_rate).abs() < 1e-6, "y = {yield_rate}, solved {solved}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn american_price_increases_with_volatility(
        kind in option_type(),
        strike in 90.0..110.0_f64,
        rate in 0.0..0.08_f64,
        volatility in 0.1..0.6_f64,
        bump in 0.05..0.3_f64,
        maturity in 0.5..2.0_f64,
    ) {
        let calculator = Calculator::new(CalculatorConfig {
            lattice: BinomialSettings::with_steps(200),
            ..CalculatorConfig::default()
        })
        .unwrap();
        let low = calculator
            .price_american_option(kind, 100.0, strike, rate, 0.0, volatility, maturity)
            .unwrap();
        let high = calculator
            .price_american_option(kind, 100.0, strike, rate, 0.0, volatility + bump, maturity)
            .unwrap();
        prop_assert!(high.price > low.price, "{} <= {}", high.price, low.price);
    }
}
