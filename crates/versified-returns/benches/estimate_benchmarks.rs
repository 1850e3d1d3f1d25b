//! Benchmarks for return estimation.
//!
//! Run with: cargo bench -p versified-returns

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use versified_core::prelude::*;
use versified_returns::prelude::*;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn create_test_bond(id: usize) -> BondSnapshot {
    let coupons = [dec!(0), dec!(0.005), dec!(0.0125), dec!(0.02), dec!(0.0325), dec!(0.045)];
    let frequencies = [Frequency::Annual, Frequency::SemiAnnual, Frequency::Quarterly];
    let conventions = DayCountConvention::all();

    BondSnapshot::builder()
        .identifier(format!("CH{:010}", id))
        .currency(if id % 3 == 0 { Currency::EUR } else { Currency::CHF })
        .face_value(dec!(1000))
        .coupon_rate(coupons[id % coupons.len()])
        .frequency(frequencies[id % frequencies.len()])
        .day_count(conventions[id % conventions.len()])
        .issue_date(Date::from_ymd(2015 + (id % 8) as i32, 1 + (id % 12) as u32, 15).unwrap())
        .maturity_date(Date::from_ymd(2027 + (id % 20) as i32, 1 + (id % 12) as u32, 15).unwrap())
        .clean_price(Decimal::from(90 + (id % 20) as i64))
        .build()
        .unwrap()
}

fn create_estimator() -> ReturnEstimator {
    ReturnEstimator::new(
        FeeSchedule::none()
            .with_entry_fee(dec!(0.005))
            .with_custody_fee(dec!(0.002))
            .with_transaction_fee(dec!(25), dec!(0.001))
            .with_fx_fee(dec!(0.0075)),
        TaxProfile::none()
            .with_withholding_rate(dec!(0.35))
            .with_capital_gains_rate(dec!(0.15)),
    )
    .with_notional(dec!(50000))
}

fn settlement() -> Date {
    Date::from_ymd(2025, 3, 3).unwrap()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_schedule(c: &mut Criterion) {
    let bond = create_test_bond(1);
    c.bench_function("coupon_schedule", |b| {
        b.iter(|| CouponSchedule::build(black_box(&bond), black_box(settlement())))
    });
}

fn bench_single_estimate(c: &mut Criterion) {
    let bond = create_test_bond(4);
    let estimator = create_estimator();
    c.bench_function("estimate_single", |b| {
        b.iter(|| estimator.estimate(black_box(&bond), settlement()))
    });
}

fn bench_batch_estimate(c: &mut Criterion) {
    let estimator = create_estimator();
    let mut group = c.benchmark_group("estimate_batch");
    group.sample_size(50);

    for size in [10usize, 100, 500] {
        let bonds: Vec<BondSnapshot> = (0..size).map(create_test_bond).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bonds, |b, bonds| {
            b.iter(|| estimator.estimate_all(black_box(bonds), settlement()))
        });
    }
    group.finish();
}

fn bench_solved_yield(c: &mut Criterion) {
    let curve = GovernmentCurve::new(vec![
        CurvePoint::new(1.0, 0.9),
        CurvePoint::new(5.0, 1.1),
        CurvePoint::new(10.0, 1.4),
        CurvePoint::new(20.0, 1.6),
    ])
    .unwrap();

    c.bench_function("solve_yield_to_maturity", |b| {
        b.iter(|| solve_yield_to_maturity(black_box(97.5), 2.0, 7.3, Frequency::Annual, 100.0))
    });
    c.bench_function("gov_spread_bps", |b| {
        b.iter(|| gov_spread_bps(black_box(97.5), 2.0, 7.3, Frequency::Annual, &curve))
    });
}

criterion_group!(
    benches,
    bench_schedule,
    bench_single_estimate,
    bench_batch_estimate,
    bench_solved_yield
);
criterion_main!(benches);
