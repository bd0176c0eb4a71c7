use MathNexa::solver::equation::EquationInput;
use MathNexa::solver::exactness::classify;
use MathNexa::solver::integrating_factor::find_factor;
use MathNexa::solver::solve::solve;
use MathNexa::symbolic::symbolic_engine::Expr;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse expression", |b| {
        b.iter(|| Expr::parse_expression(black_box("2xy + sin(x^2) - exp(2x)/x")).unwrap())
    });
}

fn bench_classify(c: &mut Criterion) {
    let eq = EquationInput::from_strings("3x^2+y", "x-2y").unwrap();
    c.bench_function("classify exactness", |b| b.iter(|| classify(black_box(&eq))));
}

fn bench_find_factor(c: &mut Criterion) {
    let eq = EquationInput::from_strings("y", "2x").unwrap();
    let exactness = classify(&eq);
    c.bench_function("find integrating factor", |b| {
        b.iter(|| find_factor(black_box(&eq), black_box(&exactness)).unwrap())
    });
}

fn bench_full_solve(c: &mut Criterion) {
    c.bench_function("solve exact equation", |b| {
        b.iter(|| solve(black_box("2xy"), black_box("x^2")).unwrap())
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_classify,
    bench_find_factor,
    bench_full_solve
);
criterion_main!(benches);
