use crate::solver::equation::EquationInput;
use crate::solver::equation_cache::EquationCache;
use crate::solver::exactness::classify;
use crate::solver::integrating_factor::{find_factor, IntegratingFactor};
use crate::solver::solve::{solve, solve_to_steps, solve_with_cache};
use crate::solver::solver_error::SolverError;
use crate::symbolic::symbolic_engine::Expr;
//___________________________________TESTS____________________________________

fn parse(s: &str) -> Expr {
    Expr::parse_expression(s).unwrap()
}

// the example equations the tutor pages ship with; hard-coded answer tables in
// the original UI become plain fixtures here
const EXAMPLE_EQUATIONS: [(&str, &str, bool); 6] = [
    ("2xy", "x^2", true),
    ("y", "2x", false),
    ("3x^2+y", "x-2y", true),
    ("y^2", "2xy", true),
    ("x+y", "x-y", true),
    ("2y", "3x^2", false),
];

#[test]
fn test_example_equations_classify_as_expected() {
    for (m, n, expected_exact) in EXAMPLE_EQUATIONS {
        let eq = EquationInput::from_strings(m, n).unwrap();
        let exactness = classify(&eq);
        assert_eq!(
            exactness.is_exact, expected_exact,
            "classification of M = {}, N = {}",
            m, n
        );
    }
}

#[test]
fn test_classify_2xy_x2() {
    let eq = EquationInput::from_strings("2*x*y", "x^2").unwrap();
    let exactness = classify(&eq);
    assert!(exactness.is_exact);
    let expected = parse("2*x").normalize();
    assert_eq!(exactness.dm_dy, expected);
    assert_eq!(exactness.dn_dx, expected);
}

#[test]
fn test_classify_3x2_plus_y() {
    let eq = EquationInput::from_strings("3*x^2+y", "x-2*y").unwrap();
    let exactness = classify(&eq);
    assert!(exactness.is_exact);
    assert_eq!(exactness.dm_dy, Expr::Const(1.0));
    assert_eq!(exactness.dn_dx, Expr::Const(1.0));
}

#[test]
fn test_factor_of_x_for_y_2x() {
    let eq = EquationInput::from_strings("y", "2*x").unwrap();
    let exactness = classify(&eq);
    assert!(!exactness.is_exact);
    assert_eq!(exactness.dm_dy, Expr::Const(1.0));
    assert_eq!(exactness.dn_dx, Expr::Const(2.0));

    let factor = find_factor(&eq, &exactness).unwrap();
    match factor {
        IntegratingFactor::FunctionOfX {
            integrand,
            closed_form,
        } => {
            assert!(integrand.equivalent(&parse("-1/(2*x)")));
            // mu(x) = exp(int -1/(2x) dx) = x^(-1/2)
            let mu = closed_form.expect("trivial integrand has a closed form");
            assert!(mu.equivalent(&parse("x^(-0.5)")));
        }
        other => panic!("expected FunctionOfX, got {:?}", other),
    }
}

#[test]
fn test_exact_solutions_match_worked_answers() {
    let worked: [(&str, &str, &str); 4] = [
        ("2xy", "x^2", "x^2*y"),
        ("3x^2+y", "x-2y", "x^3 + x*y - y^2"),
        ("y^2", "2xy", "x*y^2"),
        ("x+y", "x-y", "x^2/2 + x*y - y^2/2"),
    ];
    for (m, n, psi) in worked {
        let solution = solve(m, n).unwrap();
        let potential = solution
            .potential
            .unwrap_or_else(|| panic!("no potential for M = {}, N = {}", m, n));
        assert!(
            potential.psi.equivalent(&parse(psi)),
            "potential for M = {}, N = {}",
            m,
            n
        );
    }
}

#[test]
fn test_inexact_equation_solves_after_scaling() {
    // y dx + 2x dy = 0 with mu(x) = x^(-1/2) becomes exact; psi = 2*y*sqrt(x)
    let solution = solve("y", "2x").unwrap();
    assert!(!solution.exactness.is_exact);
    assert!(solution.factor.is_some());
    let potential = solution.potential.expect("scaled equation has a potential");
    assert!(potential.psi.equivalent(&parse("2*y*x^0.5")));
}

#[test]
fn test_division_by_zero_guard() {
    // N identically zero: the mu(x) ratio is undefined
    let err = solve("y", "0").unwrap_err();
    assert_eq!(err, SolverError::DivisionByZero { side: "N(x, y)" });

    // M identically zero with a y-dependent ratio: the mu(y) ratio is undefined
    let err = solve("0", "x+y").unwrap_err();
    assert_eq!(err, SolverError::DivisionByZero { side: "M(x, y)" });
}

#[test]
fn test_unsupported_form() {
    // both ratios keep both variables
    let err = solve("x*y", "x*y").unwrap_err();
    assert_eq!(err, SolverError::UnsupportedForm);
}

#[test]
fn test_parse_errors_surface_with_position() {
    let err = solve("2xz", "x").unwrap_err();
    match err {
        SolverError::Parse(parse_err) => {
            let message = parse_err.to_string();
            assert!(message.contains("z"), "message was: {}", message);
            assert!(message.contains("position"), "message was: {}", message);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_depth_limit_is_too_complex() {
    let deep = format!("{}x{}", "(".repeat(300), ")".repeat(300));
    let err = solve(&deep, "x").unwrap_err();
    assert!(matches!(err, SolverError::TooComplex { .. }));
}

#[test]
fn test_rendered_steps_for_exact_equation() {
    let steps = solve_to_steps("2xy", "x^2");
    assert!(!steps.is_error());
    let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Original Equation",
            "Check Exactness",
            "Construct Potential Function",
            "Final Solution"
        ]
    );
    assert_eq!(steps.final_solution.as_deref(), Some("x^2 * y = C"));
    let text = steps.to_text();
    assert!(text.contains("Solution: x^2 * y = C"));
}

#[test]
fn test_rendered_steps_for_inexact_equation_include_factor() {
    let steps = solve_to_steps("y", "2x");
    let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
    assert!(titles.contains(&"Find Integrating Factor"));
}

#[test]
fn test_errors_render_as_steps_and_never_panic() {
    for (m, n) in [("", ""), ("(((", "x"), ("x;", "y"), ("y", "0"), ("x*y", "x*y")] {
        let steps = solve_to_steps(m, n);
        assert!(steps.is_error(), "expected error steps for M = {:?}", m);
        assert_eq!(steps.len(), 1);
        // the error step tells the user what the solver accepts
        assert!(steps.iter().next().unwrap().content.contains("M(x, y)"));
    }
}

//___________________________________CACHE____________________________________

#[test]
fn test_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cache = EquationCache::new(dir.path().join("last_equation.toml"));
    assert_eq!(cache.load(), None);

    cache.store("2xy", "x^2").unwrap();
    assert_eq!(
        cache.load(),
        Some(("2xy".to_string(), "x^2".to_string()))
    );

    // overwritten on each solve
    cache.store("y", "2x").unwrap();
    assert_eq!(cache.load(), Some(("y".to_string(), "2x".to_string())));
}

#[test]
fn test_cache_ignores_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_equation.toml");
    std::fs::write(&path, "this is not toml [").unwrap();
    let cache = EquationCache::new(&path);
    assert_eq!(cache.load(), None);
}

#[test]
fn test_solve_with_cache_writes_only_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let cache = EquationCache::new(dir.path().join("last_equation.toml"));

    let steps = solve_with_cache("2xy", "x^2", &cache);
    assert!(!steps.is_error());
    assert_eq!(
        cache.load(),
        Some(("2xy".to_string(), "x^2".to_string()))
    );

    let failing = EquationCache::new(dir.path().join("untouched.toml"));
    let steps = solve_with_cache("zz", "x", &failing);
    assert!(steps.is_error());
    assert_eq!(failing.load(), None);
}
