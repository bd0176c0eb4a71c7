#![allow(non_snake_case)]
/// # Differential-equation solver
/// the solver pipeline for first-order equations of the form
/// M(x,y) dx + N(x,y) dy = 0:
/// raw text -> parser -> partial derivatives -> exactness classification ->
/// (if inexact) integrating-factor search -> rendered solution steps
///
///# Example
/// ```
/// use MathNexa::solver::solve::solve_to_steps;
/// let steps = solve_to_steps("2xy", "x^2");
/// for step in steps.iter() {
///     println!("{}: {}", step.title, step.content);
/// }
/// println!("{}", steps.to_text());
/// ```
/// Example2#
/// ```
/// use MathNexa::solver::equation::EquationInput;
/// use MathNexa::solver::exactness::classify;
/// use MathNexa::solver::integrating_factor::{find_factor, IntegratingFactor};
/// // y dx + 2x dy = 0 is not exact, but admits mu(x)
/// let eq = EquationInput::from_strings("y", "2x").unwrap();
/// let exactness = classify(&eq);
/// assert!(!exactness.is_exact);
/// let factor = find_factor(&eq, &exactness).unwrap();
/// assert!(matches!(factor, IntegratingFactor::FunctionOfX { .. }));
/// ```
pub mod equation;
pub mod exactness;
pub mod integrating_factor;
pub mod potential;
pub mod solver_error;
pub mod step_renderer;
pub mod solve;
/// optional persistence of the last submitted (M, N) pair
pub mod equation_cache;

#[cfg(test)]
mod solver_tests;
