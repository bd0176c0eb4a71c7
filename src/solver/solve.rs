use crate::solver::equation::EquationInput;
use crate::solver::equation_cache::EquationCache;
use crate::solver::exactness::{classify, ExactnessResult};
use crate::solver::integrating_factor::{find_factor, IntegratingFactor};
use crate::solver::potential::{potential_function, PotentialFunction};
use crate::solver::solver_error::SolverError;
use crate::solver::step_renderer::{render, render_error, SolutionSteps};
use log::{info, warn};

/// Everything computed for one solve request. Built fresh per request and
/// discarded after rendering; nothing is shared between invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub input: EquationInput,
    pub exactness: ExactnessResult,
    pub factor: Option<IntegratingFactor>,
    pub potential: Option<PotentialFunction>,
}

/// Runs the full pipeline: parse, classify, search for an integrating factor
/// when the equation is inexact, and attempt the potential-function
/// construction.
///
/// # Errors
/// `Parse`/`TooComplex` for bad input, `DivisionByZero` for degenerate M or N
/// during the factor search, `UnsupportedForm` when both factor branches are
/// exhausted.
pub fn solve(m_raw: &str, n_raw: &str) -> Result<Solution, SolverError> {
    let input = EquationInput::from_strings(m_raw, n_raw)?;
    let exactness = classify(&input);

    if exactness.is_exact {
        let potential = match potential_function(&input.m, &input.n) {
            Ok(p) => Some(p),
            Err(reason) => {
                info!("potential construction left symbolic: {}", reason);
                None
            }
        };
        return Ok(Solution {
            input,
            exactness,
            factor: None,
            potential,
        });
    }

    let factor = find_factor(&input, &exactness)?;
    if factor == IntegratingFactor::NotFound {
        return Err(SolverError::UnsupportedForm);
    }

    // with a closed-form mu, the scaled equation mu*M dx + mu*N dy = 0 is
    // exact, so the potential construction applies to it
    let potential = factor.closed_form().and_then(|mu| {
        let scaled_m = (mu.clone() * input.m.clone()).normalize();
        let scaled_n = (mu.clone() * input.n.clone()).normalize();
        match potential_function(&scaled_m, &scaled_n) {
            Ok(p) => Some(p),
            Err(reason) => {
                info!("potential construction left symbolic: {}", reason);
                None
            }
        }
    });

    Ok(Solution {
        input,
        exactness,
        factor: Some(factor),
        potential,
    })
}

/// Total variant for presentation layers: failures come back as a rendered
/// error step instead of an `Err`, so a button handler can always display the
/// result and the process never dies on user input.
pub fn solve_to_steps(m_raw: &str, n_raw: &str) -> SolutionSteps {
    match solve(m_raw, n_raw) {
        Ok(solution) => render(&solution),
        Err(err) => {
            warn!("solve failed: {}", err);
            render_error(&err)
        }
    }
}

/// Like `solve_to_steps`, but remembers the raw input pair after a successful
/// solve so the next session can restore it. Cache write failures are logged
/// and otherwise ignored: the cache is a convenience, not a dependency.
pub fn solve_with_cache(m_raw: &str, n_raw: &str, cache: &EquationCache) -> SolutionSteps {
    match solve(m_raw, n_raw) {
        Ok(solution) => {
            if let Err(err) = cache.store(&solution.input.m_raw, &solution.input.n_raw) {
                warn!("could not persist last equation: {}", err);
            }
            render(&solution)
        }
        Err(err) => {
            warn!("solve failed: {}", err);
            render_error(&err)
        }
    }
}
