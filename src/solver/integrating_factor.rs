use crate::solver::equation::EquationInput;
use crate::solver::exactness::ExactnessResult;
use crate::solver::solver_error::SolverError;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info};

/// Result of the integrating-factor search. The `integrand` is the normalized
/// ratio whose exponential integral gives the factor:
/// mu = exp(integral of integrand). `closed_form` is populated only when the
/// trivial integrator produces one; otherwise the factor is reported as a
/// described integral.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegratingFactor {
    NotFound,
    FunctionOfX {
        integrand: Expr,
        closed_form: Option<Expr>,
    },
    FunctionOfY {
        integrand: Expr,
        closed_form: Option<Expr>,
    },
}

/// Searches for an integrating factor of the form mu(x) or mu(y).
///
/// 1. ratio_x = (dM/dy - dN/dx)/N; if it contains no y, mu depends on x alone
/// 2. otherwise ratio_y = (dN/dx - dM/dy)/M; if it contains no x, mu depends
///    on y alone
/// 3. otherwise `NotFound`
///
/// # Errors
/// `SolverError::DivisionByZero` when N (respectively M) is syntactically
/// zero: the ratio is undefined and must not be silently computed.
pub fn find_factor(
    eq: &EquationInput,
    exactness: &ExactnessResult,
) -> Result<IntegratingFactor, SolverError> {
    let difference = Expr::Sub(
        Box::new(exactness.dm_dy.clone()),
        Box::new(exactness.dn_dx.clone()),
    );

    if eq.n.normalize().is_zero() {
        return Err(SolverError::DivisionByZero { side: "N(x, y)" });
    }
    let ratio_x = Expr::Div(Box::new(difference.clone()), Box::new(eq.n.clone())).normalize();
    debug!("mu(x) candidate ratio: {}", ratio_x);
    if !ratio_x.contains_variable("y") {
        let closed_form = exponential_of_integral(&ratio_x, "x");
        info!(
            "integrating factor mu(x) found, integrand {}, closed form {:?}",
            ratio_x, closed_form
        );
        return Ok(IntegratingFactor::FunctionOfX {
            integrand: ratio_x,
            closed_form,
        });
    }

    if eq.m.normalize().is_zero() {
        return Err(SolverError::DivisionByZero { side: "M(x, y)" });
    }
    let negated = Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(difference));
    let ratio_y = Expr::Div(Box::new(negated), Box::new(eq.m.clone())).normalize();
    debug!("mu(y) candidate ratio: {}", ratio_y);
    if !ratio_y.contains_variable("x") {
        let closed_form = exponential_of_integral(&ratio_y, "y");
        info!(
            "integrating factor mu(y) found, integrand {}, closed form {:?}",
            ratio_y, closed_form
        );
        return Ok(IntegratingFactor::FunctionOfY {
            integrand: ratio_y,
            closed_form,
        });
    }

    info!("both integrating-factor branches exhausted");
    Ok(IntegratingFactor::NotFound)
}

// mu = exp(integral of ratio), when the trivial integrator covers the ratio.
// The exp(c*ln f) -> f^c normalization rule turns results like
// exp(-0.5*ln(x)) into x^(-1/2).
fn exponential_of_integral(ratio: &Expr, var: &str) -> Option<Expr> {
    match ratio.integrate(var) {
        Ok(primitive) => Some(Expr::Exp(Box::new(primitive)).normalize()),
        Err(reason) => {
            debug!("no closed form for mu({}): {}", var, reason);
            None
        }
    }
}

impl IntegratingFactor {
    /// The factor expression to multiply the equation with, when known.
    pub fn closed_form(&self) -> Option<&Expr> {
        match self {
            IntegratingFactor::FunctionOfX { closed_form, .. }
            | IntegratingFactor::FunctionOfY { closed_form, .. } => closed_form.as_ref(),
            IntegratingFactor::NotFound => None,
        }
    }
}
