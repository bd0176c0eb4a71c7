use crate::solver::equation::EquationInput;
use crate::symbolic::symbolic_engine::Expr;
use log::info;

/// Outcome of the exactness check: both partial derivatives in normalized
/// form and the verdict. Derived from an `EquationInput`, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactnessResult {
    pub dm_dy: Expr,
    pub dn_dx: Expr,
    pub is_exact: bool,
}

/// Classifies the equation: M dx + N dy = 0 is exact iff dM/dy = dN/dx.
///
/// Both partials are computed symbolically and compared structurally after
/// normalization. No numeric sampling: expressions that merely agree at a few
/// probe points do not pass as equal here.
pub fn classify(eq: &EquationInput) -> ExactnessResult {
    let dm_dy = eq.m.diff("y").normalize();
    let dn_dx = eq.n.diff("x").normalize();
    let is_exact = dm_dy == dn_dx;
    info!(
        "exactness check: dM/dy = {}, dN/dx = {}, exact = {}",
        dm_dy, dn_dx, is_exact
    );
    ExactnessResult {
        dm_dy,
        dn_dx,
        is_exact,
    }
}
