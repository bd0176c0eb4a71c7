use crate::solver::solver_error::SolverError;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;

/// A differential equation M(x,y) dx + N(x,y) dy = 0, parsed and ready for
/// classification. Immutable once built; every solve request constructs a
/// fresh instance and discards it after rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationInput {
    pub m: Expr,
    pub n: Expr,
    /// raw input text, kept for restating the equation and for the cache
    pub m_raw: String,
    pub n_raw: String,
}

impl EquationInput {
    /// Parses both sides of the equation from user text.
    ///
    /// # Errors
    /// `SolverError::Parse` for malformed input, `SolverError::TooComplex`
    /// when either side exceeds the depth limit.
    pub fn from_strings(m_raw: &str, n_raw: &str) -> Result<Self, SolverError> {
        let m = Expr::parse_expression(m_raw)?;
        let n = Expr::parse_expression(n_raw)?;
        SolverError::check_depth(m.depth())?;
        SolverError::check_depth(n.depth())?;
        debug!("parsed equation: M = {}, N = {}", m, n);
        Ok(EquationInput {
            m,
            n,
            m_raw: m_raw.trim().to_string(),
            n_raw: n_raw.trim().to_string(),
        })
    }

    /// The equation in conventional notation, for display.
    pub fn display_form(&self) -> String {
        format!("({}) dx + ({}) dy = 0", self.m.pretty(), self.n.pretty())
    }
}
