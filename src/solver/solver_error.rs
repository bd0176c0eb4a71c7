use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::MAX_EXPR_DEPTH;
use thiserror::Error;

/// Everything that can go wrong during a solve. All of these are reported to
/// the user as a rendered error step; none are fatal to the process, and the
/// next solve attempt starts from a clean slate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Malformed input text
    #[error("could not parse the expression: {0}")]
    Parse(ParseError),

    /// Depth/size limit exceeded while parsing or building an expression
    #[error("expression too complex: depth {depth} exceeds the limit {limit}")]
    TooComplex { depth: usize, limit: usize },

    /// M or N is identically zero, so the integrating-factor ratio is undefined
    #[error("division by zero: {side} is identically zero, the equation is degenerate")]
    DivisionByZero { side: &'static str },

    /// Both integrating-factor branches were exhausted
    #[error("no integrating factor of the form mu(x) or mu(y) exists for this equation")]
    UnsupportedForm,
}

impl From<ParseError> for SolverError {
    fn from(err: ParseError) -> Self {
        match err {
            // the parser's depth guard is the solver's complexity limit
            ParseError::TooDeep { depth, limit } => SolverError::TooComplex { depth, limit },
            other => SolverError::Parse(other),
        }
    }
}

impl SolverError {
    /// Guard helper shared by everything that builds expression trees outside
    /// the parser.
    pub fn check_depth(depth: usize) -> Result<(), SolverError> {
        if depth > MAX_EXPR_DEPTH {
            Err(SolverError::TooComplex {
                depth,
                limit: MAX_EXPR_DEPTH,
            })
        } else {
            Ok(())
        }
    }
}
