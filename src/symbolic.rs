#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use MathNexa::symbolic::symbolic_engine::Expr;
/// let input = "2xy + sin(x^2)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let df_dy = parsed_expression.diff("y");
/// println!("{}, d/dy: {}  \n", input, df_dy.pretty());
/// ```
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) represents mathematical expressions over the variables x and y as an immutable tree
/// 2) differentiates them analytically with respect to a named variable
/// 3) rewrites them into a canonical form so that two expressions can be compared structurally
///# Example#
/// ```
/// use MathNexa::symbolic::symbolic_engine::Expr;
/// let input = "x^2 + 2*x*y";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// // differentiate with respect to x and y
/// let df_dx = parsed_expression.diff("x");
/// let df_dy = parsed_expression.diff("y");
/// println!("df_dx = {}, df_dy = {}", df_dx, df_dy);
/// // canonical form and structural equivalence
/// let normalized = parsed_expression.normalize();
/// println!("normalized: {}", normalized.pretty());
/// assert!(df_dy.equivalent(&Expr::parse_expression("2*x").unwrap()));
/// // evaluate numerically
/// let value = parsed_expression.eval_expression(vec!["x", "y"], &[1.0, 2.0]);
/// println!("value at (1, 2) = {}", value);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
///________________________________________________________________________________________________________________________________________________
/// canonical normalization: flattening of associative operators, sorting of
/// commutative operands by a fixed key, constant folding and like-term collection
pub mod symbolic_normalize;
/// trivial closed-form antiderivatives (polynomial terms, c/x, f'/f, linear-argument
/// exp/sin/cos); everything beyond that reports failure and the caller falls back to
/// describing the integral instead of computing it
pub mod symbolic_integration;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and proceeding
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
