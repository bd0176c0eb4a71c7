//! # Symbolic Derivatives Module
//!
//! Analytical differentiation of `Expr` trees, plus direct numeric evaluation
//! used by the tests to cross-check that tree rewrites preserve values.
//!
//! ## Key Methods
//!
//! - `diff(var: &str)` - partial derivative with respect to a named variable
//! - `eval_expression()` - direct evaluation without closure creation
//!
//! The differentiation rules are the standard ones: sum, product and quotient
//! rules, the power rule with chain factor, and chain rules for the supported
//! function set (exp, ln, sin, cos, tan, sqrt). Differentiation is
//! side-effect-free and terminates structurally: `Expr` is an immutable tree
//! with no back-references, so the recursion always descends into strictly
//! smaller subtrees.
//!
//! Literal 0 and 1 factors produced by the rules are elided on the spot
//! through the small constructors below. Without this, differentiating even a
//! modest product chain creates a large tree of dead zero-terms before
//! normalization ever runs; the inline checks are O(1) pattern matches on the
//! immediate operands and keep the later structural comparison tractable.

use crate::symbolic::symbolic_engine::Expr;

// constructors that fold the trivial identities the derivative rules emit

fn add_opt(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_zero() {
        return rhs;
    }
    if rhs.is_zero() {
        return lhs;
    }
    Expr::Add(Box::new(lhs), Box::new(rhs))
}

fn sub_opt(lhs: Expr, rhs: Expr) -> Expr {
    if rhs.is_zero() {
        return lhs;
    }
    if lhs.is_zero() {
        return Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(rhs));
    }
    Expr::Sub(Box::new(lhs), Box::new(rhs))
}

fn mul_opt(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_zero() || rhs.is_zero() {
        return Expr::Const(0.0);
    }
    if lhs.is_one() {
        return rhs;
    }
    if rhs.is_one() {
        return lhs;
    }
    Expr::Mul(Box::new(lhs), Box::new(rhs))
}

fn div_opt(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_zero() {
        return Expr::Const(0.0);
    }
    if rhs.is_one() {
        return lhs;
    }
    Expr::Div(Box::new(lhs), Box::new(rhs))
}

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements all standard differentiation rules from calculus:
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// For expressions in both x and y this is the partial derivative.
    ///
    /// # Arguments
    /// * `var` - Variable name to differentiate with respect to
    ///
    /// # Returns
    /// New symbolic expression representing the derivative
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2").unwrap();
    /// let df_dx = f.diff("x"); // 2*x^1, normalizing to 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => add_opt(lhs.diff(var), rhs.diff(var)),
            Expr::Sub(lhs, rhs) => sub_opt(lhs.diff(var), rhs.diff(var)),
            Expr::Mul(lhs, rhs) => add_opt(
                mul_opt(lhs.diff(var), *rhs.clone()),
                mul_opt(*lhs.clone(), rhs.diff(var)),
            ),
            Expr::Div(lhs, rhs) => div_opt(
                sub_opt(
                    mul_opt(lhs.diff(var), *rhs.clone()),
                    mul_opt(rhs.diff(var), *lhs.clone()),
                ),
                mul_opt(*rhs.clone(), *rhs.clone()),
            ),
            Expr::Pow(base, exp) => {
                if !exp.contains_variable(var) {
                    // power rule with chain factor
                    let new_exp = match exp.as_ref() {
                        Expr::Const(n) => Expr::Const(n - 1.0),
                        other => Expr::Sub(Box::new(other.clone()), Box::new(Expr::Const(1.0))),
                    };
                    let reduced = if new_exp.is_one() {
                        *base.clone()
                    } else if new_exp.is_zero() {
                        Expr::Const(1.0)
                    } else {
                        Expr::Pow(base.clone(), Box::new(new_exp))
                    };
                    mul_opt(mul_opt(*exp.clone(), reduced), base.diff(var))
                } else {
                    // general case through f^g = exp(g*ln f):
                    // (f^g)' = f^g * (g'*ln f + g*f'/f)
                    let inner = add_opt(
                        mul_opt(exp.diff(var), Expr::Ln(base.clone())),
                        mul_opt(*exp.clone(), div_opt(base.diff(var), *base.clone())),
                    );
                    mul_opt(self.clone(), inner)
                }
            }
            Expr::Exp(expr) => mul_opt(Expr::Exp(expr.clone()), expr.diff(var)),
            Expr::Ln(expr) => div_opt(expr.diff(var), *expr.clone()),
            Expr::sin(expr) => mul_opt(Expr::cos(expr.clone()), expr.diff(var)),
            Expr::cos(expr) => mul_opt(
                Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                ),
                expr.diff(var),
            ),
            Expr::tan(expr) => mul_opt(
                div_opt(
                    Expr::Const(1.0),
                    Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    ),
                ),
                expr.diff(var),
            ),
            Expr::sqrt(expr) => div_opt(
                expr.diff(var),
                Expr::Mul(
                    Box::new(Expr::Const(2.0)),
                    Box::new(Expr::sqrt(expr.clone())),
                ),
            ),
        }
    } // end of diff

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the symbolic expression at the given variable values.
    ///
    /// Recursively evaluates the expression tree; useful for spot-checking
    /// that symbolic rewrites preserve the value of an expression.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Returns
    /// Numerical result of expression evaluation
    ///
    /// # Panics
    /// Panics if the expression contains a variable absent from `vars`
    pub fn eval_expression(&self, vars: Vec<&str>, values: &[f64]) -> f64 {
        match self {
            Expr::Var(name) => {
                let index = vars.iter().position(|&x| x == name).unwrap();
                values[index]
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) + rhs.eval_expression(vars, values)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) - rhs.eval_expression(vars, values)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) * rhs.eval_expression(vars, values)
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values) / rhs.eval_expression(vars, values)
            }
            Expr::Pow(base, exp) => {
                let base_val = base.eval_expression(vars.clone(), values);
                let exp_val = exp.eval_expression(vars, values);
                base_val.powf(exp_val)
            }
            Expr::Exp(expr) => expr.eval_expression(vars, values).exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values).ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values).sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values).cos(),
            Expr::tan(expr) => expr.eval_expression(vars, values).tan(),
            Expr::sqrt(expr) => expr.eval_expression(vars, values).sqrt(),
        }
    } // end of eval_expression
}
