//! # Symbolic Engine Module
//!
//! This module provides the symbolic expression type used everywhere in the
//! MathNexa solver core. Expressions over the two variables x and y are kept
//! as immutable trees: every manipulation (substitution, differentiation,
//! normalization) produces a new tree and never mutates the old one, so a
//! parsed equation can be reused across the whole solve pipeline.
//!
//! ## Purpose
//!
//! The symbolic engine allows users to:
//! - Build symbolic expressions programmatically or from strings (see `parse_expr`)
//! - Query structure: which variables occur, tree depth, zero-ness
//! - Substitute variables with constants or other expressions
//! - Pretty-print expressions in conventional mathematical notation
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! The core symbolic expression type supporting:
//! - **Variables**: `Var(String)` - symbolic variables "x" and "y"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tan`, `sqrt`
//!
//! ### Key Methods
//! - `Symbols(symbols: &str)` - Create multiple variables from comma-separated string
//! - `diff(var: &str)` - Analytical differentiation (see `symbolic_engine_derivatives`)
//! - `normalize()` / `equivalent()` - canonical form and structural equality
//!   (see `symbolic_normalize`)
//! - `set_variable()` / `substitute_variable()` - substitution
//! - `pretty()` - precedence-aware printing with minimal parentheses
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: Uses Box<Expr> for nested expressions, enabling
//!    arbitrarily complex mathematical structures
//!
//! 2. **Operator Overloading**: Implements std::ops traits (Add, Sub, Mul, Div) for
//!    natural mathematical syntax: `x + y * z`
//!
//! 3. **Depth Accounting**: `depth()` reports the height of the tree; the parser
//!    and the solver refuse trees deeper than `MAX_EXPR_DEPTH` instead of
//!    recursing without bound
//!
//! 4. **Macro System**: Provides the `symbols!(x, y)` macro for ergonomic
//!    variable creation

#![allow(non_camel_case_types)]

use std::fmt;

/// Hard cap on expression tree height. Parsing and solving fail fast with a
/// `TooComplex` error beyond this instead of risking unbounded recursion.
pub const MAX_EXPR_DEPTH: usize = 256;

/// Core symbolic expression enum representing mathematical expressions as an
/// abstract syntax tree.
///
/// Each variant represents a different type of mathematical construct, from simple
/// variables and constants to nested operations. The enum uses Box<Expr> for
/// recursive structures. Leaves are always `Const` or `Var`; internal nodes own
/// their children, so the tree contains no back-references and no cycles.
///
/// # Examples
/// ```rust, ignore
/// use MathNexa::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name ("x" or "y" in solver context)
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x)
    tan(Box<Expr>),
    /// Square root: sqrt(x)
    sqrt(Box<Expr>),
}

/// Display implementation for unambiguous printing of symbolic expressions.
///
/// Every binary node is parenthesized, which makes the output clumsy but
/// trivially re-parseable; use `pretty()` for human-facing output.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tan(expr) => write!(f, "tan({})", expr),
            Expr::sqrt(expr) => write!(f, "sqrt({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        *self = Expr::Add(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        *self = Expr::Sub(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = Expr::Mul(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::DivAssign for Expr {
    fn div_assign(&mut self, rhs: Self) {
        *self = Expr::Div(Box::new(self.clone()), Box::new(rhs));
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// Parses a string containing variable names separated by commas and returns
    /// a vector of Expr::Var instances. Whitespace is automatically trimmed.
    ///
    /// # Arguments
    /// * `symbols` - Comma-separated string of variable names (e.g., "x, y")
    ///
    /// # Returns
    /// Vector of Expr::Var instances for each variable name
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y");
    /// assert_eq!(vars.len(), 2);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        let symbols = symbols.to_string();
        let vec_trimmed: Vec<String> = symbols.split(',').map(|s| s.trim().to_string()).collect();
        let vector_of_symbolic_vars: Vec<Expr> = vec_trimmed
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect();
        vector_of_symbolic_vars
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    ///
    /// Essential for creating nested expressions since Expr variants use Box<Expr>.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(mut self) -> Expr {
        self = Expr::Exp(self.boxed());
        self
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(mut self) -> Expr {
        self = Expr::Ln(self.boxed());
        self
    }

    /// Creates power expression self^rhs.
    ///
    /// # Arguments
    /// * `rhs` - Exponent expression
    pub fn pow(mut self, rhs: Expr) -> Expr {
        self = Expr::Pow(self.boxed(), rhs.boxed());
        self
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Const(val) => val == &0.0,
            _ => false,
        }
    }

    /// Checks if expression is exactly one (constant 1.0).
    pub fn is_one(&self) -> bool {
        match self {
            Expr::Const(val) => val == &1.0,
            _ => false,
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    ///
    /// Recursively traverses the expression tree and replaces all occurrences
    /// of the specified variable with the given constant value.
    ///
    /// # Arguments
    /// * `var` - Name of the variable to substitute
    /// * `value` - Numerical value to substitute for the variable
    ///
    /// # Returns
    /// New expression with the variable substituted
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Substitutes a variable with an arbitrary expression.
    pub fn substitute_variable(&self, var: &str, replacement: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => replacement.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(lhs.substitute_variable(var, replacement)),
                Box::new(rhs.substitute_variable(var, replacement)),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(base.substitute_variable(var, replacement)),
                Box::new(exp.substitute_variable(var, replacement)),
            ),
            Expr::Exp(expr) => Expr::Exp(Box::new(expr.substitute_variable(var, replacement))),
            Expr::Ln(expr) => Expr::Ln(Box::new(expr.substitute_variable(var, replacement))),
            Expr::sin(expr) => Expr::sin(Box::new(expr.substitute_variable(var, replacement))),
            Expr::cos(expr) => Expr::cos(Box::new(expr.substitute_variable(var, replacement))),
            Expr::tan(expr) => Expr::tan(Box::new(expr.substitute_variable(var, replacement))),
            Expr::sqrt(expr) => Expr::sqrt(Box::new(expr.substitute_variable(var, replacement))),
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr) | Expr::Ln(expr) | Expr::sin(expr) | Expr::cos(expr)
            | Expr::tan(expr) | Expr::sqrt(expr) => expr.contains_variable(var_name),
        }
    }

    /// Extracts all unique variable names from the expression.
    ///
    /// Recursively traverses the expression tree to collect all symbolic variables.
    /// Returns a sorted, deduplicated list of variable names.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + y*x").unwrap();
    /// assert_eq!(expr.variables(), vec!["x", "y"]);
    /// ```
    pub fn variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Var(name) => vars.push(name.clone()),
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(vars);
                rhs.collect_variables(vars);
            }
            Expr::Exp(expr) | Expr::Ln(expr) | Expr::sin(expr) | Expr::cos(expr)
            | Expr::tan(expr) | Expr::sqrt(expr) => expr.collect_variables(vars),
        }
    }

    /// Height of the expression tree. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) => 1,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => 1 + lhs.depth().max(rhs.depth()),
            Expr::Exp(expr) | Expr::Ln(expr) | Expr::sin(expr) | Expr::cos(expr)
            | Expr::tan(expr) | Expr::sqrt(expr) => 1 + expr.depth(),
        }
    }

    //__________________________________PRETTY PRINTING____________________________________

    /// Precedence-aware printing with minimal parentheses, for rendering
    /// solution steps: `((2 * x) * y)` comes out as `2 * x * y`.
    pub fn pretty(&self) -> String {
        self.pretty_prec(0)
    }

    // binding strength: additive 1, multiplicative 2, power 3, atoms/functions 4
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Pow(_, _) => 3,
            _ => 4,
        }
    }

    fn pretty_prec(&self, parent: u8) -> String {
        let prec = self.precedence();
        let body = match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => {
                if *val < 0.0 && parent > 1 {
                    format!("({})", val)
                } else {
                    format!("{}", val)
                }
            }
            Expr::Add(lhs, rhs) => {
                format!("{} + {}", lhs.pretty_prec(prec), rhs.pretty_prec(prec))
            }
            // the right operand of a difference binds tighter: a - (b + c)
            Expr::Sub(lhs, rhs) => {
                format!("{} - {}", lhs.pretty_prec(prec), rhs.pretty_prec(prec + 1))
            }
            Expr::Mul(lhs, rhs) => {
                format!("{} * {}", lhs.pretty_prec(prec), rhs.pretty_prec(prec))
            }
            Expr::Div(lhs, rhs) => {
                format!("{} / {}", lhs.pretty_prec(prec), rhs.pretty_prec(prec + 1))
            }
            // exponentiation is right-associative: (a^b)^c needs brackets, a^(b^c) does not
            Expr::Pow(base, exp) => {
                format!("{}^{}", base.pretty_prec(prec + 1), exp.pretty_prec(prec))
            }
            Expr::Exp(expr) => format!("exp({})", expr.pretty_prec(0)),
            Expr::Ln(expr) => format!("ln({})", expr.pretty_prec(0)),
            Expr::sin(expr) => format!("sin({})", expr.pretty_prec(0)),
            Expr::cos(expr) => format!("cos({})", expr.pretty_prec(0)),
            Expr::tan(expr) => format!("tan({})", expr.pretty_prec(0)),
            Expr::sqrt(expr) => format!("sqrt({})", expr.pretty_prec(0)),
        };
        if prec < 4 && prec < parent {
            format!("({})", body)
        } else {
            body
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y) -> creates variables x, y
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            let var_names = stringify!($($var),+);
            let vars = Expr::Symbols(var_names);
            let mut iter = vars.into_iter();
            ($(
                {
                    let $var = iter.next().unwrap();
                    $var
                }
            ),+)
        }
    };
}
