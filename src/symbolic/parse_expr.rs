use crate::symbolic::symbolic_engine::{Expr, MAX_EXPR_DEPTH};
use crate::symbolic::utils::{
    balanced_brackets, find_leftmost_operator_outside_brackets, find_matching_bracket,
    find_rightmost_binary_operator, max_bracket_nesting,
};
use itertools::Itertools;
use log::debug;
use regex::Regex;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use MathNexa::symbolic::symbolic_engine::Expr;
/// let input = "2xy + x^2"; // implicit multiplication is inserted: 2*x*y + x^2
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// println!("pretty: {}", parsed_expression.pretty());
/// ```
//                  search recursion diagram
//                "y^2+exp(x)+2x/y"                  |
//                |       left  | right             |
//                |_________________________________|
//                |     split at rightmost +        |
//                |_________________________________|
//                | y^2+exp(x)  |  2*x/y            |
//                |      |      |     |             |
//                |     \|/     |     |             |
//                |  split at + |     |             |
//                |_____________|_____|_____________|
//                | y^2 | exp(x)|  split at /       |
//                | ^   |  head |  2*x  |  y        |
//                |_Ok__|__Ok__\|/_____Ok___________|
//                  etc...

/// Error produced while turning a string into an `Expr`. Carries the offending
/// substring and its byte position in the original input wherever one exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected token `{snippet}` at position {position}")]
    UnexpectedToken { snippet: String, position: usize },
    #[error(
        "unknown identifier `{name}` at position {position}; expected x, y or one of the functions {}", UnaryFunc::known_names()
    )]
    UnknownIdentifier { name: String, position: usize },
    #[error("missing operand at position {position}")]
    MissingOperand { position: usize },
    #[error("unbalanced parentheses in `{snippet}`")]
    UnbalancedParens { snippet: String },
    #[error("empty expression")]
    Empty,
    #[error("expression nesting depth {depth} exceeds the limit {limit}")]
    TooDeep { depth: usize, limit: usize },
}

/// The function heads the parser recognizes. `tan`/`tg` and `ln`/`log` are
/// accepted as spellings of the same function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryFunc {
    Sin,
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    Exp,
    #[strum(to_string = "ln", serialize = "log")]
    Ln,
    Sqrt,
}

impl UnaryFunc {
    pub fn apply(&self, inner: Expr) -> Expr {
        match self {
            UnaryFunc::Sin => Expr::sin(inner.boxed()),
            UnaryFunc::Cos => Expr::cos(inner.boxed()),
            UnaryFunc::Tan => Expr::tan(inner.boxed()),
            UnaryFunc::Exp => Expr::Exp(inner.boxed()),
            UnaryFunc::Ln => Expr::Ln(inner.boxed()),
            UnaryFunc::Sqrt => Expr::sqrt(inner.boxed()),
        }
    }

    /// comma-separated list of the canonical function names, for error texts
    pub fn known_names() -> String {
        UnaryFunc::iter().map(|f| f.to_string()).join(", ")
    }

    // every accepted spelling, longest first so suffix matching is unambiguous
    fn spellings() -> [(&'static str, UnaryFunc); 8] {
        [
            ("sqrt", UnaryFunc::Sqrt),
            ("sin", UnaryFunc::Sin),
            ("cos", UnaryFunc::Cos),
            ("tan", UnaryFunc::Tan),
            ("exp", UnaryFunc::Exp),
            ("log", UnaryFunc::Ln),
            ("tg", UnaryFunc::Tan),
            ("ln", UnaryFunc::Ln),
        ]
    }
}

// Splits an identifier run that ends in a function name, so that `xsin` reads
// as the variable x juxtaposed with sin. Returns the leading part and the
// matched function; the leading part may be empty.
fn split_trailing_func(run: &str) -> Option<(&str, UnaryFunc)> {
    for (name, func) in UnaryFunc::spellings() {
        if let Some(prefix) = run.strip_suffix(name) {
            return Some((prefix, func));
        }
    }
    None
}

impl Expr {
    /// Parses a mathematical expression from string representation.
    ///
    /// Converts conventional mathematical notation into a symbolic expression
    /// tree. This is a pure syntactic parse: no code is evaluated and no
    /// numeric sampling happens here.
    ///
    /// # Supported Syntax
    /// - Variables: x, y
    /// - Constants: 3.14, 0.5, 42
    /// - Operators: +, -, *, /, ^
    /// - Implicit multiplication: 2xy, x(x+y), (x+1)(y-1)
    /// - Functions: sin, cos, tan (tg), exp, ln (log), sqrt
    /// - Parentheses for grouping
    ///
    /// # Errors
    /// `ParseError` naming the offending substring and position; nesting deeper
    /// than `MAX_EXPR_DEPTH` is rejected with `ParseError::TooDeep`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("x^2 + 2xy + 1").unwrap();
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_str(input)
    }
}

pub fn parse_expression_str(input: &str) -> Result<Expr, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    validate_characters(trimmed)?;
    if !balanced_brackets(trimmed) {
        return Err(ParseError::UnbalancedParens {
            snippet: trimmed.to_string(),
        });
    }
    let nesting = max_bracket_nesting(trimmed);
    if nesting > MAX_EXPR_DEPTH {
        return Err(ParseError::TooDeep {
            depth: nesting,
            limit: MAX_EXPR_DEPTH,
        });
    }
    validate_identifiers(trimmed)?;
    let prepared = insert_implicit_mul(trimmed);
    debug!("prepared `{}` from input `{}`", prepared, trimmed);
    let expr = parse_slice(&prepared, 0, 0)?;
    let depth = expr.depth();
    if depth > MAX_EXPR_DEPTH {
        return Err(ParseError::TooDeep {
            depth,
            limit: MAX_EXPR_DEPTH,
        });
    }
    Ok(expr)
}

// the rest of the parser slices by byte offset, so reject anything outside the
// ASCII expression alphabet up front
fn validate_characters(input: &str) -> Result<(), ParseError> {
    for (pos, c) in input.char_indices() {
        let allowed = c.is_ascii_alphanumeric()
            || c.is_ascii_whitespace()
            || matches!(c, '+' | '-' | '*' | '/' | '^' | '(' | ')' | '.');
        if !allowed {
            return Err(ParseError::UnexpectedToken {
                snippet: c.to_string(),
                position: pos,
            });
        }
    }
    Ok(())
}

fn validate_identifiers(input: &str) -> Result<(), ParseError> {
    let ident = Regex::new(r"[A-Za-z]+").unwrap();
    for m in ident.find_iter(input) {
        let run = m.as_str();
        if UnaryFunc::from_str(run).is_ok() {
            // a function head must open an argument list
            let next = input[m.end()..].chars().find(|c| !c.is_whitespace());
            if next != Some('(') {
                return Err(ParseError::UnexpectedToken {
                    snippet: run.to_string(),
                    position: m.start(),
                });
            }
            continue;
        }
        if run.chars().all(|c| c == 'x' || c == 'y') {
            continue;
        }
        // variables juxtaposed with a function call: xsin(x) = x*sin(x)
        if let Some((prefix, _)) = split_trailing_func(run) {
            let next = input[m.end()..].chars().find(|c| !c.is_whitespace());
            if next == Some('(') && prefix.chars().all(|c| c == 'x' || c == 'y') {
                continue;
            }
        }
        return Err(ParseError::UnknownIdentifier {
            name: run.to_string(),
            position: m.start(),
        });
    }
    Ok(())
}

/// Rewrites juxtaposition into explicit multiplication: `2xy` -> `2*x*y`,
/// `x(x+y)` -> `x*(x+y)`, `(x+1)(y-1)` -> `(x+1)*(y-1)`. Function names are
/// kept whole, so `sin(x)` is never split into factors. Whitespace is dropped.
fn insert_implicit_mul(input: &str) -> String {
    let src: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(src.len() * 2);
    let mut prev_operand = false; // the previously emitted char ends an operand
    let mut i = 0;
    while i < src.len() {
        let c = src[i];
        if c.is_ascii_alphabetic() {
            let start = i;
            while i < src.len() && src[i].is_ascii_alphabetic() {
                i += 1;
            }
            let run: String = src[start..i].iter().collect();
            let next_is_paren = i < src.len() && src[i] == '(';
            let trailing_func = if next_is_paren {
                split_trailing_func(&run)
            } else {
                None
            };
            match trailing_func {
                Some((prefix, _)) => {
                    // leading letters are variables, the tail heads the call
                    for ch in prefix.chars() {
                        if prev_operand {
                            out.push('*');
                        }
                        out.push(ch);
                        prev_operand = true;
                    }
                    if prev_operand {
                        out.push('*');
                    }
                    out.push_str(&run[prefix.len()..]);
                    prev_operand = false;
                }
                None => {
                    for ch in run.chars() {
                        if prev_operand {
                            out.push('*');
                        }
                        out.push(ch);
                        prev_operand = true;
                    }
                }
            }
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            if prev_operand {
                out.push('*');
            }
            while i < src.len() && (src[i].is_ascii_digit() || src[i] == '.') {
                out.push(src[i]);
                i += 1;
            }
            prev_operand = true;
            continue;
        }
        match c {
            '(' => {
                if prev_operand {
                    out.push('*');
                }
                out.push('(');
                prev_operand = false;
            }
            ')' => {
                out.push(')');
                prev_operand = true;
            }
            _ => {
                out.push(c);
                prev_operand = false;
            }
        }
        i += 1;
    }
    out
}

// `offset` is the byte position of `input` inside the prepared string, kept so
// that errors deep in the recursion can still name a position
fn parse_slice(input: &str, offset: usize, depth: usize) -> Result<Expr, ParseError> {
    if depth > MAX_EXPR_DEPTH {
        return Err(ParseError::TooDeep {
            depth,
            limit: MAX_EXPR_DEPTH,
        });
    }
    if input.is_empty() {
        return Err(ParseError::MissingOperand { position: offset });
    }

    // addition and subtraction: split at the rightmost binary +/- outside brackets
    if let Some((pos, op)) = find_rightmost_binary_operator(input, &['+', '-']) {
        let left = &input[..pos];
        let right = &input[pos + 1..];
        if right.is_empty() {
            return Err(ParseError::MissingOperand {
                position: offset + pos + 1,
            });
        }
        let lhs = parse_slice(left, offset, depth + 1)?;
        let rhs = parse_slice(right, offset + pos + 1, depth + 1)?;
        return Ok(match op {
            '+' => Expr::Add(Box::new(lhs), Box::new(rhs)),
            _ => Expr::Sub(Box::new(lhs), Box::new(rhs)),
        });
    }

    // leading sign: everything after the additive split is unary
    if let Some(rest) = input.strip_prefix('-') {
        let inner = parse_slice(rest, offset + 1, depth + 1)?;
        return Ok(Expr::Mul(
            Box::new(Expr::Const(-1.0)),
            Box::new(inner),
        ));
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_slice(rest, offset + 1, depth + 1);
    }

    // multiplication and division: rightmost split keeps them left-associative
    if let Some((pos, op)) = find_rightmost_binary_operator(input, &['*', '/']) {
        let left = &input[..pos];
        let right = &input[pos + 1..];
        if right.is_empty() {
            return Err(ParseError::MissingOperand {
                position: offset + pos + 1,
            });
        }
        let lhs = parse_slice(left, offset, depth + 1)?;
        let rhs = parse_slice(right, offset + pos + 1, depth + 1)?;
        return Ok(match op {
            '*' => Expr::Mul(Box::new(lhs), Box::new(rhs)),
            _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
        });
    }

    // exponentiation: leftmost split makes ^ right-associative
    if let Some(pos) = find_leftmost_operator_outside_brackets(input, '^') {
        let base = &input[..pos];
        let exponent = &input[pos + 1..];
        if exponent.is_empty() {
            return Err(ParseError::MissingOperand {
                position: offset + pos + 1,
            });
        }
        let base_expr = parse_slice(base, offset, depth + 1)?;
        let exponent_expr = parse_slice(exponent, offset + pos + 1, depth + 1)?;
        return Ok(Expr::Pow(Box::new(base_expr), Box::new(exponent_expr)));
    }

    // function heads: sin(...), cos(...), tan(...), exp(...), ln(...), sqrt(...)
    if input.ends_with(')') {
        if let Some(paren) = input.find('(') {
            let head = &input[..paren];
            if !head.is_empty() {
                if let Ok(func) = UnaryFunc::from_str(head) {
                    if find_matching_bracket(input, paren) == Some(input.len() - 1) {
                        let inner = &input[paren + 1..input.len() - 1];
                        if inner.is_empty() {
                            return Err(ParseError::MissingOperand {
                                position: offset + paren + 1,
                            });
                        }
                        let inner_expr = parse_slice(inner, offset + paren + 1, depth + 1)?;
                        return Ok(func.apply(inner_expr));
                    }
                }
            }
        }
    }

    // expression that is all in brackets
    if input.starts_with('(') && input.ends_with(')') {
        if find_matching_bracket(input, 0) == Some(input.len() - 1) {
            let inner = &input[1..input.len() - 1];
            if inner.is_empty() {
                return Err(ParseError::MissingOperand {
                    position: offset + 1,
                });
            }
            return parse_slice(inner, offset + 1, depth + 1);
        }
    }

    // constants and variables
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }
    if input == "x" || input == "y" {
        return Ok(Expr::Var(input.to_string()));
    }
    if input.len() == 1 && input.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ParseError::UnknownIdentifier {
            name: input.to_string(),
            position: offset,
        });
    }

    Err(ParseError::UnexpectedToken {
        snippet: input.to_string(),
        position: offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_str("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_str("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_str("x + 2").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_subtraction() {
        let expr = parse_expression_str("x - 2").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_multiplication() {
        let expr = parse_expression_str("x * 2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_division_left_associative() {
        // x/y/2 must read as (x/y)/2
        let expr = parse_expression_str("x/y/2").unwrap();
        assert_eq!(
            expr,
            Expr::Div(
                Box::new(Expr::Div(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power() {
        let expr = parse_expression_str("x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power_right_associative() {
        let expr = parse_expression_str("x^2^3").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Pow(
                    Box::new(Expr::Const(2.0)),
                    Box::new(Expr::Const(3.0))
                ))
            )
        );
    }

    #[test]
    fn test_parse_negative_exponent() {
        let expr = parse_expression_str("x^-2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Const(2.0))
                ))
            )
        );
    }

    #[test]
    fn test_parse_functions() {
        let expr = parse_expression_str("sin(x)").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::Var("x".to_string()))));
        let expr = parse_expression_str("exp(x)").unwrap();
        assert_eq!(expr, Expr::Exp(Box::new(Expr::Var("x".to_string()))));
        let expr = parse_expression_str("sqrt(y)").unwrap();
        assert_eq!(expr, Expr::sqrt(Box::new(Expr::Var("y".to_string()))));
        // alternate spellings
        let expr = parse_expression_str("tg(x)").unwrap();
        assert_eq!(expr, Expr::tan(Box::new(Expr::Var("x".to_string()))));
        let expr = parse_expression_str("log(x)").unwrap();
        assert_eq!(expr, Expr::Ln(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_nested_functions() {
        let expr = parse_expression_str("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::sin(Box::new(Expr::cos(Box::new(Expr::Var("x".to_string())))))
        );
    }

    #[test]
    fn test_parse_with_brackets() {
        let expr = parse_expression_str("(x + y) * 2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_implicit_multiplication() {
        let explicit = parse_expression_str("2*x*y").unwrap();
        let implicit = parse_expression_str("2xy").unwrap();
        assert_eq!(explicit, implicit);

        let explicit = parse_expression_str("x*(x+y)").unwrap();
        let implicit = parse_expression_str("x(x+y)").unwrap();
        assert_eq!(explicit, implicit);

        let explicit = parse_expression_str("(x+1)*(y-1)").unwrap();
        let implicit = parse_expression_str("(x+1)(y-1)").unwrap();
        assert_eq!(explicit, implicit);

        // function names survive the rewrite
        let explicit = parse_expression_str("2*sin(x)").unwrap();
        let implicit = parse_expression_str("2sin(x)").unwrap();
        assert_eq!(explicit, implicit);

        // variables juxtaposed with a function call
        let explicit = parse_expression_str("x*sin(x)").unwrap();
        assert_eq!(parse_expression_str("xsin(x)").unwrap(), explicit);
        assert_eq!(parse_expression_str("x sin(x)").unwrap(), explicit);
    }

    #[test]
    fn test_unary_minus() {
        let expr = parse_expression_str("-x").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Var("x".to_string()))
            )
        );
        let expr = parse_expression_str("-(x + y)").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                ))
            )
        );
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        let err = parse_expression_str("x + z").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownIdentifier {
                name: "z".to_string(),
                position: 4
            }
        );
        assert!(parse_expression_str("foo(x)").is_err());
    }

    #[test]
    fn test_unbalanced_brackets_rejected() {
        assert!(matches!(
            parse_expression_str("(x + y"),
            Err(ParseError::UnbalancedParens { .. })
        ));
        assert!(matches!(
            parse_expression_str("x + y)"),
            Err(ParseError::UnbalancedParens { .. })
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(parse_expression_str("   "), Err(ParseError::Empty));
        assert!(matches!(
            parse_expression_str("x +"),
            Err(ParseError::MissingOperand { .. })
        ));
    }

    #[test]
    fn test_function_head_without_call_rejected() {
        assert!(matches!(
            parse_expression_str("sin + x"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}x{}", "(".repeat(300), ")".repeat(300));
        assert!(matches!(
            parse_expression_str(&deep),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_dynamic_eval_characters_rejected() {
        assert!(matches!(
            parse_expression_str("x; y"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }
}
