use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_normalize::flatten_mul;

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Integrates with respect to a variable, trivial closed forms only.
    /// Returns the indefinite integral (without constant of integration).
    ///
    /// Covered: constants and expressions free of the variable, sums,
    /// products with a factor free of the variable, x^n (including n = -1),
    /// c/(a*x), f'/f, and exp/sin/cos of a linear argument. Anything else
    /// errs, and the caller reports the integrand instead of a closed form;
    /// general symbolic integration is deliberately out of scope here.
    ///
    /// The full rule set assumes the expression has been through
    /// `normalize()`, which is how the solver always calls it.
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        // ∫ c dx = c*x for anything that does not mention the variable
        if !self.contains_variable(var) {
            return Ok(self.clone() * Expr::Var(var.to_string()));
        }
        match self {
            // ∫ x dx = x²/2
            Expr::Var(_) => Ok(Expr::Pow(
                Box::new(Expr::Var(var.to_string())),
                Box::new(Expr::Const(2.0)),
            ) / Expr::Const(2.0)),

            // ∫ (f + g) dx = ∫ f dx + ∫ g dx
            Expr::Add(lhs, rhs) => {
                let lhs_int = lhs.integrate(var)?;
                let rhs_int = rhs.integrate(var)?;
                Ok(lhs_int + rhs_int)
            }

            // ∫ (f - g) dx = ∫ f dx - ∫ g dx
            Expr::Sub(lhs, rhs) => {
                let lhs_int = lhs.integrate(var)?;
                let rhs_int = rhs.integrate(var)?;
                Ok(lhs_int - rhs_int)
            }

            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),

            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),

            // ∫ x^n dx = x^(n+1)/(n+1) for n ≠ -1
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),

            // ∫ exp(a*x + b) dx = exp(a*x + b)/a
            Expr::Exp(inner) => match inner.diff(var).normalize() {
                Expr::Const(a) if a != 0.0 => {
                    Ok(Expr::Exp(inner.clone()) / Expr::Const(a))
                }
                _ => Err(format!("cannot integrate exp({}) with respect to {}", inner, var)),
            },

            // ∫ sin(a*x + b) dx = -cos(a*x + b)/a
            Expr::sin(inner) => match inner.diff(var).normalize() {
                Expr::Const(a) if a != 0.0 => Ok(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::cos(inner.clone())),
                ) / Expr::Const(a)),
                _ => Err(format!("cannot integrate sin({}) with respect to {}", inner, var)),
            },

            // ∫ cos(a*x + b) dx = sin(a*x + b)/a
            Expr::cos(inner) => match inner.diff(var).normalize() {
                Expr::Const(a) if a != 0.0 => {
                    Ok(Expr::sin(inner.clone()) / Expr::Const(a))
                }
                _ => Err(format!("cannot integrate cos({}) with respect to {}", inner, var)),
            },

            other => Err(format!(
                "cannot integrate {} with respect to {}",
                other, var
            )),
        }
    }

    fn integrate_multiplication(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        // factor out whatever does not depend on the variable
        if !lhs.contains_variable(var) {
            let rhs_int = rhs.integrate(var)?;
            return Ok(lhs.clone() * rhs_int);
        }
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.integrate(var)?;
            return Ok(rhs.clone() * lhs_int);
        }
        Err(format!("cannot integrate product {} * {}", lhs, rhs))
    }

    fn integrate_division(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        // denominator free of the variable: ∫ f/c dx = (∫ f dx)/c
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.integrate(var)?;
            return Ok(lhs_int / rhs.clone());
        }

        // ∫ f'(x)/f(x) dx = ln(f(x))
        if rhs.diff(var).equivalent(lhs) {
            return Ok(Expr::Ln(Box::new(rhs.clone())));
        }

        // constant-over-linear-monomial: ∫ c/(a*x) dx = (c/a)*ln(x)
        if !lhs.contains_variable(var) {
            let mut factors = Vec::new();
            flatten_mul(rhs, &mut factors);
            let (dependent, free): (Vec<Expr>, Vec<Expr>) = factors
                .into_iter()
                .partition(|f| f.contains_variable(var));
            let free_product = free
                .into_iter()
                .reduce(|a, b| Expr::Mul(Box::new(a), Box::new(b)))
                .unwrap_or(Expr::Const(1.0));
            if dependent == vec![Expr::Var(var.to_string())] {
                return Ok(
                    (lhs.clone() / free_product)
                        * Expr::Ln(Box::new(Expr::Var(var.to_string()))),
                );
            }
            // ∫ c/x^n dx = c * x^(1-n)/(1-n) for n ≠ 1
            if let [Expr::Pow(base, exp)] = dependent.as_slice() {
                if let (Expr::Var(name), Expr::Const(n)) = (base.as_ref(), exp.as_ref()) {
                    if name == var && (*n - 1.0).abs() > f64::EPSILON {
                        let new_exp = Expr::Const(1.0 - n);
                        let primitive = Expr::Pow(
                            Box::new(Expr::Var(var.to_string())),
                            Box::new(new_exp.clone()),
                        ) / new_exp;
                        return Ok((lhs.clone() / free_product) * primitive);
                    }
                }
            }
        }

        Err(format!("cannot integrate division {} / {}", lhs, rhs))
    }

    fn integrate_power(&self, base: &Expr, exp: &Expr, var: &str) -> Result<Expr, String> {
        if let (Expr::Var(name), Expr::Const(n)) = (base, exp) {
            if name == var {
                if (*n - (-1.0)).abs() < f64::EPSILON {
                    // ∫ x^(-1) dx = ln(x)
                    return Ok(Expr::Ln(Box::new(Expr::Var(var.to_string()))));
                }
                let new_exp = Expr::Const(n + 1.0);
                return Ok(Expr::Pow(
                    Box::new(Expr::Var(var.to_string())),
                    Box::new(new_exp.clone()),
                ) / new_exp);
            }
        }
        Err(format!("cannot integrate power ({})^({})", base, exp))
    }
}
