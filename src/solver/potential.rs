use crate::symbolic::symbolic_engine::Expr;
use log::debug;

/// A potential function psi(x, y) with psi_x = M and psi_y = N, together with
/// the pieces of its construction that the step renderer narrates.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialFunction {
    /// psi(x, y); the solution is psi(x, y) = C
    pub psi: Expr,
    /// psi_0 = integral of M dx, before the g(y) correction
    pub psi0: Expr,
    /// g'(y) = N - d(psi_0)/dy
    pub g_prime: Expr,
    /// g(y) = integral of g'(y) dy
    pub g_of_y: Expr,
}

/// Constructs the potential function for an exact equation:
///
/// 1. psi_0 = integral of M dx (treating y as a constant)
/// 2. g'(y) = N - d(psi_0)/dy
/// 3. g(y)  = integral of g'(y) dy
/// 4. psi   = psi_0 + g(y)
///
/// Only the trivial integrator backs steps 1 and 3, so this fails (with an
/// internal reason string) on integrands beyond its scope; the renderer then
/// narrates the procedure instead of presenting a closed form. A g'(y) that
/// still depends on x means M and N are not consistent partials of one psi,
/// which also aborts the construction.
pub fn potential_function(m: &Expr, n: &Expr) -> Result<PotentialFunction, String> {
    let psi0 = m.normalize().integrate("x")?.normalize();
    let dpsi0_dy = psi0.diff("y").normalize();
    let g_prime = Expr::Sub(Box::new(n.clone()), Box::new(dpsi0_dy)).normalize();
    if g_prime.contains_variable("x") {
        return Err(format!(
            "g'(y) = {} still depends on x; M and N are not the partials of one potential",
            g_prime
        ));
    }
    let g_of_y = g_prime.integrate("y")?.normalize();
    let psi = Expr::Add(Box::new(psi0.clone()), Box::new(g_of_y.clone())).normalize();
    debug!(
        "potential construction: psi0 = {}, g' = {}, g = {}, psi = {}",
        psi0, g_prime, g_of_y, psi
    );
    Ok(PotentialFunction {
        psi,
        psi0,
        g_prime,
        g_of_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_potential_for_2xy_x2() {
        // M = 2xy, N = x^2  ->  psi = x^2*y
        let p = potential_function(&parse("2xy"), &parse("x^2")).unwrap();
        assert!(p.psi.equivalent(&parse("x^2*y")));
        assert!(p.g_of_y.is_zero());
    }

    #[test]
    fn test_potential_with_g_of_y() {
        // M = 3x^2 + y, N = x - 2y  ->  psi = x^3 + x*y - y^2
        let p = potential_function(&parse("3x^2 + y"), &parse("x - 2y")).unwrap();
        assert!(p.psi.equivalent(&parse("x^3 + x*y - y^2")));
        assert!(p.g_prime.equivalent(&parse("-2y")));
        assert!(p.g_of_y.equivalent(&parse("-y^2")));
    }

    #[test]
    fn test_inconsistent_partials_rejected() {
        // y dx + 2x dy is not exact; g'(y) keeps an x dependence
        assert!(potential_function(&parse("y"), &parse("2x")).is_err());
    }

    #[test]
    fn test_out_of_scope_integrand_reported() {
        assert!(potential_function(&parse("ln(x)"), &parse("y")).is_err());
    }
}
