//MIT License
#![allow(non_snake_case)]

use crate::Utils::logger::init_console_logger;
use crate::solver::equation::EquationInput;
use crate::solver::equation_cache::EquationCache;
use crate::solver::exactness::classify;
use crate::solver::integrating_factor::find_factor;
use crate::solver::solve::{solve_to_steps, solve_with_cache};
use crate::symbolic::symbolic_engine::Expr;
use log::LevelFilter;

#[allow(dead_code)]
pub fn solver_examples(example: usize) {
    match example {
        0 => {
            // CLASSIC EXACT EQUATION
            // 2xy dx + x^2 dy = 0; the partials agree so the equation is exact
            // and the potential function comes out as x^2*y = C
            init_console_logger(LevelFilter::Info);
            let steps = solve_to_steps("2xy", "x^2");
            println!("{}", steps.to_text());
        }
        1 => {
            // INEXACT EQUATION WITH mu(x)
            // y dx + 2x dy = 0 is not exact; (dM/dy - dN/dx)/N = -1/(2x)
            // depends on x alone, so mu(x) = exp(int -1/(2x) dx) = x^(-1/2)
            init_console_logger(LevelFilter::Debug);
            let eq = EquationInput::from_strings("y", "2x").unwrap();
            let exactness = classify(&eq);
            println!(
                "dM/dy = {}, dN/dx = {}, exact: {}",
                exactness.dm_dy, exactness.dn_dx, exactness.is_exact
            );
            let factor = find_factor(&eq, &exactness).unwrap();
            println!("integrating factor: {:?}", factor);
            let steps = solve_to_steps("y", "2x");
            println!("{}", steps.to_text());
        }
        2 => {
            // SYMBOLIC TOUR
            // parse a string into an expression tree, differentiate it with
            // respect to each variable, normalize and evaluate it
            let input = "2xy + sin(x^2) - exp(2x)/x";
            let parsed_expression = Expr::parse_expression(input).unwrap();
            println!(" parsed_expression {}", parsed_expression);
            println!(" pretty form {}", parsed_expression.pretty());
            let df_dx = parsed_expression.diff("x");
            let df_dy = parsed_expression.diff("y");
            println!("df_dx = {}, df_dy = {}", df_dx.pretty(), df_dy.pretty());
            let normalized = parsed_expression.normalize();
            println!("normalized: {}", normalized.pretty());
            let value = parsed_expression.eval_expression(vec!["x", "y"], &[1.0, 2.0]);
            println!("value at (1, 2) = {}", value);
        }
        3 => {
            // LAST-EQUATION CACHE
            // a successful solve remembers the raw input pair; the next session
            // reads it back to prefill the input fields
            let cache = EquationCache::at_default_location();
            let steps = solve_with_cache("3x^2+y", "x-2y", &cache);
            println!("{}", steps.to_text());
            if let Some((m, n)) = cache.load() {
                println!("restored last equation: M = {}, N = {}", m, n);
            }
        }
        4 => {
            // THE TUTOR PAGE EXAMPLE SET
            let examples = [
                ("2xy", "x^2"),
                ("y", "2x"),
                ("3x^2+y", "x-2y"),
                ("y^2", "2xy"),
                ("x+y", "x-y"),
                ("2y", "3x^2"),
            ];
            for (m, n) in examples {
                println!("\nM = {}, N = {}", m, n);
                println!("{}", solve_to_steps(m, n).to_text());
            }
        }
        _ => println!("no example with number {}", example),
    }
}
