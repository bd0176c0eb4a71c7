use crate::solver::integrating_factor::IntegratingFactor;
use crate::solver::solve::Solution;
use crate::solver::solver_error::SolverError;
use crate::symbolic::parse_expr::UnaryFunc;
use itertools::Itertools;
use tabled::{Table, Tabled};

/// One (title, content) record of a rendered solution. Purely presentational.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionStep {
    pub title: String,
    pub content: String,
}

/// Ordered sequence of solution steps plus the final solution line, rebuilt
/// from scratch on every solve request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolutionSteps {
    steps: Vec<SolutionStep>,
    pub final_solution: Option<String>,
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Step")]
    title: String,
    #[tabled(rename = "Details")]
    content: String,
}

impl SolutionSteps {
    pub fn push(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.steps.push(SolutionStep {
            title: title.into(),
            content: content.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &SolutionStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// true when the steps describe a failed solve
    pub fn is_error(&self) -> bool {
        self.steps.first().map(|s| s.title == "Error").unwrap_or(false)
    }

    /// Plain-text table rendering for console output.
    pub fn to_text(&self) -> String {
        let rows = self.steps.iter().enumerate().map(|(i, step)| StepRow {
            number: i + 1,
            title: step.title.clone(),
            content: step.content.clone(),
        });
        let table = Table::new(rows).to_string();
        match &self.final_solution {
            Some(line) => format!("{}\nSolution: {}", table, line),
            None => table,
        }
    }
}

/// Renders a completed solve into the fixed step template:
/// restate the equation, show both partials and the exactness verdict, report
/// the integrating-factor search for inexact equations, walk the
/// potential-function construction, and state the final solution.
pub fn render(solution: &Solution) -> SolutionSteps {
    let mut steps = SolutionSteps::default();

    steps.push("Original Equation", solution.input.display_form());

    let verdict = if solution.exactness.is_exact {
        "The equation is exact."
    } else {
        "The equation is not exact."
    };
    steps.push(
        "Check Exactness",
        format!(
            "∂M/∂y = {}\n∂N/∂x = {}\n{}",
            solution.exactness.dm_dy.pretty(),
            solution.exactness.dn_dx.pretty(),
            verdict
        ),
    );

    if let Some(factor) = &solution.factor {
        steps.push("Find Integrating Factor", describe_factor(factor));
    }

    let scaled_note = if solution.factor.is_some() {
        " (after multiplying the equation by μ)"
    } else {
        ""
    };
    match &solution.potential {
        Some(p) => {
            let lines = vec![
                format!("ψ = ∫ M dx = {} + g(y)", p.psi0.pretty()),
                format!(
                    "Differentiating with respect to y and comparing with N: g'(y) = {}",
                    p.g_prime.pretty()
                ),
                format!("Integrating g'(y): g(y) = {}", p.g_of_y.pretty()),
                format!("ψ(x, y) = {}", p.psi.pretty()),
            ];
            steps.push(
                "Construct Potential Function",
                format!("{}{}", lines.iter().join("\n"), scaled_note),
            );
        }
        None => {
            let lines = [
                "Find ψ(x, y) with ∂ψ/∂x = M and ∂ψ/∂y = N:",
                "1. Integrate M with respect to x: ψ = ∫ M dx + g(y)",
                "2. Differentiate the result with respect to y",
                "3. Compare with N to find g'(y)",
                "4. Integrate g'(y) to find g(y)",
                "The antiderivatives here are beyond the closed forms this solver computes, so the construction is left symbolic.",
            ];
            steps.push(
                "Construct Potential Function",
                format!("{}{}", lines.iter().join("\n"), scaled_note),
            );
        }
    }

    match &solution.potential {
        Some(p) => {
            let line = format!("{} = C", p.psi.pretty());
            steps.push(
                "Final Solution",
                format!("{}\nwhere C is the constant of integration.", line),
            );
            steps.final_solution = Some(line);
        }
        None => {
            steps.push(
                "Final Solution",
                "ψ(x, y) = C, where C is the constant of integration.",
            );
        }
    }

    steps
}

fn describe_factor(factor: &IntegratingFactor) -> String {
    match factor {
        IntegratingFactor::FunctionOfX {
            integrand,
            closed_form,
        } => {
            let mut lines = vec![
                format!(
                    "(∂M/∂y - ∂N/∂x)/N = {} depends on x alone.",
                    integrand.pretty()
                ),
                format!("μ(x) = exp(∫ {} dx)", integrand.pretty()),
            ];
            if let Some(mu) = closed_form {
                lines.push(format!("μ(x) = {}", mu.pretty()));
            }
            lines.iter().join("\n")
        }
        IntegratingFactor::FunctionOfY {
            integrand,
            closed_form,
        } => {
            let mut lines = vec![
                format!(
                    "(∂N/∂x - ∂M/∂y)/M = {} depends on y alone.",
                    integrand.pretty()
                ),
                format!("μ(y) = exp(∫ {} dy)", integrand.pretty()),
            ];
            if let Some(mu) = closed_form {
                lines.push(format!("μ(y) = {}", mu.pretty()));
            }
            lines.iter().join("\n")
        }
        IntegratingFactor::NotFound => {
            "Neither (∂M/∂y - ∂N/∂x)/N nor (∂N/∂x - ∂M/∂y)/M is a function of a single variable."
                .to_string()
        }
    }
}

/// Renders a failed solve as a single error step describing the expected
/// input form. The solver stays usable for the next attempt.
pub fn render_error(err: &SolverError) -> SolutionSteps {
    let mut steps = SolutionSteps::default();
    steps.push(
        "Error",
        format!(
            "{}\nEnter the equation as M(x, y) dx + N(x, y) dy = 0, where M and N use the variables x and y, the operators + - * / ^, parentheses, and the functions {}.",
            err,
            UnaryFunc::known_names()
        ),
    );
    steps
}
