//! examples of usage of the MathNexa solver core
/// Differential-equation solver walkthroughs
pub mod solver_examples;
