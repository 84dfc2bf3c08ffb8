//! Convergence tests for numerical solvers
//!
//! These tests verify that the steppers and schemes exhibit the expected
//! convergence rates when refining the grid.

use nalgebra::DVector;
use numeric_rs::problem::PdeProblem;
use numeric_rs::solver::{DiffusionSolver, EulerSolver, PdeConfiguration, RK4Solver, SimpsonSolver, Stepper, linspace};
use numeric_rs::solver::{OdeSolver, Trajectory};

mod common;
use common::{ExponentialDecay, uniform_times};

fn final_errors<S: Stepper>(solver: &OdeSolver<S>, system: &ExponentialDecay, total_time: f64, steps_list: &[usize]) -> Vec<f64> {
    let exact = system.analytical_solution(total_time, 1.0);
    let y0 = DVector::from_vec(vec![1.0]);

    steps_list
        .iter()
        .map(|&steps| {
            let trajectory: Trajectory = solver.solve(system, &y0, &uniform_times(total_time, steps)).unwrap();
            (trajectory.final_state().unwrap()[0] - exact).abs()
        })
        .collect()
}

fn assert_ratios(name: &str, errors: &[f64], low: f64, high: f64) {
    for i in 0..errors.len() - 1 {
        let ratio = errors[i] / errors[i + 1];
        println!("{} convergence ratio {}->{}: {}", name, i, i + 1, ratio);

        assert!(
            ratio > low && ratio < high,
            "{}: convergence ratio {} outside ({}, {})",
            name, ratio, low, high
        );
    }
}

#[test]
fn test_euler_first_order_convergence() {
    // Euler: error ~ O(dt), halving dt halves the error
    let decay = ExponentialDecay::new(0.3);
    let errors = final_errors(&EulerSolver::default(), &decay, 10.0, &[100, 200, 400, 800]);

    assert_ratios("Euler", &errors, 1.8, 2.2);
}

#[test]
fn test_simpson_second_order_convergence() {
    let decay = ExponentialDecay::new(0.3);
    let errors = final_errors(&SimpsonSolver::default(), &decay, 5.0, &[20, 40, 80, 160]);

    assert_ratios("Simpson", &errors, 3.5, 4.5);
}

#[test]
fn test_rk4_fourth_order_convergence() {
    // RK4: error ~ O(dt^4), halving dt divides the error by 16
    let decay = ExponentialDecay::new(0.3);
    let errors = final_errors(&RK4Solver::default(), &decay, 5.0, &[10, 20, 40, 80]);

    assert_ratios("RK4", &errors, 12.0, 20.0);
}

#[test]
fn test_implicit_diffusion_error_decreases_with_refinement() {
    // u_t = u_xx, u(x, 0) = sin(x): u = exp(-t) sin(x)
    let total_time = 0.5;
    let mut errors = Vec::new();

    for &points in &[11, 21, 41] {
        let problem = PdeProblem::diffusion(|x: f64| x.sin(), |_t: f64| 0.0, |_t: f64| 0.0);
        let solver = DiffusionSolver::with_config(problem, PdeConfiguration::new()).unwrap();

        let x = linspace(0.0, std::f64::consts::PI, points);
        let t = linspace(0.0, total_time, points);
        // tau ~ h is only stable for σ = 1
        let solution = solver.solve(&t, &x, 1.0).unwrap();

        let error = x
            .iter()
            .zip(solution.final_row().iter())
            .map(|(xj, u)| (u - (-total_time).exp() * xj.sin()).abs())
            .fold(0.0, f64::max);
        errors.push(error);
    }

    for pair in errors.windows(2) {
        assert!(pair[1] < pair[0], "diffusion error did not decrease: {:?}", errors);
    }
}
