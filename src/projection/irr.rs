//! Internal Rate of Return (IRR) calculation
//!
//! Newton-Raphson driven as a bounded state machine. Every failure mode (flat
//! derivative, overflow/NaN, divergence out of the admissible range, iteration cap)
//! ends in a terminal state that reports "no rate" instead of a stale estimate.

use log::debug;

/// Default starting rate for the search
pub const DEFAULT_IRR_GUESS: f64 = 0.10;

/// Default cap on Newton steps
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default step size below which the iteration has converged
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Lowest admissible periodic rate
pub const MIN_RATE: f64 = -0.99;

/// Highest admissible periodic rate
pub const MAX_RATE: f64 = 10.0;

const MIN_DERIVATIVE: f64 = 1e-10;
const BISECTION_TOLERANCE: f64 = 1e-10;
const BISECTION_MAX_ITERATIONS: u32 = 1000;
const BRACKET_SCAN_STEP: f64 = 0.01;

/// Why a Newton run was abandoned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DivergenceReason {
    /// |f'(rate)| fell below the numerical floor
    FlatDerivative,
    /// NPV, its derivative or the next rate was NaN or infinite
    NonFinite,
    /// The next rate left [MIN_RATE, MAX_RATE]
    OutOfRange(f64),
}

/// State of a Newton-Raphson IRR search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverState {
    Iterating { rate: f64, iteration: u32 },
    Converged { rate: f64, iterations: u32 },
    Diverged { reason: DivergenceReason, iteration: u32 },
    Exhausted { last_rate: f64 },
}

impl SolverState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SolverState::Iterating { .. })
    }

    /// The rate found, if the search converged
    pub fn rate(&self) -> Option<f64> {
        match self {
            SolverState::Converged { rate, .. } => Some(*rate),
            _ => None,
        }
    }
}

/// Newton-Raphson IRR solver settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolver {
    pub initial_guess: f64,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_IRR_GUESS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl IrrSolver {
    pub fn with_guess(initial_guess: f64) -> Self {
        Self {
            initial_guess,
            ..Self::default()
        }
    }

    /// Starting state of a search
    pub fn start(&self) -> SolverState {
        SolverState::Iterating {
            rate: self.initial_guess,
            iteration: 0,
        }
    }

    /// Advance the search by one Newton step. Terminal states are returned unchanged.
    pub fn step(&self, cashflows: &[f64], state: SolverState) -> SolverState {
        let (rate, iteration) = match state {
            SolverState::Iterating { rate, iteration } => (rate, iteration),
            terminal => return terminal,
        };

        if iteration >= self.max_iterations {
            return SolverState::Exhausted { last_rate: rate };
        }

        let (npv, dnpv) = npv_and_derivative(cashflows, rate);
        if !npv.is_finite() || !dnpv.is_finite() {
            return SolverState::Diverged { reason: DivergenceReason::NonFinite, iteration };
        }
        if dnpv.abs() < MIN_DERIVATIVE {
            return SolverState::Diverged { reason: DivergenceReason::FlatDerivative, iteration };
        }

        let next = rate - npv / dnpv;
        if !next.is_finite() {
            return SolverState::Diverged { reason: DivergenceReason::NonFinite, iteration };
        }
        if (next - rate).abs() < self.tolerance {
            return SolverState::Converged { rate: next, iterations: iteration + 1 };
        }
        if !(MIN_RATE..=MAX_RATE).contains(&next) {
            return SolverState::Diverged { reason: DivergenceReason::OutOfRange(next), iteration };
        }

        SolverState::Iterating { rate: next, iteration: iteration + 1 }
    }

    /// Run Newton-Raphson until a terminal state
    pub fn run(&self, cashflows: &[f64]) -> SolverState {
        let mut state = self.start();
        while !state.is_terminal() {
            state = self.step(cashflows, state);
        }
        state
    }

    /// Periodic IRR from Newton-Raphson alone
    pub fn solve(&self, cashflows: &[f64]) -> Option<f64> {
        self.run(cashflows).rate()
    }

    /// Periodic IRR, falling back to bisection over the admissible range when Newton
    /// fails from the configured guess. The bisection midpoint seeds a final Newton
    /// polish.
    pub fn solve_robust(&self, cashflows: &[f64]) -> Option<f64> {
        let outcome = self.run(cashflows);
        if let Some(rate) = outcome.rate() {
            return Some(rate);
        }
        debug!("Newton IRR from guess {} ended in {:?}, trying bisection", self.initial_guess, outcome);

        let low = finite_lower_bound(cashflows)?;
        let bracketed = bisect(cashflows, low, MAX_RATE)?;
        let polish = IrrSolver {
            initial_guess: bracketed,
            ..*self
        };
        Some(polish.solve(cashflows).unwrap_or(bracketed))
    }
}

/// Periodic IRR of `cashflows` via Newton-Raphson from `initial_guess`
pub fn compute_irr(cashflows: &[f64], initial_guess: f64) -> Option<f64> {
    IrrSolver::with_guess(initial_guess).solve(cashflows)
}

/// Convert a periodic rate to an effective annual rate
pub fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// Net present value at a periodic rate, first flow undiscounted
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

/// Lowest rate on a grid from MIN_RATE at which the NPV is finite.
/// Near -100% the discount factor underflows on long vectors.
fn finite_lower_bound(cashflows: &[f64]) -> Option<f64> {
    let steps = ((MAX_RATE - MIN_RATE) / BRACKET_SCAN_STEP) as u32;
    (0..=steps)
        .map(|k| MIN_RATE + k as f64 * BRACKET_SCAN_STEP)
        .find(|&rate| npv_at_rate(cashflows, rate).is_finite())
}

/// Root of the NPV on [low, high], if NPV changes sign there
fn bisect(cashflows: &[f64], mut low: f64, mut high: f64) -> Option<f64> {
    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    if !npv_low.is_finite() || !npv_high.is_finite() {
        return None;
    }
    if npv_low == 0.0 {
        return Some(low);
    }
    if npv_low.signum() == npv_high.signum() {
        return None;
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid == 0.0 || (high - low) / 2.0 < BISECTION_TOLERANCE {
            return Some(mid);
        }

        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_payoff(invest: f64, payoff: f64, at: usize) -> Vec<f64> {
        let mut cashflows = vec![0.0; at + 1];
        cashflows[0] = -invest;
        cashflows[at] = payoff;
        cashflows
    }

    #[test]
    fn test_simple_irr() {
        // Investment of 1000, returns 1100 after 12 months
        let cashflows = single_payoff(1000.0, 1100.0, 12);
        let irr = compute_irr(&cashflows, DEFAULT_IRR_GUESS).unwrap();

        assert_abs_diff_eq!(irr, 1.1_f64.powf(1.0 / 12.0) - 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(npv_at_rate(&cashflows, irr), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(annualize(irr, 12), 0.10, epsilon = 1e-5);
    }

    #[test]
    fn test_same_total_returned_is_zero_rate() {
        let cashflows = single_payoff(1000.0, 1000.0, 24);
        let irr = compute_irr(&cashflows, DEFAULT_IRR_GUESS).unwrap();
        assert_abs_diff_eq!(irr, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(npv_at_rate(&cashflows, irr), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_level_cashflows() {
        // Loan of 10000, 12 monthly payments of 900
        let mut cashflows = vec![10000.0];
        cashflows.extend(vec![-900.0; 12]);

        let irr = compute_irr(&cashflows, DEFAULT_IRR_GUESS).unwrap();
        assert_abs_diff_eq!(npv_at_rate(&cashflows, irr), 0.0, epsilon = 1e-4);
        assert!(irr > 0.0 && irr < 0.05);
    }

    #[test]
    fn test_all_positive_flows_diverge() {
        let solver = IrrSolver::default();
        let state = solver.run(&[100.0, 100.0, 100.0]);
        assert!(matches!(
            state,
            SolverState::Diverged { reason: DivergenceReason::OutOfRange(_), .. }
        ));
        assert_eq!(state.rate(), None);
    }

    #[test]
    fn test_all_zero_flows_have_flat_derivative() {
        let state = IrrSolver::default().run(&[0.0; 24]);
        assert_eq!(
            state,
            SolverState::Diverged { reason: DivergenceReason::FlatDerivative, iteration: 0 }
        );
        assert_eq!(compute_irr(&[], DEFAULT_IRR_GUESS), None);
        assert_eq!(compute_irr(&[-100.0], DEFAULT_IRR_GUESS), None);
    }

    #[test]
    fn test_iteration_cap_reports_exhausted() {
        let solver = IrrSolver {
            max_iterations: 1,
            ..IrrSolver::default()
        };
        let state = solver.run(&single_payoff(1000.0, 1100.0, 12));
        assert!(matches!(state, SolverState::Exhausted { .. }));
        assert_eq!(state.rate(), None);
    }

    #[test]
    fn test_step_leaves_terminal_states_alone() {
        let solver = IrrSolver::default();
        let done = SolverState::Converged { rate: 0.01, iterations: 3 };
        assert_eq!(solver.step(&[-1.0, 2.0], done), done);
    }

    #[test]
    fn test_robust_recovers_when_newton_overshoots() {
        // Newton from 10% jumps below -99% on this shape
        let mut cashflows = vec![-100_000.0, -100_000.0, -100_000.0];
        cashflows.extend(vec![2_000.0; 33]);
        cashflows.push(250_000.0);

        let solver = IrrSolver::default();
        let rate = solver.solve_robust(&cashflows).unwrap();
        assert_abs_diff_eq!(npv_at_rate(&cashflows, rate), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_bracket_starts_where_npv_is_finite() {
        // 199 months of discounting overflows near -100%
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 198]);
        cashflows.push(1100.0);
        assert!(!npv_at_rate(&cashflows, MIN_RATE).is_finite());

        let low = finite_lower_bound(&cashflows).unwrap();
        assert_abs_diff_eq!(low, -0.97, epsilon = 1e-9);
        assert!(npv_at_rate(&cashflows, low).is_finite());

        // A guess in the non-finite region forces the bisection path
        let rate = IrrSolver::with_guess(-0.985).solve_robust(&cashflows).unwrap();
        assert_abs_diff_eq!(rate, 1.1_f64.powf(1.0 / 199.0) - 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_robust_gives_up_without_sign_change() {
        assert_eq!(IrrSolver::default().solve_robust(&[100.0, 100.0, 100.0]), None);
        assert_eq!(IrrSolver::default().solve_robust(&[-100.0, -100.0]), None);
    }
}
