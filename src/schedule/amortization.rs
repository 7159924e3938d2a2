//! SAC (constant amortization) schedules for the financed part of each sale

use serde::{Deserialize, Serialize};

/// One SAC installment split into principal and interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SacInstallment {
    /// Balance outstanding before this installment
    pub opening_balance: f64,
    /// Fixed principal portion (principal / N)
    pub amortization: f64,
    /// Interest on the opening balance
    pub interest: f64,
}

impl SacInstallment {
    /// Total amount paid in the period
    pub fn amount(&self) -> f64 {
        self.amortization + self.interest
    }

    /// Balance left after this installment is paid
    pub fn closing_balance(&self) -> f64 {
        self.opening_balance - self.amortization
    }
}

/// Build the detailed SAC schedule for `principal` over `num_installments` periods.
///
/// The balance drops by the fixed amortization each period, not by the installment,
/// so installments decrease whenever `periodic_rate > 0`. Returns an empty schedule
/// for zero installments; callers validate the count beforehand.
pub fn sac_schedule(principal: f64, num_installments: usize, periodic_rate: f64) -> Vec<SacInstallment> {
    if num_installments == 0 {
        return Vec::new();
    }

    let amortization = principal / num_installments as f64;
    let mut balance = principal;
    let mut schedule = Vec::with_capacity(num_installments);

    for _ in 0..num_installments {
        schedule.push(SacInstallment {
            opening_balance: balance,
            amortization,
            interest: balance * periodic_rate,
        });
        balance -= amortization;
    }

    schedule
}

/// Installment amounts of a SAC schedule, in payment order
pub fn generate_amortization(principal: f64, num_installments: usize, periodic_rate: f64) -> Vec<f64> {
    sac_schedule(principal, num_installments, periodic_rate)
        .iter()
        .map(SacInstallment::amount)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_schedule_length_matches_installments() {
        for n in [1, 2, 12, 35, 48] {
            assert_eq!(generate_amortization(60_000.0, n, 0.005).len(), n);
        }
    }

    #[test]
    fn test_amortization_sums_to_principal() {
        let schedule = sac_schedule(21_000.0, 35, 0.005);
        let principal: f64 = schedule.iter().map(|i| i.amortization).sum();
        assert_abs_diff_eq!(principal, 21_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(schedule.last().unwrap().closing_balance(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_installments_decrease_with_positive_rate() {
        let amounts = generate_amortization(100_000.0, 24, 0.01);
        for pair in amounts.windows(2) {
            assert!(pair[1] <= pair[0], "{} should not exceed {}", pair[1], pair[0]);
        }
        // First installment: 100000/24 + 100000 * 1%
        assert_abs_diff_eq!(amounts[0], 100_000.0 / 24.0 + 1_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rate_is_flat() {
        let amounts = generate_amortization(1_200.0, 12, 0.0);
        assert!(amounts.iter().all(|&a| (a - 100.0).abs() < 1e-12));
    }

    #[test]
    fn test_single_installment_pays_everything() {
        let amounts = generate_amortization(5_000.0, 1, 0.02);
        assert_eq!(amounts.len(), 1);
        assert_abs_diff_eq!(amounts[0], 5_100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_installments_is_empty() {
        assert!(generate_amortization(1_000.0, 0, 0.01).is_empty());
    }
}
