//! Per-period flow components accumulated while sales are booked

use log::debug;

/// Component flows of a projection, one slot per month (0-indexed)
///
/// Sales are booked additively; slots never shrink. Amounts that would land past the
/// horizon are dropped and tallied in `truncated`.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Fraction of the contract value sold in each month
    pub sold_fraction: Vec<f64>,

    /// Contract value sold in each month
    pub sales_value: Vec<f64>,

    /// Down payments received
    pub entry: Vec<f64>,

    /// SAC installments received, summed across sales
    pub installments: Vec<f64>,

    /// Key-delivery payments received
    pub delivery: Vec<f64>,

    /// Investor's land payments (negative)
    pub land_payment: Vec<f64>,

    /// Receivables that fell beyond the horizon
    pub truncated: f64,
}

impl ProjectionState {
    pub fn new(horizon: usize) -> Self {
        Self {
            sold_fraction: vec![0.0; horizon],
            sales_value: vec![0.0; horizon],
            entry: vec![0.0; horizon],
            installments: vec![0.0; horizon],
            delivery: vec![0.0; horizon],
            land_payment: vec![0.0; horizon],
            truncated: 0.0,
        }
    }

    pub fn horizon(&self) -> usize {
        self.entry.len()
    }

    /// Record a sale of `fraction` worth `value` in month `index`
    pub fn record_sale(&mut self, index: usize, fraction: f64, value: f64) {
        self.sold_fraction[index] += fraction;
        self.sales_value[index] += value;
    }

    pub fn book_entry(&mut self, index: usize, amount: f64) {
        self.entry[index] += amount;
    }

    /// Superimpose a SAC schedule for a sale made in month `sale_index`.
    /// Installment `i` lands `i + 1` months after the sale.
    pub fn book_installments(&mut self, sale_index: usize, schedule: &[f64]) {
        let horizon = self.horizon();
        for (i, &amount) in schedule.iter().enumerate() {
            let target = sale_index + i + 1;
            if target < horizon {
                self.installments[target] += amount;
            } else {
                self.truncated += amount;
            }
        }
    }

    /// Book a key-delivery payment in `delivery_period` (1-indexed)
    pub fn book_delivery(&mut self, delivery_period: usize, amount: f64) {
        let horizon = self.horizon();
        match delivery_period.checked_sub(1).filter(|&idx| idx < horizon) {
            Some(idx) => self.delivery[idx] += amount,
            None => self.truncated += amount,
        }
    }

    /// Spread the land cost over the first `count` months as equal outflows
    pub fn book_land_payments(&mut self, land_cost: f64, count: usize) {
        if count == 0 {
            return;
        }
        let payment = land_cost / count as f64;
        for slot in self.land_payment.iter_mut().take(count) {
            *slot -= payment;
        }
        debug!("Land payments: {} x {:.2}", count.min(self.horizon()), payment);
    }

    /// Investor's net flow for month `index`
    pub fn net_flow(&self, index: usize) -> f64 {
        self.land_payment[index] + self.entry[index] + self.installments[index] + self.delivery[index]
    }

    /// Elementwise sum of all components
    pub fn investor_flows(&self) -> Vec<f64> {
        (0..self.horizon()).map(|i| self.net_flow(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_installments_superimpose() {
        let mut state = ProjectionState::new(6);
        state.book_installments(0, &[10.0, 10.0, 10.0]);
        state.book_installments(1, &[5.0, 5.0]);

        assert_eq!(state.installments, vec![0.0, 10.0, 15.0, 15.0, 0.0, 0.0]);
        assert_eq!(state.truncated, 0.0);
    }

    #[test]
    fn test_installments_past_horizon_are_truncated() {
        let mut state = ProjectionState::new(4);
        state.book_installments(2, &[7.0, 8.0, 9.0]);

        assert_eq!(state.installments, vec![0.0, 0.0, 0.0, 7.0]);
        assert_abs_diff_eq!(state.truncated, 17.0);
    }

    #[test]
    fn test_delivery_past_horizon_is_truncated() {
        let mut state = ProjectionState::new(12);
        state.book_delivery(12, 100.0);
        state.book_delivery(13, 50.0);

        assert_eq!(state.delivery[11], 100.0);
        assert_abs_diff_eq!(state.truncated, 50.0);
    }

    #[test]
    fn test_land_payments_and_net_flow() {
        let mut state = ProjectionState::new(5);
        state.book_land_payments(300.0, 3);
        state.book_entry(0, 40.0);

        assert_eq!(state.land_payment, vec![-100.0, -100.0, -100.0, 0.0, 0.0]);
        assert_eq!(state.investor_flows(), vec![-60.0, -100.0, -100.0, 0.0, 0.0]);
    }
}
