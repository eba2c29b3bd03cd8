use crate::domain::aggregation::{compute_product, finite_or_zero};

/// One (weight, percent) pair. Non-finite components are stored as 0, the
/// same value the totals count them as.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Entry {
    pub weight: f64,
    pub percent: f64,
}

impl Entry {
    pub fn new(weight: f64, percent: f64) -> Self {
        Self {
            weight: finite_or_zero(weight),
            percent: finite_or_zero(percent),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.weight, self.percent)
    }

    pub fn product(&self) -> f64 {
        compute_product(self.weight, self.percent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub total_weight: f64,
    pub total_element: f64,
    pub ratio_percent: f64,
}
