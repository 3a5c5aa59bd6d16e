//! Land selection and derived deposit.
//!
//! Deposit is 0.5% of the summed prices of selected lands, rounded to two
//! decimals. It is recomputed synchronously on every toggle and overwrites
//! whatever value was there before, including a hand-edited one; that
//! matches the dashboard's observed behavior.

use serde::{Deserialize, Serialize};

/// Deposit fraction of total worth.
pub const DEPOSIT_RATE: f64 = 0.005;

/// A land item offered for attachment, with its listed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandItem {
    pub id: String,
    pub price: f64,
}

impl LandItem {
    pub fn new(id: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            price,
        }
    }
}

/// Selected lands plus the derived deposit.
#[derive(Debug, Clone, Default)]
pub struct LandBasket {
    catalog: Vec<LandItem>,
    selected: Vec<String>,
    deposit: f64,
}

impl LandBasket {
    pub fn new(catalog: Vec<LandItem>) -> Self {
        Self {
            catalog,
            selected: Vec::new(),
            deposit: 0.0,
        }
    }

    /// Toggle a land in or out of the selection. Unknown ids are ignored.
    pub fn toggle(&mut self, land_id: &str) {
        if !self.catalog.iter().any(|item| item.id == land_id) {
            return;
        }
        if let Some(position) = self.selected.iter().position(|id| id == land_id) {
            self.selected.remove(position);
        } else {
            self.selected.push(land_id.to_string());
        }
        self.recompute();
    }

    /// Manually set the deposit. The next toggle overwrites it.
    pub fn set_deposit(&mut self, value: f64) {
        self.deposit = round_two(value);
    }

    /// Sum of the selected lands' prices.
    pub fn total_worth(&self) -> f64 {
        self.catalog
            .iter()
            .filter(|item| self.selected.iter().any(|id| id == &item.id))
            .map(|item| item.price)
            .sum()
    }

    pub fn deposit(&self) -> f64 {
        self.deposit
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    fn recompute(&mut self) {
        self.deposit = round_two(self.total_worth() * DEPOSIT_RATE);
    }
}

/// Round to two decimal places.
pub fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
