//! Economy ledger: gold and debt
//!
//! Gold is earned from pickups and loans; debt only shrinks through
//! repayment. Neither value ever drops below zero.

use serde::{Deserialize, Serialize};

/// Loan products offered by the loan shark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanOffer {
    /// +500 gold at a 10% fee
    Simple,
    /// +1000 gold at a 25% fee, grants a run-scoped damage bonus
    Gear,
    /// +2000 gold at a 50% fee, detonates on the player and slows them
    Cursed,
}

impl LoanOffer {
    pub fn principal(&self) -> f64 {
        match self {
            LoanOffer::Simple => 500.0,
            LoanOffer::Gear => 1000.0,
            LoanOffer::Cursed => 2000.0,
        }
    }

    /// Fixed fee rate added to the debt
    pub fn rate(&self) -> f64 {
        match self {
            LoanOffer::Simple => 0.10,
            LoanOffer::Gear => 0.25,
            LoanOffer::Cursed => 0.50,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoanOffer::Simple => "Simple Loan",
            LoanOffer::Gear => "Gear Loan",
            LoanOffer::Cursed => "Cursed Loan",
        }
    }
}

/// Gold/debt pair (persisted across runs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyLedger {
    pub debt: f64,
    pub gold: f64,
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self::new(10_000.0)
    }
}

impl EconomyLedger {
    /// Fresh ledger with a starting debt and no gold
    pub fn new(debt: f64) -> Self {
        Self {
            debt: sanitize(debt),
            gold: 0.0,
        }
    }

    /// Borrow `amount` with no fee
    pub fn take_loan(&mut self, amount: f64) {
        self.take_loan_at(amount, 0.0);
    }

    /// Borrow `amount`; the debt grows by the principal plus a rounded fee
    pub fn take_loan_at(&mut self, amount: f64, rate: f64) {
        if !(amount > 0.0) || !amount.is_finite() {
            return;
        }
        let fee = (amount * rate.max(0.0)).round();
        self.debt += amount + fee;
        self.gold += amount;
    }

    /// Take one of the named loan products
    pub fn take_offer(&mut self, offer: LoanOffer) {
        self.take_loan_at(offer.principal(), offer.rate());
    }

    /// Add earned gold
    pub fn collect(&mut self, amount: f64) {
        if amount > 0.0 && amount.is_finite() {
            self.gold += amount;
        }
    }

    /// Transfer `min(amount, gold, debt)` from gold to debt reduction.
    ///
    /// Returns the amount actually repaid.
    pub fn repay(&mut self, amount: f64) -> f64 {
        if !(amount > 0.0) {
            return 0.0;
        }
        let pay = amount.min(self.gold).min(self.debt).max(0.0);
        self.gold -= pay;
        self.debt -= pay;
        pay
    }

    /// Apply all gold to the debt (end of run)
    pub fn repay_all(&mut self) -> f64 {
        self.repay(self.gold)
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_take_loan_scenario() {
        let mut ledger = EconomyLedger::new(1000.0);
        ledger.take_loan(500.0);
        assert_eq!(ledger.debt, 1500.0);
        assert_eq!(ledger.gold, 500.0);
    }

    #[test]
    fn test_loan_offer_adds_fee_to_debt_only() {
        let mut ledger = EconomyLedger::new(0.0);
        ledger.take_offer(LoanOffer::Simple);
        assert_eq!(ledger.gold, 500.0);
        assert_eq!(ledger.debt, 550.0);
        ledger.take_offer(LoanOffer::Cursed);
        assert_eq!(ledger.gold, 2500.0);
        assert_eq!(ledger.debt, 550.0 + 3000.0);
    }

    #[test]
    fn test_repay_limited_by_gold() {
        let mut ledger = EconomyLedger::new(100.0);
        ledger.collect(30.0);
        let paid = ledger.repay(50.0);
        assert_eq!(paid, 30.0);
        assert_eq!(ledger.gold, 0.0);
        assert_eq!(ledger.debt, 70.0);
    }

    #[test]
    fn test_repay_noop_cases() {
        let mut ledger = EconomyLedger::new(100.0);
        ledger.repay(10.0);
        assert_eq!(ledger.debt, 100.0);
        ledger.collect(5.0);
        ledger.repay(0.0);
        assert_eq!(ledger.gold, 5.0);
        assert_eq!(ledger.debt, 100.0);
    }

    #[test]
    fn test_negative_loan_ignored() {
        let mut ledger = EconomyLedger::new(10.0);
        ledger.take_loan(-50.0);
        ledger.take_loan(f64::NAN);
        assert_eq!(ledger, EconomyLedger::new(10.0));
    }

    proptest! {
        #[test]
        fn prop_repay_transfers_min(
            amount in 0.0f64..10_000.0,
            gold in 0.0f64..10_000.0,
            debt in 0.0f64..10_000.0,
        ) {
            let mut ledger = EconomyLedger { debt, gold };
            let expected = amount.min(gold).min(debt);
            ledger.repay(amount);
            prop_assert!((ledger.gold - (gold - expected)).abs() < 1e-9);
            prop_assert!((ledger.debt - (debt - expected)).abs() < 1e-9);
            prop_assert!(ledger.gold >= 0.0);
            prop_assert!(ledger.debt >= 0.0);
        }
    }
}
