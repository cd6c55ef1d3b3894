//! Payment progress of a client's contract

use super::money::Money;

/// How much of a contract has been paid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentProgress {
    /// Paid share of the contract, 0 to 100
    pub percent: u8,
    /// Amount still owed, never negative
    pub remaining: Money,
    pub paid: Money,
}

impl PaymentProgress {
    /// Compute progress from the contract amount and the total paid so far
    pub fn compute(contract: Money, paid: Money) -> Self {
        let percent = if contract.is_positive() {
            (paid.minor().max(0) as i128 * 100 / contract.minor() as i128).min(100) as u8
        } else {
            0
        };

        Self {
            percent,
            remaining: (contract - paid).max(Money::zero()),
            paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payment() {
        let progress = PaymentProgress::compute(Money::from_units(1000), Money::from_units(250));
        assert_eq!(progress.percent, 25);
        assert_eq!(progress.remaining, Money::from_units(750));
    }

    #[test]
    fn test_overpayment_is_clamped() {
        let progress = PaymentProgress::compute(Money::from_units(1000), Money::from_units(1500));
        assert_eq!(progress.percent, 100);
        assert!(progress.remaining.is_zero());
    }

    #[test]
    fn test_percent_rounds_down() {
        let progress = PaymentProgress::compute(Money::from_units(3), Money::from_units(2));
        assert_eq!(progress.percent, 66);
    }

    #[test]
    fn test_zero_contract() {
        let progress = PaymentProgress::compute(Money::zero(), Money::zero());
        assert_eq!(progress.percent, 0);
        assert!(progress.remaining.is_zero());
    }
}
