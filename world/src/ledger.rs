//! Resource ledger gating cell placement.

use rail_defence_core::Event;
use tracing::{debug, warn};

/// Failure raised when a spend exceeds the available balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum LedgerError {
    #[error("not enough resources: need {required}, have {available}")]
    Insufficient { required: u32, available: u32 },
}

/// Non-negative currency balance.
///
/// Every successful spend or credit pushes exactly one
/// [`Event::ResourcesChanged`] carrying the new total.
#[derive(Clone, Debug)]
pub(crate) struct ResourceLedger {
    balance: u32,
    cost_per_cell: u32,
}

impl ResourceLedger {
    pub(crate) const fn new(balance: u32, cost_per_cell: u32) -> Self {
        Self {
            balance,
            cost_per_cell,
        }
    }

    pub(crate) const fn balance(&self) -> u32 {
        self.balance
    }

    pub(crate) const fn cost_per_cell(&self) -> u32 {
        self.cost_per_cell
    }

    pub(crate) const fn can_afford(&self, cost: u32) -> bool {
        self.balance >= cost
    }

    /// Deducts `cost`, leaving the balance untouched on failure.
    pub(crate) fn spend(&mut self, cost: u32, out_events: &mut Vec<Event>) -> Result<u32, LedgerError> {
        if !self.can_afford(cost) {
            warn!(need = cost, have = self.balance, "not enough resources");
            return Err(LedgerError::Insufficient {
                required: cost,
                available: self.balance,
            });
        }

        self.balance -= cost;
        debug!(spent = cost, remaining = self.balance, "resources spent");
        out_events.push(Event::ResourcesChanged {
            balance: self.balance,
        });
        Ok(self.balance)
    }

    pub(crate) fn credit(&mut self, amount: u32, out_events: &mut Vec<Event>) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        debug!(gained = amount, total = self.balance, "resources credited");
        out_events.push(Event::ResourcesChanged {
            balance: self.balance,
        });
        self.balance
    }
}
