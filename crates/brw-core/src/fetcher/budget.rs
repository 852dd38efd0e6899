/// Default number of redirects one load may follow.
pub const MAX_REDIRECTS: u32 = 20;

/// Countdown of redirects left for one top-level load. Never goes below 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectBudget {
    limit: u32,
    remaining: u32,
}

impl Default for RedirectBudget {
    fn default() -> Self {
        Self::new(MAX_REDIRECTS)
    }
}

impl RedirectBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Spend one redirect. Returns false, leaving the budget at zero, when
    /// nothing is left.
    pub fn consume(&mut self) -> bool {
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn used(&self) -> u32 {
        self.limit - self.remaining
    }
}
