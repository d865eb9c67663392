//! Subscription plans and the generation quota attached to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// Generations a Free account may perform before it has to upgrade.
pub const FREE_GENERATION_LIMIT: i64 = 3;

/// Wire value for "no limit" in usage counters.
pub const UNLIMITED: i64 = -1;

/// Account tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    Free,
    PremiumMonthly,
    PremiumYearly,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::PremiumMonthly => "PREMIUM_MONTHLY",
            Plan::PremiumYearly => "PREMIUM_YEARLY",
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Plan::Free)
    }

    /// Generation limit as reported to clients (`-1` when unbounded)
    pub fn generation_limit(&self) -> i64 {
        if self.is_free() {
            FREE_GENERATION_LIMIT
        } else {
            UNLIMITED
        }
    }

    /// Remaining generations given the current usage counter
    pub fn remaining(&self, used: i64) -> i64 {
        if self.is_free() {
            (FREE_GENERATION_LIMIT - used).max(0)
        } else {
            UNLIMITED
        }
    }

    /// Free output is always watermarked
    pub fn requires_watermark(&self) -> bool {
        self.is_free()
    }

    /// Only the top tier may customize its watermark
    pub fn watermark_customizable(&self) -> bool {
        matches!(self, Plan::PremiumYearly)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = SharedError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FREE" => Ok(Plan::Free),
            "PREMIUM_MONTHLY" => Ok(Plan::PremiumMonthly),
            "PREMIUM_YEARLY" => Ok(Plan::PremiumYearly),
            other => Err(SharedError::validation("plan", format!("unknown plan: {}", other))),
        }
    }
}

impl TryFrom<String> for Plan {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
