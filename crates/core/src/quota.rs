//! Plan tiers and per-tier quota limits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing plan tier a parent record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }
}

impl FromStr for PlanTier {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            other => Err(crate::Error::UnknownPlanTier(other.to_string())),
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tier ceilings on asset count and per-asset byte size.
///
/// `max_bytes` is measured against the *transformed* (canonical) bytes,
/// not the raw upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    /// Maximum number of assets a parent may own.
    pub max_assets: u32,
    /// Maximum byte size of a single transformed asset.
    pub max_bytes: u64,
}

/// Static quota table mapping plan tiers to their limits.
///
/// Exposed read-only to the billing/upgrade UI; never mutated at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaTable {
    #[serde(default = "default_free_quota")]
    pub free: QuotaPolicy,
    #[serde(default = "default_pro_quota")]
    pub pro: QuotaPolicy,
}

fn default_free_quota() -> QuotaPolicy {
    QuotaPolicy {
        max_assets: 5,
        max_bytes: 2 * 1024 * 1024,
    }
}

fn default_pro_quota() -> QuotaPolicy {
    QuotaPolicy {
        max_assets: 10,
        max_bytes: 8 * 1024 * 1024,
    }
}

impl Default for QuotaTable {
    fn default() -> Self {
        Self {
            free: default_free_quota(),
            pro: default_pro_quota(),
        }
    }
}

impl QuotaTable {
    /// Look up the policy for a tier.
    pub fn policy(&self, tier: PlanTier) -> QuotaPolicy {
        match tier {
            PlanTier::Free => self.free,
            PlanTier::Pro => self.pro,
        }
    }

    /// Validate that the table is internally sane.
    pub fn validate(&self) -> crate::Result<()> {
        for (name, policy) in [("free", self.free), ("pro", self.pro)] {
            if policy.max_assets == 0 {
                return Err(crate::Error::Config(format!(
                    "quota tier '{name}': max_assets must be at least 1"
                )));
            }
            if policy.max_bytes == 0 {
                return Err(crate::Error::Config(format!(
                    "quota tier '{name}': max_bytes must be at least 1"
                )));
            }
        }
        Ok(())
    }
}
