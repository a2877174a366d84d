//! License payload and entitlement types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// License tiers, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseTier {
    Bronze,
    Silver,
    Gold,
}

impl LicenseTier {
    /// Parse a payload `type` field. Unknown names yield `None`; the
    /// resolver decides what that means.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            _ => None,
        }
    }

    /// Tier name as it appears in license payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }

    /// Compiled-in default feature set for the tier, used when a license
    /// carries no explicit feature list.
    pub fn default_features(self) -> &'static [&'static str] {
        match self {
            Self::Bronze | Self::Silver => &[],
            Self::Gold => &["sso"],
        }
    }
}

/// Signed license payload: the decoded envelope content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicensePayload {
    /// Tier name ("bronze", "silver", "gold"). Optional when an explicit
    /// feature list is present. Kept verbatim so unknown tiers survive
    /// deserialization.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,

    /// Explicit feature overrides. Take precedence over tier defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,

    /// Expiration timestamp.
    #[serde(rename = "expireAt")]
    pub expire_at: DateTime<Utc>,
}

/// Resolved entitlement: the verified payload plus the feature set it
/// grants.
#[derive(Debug, Clone)]
pub struct ResolvedEntitlement {
    /// The payload the entitlement was derived from.
    pub license_info: LicensePayload,

    /// Granted feature names, in payload order.
    pub features: Vec<String>,
}

/// Body of the remote feature refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesResponse {
    /// Current feature names for this installation.
    pub features: Vec<String>,
}
