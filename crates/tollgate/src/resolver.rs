//! Entitlement resolution from a verified payload.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{LicenseError, LicenseResult};
use crate::types::{LicensePayload, LicenseTier, ResolvedEntitlement};

/// Derive the active feature set from a verified payload.
///
/// Explicit non-empty `features` win; otherwise the tier defaults apply.
/// An unrecognized tier with no explicit features degrades to an empty
/// feature set with a warning; the enterprise verdict itself is not
/// affected. Full access is never granted silently.
pub fn resolve(payload: &LicensePayload, now: DateTime<Utc>) -> LicenseResult<ResolvedEntitlement> {
    if payload.expire_at < now {
        return Err(LicenseError::Expired {
            expired_at: payload.expire_at,
        });
    }

    let features = match &payload.features {
        Some(features) if !features.is_empty() => features.clone(),
        _ => match payload.tier.as_deref().and_then(LicenseTier::parse) {
            Some(tier) => tier
                .default_features()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            None => {
                warn!(
                    tier = payload.tier.as_deref().unwrap_or("<absent>"),
                    "license has no recognized tier and no explicit features; \
                     resolving to an empty feature set"
                );
                Vec::new()
            }
        },
    };

    Ok(ResolvedEntitlement {
        license_info: payload.clone(),
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(tier: Option<&str>, features: Option<Vec<&str>>, expire_year: i32) -> LicensePayload {
        LicensePayload {
            tier: tier.map(String::from),
            features: features.map(|f| f.into_iter().map(String::from).collect()),
            expire_at: Utc.with_ymd_and_hms(expire_year, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn eval_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn gold_without_explicit_features_gets_sso() {
        let resolved = resolve(&payload(Some("gold"), None, 2999), eval_time()).unwrap();
        assert_eq!(resolved.features, vec!["sso"]);
    }

    #[test]
    fn bronze_and_silver_default_to_empty() {
        for tier in ["bronze", "silver"] {
            let resolved = resolve(&payload(Some(tier), None, 2999), eval_time()).unwrap();
            assert!(resolved.features.is_empty(), "tier: {tier}");
        }
    }

    #[test]
    fn explicit_features_override_tier_defaults() {
        let resolved = resolve(
            &payload(Some("gold"), Some(vec!["customX", "customY"]), 2999),
            eval_time(),
        )
        .unwrap();
        assert_eq!(resolved.features, vec!["customX", "customY"]);
    }

    #[test]
    fn empty_feature_list_falls_back_to_tier_defaults() {
        let resolved = resolve(&payload(Some("gold"), Some(vec![]), 2999), eval_time()).unwrap();
        assert_eq!(resolved.features, vec!["sso"]);
    }

    #[test]
    fn unknown_tier_without_features_resolves_empty() {
        let resolved = resolve(&payload(Some("platinum"), None, 2999), eval_time()).unwrap();
        assert!(resolved.features.is_empty());
    }

    #[test]
    fn absent_tier_without_features_resolves_empty() {
        let resolved = resolve(&payload(None, None, 2999), eval_time()).unwrap();
        assert!(resolved.features.is_empty());
    }

    #[test]
    fn expired_license_is_rejected() {
        let result = resolve(&payload(Some("gold"), None, 2020), eval_time());
        assert!(matches!(result, Err(LicenseError::Expired { .. })));
    }

    #[test]
    fn expiry_is_checked_before_feature_resolution() {
        // Even an explicit feature list does not rescue an expired license.
        let result = resolve(&payload(None, Some(vec!["sso"]), 2020), eval_time());
        assert!(matches!(result, Err(LicenseError::Expired { .. })));
    }

    #[test]
    fn resolved_entitlement_carries_the_payload() {
        let resolved = resolve(&payload(Some("gold"), None, 2999), eval_time()).unwrap();
        assert_eq!(resolved.license_info.tier.as_deref(), Some("gold"));
    }
}
