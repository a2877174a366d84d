//! Process-wide license state: a write-once verdict plus the live feature
//! set.

use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{LicenseError, LicenseResult};
use crate::types::LicensePayload;

/// Outcome of the one-time license evaluation.
#[derive(Debug, Clone)]
pub(crate) struct Verdict {
    /// Whether enterprise capabilities are enabled.
    pub enterprise: bool,

    /// The verified payload, populated only on a positive verdict.
    pub info: Option<LicensePayload>,

    /// Feature set installed on a positive verdict.
    pub features: Vec<String>,
}

impl Verdict {
    /// The disabled / community verdict.
    pub fn community() -> Self {
        Self {
            enterprise: false,
            info: None,
            features: Vec::new(),
        }
    }
}

/// Write-once-then-read cache of the license verdict, with a swappable
/// feature set.
///
/// The verdict cell flips exactly once; there is no reset. The feature
/// set is replaced whole on write so readers always observe a consistent
/// snapshot without holding a lock across their own work.
pub(crate) struct LicenseStore {
    verdict: OnceLock<Verdict>,
    features: RwLock<Arc<Vec<String>>>,
}

impl LicenseStore {
    pub fn new() -> Self {
        Self {
            verdict: OnceLock::new(),
            features: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Run `evaluate` at most once per process. Concurrent first callers
    /// block until the single evaluation completes; every call returns the
    /// shared verdict.
    pub fn init_once<F>(&self, evaluate: F) -> bool
    where
        F: FnOnce() -> Verdict,
    {
        self.verdict
            .get_or_init(|| {
                let verdict = evaluate();
                if verdict.enterprise {
                    self.replace_features(verdict.features.clone());
                }
                verdict
            })
            .enterprise
    }

    /// The verified payload.
    ///
    /// Errors until a positive evaluation has populated it. Reading
    /// entitlement state before the gate has run, or after a failed
    /// verification, is a caller ordering bug rather than a condition to
    /// recover from.
    pub fn license_info(&self) -> LicenseResult<LicensePayload> {
        self.verdict
            .get()
            .and_then(|v| v.info.clone())
            .ok_or(LicenseError::NotInitialized)
    }

    /// Snapshot of the active feature set. Readable at any time; empty
    /// before initialization and for community installs.
    pub fn enabled_features(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.features.read().unwrap())
    }

    /// Whether `name` is in the active feature set.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.read().unwrap().iter().any(|f| f == name)
    }

    /// Replace the whole active feature set. After initialization the
    /// refresh task is the sole writer.
    pub fn replace_features(&self, features: Vec<String>) {
        *self.features.write().unwrap() = Arc::new(features);
    }
}
