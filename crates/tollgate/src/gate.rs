//! The gate facade: the only license surface collaborators may call.

use std::sync::{Arc, Mutex, Once, OnceLock};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::envelope;
use crate::error::{LicenseError, LicenseResult};
use crate::refresh::{self, RefreshClient};
use crate::resolver;
use crate::source;
use crate::store::{LicenseStore, Verdict};
use crate::types::LicensePayload;
use crate::verify;

/// License gate.
///
/// Evaluates the installation's license exactly once per gate and caches
/// the verdict; there is deliberately no reset, so crafted input cannot
/// re-run the evaluation mid-process.
pub struct LicenseGate {
    config: GateConfig,
    store: Arc<LicenseStore>,
    refresh_once: Once,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl LicenseGate {
    /// Create a gate. Evaluation is deferred to the first
    /// [`is_enterprise_enabled`](Self::is_enterprise_enabled) call.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            store: Arc::new(LicenseStore::new()),
            refresh_once: Once::new(),
            refresh_task: Mutex::new(None),
        }
    }

    /// Whether the installation is entitled to enterprise capabilities.
    ///
    /// The first call runs the decode → verify → resolve pipeline exactly
    /// once; concurrent first callers share that single evaluation, and
    /// every later call returns the cached verdict.
    pub fn is_enterprise_enabled(&self) -> bool {
        let enterprise = self.store.init_once(|| self.evaluate());
        if enterprise {
            // The spawn happens strictly after the verdict's feature set is
            // installed, so the refresh task is the sole writer from here on.
            self.refresh_once.call_once(|| self.start_refresh());
        }
        enterprise
    }

    /// The verified license payload.
    ///
    /// Errors with [`LicenseError::NotInitialized`] when no successful
    /// evaluation has populated it. That is a caller ordering bug — a
    /// collaborator bypassed the facade's required call order — not a
    /// runtime condition to recover from.
    pub fn license_info(&self) -> LicenseResult<LicensePayload> {
        self.store.license_info()
    }

    /// Feature flag accessor over the live feature set.
    ///
    /// Usable regardless of the verdict: a community install answers
    /// `is_enabled` truthfully as `false` for everything.
    pub fn features(&self) -> Features<'_> {
        Features { store: &self.store }
    }

    fn evaluate(&self) -> Verdict {
        if self.config.disabled {
            return Verdict::community();
        }

        let Some(material) = source::load(&self.config) else {
            debug!("no license material found; starting in community mode");
            return Verdict::community();
        };

        match self.evaluate_material(&material) {
            Ok(verdict) => verdict,
            Err(LicenseError::Expired { expired_at }) => {
                warn!(%expired_at, "license expired; starting in community mode");
                Verdict::community()
            }
            Err(e) if e.is_validation() => {
                warn!(error = %e, "invalid license; starting in community mode");
                Verdict::community()
            }
            Err(e) => {
                warn!(error = %e, "license evaluation failed; starting in community mode");
                Verdict::community()
            }
        }
    }

    fn evaluate_material(&self, material: &str) -> LicenseResult<Verdict> {
        let envelope = envelope::decode(material)?;

        let Some(key) = verify::embedded_key() else {
            return Err(LicenseError::SignatureInvalid);
        };
        if !verify::verify(&envelope.content, &envelope.signature, key) {
            return Err(LicenseError::SignatureInvalid);
        }

        let payload: LicensePayload =
            serde_json::from_slice(&envelope.content).map_err(|e| LicenseError::Malformed {
                reason: format!("invalid payload JSON: {e}"),
            })?;

        let entitlement = resolver::resolve(&payload, Utc::now())?;

        Ok(Verdict {
            enterprise: true,
            info: Some(entitlement.license_info),
            features: entitlement.features,
        })
    }

    fn start_refresh(&self) {
        let Some(url) = &self.config.refresh_url else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no tokio runtime available; feature refresh disabled");
            return;
        };

        let client = match RefreshClient::new(
            url.clone(),
            Duration::from_secs(self.config.refresh_timeout_secs),
        ) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "failed to start feature refresh");
                return;
            }
        };

        let task = refresh::spawn(
            &runtime,
            Arc::clone(&self.store),
            client,
            Duration::from_secs(self.config.refresh_interval_secs),
        );
        *self.refresh_task.lock().unwrap() = Some(task);
    }
}

impl Drop for LicenseGate {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.lock().unwrap().take() {
            task.abort();
        }
    }
}

/// Read-only feature flag view.
pub struct Features<'a> {
    store: &'a LicenseStore,
}

impl Features<'_> {
    /// Whether `name` is currently enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.store.feature_enabled(name)
    }

    /// Snapshot of the enabled feature names, in payload order.
    pub fn get_enabled(&self) -> Vec<String> {
        self.store.enabled_features().as_ref().clone()
    }
}

/// Process-wide gate, built from [`GateConfig::from_env`] on first use.
///
/// For collaborators that cannot be handed a gate instance explicitly.
/// It lives until process exit; its refresh task is bound to the process
/// lifetime.
pub fn global() -> &'static LicenseGate {
    static GATE: OnceLock<LicenseGate> = OnceLock::new();
    GATE.get_or_init(|| LicenseGate::new(GateConfig::from_env()))
}
