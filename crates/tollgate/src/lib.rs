//! License verification and feature gating.
//!
//! Decides, once per process, whether an installation is entitled to run
//! enterprise capabilities, and exposes a tamper-resistant query surface
//! for named feature flags:
//!
//! - envelope decoding (`base64(base64(signature) + "\n" + base64(json))`)
//! - Ed25519 signature verification against a public key bundled with the
//!   binary
//! - expiration and tier-default entitlement resolution
//! - a write-once verdict cache with fail-fast accessors
//! - a best-effort background refresh of the feature set from a remote
//!   endpoint
//!
//! # Quick start
//!
//! ```no_run
//! use tollgate::{GateConfig, LicenseGate};
//!
//! let gate = LicenseGate::new(GateConfig::from_env());
//! if gate.is_enterprise_enabled() {
//!     let sso = gate.features().is_enabled("sso");
//!     println!("sso enabled: {sso}");
//! }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `TOLLGATE_LICENSE` | License material override |
//! | `TOLLGATE_DISABLE` | Force the community verdict (`1`/`true`) |
//! | `TOLLGATE_APP_DIR` | Directory containing `license.txt` (default: `.`) |
//! | `TOLLGATE_REFRESH_URL` | Remote feature endpoint (refresh off when unset) |
//! | `TOLLGATE_REFRESH_INTERVAL` | Refresh period in seconds (default: 3600) |
//! | `TOLLGATE_REFRESH_TIMEOUT` | Per-fetch timeout in seconds (default: 10) |

pub mod config;
pub mod envelope;
pub mod error;
pub mod gate;
mod refresh;
pub mod resolver;
mod source;
mod store;
pub mod types;
pub mod verify;

// Re-export main types
pub use config::{GateConfig, LICENSE_FILE_NAME};
pub use envelope::Envelope;
pub use error::{LicenseError, LicenseResult};
pub use gate::{global, Features, LicenseGate};
pub use resolver::resolve;
pub use types::{FeaturesResponse, LicensePayload, LicenseTier, ResolvedEntitlement};
