//! License material discovery.

use std::io::ErrorKind;

use tracing::{debug, warn};

use crate::config::{GateConfig, LICENSE_FILE_NAME};

/// Locate license material: the explicit override wins, then `license.txt`
/// in the application directory. Absence is not an error, only a community
/// verdict.
pub(crate) fn load(config: &GateConfig) -> Option<String> {
    if let Some(license) = &config.license {
        debug!("using license material from override");
        return Some(license.clone());
    }

    let path = config.app_dir.join(LICENSE_FILE_NAME);
    match std::fs::read_to_string(&path) {
        Ok(material) => {
            debug!(path = %path.display(), "loaded license file");
            Some(material)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            // Distinct from genuine absence: the file is there but cannot
            // be read, which an operator will want to know about.
            warn!(path = %path.display(), error = %e, "license file unreadable; treating as absent");
            None
        }
    }
}
