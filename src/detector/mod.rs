//! Finds the hand-history folder a poker client writes to and infers the
//! hero screen name from the first sub-directory in it.
//!
//! Only default install locations are checked. Anything that goes wrong on
//! the filesystem is reported as "not detected".

pub mod paths;
pub mod platform;

use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::types::{DetectionResult, Site};

pub use paths::{hand_history_dir, is_implemented};
pub use platform::PlatformConfig;

/// Detect one site.
pub fn detect(site: Site, cfg: &PlatformConfig) -> DetectionResult {
    if !is_implemented(site) {
        return DetectionResult::not_detected(site);
    }
    let Some(dir) = hand_history_dir(site, cfg) else {
        debug!(site = %site, platform = %cfg.platform, "no hand-history path table");
        return DetectionResult::not_detected(site);
    };

    match first_hero(&dir) {
        Ok(Some(hero)) => {
            let hhpath = dir.join(&hero).to_string_lossy().into_owned();
            info!(site = %site, hero = %hero, "Detected hand histories at {hhpath}");
            DetectionResult {
                site,
                detected: true,
                hhpath,
                heroname: hero,
            }
        }
        Ok(None) => {
            debug!(site = %site, "{} has no hero folder", dir.display());
            DetectionResult::not_detected(site)
        }
        Err(e) => {
            debug!(site = %site, "{}: {e}", dir.display());
            DetectionResult::not_detected(site)
        }
    }
}

/// Detect every known site, in `Site::ALL` order.
pub fn detect_all(cfg: &PlatformConfig) -> Vec<DetectionResult> {
    Site::ALL.into_iter().map(|site| detect(site, cfg)).collect()
}

/// First sub-directory of `dir` by name. With several screen names on one
/// machine only this one is reported.
fn first_hero(dir: &Path) -> io::Result<Option<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names.into_iter().next())
}
