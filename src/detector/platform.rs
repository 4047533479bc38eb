use std::path::PathBuf;

use crate::types::Platform;

/// Default Program Files location when the `ProgramFiles` variable is unset.
const DEFAULT_PROGRAM_FILES: &str = r"C:\Program Files";

/// Directories the hand-history path tables are rooted at.
/// Built once by the caller and passed to the detector, so tests can point
/// every root at a temp dir and simulate any platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    pub platform: Platform,
    pub home: PathBuf,
    pub program_files: PathBuf,
    pub local_appdata: PathBuf,
}

impl PlatformConfig {
    /// Probe the running machine. `platform_override` wins over the probe,
    /// which is the only way to select XP.
    pub fn from_host(platform_override: Option<Platform>) -> Self {
        let platform = platform_override.unwrap_or_else(host_platform);
        let home = dirs::home_dir().unwrap_or_default();
        let program_files = std::env::var_os("ProgramFiles")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_FILES));
        let local_appdata = dirs::data_local_dir().unwrap_or_else(|| home.join("AppData").join("Local"));

        Self {
            platform,
            home,
            program_files,
            local_appdata,
        }
    }

    /// Every root set to `root`.
    #[cfg(test)]
    pub fn rooted_at(platform: Platform, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            platform,
            home: root.clone(),
            program_files: root.clone(),
            local_appdata: root,
        }
    }
}

fn host_platform() -> Platform {
    match std::env::consts::OS {
        "linux" => Platform::Linux,
        "windows" => Platform::Win7,
        _ => Platform::Other,
    }
}
