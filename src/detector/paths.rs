use std::path::PathBuf;

use super::platform::PlatformConfig;
use crate::types::{Platform, Site};

/// Default hand-history directory of `site` on the configured platform.
/// None when the site has no path table or the platform is unsupported.
pub fn hand_history_dir(site: Site, cfg: &PlatformConfig) -> Option<PathBuf> {
    let dir = match (site, cfg.platform) {
        (_, Platform::Other) => return None,
        (Site::FullTiltPoker, Platform::Linux) => wine_program_files(cfg).join("Full Tilt Poker"),
        (Site::FullTiltPoker, Platform::Xp | Platform::Win7) => cfg.program_files.join("Full Tilt Poker"),
        (Site::PokerStars, Platform::Linux) => wine_program_files(cfg).join("PokerStars"),
        (Site::PokerStars, Platform::Xp) => cfg.program_files.join("PokerStars"),
        (Site::PokerStars, Platform::Win7) => cfg.local_appdata.join("PokerStars"),
        _ => return None,
    };
    Some(dir.join("HandHistory"))
}

/// True for the sites that have a path table.
pub fn is_implemented(site: Site) -> bool {
    matches!(site, Site::FullTiltPoker | Site::PokerStars)
}

fn wine_program_files(cfg: &PlatformConfig) -> PathBuf {
    cfg.home.join(".wine").join("drive_c").join("Program Files")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cfg(platform: Platform) -> PlatformConfig {
        PlatformConfig {
            platform,
            home: PathBuf::from("/home/alice"),
            program_files: PathBuf::from("/pf"),
            local_appdata: PathBuf::from("/appdata"),
        }
    }

    #[test]
    fn linux_paths_live_under_wine() {
        let dir = hand_history_dir(Site::PokerStars, &cfg(Platform::Linux)).unwrap();
        assert_eq!(
            dir,
            Path::new("/home/alice/.wine/drive_c/Program Files/PokerStars/HandHistory")
        );
        let dir = hand_history_dir(Site::FullTiltPoker, &cfg(Platform::Linux)).unwrap();
        assert!(dir.ends_with("Program Files/Full Tilt Poker/HandHistory"));
    }

    #[test]
    fn pokerstars_moves_to_local_appdata_after_xp() {
        let xp = hand_history_dir(Site::PokerStars, &cfg(Platform::Xp)).unwrap();
        let win7 = hand_history_dir(Site::PokerStars, &cfg(Platform::Win7)).unwrap();
        assert_eq!(xp, Path::new("/pf/PokerStars/HandHistory"));
        assert_eq!(win7, Path::new("/appdata/PokerStars/HandHistory"));
    }

    #[test]
    fn full_tilt_uses_program_files_on_windows() {
        for platform in [Platform::Xp, Platform::Win7] {
            let dir = hand_history_dir(Site::FullTiltPoker, &cfg(platform)).unwrap();
            assert_eq!(dir, Path::new("/pf/Full Tilt Poker/HandHistory"));
        }
    }

    #[test]
    fn unimplemented_sites_and_platforms_have_no_path() {
        assert!(hand_history_dir(Site::Everest, &cfg(Platform::Linux)).is_none());
        assert!(hand_history_dir(Site::PokerStars, &cfg(Platform::Other)).is_none());
        assert!(!is_implemented(Site::Winamax));
        assert!(is_implemented(Site::PokerStars));
    }
}
