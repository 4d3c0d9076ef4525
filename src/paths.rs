/// Platform-specific location of the user configuration file
///
/// Follows the XDG Base Directory specification on Linux and other Unix-likes.
use std::path::PathBuf;

const PROJECT_DIR: &str = "pydigest";

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Base configuration directory for the current platform
    ///
    /// - Windows: %APPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_CONFIG_HOME or ~/.config
    pub fn config_dir() -> PathBuf {
        let dir = if cfg!(target_os = "windows") {
            std::env::var("APPDATA").map(PathBuf::from).ok()
        } else if cfg!(target_os = "macos") {
            home_join("Library/Application Support")
        } else {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or_else(|| home_join(".config"))
        };
        dir.unwrap_or_else(|| PathBuf::from("."))
    }

    /// Returns: {config_dir}/pydigest
    pub fn project_config_dir() -> PathBuf {
        Self::config_dir().join(PROJECT_DIR)
    }

    /// Returns: {config_dir}/pydigest/config.toml
    pub fn default_config_path() -> PathBuf {
        Self::project_config_dir().join("config.toml")
    }
}

fn home_join(suffix: &str) -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_dir_not_empty() {
        assert!(!PlatformPaths::config_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_default_config_path_layout() {
        let path = PlatformPaths::default_config_path();
        assert!(path.ends_with("pydigest/config.toml"));
        assert!(path.starts_with(PlatformPaths::config_dir()));
    }

    // Both XDG cases run in one test so they never race on the same variables
    #[test]
    #[cfg(target_os = "linux")]
    fn test_config_dir_xdg_and_home_fallback() {
        let xdg_original = env::var("XDG_CONFIG_HOME").ok();
        let home_original = env::var("HOME").ok();

        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }
        assert_eq!(PlatformPaths::config_dir(), PathBuf::from("/custom/config"));

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
            env::set_var("HOME", "/home/testuser");
        }
        assert_eq!(
            PlatformPaths::config_dir(),
            PathBuf::from("/home/testuser/.config")
        );
        assert_eq!(
            PlatformPaths::default_config_path(),
            PathBuf::from("/home/testuser/.config/pydigest/config.toml")
        );

        unsafe {
            match xdg_original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
            match home_original {
                Some(val) => env::set_var("HOME", val),
                None => env::remove_var("HOME"),
            }
        }
    }
}
