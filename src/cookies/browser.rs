//! Browsers, their cookie store dialects, and default store locations.

use crate::base::auditerror::AuditError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// On-disk cookie store schema family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `cookies` table, Chromium epoch timestamps.
    Chromium,
    /// `moz_cookies` table, Unix timestamps.
    Firefox,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Chromium => "chromium",
            Dialect::Firefox => "firefox",
        })
    }
}

/// Supported browsers for cookie extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Chromium,
    Edge,
    Firefox,
}

impl Browser {
    pub const ALL: [Browser; 4] = [
        Browser::Chrome,
        Browser::Chromium,
        Browser::Edge,
        Browser::Firefox,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Chromium => "chromium",
            Browser::Edge => "edge",
            Browser::Firefox => "firefox",
        }
    }

    pub fn dialect(self) -> Dialect {
        match self {
            Browser::Chrome | Browser::Chromium | Browser::Edge => Dialect::Chromium,
            Browser::Firefox => Dialect::Firefox,
        }
    }

    /// Default cookie store path for this browser.
    ///
    /// `profile` defaults to `Default` for Chromium-family browsers. For Firefox,
    /// the first `*.default*` profile directory is used when none is given.
    pub fn default_store_path(self, profile: Option<&str>) -> Option<PathBuf> {
        match self {
            Browser::Firefox => firefox_cookie_path(profile),
            _ => chromium_cookie_path(self, profile.unwrap_or("Default")),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Browser {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "google-chrome" => Ok(Browser::Chrome),
            "chromium" => Ok(Browser::Chromium),
            "edge" | "msedge" | "microsoft-edge" => Ok(Browser::Edge),
            "firefox" => Ok(Browser::Firefox),
            _ => Err(AuditError::InvalidBrowser(s.to_string())),
        }
    }
}

/// Relative user data directory for a Chromium-family browser.
fn chromium_user_data(browser: Browser) -> Option<&'static str> {
    let (linux, macos, windows) = match browser {
        Browser::Chrome => (
            ".config/google-chrome",
            "Library/Application Support/Google/Chrome",
            "Google/Chrome/User Data",
        ),
        Browser::Chromium => (
            ".config/chromium",
            "Library/Application Support/Chromium",
            "Chromium/User Data",
        ),
        Browser::Edge => (
            ".config/microsoft-edge",
            "Library/Application Support/Microsoft Edge",
            "Microsoft/Edge/User Data",
        ),
        Browser::Firefox => return None,
    };

    if cfg!(target_os = "windows") {
        Some(windows)
    } else if cfg!(target_os = "macos") {
        Some(macos)
    } else if cfg!(target_os = "linux") {
        Some(linux)
    } else {
        None
    }
}

fn chromium_cookie_path(browser: Browser, profile: &str) -> Option<PathBuf> {
    let user_data = chromium_user_data(browser)?;

    #[cfg(target_os = "windows")]
    {
        let local_app_data = std::env::var("LOCALAPPDATA").ok()?;
        Some(
            PathBuf::from(local_app_data)
                .join(user_data)
                .join(profile)
                .join("Network")
                .join("Cookies"),
        )
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").ok()?;
        let profile_dir = PathBuf::from(home).join(user_data).join(profile);

        // Chromium 96+ moved the store under Network/
        let network = profile_dir.join("Network").join("Cookies");
        if network.exists() {
            return Some(network);
        }
        Some(profile_dir.join("Cookies"))
    }
}

fn firefox_profiles_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".mozilla/firefox"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join("Library/Application Support/Firefox/Profiles"))
    }

    #[cfg(target_os = "windows")]
    {
        let app_data = std::env::var("APPDATA").ok()?;
        Some(PathBuf::from(app_data).join("Mozilla/Firefox/Profiles"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

fn firefox_cookie_path(profile: Option<&str>) -> Option<PathBuf> {
    let profiles = firefox_profiles_dir()?;

    if let Some(profile) = profile {
        return Some(profiles.join(profile).join("cookies.sqlite"));
    }

    find_default_profile(&profiles).map(|dir| dir.join("cookies.sqlite"))
}

/// First `*.default*` profile directory, in name order.
pub(crate) fn find_default_profile(profiles: &std::path::Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(profiles)
        .ok()?
        .flatten()
        .filter(|entry| {
            entry.path().is_dir() && entry.file_name().to_string_lossy().contains(".default")
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}
