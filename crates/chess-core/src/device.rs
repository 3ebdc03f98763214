//! Device classification and layout decisions.
//!
//! The client reports what it knows about itself once (and again on resize);
//! [`DeviceProfile::detect`] turns that into an immutable snapshot that is
//! passed to whatever decides layout, instead of living in global state.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Width or height from which an Android device counts as a tablet.
const MIN_TABLET_SIZE: u32 = 600;

/// Vertical space kept for header and controls in compact landscape.
const COMPACT_CHROME_PX: u32 = 120;
const COMPACT_MIN_BOARD_PX: u32 = 400;

/// Desktop breakpoint where the info panel moves next to the board.
const DESKTOP_WIDE_PX: u32 = 1024;
const DESKTOP_BOARD_WIDE_PX: u32 = 768;
const DESKTOP_BOARD_NARROW_PX: u32 = 672;

static MOBILE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)android|iphone|ipad|ipod|blackberry|iemobile|opera mini").unwrap()
});

static TABLET_UA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ipad|tablet|playbook|silk").unwrap());

static TV_UA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)googletv|android tv|firetv").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Raw facts reported by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSignal {
    /// `ios`, `android`, `web`, or empty when no native bridge is present.
    pub platform: String,
    pub model: String,
    pub user_agent: String,
    pub is_virtual: bool,
    pub has_touch_events: bool,
    pub max_touch_points: u32,
    pub coarse_pointer: bool,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_tv: bool,
    pub is_touchscreen: bool,
    pub platform: String,
    pub model: String,
}

impl DeviceProfile {
    pub fn detect(signal: &DeviceSignal) -> Self {
        let is_touchscreen =
            signal.has_touch_events || signal.max_touch_points > 0 || signal.coarse_pointer;
        let platform = if signal.platform.is_empty() {
            "web".to_string()
        } else {
            signal.platform.to_ascii_lowercase()
        };

        let mut profile = Self {
            is_mobile: false,
            is_tablet: false,
            is_tv: false,
            is_touchscreen,
            platform,
            model: signal.model.clone(),
        };

        match profile.platform.as_str() {
            "ios" | "android" if signal.is_virtual => profile.is_mobile = true,
            "ios" => {
                if signal.model.contains("iPad") {
                    profile.is_tablet = true;
                } else {
                    profile.is_mobile = true;
                }
            }
            "android" => {
                let ua = signal.user_agent.to_lowercase();
                let vp = signal.viewport;
                if ua.contains("android tv") || ua.contains("googletv") || signal.model.contains("tv")
                {
                    profile.is_tv = true;
                } else if vp.width >= MIN_TABLET_SIZE || vp.height >= MIN_TABLET_SIZE {
                    profile.is_tablet = true;
                } else {
                    profile.is_mobile = true;
                }
            }
            _ => {
                let ua = signal.user_agent.as_str();
                profile.is_mobile = MOBILE_UA.is_match(ua);
                profile.is_tablet = TABLET_UA.is_match(ua) || is_android_tablet_ua(ua);
                profile.is_tv = TV_UA.is_match(ua);
            }
        }

        profile
    }

    pub fn is_mobile_or_tv(&self) -> bool {
        self.is_mobile || self.is_tv
    }
}

/// Android user agents without "mobile" after the Android token are tablets.
fn is_android_tablet_ua(ua: &str) -> bool {
    let ua = ua.to_lowercase();
    match ua.find("android") {
        Some(idx) => !ua[idx..].contains("mobile"),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputModality {
    DragAndDrop,
    TapToMove,
    DirectionalPad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenOrientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Mobile/TV arrangement rather than the desktop one.
    pub compact: bool,
    pub screen: ScreenOrientation,
    /// Edge length of the square board.
    pub board_px: u32,
    /// Info panel beside the board instead of under it.
    pub panel_beside_board: bool,
    pub input: InputModality,
}

impl Layout {
    pub fn for_profile(profile: &DeviceProfile, viewport: Viewport) -> Self {
        let compact = profile.is_mobile_or_tv();
        let screen = if viewport.is_landscape() {
            ScreenOrientation::Landscape
        } else {
            ScreenOrientation::Portrait
        };

        let board_px = match (compact, screen) {
            (true, ScreenOrientation::Landscape) => viewport
                .height
                .saturating_sub(COMPACT_CHROME_PX)
                .max(COMPACT_MIN_BOARD_PX),
            (true, ScreenOrientation::Portrait) => {
                let edge = u64::from(viewport.width.min(viewport.height));
                (edge * 9 / 10) as u32
            }
            (false, _) if viewport.width >= DESKTOP_WIDE_PX => {
                viewport.width.min(DESKTOP_BOARD_WIDE_PX)
            }
            (false, _) => viewport.width.min(DESKTOP_BOARD_NARROW_PX),
        };

        let panel_beside_board = if compact {
            screen == ScreenOrientation::Landscape
        } else {
            viewport.width >= DESKTOP_WIDE_PX
        };

        let input = if profile.is_tv {
            InputModality::DirectionalPad
        } else if profile.is_touchscreen || profile.is_mobile || profile.is_tablet {
            InputModality::TapToMove
        } else {
            InputModality::DragAndDrop
        };

        Self {
            compact,
            screen,
            board_px,
            panel_beside_board,
            input,
        }
    }
}
