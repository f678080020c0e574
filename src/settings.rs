//! Experience settings
//!
//! Read once at startup from an inline JSON block in the page. Every field has
//! a default, so a partial block only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Confetti pool tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiSettings {
    /// Fixed pool size
    pub particle_count: usize,
    /// Downward acceleration added to vy every frame
    pub gravity: f32,
    /// How far below the canvas a particle may fall before it is recycled
    pub recycle_margin: f32,
    /// CSS colours sampled uniformly per particle
    pub palette: Vec<String>,
}

impl Default for ConfettiSettings {
    fn default() -> Self {
        Self {
            particle_count: CONFETTI_POOL,
            gravity: CONFETTI_GRAVITY,
            recycle_margin: CONFETTI_RECYCLE_MARGIN,
            palette: [
                "#c93555", "#e8899a", "#ffd6de", "#d4556a", "#b83a52", "#ff6b8a", "#ffb6c1",
                "#fff5f5", "#ffc0cb", "#ff1493",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

/// Repulsion field tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepelSettings {
    pub radius: f32,
    pub max_push: f32,
}

impl Default for RepelSettings {
    fn default() -> Self {
        Self {
            radius: REPEL_RADIUS,
            max_push: REPEL_MAX_PUSH,
        }
    }
}

/// Visibility thresholds (fraction of the element inside the viewport)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub fade_in: f64,
    pub quiz_button: f64,
    pub final_section: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fade_in: 0.15,
            quiz_button: 0.1,
            final_section: 0.3,
        }
    }
}

/// All configurable knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Quiz ===
    /// Words that must all be selected
    pub affirming_words: Vec<String>,
    /// Words that only ever shake
    pub rejecting_words: Vec<String>,

    // === Stages ===
    /// Bouquet size cap
    pub rose_cap: u32,
    /// Delay before the "wrong answer" overlay appears
    pub overlay_delay_ms: u32,

    // === Loops ===
    pub confetti: ConfettiSettings,
    pub repel: RepelSettings,
    /// Pointer parallax on the hero gallery (never on touch devices)
    pub parallax: bool,

    // === Surface ===
    pub thresholds: Thresholds,
    /// Embedded video shown after the final accept
    pub video_src: String,
}

impl Default for Settings {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            affirming_words: words(&[
                "Beautiful", "Gorgeous", "Smart", "Kind", "Funny", "Caring", "Creative", "Brave",
                "Charming", "Radiant", "Loving", "Brilliant", "Graceful", "Stunning", "Adorable",
                "Sweet", "Talented", "Wonderful", "Amazing", "Perfect",
            ]),
            rejecting_words: words(&["Fat", "Ugly", "Disgusting", "Boring", "Annoying"]),
            rose_cap: MAX_ROSES,
            overlay_delay_ms: OVERLAY_DELAY_MS,
            confetti: ConfettiSettings::default(),
            repel: RepelSettings::default(),
            parallax: true,
            thresholds: Thresholds::default(),
            video_src: "https://www.youtube.com/embed/d1NjkYjRn34?autoplay=1&loop=1&playlist=d1NjkYjRn34"
                .to_string(),
        }
    }
}

impl Settings {
    /// Element id of the inline JSON settings block
    pub const ELEMENT_ID: &'static str = "experience-settings";

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Clamp values that would break a stage or loop
    pub fn sanitized(mut self) -> Self {
        if self.affirming_words.is_empty() {
            log::warn!("No affirming words configured, using defaults");
            self.affirming_words = Settings::default().affirming_words;
        }
        self.rose_cap = self.rose_cap.clamp(1, MAX_ROSES);
        // Browser timers take an i32 delay
        self.overlay_delay_ms = self.overlay_delay_ms.min(i32::MAX as u32);
        if self.confetti.particle_count == 0 {
            self.confetti.particle_count = CONFETTI_POOL;
        }
        if self.confetti.palette.is_empty() {
            self.confetti.palette = ConfettiSettings::default().palette;
        }
        if !(self.repel.radius > 0.0) {
            self.repel.radius = REPEL_RADIUS;
        }
        self
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = text {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Invalid settings JSON ({e}), using defaults"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_design() {
        let s = Settings::default();
        assert_eq!(s.affirming_words.len(), 20);
        assert_eq!(s.rejecting_words.len(), 5);
        assert_eq!(s.confetti.particle_count, 300);
        assert_eq!(s.confetti.palette.len(), 10);
        assert_eq!(s.repel.radius, 180.0);
        assert_eq!(s.rose_cap, 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "overlay_delay_ms": 50, "repel": { "radius": 90.0 } }"#)
            .unwrap();
        assert_eq!(s.overlay_delay_ms, 50);
        assert_eq!(s.repel.radius, 90.0);
        assert_eq!(s.repel.max_push, REPEL_MAX_PUSH);
        assert_eq!(s.affirming_words.len(), 20);
    }

    #[test]
    fn test_sanitize_clamps() {
        let s = Settings::from_json(
            r#"{ "rose_cap": 5000, "affirming_words": [], "confetti": { "particle_count": 0 } }"#,
        )
        .unwrap();
        assert_eq!(s.rose_cap, MAX_ROSES);
        assert!(!s.affirming_words.is_empty());
        assert_eq!(s.confetti.particle_count, CONFETTI_POOL);
    }

    #[test]
    fn test_overlay_delay_fits_a_timer() {
        let s = Settings::from_json(r#"{ "overlay_delay_ms": 4000000000 }"#).unwrap();
        assert_eq!(s.overlay_delay_ms, i32::MAX as u32);
        let s = Settings::from_json(r#"{ "overlay_delay_ms": 300 }"#).unwrap();
        assert_eq!(s.overlay_delay_ms, 300);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json("{ nope").is_err());
    }
}
