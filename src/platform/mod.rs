//! Platform abstraction layer
//!
//! The browser surface lives in `web` (wasm only). Element ids and class
//! names the page is expected to provide are listed here.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Element ids
pub mod ids {
    pub const QUIZ_GRID: &str = "quizGrid";
    pub const QUIZ_COMPLETE: &str = "quizCompleteLabel";
    pub const ROSES_INPUT: &str = "rosesInput";
    pub const ROSES_ERROR: &str = "rosesError";
    pub const ROSES_LOCK: &str = "rosesLockBtn";
    pub const BOUQUET: &str = "bouquetContainer";
    pub const FAV_INPUT: &str = "favInput";
    pub const FAV_LOCK: &str = "favLockBtn";
    pub const WRONG_OVERLAY: &str = "wrongOverlay";
    pub const WRONG_DISMISS: &str = "wrongDismiss";
    pub const FINAL_SECTION: &str = "finalSection";
    pub const ACCEPT: &str = "btnYes";
    pub const EVASIVE: &str = "btnNo";
    pub const VIDEO_CONTAINER: &str = "videoContainer";
    pub const VIDEO_PLAYER: &str = "videoPlayer";
    pub const CONFETTI: &str = "confettiCanvas";
}

/// Class names
pub mod classes {
    pub const VISIBLE: &str = "visible";
    pub const FADE_IN: &str = "fade-in";
    pub const GATED_SECTION: &str = "gated-section";
    pub const UNLOCKED: &str = "unlocked";
    pub const OPEN: &str = "open";
    pub const LOCKED: &str = "locked";
    pub const SELECTED: &str = "selected";
    pub const REJECTED: &str = "rejected";
    pub const SHAKE: &str = "input-shake";
    pub const PRESSED: &str = "pressed";
    pub const ACTIVE: &str = "active";
    pub const GALLERY_ROSE: &str = "rose";
    pub const QUIZ_BUTTON: &str = "quiz-btn";
    pub const BOUQUET_WRAPPER: &str = "bouquet-wrapper";
    pub const BOUQUET_ROSE: &str = "bouquet-rose";
}
