//! Free-text stage
//!
//! Any non-empty answer locks the stage, and a short while later the
//! "wrong answer" overlay appears no matter what was typed. Dismissing the
//! overlay opens the last gate.

/// Outcome of submitting the free-text answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteSubmit {
    /// Locked; the overlay should be shown after `overlay_delay_ms`
    Locked { overlay_delay_ms: u32 },
    /// Blank answer
    Rejected,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Open,
    /// Locked, overlay pending
    Locked,
    OverlayShown,
    Dismissed,
}

/// Free-text stage state
#[derive(Debug, Clone, Default)]
pub struct FavoriteStage {
    phase: Phase,
    overlay_delay_ms: u32,
}

impl FavoriteStage {
    pub const LOCKED_LABEL: &'static str = "Locked in!";

    pub fn new(overlay_delay_ms: u32) -> Self {
        Self {
            phase: Phase::Open,
            overlay_delay_ms,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.phase != Phase::Open
    }

    pub fn overlay_visible(&self) -> bool {
        self.phase == Phase::OverlayShown
    }

    pub fn submit(&mut self, answer: &str) -> FavoriteSubmit {
        if self.is_locked() {
            return FavoriteSubmit::Ignored;
        }
        if answer.trim().is_empty() {
            return FavoriteSubmit::Rejected;
        }
        self.phase = Phase::Locked;
        log::info!("Favorite answer locked");
        FavoriteSubmit::Locked {
            overlay_delay_ms: self.overlay_delay_ms,
        }
    }

    /// The scheduled delay elapsed. Returns true if the overlay should appear.
    pub fn overlay_due(&mut self) -> bool {
        if self.phase != Phase::Locked {
            return false;
        }
        self.phase = Phase::OverlayShown;
        true
    }

    /// Dismiss the overlay. Returns true if this completes the stage.
    pub fn dismiss(&mut self) -> bool {
        if self.phase != Phase::OverlayShown {
            return false;
        }
        self.phase = Phase::Dismissed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_rejected() {
        let mut stage = FavoriteStage::new(300);
        assert_eq!(stage.submit(""), FavoriteSubmit::Rejected);
        assert_eq!(stage.submit("  \t\n"), FavoriteSubmit::Rejected);
        assert!(!stage.is_locked());
    }

    #[test]
    fn test_any_answer_leads_to_overlay() {
        for answer in ["your smile", "everything", "x"] {
            let mut stage = FavoriteStage::new(300);
            assert_eq!(stage.submit(answer), FavoriteSubmit::Locked { overlay_delay_ms: 300 });
            assert!(!stage.overlay_visible());
            assert!(stage.overlay_due());
            assert!(stage.overlay_visible());
        }
    }

    #[test]
    fn test_locked_ignores_submit() {
        let mut stage = FavoriteStage::new(300);
        stage.submit("a");
        assert_eq!(stage.submit("b"), FavoriteSubmit::Ignored);
    }

    #[test]
    fn test_dismiss_only_when_shown() {
        let mut stage = FavoriteStage::new(300);
        assert!(!stage.dismiss());
        stage.submit("a");
        assert!(!stage.dismiss());
        assert!(stage.overlay_due());
        assert!(!stage.overlay_due());
        assert!(stage.dismiss());
        assert!(!stage.overlay_visible());
        assert!(!stage.dismiss());
    }
}
