//! Rose count stage
//!
//! A positive whole number locks the stage, lays out the bouquet and opens
//! the second gate.

use std::fmt;

use crate::pluralize;

/// Why a rose count was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoseRejection {
    Zero,
    Invalid,
}

impl RoseRejection {
    pub fn message(&self) -> &'static str {
        match self {
            RoseRejection::Zero => "Zero? Really? Try again!",
            RoseRejection::Invalid => "Please enter a valid number!",
        }
    }
}

impl fmt::Display for RoseRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of submitting a rose count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoseSubmit {
    /// Accepted and locked
    Locked {
        count: u32,
        /// Count the bouquet is laid out with (capped)
        layout_count: u32,
        label: String,
    },
    Rejected(RoseRejection),
    /// Already locked; nothing happens
    Ignored,
}

/// Keep only ASCII digits (applied on every edit of the input)
pub fn sanitize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn saturating_count(digits: &str) -> u32 {
    digits.bytes().fold(0u32, |n, b| {
        n.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

/// Rose count stage state
#[derive(Debug, Clone)]
pub struct RoseStage {
    cap: u32,
    locked: Option<u32>,
}

impl RoseStage {
    pub fn new(cap: u32) -> Self {
        Self { cap, locked: None }
    }

    pub fn locked_count(&self) -> Option<u32> {
        self.locked
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// Parse a submitted value.
    ///
    /// Counts too large for `u32` saturate; the bouquet is capped anyway.
    pub fn parse(raw: &str) -> Result<u32, RoseRejection> {
        Self::digits(raw).map(saturating_count)
    }

    /// Trimmed, non-zero digit string with leading zeros stripped
    fn digits(raw: &str) -> Result<&str, RoseRejection> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RoseRejection::Invalid);
        }
        match trimmed.trim_start_matches('0') {
            "" => Err(RoseRejection::Zero),
            digits => Ok(digits),
        }
    }

    /// Submit the current input value
    pub fn submit(&mut self, raw: &str) -> RoseSubmit {
        if self.is_locked() {
            return RoseSubmit::Ignored;
        }
        match Self::digits(raw) {
            Ok(digits) => {
                let count = saturating_count(digits);
                self.locked = Some(count);
                log::info!("Rose count locked at {digits}");
                RoseSubmit::Locked {
                    count,
                    layout_count: count.min(self.cap),
                    label: format!("Locked in: {}", pluralize(digits, "rose")),
                }
            }
            Err(rejection) => {
                log::debug!("Rose count rejected: {rejection}");
                RoseSubmit::Rejected(rejection)
            }
        }
    }
}
