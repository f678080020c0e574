//! Experience orchestrator
//!
//! User input arrives as `Input` messages. Each message goes to the stage that
//! owns it; a completed stage emits a `StageEvent`, and the gate machine is
//! the only consumer of those. Everything the page has to do in response is
//! returned as an ordered list of `Effect`s, applied synchronously by the
//! surface before the event handler returns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::bouquet::{BouquetItem, generate_layout};
use crate::settings::Settings;
use crate::stages::{
    FavoriteStage, FavoriteSubmit, GateId, GateMachine, Quiz, QuizClick, Region, RoseStage,
    RoseSubmit, StageEvent, sanitize_digits,
};

/// Text inputs that can shake or lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    RoseCount,
    Favorite,
}

/// User interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Quiz button at this index clicked
    QuizClick(usize),
    /// Rose count input edited
    RoseEdited(String),
    /// Rose count lock button pressed with this input value
    RoseSubmitted(String),
    /// Favorite lock button pressed with this input value
    FavoriteSubmitted(String),
    /// The scheduled overlay delay elapsed
    OverlayDue,
    OverlayDismissed,
    /// Final "yes"
    Accept,
}

/// Surface changes, in the order they must be applied
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    QuizSelected(usize),
    /// One-shot shake on a rejecting quiz button
    QuizRejected(usize),
    QuizCompleteShown,
    /// Replace an input's value
    SetInputValue { field: InputField, value: String },
    ShowRoseError(&'static str),
    ClearRoseError,
    /// One-shot shake on an input
    Shake(InputField),
    /// Disable an input and relabel its lock button
    LockInput { field: InputField, label: String },
    RenderBouquet(Vec<BouquetItem>),
    ScheduleOverlay { delay_ms: u32 },
    ShowOverlay,
    HideOverlay,
    /// Mark the gate control as open
    OpenGate(GateId),
    /// Unlock a region and watch its fade-in elements (no-op if absent)
    Unlock(Region),
    PressAccept,
    HideEvasive,
    LaunchConfetti,
    ShowVideo { src: String },
}

/// Session state for the whole page
pub struct Experience {
    settings: Settings,
    rng: Pcg32,
    quiz: Quiz,
    roses: RoseStage,
    favorite: FavoriteStage,
    gates: GateMachine,
    accepted: bool,
}

impl Experience {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = crate::session_rng(seed);
        let quiz = Quiz::new(&settings.affirming_words, &settings.rejecting_words, &mut rng);
        let roses = RoseStage::new(settings.rose_cap);
        let favorite = FavoriteStage::new(settings.overlay_delay_ms);
        log::info!(
            "Experience ready: {} quiz words, seed {}",
            quiz.items().len(),
            seed
        );
        Self {
            settings,
            rng,
            quiz,
            roses,
            favorite,
            gates: GateMachine::new(),
            accepted: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn gates(&self) -> &GateMachine {
        &self.gates
    }

    pub fn rose_count(&self) -> Option<u32> {
        self.roses.locked_count()
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Independent RNG for a subsystem (e.g. confetti), derived from the session seed
    pub fn fork_rng(&mut self) -> Pcg32 {
        Pcg32::seed_from_u64(self.rng.random())
    }

    /// Handle one input and return the effects to apply
    pub fn dispatch(&mut self, input: Input) -> Vec<Effect> {
        let mut effects = Vec::new();
        match input {
            Input::QuizClick(index) => match self.quiz.click(index) {
                QuizClick::Selected { .. } => effects.push(Effect::QuizSelected(index)),
                QuizClick::Completed => {
                    effects.push(Effect::QuizSelected(index));
                    effects.push(Effect::QuizCompleteShown);
                    self.complete(StageEvent::QuizCompleted, &mut effects);
                }
                QuizClick::Rejected => effects.push(Effect::QuizRejected(index)),
                QuizClick::AlreadySelected | QuizClick::Missing => {}
            },
            Input::RoseEdited(raw) => {
                if !self.roses.is_locked() {
                    effects.push(Effect::SetInputValue {
                        field: InputField::RoseCount,
                        value: sanitize_digits(&raw),
                    });
                    effects.push(Effect::ClearRoseError);
                }
            }
            Input::RoseSubmitted(raw) => match self.roses.submit(&raw) {
                RoseSubmit::Locked {
                    count,
                    layout_count,
                    label,
                } => {
                    effects.push(Effect::LockInput {
                        field: InputField::RoseCount,
                        label,
                    });
                    effects.push(Effect::RenderBouquet(generate_layout(
                        layout_count,
                        &mut self.rng,
                    )));
                    self.complete(StageEvent::RoseCountLocked(count), &mut effects);
                }
                RoseSubmit::Rejected(rejection) => {
                    effects.push(Effect::ShowRoseError(rejection.message()));
                    effects.push(Effect::Shake(InputField::RoseCount));
                }
                RoseSubmit::Ignored => {}
            },
            Input::FavoriteSubmitted(answer) => match self.favorite.submit(&answer) {
                FavoriteSubmit::Locked { overlay_delay_ms } => {
                    effects.push(Effect::LockInput {
                        field: InputField::Favorite,
                        label: FavoriteStage::LOCKED_LABEL.to_string(),
                    });
                    effects.push(Effect::ScheduleOverlay {
                        delay_ms: overlay_delay_ms,
                    });
                }
                FavoriteSubmit::Rejected => effects.push(Effect::Shake(InputField::Favorite)),
                FavoriteSubmit::Ignored => {}
            },
            Input::OverlayDue => {
                if self.favorite.overlay_due() {
                    effects.push(Effect::ShowOverlay);
                }
            }
            Input::OverlayDismissed => {
                if self.favorite.dismiss() {
                    effects.push(Effect::HideOverlay);
                    self.complete(StageEvent::WrongAnswerDismissed, &mut effects);
                }
            }
            Input::Accept => {
                if !self.accepted {
                    self.accepted = true;
                    log::info!("Accepted!");
                    effects.extend([
                        Effect::PressAccept,
                        Effect::HideEvasive,
                        Effect::LaunchConfetti,
                        Effect::ShowVideo {
                            src: self.settings.video_src.clone(),
                        },
                    ]);
                }
            }
        }
        effects
    }

    /// Route a stage completion through the gate machine
    fn complete(&mut self, event: StageEvent, effects: &mut Vec<Effect>) {
        if let Some((gate, regions)) = self.gates.handle(event) {
            effects.push(Effect::OpenGate(gate));
            effects.extend(regions.into_iter().map(Effect::Unlock));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::Polarity;

    fn experience() -> Experience {
        Experience::new(Settings::default(), 2024)
    }

    fn indices(exp: &Experience, polarity: Polarity) -> Vec<usize> {
        exp.quiz()
            .items()
            .iter()
            .enumerate()
            .filter(|(_, i)| i.polarity == polarity)
            .map(|(i, _)| i)
            .collect()
    }

    fn count_gate_effects(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::OpenGate(_) | Effect::Unlock(_)))
            .count()
    }

    #[test]
    fn test_quiz_opens_first_gate_once() {
        let mut exp = experience();
        let good = indices(&exp, Polarity::Affirming);
        let bad = indices(&exp, Polarity::Rejecting);

        let (last, rest) = good.split_last().unwrap();
        for (n, &i) in rest.iter().enumerate() {
            let effects = exp.dispatch(Input::QuizClick(i));
            assert_eq!(effects, vec![Effect::QuizSelected(i)]);
            // Interleave rejects
            let b = bad[n % bad.len()];
            assert_eq!(exp.dispatch(Input::QuizClick(b)), vec![Effect::QuizRejected(b)]);
        }
        assert!(!exp.gates().is_open(GateId::G1));

        let effects = exp.dispatch(Input::QuizClick(*last));
        assert_eq!(
            effects,
            vec![
                Effect::QuizSelected(*last),
                Effect::QuizCompleteShown,
                Effect::OpenGate(GateId::G1),
                Effect::Unlock(Region::AfterGate(GateId::G1)),
            ]
        );
        assert!(exp.dispatch(Input::QuizClick(*last)).is_empty());
    }

    #[test]
    fn test_rose_rejections() {
        let mut exp = experience();
        assert_eq!(
            exp.dispatch(Input::RoseSubmitted("0".into())),
            vec![
                Effect::ShowRoseError("Zero? Really? Try again!"),
                Effect::Shake(InputField::RoseCount)
            ]
        );
        for raw in ["", "abc"] {
            assert_eq!(
                exp.dispatch(Input::RoseSubmitted(raw.into())),
                vec![
                    Effect::ShowRoseError("Please enter a valid number!"),
                    Effect::Shake(InputField::RoseCount)
                ]
            );
        }
        assert!(!exp.gates().is_open(GateId::G2));
    }

    #[test]
    fn test_rose_lock_builds_bouquet_then_opens_gate() {
        let mut exp = experience();
        let effects = exp.dispatch(Input::RoseSubmitted("12".into()));
        assert_eq!(effects.len(), 4);
        assert_eq!(
            effects[0],
            Effect::LockInput {
                field: InputField::RoseCount,
                label: "Locked in: 12 roses".into()
            }
        );
        match &effects[1] {
            Effect::RenderBouquet(items) => assert_eq!(items.len(), 12),
            other => panic!("expected bouquet, got {other:?}"),
        }
        assert_eq!(effects[2], Effect::OpenGate(GateId::G2));
        assert_eq!(effects[3], Effect::Unlock(Region::AfterGate(GateId::G2)));
        assert_eq!(exp.rose_count(), Some(12));

        // Locked: edits and submits do nothing
        assert!(exp.dispatch(Input::RoseSubmitted("3".into())).is_empty());
        assert!(exp.dispatch(Input::RoseEdited("3".into())).is_empty());
    }

    #[test]
    fn test_rose_bouquet_is_capped() {
        let mut exp = experience();
        let effects = exp.dispatch(Input::RoseSubmitted("500".into()));
        assert!(effects.iter().any(|e| matches!(e, Effect::RenderBouquet(items) if items.len() == 100)));
    }

    #[test]
    fn test_rose_edit_filters_digits() {
        let mut exp = experience();
        assert_eq!(
            exp.dispatch(Input::RoseEdited("1x2".into())),
            vec![
                Effect::SetInputValue {
                    field: InputField::RoseCount,
                    value: "12".into()
                },
                Effect::ClearRoseError
            ]
        );
    }

    #[test]
    fn test_favorite_flow_opens_last_gate_and_final() {
        let mut exp = experience();
        assert_eq!(
            exp.dispatch(Input::FavoriteSubmitted("   ".into())),
            vec![Effect::Shake(InputField::Favorite)]
        );
        assert_eq!(
            exp.dispatch(Input::FavoriteSubmitted("your laugh".into())),
            vec![
                Effect::LockInput {
                    field: InputField::Favorite,
                    label: "Locked in!".into()
                },
                Effect::ScheduleOverlay { delay_ms: 300 }
            ]
        );
        // Dismiss before the overlay shows is ignored
        assert!(exp.dispatch(Input::OverlayDismissed).is_empty());
        assert_eq!(exp.dispatch(Input::OverlayDue), vec![Effect::ShowOverlay]);
        assert_eq!(
            exp.dispatch(Input::OverlayDismissed),
            vec![
                Effect::HideOverlay,
                Effect::OpenGate(GateId::G3),
                Effect::Unlock(Region::AfterGate(GateId::G3)),
                Effect::Unlock(Region::Final),
            ]
        );
        assert_eq!(count_gate_effects(&exp.dispatch(Input::OverlayDismissed)), 0);
    }

    #[test]
    fn test_accept_once() {
        let mut exp = experience();
        let effects = exp.dispatch(Input::Accept);
        assert!(effects.contains(&Effect::HideEvasive));
        assert!(effects.contains(&Effect::LaunchConfetti));
        assert!(effects.iter().any(|e| matches!(e, Effect::ShowVideo { src } if src.contains("youtube"))));
        assert!(exp.is_accepted());
        assert!(exp.dispatch(Input::Accept).is_empty());
    }

    #[test]
    fn test_full_walkthrough_opens_each_gate_once() {
        let mut exp = experience();
        let mut all = Vec::new();
        for i in indices(&exp, Polarity::Affirming) {
            all.extend(exp.dispatch(Input::QuizClick(i)));
        }
        all.extend(exp.dispatch(Input::RoseSubmitted("7".into())));
        all.extend(exp.dispatch(Input::FavoriteSubmitted("all of it".into())));
        all.extend(exp.dispatch(Input::OverlayDue));
        all.extend(exp.dispatch(Input::OverlayDismissed));

        let opened: Vec<GateId> = all
            .iter()
            .filter_map(|e| match e {
                Effect::OpenGate(g) => Some(*g),
                _ => None,
            })
            .collect();
        assert_eq!(opened, vec![GateId::G1, GateId::G2, GateId::G3]);
        assert_eq!(exp.gates().open_count(), 3);
    }
}
