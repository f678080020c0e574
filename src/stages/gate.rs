//! Gate unlock state machine
//!
//! Gates only ever go from closed to open. Opening one unlocks the gated
//! section that follows it in the page; the last gate also unlocks the final
//! section. Ordering is not enforced here: a stage's controls only become
//! reachable once the previous section is unlocked.


/// Gate identity, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateId {
    G1,
    G2,
    G3,
}

impl GateId {
    pub const ALL: [GateId; 3] = [GateId::G1, GateId::G2, GateId::G3];

    /// Element id of the gate control in the page
    pub fn element_id(&self) -> &'static str {
        match self {
            GateId::G1 => "gate1",
            GateId::G2 => "gate2",
            GateId::G3 => "gate3",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.element_id() == id)
    }

    fn index(&self) -> usize {
        match self {
            GateId::G1 => 0,
            GateId::G2 => 1,
            GateId::G3 => 2,
        }
    }

    /// Whether this gate also unlocks the final section
    pub fn is_last(&self) -> bool {
        self.index() == Self::ALL.len() - 1
    }
}

/// A content region a gate can unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The gated section directly after the gate control
    AfterGate(GateId),
    /// The separately identified final section
    Final,
}

/// A stage reporting that its completion condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    QuizCompleted,
    RoseCountLocked(u32),
    WrongAnswerDismissed,
}

impl StageEvent {
    /// Gate each stage completion opens
    pub fn gate(&self) -> GateId {
        match self {
            StageEvent::QuizCompleted => GateId::G1,
            StageEvent::RoseCountLocked(_) => GateId::G2,
            StageEvent::WrongAnswerDismissed => GateId::G3,
        }
    }
}

/// Open flags for every gate
#[derive(Debug, Clone, Default)]
pub struct GateMachine {
    open: [bool; 3],
}

impl GateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, gate: GateId) -> bool {
        self.open[gate.index()]
    }

    /// Open a gate and return the regions it unlocks, in order.
    ///
    /// An already-open gate returns `None` so no unlock or visibility
    /// registration happens twice.
    pub fn open(&mut self, gate: GateId) -> Option<Vec<Region>> {
        if self.is_open(gate) {
            log::debug!("Gate {:?} already open", gate);
            return None;
        }
        self.open[gate.index()] = true;
        log::info!("Gate {:?} opened", gate);

        let mut regions = vec![Region::AfterGate(gate)];
        if gate.is_last() {
            regions.push(Region::Final);
        }
        Some(regions)
    }

    /// Consume a stage completion
    pub fn handle(&mut self, event: StageEvent) -> Option<(GateId, Vec<Region>)> {
        let gate = event.gate();
        self.open(gate).map(|regions| (gate, regions))
    }

    /// Number of open gates
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|o| **o).count()
    }
}
