use super::Team;

/// Round/turn state machine phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Deployed, battle not started yet.
    #[default]
    Deployment,
    RoundStart,
    /// The given team is taking its half of the round.
    Acting(Team),
    RoundEnd,
    /// Battle over; no further transitions.
    Finished,
}

/// Per-team turn economy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamState {
    /// Action energy, refilled at the team's turn start.
    pub energy: u32,
    /// Secondary currency accumulated from unspent energy.
    pub reserve: u32,
    /// Swaps used this round.
    pub swaps_used: u32,
    /// Attacks landed during the current turn.
    pub combo: u32,
    /// The team already had its turn this round.
    pub acted_this_round: bool,
}

/// Logical deadline for auto-resolving the non-interactive team's turn.
///
/// The engine has no clock: the host supplies monotonic milliseconds when
/// arming and polling, and drives the turn when it comes due.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoTurnTimer {
    /// Team whose turn is waiting to auto-resolve.
    pub pending: Option<Team>,
    /// Absolute deadline in host milliseconds, once armed.
    pub deadline_ms: Option<u64>,
}

impl AutoTurnTimer {
    pub fn request(&mut self, team: Team) {
        self.pending = Some(team);
        self.deadline_ms = None;
    }

    /// Arms the pending request. No-op without one.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        if self.pending.is_some() {
            self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline_ms = None;
    }

    /// The team whose turn is due at `now_ms`.
    pub fn due(&self, now_ms: u64) -> Option<Team> {
        match (self.pending, self.deadline_ms) {
            (Some(team), Some(deadline)) if now_ms >= deadline => Some(team),
            _ => None,
        }
    }
}

/// Round and turn bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Current round, starting at 1 once the battle starts.
    pub round: u32,
    pub phase: TurnPhase,
    /// Team that won initiative this round.
    pub first_team: Option<Team>,
    /// Team that acted second last round; wins initiative ties.
    pub previous_second: Option<Team>,
    teams: [TeamState; 2],
    pub auto_turn: AutoTurnTimer,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(&self, team: Team) -> &TeamState {
        &self.teams[team.index()]
    }

    pub fn team_mut(&mut self, team: Team) -> &mut TeamState {
        &mut self.teams[team.index()]
    }

    /// Team currently acting, if any.
    pub fn acting_team(&self) -> Option<Team> {
        match self.phase {
            TurnPhase::Acting(team) => Some(team),
            _ => None,
        }
    }

    /// True when `team` acts first this round.
    pub fn holds_initiative(&self, team: Team) -> bool {
        self.first_team == Some(team)
    }
}
