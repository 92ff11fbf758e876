//! Initiative and turn control.
//!
//! ```text
//! Deployment -> RoundStart -> Acting(first) -> Acting(second) -> RoundEnd -+
//!                   ^                                                       |
//!                   +-------------------------------------------------------+
//! ```
//!
//! Any state moves to `Finished` as soon as a team is eliminated or loses its
//! captain.

use tracing::{debug, info};

use crate::state::{CombatantId, StatusKind, Team, TurnPhase, UnitFlags};

use super::BattleEngine;
use super::errors::{HealError, SwapError, TurnError};
use super::events::{BattleEvent, Resource};

/// Where the battle went after a team ended its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnTransition {
    /// The other team acts next in the same round.
    NextTurn { team: Team },
    /// Both teams acted; a new round began.
    NewRound { round: u32, first: Team },
    BattleEnded { winner: Option<Team> },
}

impl<'a> BattleEngine<'a> {
    /// Leaves deployment and starts round 1. Returns the team acting first.
    pub fn start_battle(&mut self) -> Result<Team, TurnError> {
        if !self.state.is_active() {
            return Err(TurnError::BattleOver);
        }
        if self.state.turn.phase != TurnPhase::Deployment {
            return Err(TurnError::AlreadyStarted);
        }
        info!(
            target: "core::turns",
            combatants = self.state.roster.len(),
            "battle started"
        );
        if self.check_battle_end() {
            return Err(TurnError::BattleOver);
        }
        Ok(self.begin_round())
    }

    /// Team that acts first if a round started now.
    ///
    /// Higher total Speed over active units wins; ties go to the team that
    /// acted second last round, and to Team A in round 1.
    pub fn initiative(&self) -> Team {
        let speed = |team: Team| -> u64 {
            self.state
                .team_members(team)
                .filter(|c| c.is_active())
                .map(|c| u64::from(c.stats.speed))
                .sum()
        };
        match speed(Team::A).cmp(&speed(Team::B)) {
            std::cmp::Ordering::Greater => Team::A,
            std::cmp::Ordering::Less => Team::B,
            std::cmp::Ordering::Equal => self.state.turn.previous_second.unwrap_or(Team::A),
        }
    }

    fn begin_round(&mut self) -> Team {
        let first = self.initiative();

        let turn = &mut self.state.turn;
        turn.round += 1;
        turn.phase = TurnPhase::RoundStart;
        turn.first_team = Some(first);
        for team in [Team::A, Team::B] {
            let state = turn.team_mut(team);
            state.swaps_used = 0;
            state.combo = 0;
            state.acted_this_round = false;
        }
        let round = turn.round;

        for combatant in &mut self.state.roster {
            combatant.reset_round();
        }

        info!(target: "core::turns", round, %first, "round started");
        self.emit(BattleEvent::RoundStarted { round, first });
        self.begin_turn(first);
        first
    }

    fn begin_turn(&mut self, team: Team) {
        let config = self.env.config;
        let holds_initiative = self.state.turn.holds_initiative(team);
        let round = self.state.turn.round;

        self.state.turn.phase = TurnPhase::Acting(team);
        let state = self.state.turn.team_mut(team);
        state.energy = config.energy_per_turn;
        state.combo = 0;
        let energy = state.energy;

        let mut expired = Vec::new();
        for combatant in self
            .state
            .roster
            .iter_mut()
            .filter(|c| c.team == team && c.is_active())
        {
            let report = combatant.effects.tick_turn_start();
            expired.extend(report.expired.into_iter().map(|kind| (combatant.id, kind)));
            if holds_initiative {
                combatant.flags.insert(UnitFlags::FIRST_ACTION);
            }
        }

        if config.is_auto_team(team) {
            self.state.turn.auto_turn.request(team);
        } else {
            self.state.turn.auto_turn.cancel();
        }

        debug!(target: "core::turns", round, %team, energy, "turn started");
        self.emit(BattleEvent::TurnStarted { round, team });
        self.emit(BattleEvent::ResourceChanged {
            team,
            resource: Resource::Energy,
            value: energy,
        });
        for (target, kind) in expired {
            self.emit(BattleEvent::StatusExpired { target, kind });
        }
    }

    /// Ends `team`'s half of the round.
    ///
    /// Runs turn-end status ticks (bleeding included) for the team, converts
    /// unspent energy to reserve, then hands over to the other team or starts
    /// the next round.
    pub fn end_turn(&mut self, team: Team) -> Result<TurnTransition, TurnError> {
        if !self.state.is_active() {
            return Err(TurnError::BattleOver);
        }
        let acting = self.state.turn.acting_team();
        if acting.is_none() && self.state.turn.phase == TurnPhase::Deployment {
            return Err(TurnError::NotStarted);
        }
        if acting != Some(team) {
            return Err(TurnError::NotYourTurn { team, acting });
        }

        let reports: Vec<_> = self
            .state
            .roster
            .iter_mut()
            .filter(|c| c.team == team && c.is_active())
            .map(|c| (c.id, c.effects.tick_turn_end()))
            .collect();
        for (target, report) in reports {
            for kind in report.expired {
                self.emit(BattleEvent::StatusExpired { target, kind });
            }
            if report.bleed_damage > 0 {
                self.bleed(target, report.bleed_damage);
            }
        }

        let rate = self.env.config.energy_to_reserve;
        let round = self.state.turn.round;
        let state = self.state.turn.team_mut(team);
        let leftover = std::mem::take(&mut state.energy);
        let gained = leftover.saturating_mul(rate);
        state.reserve = state.reserve.saturating_add(gained);
        state.acted_this_round = true;
        let reserve = state.reserve;
        self.state.turn.auto_turn.cancel();

        self.emit(BattleEvent::ResourceChanged {
            team,
            resource: Resource::Energy,
            value: 0,
        });
        if gained > 0 {
            self.emit(BattleEvent::ResourceChanged {
                team,
                resource: Resource::Reserve,
                value: reserve,
            });
        }
        debug!(target: "core::turns", round, %team, reserve, "turn ended");
        self.emit(BattleEvent::TurnEnded { round, team });

        if self.check_battle_end() {
            return Ok(TurnTransition::BattleEnded {
                winner: self.state.winner(),
            });
        }

        let other = team.other();
        if !self.state.turn.team(other).acted_this_round {
            self.begin_turn(other);
            return Ok(TurnTransition::NextTurn { team: other });
        }

        self.state.turn.phase = TurnPhase::RoundEnd;
        self.state.turn.previous_second = Some(team);
        let first = self.begin_round();
        Ok(TurnTransition::NewRound {
            round: self.state.turn.round,
            first,
        })
    }

    fn bleed(&mut self, target: CombatantId, amount: u32) {
        let Some(unit) = self.state.combatant_mut(target) else {
            return;
        };
        let lost = unit.lose_health(amount);
        if lost > 0 {
            self.emit(BattleEvent::Damaged {
                target,
                amount: lost,
                hull_absorbed: 0,
                source: None,
            });
        }
        self.settle_fate(target);
    }

    /// Exchanges the tiles of two allies on the acting team.
    ///
    /// Each unit swaps at most once per round. A swap initiated by a unit
    /// holding FreeMove spends one use of it instead of the team's budget.
    pub fn swap(&mut self, first: CombatantId, second: CombatantId) -> Result<(), SwapError> {
        if !self.state.is_active() {
            return Err(SwapError::BattleOver);
        }
        let acting = self
            .state
            .turn
            .acting_team()
            .ok_or(SwapError::NoActingTeam)?;
        if first == second {
            return Err(SwapError::SameCombatant);
        }

        let mut positions = [None; 2];
        for (slot, id) in positions.iter_mut().zip([first, second]) {
            let unit = self
                .state
                .combatant(id)
                .ok_or(SwapError::UnknownCombatant(id))?;
            if unit.team != acting {
                return Err(SwapError::WrongTeam { id, acting });
            }
            if !unit.is_active() || unit.position.is_none() {
                return Err(SwapError::Unavailable(id));
            }
            if unit.effects.is_stunned() {
                return Err(SwapError::Stunned(id));
            }
            if unit.effects.is_trapped() {
                return Err(SwapError::Trapped(id));
            }
            if unit.flags.contains(UnitFlags::SWAPPED) {
                return Err(SwapError::AlreadySwapped(id));
            }
            *slot = unit.position;
        }

        let free_move = self
            .state
            .combatant(first)
            .is_some_and(|unit| unit.effects.has_free_move());
        let max = self.env.config.max_swaps_per_round;
        if !free_move && self.state.turn.team(acting).swaps_used >= max {
            return Err(SwapError::BudgetExhausted { max });
        }

        let [first_position, second_position] = positions;
        let mut free_move_spent = false;
        if let Some(unit) = self.state.combatant_mut(first) {
            unit.position = second_position;
            unit.flags.insert(UnitFlags::SWAPPED);
            if free_move {
                free_move_spent = unit.effects.consume_charge(StatusKind::FreeMove);
            }
        }
        if let Some(unit) = self.state.combatant_mut(second) {
            unit.position = first_position;
            unit.flags.insert(UnitFlags::SWAPPED);
        }

        if free_move {
            if free_move_spent {
                self.emit(BattleEvent::StatusExpired {
                    target: first,
                    kind: StatusKind::FreeMove,
                });
            }
        } else {
            let state = self.state.turn.team_mut(acting);
            state.swaps_used += 1;
            let value = state.swaps_used;
            self.emit(BattleEvent::ResourceChanged {
                team: acting,
                resource: Resource::Swaps,
                value,
            });
        }

        debug!(target: "core::turns", %first, %second, free_move, "swapped");
        self.emit(BattleEvent::Swapped { first, second });
        Ok(())
    }

    /// Restores health outside an attack. Heal-blocked units gain nothing.
    pub fn heal(&mut self, target: CombatantId, amount: u32) -> Result<u32, HealError> {
        if !self.state.is_active() {
            return Err(HealError::BattleOver);
        }
        let unit = self
            .state
            .combatant(target)
            .ok_or(HealError::UnknownCombatant(target))?;
        if !unit.is_active() {
            return Err(HealError::TargetDown(target));
        }
        Ok(self.restore_health(target, amount))
    }

    /// Arms the pending auto-turn with the configured delay.
    ///
    /// Returns the deadline, or `None` when no auto-turn is pending.
    pub fn arm_auto_turn(&mut self, now_ms: u64) -> Option<u64> {
        let delay = self.env.config.auto_turn_delay_ms;
        let timer = &mut self.state.turn.auto_turn;
        timer.arm(now_ms, delay);
        timer.deadline_ms
    }

    /// Team whose turn should auto-resolve at `now_ms`.
    pub fn auto_turn_due(&self, now_ms: u64) -> Option<Team> {
        if !self.state.is_active() {
            return None;
        }
        self.state
            .turn
            .auto_turn
            .due(now_ms)
            .filter(|team| self.state.turn.acting_team() == Some(*team))
    }
}
