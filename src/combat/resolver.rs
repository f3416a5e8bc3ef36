//! Attack legality and resolution.
//!
//! ## Legality
//!
//! - The attacker must be ready: `can_attack`, attack above zero, and
//!   attacks left this turn (one, two with Windfury)
//! - Only enemy characters can be attacked
//! - If any enemy minion has Taunt, only Taunt minions can be attacked
//! - A Rush minion cannot attack heroes on the turn it was played
//!
//! ## Resolution
//!
//! Combat damage is simultaneous: both sides read their attack before
//! either takes damage. Divine Shield swallows a whole damage instance.
//! Lifesteal heals the holder's hero by the damage actually dealt, for
//! attackers and defenders alike. Heroes never hit back, but a minion
//! attacked by a hero hits the hero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::Keyword;
use crate::core::{ActionError, EntityId, GameState, PlayerState, Side, Target};

/// Up to a full board of targets plus the hero, without allocating.
pub type TargetList = SmallVec<[Target; 8]>;

/// Who is swinging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attacker {
    Minion(EntityId),
    /// The hero, with its weapon.
    Hero,
}

/// What one attack did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatOutcome {
    /// Damage that landed on the defender (zero if a shield took it).
    pub damage_to_defender: i32,
    /// Counter-damage that landed on the attacker.
    pub damage_to_attacker: i32,
    pub defender_shield_broken: bool,
    pub attacker_shield_broken: bool,
    /// Lifesteal healing received by the attacking side's hero.
    pub attacker_healed: i32,
    /// Lifesteal healing received by the defending side's hero.
    pub defender_healed: i32,
    /// Durability left on the attacking hero's weapon.
    pub weapon_durability: Option<i32>,
}

/// Checks and resolves attacks.
pub struct CombatResolver;

impl CombatResolver {
    /// Every target the attacker may legally hit right now.
    #[must_use]
    pub fn legal_targets(state: &GameState, side: Side, attacker: Attacker) -> TargetList {
        if Self::check_attacker(state, side, attacker).is_err() {
            return TargetList::new();
        }
        let enemy = side.other();
        let defenders = state.player(enemy);

        if defenders.has_taunt() {
            return defenders
                .board
                .iter()
                .filter(|m| m.has_keyword(Keyword::Taunt))
                .map(|m| Target::Minion(m.id))
                .collect();
        }

        let mut targets: TargetList = defenders.board.iter().map(|m| Target::Minion(m.id)).collect();
        if !Self::hero_off_limits(state, side, attacker) {
            targets.push(Target::Hero(enemy));
        }
        targets
    }

    /// Check an attack without resolving it.
    pub fn validate(
        state: &GameState,
        side: Side,
        attacker: Attacker,
        target: Target,
    ) -> Result<(), ActionError> {
        Self::check_attacker(state, side, attacker)?;

        let enemy = side.other();
        let defenders = state.player(enemy);
        match target {
            Target::Hero(hero) if hero != enemy => return Err(ActionError::InvalidTarget),
            Target::Hero(_) => {
                if defenders.has_taunt() {
                    return Err(ActionError::TauntBlocks);
                }
                if Self::hero_off_limits(state, side, attacker) {
                    return Err(ActionError::RushCannotAttackHero);
                }
            }
            Target::Minion(id) => {
                let Some(defender) = defenders.minion(id) else {
                    return if state.player(side).minion(id).is_some() {
                        Err(ActionError::InvalidTarget)
                    } else {
                        Err(ActionError::MinionNotFound(id))
                    };
                };
                if defenders.has_taunt() && !defender.has_keyword(Keyword::Taunt) {
                    return Err(ActionError::TauntBlocks);
                }
            }
        }
        Ok(())
    }

    fn check_attacker(state: &GameState, side: Side, attacker: Attacker) -> Result<(), ActionError> {
        let player = state.player(side);
        match attacker {
            Attacker::Minion(id) => {
                let minion = player.minion(id).ok_or(ActionError::MinionNotFound(id))?;
                if !minion.can_attack {
                    return Err(ActionError::AttackerExhausted);
                }
                if minion.attack <= 0 {
                    return Err(ActionError::NoAttackValue);
                }
                if minion.attacks_this_turn >= minion.max_attacks() {
                    return Err(ActionError::AttackLimitReached);
                }
            }
            Attacker::Hero => {
                let weapon = player.weapon.as_ref().ok_or(ActionError::NoWeapon)?;
                if weapon.attack <= 0 {
                    return Err(ActionError::NoAttackValue);
                }
                if player.hero_attacks_this_turn >= weapon.max_attacks() {
                    return Err(ActionError::AttackLimitReached);
                }
            }
        }
        Ok(())
    }

    fn hero_off_limits(state: &GameState, side: Side, attacker: Attacker) -> bool {
        match attacker {
            Attacker::Minion(id) => state
                .player(side)
                .minion(id)
                .is_some_and(|m| m.restricted_to_minions()),
            Attacker::Hero => false,
        }
    }

    /// Validate and resolve an attack. Dead minions stay on the board
    /// until the caller checks deaths.
    pub fn attack(
        state: &mut GameState,
        side: Side,
        attacker: Attacker,
        target: Target,
    ) -> Result<CombatOutcome, ActionError> {
        Self::validate(state, side, attacker, target)?;

        let (mine, theirs) = state.players.split_mut(side);
        let outcome = match (attacker, target) {
            (Attacker::Minion(a), Target::Minion(d)) => minion_vs_minion(mine, theirs, a, d),
            (Attacker::Minion(a), Target::Hero(_)) => minion_vs_hero(mine, theirs, a),
            (Attacker::Hero, Target::Minion(d)) => hero_vs_minion(mine, theirs, d),
            (Attacker::Hero, Target::Hero(_)) => hero_vs_hero(mine, theirs),
        };

        debug!(%side, ?attacker, ?target, ?outcome, "attack resolved");
        Ok(outcome)
    }
}

fn lifesteal(hero: &mut PlayerState, holder_has_it: bool, dealt: i32) -> i32 {
    if holder_has_it && dealt > 0 {
        hero.heal_hero(dealt)
    } else {
        0
    }
}

fn minion_vs_minion(mine: &mut PlayerState, theirs: &mut PlayerState, a: EntityId, d: EntityId) -> CombatOutcome {
    let (Some(ai), Some(di)) = (mine.minion_index(a), theirs.minion_index(d)) else {
        debug_assert!(false, "combatants vanished after validation");
        return CombatOutcome::default();
    };
    let attacker = &mut mine.board[ai];
    let defender = &mut theirs.board[di];

    let (attack_power, counter_power) = (attacker.attack, defender.attack);
    let (attacker_shield, defender_shield) = (attacker.has_divine_shield, defender.has_divine_shield);

    let to_defender = defender.take_damage(attack_power);
    let to_attacker = attacker.take_damage(counter_power);
    attacker.attacks_this_turn += 1;

    let attacker_lifesteal = attacker.has_keyword(Keyword::Lifesteal);
    let defender_lifesteal = defender.has_keyword(Keyword::Lifesteal);

    CombatOutcome {
        damage_to_defender: to_defender,
        damage_to_attacker: to_attacker,
        defender_shield_broken: defender_shield && !theirs.board[di].has_divine_shield,
        attacker_shield_broken: attacker_shield && !mine.board[ai].has_divine_shield,
        attacker_healed: lifesteal(mine, attacker_lifesteal, to_defender),
        defender_healed: lifesteal(theirs, defender_lifesteal, to_attacker),
        weapon_durability: None,
    }
}

fn minion_vs_hero(mine: &mut PlayerState, theirs: &mut PlayerState, a: EntityId) -> CombatOutcome {
    let Some(ai) = mine.minion_index(a) else {
        debug_assert!(false, "attacker vanished after validation");
        return CombatOutcome::default();
    };
    let attacker = &mut mine.board[ai];
    attacker.attacks_this_turn += 1;
    let power = attacker.attack;
    let has_lifesteal = attacker.has_keyword(Keyword::Lifesteal);

    let dealt = theirs.damage_hero(power);
    CombatOutcome {
        damage_to_defender: dealt,
        attacker_healed: lifesteal(mine, has_lifesteal, dealt),
        ..CombatOutcome::default()
    }
}

fn hero_vs_minion(mine: &mut PlayerState, theirs: &mut PlayerState, d: EntityId) -> CombatOutcome {
    let (Some(weapon), Some(di)) = (mine.weapon.as_mut(), theirs.minion_index(d)) else {
        debug_assert!(false, "weapon or defender vanished after validation");
        return CombatOutcome::default();
    };
    let power = weapon.attack;
    let weapon_lifesteal = weapon.has_keyword(Keyword::Lifesteal);
    weapon.durability -= 1;
    let durability = weapon.durability;

    let defender = &mut theirs.board[di];
    let had_shield = defender.has_divine_shield;
    let to_defender = defender.take_damage(power);
    let counter = defender.attack;
    let defender_lifesteal = defender.has_keyword(Keyword::Lifesteal);
    let shield_broken = had_shield && !defender.has_divine_shield;

    mine.hero_attacks_this_turn += 1;
    let to_attacker = mine.damage_hero(counter);

    CombatOutcome {
        damage_to_defender: to_defender,
        damage_to_attacker: to_attacker,
        defender_shield_broken: shield_broken,
        attacker_shield_broken: false,
        attacker_healed: lifesteal(mine, weapon_lifesteal, to_defender),
        defender_healed: lifesteal(theirs, defender_lifesteal, to_attacker),
        weapon_durability: Some(durability),
    }
}

fn hero_vs_hero(mine: &mut PlayerState, theirs: &mut PlayerState) -> CombatOutcome {
    let Some(weapon) = mine.weapon.as_mut() else {
        debug_assert!(false, "weapon vanished after validation");
        return CombatOutcome::default();
    };
    let power = weapon.attack;
    let weapon_lifesteal = weapon.has_keyword(Keyword::Lifesteal);
    weapon.durability -= 1;
    let durability = weapon.durability;
    mine.hero_attacks_this_turn += 1;

    let dealt = theirs.damage_hero(power);
    CombatOutcome {
        damage_to_defender: dealt,
        attacker_healed: lifesteal(mine, weapon_lifesteal, dealt),
        weapon_durability: Some(durability),
        ..CombatOutcome::default()
    }
}
