//! Rule violations reported back to the acting side.

use thiserror::Error;

use super::entity::EntityId;

/// Why the engine refused an action. The state is untouched when one of
/// these is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("it is not your turn")]
    NotYourTurn,

    #[error("the game is over")]
    GameOver,

    #[error("card {0} is not in your hand")]
    CardNotInHand(EntityId),

    #[error("not enough mana: need {needed}, have {available}")]
    NotEnoughMana { needed: u8, available: u8 },

    #[error("your board is full")]
    BoardFull,

    #[error("this card needs a target")]
    TargetRequired,

    #[error("invalid target")]
    InvalidTarget,

    #[error("minion {0} not found")]
    MinionNotFound(EntityId),

    #[error("that minion cannot attack yet")]
    AttackerExhausted,

    #[error("attacker has no attack")]
    NoAttackValue,

    #[error("no attacks left this turn")]
    AttackLimitReached,

    #[error("a minion with taunt is in the way")]
    TauntBlocks,

    #[error("rush minions cannot attack heroes on the turn they are played")]
    RushCannotAttackHero,

    #[error("your hero has no weapon")]
    NoWeapon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            ActionError::NotEnoughMana { needed: 4, available: 2 }.to_string(),
            "not enough mana: need 4, have 2"
        );
        assert_eq!(ActionError::CardNotInHand(EntityId(3)).to_string(), "card Entity(3) is not in your hand");
    }
}
