//! Effect resolution.
//!
//! Resolution is two steps:
//!
//! 1. [`EffectResolver::resolve`] turns a descriptor and its context into
//!    an ordered list of [`EffectAction`]s, one per affected entity. Random
//!    selectors draw from the state RNG here.
//! 2. [`EffectResolver::apply`] applies the list in order. Actions whose
//!    target has since left play are skipped.
//!
//! Area effects visit the caster's board left to right, then the enemy
//! board, then the caster's hero and the enemy hero.

use tracing::debug;

use super::effect::{EffectAction, EffectDescriptor, EffectKind};
use super::targeting::TargetSelector;
use crate::cards::MinionInstance;
use crate::core::{EntityId, GameState, RulesConfig, Side, Target};

/// Who is casting, from where, and at what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub caster: Side,
    /// The minion carrying the effect (battlecries).
    pub source: Option<EntityId>,
    /// The manually chosen target, if any.
    pub target: Option<Target>,
}

impl EffectContext {
    #[must_use]
    pub fn new(caster: Side) -> Self {
        Self {
            caster,
            source: None,
            target: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: Option<Target>) -> Self {
        self.target = target;
        self
    }
}

/// Resolves and applies card effects.
pub struct EffectResolver;

impl EffectResolver {
    /// Expand an effect into atomic actions.
    ///
    /// Manual selectors yield nothing when the context has no target or the
    /// target does not fit the selector.
    pub fn resolve(
        state: &mut GameState,
        effect: &EffectDescriptor,
        ctx: &EffectContext,
    ) -> Vec<EffectAction> {
        let targets = Self::select(state, effect, ctx);

        match &effect.kind {
            EffectKind::Buff { attack, health } => minions(&targets)
                .map(|minion| EffectAction::BuffMinion {
                    minion,
                    attack: *attack,
                    health: *health,
                })
                .collect(),
            EffectKind::Destroy => minions(&targets)
                .map(|minion| EffectAction::DestroyMinion { minion })
                .collect(),
            EffectKind::Damage { amount } => targets
                .iter()
                .map(|target| match *target {
                    Target::Minion(minion) => EffectAction::DamageMinion { minion, amount: *amount },
                    Target::Hero(side) => EffectAction::DamageHero { side, amount: *amount },
                })
                .collect(),
            EffectKind::Heal { amount } => targets
                .iter()
                .map(|target| match *target {
                    Target::Minion(minion) => EffectAction::HealMinion { minion, amount: *amount },
                    Target::Hero(side) => EffectAction::HealHero { side, amount: *amount },
                })
                .collect(),
            EffectKind::Draw { count } => Self::resource_side(state, &targets)
                .map(|side| EffectAction::DrawCards { side, count: *count })
                .into_iter()
                .collect(),
            EffectKind::RefreshMana { amount } => Self::resource_side(state, &targets)
                .map(|side| EffectAction::RefreshMana { side, amount: *amount })
                .into_iter()
                .collect(),
            EffectKind::Summon { token, count } => Self::resource_side(state, &targets)
                .map(|side| {
                    (0..*count)
                        .map(|_| EffectAction::SummonMinion {
                            side,
                            token: token.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// The characters a descriptor reaches, in application order.
    fn select(state: &mut GameState, effect: &EffectDescriptor, ctx: &EffectContext) -> Vec<Target> {
        let caster = ctx.caster;
        let enemy = caster.other();

        match effect.target {
            TargetSelector::None => match effect.kind {
                EffectKind::Damage { .. } | EffectKind::Heal { .. } => {
                    let mut all = board(state, caster);
                    all.extend(board(state, enemy));
                    all.push(Target::Hero(caster));
                    all.push(Target::Hero(enemy));
                    all
                }
                EffectKind::Buff { .. } | EffectKind::Destroy => {
                    let mut all = board(state, caster);
                    all.extend(board(state, enemy));
                    all
                }
                _ => vec![Target::Hero(caster)],
            },
            TargetSelector::AllFriendlyMinions => board(state, caster),
            TargetSelector::AllEnemyMinions => board(state, enemy),
            TargetSelector::AllOtherFriendlyMinions => board(state, caster)
                .into_iter()
                .filter(|t| t.minion_id() != ctx.source)
                .collect(),
            selector if selector.is_manual() => ctx
                .target
                .filter(|&target| selector.accepts(state, caster, target))
                .into_iter()
                .collect(),
            TargetSelector::RandomFriendlyMinion => {
                let pool = board(state, caster);
                Self::pick(state, pool)
            }
            TargetSelector::RandomEnemyMinion => {
                let pool = board(state, enemy);
                Self::pick(state, pool)
            }
            TargetSelector::RandomEnemyCharacter => {
                let mut pool = board(state, enemy);
                pool.push(Target::Hero(enemy));
                Self::pick(state, pool)
            }
            _ => Vec::new(),
        }
    }

    fn pick(state: &mut GameState, pool: Vec<Target>) -> Vec<Target> {
        state.rng_mut().choose(&pool).copied().into_iter().collect()
    }

    /// The side that gains a resource effect (draw, mana, summon).
    fn resource_side(state: &GameState, targets: &[Target]) -> Option<Side> {
        match targets.first()? {
            Target::Hero(side) => Some(*side),
            Target::Minion(id) => state.minion_owner(*id),
        }
    }

    /// Apply actions in order.
    pub fn apply(state: &mut GameState, config: &RulesConfig, actions: &[EffectAction]) {
        for action in actions {
            Self::apply_one(state, config, action);
        }
    }

    /// Apply a single action. Missing targets are skipped.
    pub fn apply_one(state: &mut GameState, config: &RulesConfig, action: &EffectAction) {
        debug!(?action, "applying effect action");
        match action {
            EffectAction::BuffMinion { minion, attack, health } => {
                if let Some(m) = state.minion_mut(*minion) {
                    m.buff(*attack, *health);
                }
            }
            EffectAction::DamageMinion { minion, amount } => {
                if let Some(m) = state.minion_mut(*minion) {
                    m.take_damage(*amount);
                }
            }
            EffectAction::DamageHero { side, amount } => {
                state.player_mut(*side).damage_hero(*amount);
            }
            EffectAction::HealMinion { minion, amount } => {
                if let Some(m) = state.minion_mut(*minion) {
                    m.heal(*amount);
                }
            }
            EffectAction::HealHero { side, amount } => {
                state.player_mut(*side).heal_hero(*amount);
            }
            EffectAction::DrawCards { side, count } => {
                for _ in 0..*count {
                    let outcome = state.player_mut(*side).draw(config);
                    debug!(%side, ?outcome, "effect draw");
                }
            }
            EffectAction::SummonMinion { side, token } => {
                if state.player(*side).board.len() >= config.max_board {
                    debug!(%side, "board full, summon fizzles");
                    return;
                }
                let id = state.alloc_entity();
                state
                    .player_mut(*side)
                    .board
                    .push_back(MinionInstance::from_token(id, token));
            }
            EffectAction::DestroyMinion { minion } => {
                if let Some(side) = state.minion_owner(*minion) {
                    let player = state.player_mut(side);
                    if let Some(index) = player.minion_index(*minion) {
                        player.board.remove(index);
                    }
                }
            }
            EffectAction::RefreshMana { side, amount } => {
                let player = state.player_mut(*side);
                player.mana = player.mana.saturating_add(*amount).min(player.max_mana);
            }
        }
    }
}

fn board(state: &GameState, side: Side) -> Vec<Target> {
    state
        .player(side)
        .board
        .iter()
        .map(|m| Target::Minion(m.id))
        .collect()
}

fn minions(targets: &[Target]) -> impl Iterator<Item = EntityId> + '_ {
    targets.iter().filter_map(|t| t.minion_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, Keyword};
    use crate::effects::TokenSpec;

    fn minion(attack: i32, health: i32) -> Card {
        Card::minion(CardId::new(1), "M", 1, attack, health)
    }

    fn setup() -> (GameState, Vec<EntityId>, Vec<EntityId>) {
        let mut state = GameState::new(&RulesConfig::default(), 7);
        let mine = vec![
            state.add_to_board(Side::Player, &minion(1, 1)),
            state.add_to_board(Side::Player, &minion(2, 2)),
        ];
        let theirs = vec![
            state.add_to_board(Side::Opponent, &minion(3, 3)),
            state.add_to_board(Side::Opponent, &minion(4, 4)),
        ];
        (state, mine, theirs)
    }

    fn resolve(state: &mut GameState, kind: EffectKind, selector: TargetSelector, ctx: EffectContext) -> Vec<EffectAction> {
        EffectResolver::resolve(state, &EffectDescriptor::new(kind, selector), &ctx)
    }

    #[test]
    fn test_all_other_friendly_skips_source() {
        let (mut state, mine, _) = setup();
        let ctx = EffectContext::new(Side::Player).with_source(mine[0]);

        let actions = resolve(&mut state, EffectKind::Buff { attack: 1, health: 1 }, TargetSelector::AllOtherFriendlyMinions, ctx);

        assert_eq!(actions, vec![EffectAction::BuffMinion { minion: mine[1], attack: 1, health: 1 }]);
    }

    #[test]
    fn test_all_friendly_includes_source() {
        let (mut state, mine, _) = setup();
        let ctx = EffectContext::new(Side::Player).with_source(mine[0]);

        let actions = resolve(&mut state, EffectKind::Buff { attack: 2, health: 2 }, TargetSelector::AllFriendlyMinions, ctx);

        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn test_manual_without_target_is_empty() {
        let (mut state, _, theirs) = setup();

        let none = resolve(&mut state, EffectKind::Damage { amount: 3 }, TargetSelector::EnemyMinion, EffectContext::new(Side::Player));
        assert!(none.is_empty());

        let wrong_side = EffectContext::new(Side::Opponent).with_target(Some(Target::Minion(theirs[0])));
        let none = resolve(&mut state, EffectKind::Damage { amount: 3 }, TargetSelector::EnemyMinion, wrong_side);
        assert!(none.is_empty());

        let ok = EffectContext::new(Side::Player).with_target(Some(Target::Minion(theirs[0])));
        let actions = resolve(&mut state, EffectKind::Damage { amount: 3 }, TargetSelector::EnemyMinion, ok);
        assert_eq!(actions, vec![EffectAction::DamageMinion { minion: theirs[0], amount: 3 }]);
    }

    #[test]
    fn test_none_damage_hits_everything_in_order() {
        let (mut state, mine, theirs) = setup();

        let actions = resolve(&mut state, EffectKind::Damage { amount: 1 }, TargetSelector::None, EffectContext::new(Side::Opponent));

        assert_eq!(
            actions,
            vec![
                EffectAction::DamageMinion { minion: theirs[0], amount: 1 },
                EffectAction::DamageMinion { minion: theirs[1], amount: 1 },
                EffectAction::DamageMinion { minion: mine[0], amount: 1 },
                EffectAction::DamageMinion { minion: mine[1], amount: 1 },
                EffectAction::DamageHero { side: Side::Opponent, amount: 1 },
                EffectAction::DamageHero { side: Side::Player, amount: 1 },
            ]
        );
    }

    #[test]
    fn test_none_draw_goes_to_caster() {
        let (mut state, _, _) = setup();
        let actions = resolve(&mut state, EffectKind::Draw { count: 2 }, TargetSelector::None, EffectContext::new(Side::Opponent));
        assert_eq!(actions, vec![EffectAction::DrawCards { side: Side::Opponent, count: 2 }]);
    }

    #[test]
    fn test_random_is_seeded_and_in_pool() {
        let (state, _, theirs) = setup();

        let pick = |mut state: GameState| {
            resolve(&mut state, EffectKind::Damage { amount: 2 }, TargetSelector::RandomEnemyMinion, EffectContext::new(Side::Player))
        };
        let first = pick(state.clone());
        assert_eq!(first, pick(state.clone()));
        assert_eq!(first.len(), 1);
        let EffectAction::DamageMinion { minion, .. } = first[0] else {
            panic!("Expected DamageMinion");
        };
        assert!(theirs.contains(&minion));
    }

    #[test]
    fn test_random_on_empty_pool() {
        let mut state = GameState::new(&RulesConfig::default(), 1);
        let actions = resolve(&mut state, EffectKind::Destroy, TargetSelector::RandomEnemyMinion, EffectContext::new(Side::Player));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_sequential_application_sees_earlier_results() {
        let (mut state, mine, _) = setup();
        let config = RulesConfig::default();

        // The 1/1 survives the hit only because the buff landed first.
        let actions = vec![
            EffectAction::BuffMinion { minion: mine[0], attack: 0, health: 1 },
            EffectAction::DamageMinion { minion: mine[0], amount: 1 },
        ];
        EffectResolver::apply(&mut state, &config, &actions);

        let m = state.minion(mine[0]).unwrap();
        assert_eq!(m.health, 1);
        assert_eq!(m.max_health, 2);
    }

    #[test]
    fn test_summon_respects_board_limit() {
        let mut state = GameState::new(&RulesConfig::default(), 1);
        let config = RulesConfig::default();
        for _ in 0..6 {
            state.add_to_board(Side::Player, &minion(1, 1));
        }

        let effect = EffectDescriptor::new(
            EffectKind::Summon {
                token: TokenSpec::new(CardId::new(99), "Recruit", 1, 1).with_keywords([Keyword::Taunt]),
                count: 3,
            },
            TargetSelector::None,
        );
        let actions = EffectResolver::resolve(&mut state, &effect, &EffectContext::new(Side::Player));
        assert_eq!(actions.len(), 3);

        EffectResolver::apply(&mut state, &config, &actions);
        let board = &state.player(Side::Player).board;
        assert_eq!(board.len(), 7);
        assert!(board.back().unwrap().has_keyword(Keyword::Taunt));
    }

    #[test]
    fn test_destroy_and_refresh_mana() {
        let (mut state, _, theirs) = setup();
        let config = RulesConfig::default();
        state.player_mut(Side::Player).max_mana = 5;
        state.player_mut(Side::Player).mana = 1;

        EffectResolver::apply(
            &mut state,
            &config,
            &[
                EffectAction::DestroyMinion { minion: theirs[1] },
                EffectAction::RefreshMana { side: Side::Player, amount: 10 },
            ],
        );

        assert_eq!(state.player(Side::Opponent).board.len(), 1);
        assert_eq!(state.player(Side::Player).mana, 5);
    }
}
