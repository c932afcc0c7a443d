//! Effect lifecycle against `GameState`.
//!
//! The engine drives every effect through the manager:
//!
//! 1. [`EffectManager::attach`] when an action creates one
//! 2. [`EffectManager::enact_for`] at each TurnStart / TurnEnd boundary
//! 3. [`EffectManager::sweep`] once the boundary is done
//!
//! Records flagged `to_remove` are skipped by `enact_for` and purged by
//! `sweep`; nothing else removes an effect.

use tracing::{debug, info, warn};

use super::{EffectContext, EffectRecord, EffectRegistry, EffectTiming};
use crate::core::{ActionError, PlayerId};
use crate::rules::EngineEvent;

/// Attaches, enacts and sweeps player effects.
pub struct EffectManager;

impl EffectManager {
    /// Bind `record` to `player`, apply it once, and store it on the player.
    pub fn attach(
        registry: &EffectRegistry,
        ctx: &mut EffectContext<'_>,
        player: &PlayerId,
        mut record: EffectRecord,
    ) -> Result<(), ActionError> {
        if ctx.state.player(player).is_none() {
            return Err(ActionError::PlayerNotFound(player.clone()));
        }
        record.set_arg("player", player.as_str());

        let mut effect = registry.build(&record)?;
        effect.apply(ctx);

        let record = effect.to_record();
        let kind = record.kind.clone();
        ctx.state
            .player_mut(player)
            .ok_or_else(|| ActionError::PlayerNotFound(player.clone()))?
            .effects
            .push(record);

        info!(player = %player, effect = %kind, "effect attached");
        ctx.events.push(EngineEvent::EffectAttached {
            player: player.clone(),
            effect: kind,
        });
        Ok(())
    }

    /// Enact the current player's effects that match `timing`.
    ///
    /// Each record is rebuilt, enacted, and written back in place. Unknown
    /// or malformed records are logged and left untouched. Returns the
    /// number of effects enacted.
    pub fn enact_for(registry: &EffectRegistry, ctx: &mut EffectContext<'_>, timing: EffectTiming) -> usize {
        let Some(owner) = ctx.state.current_player_id().cloned() else {
            return 0;
        };

        let mut enacted = 0;
        let mut index = 0;
        loop {
            let Some(record) = ctx
                .state
                .player(&owner)
                .and_then(|p| p.effects.get(index))
                .cloned()
            else {
                break;
            };
            let slot = index;
            index += 1;

            if record.to_remove {
                continue;
            }
            let mut effect = match registry.build(&record) {
                Ok(effect) => effect,
                Err(err) => {
                    warn!(player = %owner, error = %err, "skipping effect");
                    continue;
                }
            };
            if effect.timing() != timing || !ctx.state.is_current(effect.player()) {
                continue;
            }

            effect.enact(ctx);
            enacted += 1;
            debug!(player = %owner, effect = effect.effect_type(), ?timing, "effect enacted");

            if let Some(stored) = ctx
                .state
                .player_mut(&owner)
                .and_then(|p| p.effects.get_mut(slot))
            {
                *stored = effect.to_record();
            }
        }
        enacted
    }

    /// Purge every record flagged `to_remove`, on every player.
    pub fn sweep(ctx: &mut EffectContext<'_>) -> usize {
        let mut removed = 0;
        for player in &mut ctx.state.players {
            let (expired, kept): (Vec<EffectRecord>, Vec<EffectRecord>) =
                player.effects.drain(..).partition(|r| r.to_remove);
            player.effects = kept;
            for record in expired {
                removed += 1;
                ctx.events.push(EngineEvent::EffectExpired {
                    player: player.player_id.clone(),
                    effect: record.kind,
                });
            }
        }
        removed
    }
}
