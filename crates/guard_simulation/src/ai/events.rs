//! Guard AI Events: perception input и наружные уведомления
//!
//! Engine perception (vision + hearing) → PerceptionEvent → guard FSM.
//! Guard FSM → GuardStateChanged (replication/animation/UI)
//!           → MissionCompleted (mission sink).

use bevy::prelude::*;

use crate::ai::GuardState;

/// События от engine perception (pawn sensing)
#[derive(Event, Debug, Clone)]
pub enum PerceptionEvent {
    /// Guard увидел pawn
    PawnSeen {
        /// Entity guard'а (чей sensing сработал)
        observer: Entity,
        /// Кого увидели (None: пустой payload от engine)
        pawn: Option<Entity>,
    },

    /// Guard услышал шум
    NoiseHeard {
        observer: Entity,
        /// Кто шумел (может отсутствовать, например взрыв)
        instigator: Option<Entity>,
        location: Vec3,
        volume: f32,
    },
}

impl PerceptionEvent {
    pub fn observer(&self) -> Entity {
        match self {
            PerceptionEvent::PawnSeen { observer, .. } => *observer,
            PerceptionEvent::NoiseHeard { observer, .. } => *observer,
        }
    }
}

/// Guard сменил состояние (ровно один раз на реальный переход)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardStateChanged {
    pub guard: Entity,
    pub state: GuardState,
}

/// Игрок обнаружен guard'ом → миссия завершена
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionCompleted {
    pub guard: Entity,
    pub instigator: Entity,
    pub success: bool,
}
