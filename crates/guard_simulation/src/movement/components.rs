//! Movement компоненты: команды перемещения и статус навигации

use bevy::prelude::*;

/// Команда движения для guard'а (выполняется engine pathfinding)
///
/// Архитектура:
/// - Guard контроллер пишет MovementCommand (high-level intent)
/// - Engine bridge читает и конвертирует в path request
/// - Физика движения целиком на стороне engine
#[derive(Component, Debug, Clone, PartialEq)]
pub enum MovementCommand {
    /// Стоять на месте (команд нет)
    Idle,
    /// Идти к точке патруля
    MoveToWaypoint { label: String, target: Vec3 },
    /// Идти к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Следовать за entity до acceptance radius
    FollowEntity { target: Entity, acceptance_radius: f32 },
    /// Остановиться немедленно
    Stop,
}

impl Default for MovementCommand {
    fn default() -> Self {
        Self::Idle
    }
}

/// Статус движения, репортит engine каждый frame
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum NavigationStatus {
    #[default]
    Idle,
    Moving,
}
