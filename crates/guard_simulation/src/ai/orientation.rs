//! Yaw-only facing helpers

use bevy::prelude::*;

/// Горизонтальная длина направления ниже которой поворот не считаем
pub const MIN_FACING_DISTANCE: f32 = 1e-4;

/// Facing от `from` к `to`, только yaw (pitch/roll = 0)
///
/// Forward в Bevy: `-Z`. Возвращает `None` для вырожденного направления
/// (точка совпадает с нами или строго над/под нами): нормализовать нулевой
/// вектор нельзя, поворот просто пропускаем.
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<Quat> {
    let flat = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if flat.length() < MIN_FACING_DISTANCE {
        return None;
    }

    let direction = flat.normalize();
    Some(Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z)))
}
