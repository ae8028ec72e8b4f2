//! Patrol route: waypoints + cursor
//!
//! Маршрут фиксируется при создании guard'а (level data), cursor принадлежит
//! только контроллеру. Выбор следующей точки никогда не повторяет текущую
//! и заворачивает на первую точку после последней.

use bevy::prelude::*;

/// Точка патруля (TargetPoint в уровне)
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub label: String,
    pub position: Vec3,
}

impl Waypoint {
    pub fn new(label: impl Into<String>, position: Vec3) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// Marker компонент: entity в уровне: точка патруля
///
/// Используется только при level load (`PatrolRoute::from_markers`),
/// дальше guard работает с копией маршрута.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolPoint {
    /// Порядок обхода внутри маршрута
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatrolRoute {
    waypoints: Vec<Waypoint>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Собрать маршрут из marker entities уровня
    ///
    /// Сортировка по `PatrolPoint::order`, при равенстве по label,
    /// порядок итерации World не детерминирован.
    pub fn from_markers<'a>(
        markers: impl IntoIterator<Item = (&'a PatrolPoint, Vec3, Option<&'a str>)>,
    ) -> Self {
        let mut ordered: Vec<(u32, Waypoint)> = markers
            .into_iter()
            .map(|(point, position, label)| {
                let label = label
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("TargetPoint_{}", point.order));
                (point.order, Waypoint::new(label, position))
            })
            .collect();

        ordered.sort_by(|(a_order, a), (b_order, b)| {
            a_order.cmp(b_order).then_with(|| a.label.cmp(&b.label))
        });

        Self::new(ordered.into_iter().map(|(_, waypoint)| waypoint).collect())
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

/// Cursor по маршруту (currentWaypointIndex + текущая цель)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatrolCursor {
    /// С какого индекса начинаем поиск следующей точки
    next: usize,
    /// Индекс точки, к которой отдана последняя команда
    current: Option<usize>,
}

impl PatrolCursor {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Выбрать следующую точку, отличную от текущей
    ///
    /// `None`: маршрут пуст или все точки совпадают с текущей
    /// (маршрут из одной точки, на которой мы уже стоим).
    pub fn advance(&mut self, route: &PatrolRoute) -> Option<usize> {
        let len = route.len();
        if len == 0 {
            return None;
        }

        let current = self.current.and_then(|index| route.get(index));

        for offset in 0..len {
            let index = (self.next + offset) % len;
            let Some(candidate) = route.get(index) else {
                continue;
            };

            if Some(candidate) != current {
                self.current = Some(index);
                self.next = (index + 1) % len;
                return Some(index);
            }
        }

        None
    }
}
