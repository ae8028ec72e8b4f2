//! Delayed tasks: per-agent scheduler для отложенных callback'ов guard'а
//!
//! Замена engine timer registry: каждый guard владеет своим `DelayedTasks`,
//! `arm` возвращает handle, повторный `arm` той же цели сначала отменяет
//! предыдущую задачу (cancel-then-set), поэтому два decay callback'а
//! одновременно висеть не могут.

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

/// Цель отложенной задачи (не больше одной pending задачи на цель)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Decay suspicion: вернуть исходный facing и перейти в Idle
    ResetOrientation,
    /// Пойти проверить место шума
    InvestigateNoise,
}

/// Handle отложенной задачи
///
/// Монотонный id, никогда не переиспользуется: stale handle не отменит новую задачу.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct DelayedTask {
    handle: TaskHandle,
    purpose: TimerPurpose,
    timer: Timer,
}

#[derive(Debug, Clone, Default)]
pub struct DelayedTasks {
    tasks: Vec<DelayedTask>,
    last_id: u64,
}

/// NaN/отрицательные задержки → 0 (Duration::from_secs_f32 паникует на них)
fn delay_duration(delay_secs: f32) -> Duration {
    if delay_secs.is_finite() && delay_secs > 0.0 {
        Duration::from_secs_f32(delay_secs)
    } else {
        Duration::ZERO
    }
}

impl DelayedTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запланировать задачу; pending задача с той же целью отменяется
    pub fn arm(&mut self, purpose: TimerPurpose, delay_secs: f32) -> TaskHandle {
        self.cancel_purpose(purpose);

        self.last_id += 1;
        let handle = TaskHandle(self.last_id);
        self.tasks.push(DelayedTask {
            handle,
            purpose,
            timer: Timer::new(delay_duration(delay_secs), TimerMode::Once),
        });

        handle
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_purpose(&mut self, purpose: TimerPurpose) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.purpose != purpose);
        self.tasks.len() != before
    }

    /// Отменить всё (sight event, destroy). Возвращает число отменённых задач.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        cancelled
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    pub fn pending(&self, purpose: TimerPurpose) -> Option<TaskHandle> {
        self.tasks
            .iter()
            .find(|task| task.purpose == purpose)
            .map(|task| task.handle)
    }

    /// Оставшееся время до срабатывания задачи с данной целью
    pub fn remaining(&self, purpose: TimerPurpose) -> Option<Duration> {
        self.tasks
            .iter()
            .find(|task| task.purpose == purpose)
            .map(|task| task.timer.remaining())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Продвинуть все таймеры на `delta`
    ///
    /// Сработавшие задачи удаляются и возвращаются в порядке срабатывания
    /// (меньше оставалось до конца → раньше сработала; при равенстве раньше armed).
    pub fn tick(&mut self, delta: Duration) -> Vec<TimerPurpose> {
        let mut fired: Vec<(Duration, TaskHandle, TimerPurpose)> = Vec::new();

        for task in self.tasks.iter_mut() {
            let remaining_before = task.timer.remaining();
            task.timer.tick(delta);
            if task.timer.finished() {
                fired.push((remaining_before, task.handle, task.purpose));
            }
        }

        if fired.is_empty() {
            return Vec::new();
        }

        self.tasks.retain(|task| !task.timer.finished());
        fired.sort_by_key(|(remaining, handle, _)| (*remaining, *handle));
        fired.into_iter().map(|(_, _, purpose)| purpose).collect()
    }
}
