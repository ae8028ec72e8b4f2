//! GuardConfig: per-agent параметры guard'а (из level data)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Параметры guard AI
///
/// Поставляются извне при создании агента; отсутствующие поля в JSON
/// заполняются значениями по умолчанию.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Патрулировать маршрут (иначе стоим на посту)
    pub patrol_enabled: bool,
    /// Дистанция до точки патруля, при которой выбираем следующую (units)
    pub patrol_acceptance_radius: f32,
    /// Через сколько секунд тишины Suspicious → Idle
    pub suspicion_decay: f32,
    /// При обнаружении: преследовать pawn (true) или остановиться (false)
    pub chase_on_sight: bool,
    /// Acceptance radius для move_to_actor при преследовании
    pub chase_acceptance_radius: f32,
    /// Повторно репортить detection при sight event в Alerted
    pub report_repeat_detections: bool,
    /// Через сколько секунд после шума идти проверять место (None: не ходим)
    pub investigate_delay: Option<f32>,
    /// Разброс точки проверки шума по горизонтали (units)
    pub investigate_jitter: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            patrol_enabled: true,
            patrol_acceptance_radius: 90.0,
            suspicion_decay: 3.0,
            chase_on_sight: false,
            chase_acceptance_radius: 100.0,
            report_repeat_detections: false,
            investigate_delay: None,
            investigate_jitter: 0.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum GuardConfigError {
    #[error("failed to parse guard config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid guard config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn require_positive(field: &'static str, value: f32) -> Result<(), GuardConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GuardConfigError::Invalid {
            field,
            reason: format!("expected a positive finite number, got {}", value),
        })
    }
}

impl GuardConfig {
    pub fn from_json(json: &str) -> Result<Self, GuardConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GuardConfigError> {
        require_positive("patrol_acceptance_radius", self.patrol_acceptance_radius)?;
        require_positive("suspicion_decay", self.suspicion_decay)?;
        require_positive("chase_acceptance_radius", self.chase_acceptance_radius)?;

        if let Some(delay) = self.investigate_delay {
            require_positive("investigate_delay", delay)?;
        }

        if !self.investigate_jitter.is_finite() || self.investigate_jitter < 0.0 {
            return Err(GuardConfigError::Invalid {
                field: "investigate_jitter",
                reason: format!("expected a non-negative finite number, got {}", self.investigate_jitter),
            });
        }

        Ok(())
    }
}
