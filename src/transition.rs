//! Transitions: the only sanctioned way to change an `ApplianceState`.
//!
//! DESIGN
//! ======
//! Each button on the remote maps to one `Transition`. `apply` is the single
//! dispatch point: it takes the current state by value and returns the next
//! state plus an optional notice for the user. The power gate lives here and
//! nowhere else: a gated transition on a powered-off unit returns the input
//! state untouched and posts nothing.

use tracing::debug;

use crate::state::{AcMode, ApplianceState, Flag, IrProtocol, clamp_temperature};

/// A single user-visible operation on the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    TogglePower,
    AdjustTemperature(i32),
    CycleMode,
    CycleFanSpeed,
    ToggleFlag(Flag),
    SetProtocol(IrProtocol),
    /// Apply an AI suggestion. Powers the unit on as a side effect.
    ApplyRecommendation { mode: AcMode, temperature: i32 },
}

impl Transition {
    /// Whether this transition is ignored while the unit is off.
    #[must_use]
    pub const fn is_gated(&self) -> bool {
        matches!(self, Self::AdjustTemperature(_) | Self::CycleMode | Self::CycleFanSpeed | Self::ToggleFlag(_))
    }
}

/// Result of applying a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub state: ApplianceState,
    pub notice: Option<String>,
}

impl Applied {
    fn silent(state: ApplianceState) -> Self {
        Self { state, notice: None }
    }
}

/// Apply `transition` to `state`. Total: never fails, always yields a valid state.
#[must_use]
pub fn apply(state: ApplianceState, transition: Transition) -> Applied {
    if transition.is_gated() && !state.power {
        debug!(?transition, "transition ignored: power is off");
        return Applied::silent(state);
    }

    match transition {
        Transition::TogglePower => {
            let power = !state.power;
            Applied { state: ApplianceState { power, ..state }, notice: Some(power_notice(power)) }
        }
        Transition::AdjustTemperature(delta) => Applied::silent(ApplianceState {
            temperature: clamp_temperature(state.temperature.saturating_add(delta)),
            ..state
        }),
        Transition::CycleMode => Applied::silent(ApplianceState { mode: state.mode.next(), ..state }),
        Transition::CycleFanSpeed => Applied::silent(ApplianceState { fan_speed: state.fan_speed.next(), ..state }),
        Transition::ToggleFlag(flag) => Applied::silent(state.with_flag(flag, !state.flag(flag))),
        Transition::SetProtocol(protocol) => {
            Applied { state: ApplianceState { protocol, ..state }, notice: Some(protocol_notice(protocol)) }
        }
        Transition::ApplyRecommendation { mode, temperature } => Applied::silent(ApplianceState {
            power: true,
            mode,
            temperature: clamp_temperature(temperature),
            ..state
        }),
    }
}

fn power_notice(power: bool) -> String {
    if power { "已开机".into() } else { "已关机".into() }
}

fn protocol_notice(protocol: IrProtocol) -> String {
    format!("协议已切换为: {}", protocol.label())
}

// =============================================================================
// VALUE-STYLE SHORTHANDS
// =============================================================================

impl ApplianceState {
    #[must_use]
    pub fn toggle_power(self) -> Self {
        apply(self, Transition::TogglePower).state
    }

    #[must_use]
    pub fn adjust_temperature(self, delta: i32) -> Self {
        apply(self, Transition::AdjustTemperature(delta)).state
    }

    #[must_use]
    pub fn cycle_mode(self) -> Self {
        apply(self, Transition::CycleMode).state
    }

    #[must_use]
    pub fn cycle_fan_speed(self) -> Self {
        apply(self, Transition::CycleFanSpeed).state
    }

    #[must_use]
    pub fn toggle_flag(self, flag: Flag) -> Self {
        apply(self, Transition::ToggleFlag(flag)).state
    }

    #[must_use]
    pub fn set_protocol(self, protocol: IrProtocol) -> Self {
        apply(self, Transition::SetProtocol(protocol)).state
    }

    #[must_use]
    pub fn apply_recommendation(self, mode: AcMode, temperature: i32) -> Self {
        apply(self, Transition::ApplyRecommendation { mode, temperature }).state
    }
}

#[cfg(test)]
#[path = "transition_test.rs"]
mod tests;
