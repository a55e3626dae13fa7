use super::*;
use crate::state::{FanSpeed, MAX_TEMPERATURE, MIN_TEMPERATURE};

fn powered() -> ApplianceState {
    ApplianceState::default().toggle_power()
}

// =============================================================================
// power gate
// =============================================================================

#[test]
fn gated_transitions_are_identity_when_off() {
    let off = ApplianceState { temperature: 20, sleep: true, ..ApplianceState::default() };
    for delta in [-100, -1, 0, 1, 7, i32::MAX] {
        assert_eq!(off.adjust_temperature(delta), off);
    }
    assert_eq!(off.cycle_mode(), off);
    assert_eq!(off.cycle_fan_speed(), off);
    for flag in Flag::ALL {
        assert_eq!(off.toggle_flag(flag), off);
    }
}

#[test]
fn rejected_transition_posts_no_notice() {
    let applied = apply(ApplianceState::default(), Transition::CycleMode);
    assert_eq!(applied.notice, None);
}

#[test]
fn ungated_transitions_are_classified() {
    assert!(!Transition::TogglePower.is_gated());
    assert!(!Transition::SetProtocol(IrProtocol::GreeWifi).is_gated());
    assert!(!Transition::ApplyRecommendation { mode: AcMode::Dry, temperature: 24 }.is_gated());
    assert!(Transition::ToggleFlag(Flag::Light).is_gated());
}

// =============================================================================
// power
// =============================================================================

#[test]
fn toggle_power_is_an_involution() {
    let off = ApplianceState::default();
    assert_eq!(off.toggle_power().toggle_power().power, off.power);
    let on = powered();
    assert_eq!(on.toggle_power().toggle_power().power, on.power);
}

#[test]
fn toggle_power_posts_resulting_state() {
    let on = apply(ApplianceState::default(), Transition::TogglePower);
    assert!(on.state.power);
    assert_eq!(on.notice.as_deref(), Some("已开机"));

    let off = apply(on.state, Transition::TogglePower);
    assert!(!off.state.power);
    assert_eq!(off.notice.as_deref(), Some("已关机"));
}

// =============================================================================
// temperature
// =============================================================================

#[test]
fn adjust_temperature_always_in_range() {
    let on = powered();
    for delta in [i32::MIN, -1000, -15, -1, 0, 1, 3, 15, 1000, i32::MAX] {
        let t = on.adjust_temperature(delta).temperature;
        assert!((MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t), "delta {delta} gave {t}");
    }
}

#[test]
fn adjust_temperature_steps_and_clamps() {
    let on = powered();
    assert_eq!(on.adjust_temperature(1).temperature, 27);
    assert_eq!(on.adjust_temperature(-3).temperature, 23);
    assert_eq!(on.adjust_temperature(10).temperature, MAX_TEMPERATURE);
    assert_eq!(on.adjust_temperature(-10).temperature, MIN_TEMPERATURE);
}

// =============================================================================
// cycling
// =============================================================================

#[test]
fn mode_cycle_closes_after_full_turn() {
    for start in AcMode::ALL {
        let mut state = ApplianceState { mode: start, ..powered() };
        for _ in 0..AcMode::ALL.len() {
            state = state.cycle_mode();
        }
        assert_eq!(state.mode, start);
    }
}

#[test]
fn fan_cycle_closes_after_full_turn() {
    for start in FanSpeed::ALL {
        let mut state = ApplianceState { fan_speed: start, ..powered() };
        for _ in 0..FanSpeed::ALL.len() {
            state = state.cycle_fan_speed();
        }
        assert_eq!(state.fan_speed, start);
    }
}

#[test]
fn toggle_flag_flips_only_that_flag() {
    let on = powered();
    let toggled = on.toggle_flag(Flag::Health);
    assert!(toggled.health);
    assert_eq!(ApplianceState { health: false, ..toggled }, on);
    assert!(!on.toggle_flag(Flag::Light).light);
}

// =============================================================================
// protocol
// =============================================================================

#[test]
fn set_protocol_is_unconditional() {
    for base in [ApplianceState::default(), powered()] {
        for protocol in IrProtocol::ALL {
            assert_eq!(base.set_protocol(protocol).protocol, protocol);
        }
    }
}

#[test]
fn set_protocol_names_protocol_in_notice() {
    let applied = apply(ApplianceState::default(), Transition::SetProtocol(IrProtocol::GreeYbof));
    assert_eq!(applied.notice.as_deref(), Some("协议已切换为: Gree YBOF (2016-2018)"));
}

// =============================================================================
// recommendation
// =============================================================================

#[test]
fn apply_recommendation_powers_on_and_clamps() {
    let state = ApplianceState::default().apply_recommendation(AcMode::Heat, 45);
    assert!(state.power);
    assert_eq!(state.mode, AcMode::Heat);
    assert_eq!(state.temperature, MAX_TEMPERATURE);

    let cold = ApplianceState::default().apply_recommendation(AcMode::Cool, 3);
    assert_eq!(cold.temperature, MIN_TEMPERATURE);
}

#[test]
fn apply_recommendation_keeps_other_fields() {
    let before = ApplianceState { fan_speed: FanSpeed::High, sleep: true, ..powered() };
    let after = before.apply_recommendation(AcMode::Dry, 24);
    assert_eq!(after.fan_speed, FanSpeed::High);
    assert!(after.sleep);
    assert_eq!(after.protocol, before.protocol);
}

// =============================================================================
// walkthrough
// =============================================================================

#[test]
fn default_state_walkthrough() {
    let start = ApplianceState::default();
    let state = start.adjust_temperature(1);
    assert_eq!(state, start);

    let state = state.toggle_power();
    assert!(state.power);

    let state = state.adjust_temperature(1);
    assert_eq!(state.temperature, 27);

    let mut state = state.adjust_temperature(10);
    assert_eq!(state.temperature, 30);

    for _ in 0..5 {
        state = state.cycle_mode();
    }
    assert_eq!(state.mode, AcMode::Cool);
}
