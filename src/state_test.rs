use super::*;

// =============================================================================
// defaults
// =============================================================================

#[test]
fn default_state_matches_factory_settings() {
    let state = ApplianceState::default();
    assert!(!state.power);
    assert_eq!(state.temperature, 26);
    assert_eq!(state.mode, AcMode::Cool);
    assert_eq!(state.fan_speed, FanSpeed::Auto);
    assert_eq!(state.protocol, IrProtocol::GreeYb1f2);
    assert!(state.light);
    for flag in [Flag::SwingVertical, Flag::SwingHorizontal, Flag::Health, Flag::Sleep, Flag::EnergySaving] {
        assert!(!state.flag(flag), "{flag:?} should start off");
    }
}

#[test]
fn clamp_temperature_bounds() {
    assert_eq!(clamp_temperature(5), MIN_TEMPERATURE);
    assert_eq!(clamp_temperature(22), 22);
    assert_eq!(clamp_temperature(99), MAX_TEMPERATURE);
    assert_eq!(clamp_temperature(i32::MIN), MIN_TEMPERATURE);
}

// =============================================================================
// cycling
// =============================================================================

#[test]
fn mode_cycle_order_wraps() {
    assert_eq!(AcMode::Auto.next(), AcMode::Cool);
    assert_eq!(AcMode::Cool.next(), AcMode::Dry);
    assert_eq!(AcMode::Heat.next(), AcMode::Auto);
}

#[test]
fn fan_cycle_order_wraps() {
    assert_eq!(FanSpeed::Auto.next(), FanSpeed::Low);
    assert_eq!(FanSpeed::MedHigh.next(), FanSpeed::High);
    assert_eq!(FanSpeed::Turbo.next(), FanSpeed::Auto);
}

#[test]
fn fan_bars_follow_cycle_position() {
    assert_eq!(FanSpeed::Auto.bars(), 0);
    assert_eq!(FanSpeed::Low.bars(), 1);
    assert_eq!(FanSpeed::Turbo.bars(), 6);
}

// =============================================================================
// parsing
// =============================================================================

#[test]
fn mode_parses_label_and_aliases() {
    assert_eq!("制冷".parse::<AcMode>().unwrap(), AcMode::Cool);
    assert_eq!("HEAT".parse::<AcMode>().unwrap(), AcMode::Heat);
    assert_eq!(" dry ".parse::<AcMode>().unwrap(), AcMode::Dry);
    assert_eq!("Fan_Only".parse::<AcMode>().unwrap(), AcMode::Fan);
}

#[test]
fn mode_parse_rejects_unknown() {
    let err = "冷冻".parse::<AcMode>().unwrap_err();
    assert_eq!(err.kind, "mode");
    assert!(err.to_string().contains("unknown mode"));
}

#[test]
fn fan_parses_separator_variants() {
    assert_eq!("MED_LOW".parse::<FanSpeed>().unwrap(), FanSpeed::MedLow);
    assert_eq!("med-high".parse::<FanSpeed>().unwrap(), FanSpeed::MedHigh);
    assert_eq!("强劲".parse::<FanSpeed>().unwrap(), FanSpeed::Turbo);
}

#[test]
fn protocol_parses_label_code_and_name() {
    assert_eq!("Gree WiFi (Smart)".parse::<IrProtocol>().unwrap(), IrProtocol::GreeWifi);
    assert_eq!("yb1f2".parse::<IrProtocol>().unwrap(), IrProtocol::GreeYb1f2);
    assert_eq!("GREE_LEGACY".parse::<IrProtocol>().unwrap(), IrProtocol::GreeLegacy);
    assert!("nec".parse::<IrProtocol>().is_err());
}

#[test]
fn protocol_code_is_second_word_of_label() {
    for protocol in IrProtocol::ALL {
        let second = protocol.label().split(' ').nth(1).unwrap();
        assert_eq!(protocol.code(), second);
    }
}

// =============================================================================
// serde
// =============================================================================

#[test]
fn state_serializes_to_camel_case_with_labels() {
    let json = serde_json::to_value(ApplianceState::default()).unwrap();
    assert_eq!(json["power"], false);
    assert_eq!(json["temperature"], 26);
    assert_eq!(json["mode"], "制冷");
    assert_eq!(json["fanSpeed"], "自动");
    assert_eq!(json["energySaving"], false);
    assert_eq!(json["protocol"], "Gree YB1F2 (2019-2022)");
}

#[test]
fn state_deserializes_from_wire_shape() {
    let json = serde_json::json!({
        "power": true,
        "temperature": 22,
        "mode": "制热",
        "fanSpeed": "中高",
        "swingVertical": true,
        "swingHorizontal": false,
        "health": false,
        "light": true,
        "sleep": true,
        "energySaving": false,
        "protocol": "Gree Legacy (Old)"
    });
    let state: ApplianceState = serde_json::from_value(json).unwrap();
    assert_eq!(state.mode, AcMode::Heat);
    assert_eq!(state.fan_speed, FanSpeed::MedHigh);
    assert_eq!(state.protocol, IrProtocol::GreeLegacy);
    assert!(state.sleep);
}

#[test]
fn state_deserialize_rejects_unknown_mode() {
    let mut json = serde_json::to_value(ApplianceState::default()).unwrap();
    json["mode"] = serde_json::json!("turbo-freeze");
    assert!(serde_json::from_value::<ApplianceState>(json).is_err());
}

#[test]
fn with_flag_only_touches_named_flag() {
    let state = ApplianceState::default().with_flag(Flag::Sleep, true);
    assert!(state.sleep);
    assert!(state.light);
    assert!(!state.health);
}
