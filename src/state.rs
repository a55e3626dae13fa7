//! Appliance state: the complete configuration of the simulated AC unit.
//!
//! DESIGN
//! ======
//! `ApplianceState` is a small `Copy` value. Every transition takes it by
//! value and returns a new one (see `transition`), so there is never a
//! partially-updated state visible to the renderer.
//!
//! The enumerations are closed and carry a fixed cycle order (`ALL`). Their
//! wire form is the display label printed on the device, which is also what
//! the inference service is asked to answer with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: i32 = 16;
pub const MAX_TEMPERATURE: i32 = 30;
pub const DEFAULT_TEMPERATURE: i32 = 26;

/// Clamp a setpoint into the supported range.
#[must_use]
pub fn clamp_temperature(celsius: i32) -> i32 {
    celsius.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A string did not name any member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercase ASCII and drop separators so `MED_LOW`, `med-low` and `medlow` compare equal.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Match `raw` against each member's display label (exact) or its aliases (normalized).
fn parse_labeled<T: Copy>(
    kind: &'static str,
    raw: &str,
    all: &[T],
    label: impl Fn(T) -> &'static str,
    aliases: impl Fn(T) -> &'static [&'static str],
) -> Result<T, ParseEnumError> {
    let trimmed = raw.trim();
    let wanted = normalize(trimmed);
    all.iter()
        .copied()
        .find(|&member| {
            label(member) == trimmed || aliases(member).iter().any(|alias| normalize(alias) == wanted)
        })
        .ok_or_else(|| ParseEnumError { kind, value: raw.to_string() })
}

/// Successor of `current` in `all`, wrapping after the last member.
fn cycle_next<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let index = all.iter().position(|&m| m == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

// =============================================================================
// MODE
// =============================================================================

/// Operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum AcMode {
    Auto,
    #[default]
    Cool,
    Dry,
    Fan,
    Heat,
}

impl AcMode {
    /// Cycle order of the mode button.
    pub const ALL: [Self; 5] = [Self::Auto, Self::Cool, Self::Dry, Self::Fan, Self::Heat];

    /// Label printed on the device.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "自动",
            Self::Cool => "制冷",
            Self::Dry => "除湿",
            Self::Fan => "送风",
            Self::Heat => "制热",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Auto => &["AUTO", "automatic"],
            Self::Cool => &["COOL", "cooling", "cold"],
            Self::Dry => &["DRY", "dehumidify"],
            Self::Fan => &["FAN", "fan_only"],
            Self::Heat => &["HEAT", "heating"],
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle_next(&Self::ALL, self)
    }
}

impl FromStr for AcMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labeled("mode", s, &Self::ALL, Self::label, Self::aliases)
    }
}

// =============================================================================
// FAN SPEED
// =============================================================================

/// Fan speed, from automatic through the five manual steps to turbo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FanSpeed {
    #[default]
    Auto,
    Low,
    MedLow,
    Med,
    MedHigh,
    High,
    Turbo,
}

impl FanSpeed {
    pub const ALL: [Self; 7] =
        [Self::Auto, Self::Low, Self::MedLow, Self::Med, Self::MedHigh, Self::High, Self::Turbo];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "自动",
            Self::Low => "低风",
            Self::MedLow => "中低",
            Self::Med => "中风",
            Self::MedHigh => "中高",
            Self::High => "高风",
            Self::Turbo => "强劲",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Auto => &["AUTO"],
            Self::Low => &["LOW"],
            Self::MedLow => &["MED_LOW", "medium_low"],
            Self::Med => &["MED", "medium"],
            Self::MedHigh => &["MED_HIGH", "medium_high"],
            Self::High => &["HIGH"],
            Self::Turbo => &["TURBO"],
        }
    }

    /// Number of bars lit on the fan gauge; `Auto` shows none.
    #[must_use]
    pub fn bars(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        cycle_next(&Self::ALL, self)
    }
}

impl FromStr for FanSpeed {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labeled("fan speed", s, &Self::ALL, Self::label, Self::aliases)
    }
}

// =============================================================================
// IR PROTOCOL
// =============================================================================

/// Remote-control protocol generation. Descriptive only; nothing is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum IrProtocol {
    GreeYbof,
    #[default]
    GreeYb1f2,
    GreeWifi,
    GreeLegacy,
}

impl IrProtocol {
    pub const ALL: [Self; 4] = [Self::GreeYbof, Self::GreeYb1f2, Self::GreeWifi, Self::GreeLegacy];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GreeYbof => "Gree YBOF (2016-2018)",
            Self::GreeYb1f2 => "Gree YB1F2 (2019-2022)",
            Self::GreeWifi => "Gree WiFi (Smart)",
            Self::GreeLegacy => "Gree Legacy (Old)",
        }
    }

    /// Short code shown in the corner of the LCD (second word of the label).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::GreeYbof => "YBOF",
            Self::GreeYb1f2 => "YB1F2",
            Self::GreeWifi => "WiFi",
            Self::GreeLegacy => "Legacy",
        }
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::GreeYbof => &["GREE_YBOF", "YBOF"],
            Self::GreeYb1f2 => &["GREE_YB1F2", "YB1F2"],
            Self::GreeWifi => &["GREE_WIFI", "WIFI", "smart"],
            Self::GreeLegacy => &["GREE_LEGACY", "LEGACY", "old"],
        }
    }
}

impl FromStr for IrProtocol {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labeled("protocol", s, &Self::ALL, Self::label, Self::aliases)
    }
}

// Serde glue: the wire form of every enumeration is its display label.
macro_rules! label_conversions {
    ($($ty:ty),+) => {$(
        impl From<$ty> for &'static str {
            fn from(value: $ty) -> Self {
                value.label()
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )+};
}

label_conversions!(AcMode, FanSpeed, IrProtocol);

// =============================================================================
// FLAGS
// =============================================================================

/// The independent on/off features that only respond while the unit is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    SwingVertical,
    SwingHorizontal,
    Health,
    Light,
    Sleep,
    EnergySaving,
}

impl Flag {
    pub const ALL: [Self; 6] =
        [Self::SwingVertical, Self::SwingHorizontal, Self::Health, Self::Light, Self::Sleep, Self::EnergySaving];

    /// Indicator text used on the panel.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SwingVertical => "Swing-V",
            Self::SwingHorizontal => "Swing-H",
            Self::Health => "Health",
            Self::Light => "Light",
            Self::Sleep => "Sleep",
            Self::EnergySaving => "E-Saving",
        }
    }
}

// =============================================================================
// APPLIANCE STATE
// =============================================================================

/// Full configuration of the simulated unit at one point in time.
///
/// Serializes to the camelCase JSON shape sent to the inference service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ApplianceState {
    pub power: bool,
    pub temperature: i32,
    pub mode: AcMode,
    pub fan_speed: FanSpeed,
    pub swing_vertical: bool,
    pub swing_horizontal: bool,
    pub health: bool,
    pub light: bool,
    pub sleep: bool,
    pub energy_saving: bool,
    pub protocol: IrProtocol,
}

impl ApplianceState {
    #[must_use]
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::SwingVertical => self.swing_vertical,
            Flag::SwingHorizontal => self.swing_horizontal,
            Flag::Health => self.health,
            Flag::Light => self.light,
            Flag::Sleep => self.sleep,
            Flag::EnergySaving => self.energy_saving,
        }
    }

    /// Copy of `self` with `flag` set to `value`. Ungated; callers go through `transition`.
    #[must_use]
    pub(crate) fn with_flag(mut self, flag: Flag, value: bool) -> Self {
        let slot = match flag {
            Flag::SwingVertical => &mut self.swing_vertical,
            Flag::SwingHorizontal => &mut self.swing_horizontal,
            Flag::Health => &mut self.health,
            Flag::Light => &mut self.light,
            Flag::Sleep => &mut self.sleep,
            Flag::EnergySaving => &mut self.energy_saving,
        };
        *slot = value;
        self
    }
}

impl Default for ApplianceState {
    fn default() -> Self {
        Self {
            power: false,
            temperature: DEFAULT_TEMPERATURE,
            mode: AcMode::Cool,
            fan_speed: FanSpeed::Auto,
            swing_vertical: false,
            swing_horizontal: false,
            health: false,
            light: true,
            sleep: false,
            energy_saving: false,
            protocol: IrProtocol::GreeYb1f2,
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
