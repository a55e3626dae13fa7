//! Text rendering of the remote's LCD and the protocol-selection view.

use crate::session::Session;
use crate::state::{ApplianceState, FanSpeed, Flag, IrProtocol};

const RULE: &str = "----------------------------------------";

/// Render the LCD panel, the status line and the notice for `session`.
#[must_use]
pub fn render_session(session: &Session) -> String {
    let mut out = render_lcd(session.state());
    if session.is_thinking() {
        out.push_str("  AI: thinking...\n");
    }
    if let Some(notice) = session.notices().current() {
        out.push_str(&format!("  >> {notice}\n"));
    }
    if session.settings_open() {
        out.push_str(&render_protocols(session.state().protocol));
    }
    out
}

/// The LCD. A powered-off unit shows only the protocol badge.
#[must_use]
pub fn render_lcd(state: &ApplianceState) -> String {
    let mut out = format!("== GREE 品悦 ====================== [{}]\n", state.protocol.code());
    if !state.power {
        out.push_str("  POWER  OFF\n");
        out.push_str(RULE);
        out.push('\n');
        return out;
    }

    let flags: Vec<&str> = Flag::ALL
        .iter()
        .filter(|&&flag| state.flag(flag))
        .map(|flag| flag.name())
        .collect();

    out.push_str("  POWER  ON\n");
    out.push_str(&format!("  MODE   {}\n", state.mode.label()));
    out.push_str(&format!("  TEMP   {}°C\n", state.temperature));
    out.push_str(&format!("  FAN    {} {}\n", fan_gauge(state.fan_speed), state.fan_speed.label()));
    if !flags.is_empty() {
        out.push_str(&format!("  ON     {}\n", flags.join(" ")));
    }
    out.push_str(RULE);
    out.push('\n');
    out
}

fn fan_gauge(speed: FanSpeed) -> String {
    let total = FanSpeed::ALL.len() - 1;
    let lit = speed.bars();
    format!("[{}{}]", "#".repeat(lit), ".".repeat(total - lit))
}

/// Numbered protocol list with the current one marked.
#[must_use]
pub fn render_protocols(current: IrProtocol) -> String {
    let mut out = String::from("  协议选择\n  请根据您的空调出厂年份选择对应的红外遥控协议。品悦系列通常使用 YB1F2 协议。\n");
    for (index, protocol) in IrProtocol::ALL.iter().enumerate() {
        let marker = if *protocol == current { '*' } else { ' ' };
        out.push_str(&format!("  {marker} {}. {}\n", index + 1, protocol.label()));
    }
    out.push_str("  (protocol <n> to select, done to close)\n");
    out
}

#[must_use]
pub fn help_text() -> &'static str {
    "commands:\n\
     \x20 power | p              toggle power\n\
     \x20 up | + / down | -      temperature +1 / -1\n\
     \x20 temp <delta>           temperature by delta, e.g. temp +3\n\
     \x20 mode | m               next mode\n\
     \x20 fan | f                next fan speed\n\
     \x20 swing | swing-h        vertical / horizontal swing\n\
     \x20 health light sleep eco toggle feature\n\
     \x20 settings               choose IR protocol\n\
     \x20 protocol <n|name>      select protocol\n\
     \x20 done                   close protocol list\n\
     \x20 ask <text>             ask AI for a setting\n\
     \x20 show | help | quit\n"
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
