use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::schedule::item::ItemKind;
use crate::schedule::rota::AssignmentStatus;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub header: Style,
    pub today: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub selected: Style,
    pub event: Style,
    pub shift: Style,
    /// Ghost drawn where a dragged item would land.
    pub preview: Style,
    pub rejected: Style,
    pub staff_ok: Style,
    pub staff_conflict: Style,
    pub staff_leave: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            event: Style::default().fg(Color::Black).bg(Color::LightBlue),
            shift: Style::default().fg(Color::Black).bg(Color::LightGreen),
            preview: Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::DIM),
            rejected: Style::default().fg(Color::White).bg(Color::Red),
            staff_ok: Style::default().fg(Color::Green),
            staff_conflict: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            staff_leave: Style::default().fg(Color::Yellow),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = config
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        if let Some(c) = config.event_bg.as_deref().and_then(parse_color) {
            theme.event = theme.event.bg(c);
        }
        if let Some(c) = config.shift_bg.as_deref().and_then(parse_color) {
            theme.shift = theme.shift.bg(c);
        }
        if let Some(c) = config.today_bg.as_deref().and_then(parse_color) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = config.header_fg.as_deref().and_then(parse_color) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = config.dim_fg.as_deref().and_then(parse_color) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = config.border_fg.as_deref().and_then(parse_color) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = config.status_bg.as_deref().and_then(parse_color) {
            theme.status = theme.status.bg(c);
        }
        theme
    }

    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            header: Style::default().fg(Color::Rgb(248, 248, 242)).add_modifier(Modifier::BOLD),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            event: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            shift: Style::default().fg(Color::Black).bg(Color::Rgb(80, 250, 123)),
            ..Self::default()
        }
    }

    fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            header: Style::default().fg(Color::Rgb(235, 219, 178)).add_modifier(Modifier::BOLD),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .bg(Color::Rgb(80, 73, 69)),
            event: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)),
            shift: Style::default().fg(Color::Black).bg(Color::Rgb(184, 187, 38)),
            ..Self::default()
        }
    }

    fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            event: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            shift: Style::default().fg(Color::Black).bg(Color::Rgb(163, 190, 140)),
            ..Self::default()
        }
    }

    /// Block style for an item, honoring its own color when it has one.
    pub fn item_style(&self, kind: ItemKind, color: Option<&str>) -> Style {
        let base = match kind {
            ItemKind::Event => self.event,
            ItemKind::Shift => self.shift,
        };
        match color.and_then(parse_color) {
            Some(c) => base.bg(c),
            None => base,
        }
    }

    pub fn staff_style(&self, status: AssignmentStatus) -> Style {
        match status {
            AssignmentStatus::Ok => self.staff_ok,
            AssignmentStatus::Conflict => self.staff_conflict,
            AssignmentStatus::OnLeave => self.staff_leave,
        }
    }
}

/// `[theme]` section of the config file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub event_bg: Option<String>,
    pub shift_bg: Option<String>,
    pub today_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_bg: Option<String>,
}

/// Parse a color string: hex "#rrggbb", or named colors.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" | "purple" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" | "orange" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}
