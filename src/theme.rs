use tui::style::{Color, Style};

/// Colors used across the dashboard
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub gray: Color,
    pub profit: Color,
    pub loss: Color,
    pub text_normal: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub border_primary: Color,
    pub border_axis: Color,
    pub highlight: Color,
    pub error: Color,
}

pub const THEME: Theme = Theme {
    background: Color::Reset,
    gray: Color::DarkGray,
    profit: Color::Green,
    loss: Color::Red,
    text_normal: Color::Reset,
    text_primary: Color::Yellow,
    text_secondary: Color::Cyan,
    border_primary: Color::Blue,
    border_axis: Color::Blue,
    highlight: Color::LightBlue,
    error: Color::LightRed,
};

/// Palette for allocation rows, cycled by position
pub const SLICE_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
];

#[inline]
pub fn style() -> Style {
    Style::default().bg(THEME.background)
}

/// Green for gains, red for losses
pub fn signed(value: f64) -> Color {
    if value < 0.0 {
        THEME.loss
    } else {
        THEME.profit
    }
}
