//! Parrot/neon theme tokens.
//!
//! # Color Palette
//! - **Background**: deep charcoal (base layer)
//! - **Accent**: electric cyan (focus, headers, MA overlay)
//! - **Positive**: neon green (gains, BUY, up candles, LONG)
//! - **Negative**: hot pink (losses, SELL, down candles, SHORT)
//! - **Warning**: neon orange (warnings, pending orders)
//! - **Neutral**: cool purple (RSI line, flat positions)
//! - **Muted**: steel blue (hints, axis labels)

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Palette passed to the chart widgets.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: BACKGROUND,
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
            text_primary: Color::White,
            text_secondary: TEXT_SECONDARY,
        }
    }

    /// Gains green, losses pink; zero counts as a gain.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// BUY/LONG green, SELL/SHORT pink, FLAT purple.
    pub fn side_color(&self, side: &str) -> Color {
        match side.to_ascii_uppercase().as_str() {
            "BUY" | "LONG" => self.positive,
            "SELL" | "SHORT" => self.negative,
            "FLAT" => self.neutral,
            _ => self.text_secondary,
        }
    }

    pub fn status_color(&self, status: &str) -> Color {
        match status.to_ascii_uppercase().as_str() {
            "FILLED" | "COMPLETED" => self.positive,
            "PENDING" | "RUNNING" => self.warning,
            "CANCELLED" | "REJECTED" | "FAILED" => self.negative,
            _ => self.text_secondary,
        }
    }

    /// RSI zones: overbought pink, oversold green.
    pub fn rsi_color(&self, value: f64) -> Color {
        match value {
            v if v >= 70.0 => self.negative,
            v if v <= 30.0 => self.positive,
            _ => self.neutral,
        }
    }
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn pnl_style(value: f64) -> Style {
    Style::default().fg(Theme::default().pnl_color(value))
}
