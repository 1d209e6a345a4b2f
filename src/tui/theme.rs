use ratatui::style::{Color, Modifier, Style};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ThemeMode;

pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub text_dim: Color,
    pub gold: Color,
    pub green: Color,
    pub amber: Color,
    pub red: Color,
    pub highlight: Color,
}

const DARK: Palette = Palette {
    bg: Color::Rgb(14, 18, 17),
    surface: Color::Rgb(21, 27, 25),
    border: Color::Rgb(44, 58, 52),
    text: Color::Rgb(222, 228, 216),
    text_dim: Color::Rgb(118, 132, 120),
    gold: Color::Rgb(201, 168, 76),
    green: Color::Rgb(86, 156, 112),
    amber: Color::Rgb(214, 142, 64),
    red: Color::Rgb(190, 84, 70),
    highlight: Color::Rgb(34, 46, 41),
};

const LIGHT: Palette = Palette {
    bg: Color::Rgb(248, 244, 234),
    surface: Color::Rgb(241, 235, 220),
    border: Color::Rgb(196, 184, 156),
    text: Color::Rgb(40, 36, 28),
    text_dim: Color::Rgb(120, 110, 90),
    gold: Color::Rgb(150, 112, 20),
    green: Color::Rgb(40, 118, 70),
    amber: Color::Rgb(176, 96, 20),
    red: Color::Rgb(168, 50, 40),
    highlight: Color::Rgb(228, 218, 192),
};

static LIGHT_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_mode(mode: ThemeMode) {
    LIGHT_MODE.store(mode == ThemeMode::Light, Ordering::Relaxed);
}

pub fn mode() -> ThemeMode {
    if LIGHT_MODE.load(Ordering::Relaxed) {
        ThemeMode::Light
    } else {
        ThemeMode::Dark
    }
}

pub fn palette_for(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Dark => &DARK,
        ThemeMode::Light => &LIGHT,
    }
}

pub fn palette() -> &'static Palette {
    palette_for(mode())
}

pub fn base() -> Style {
    let p = palette();
    Style::default().fg(p.text).bg(p.bg)
}

pub fn surface() -> Style {
    let p = palette();
    Style::default().fg(p.text).bg(p.surface)
}

pub fn border() -> Style {
    Style::default().fg(palette().border)
}

pub fn dim() -> Style {
    Style::default().fg(palette().text_dim)
}

pub fn gold() -> Style {
    Style::default().fg(palette().gold)
}

pub fn green() -> Style {
    Style::default().fg(palette().green)
}

pub fn amber() -> Style {
    Style::default().fg(palette().amber)
}

pub fn red() -> Style {
    Style::default().fg(palette().red)
}

pub fn bold() -> Style {
    Style::default().fg(palette().text).add_modifier(Modifier::BOLD)
}

/// Row highlight for the selected list item.
pub fn selected() -> Style {
    let p = palette();
    Style::default()
        .fg(p.gold)
        .bg(p.highlight)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_per_mode() {
        assert_eq!(palette_for(ThemeMode::Light).bg, LIGHT.bg);
        assert_eq!(palette_for(ThemeMode::Dark).bg, DARK.bg);
        assert_ne!(palette_for(ThemeMode::Light).text, palette_for(ThemeMode::Dark).text);
    }
}
