//! Color palettes for the two themes.

use ratatui::style::Color;

use crate::prefs::Theme;

/// Every color the UI uses, resolved for one [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub border: Color,
    pub navbar_bg: Color,
    pub navbar_fg: Color,
    pub accent: Color,
    pub score: Color,
    pub highlight_bg: Color,
    pub progress: Color,
}

/// Dark, low-contrast chrome with an orange accent.
const DEFAULT: Palette = Palette {
    background: Color::Reset,
    text: Color::White,
    dim: Color::DarkGray,
    border: Color::DarkGray,
    navbar_bg: Color::Rgb(26, 26, 27),
    navbar_fg: Color::White,
    accent: Color::Rgb(255, 69, 0),
    score: Color::Rgb(255, 139, 96),
    highlight_bg: Color::Rgb(52, 53, 54),
    progress: Color::Rgb(255, 69, 0),
};

/// Old-reddit look: light page, blue links, periwinkle header.
const CLASSIC: Palette = Palette {
    background: Color::Rgb(255, 255, 255),
    text: Color::Rgb(0, 0, 255),
    dim: Color::Rgb(136, 136, 136),
    border: Color::Rgb(206, 227, 248),
    navbar_bg: Color::Rgb(206, 227, 248),
    navbar_fg: Color::Black,
    accent: Color::Rgb(255, 139, 96),
    score: Color::Rgb(198, 198, 198),
    highlight_bg: Color::Rgb(239, 247, 255),
    progress: Color::Rgb(95, 153, 207),
};

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Default => DEFAULT,
        Theme::Classic => CLASSIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_resolve_to_distinct_palettes() {
        assert_ne!(palette(Theme::Default), palette(Theme::Classic));
        assert_eq!(palette(Theme::Classic).navbar_fg, Color::Black);
    }
}
