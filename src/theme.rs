//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::pieces::PieceKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece palette and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Block colours indexed by colour id - 1.
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, instructions).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Disabled controls.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Theme file key for each colour id, in id order.
const PIECE_KEYS: [&str; 7] = [
    "piece_t", "piece_o", "piece_l", "piece_j", "piece_i", "piece_s", "piece_z",
];

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pieces: [
                rgb(0xFF0D72),
                rgb(0x0DC2FF),
                rgb(0x0DFF72),
                rgb(0xF538FF),
                rgb(0xFF8E0D),
                rgb(0xFFE138),
                rgb(0x3877FF),
            ],
            bg: rgb(0x000000),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
        }
    }
}

impl Theme {
    /// Load theme from a btop-style file. Keys missing from the file keep their defaults;
    /// a malformed colour is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(path)?;
        Self::from_map(&parse_theme_file(&s))
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::default();
        let lookup = |key: &str, slot: &mut Color| -> Result<(), ThemeError> {
            if let Some(v) = map.get(key) {
                *slot = parse_hex(v)?;
            }
            Ok(())
        };
        for (key, slot) in PIECE_KEYS.iter().zip(theme.pieces.iter_mut()) {
            lookup(key, slot)?;
        }
        lookup("bg", &mut theme.bg)?;
        lookup("div_line", &mut theme.div_line)?;
        lookup("main_fg", &mut theme.main_fg)?;
        lookup("title", &mut theme.title)?;
        lookup("inactive_fg", &mut theme.inactive_fg)?;
        Ok(theme)
    }

    #[inline]
    pub fn piece_color(&self, kind: PieceKind) -> Color {
        self.pieces[(kind.color_id() as usize - 1) % 7]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| -> Result<u8, ThemeError> {
        u8::from_str_radix(digits.get(range).ok_or_else(invalid)?, 16).map_err(|_| invalid())
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}
