//! Closed color palette.
//!
//! DESIGN
//! ======
//! Every color that leaves the service is one of eight canonical hex values.
//! Inputs may be palette names, canonical hex, a small set of legacy hex
//! values and name aliases, or anything else; unknown values fall back to
//! blue. Resolution is idempotent: a canonical hex resolves to itself.

// =============================================================================
// PALETTE
// =============================================================================

/// One palette entry: user-facing name and canonical lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub hex: &'static str,
}

pub const RED: PaletteColor = PaletteColor { name: "red", hex: "#ef4444" };
pub const ORANGE: PaletteColor = PaletteColor { name: "orange", hex: "#f97316" };
pub const YELLOW: PaletteColor = PaletteColor { name: "yellow", hex: "#eab308" };
pub const GREEN: PaletteColor = PaletteColor { name: "green", hex: "#22c55e" };
pub const BLUE: PaletteColor = PaletteColor { name: "blue", hex: "#3b82f6" };
pub const PURPLE: PaletteColor = PaletteColor { name: "purple", hex: "#a855f7" };
pub const PINK: PaletteColor = PaletteColor { name: "pink", hex: "#ec4899" };
pub const BLACK: PaletteColor = PaletteColor { name: "black", hex: "#000000" };

/// The full palette in display order.
pub const PALETTE: [PaletteColor; 8] = [RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE, PINK, BLACK];

/// Color used when an input is missing or unrecognized.
pub const DEFAULT_COLOR: PaletteColor = BLUE;

/// Older canvas builds stored these pure-RGB values.
const LEGACY_HEX: &[(&str, PaletteColor)] = &[
    ("#ff0000", RED),
    ("#ffa500", ORANGE),
    ("#ffff00", YELLOW),
    ("#00ff00", GREEN),
    ("#008000", GREEN),
    ("#0000ff", BLUE),
    ("#800080", PURPLE),
    ("#ffc0cb", PINK),
    ("#333333", BLACK),
];

const NAME_ALIASES: &[(&str, PaletteColor)] = &[
    ("grey", BLACK),
    ("gray", BLACK),
    ("dark", BLACK),
    ("violet", PURPLE),
    ("magenta", PINK),
    ("gold", YELLOW),
    ("lime", GREEN),
    ("navy", BLUE),
    ("cyan", BLUE),
];

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve any color input to a palette entry, falling back to blue.
#[must_use]
pub fn resolve(raw: &str) -> PaletteColor {
    lookup(raw).unwrap_or(DEFAULT_COLOR)
}

/// Resolve a color input to its canonical hex string.
#[must_use]
pub fn resolve_hex(raw: &str) -> &'static str {
    resolve(raw).hex
}

/// Resolve an optional color; absent values take the default.
#[must_use]
pub fn resolve_optional(raw: Option<&str>) -> &'static str {
    raw.map_or(DEFAULT_COLOR.hex, resolve_hex)
}

/// Exact palette lookup without the blue fallback.
#[must_use]
pub fn lookup(raw: &str) -> Option<PaletteColor> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }

    if let Some(color) = PALETTE.iter().find(|c| c.name == value) {
        return Some(*color);
    }
    if let Some((_, color)) = NAME_ALIASES.iter().find(|(alias, _)| *alias == value) {
        return Some(*color);
    }

    let hex = expand_short_hex(&value)?;
    if let Some(color) = PALETTE.iter().find(|c| c.hex == hex) {
        return Some(*color);
    }
    LEGACY_HEX
        .iter()
        .find(|(legacy, _)| *legacy == hex)
        .map(|(_, color)| *color)
}

/// Expand `#rgb` to `#rrggbb`; pass `#rrggbb` through. Input must be lowercase.
fn expand_short_hex(value: &str) -> Option<String> {
    let digits = value.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => Some(digits.chars().fold(String::from("#"), |mut acc, c| {
            acc.push(c);
            acc.push(c);
            acc
        })),
        6 => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "palette_test.rs"]
mod tests;
