//! Highlight and gradient colors.
//!
//! New columns get a random `#RRGGBB` color that should not collide with the
//! colors already on the board. Random sampling is capped; once the cap is hit
//! the curated palette is cycled instead, so picking always terminates.

use rand::Rng;
use tracing::warn;

/// Curated palette of 16 highlight colors.
///
/// Used for the collision fallback and for deterministic defaults when an
/// imported column has no color.
pub const PALETTE: &[&str] = &[
    "#D73A4A", // red
    "#E36209", // orange
    "#F9C513", // yellow
    "#0E8A16", // green
    "#006B75", // teal
    "#1D76DB", // blue
    "#5319E7", // purple
    "#B60205", // dark red
    "#D876E3", // pink
    "#0075CA", // ocean
    "#7057FF", // violet
    "#008672", // sea green
    "#E4E669", // lime
    "#BFD4F2", // light blue
    "#C5DEF5", // periwinkle
    "#FBCA04", // gold
];

/// Source of candidate colors for new columns and gradients
pub trait ColorSource: Send + Sync {
    /// A `#RRGGBB` candidate
    fn next_color(&self) -> String;
}

/// Uniformly random colors from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomColors;

impl ColorSource for RandomColors {
    fn next_color(&self) -> String {
        random_color()
    }
}

/// Replays a fixed list of colors in a loop. Deterministic; useful in tests
/// and for reproducible fixtures.
#[derive(Debug)]
pub struct CyclingColors {
    colors: Vec<String>,
    next: std::sync::atomic::AtomicUsize,
}

impl CyclingColors {
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl ColorSource for CyclingColors {
    fn next_color(&self) -> String {
        if self.colors.is_empty() {
            return PALETTE[0].to_string();
        }
        let i = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.colors[i % self.colors.len()].clone()
    }
}

/// A random `#RRGGBB` color, uppercase hex digits
pub fn random_color() -> String {
    let mut rng = rand::rng();
    let value: u32 = rng.random_range(0..=0xFF_FFFF);
    format!("#{value:06X}")
}

/// Pick a color not present in `existing` (case-insensitive).
///
/// Tries at most `max_attempts` candidates from `source`, then falls back to
/// the first unused palette color, then to cycling the palette.
pub fn pick_distinct_color(existing: &[&str], source: &dyn ColorSource, max_attempts: usize) -> String {
    let taken = |c: &str| existing.iter().any(|e| e.eq_ignore_ascii_case(c));

    for _ in 0..max_attempts {
        let candidate = source.next_color();
        if !taken(&candidate) {
            return candidate;
        }
    }

    warn!(
        attempts = max_attempts,
        existing = existing.len(),
        "Random color picking kept colliding, falling back to palette"
    );
    PALETTE
        .iter()
        .find(|c| !taken(c))
        .unwrap_or(&PALETTE[existing.len() % PALETTE.len()])
        .to_string()
}

/// Return a deterministic palette color for a key.
///
/// Uses a simple FNV-1a hash mapped to the palette index.
pub fn auto_color(key: &str) -> &'static str {
    let hash = fnv1a(key);
    let idx = (hash as usize) % PALETTE.len();
    PALETTE[idx]
}

/// FNV-1a hash (32-bit) for short strings.
fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in s.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Check for the `#RRGGBB` form
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse `#RRGGBB` (leading `#` optional) into components
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format components as uppercase `#RRGGBB`
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// A two-stop gradient: the base color and a shade 20% closer to white
pub fn gradient_from_base(base: &str) -> Option<[String; 2]> {
    let (r, g, b) = hex_to_rgb(base)?;
    let lighten = |c: u8| -> u8 {
        let c = f64::from(c);
        (c + (255.0 - c) * 0.2).round().min(255.0) as u8
    };
    Some([
        rgb_to_hex(r, g, b),
        rgb_to_hex(lighten(r), lighten(g), lighten(b)),
    ])
}

/// Two independent colors from `source`
pub fn random_gradient(source: &dyn ColorSource) -> [String; 2] {
    [source.next_color(), source.next_color()]
}
