//! Ball colours and cosmetic parameters
//!
//! Pure lookups from a ball's value. Values outside the named table fall
//! back to a procedural hue so arbitrarily high tiers still get a colour.

/// Named colours for the first ten tiers (value, hex, name)
const NAMED: [(u64, &str, &str); 10] = [
    (2, "#FF5722", "Red"),
    (4, "#FF9800", "Orange"),
    (8, "#FFC107", "Yellow"),
    (16, "#4CAF50", "Green"),
    (32, "#2196F3", "Blue"),
    (64, "#9C27B0", "Purple"),
    (128, "#E91E63", "Pink"),
    (256, "#00BCD4", "Cyan"),
    (512, "#607D8B", "Gray"),
    (1024, "#FF5722", "Gold"),
];

/// Name shown for tiers without a named colour
pub const UNNAMED_COLOR: &str = "Random";

/// All colour names in tier order
pub fn color_names() -> impl Iterator<Item = &'static str> {
    NAMED.iter().map(|(_, _, name)| *name)
}

fn named(value: u64) -> Option<&'static (u64, &'static str, &'static str)> {
    NAMED.iter().find(|(v, _, _)| *v == value)
}

fn tier(value: u64) -> f32 {
    (value.max(1) as f32).log2()
}

fn fallback_hue(value: u64) -> f32 {
    (tier(value) * 30.0) % 360.0
}

/// CSS colour for a ball
pub fn ball_color(value: u64) -> String {
    match named(value) {
        Some((_, hex, _)) => hex.to_string(),
        None => format!("hsl({}, 80%, 50%)", fallback_hue(value)),
    }
}

/// CSS gradient for a ball (from its colour to the next tier's)
pub fn ball_gradient(value: u64) -> String {
    match (named(value), named(value.saturating_mul(2))) {
        (Some((_, from, _)), Some((_, to, _))) => {
            format!("linear-gradient(45deg, {from}, {to})")
        }
        (Some((_, from, _)), None) => format!("linear-gradient(45deg, {from}, #607D8B)"),
        _ => {
            let hue1 = fallback_hue(value);
            let hue2 = (hue1 + 90.0) % 360.0;
            format!("linear-gradient(45deg, hsl({hue1}, 80%, 50%), hsl({hue2}, 80%, 50%))")
        }
    }
}

/// Player-facing colour name, used by the mini-game
pub fn color_name(value: u64) -> &'static str {
    named(value).map(|(_, _, name)| *name).unwrap_or(UNNAMED_COLOR)
}

/// Hex swatch for a colour name
pub fn color_hex(name: &str) -> &'static str {
    match name {
        "Gold" => "#FFD700",
        _ => NAMED
            .iter()
            .find(|(_, _, n)| *n == name)
            .map(|(_, hex, _)| *hex)
            .unwrap_or("#FFFFFF"),
    }
}

/// Number of sparkles emitted when a ball sparkles
pub fn sparkle_count(value: u64) -> u32 {
    ((tier(value) / 2.0).floor() as u32).min(5)
}

/// Cosmetic glow parameters for a ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub glow: f32,
    pub bloom: f32,
    pub halo: f32,
    /// Seconds per shine rotation
    pub shine_period: f32,
    /// Seconds per pulse
    pub pulse_period: f32,
}

impl Appearance {
    pub fn for_value(value: u64) -> Self {
        let t = tier(value);
        Self {
            glow: (10.0 + t * 2.0).min(30.0),
            bloom: (15.0 + t * 5.0).min(50.0),
            halo: (30.0 + t * 8.0).min(80.0),
            shine_period: (3.0 - t * 0.2).max(1.0),
            pulse_period: (2.0 - t * 0.1).max(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(ball_color(2), "#FF5722");
        assert_eq!(color_name(64), "Purple");
        assert_eq!(color_names().count(), 10);
        assert_eq!(color_hex("Blue"), "#2196F3");
        assert_eq!(color_hex("Gold"), "#FFD700");
        assert_eq!(color_hex("nope"), "#FFFFFF");
    }

    #[test]
    fn test_unrecognized_value_falls_back() {
        assert_eq!(color_name(4096), UNNAMED_COLOR);
        assert!(ball_color(4096).starts_with("hsl("));
        assert!(ball_gradient(4096).contains("hsl("));
        assert!(ball_gradient(8).contains("#FFC107"));
    }

    #[test]
    fn test_sparkle_count() {
        assert_eq!(sparkle_count(2), 0);
        assert_eq!(sparkle_count(4), 1);
        assert_eq!(sparkle_count(256), 4);
        assert_eq!(sparkle_count(1 << 20), 5);
    }

    #[test]
    fn test_appearance_is_capped() {
        let small = Appearance::for_value(2);
        let huge = Appearance::for_value(1 << 40);
        assert!(small.glow < huge.glow);
        assert_eq!(huge.glow, 30.0);
        assert_eq!(huge.bloom, 50.0);
        assert_eq!(huge.halo, 80.0);
        assert_eq!(huge.shine_period, 1.0);
        assert_eq!(huge.pulse_period, 0.5);
    }
}
