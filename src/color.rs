use crate::settings::MAX_KINDS;
use ratatui::style::Color;

/// One color per particle kind, in kind order
pub const KIND_PALETTE: [(u8, u8, u8); MAX_KINDS] = [
    (255, 64, 64),   // red
    (64, 255, 64),   // green
    (80, 120, 255),  // blue
    (255, 64, 255),  // magenta
    (255, 255, 64),  // yellow
    (255, 255, 255), // white
    (64, 255, 255),  // cyan
    (255, 160, 32),  // orange
];

/// Floor of the matrix cell intensity ramp
const MIN_INTENSITY: f32 = 126.0;
const MAX_INTENSITY: f32 = 255.0;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Full-brightness color of a particle kind
pub fn kind_color(kind: usize) -> Color {
    let (r, g, b) = KIND_PALETTE[kind % MAX_KINDS];
    Color::Rgb(r, g, b)
}

/// Color of a trail dot `age` frames old, dimming linearly to black after `trail_length` frames
pub fn trail_color(kind: usize, age: u8, trail_length: u8) -> Color {
    let (r, g, b) = KIND_PALETTE[kind % MAX_KINDS];
    let t = 1.0 - age as f32 / (trail_length as f32 + 1.0);
    let t = t.clamp(0.0, 1.0);
    Color::Rgb(
        (r as f32 * t) as u8,
        (g as f32 * t) as u8,
        (b as f32 * t) as u8,
    )
}

/// Matrix editor cell color: green for attraction, red for repulsion, brighter with |coef|
pub fn coefficient_color(coef: f32) -> Color {
    let intensity = lerp(MIN_INTENSITY, MAX_INTENSITY, coef.abs().min(1.0)) as u8;
    if coef > 0.0 {
        Color::Rgb(0, intensity, 0)
    } else if coef < 0.0 {
        Color::Rgb(intensity, 0, 0)
    } else {
        Color::DarkGray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_colors_are_distinct() {
        for a in 0..MAX_KINDS {
            for b in (a + 1)..MAX_KINDS {
                assert_ne!(kind_color(a), kind_color(b));
            }
        }
        assert_eq!(kind_color(MAX_KINDS), kind_color(0));
    }

    #[test]
    fn test_trail_fades_with_age() {
        assert_eq!(trail_color(0, 0, 10), kind_color(0));
        let Color::Rgb(young, _, _) = trail_color(0, 2, 10) else {
            panic!("expected rgb");
        };
        let Color::Rgb(old, _, _) = trail_color(0, 8, 10) else {
            panic!("expected rgb");
        };
        assert!(young > old);
    }

    #[test]
    fn test_coefficient_color_ramp() {
        assert_eq!(coefficient_color(1.0), Color::Rgb(0, 255, 0));
        assert_eq!(coefficient_color(-1.0), Color::Rgb(255, 0, 0));
        assert_eq!(coefficient_color(0.0), Color::DarkGray);
        let Color::Rgb(_, g, _) = coefficient_color(0.25) else {
            panic!("expected rgb");
        };
        assert!(g > 126 && g < 255);
    }
}
