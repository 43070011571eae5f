use crate::color::trail_color;
use crate::settings::MAX_KINDS;
use crate::simulation::Particle;
use glam::Vec2;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Dot {
    kind: u8,
    age: u8,
}

/// Dot-resolution framebuffer the particles are rasterized into.
///
/// Dots survive across frames while trails are on, aging by one per frame.
pub struct DotCanvas {
    width: u16,
    height: u16,
    dots: Vec<Option<Dot>>,
}

impl DotCanvas {
    /// Canvas covering `width` x `height` terminal cells
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            dots: vec![None; width as usize * 2 * height as usize * 4],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Match a new terminal size, dropping any trails
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.dots.fill(None);
    }

    #[inline]
    fn dot_width(&self) -> usize {
        self.width as usize * 2
    }

    #[inline]
    fn dot_height(&self) -> usize {
        self.height as usize * 4
    }

    /// Age every dot by one frame, dropping those older than `trail_length`
    pub fn age(&mut self, trail_length: u8) {
        for slot in &mut self.dots {
            if let Some(dot) = slot {
                dot.age = dot.age.saturating_add(1);
                if dot.age > trail_length {
                    *slot = None;
                }
            }
        }
    }

    /// Stamp every particle as a fresh dot. Positions are taken modulo the domain.
    pub fn plot(&mut self, particles: &[Particle], domain: Vec2) {
        let (dw, dh) = (self.dot_width(), self.dot_height());
        if dw == 0 || dh == 0 {
            return;
        }
        for particle in particles {
            let bx = (particle.position.x / domain.x * dw as f32).floor() as isize;
            let by = (particle.position.y / domain.y * dh as f32).floor() as isize;
            let bx = bx.rem_euclid(dw as isize) as usize;
            let by = by.rem_euclid(dh as isize) as usize;
            self.dots[by * dw + bx] = Some(Dot {
                kind: particle.kind.min(u8::MAX as usize) as u8,
                age: 0,
            });
        }
    }

    /// Collapse dots into Braille characters. Each character takes the color of
    /// the most common kind among its youngest dots.
    pub fn cells(&self, trail_length: u8) -> Vec<BrailleCell> {
        let dw = self.dot_width();
        let mut cells = Vec::new();

        for cy in 0..self.height {
            for cx in 0..self.width {
                let mut pattern: u8 = 0;
                let mut youngest = u8::MAX;
                let mut counts = [0u8; MAX_KINDS];

                let base_bx = cx as usize * 2;
                let base_by = cy as usize * 4;

                for dx in 0..2 {
                    for dy in 0..4 {
                        let Some(dot) = self.dots[(base_by + dy) * dw + base_bx + dx] else {
                            continue;
                        };
                        pattern |= BRAILLE_DOTS[dx][dy];
                        if dot.age < youngest {
                            youngest = dot.age;
                            counts = [0; MAX_KINDS];
                        }
                        if dot.age == youngest {
                            counts[dot.kind as usize % MAX_KINDS] += 1;
                        }
                    }
                }

                if pattern != 0 {
                    let kind = counts
                        .iter()
                        .enumerate()
                        .max_by_key(|&(kind, count)| (*count, std::cmp::Reverse(kind)))
                        .map(|(kind, _)| kind)
                        .unwrap_or(0);
                    let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                    cells.push(BrailleCell {
                        x: cx,
                        y: cy,
                        char: braille_char,
                        color: trail_color(kind, youngest, trail_length),
                    });
                }
            }
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::kind_color;

    const DOMAIN: Vec2 = Vec2::new(1920.0, 1080.0);

    fn particle(x: f32, y: f32, kind: usize) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            kind,
        }
    }

    #[test]
    fn test_braille_pattern() {
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_particle_lands_in_expected_cell() {
        // 10x10 cells => 20x40 dots; (960, 540) is dot (10, 20) => cell (5, 5), top-left dot
        let mut canvas = DotCanvas::new(10, 10);
        canvas.plot(&[particle(960.0, 540.0, 2)], DOMAIN);
        let cells = canvas.cells(12);
        assert_eq!(
            cells,
            vec![BrailleCell {
                x: 5,
                y: 5,
                char: '\u{2801}',
                color: kind_color(2),
            }]
        );
    }

    #[test]
    fn test_positions_drawn_modulo_domain() {
        let mut canvas = DotCanvas::new(10, 10);
        canvas.plot(&[particle(1920.0, 1080.0, 0), particle(-1.0, -1.0, 1)], DOMAIN);
        let cells = canvas.cells(12);
        assert_eq!(cells.len(), 2);
        assert_eq!((cells[0].x, cells[0].y), (0, 0));
        assert_eq!((cells[1].x, cells[1].y), (9, 9));
    }

    #[test]
    fn test_majority_kind_colors_cell() {
        let mut canvas = DotCanvas::new(10, 10);
        // Three dots of kind 4 and one of kind 1 inside cell (0, 0)
        let w = 1920.0 / 20.0;
        let h = 1080.0 / 40.0;
        canvas.plot(
            &[
                particle(1.0, 1.0, 4),
                particle(w + 1.0, 1.0, 4),
                particle(1.0, h + 1.0, 4),
                particle(w + 1.0, h + 1.0, 1),
            ],
            DOMAIN,
        );
        let cells = canvas.cells(12);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, '\u{281B}');
        assert_eq!(cells[0].color, kind_color(4));
    }

    #[test]
    fn test_trails_fade_then_vanish() {
        let mut canvas = DotCanvas::new(10, 10);
        canvas.plot(&[particle(100.0, 100.0, 0)], DOMAIN);

        canvas.age(3);
        let cells = canvas.cells(3);
        assert_eq!(cells.len(), 1);
        assert_ne!(cells[0].color, kind_color(0));

        canvas.age(3);
        canvas.age(3);
        assert_eq!(canvas.cells(3).len(), 1);
        canvas.age(3);
        assert!(canvas.cells(3).is_empty());
    }

    #[test]
    fn test_resize_drops_trails() {
        let mut canvas = DotCanvas::new(10, 10);
        canvas.plot(&[particle(100.0, 100.0, 0)], DOMAIN);
        canvas.resize(10, 10);
        assert_eq!(canvas.cells(3).len(), 1);
        canvas.resize(12, 8);
        assert_eq!(canvas.size(), (12, 8));
        assert!(canvas.cells(3).is_empty());
    }

    #[test]
    fn test_zero_sized_canvas_is_inert() {
        let mut canvas = DotCanvas::new(0, 0);
        canvas.plot(&[particle(100.0, 100.0, 0)], DOMAIN);
        assert!(canvas.cells(3).is_empty());
    }
}
