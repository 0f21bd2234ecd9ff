use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

use super::{Style, MAX_SIDES};

/// Regular polygon payload.
///
/// The first vertex sits at `rotation` degrees from +X (clockwise on screen).
#[derive(Debug, Clone, PartialEq)]
pub struct PolyCmd {
    pub center: Vec2,
    pub sides: u32,
    pub radius: f32,
    pub rotation: f32,
    pub style: Style,
    pub color: Color,
}

impl DrawList {
    /// Records a regular polygon. Fewer than three sides draws nothing; more
    /// than [`MAX_SIDES`] is clamped.
    pub fn push_poly(
        &mut self,
        center: Vec2,
        sides: u32,
        radius: f32,
        rotation: f32,
        style: Style,
        color: Color,
    ) {
        if sides < 3 {
            return;
        }
        let sides = sides.min(MAX_SIDES);
        self.push(DrawCmd::Poly(PolyCmd { center, sides, radius, rotation, style, color }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sides_of(list: &DrawList) -> Vec<u32> {
        list.items()
            .iter()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Poly(p) => Some(p.sides),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn degenerate_polygons_are_skipped() {
        let mut list = DrawList::new();
        list.push_poly(Vec2::new(0.0, 0.0), 0, 10.0, 0.0, Style::Fill, Color::WHITE);
        list.push_poly(Vec2::new(0.0, 0.0), 2, 10.0, 0.0, Style::Fill, Color::WHITE);
        assert!(sides_of(&list).is_empty());
    }

    #[test]
    fn huge_side_counts_are_clamped() {
        let mut list = DrawList::new();
        list.push_poly(Vec2::new(0.0, 0.0), i32::MAX as u32, 10.0, 0.0, Style::Outline, Color::WHITE);
        list.push_poly(Vec2::new(0.0, 0.0), u32::MAX, 10.0, 0.0, Style::Fill, Color::WHITE);
        list.push_poly(Vec2::new(0.0, 0.0), 7, 10.0, 0.0, Style::Fill, Color::WHITE);
        assert_eq!(sides_of(&list), vec![MAX_SIDES, MAX_SIDES, 7]);
    }
}
