//! Left-to-right layout that wraps to a new row on overflow.
//!
//! Used for the tag clouds and the thumbnail gallery. egui has no layout pass
//! that reports a wrapped height up front, so panels ask [`FlowLayout::measure`]
//! for the height, allocate it, then place each element at the offsets from
//! [`FlowLayout::arrange`].

use egui::{pos2, vec2, Pos2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLayout {
    /// Gap between neighbouring elements, horizontally and vertically.
    pub spacing: f32,
    /// Space kept free around the whole group.
    pub margin: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowResult {
    /// Top-left corner of each element, relative to the container origin.
    pub positions: Vec<Pos2>,
    /// Height the container needs, margins included.
    pub height: f32,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl FlowLayout {
    pub fn new(spacing: f32, margin: f32) -> Self {
        Self { spacing, margin }
    }

    pub fn arrange(&self, sizes: &[Vec2], available_width: f32) -> FlowResult {
        let mut positions = Vec::with_capacity(sizes.len());
        let height = self.run(sizes, available_width, |pos| positions.push(pos));
        FlowResult { positions, height }
    }

    /// Height needed for `sizes` at `available_width`, without positions.
    pub fn measure(&self, sizes: &[Vec2], available_width: f32) -> f32 {
        self.run(sizes, available_width, |_| {})
    }

    fn run(&self, sizes: &[Vec2], available_width: f32, mut place: impl FnMut(Pos2)) -> f32 {
        let origin = pos2(self.margin, self.margin);
        let right = available_width - self.margin;

        let mut x = origin.x;
        let mut y = origin.y;
        let mut line_height: f32 = 0.0;

        for size in sizes {
            let mut next_x = x + size.x + self.spacing;
            if next_x - self.spacing > right && line_height > 0.0 {
                x = origin.x;
                y += line_height + self.spacing;
                next_x = x + size.x + self.spacing;
                line_height = 0.0;
            }
            place(pos2(x, y));
            x = next_x;
            line_height = line_height.max(size.y);
        }

        y + line_height - origin.y + 2.0 * self.margin
    }
}

/// Size of a uniform grid cell, handy for the gallery where every frame has
/// the same dimensions.
pub fn square(side: f32) -> Vec2 {
    vec2(side, side)
}
