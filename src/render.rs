//! Drawing capability consumed by the simulation
//!
//! The simulation never touches a screen surface directly. Bodies emit
//! primitives through [`Renderer`]; the host decides what a primitive means.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGB color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        colors::WHITE
    }
}

/// Stock body colors
pub mod colors {
    use super::Color;

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const CORAL: Color = Color::rgb(255, 111, 97);
    pub const TEAL: Color = Color::rgb(64, 196, 180);
    pub const GOLD: Color = Color::rgb(242, 201, 76);
    pub const VIOLET: Color = Color::rgb(155, 89, 212);

    pub const PALETTE: [Color; 5] = [WHITE, CORAL, TEAL, GOLD, VIOLET];
}

/// Primitives the simulation can ask for
pub trait Renderer {
    /// Wipe the drawing surface
    fn clear(&mut self);
    /// Center the origin, scale world units to pixels, optionally flip Y up
    fn set_transform(&mut self, scale: f32, flip_y: bool);
    /// Filled circle in world coordinates
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);
}

/// A recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    SetTransform { scale: f32, flip_y: bool },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
}

/// Renderer that records every primitive in order
///
/// Used by the native host (which has no surface) and by tests.
#[derive(Debug, Default, Clone)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop recorded commands, keeping the allocation
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Circles in draw order as (center, radius, alpha)
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, f32)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::FillCircle {
                center,
                radius,
                alpha,
                ..
            } => Some((center, radius, alpha)),
            _ => None,
        })
    }
}

impl Renderer for CommandBuffer {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_transform(&mut self, scale: f32, flip_y: bool) {
        self.commands.push(DrawCommand::SetTransform { scale, flip_y });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_buffer_records_in_order() {
        let mut buf = CommandBuffer::new();
        buf.clear();
        buf.set_transform(4.0, true);
        buf.fill_circle(Vec2::new(1.0, 2.0), 3.0, colors::TEAL, 0.5);

        assert_eq!(buf.commands.len(), 3);
        assert_eq!(buf.commands[0], DrawCommand::Clear);
        let circles: Vec<_> = buf.circles().collect();
        assert_eq!(circles, vec![(Vec2::new(1.0, 2.0), 3.0, 0.5)]);

        buf.reset();
        assert!(buf.commands.is_empty());
    }
}
