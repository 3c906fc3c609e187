// Drawing surface abstraction and the recorded draw list

use crate::core::math::SurfaceSize;
use crate::engine::assets::ImageHandle;

/// Axis-aligned rectangle in surface pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// RGBA colour, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Color = Color([1.0, 1.0, 0.0, 1.0]);
    pub const ORANGE: Color = Color([1.0, 0.647, 0.0, 1.0]);

    /// Build from a `0xRRGGBB` value
    pub fn from_hex(rgb: u32) -> Self {
        let r = ((rgb >> 16) & 0xFF) as f32 / 255.0;
        let g = ((rgb >> 8) & 0xFF) as f32 / 255.0;
        let b = (rgb & 0xFF) as f32 / 255.0;
        Self([r, g, b, 1.0])
    }
}

/// Horizontal anchoring of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A single recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface
    Clear,
    /// Blit `src` of an image into `dst`
    Image {
        image: ImageHandle,
        src: Rect,
        dst: Rect,
    },
    /// Solid rectangle
    FillRect { rect: Rect, color: Color },
    /// Rectangle outline
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    /// Text drawn by the UI text collaborator
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Anything the scene can be drawn onto
pub trait Surface {
    /// Size of the drawable area
    fn size(&self) -> SurfaceSize;

    fn clear(&mut self);

    fn draw_image(&mut self, image: ImageHandle, src: Rect, dst: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, align: TextAlign);
}

/// Surface that records commands for a backend to replay
///
/// The engine renders every frame into a `DrawList`; the GPU renderer turns
/// it into textured quads.
#[derive(Debug, Clone)]
pub struct DrawList {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::with_capacity(128),
        }
    }

    /// Recorded commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop all recorded commands, keeping the allocation
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
impl DrawList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of image blits recorded
    pub fn image_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
            .count()
    }

    /// Every text string recorded, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DrawList {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_image(&mut self, image: ImageHandle, src: Rect, dst: Rect) {
        if dst.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Image { image, src, dst });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size,
            color,
            align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::AssetId;

    #[test]
    fn test_color_from_hex() {
        let green = Color::from_hex(0x50C878);
        assert_eq!(green.0[0], 0x50 as f32 / 255.0);
        assert_eq!(green.0[1], 0xC8 as f32 / 255.0);
        assert_eq!(green.0[2], 0x78 as f32 / 255.0);
        assert_eq!(green.0[3], 1.0);
    }

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new(SurfaceSize::new(100.0, 100.0));
        let image = ImageHandle::new(AssetId::from_path("bg.jpg"));

        list.clear();
        list.draw_image(image, Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        list.fill_text("Score", 1.0, 2.0, 20.0, Color::WHITE, TextAlign::Left);

        assert_eq!(list.len(), 3);
        assert_eq!(list.commands()[0], DrawCommand::Clear);
        assert_eq!(list.image_count(), 1);
        assert_eq!(list.texts(), vec!["Score"]);

        list.reset();
        assert!(list.is_empty());
    }

    #[test]
    fn test_empty_destinations_are_dropped() {
        let mut list = DrawList::new(SurfaceSize::new(100.0, 100.0));
        let image = ImageHandle::new(AssetId::from_path("gone.png"));

        list.draw_image(image, Rect::new(0.0, 0.0, 0.0, 0.0), Rect::new(-100.0, -100.0, 0.0, 0.0));
        list.fill_rect(Rect::new(0.0, 0.0, 0.0, 5.0), Color::RED);

        assert!(list.is_empty());
    }
}
