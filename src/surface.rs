//! Drawing surface abstraction.
//!
//! The renderer never talks to a graphics API directly. It issues clear,
//! fill-circle and stroke-line commands in *logical* units against a
//! [`Surface`]; the surface owns the pixel transform. [`DisplayList`] is the
//! stock implementation: it records commands so a backend (see the `gpu`
//! module) or a test can consume them.

use glam::Vec2;

/// Straight (non-premultiplied) RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a float alpha, CSS `rgba()` style.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a.clamp(0.0, 1.0),
        )
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Host viewport in logical units plus its device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Logical size as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Backing-store dimensions of a surface and the logical-to-pixel scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Backing width in device pixels.
    pub pixel_width: u32,
    /// Backing height in device pixels.
    pub pixel_height: u32,
    /// Logical width; drawing commands use this space.
    pub logical_width: f32,
    /// Logical height.
    pub logical_height: f32,
    /// Pixels per logical unit.
    pub scale: f32,
}

impl SurfaceSize {
    /// Size a surface for `viewport`, clamping the pixel ratio to `max_ratio`.
    ///
    /// A missing (non-finite or non-positive) pixel ratio counts as 1.
    pub fn for_viewport(viewport: Viewport, max_ratio: f32) -> Self {
        let ratio = if viewport.device_pixel_ratio.is_finite() && viewport.device_pixel_ratio > 0.0 {
            viewport.device_pixel_ratio
        } else {
            1.0
        };
        let scale = ratio.min(max_ratio);
        let logical_width = viewport.width.max(0.0);
        let logical_height = viewport.height.max(0.0);

        Self {
            pixel_width: (logical_width * scale).floor() as u32,
            pixel_height: (logical_height * scale).floor() as u32,
            logical_width,
            logical_height,
            scale,
        }
    }
}

/// Something the field can be drawn onto.
///
/// Coordinates are logical units; implementations apply
/// [`SurfaceSize::scale`] themselves.
pub trait Surface {
    /// Resize the backing store and reset the coordinate transform.
    fn configure(&mut self, size: SurfaceSize);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Stroke a straight segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn configure(&mut self, size: SurfaceSize) {
        (**self).configure(size);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        (**self).fill_circle(center, radius, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        (**self).stroke_line(from, to, width, color);
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
}

/// Recording surface.
///
/// Holds the commands issued since the last [`Surface::clear`], in order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    size: Option<SurfaceSize>,
    commands: Vec<DrawCommand>,
    configure_count: u32,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current size, if the surface has been configured.
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    /// How many times [`Surface::configure`] has been called.
    pub fn configure_count(&self) -> u32 {
        self.configure_count
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            DrawCommand::Line { .. } => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match *cmd {
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => Some((from, to, width, color)),
            DrawCommand::Circle { .. } => None,
        })
    }
}

impl Surface for DisplayList {
    fn configure(&mut self, size: SurfaceSize) {
        self.size = Some(size);
        self.configure_count += 1;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_scales_by_ratio() {
        let size = SurfaceSize::for_viewport(Viewport::new(1280.0, 720.0, 1.5), 2.0);
        assert_eq!(size.pixel_width, 1920);
        assert_eq!(size.pixel_height, 1080);
        assert_eq!(size.scale, 1.5);
        assert_eq!(size.logical_width, 1280.0);
    }

    #[test]
    fn test_surface_size_clamps_ratio() {
        let size = SurfaceSize::for_viewport(Viewport::new(400.0, 300.0, 3.0), 2.0);
        assert_eq!(size.scale, 2.0);
        assert_eq!(size.pixel_width, 800);
        assert_eq!(size.pixel_height, 600);
    }

    #[test]
    fn test_surface_size_missing_ratio() {
        let zero = SurfaceSize::for_viewport(Viewport::new(100.0, 50.0, 0.0), 2.0);
        assert_eq!(zero.scale, 1.0);
        let nan = SurfaceSize::for_viewport(Viewport::new(100.0, 50.0, f32::NAN), 2.0);
        assert_eq!(nan.scale, 1.0);
        assert_eq!(nan.pixel_width, 100);
    }

    #[test]
    fn test_surface_size_floors_pixels() {
        let size = SurfaceSize::for_viewport(Viewport::new(333.3, 10.9, 1.0), 2.0);
        assert_eq!(size.pixel_width, 333);
        assert_eq!(size.pixel_height, 10);
    }

    #[test]
    fn test_display_list_records_in_order() {
        let mut list = DisplayList::new();
        list.fill_circle(Vec2::new(1.0, 2.0), 1.5, Color::TRANSPARENT);
        list.stroke_line(Vec2::ZERO, Vec2::ONE, 1.0, Color::TRANSPARENT);
        list.fill_circle(Vec2::new(3.0, 4.0), 0.9, Color::TRANSPARENT);

        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.circles().count(), 2);
        assert_eq!(list.lines().count(), 1);
        assert!(matches!(list.commands()[1], DrawCommand::Line { .. }));

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_display_list_configure() {
        let mut list = DisplayList::new();
        assert_eq!(list.size(), None);
        list.fill_circle(Vec2::ZERO, 1.0, Color::TRANSPARENT);

        let size = SurfaceSize::for_viewport(Viewport::new(10.0, 10.0, 1.0), 2.0);
        list.configure(size);
        assert_eq!(list.size(), Some(size));
        assert_eq!(list.configure_count(), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn test_color_from_rgba8() {
        let color = Color::from_rgba8(255, 0, 51, 0.5);
        assert_eq!(color.to_array(), [1.0, 0.0, 0.2, 0.5]);
        assert_eq!(color.with_alpha(2.0).a, 1.0);
    }
}
