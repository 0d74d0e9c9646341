use bytemuck::{Pod, Zeroable};

use crate::surface::{DisplayList, SurfaceSize};

pub const CIRCLE_SHADER: &str = include_str!("shaders/circle.wgsl");
pub const LINE_SHADER: &str = include_str!("shaders/line.wgsl");
pub const PRESENT_SHADER: &str = include_str!("shaders/present.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    /// Logical viewport size.
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

impl Uniforms {
    /// Map the logical space of `size` onto clip space.
    pub fn for_surface(size: SurfaceSize) -> Self {
        Self {
            viewport: [size.logical_width.max(1.0), size.logical_height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

/// Backing texture extent for `size`, each side capped at `max_dimension`.
///
/// `None` when the surface has no pixels to draw into.
pub fn backing_extent(size: SurfaceSize, max_dimension: u32) -> Option<(u32, u32)> {
    if size.pixel_width == 0 || size.pixel_height == 0 {
        return None;
    }
    Some((
        size.pixel_width.min(max_dimension),
        size.pixel_height.min(max_dimension),
    ))
}

pub fn circle_instances(list: &DisplayList) -> Vec<CircleInstance> {
    list.circles()
        .map(|(center, radius, color)| CircleInstance {
            center: center.to_array(),
            radius,
            _pad: 0.0,
            color: color.to_array(),
        })
        .collect()
}

pub fn line_instances(list: &DisplayList) -> Vec<LineInstance> {
    list.lines()
        .map(|(from, to, width, color)| LineInstance {
            start: from.to_array(),
            end: to.to_array(),
            color: color.to_array(),
            width,
            _pad: [0.0; 3],
        })
        .collect()
}
