// Math utilities and helper functions

use glam::Vec2;

/// Axis-aligned proximity test shared by chase triggering, combat and pickups.
///
/// Each box is given by a reference point and an extent per axis. The boxes are
/// "within proximity" when the distance between their points is smaller than
/// the average of their extents on *both* axes. Call sites tune the trigger
/// radius by scaling the extents they pass in (e.g. `width / 1.5` for chase,
/// `width / 2.0` for combat).
#[allow(clippy::too_many_arguments)]
pub fn within_proximity(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> bool {
    (ax - bx).abs() * 2.0 < aw + bw && (ay - by).abs() * 2.0 < ah + bh
}

/// Same as [`within_proximity`] for positions and extents held as vectors
pub fn boxes_within_proximity(a_pos: Vec2, a_extent: Vec2, b_pos: Vec2, b_extent: Vec2) -> bool {
    within_proximity(
        a_pos.x, a_pos.y, a_extent.x, a_extent.y, b_pos.x, b_pos.y, b_extent.x, b_extent.y,
    )
}

/// Size of the play surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
