//! Scene state and transforms for the textured-quad sample.
//!
//! The camera and projection are fixed; the only thing that changes between
//! frames is the rotation angle, advanced by a constant step. The angle is
//! never wrapped; sine and cosine take care of periodicity.

use bevy_math::Mat4;
use bevy_math::Vec3;
use std::f32::consts::FRAC_PI_3;

/// Radians added to the rotation angle on every frame.
pub const ANGLE_STEP: f32 = 0.03;

const ASPECT_RATIO: f32 = 800.0 / 600.0;
const NEAR_PLANE: f32 = 0.01;
const FAR_PLANE: f32 = 20.0;
const EYE: Vec3 = Vec3::new(2.0, 2.0, 2.0);

/// Mutable per-frame scene state: just the accumulated rotation angle.
#[derive(Debug, Default)]
pub struct SceneState {
    angle: f32,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Steps the rotation forward one frame and returns the new angle.
    pub fn advance(&mut self) -> f32 {
        self.angle += ANGLE_STEP;
        self.angle
    }
}

/// World transform: rotation about +Y by the current angle.
pub fn world_matrix(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

/// Combined view-projection: 60° vertical FOV perspective over an 800:600
/// aspect, composed with a look-at from (2,2,2) toward the origin, +Y up.
/// Left-handed to match Direct3D conventions.
pub fn view_projection_matrix() -> Mat4 {
    let projection = Mat4::perspective_lh(FRAC_PI_3, ASPECT_RATIO, NEAR_PLANE, FAR_PLANE);
    let view = Mat4::look_at_lh(EYE, Vec3::ZERO, Vec3::Y);
    projection * view
}

/// Lays a matrix out as four float4 shader registers.
///
/// HLSL packs `float4x4` constants one column per register by default, and the
/// column-vector matrices used here are the transpose of the row-vector form
/// the shader multiplies with, so the upload is the transposed matrix, one
/// row of `matrix` per register.
pub fn constant_registers(matrix: &Mat4) -> [f32; 16] {
    matrix.transpose().to_cols_array()
}
