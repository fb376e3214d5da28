//! The one point of variation between the samples: what gets drawn and with
//! which pipeline. Everything around it (device setup, the frame sequence,
//! the message loop) is shared.

use crate::error::InitError;
use crate::scene::SceneState;
use windows::core::PCWSTR;
use windows::Win32::Graphics::Direct3D9::IDirect3DDevice9;

/// Per-variant clear values. The variants intentionally differ: the textured
/// quad clears depth to the far plane for less-than depth testing, while the
/// flat triangle leaves depth testing at the device defaults and clears depth
/// to zero, exactly as the respective samples always have.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearValues {
    pub color: u32,
    pub depth: f32,
    pub stencil: u32,
}

/// A render strategy owns whatever GPU resources its pipeline needs and
/// issues the draw commands for one frame.
pub trait RenderStrategy: Sized {
    /// Window title of the variant's executable.
    const TITLE: PCWSTR;

    /// Acquires the variant's resources (shaders, texture) once at startup.
    /// Any failure is fatal and aborts before the render loop.
    fn acquire(device: &IDirect3DDevice9) -> Result<Self, InitError>;

    /// Clear values used at the top of every frame.
    fn clear_values(&self) -> ClearValues;

    /// Sets pipeline state and submits this frame's vertex batch. Runs
    /// between `BeginScene`/`Clear` and `EndScene`/`Present`.
    fn draw(
        &mut self,
        device: &IDirect3DDevice9,
        scene: &mut SceneState,
    ) -> windows::core::Result<()>;
}
