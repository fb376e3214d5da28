//! Fixed-function variant: one flat-shaded triangle in pre-transformed
//! screen coordinates. No shaders, no textures, no render-state changes.

use crate::error::InitError;
use crate::scene::SceneState;
use crate::strategy::ClearValues;
use crate::strategy::RenderStrategy;
use crate::vertex;
use windows::core::w;
use windows::core::PCWSTR;
use windows::Win32::Graphics::Direct3D9::*;

pub struct FlatTriangle;

impl RenderStrategy for FlatTriangle {
    const TITLE: PCWSTR = w!("Direct3D9 Triangle");

    fn acquire(_device: &IDirect3DDevice9) -> Result<Self, InitError> {
        // The fixed-function pipeline needs nothing beyond the device.
        Ok(Self)
    }

    fn clear_values(&self) -> ClearValues {
        ClearValues {
            color: 0x0080_8080,
            depth: 0.0,
            stencil: 0,
        }
    }

    fn draw(
        &mut self,
        device: &IDirect3DDevice9,
        _scene: &mut SceneState,
    ) -> windows::core::Result<()> {
        let batch = vertex::screen_triangle();
        unsafe {
            device.SetFVF(vertex::FVF_XYZRHW | vertex::FVF_DIFFUSE)?;
            device.DrawPrimitiveUP(
                D3DPT_TRIANGLELIST,
                vertex::triangle_list_primitives(batch.len() as u32),
                batch.as_ptr() as *const _,
                std::mem::size_of::<vertex::ScreenDiffuseVertex>() as u32,
            )?;
        }
        Ok(())
    }
}
