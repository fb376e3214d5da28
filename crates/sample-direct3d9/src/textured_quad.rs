//! Shader variant: a quad spinning about +Y, textured and depth-tested.
//!
//! Shaders are compiled from source at startup; the transform matrices are
//! uploaded each frame through the vertex shader's constant table, looked up
//! by parameter name.

use crate::error::InitError;
use crate::scene;
use crate::scene::SceneState;
use crate::shader;
use crate::shader::CompiledShader;
use crate::strategy::ClearValues;
use crate::strategy::RenderStrategy;
use crate::texture::create_texture_from_file;
use crate::vertex;
use std::path::Path;
use tracing::warn;
use windows::core::w;
use windows::core::PCWSTR;
use windows::Win32::Graphics::Direct3D9::*;

pub const VERTEX_SHADER_PATH: &str = "shaders/vertex_shader.hlsl";
pub const PIXEL_SHADER_PATH: &str = "shaders/pixel_shader.hlsl";
pub const TEXTURE_PATH: &str = "textures/stone-ground-diff.dds";

pub const WORLD_MATRIX_NAME: &str = "mWorld";
pub const VIEW_PROJECTION_MATRIX_NAME: &str = "mViewProjection";

pub struct TexturedQuad {
    vertex_shader: IDirect3DVertexShader9,
    pixel_shader: IDirect3DPixelShader9,
    vertex_constants: crate::constant_table::ConstantTable,
    texture: IDirect3DTexture9,
}

impl RenderStrategy for TexturedQuad {
    const TITLE: PCWSTR = w!("Direct3D9 Textured Quad");

    fn acquire(device: &IDirect3DDevice9) -> Result<Self, InitError> {
        // Both stages must compile before any shader object is created, so a
        // bad source file never reaches a device call.
        let vs = shader::compile_shader(
            Path::new(VERTEX_SHADER_PATH),
            shader::VERTEX_ENTRY_POINT,
            shader::VERTEX_TARGET,
        )?;
        let ps = shader::compile_shader(
            Path::new(PIXEL_SHADER_PATH),
            shader::PIXEL_ENTRY_POINT,
            shader::PIXEL_TARGET,
        )?;

        let vertex_shader = unsafe { device.CreateVertexShader(vs.tokens.as_ptr()) }
            .map_err(|e| InitError::ShaderObject {
                stage: "vertex",
                source: e,
            })?;
        let pixel_shader = unsafe { device.CreatePixelShader(ps.tokens.as_ptr()) }
            .map_err(|e| InitError::ShaderObject {
                stage: "pixel",
                source: e,
            })?;

        let texture = create_texture_from_file(device, Path::new(TEXTURE_PATH))?;

        let CompiledShader { constants, .. } = vs;
        Ok(Self {
            vertex_shader,
            pixel_shader,
            vertex_constants: constants,
            texture,
        })
    }

    fn clear_values(&self) -> ClearValues {
        ClearValues {
            color: 0xFF80_8080,
            depth: 1.0,
            stencil: 0,
        }
    }

    fn draw(
        &mut self,
        device: &IDirect3DDevice9,
        scene: &mut SceneState,
    ) -> windows::core::Result<()> {
        let batch = vertex::unit_quad();
        unsafe {
            device.SetFVF(vertex::FVF_XYZ | vertex::FVF_DIFFUSE)?;

            device.SetRenderState(D3DRS_CULLMODE, D3DCULL_NONE.0 as u32)?;
            device.SetRenderState(D3DRS_LIGHTING, 0)?;
            device.SetRenderState(D3DRS_FILLMODE, D3DFILL_SOLID.0 as u32)?;
            device.SetRenderState(D3DRS_SHADEMODE, D3DSHADE_GOURAUD.0 as u32)?;
            device.SetRenderState(D3DRS_ZENABLE, D3DZB_TRUE.0 as u32)?;
            device.SetRenderState(D3DRS_ZFUNC, D3DCMP_LESS.0 as u32)?;
            device.SetRenderState(D3DRS_ZWRITEENABLE, 1)?;

            device.SetPixelShader(&self.pixel_shader)?;
            device.SetVertexShader(&self.vertex_shader)?;
        }

        let world = scene::world_matrix(scene.advance());
        let view_projection = scene::view_projection_matrix();
        self.set_matrix(device, WORLD_MATRIX_NAME, &world)?;
        self.set_matrix(device, VIEW_PROJECTION_MATRIX_NAME, &view_projection)?;

        unsafe {
            device.SetTexture(0, &self.texture)?;
            device.SetSamplerState(0, D3DSAMP_MINFILTER, D3DTEXF_LINEAR.0 as u32)?;
            device.SetSamplerState(0, D3DSAMP_MAGFILTER, D3DTEXF_LINEAR.0 as u32)?;
            device.SetSamplerState(0, D3DSAMP_MIPFILTER, D3DTEXF_LINEAR.0 as u32)?;

            device.DrawPrimitiveUP(
                D3DPT_TRIANGLESTRIP,
                vertex::triangle_strip_primitives(batch.len() as u32),
                batch.as_ptr() as *const _,
                std::mem::size_of::<vertex::PosDiffuseVertex>() as u32,
            )?;
        }
        Ok(())
    }
}

impl TexturedQuad {
    /// Uploads a matrix into the float registers the constant table assigns
    /// to `name`. A constant the compiler optimized away is logged and
    /// skipped rather than treated as a frame failure.
    fn set_matrix(
        &self,
        device: &IDirect3DDevice9,
        name: &str,
        matrix: &bevy_math::Mat4,
    ) -> windows::core::Result<()> {
        let Some(constant) = self.vertex_constants.constant(name) else {
            warn!("vertex shader has no constant named {name}");
            return Ok(());
        };
        let registers = scene::constant_registers(matrix);
        let count = constant.register_count.min(4);
        unsafe {
            device.SetVertexShaderConstantF(
                constant.register_index,
                registers.as_ptr(),
                count,
            )?;
        }
        Ok(())
    }
}
