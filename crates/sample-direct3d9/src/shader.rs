//! HLSL compilation for the textured-quad variant.
//!
//! Entry points and target versions are fixed contract constants shared with
//! the shader sources on disk; they are not discovered at runtime.

use crate::constant_table::ConstantTable;
use crate::error::InitError;
use std::path::Path;
use tracing::info;
use windows::core::PCSTR;
use windows::core::s;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::ID3DBlob;

pub const VERTEX_ENTRY_POINT: PCSTR = s!("main");
pub const VERTEX_TARGET: PCSTR = s!("vs_3_0");
pub const PIXEL_ENTRY_POINT: PCSTR = s!("pixel_shader_main");
pub const PIXEL_TARGET: PCSTR = s!("ps_3_0");

/// A compiled shader: the raw D3D9 token stream plus its reflection table.
pub struct CompiledShader {
    pub tokens: Vec<u32>,
    pub constants: ConstantTable,
}

/// Reads `path` wholesale and compiles it with maximum optimization.
///
/// Compilation failure carries the compiler's diagnostic text; no device
/// call happens until the returned bytecode is handed to
/// `CreateVertexShader`/`CreatePixelShader` by the caller.
pub fn compile_shader(
    path: &Path,
    entry_point: PCSTR,
    target: PCSTR,
) -> Result<CompiledShader, InitError> {
    let source = std::fs::read_to_string(path).map_err(|e| InitError::ShaderSource {
        path: path.to_owned(),
        source: e,
    })?;

    let mut code: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;
    let result = unsafe {
        D3DCompile(
            source.as_ptr() as _,
            source.len(),
            PCSTR::null(), // source name, only used in diagnostics
            None,          // defines
            None,          // include handler
            entry_point,
            target,
            D3DCOMPILE_OPTIMIZATION_LEVEL3,
            0,
            &mut code,
            Some(&mut errors),
        )
    };

    if let Err(e) = result {
        let diagnostic = errors
            .as_ref()
            .map(blob_text)
            .unwrap_or_else(|| "no diagnostic output".to_owned());
        return Err(InitError::ShaderCompile {
            path: path.to_owned(),
            diagnostic,
            source: e,
        });
    }
    let blob = code.unwrap(); // set whenever D3DCompile succeeds

    let tokens: Vec<u32> = blob_bytes(&blob)
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect();

    let constants = ConstantTable::parse(&tokens).map_err(|e| InitError::ShaderReflection {
        path: path.to_owned(),
        source: e,
    })?;

    info!(
        "compiled {} as {} ({} dwords, {} constants)",
        path.display(),
        constants.target(),
        tokens.len(),
        constants.constants().len()
    );
    Ok(CompiledShader { tokens, constants })
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize())
    }
}

fn blob_text(blob: &ID3DBlob) -> String {
    String::from_utf8_lossy(blob_bytes(blob)).trim().to_owned()
}
