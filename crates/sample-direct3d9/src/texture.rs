//! Turns the DDS asset into a managed Direct3D9 texture.

use crate::dds::DdsFormat;
use crate::dds::DdsImage;
use crate::error::InitError;
use crate::error::TextureLoadCause;
use std::path::Path;
use tracing::info;
use windows::Win32::Graphics::Direct3D9::*;

/// Loads `path` wholesale, decodes it, and uploads every mip level into a
/// `D3DPOOL_MANAGED` texture.
pub fn create_texture_from_file(
    device: &IDirect3DDevice9,
    path: &Path,
) -> Result<IDirect3DTexture9, InitError> {
    load(device, path).map_err(|source| InitError::TextureLoad {
        path: path.to_owned(),
        source,
    })
}

fn load(device: &IDirect3DDevice9, path: &Path) -> Result<IDirect3DTexture9, TextureLoadCause> {
    let bytes = std::fs::read(path)?;
    let image = DdsImage::parse(&bytes)?;
    let format = match image.format() {
        DdsFormat::Dxt1 => D3DFMT_DXT1,
        DdsFormat::Dxt3 => D3DFMT_DXT3,
        DdsFormat::Dxt5 => D3DFMT_DXT5,
        DdsFormat::A8R8G8B8 => D3DFMT_A8R8G8B8,
        DdsFormat::X8R8G8B8 => D3DFMT_X8R8G8B8,
    };

    let mut texture: Option<IDirect3DTexture9> = None;
    unsafe {
        device.CreateTexture(
            image.width(),
            image.height(),
            image.mip_count(),
            0,
            format,
            D3DPOOL_MANAGED,
            &mut texture,
            std::ptr::null_mut(),
        )?;
    }
    let texture = texture.unwrap(); // set whenever CreateTexture succeeds

    for mip in image.mip_levels() {
        let (rows, row_bytes) = image.format().row_layout(mip.width, mip.height);
        // row_bytes fits: the whole validated level fits in memory.
        let row_bytes = row_bytes as usize;

        let mut locked = D3DLOCKED_RECT::default();
        unsafe {
            texture.LockRect(mip.level, &mut locked, std::ptr::null(), 0)?;
        }
        // Copy row by row; the driver's pitch may exceed our tightly packed
        // row length.
        let destination = locked.pBits as *mut u8;
        for row in 0..rows as usize {
            unsafe {
                std::ptr::copy_nonoverlapping(
                    mip.data.as_ptr().add(row * row_bytes),
                    destination.add(row * locked.Pitch as usize),
                    row_bytes,
                );
            }
        }
        unsafe {
            texture.UnlockRect(mip.level)?;
        }
    }

    info!(
        "loaded texture {} ({}x{}, {} mips, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.mip_count(),
        image.format()
    );
    Ok(texture)
}
