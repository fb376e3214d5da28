//! Direct3D9 device creation.

use crate::error::InitError;
use tracing::info;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D9::*;

/// Creates a hardware device bound to `hwnd`: one back buffer, windowed,
/// discard swap effect, automatic 24/8 depth-stencil, vsync-locked
/// presentation, hardware vertex processing.
///
/// The `IDirect3D9` interface is returned alongside the device so the caller
/// keeps it alive for the device's whole lifetime.
pub fn create_device(
    hwnd: HWND,
    (width, height): (u32, u32),
) -> Result<(IDirect3D9, IDirect3DDevice9), InitError> {
    let d3d = unsafe { Direct3DCreate9(D3D_SDK_VERSION) }
        .ok_or(InitError::DeviceCreation(None))?;

    let mut present_parameters = D3DPRESENT_PARAMETERS {
        BackBufferWidth: width,
        BackBufferHeight: height,
        BackBufferFormat: D3DFMT_UNKNOWN,
        BackBufferCount: 1,
        SwapEffect: D3DSWAPEFFECT_DISCARD,
        hDeviceWindow: hwnd,
        Windowed: true.into(),
        EnableAutoDepthStencil: true.into(),
        AutoDepthStencilFormat: D3DFMT_D24S8,
        PresentationInterval: D3DPRESENT_INTERVAL_ONE as u32,
        ..Default::default()
    };

    let mut device = None;
    unsafe {
        d3d.CreateDevice(
            D3DADAPTER_DEFAULT,
            D3DDEVTYPE_HAL,
            hwnd,
            D3DCREATE_HARDWARE_VERTEXPROCESSING as u32,
            &mut present_parameters,
            &mut device,
        )
    }
    .map_err(|e| InitError::DeviceCreation(Some(e)))?;
    let device = device.ok_or(InitError::DeviceCreation(None))?;

    info!("created Direct3D9 device, back buffer {width}x{height}");
    Ok((d3d, device))
}
