//! The explicit application state: Direct3D interface, device, scene, and
//! the active render strategy.
//!
//! All handles are COM smart pointers, so every resource is released on
//! every exit path, including early initialization failures, without any
//! manual `Release` bookkeeping.

use crate::device::create_device;
use crate::error::InitError;
use crate::error::PresentationError;
use crate::scene::SceneState;
use crate::strategy::RenderStrategy;
use tracing::info;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D9::*;

pub struct App<S: RenderStrategy> {
    // Held so the factory outlives the device it created.
    _d3d: IDirect3D9,
    device: IDirect3DDevice9,
    scene: SceneState,
    strategy: S,
}

impl<S: RenderStrategy> App<S> {
    /// Creates the device for `hwnd` and acquires the strategy's resources.
    /// Any failure aborts initialization; nothing is drawn on the failure
    /// path.
    pub fn initialize(hwnd: HWND, client_size: (u32, u32)) -> Result<Self, InitError> {
        let (d3d, device) = create_device(hwnd, client_size)?;
        let strategy = S::acquire(&device)?;
        info!("application state ready");
        Ok(Self {
            _d3d: d3d,
            device,
            scene: SceneState::new(),
            strategy,
        })
    }

    /// Renders and presents one frame: begin, clear, strategy draw, end,
    /// present. Runs once per idle tick of the message loop.
    pub fn render_frame(&mut self) -> Result<(), PresentationError> {
        let clear = self.strategy.clear_values();
        unsafe {
            self.device.BeginScene()?;
            self.device.Clear(
                0,
                std::ptr::null(),
                (D3DCLEAR_TARGET | D3DCLEAR_STENCIL | D3DCLEAR_ZBUFFER) as u32,
                clear.color,
                clear.depth,
                clear.stencil,
            )?;
        }

        self.strategy.draw(&self.device, &mut self.scene)?;

        unsafe {
            self.device.EndScene()?;
            self.device.Present(
                std::ptr::null(),
                std::ptr::null(),
                HWND::default(),
                std::ptr::null(),
            )?;
        }
        Ok(())
    }
}
