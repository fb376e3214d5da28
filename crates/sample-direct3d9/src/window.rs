//! Win32 window plumbing: class registration, window creation, and the
//! window procedure. The interesting work all happens in the render loop;
//! this module only exists to produce an `HWND` and a quit message.

use crate::error::InitError;
use windows::core::w;
use windows::core::PCWSTR;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::BeginPaint;
use windows::Win32::Graphics::Gdi::EndPaint;
use windows::Win32::Graphics::Gdi::PAINTSTRUCT;
use windows::Win32::System::LibraryLoader::GetModuleHandleExW;
use windows::Win32::UI::WindowsAndMessaging::*;

pub const WINDOW_CLASS_NAME: PCWSTR = w!("Direct3D9SampleClass");

/// Desired client area of every sample window.
pub const CLIENT_SIZE: (i32, i32) = (800, 600);

/// Handle to the file used to create the calling process.
pub fn module_handle() -> Result<HMODULE, InitError> {
    let mut module = HMODULE::default();
    unsafe { GetModuleHandleExW(Default::default(), None, &mut module) }
        .map_err(InitError::WindowCreation)?;
    Ok(module)
}

pub fn register_window_class(instance: HMODULE) -> Result<(), InitError> {
    let class = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wndproc),
        hInstance: instance.into(),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(InitError::WindowCreation)?,
        lpszClassName: WINDOW_CLASS_NAME,
        ..Default::default()
    };
    let atom = unsafe { RegisterClassExW(&class) };
    if atom == 0 {
        return Err(InitError::WindowCreation(windows::core::Error::from_win32()));
    }
    Ok(())
}

/// Creates an overlapped window whose client rect matches `CLIENT_SIZE`.
pub fn create_window(instance: HMODULE, title: PCWSTR) -> Result<HWND, InitError> {
    let mut window_rect = RECT {
        left: 0,
        top: 0,
        right: CLIENT_SIZE.0,
        bottom: CLIENT_SIZE.1,
    };
    // Grow the rect so the *client* area ends up at the requested size.
    unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false) }
        .map_err(InitError::WindowCreation)?;

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            WINDOW_CLASS_NAME,
            title,
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None, // no parent window
            None, // no menus
            Some(instance.into()),
            None,
        )
    }
    .map_err(InitError::WindowCreation)?;
    Ok(hwnd)
}

/// Client-area dimensions, queried once before device creation.
pub fn client_size(hwnd: HWND) -> Result<(u32, u32), InitError> {
    let mut rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect) }.map_err(InitError::WindowCreation)?;
    Ok((
        (rect.right - rect.left) as u32,
        (rect.bottom - rect.top) as u32,
    ))
}

extern "system" fn wndproc(window: HWND, message: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match message {
        // The render loop repaints the whole client area every frame, so
        // background erasure would only flicker.
        WM_ERASEBKGND => LRESULT(1),
        WM_PAINT => {
            let mut paint = PAINTSTRUCT::default();
            unsafe {
                let _hdc = BeginPaint(window, &mut paint);
                _ = EndPaint(window, &paint);
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(window, message, wparam, lparam) },
    }
}
