//! Windows driver for the message pump: peek-dispatch-or-render until
//! `WM_QUIT` arrives.

use crate::app::App;
use crate::pump::pump;
use crate::pump::LoopEvent;
use crate::strategy::RenderStrategy;
use tracing::warn;
use windows::Win32::UI::WindowsAndMessaging::*;

/// Runs the render loop until the window closes. Returns the quit message's
/// `wParam`, which becomes the process exit code.
///
/// Per-frame failures are logged and the loop keeps going; the samples do
/// not attempt device-loss recovery.
pub fn run_message_loop<S: RenderStrategy>(app: &mut App<S>) -> i32 {
    pump(
        || {
            let mut message = MSG::default();
            if unsafe { PeekMessageW(&mut message, None, 0, 0, PM_REMOVE) }.into() {
                unsafe {
                    _ = TranslateMessage(&message);
                    DispatchMessageW(&message);
                }
                LoopEvent::Message {
                    id: message.message,
                    wparam: message.wParam.0,
                }
            } else {
                LoopEvent::Idle
            }
        },
        || {
            if let Err(e) = app.render_frame() {
                warn!("presentation failed: {e}");
            }
        },
    )
}
