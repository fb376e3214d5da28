//! Core of the message loop: decide between dispatching a pending window
//! event and rendering a frame while idle.
//!
//! Kept free of Win32 types so the loop policy is testable anywhere; the
//! Windows driver in `run_loop` feeds it from `PeekMessageW`.

/// Numeric id of the quit message (`WM_QUIT`).
pub const QUIT_MESSAGE: u32 = 0x0012;

/// One poll of the event source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    /// A window message was pending and has been dispatched.
    Message { id: u32, wparam: usize },
    /// Nothing pending; the loop is free to render.
    Idle,
}

/// Runs the render loop until the event source reports a quit message, whose
/// `wparam` becomes the process exit code. Every idle poll renders exactly
/// one frame.
pub fn pump(
    mut next_event: impl FnMut() -> LoopEvent,
    mut render_frame: impl FnMut(),
) -> i32 {
    loop {
        match next_event() {
            LoopEvent::Message { id: QUIT_MESSAGE, wparam } => return wparam as i32,
            LoopEvent::Message { .. } => {}
            LoopEvent::Idle => render_frame(),
        }
    }
}
