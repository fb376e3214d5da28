//! Direct3D9 sample suite: a fixed-function flat triangle and a rotating
//! textured quad driven by vs_3_0/ps_3_0 shaders.
//!
//! The Win32/Direct3D plumbing only exists on Windows; the scene math,
//! vertex batches, shader constant-table reflection, DDS decoding, and the
//! message-pump core are platform-neutral and carry the unit tests.

pub mod constant_table;
pub mod dds;
pub mod pump;
pub mod scene;
pub mod vertex;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod device;
#[cfg(windows)]
pub mod error;
#[cfg(windows)]
pub mod flat_triangle;
#[cfg(windows)]
pub mod run_loop;
#[cfg(windows)]
pub mod shader;
#[cfg(windows)]
pub mod strategy;
#[cfg(windows)]
pub mod texture;
#[cfg(windows)]
pub mod textured_quad;
#[cfg(windows)]
pub mod window;
