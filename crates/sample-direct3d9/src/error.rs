//! Failure taxonomy for startup and per-frame rendering.
//!
//! Every initialization error is fatal: it propagates straight out of `main`
//! as an `eyre` report and the process exits before the render loop starts.
//! Per-frame failures are logged and ignored; the samples make no attempt at
//! device-loss recovery.

use crate::dds::DdsError;
use std::path::PathBuf;
use thiserror::Error;

pub type AppResult<T, E = eyre::Report> = Result<T, E>;

#[derive(Debug, Error)]
pub enum InitError {
    /// `Direct3DCreate9` returned nothing, or `CreateDevice` failed.
    #[error("no compatible Direct3D9 device is available")]
    DeviceCreation(#[source] Option<windows::core::Error>),

    #[error("failed to read shader source {path}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compiler rejected the source; `diagnostic` is the error-blob text.
    #[error("shader compilation failed for {path}: {diagnostic}")]
    ShaderCompile {
        path: PathBuf,
        diagnostic: String,
        #[source]
        source: windows::core::Error,
    },

    /// Compiled bytecode carried no usable constant table.
    #[error("shader reflection failed for {path}")]
    ShaderReflection {
        path: PathBuf,
        #[source]
        source: crate::constant_table::ConstantTableError,
    },

    /// The device refused the compiled bytecode.
    #[error("failed to create {stage} shader object")]
    ShaderObject {
        stage: &'static str,
        #[source]
        source: windows::core::Error,
    },

    #[error("failed to load texture {path}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: TextureLoadCause,
    },

    #[error("window creation failed")]
    WindowCreation(#[source] windows::core::Error),
}

/// What went wrong while turning the texture file into a GPU resource.
#[derive(Debug, Error)]
pub enum TextureLoadCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DdsError),
    #[error(transparent)]
    Device(#[from] windows::core::Error),
}

/// A `BeginScene`/`Clear`/draw/`Present` call failed mid-frame.
#[derive(Debug, Error)]
#[error("frame presentation failed")]
pub struct PresentationError(#[from] pub windows::core::Error);
