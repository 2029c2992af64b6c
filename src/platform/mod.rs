//! Browser platform adapter
//!
//! Canvas [`Surface`](crate::render::Surface) implementation plus thin
//! wasm-bindgen handles around both sessions. The page keeps ownership of
//! the frame loop and forwards pointer events in client coordinates;
//! translation into surface-local space happens here.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{BounceHandle, FieldHandle, init};
