// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU sphere-swarm renderer built on wgpu.
//!
//! Draws thousands of identical UV spheres laid out on a square grid, with
//! three interchangeable ways of batching the draw: one instanced call, one
//! sub-draw per instance, or a single indirect command. All three produce
//! the same image; switching between them at runtime exposes the cost of
//! each.
//!
//! # Key entry points
//!
//! - [`engine::SwarmEngine`] - GPU context, buffers, programs and the frame
//!   loop
//! - [`engine::SwarmScene`] - GPU-free scene state and control handlers
//! - [`renderer::DrawPlan`] - the strategy-to-draw-call selector
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Frame order
//!
//! Each [`engine::SwarmEngine::render`] re-uploads the mesh if it was
//! regenerated, republishes instance transforms if they changed, refreshes
//! the indirect command, flushes uniforms, then records one pass that
//! clears and dispatches.

pub mod camera;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod instancing;
pub mod options;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{SceneObserver, SceneStats, SwarmCommand, SwarmEngine, SwarmScene};
pub use error::{ParameterError, SwarmError};
pub use geometry::{SphereMesh, SphereParams};
pub use input::{InputEvent, KeyAction, MouseButton};
pub use instancing::{grid_layout, InstanceStore, InstanceTransform};
pub use options::Options;
pub use renderer::{DrawPlan, DrawRecorder, DrawStrategy};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
