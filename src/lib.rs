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
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
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

//! Scroll-driven point-cloud shape morphing engine built on wgpu.
//!
//! Morpho draws a named point-cloud shape as a set of identical instanced
//! primitives and morphs every instance toward another shape whenever the
//! viewer scrolls a page section into view, while a camera orbits the scene.
//!
//! # Key entry points
//!
//! - [`engine::MorphEngine`] - the per-frame animation loop
//! - [`shape::ShapeStore`] - immutable shape data, loaded once
//! - [`animation::SectionTrigger`] - visibility-event → morph policy
//! - [`renderer::InstanceRenderer`] - the write-only renderer seam
//! - [`options::Options`] - TOML configuration
//!
//! # Architecture
//!
//! Shapes load on a background thread while the engine already renders the
//! orbiting camera over an empty scene. Visibility events are turned into
//! morph requests by the [`animation::SectionTrigger`]; each request starts a
//! [`animation::MorphRunner`] identified by a generation token, and a new
//! request always supersedes the one in flight. Every frame the engine
//! advances the camera, ticks the due morph, and issues exactly one render.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod options;
pub mod page;
pub mod renderer;
pub mod shape;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::MorphEngine;
pub use error::MorphError;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
