#![forbid(unsafe_code)]

//! Core: geometry, input events, drag transfer payloads, storage and config.
//!
//! # Role in bdock
//! `bdock-core` holds the vocabulary every other crate shares. It has no
//! knowledge of the host editor or the DOM; those seams live in
//! `bdock-editor` and `bdock-web`.
//!
//! # Primary responsibilities
//! - **Geometry**: CSS-pixel [`geometry::Point`] and [`geometry::Rect`].
//! - **Events**: the key codes the sidebar keyboard controller reacts to.
//! - **Transfer**: the dual-encoding drag payload written by drag sources
//!   and decoded by the drop surface.
//! - **Storage**: the best-effort key/value seam behind "recently used".
//! - **Config**: [`config::BdockConfig`], loadable from TOML or JSON.
//! - **Logging**: subscriber setup for hosts that want bdock's traces.

pub mod config;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod storage;
pub mod transfer;
