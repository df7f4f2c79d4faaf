//! geoflow - a well-log section viewer written in Rust
//!
//! This library loads LAS well logs, derives petrophysical curves from them
//! and lays the curves out as a multi-track depth section.
//!
//! ## Module Structure
//!
//! - [`parsers`] - LAS 2.0 parsing into a [`parsers::WellLog`]
//! - [`well`] - Loaded wells, depth handling and the well collection
//! - [`petro`] - Shale volume and density porosity
//! - [`tracks`] - Track kinds, curve-to-track assignment and colours
//! - [`section`] - Section view state machine and the render model
//! - [`template`] - Track layout templates on disk
//! - [`workspace`] - Session file persistence and autosave timing
//! - [`state`] - Constants, themes and toast types
//! - [`units`] - Depth and density unit handling
//! - [`app`] - Main application state and eframe::App implementation
//! - [`ui`] - User interface components
//!   - `sidebar` - Well list and curve table
//!   - `section` - Track plots and depth cursor
//!   - `toolbar` - Depth range, zoom, derivations and status bar
//!   - `menu` - Menu bar (File, View, Units, Templates)
//!   - `notes` - Notes window and template dialog
//!   - `toast` - Toast notification system
//!   - `icons` - Custom icon drawing utilities

pub mod app;
pub mod parsers;
pub mod petro;
pub mod section;
pub mod state;
pub mod template;
pub mod tracks;
pub mod ui;
pub mod units;
pub mod well;
pub mod workspace;
