//! opsdeck - a terminal dashboard that watches security keys and follows the
//! operator log.
//!
//! The library exposes the two monitoring subsystems ([`devices`] and
//! [`logtail`]), the [`delivery`] channel that hands their output to the UI
//! thread, and the dashboard itself.

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod delivery;
pub mod devices;
pub mod error;
pub mod logging;
pub mod logtail;
pub mod notifications;
pub mod terminal;
pub mod traits;
pub mod ui;
