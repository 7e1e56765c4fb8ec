//! playlist-ajax - background submission of playlist forms
//!
//! Turns playlist management forms (merge, clean, update liked, save queue)
//! into background requests with interface-agnostic feedback: busy controls,
//! a percent indicator driven first by a simulated ramp and then by server
//! job polling, overwrite confirmations and timed notifications. The same
//! seams carry the compare button and page-load flash messages.
//!
//! The browser-facing parts are traits in [`ui`] and [`backend`]; the
//! `plajax` binary binds them to a terminal and an HTTP server.

pub mod backend;
pub mod error;
pub mod listing;
pub mod settings;
pub mod submit;
pub mod types;
pub mod ui;
