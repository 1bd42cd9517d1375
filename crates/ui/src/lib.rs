//! Postbox UI - Terminal shell
//!
//! This crate provides the ratatui-based shell for the Postbox API client:
//! panels for collections, requests, the edit buffer, the response viewer
//! and the environment, driven by a single async event loop.

pub mod app;
pub mod bridge;
pub mod keymap;
mod rendering;
pub mod terminal;

pub use app::App;
pub use bridge::{InputEvent, Tone, UiUpdate, ViewerContent};
pub use keymap::{Action, action_for};
pub use terminal::{Tui, run};
