//! Spinner engine crate.
//!
//! The platform + GPU runtime for the spinning-triangle demo, plus the small
//! `math` module that builds its per-frame transform.

pub mod core;
pub mod device;
pub mod input;
pub mod math;
pub mod time;
pub mod window;

pub mod logging;
pub mod render;
