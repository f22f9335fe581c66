//! Weather form - query a weather service by city, coordinates or forecast
//!
//! The library exposes the app's modules so the binary and tests share them.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod icons;
pub mod reducer;
pub mod report;
pub mod state;
