//! Reusable widgets: overlays and the loading placeholder.

pub mod confirm;
pub mod form;
pub mod loading;
pub mod popup;
