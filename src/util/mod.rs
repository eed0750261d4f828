//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate storage and environment concerns from store and
//! router logic to improve reuse and testability.

pub mod cookie;
pub mod i18n;
pub mod image;
pub mod storage;
