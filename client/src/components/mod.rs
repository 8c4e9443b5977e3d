//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render canvas chrome and report user intent through
//! caller-supplied callbacks.

pub mod layer_order_controls;
pub mod share_button;
