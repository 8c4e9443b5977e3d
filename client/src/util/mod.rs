//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate widget logic from browser APIs so it can be tested
//! without a DOM.

pub mod layer_order;
pub mod share_link;
