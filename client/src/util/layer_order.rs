//! Layer-order button definitions and enablement rules.

#[cfg(test)]
#[path = "layer_order_test.rs"]
mod layer_order_test;

/// Hint shown while the buttons are disabled.
pub const NO_SELECTION_HINT: &str = "Select a shape to change its layer order";

/// One of the four z-order moves, in button order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerCommand {
    BringToFront,
    BringForward,
    SendBackward,
    SendToBack,
}

impl LayerCommand {
    pub const ALL: [Self; 4] = [Self::BringToFront, Self::BringForward, Self::SendBackward, Self::SendToBack];

    pub fn label(self) -> &'static str {
        match self {
            Self::BringToFront => "Bring to Front",
            Self::BringForward => "Bring Forward",
            Self::SendBackward => "Send Backward",
            Self::SendToBack => "Send to Back",
        }
    }

    /// Matching `zIndex` operation name; rendered as the button's `data-operation`.
    pub fn operation(self) -> &'static str {
        match self {
            Self::BringToFront => "bringToFront",
            Self::BringForward => "bringForward",
            Self::SendBackward => "sendBackward",
            Self::SendToBack => "sendToBack",
        }
    }

    pub fn css_modifier(self) -> &'static str {
        match self {
            Self::BringToFront => "front",
            Self::BringForward => "forward",
            Self::SendBackward => "backward",
            Self::SendToBack => "back",
        }
    }
}

/// All four buttons share one enabled state.
pub fn controls_enabled(has_selection: bool) -> bool {
    has_selection
}

pub fn hint(has_selection: bool) -> Option<&'static str> {
    (!controls_enabled(has_selection)).then_some(NO_SELECTION_HINT)
}
