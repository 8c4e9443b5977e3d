//! Share-link helpers: URL building, copy fallback order, and the
//! "Copied!" acknowledgment state.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

#[cfg(test)]
#[path = "share_link_test.rs"]
mod share_link_test;

/// How long the "Copied!" acknowledgment stays visible.
pub const ACK_DURATION_MS: u32 = 2_000;

pub const SHARE_LABEL: &str = "Share";
pub const COPIED_LABEL: &str = "Copied!";

/// Everything except RFC 3986 unreserved characters gets percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Build the shareable canvas URL: `{origin}/canvas/{id}`.
pub fn canvas_url(origin: &str, canvas_id: &str) -> String {
    format!("{}/canvas/{}", origin.trim().trim_end_matches('/'), utf8_percent_encode(canvas_id.trim(), PATH_SEGMENT))
}

/// Text shown by the last-resort alert; always contains the full URL.
pub fn manual_copy_message(url: &str) -> String {
    format!("Copy this link to share the canvas:\n{url}")
}

/// Alert text when the page origin cannot be read, so no URL can be built.
pub const LINK_UNAVAILABLE_MESSAGE: &str = "Could not build a share link for this canvas. Copy the address bar URL instead.";

// =============================================================================
// COPY FALLBACK CHAIN
// =============================================================================

/// Ways of getting the URL to the user, tried in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyMethod {
    /// Async `navigator.clipboard.writeText`.
    ClipboardApi,
    /// Hidden textarea + `document.execCommand("copy")`.
    ExecCommand,
    /// Blocking `alert` with the URL for manual copying. Cannot fail.
    ManualAlert,
}

impl CopyMethod {
    pub const FIRST: Self = Self::ClipboardApi;

    /// Method to try after this one fails.
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::ClipboardApi => Some(Self::ExecCommand),
            Self::ExecCommand => Some(Self::ManualAlert),
            Self::ManualAlert => None,
        }
    }

    /// Whether the URL actually reached the clipboard.
    pub fn shows_ack(self) -> bool {
        !matches!(self, Self::ManualAlert)
    }
}

// =============================================================================
// ACKNOWLEDGMENT STATE
// =============================================================================

/// "Copied!" flag plus a generation counter.
///
/// Each copy starts a new generation; expiry only clears the flag for the
/// generation that scheduled it, so a stale timer can never cut short a
/// newer acknowledgment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyAck {
    copied: bool,
    generation: u64,
}

impl CopyAck {
    /// Show the acknowledgment; returns the generation the revert timer must carry.
    pub fn start(&mut self) -> u64 {
        self.copied = true;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Revert to the idle label if `generation` is still current.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.copied && self.generation == generation {
            self.copied = false;
            return true;
        }
        false
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn label(&self) -> &'static str {
        if self.copied { COPIED_LABEL } else { SHARE_LABEL }
    }
}
