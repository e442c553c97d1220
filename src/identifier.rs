use std::fmt;

/// How the identifier text should be interpreted by the recommendation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierMode {
    /// A person's account identifier.
    #[default]
    User,
    /// A product's catalog identifier.
    Product,
}

impl IdentifierMode {
    /// Path segment selecting the service endpoint for this mode.
    pub fn path_segment(self) -> &'static str {
        match self {
            IdentifierMode::User => "user",
            IdentifierMode::Product => "game",
        }
    }

    /// Human facing name of the identifier kind.
    pub fn label(self) -> &'static str {
        match self {
            IdentifierMode::User => "user",
            IdentifierMode::Product => "steam",
        }
    }
}

impl fmt::Display for IdentifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// The chosen identifier mode plus the raw text typed by the user.
///
/// The text is stored verbatim. It is never cleared by a submission, so the
/// same identifier can be resubmitted with a fresh capture.
#[derive(Debug, Clone, Default)]
pub struct IdentifierState {
    mode: IdentifierMode,
    text: String,
}

impl IdentifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch how the text is interpreted. The text itself is kept.
    pub fn set_mode(&mut self, mode: IdentifierMode) {
        if self.mode != mode {
            tracing::debug!(target: "identifier", from = %self.mode, to = %mode, "mode changed");
        }
        self.mode = mode;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn mode(&self) -> IdentifierMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True iff the trimmed text is non-empty.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_in_user_mode() {
        let id = IdentifierState::new();
        assert_eq!(id.mode(), IdentifierMode::User);
        assert_eq!(id.text(), "");
        assert!(!id.is_valid());
    }

    #[test]
    fn validity_follows_latest_text_only() {
        let mut id = IdentifierState::new();
        id.set_text("alice123");
        assert!(id.is_valid());
        id.set_text("   \t ");
        assert!(!id.is_valid());
        id.set_mode(IdentifierMode::Product);
        assert!(!id.is_valid());
        id.set_text(" 42 ");
        assert!(id.is_valid());
    }

    #[test]
    fn mode_switch_keeps_text_verbatim() {
        let mut id = IdentifierState::new();
        id.set_text("  999999 ");
        id.set_mode(IdentifierMode::Product);
        assert_eq!(id.text(), "  999999 ");
        assert_eq!(id.mode(), IdentifierMode::Product);
    }

    #[test]
    fn product_mode_routes_to_game_endpoint() {
        assert_eq!(IdentifierMode::User.path_segment(), "user");
        assert_eq!(IdentifierMode::Product.path_segment(), "game");
        assert_eq!(IdentifierMode::Product.label(), "steam");
    }
}
