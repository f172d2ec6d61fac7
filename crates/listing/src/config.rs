//! Controller configuration.

/// Message shown when a failed search carries no text of its own.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Behavior switches for a [`ListController`](crate::ListController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Fetch once when the controller is mounted (default: true)
    pub auto_load: bool,

    /// Message recorded when the service supplies none
    pub fallback_error_message: String,
}

impl ListConfig {
    /// Configure whether `mount` fetches (default: true)
    pub fn with_auto_load(mut self, auto_load: bool) -> Self {
        self.auto_load = auto_load;
        self
    }

    /// Configure the message used for failures without service text
    pub fn with_fallback_error_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_error_message = message.into();
        self
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            auto_load: true,
            fallback_error_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}
