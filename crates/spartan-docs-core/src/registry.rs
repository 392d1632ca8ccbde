//! Built-in registry of the library's documented components and topics.
//!
//! The documentation site does not expose a machine-readable index, so the
//! component and topic lists are maintained here by hand. The warmer iterates
//! these; on-demand lookups may still request names outside the list.

/// Documentation site origin.
pub const DEFAULT_BASE_URL: &str = "https://spartan.ng";

/// Component slugs documented under `/components/{name}`.
pub const KNOWN_COMPONENTS: &[&str] = &[
    "accordion",
    "alert",
    "alert-dialog",
    "aspect-ratio",
    "avatar",
    "badge",
    "breadcrumb",
    "button",
    "calendar",
    "card",
    "carousel",
    "checkbox",
    "collapsible",
    "combobox",
    "command",
    "context-menu",
    "data-table",
    "date-picker",
    "dialog",
    "dropdown-menu",
    "form-field",
    "hover-card",
    "icon",
    "input",
    "input-otp",
    "label",
    "menubar",
    "pagination",
    "popover",
    "progress",
    "radio-group",
    "scroll-area",
    "select",
    "separator",
    "sheet",
    "skeleton",
    "slider",
    "sonner",
    "spinner",
    "switch",
    "table",
    "tabs",
    "textarea",
    "toggle",
    "toggle-group",
    "tooltip",
];

/// Guide topics documented under `/documentation/{topic}`.
pub const DOC_TOPICS: &[&str] = &[
    "introduction",
    "installation",
    "cli",
    "theming",
    "dark-mode",
    "typography",
    "figma",
    "update-guide",
];

/// Resolves documentation URLs for the configured site origin.
#[derive(Debug, Clone)]
pub struct Registry {
    base_url: String,
}

impl Registry {
    /// Registry pointed at the public documentation site.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Registry pointed at a custom origin (primarily for tests).
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The configured site origin, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a component documentation page.
    #[must_use]
    pub fn component_url(&self, name: &str) -> String {
        format!("{}/components/{}", self.base_url, normalize(name))
    }

    /// URL of a guide documentation page.
    #[must_use]
    pub fn documentation_url(&self, topic: &str) -> String {
        format!("{}/documentation/{}", self.base_url, normalize(topic))
    }

    /// Whether a name is in the known-component list (case-insensitive).
    #[must_use]
    pub fn is_known_component(&self, name: &str) -> bool {
        let normalized = normalize(name);
        KNOWN_COMPONENTS.contains(&normalized.as_str())
    }

    /// The full known-component list.
    #[must_use]
    pub fn components(&self) -> &'static [&'static str] {
        KNOWN_COMPONENTS
    }

    /// The full documentation-topic list.
    #[must_use]
    pub fn doc_topics(&self) -> &'static [&'static str] {
        DOC_TOPICS
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-normalized form used for URLs and cache keys.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
