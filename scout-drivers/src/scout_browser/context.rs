use async_trait::async_trait;
use regex::Regex;
use scout_common::Result;
use std::fmt;
use std::time::Duration;

/// How an element's visible text must relate to a [`Target`].
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Trimmed text equals the value.
    Exact(String),
    /// Text contains the value.
    Contains(String),
    Pattern(Regex),
}

impl TextMatch {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => text.trim() == expected,
            TextMatch::Contains(needle) => text.contains(needle.as_str()),
            TextMatch::Pattern(re) => re.is_match(text),
        }
    }
}

/// Element locator: a CSS selector, optionally narrowed by text.
///
/// ```
/// use scout_drivers::scout_browser::context::Target;
///
/// let link = Target::css(".paginator a.page-number").with_exact_text("3");
/// assert!(link.accepts_text(" 3 "));
/// assert!(!link.accepts_text("13"));
/// ```
#[derive(Debug, Clone)]
pub struct Target {
    pub css: String,
    pub text: Option<TextMatch>,
}

impl Target {
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: None,
        }
    }

    pub fn with_exact_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(TextMatch::Exact(text.into()));
        self
    }

    pub fn with_text_containing(mut self, text: impl Into<String>) -> Self {
        self.text = Some(TextMatch::Contains(text.into()));
        self
    }

    pub fn with_text_pattern(mut self, re: Regex) -> Self {
        self.text = Some(TextMatch::Pattern(re));
        self
    }

    /// Whether an element with this text satisfies the text filter.
    pub fn accepts_text(&self, text: &str) -> bool {
        self.text.as_ref().is_none_or(|m| m.matches(text))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            None => write!(f, "`{}`", self.css),
            Some(TextMatch::Exact(t)) => write!(f, "`{}` with text \"{}\"", self.css, t),
            Some(TextMatch::Contains(t)) => write!(f, "`{}` containing \"{}\"", self.css, t),
            Some(TextMatch::Pattern(re)) => write!(f, "`{}` matching /{}/", self.css, re),
        }
    }
}

/// A navigable page the extraction core drives.
///
/// Every wait takes an explicit bound and fails with
/// [`ScoutError::Timeout`](scout_common::ScoutError::Timeout) once it elapses;
/// no method blocks indefinitely. Implementations are used by one caller at a
/// time, which is why mutating operations take `&mut self`.
#[async_trait]
pub trait BrowsingContext: Send {
    /// Load `url` in the current browsing context.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Address currently displayed.
    async fn current_url(&self) -> Result<String>;

    /// Wait until at least one element matching `target` is present and displayed.
    async fn wait_for_visible(&self, target: &Target, timeout: Duration) -> Result<()>;

    /// Click the first displayed match of `target`, waiting up to `timeout` for it.
    async fn click(&mut self, target: &Target, timeout: Duration) -> Result<()>;

    /// Run `script` in the page with the first displayed match of `target`
    /// bound to `arguments[0]`, returning the script's return value.
    async fn evaluate_on(
        &mut self,
        target: &Target,
        script: &str,
        timeout: Duration,
    ) -> Result<serde_json::Value>;

    /// Wait until the document is loaded and network activity has gone quiet.
    async fn wait_for_network_settle(&self, timeout: Duration) -> Result<()>;

    /// Text content of every `cell_css` element within every `row_css`
    /// element, in document order. Reading never changes page state.
    async fn read_rows(&self, row_css: &str, cell_css: &str) -> Result<Vec<Vec<String>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_case_sensitive() {
        let t = Target::css("a").with_text_containing("View FTSE 100");
        assert!(t.accepts_text("  View FTSE 100 constituents"));
        assert!(!t.accepts_text("view ftse 100"));
    }

    #[test]
    fn pattern_allows_case_insensitive_match() {
        let t = Target::css("button").with_text_pattern(Regex::new("(?i)accept all cookies").unwrap());
        assert!(t.accepts_text("Accept All Cookies"));
        assert!(!t.accepts_text("Reject all"));
    }

    #[test]
    fn display_names_the_filter() {
        let t = Target::css(".paginator a.page-number").with_exact_text("2");
        assert_eq!(t.to_string(), "`.paginator a.page-number` with text \"2\"");
        assert_eq!(Target::css("tbody tr").to_string(), "`tbody tr`");
    }
}
