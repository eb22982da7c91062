use crate::number::{parse_magnitude, parse_percent};
use serde::Serialize;

/// One entry of the index table as read from the current page.
///
/// `market_cap_in_millions` is only ever derived from `market_cap_text`, so
/// the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constituent {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    percent_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_cap_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_cap_in_millions: Option<f64>,
}

impl Constituent {
    /// A constituent named `name`, or `None` if the name is blank.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            percent_change: None,
            market_cap_text: None,
            market_cap_in_millions: None,
        })
    }

    /// Attach the market cap as rendered; blank text leaves it unset.
    pub fn with_market_cap_text(mut self, text: &str) -> Self {
        let text = text.trim();
        if !text.is_empty() {
            self.market_cap_in_millions = parse_magnitude(text);
            self.market_cap_text = Some(text.to_string());
        }
        self
    }

    /// Attach the change parsed from text such as `+1.23%`; anything
    /// unparseable leaves it unset.
    pub fn with_percent_change_text(mut self, text: &str) -> Self {
        self.percent_change = parse_percent(text);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn percent_change(&self) -> Option<f64> {
        self.percent_change
    }

    pub fn market_cap_text(&self) -> Option<&str> {
        self.market_cap_text.as_deref()
    }

    pub fn market_cap_in_millions(&self) -> Option<f64> {
        self.market_cap_in_millions
    }
}
