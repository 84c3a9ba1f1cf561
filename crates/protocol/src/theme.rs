use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::status;
use crate::shared_str::SharedStr;

/// Semantic color tokens resolved by the host's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Accent,

    GridMajor,
    GridMinor,
    LaneSeparator,

    AxisBackground,
    AxisBorder,
    TickLabel,

    NowLine,
    HoverLine,

    ItemLabel,
    ItemProgress,
    SelectionOutline,
}

/// Fill for a drawable: a theme token, or a caller-supplied CSS color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Token(ThemeToken),
    Css(SharedStr),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Paint::Token(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPattern {
    #[default]
    Solid,
    Stripe,
    Dots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Normal,
    Strong,
}

/// How a status is drawn. Patterns keep statuses distinguishable without
/// relying on color alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusStyle {
    /// Overrides segment/item/lane color when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SharedStr>,
    #[serde(default)]
    pub pattern: StatusPattern,
    #[serde(default)]
    pub emphasis: Emphasis,
}

impl StatusStyle {
    pub const fn new(pattern: StatusPattern, emphasis: Emphasis) -> Self {
        Self {
            color: None,
            pattern,
            emphasis,
        }
    }
}

/// Status name → style, built-in defaults merged with caller overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusStyles {
    styles: HashMap<SharedStr, StatusStyle>,
}

impl StatusStyles {
    pub fn defaults() -> Self {
        use Emphasis::{Normal, Strong};
        use StatusPattern::{Dots, Solid, Stripe};

        let styles = [
            (status::QUEUED, StatusStyle::new(Dots, Normal)),
            (status::RUNNING, StatusStyle::new(Solid, Normal)),
            (status::THINKING, StatusStyle::new(Stripe, Normal)),
            (status::RESPONDING, StatusStyle::new(Solid, Strong)),
            (status::REVIEW, StatusStyle::new(Dots, Normal)),
            (status::COMPLETED, StatusStyle::new(Solid, Normal)),
            (status::ERROR, StatusStyle::new(Solid, Strong)),
            (status::CANCELLED, StatusStyle::new(Dots, Normal)),
        ]
        .into_iter()
        .map(|(name, style)| (SharedStr::from(name), style))
        .collect();

        Self { styles }
    }

    /// Defaults with each override replacing the whole entry for its key.
    pub fn merged<'a>(overrides: impl IntoIterator<Item = (&'a SharedStr, &'a StatusStyle)>) -> Self {
        let mut merged = Self::defaults();
        for (name, style) in overrides {
            merged.styles.insert(name.clone(), style.clone());
        }
        merged
    }

    pub fn get(&self, status: &str) -> Option<&StatusStyle> {
        self.styles.get(status)
    }

    /// Style for `status`, solid/normal when unknown.
    pub fn resolve(&self, status: &str) -> StatusStyle {
        self.get(status).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StatusStyles {
    fn default() -> Self {
        Self::defaults()
    }
}
