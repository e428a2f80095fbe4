use ticker_core::TickerItem;

use crate::ids::ItemId;

/// A single headline shown in the ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Headline {
    pub id: ItemId,
    pub source: String,
    pub title: String,
}

impl Headline {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_id(ItemId::new(), source, title)
    }

    pub fn with_id(
        id: ItemId,
        source: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source: source.into(),
            title: title.into(),
        }
    }

    /// Text as rendered in the strip.
    pub fn label(&self) -> String {
        format!("{} | {}", self.source.to_uppercase(), self.title)
    }

    /// Rough monospace width of the rendered label. Stands in for a real
    /// measurement pass in headless hosts.
    pub fn estimate_width(&self, char_width: f32, padding: f32) -> f32 {
        self.label().chars().count() as f32 * char_width + 2.0 * padding
    }
}

impl TickerItem for Headline {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}
