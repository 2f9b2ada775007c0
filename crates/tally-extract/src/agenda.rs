//! Agenda item titles, used to fill record titles the minutes leave out.

use std::collections::BTreeMap;

use crate::normalize::NormalizedText;
use crate::phrases;

/// Item number to title, parsed from a normalized agenda.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaIndex {
    titles: BTreeMap<String, String>,
}

impl AgendaIndex {
    /// Collect item headers. The first title seen for a number wins, since
    /// agendas often repeat numbers in a trailing index.
    #[must_use]
    pub fn parse(agenda: &NormalizedText) -> Self {
        let mut titles = BTreeMap::new();
        for marker in phrases::item_markers(agenda.as_str()) {
            if let Some(title) = marker.title {
                titles.entry(marker.number).or_insert(title);
            }
        }
        tracing::debug!(items = titles.len(), "parsed agenda");
        Self { titles }
    }

    #[must_use]
    pub fn title(&self, number: &str) -> Option<&str> {
        self.titles
            .get(&number.to_ascii_uppercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
