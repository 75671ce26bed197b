//! Open tabs as search results.
//!
//! Selecting a tab result switches to the existing tab instead of opening
//! a new one. The active tab of its window and pinned tabs get small
//! bonuses so they edge out otherwise identical tabs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::browser::{BrowserApi, TabItem};
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::orchestrator::scoring::{clamp_score, relevance_score};
use crate::source::SourceAdapter;
use crate::types::{SearchResult, SelectAction, SourceKind};

use super::display_title;

/// Source adapter over the platform's open tabs.
pub struct TabSource {
    browser: Arc<dyn BrowserApi>,
    scoring: ScoringConfig,
}

impl TabSource {
    pub fn new(browser: Arc<dyn BrowserApi>, scoring: ScoringConfig) -> Self {
        Self { browser, scoring }
    }

    fn to_result(&self, item: TabItem, query: &str) -> SearchResult {
        let title = display_title(item.title, &item.url);

        let mut score = relevance_score(query, &title, &item.url);
        if item.active {
            score += self.scoring.active_tab_bonus;
        }
        if item.pinned {
            score += self.scoring.pinned_tab_bonus;
        }

        let browser = Arc::clone(&self.browser);
        let tab_id = item.id;
        SearchResult {
            id: format!("tab-{}", item.id),
            kind: SourceKind::Tab,
            title,
            subtitle: Some(item.url.clone()),
            url: Some(item.url),
            icon: None,
            score: clamp_score(score),
            on_select: SelectAction::new(move || {
                let browser = Arc::clone(&browser);
                async move { browser.activate_tab(tab_id).await }
            }),
        }
    }
}

#[async_trait]
impl SourceAdapter for TabSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Tab
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items = self.browser.lookup_tabs(query).await?;
        Ok(items
            .into_iter()
            .map(|item| self.to_result(item, query))
            .collect())
    }
}
