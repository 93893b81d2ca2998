//! BrowserBuilder for fluent construction of browsing sessions

use super::CatalogBrowser;
use crate::config::BrowserConfig;
use crate::core::CatalogProvider;
use crate::core::error::Result;
use crate::core::events::EventBus;
use std::sync::Arc;

/// Builder for [`CatalogBrowser`]
///
/// # Example
///
/// ```ignore
/// let mut browser = CatalogBrowser::builder(InMemoryCatalogProvider::new())
///     .with_config(BrowserConfig::from_yaml_file("browser.yaml")?)
///     .build()
///     .await?;
///
/// browser.toggle_category("shoes");
/// ```
pub struct BrowserBuilder {
    provider: Arc<dyn CatalogProvider>,
    config: BrowserConfig,
    event_bus: Option<EventBus>,
}

impl BrowserBuilder {
    pub fn new(provider: impl CatalogProvider + 'static) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Use a provider that is shared with other sessions
    pub fn from_shared(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            config: BrowserConfig::default(),
            event_bus: None,
        }
    }

    pub fn with_config(mut self, config: BrowserConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish change events onto an existing bus
    ///
    /// By default each session gets its own bus sized by
    /// `BrowserConfig::event_capacity`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Build the session without fetching provider data
    pub fn build_unloaded(self) -> Result<CatalogBrowser> {
        self.config.validate()?;
        let bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::new(self.config.event_capacity));
        Ok(CatalogBrowser::new(self.provider, self.config, bus))
    }

    /// Build the session and load the catalog
    pub async fn build(self) -> Result<CatalogBrowser> {
        let mut browser = self.build_unloaded()?;
        browser.load().await?;
        Ok(browser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CatalogError;
    use crate::storage::InMemoryCatalogProvider;

    #[test]
    fn test_build_unloaded_has_empty_first_page() {
        let browser = BrowserBuilder::new(InMemoryCatalogProvider::new())
            .build_unloaded()
            .unwrap();

        let view = browser.view();
        assert!(view.records.is_empty());
        assert_eq!(view.pagination.pages, vec![1]);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.sort_label, "Featured");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BrowserConfig {
            default_page_size: 7,
            ..Default::default()
        };
        let err = BrowserBuilder::new(InMemoryCatalogProvider::new())
            .with_config(config)
            .build_unloaded()
            .unwrap_err();

        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[tokio::test]
    async fn test_shared_event_bus() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let _browser = BrowserBuilder::new(InMemoryCatalogProvider::new())
            .with_event_bus(bus)
            .build()
            .await
            .unwrap();

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event.event_kind(), "view");
    }
}
