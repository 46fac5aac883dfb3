//! ListThemesHandler - Query handler for catalog themes.

use std::sync::Arc;

use crate::domain::catalog::Theme;
use crate::domain::reservation::ReservationError;
use crate::ports::CatalogReader;

/// Handler for listing themes.
pub struct ListThemesHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl ListThemesHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<Theme>, ReservationError> {
        Ok(self.catalog.list_themes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    #[tokio::test]
    async fn lists_catalog_themes() {
        let fx = Fixture::new().await;
        fx.catalog.add_theme("Clockwork", "", 18000).await;

        let themes = ListThemesHandler::new(Arc::new(fx.catalog.clone()))
            .handle()
            .await
            .unwrap();

        assert_eq!(
            themes.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["Sunken Lab", "Clockwork"]
        );
    }
}
