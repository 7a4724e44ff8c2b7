use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    catalog::StoryCatalog,
    config::{AdminCredentials, SiteConfig},
    records::RecordStore,
    web::{auth::SessionRegistry, uploads::FileRepository},
};

#[derive(Clone)]
pub struct AppState {
    records: RecordStore,
    uploads: FileRepository,
    catalog: Arc<StoryCatalog>,
    sessions: SessionRegistry,
    admin: Arc<AdminCredentials>,
}

impl AppState {
    pub async fn new(config: &SiteConfig) -> Result<Self> {
        let records = RecordStore::open(&config.store)
            .await
            .with_context(|| format!("failed to open {} record store", config.store.label()))?;

        let catalog = StoryCatalog::builtin();
        let uploads = FileRepository::new(config.upload_dir.clone());
        info!(
            stories = catalog.entries().len(),
            upload_dir = %uploads.root().display(),
            "site state ready"
        );

        Ok(Self::from_parts(
            records,
            uploads,
            catalog,
            config.admin.clone(),
        ))
    }

    pub fn from_parts(
        records: RecordStore,
        uploads: FileRepository,
        catalog: StoryCatalog,
        admin: AdminCredentials,
    ) -> Self {
        Self {
            records,
            uploads,
            catalog: Arc::new(catalog),
            sessions: SessionRegistry::default(),
            admin: Arc::new(admin),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn uploads(&self) -> &FileRepository {
        &self.uploads
    }

    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn admin(&self) -> &AdminCredentials {
        &self.admin
    }
}
