use std::sync::Arc;

use crate::application::import_service::ImportService;

#[derive(Clone)]
pub struct AppState {
    pub import_service: Arc<ImportService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(import_service: Arc<ImportService>, max_upload_bytes: usize) -> Self {
        Self {
            import_service,
            max_upload_bytes,
        }
    }
}
