use std::sync::Arc;

use crate::assets::PhotoSource;
use crate::layout::{PageGeometry, Theme};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Profile photo fetcher. `HttpPhotoSource` in production, stubs in tests.
    pub photos: Arc<dyn PhotoSource>,
    pub theme: Theme,
    pub cv_geometry: PageGeometry,
    pub report_geometry: PageGeometry,
}
