use std::sync::Arc;

use tokio::sync::RwLock;

use crate::gallery::Gallery;
use crate::generator::SongGenerator;
use crate::storage::Storage;

pub const MAX_GALLERY_ENTRIES: usize = 200;
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub gallery: Arc<RwLock<Gallery>>,
    pub storage: Arc<dyn Storage>,
    pub generator: Arc<dyn SongGenerator>,
}
