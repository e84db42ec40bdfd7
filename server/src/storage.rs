use std::path::PathBuf;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use songsketch_shared::{decode_gallery_index, encode_gallery_index, GalleryIndexData};

const INDEX_FILE: &str = "index.bin";

/// Persistence backend for the gallery: the index file plus one PNG per
/// drawing. Writes are best-effort (logged, never fatal); reads report why
/// they failed.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn load_index(&self) -> Result<GalleryIndexData, String>;
    async fn save_index(&self, data: &GalleryIndexData);
    async fn load_image(&self, id: &str) -> Result<Vec<u8>, String>;
    async fn save_image(&self, id: &str, bytes: &[u8]);
    async fn remove_image(&self, id: &str);
}

pub struct FileStorage {
    gallery_dir: PathBuf,
}

impl FileStorage {
    pub fn new(gallery_dir: PathBuf) -> Self {
        Self { gallery_dir }
    }

    fn image_path(&self, id: &str) -> PathBuf {
        self.gallery_dir.join(format!("{id}.png"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load_index(&self) -> Result<GalleryIndexData, String> {
        let path = self.gallery_dir.join(INDEX_FILE);
        let payload = tokio::fs::read(path)
            .await
            .map_err(|error| format!("Failed to read gallery index: {error}"))?;
        decode_gallery_index(&payload)
            .map_err(|error| format!("Failed to decode gallery index: {error:?}"))
    }

    async fn save_index(&self, data: &GalleryIndexData) {
        let path = self.gallery_dir.join(INDEX_FILE);
        let payload = encode_gallery_index(data);
        if let Err(error) = tokio::fs::write(path, payload).await {
            eprintln!("Failed to save gallery index: {error}");
        }
    }

    async fn load_image(&self, id: &str) -> Result<Vec<u8>, String> {
        tokio::fs::read(self.image_path(id))
            .await
            .map_err(|error| format!("Failed to read drawing {id}: {error}"))
    }

    async fn save_image(&self, id: &str, bytes: &[u8]) {
        if let Err(error) = tokio::fs::write(self.image_path(id), bytes).await {
            eprintln!("Failed to save drawing {id}: {error}");
        }
    }

    async fn remove_image(&self, id: &str) {
        if let Err(error) = tokio::fs::remove_file(self.image_path(id)).await {
            eprintln!("Failed to remove drawing {id}: {error}");
        }
    }
}

#[derive(Clone, Debug)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3StorageConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: None,
            region: None,
            endpoint_url: None,
            force_path_style: false,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

pub struct S3Storage {
    bucket: String,
    prefix: String,
    client: Client,
}

impl S3Storage {
    pub async fn new(config: S3StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let (Some(access_key_id), Some(secret_access_key)) = (
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
        ) {
            let creds = Credentials::new(access_key_id, secret_access_key, None, None, "static");
            loader = loader.credentials_provider(creds);
        }
        if let Some(region) = config.region.clone() {
            loader = loader.region(aws_config::Region::new(region));
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint_url) = config.endpoint_url.as_ref() {
            builder = builder.endpoint_url(endpoint_url);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());
        let prefix = config
            .prefix
            .unwrap_or_default()
            .trim_matches('/')
            .to_string();
        Self {
            bucket: config.bucket,
            prefix,
            client,
        }
    }

    fn object_key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.prefix)
        }
    }

    async fn load_object(&self, name: &str) -> Result<Vec<u8>, String> {
        let key = self.object_key(name);
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        let output = match response {
            Ok(output) => output,
            Err(error) => {
                if let Some(service_error) = error.as_service_error() {
                    if service_error.is_no_such_key() {
                        return Err(format!("Object {name} not found"));
                    }
                }
                return Err(format!("Failed to load {name} from s3: {error:?}"));
            }
        };
        match output.body.collect().await {
            Ok(collected) => Ok(collected.into_bytes().to_vec()),
            Err(error) => Err(format!("Failed to read {name} from s3 response: {error:?}")),
        }
    }

    async fn save_object(&self, name: &str, payload: Vec<u8>) {
        let key = self.object_key(name);
        let body = ByteStream::from(payload);
        if let Err(error) = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
        {
            eprintln!("Failed to save {name} to s3: {error:?}");
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn load_index(&self) -> Result<GalleryIndexData, String> {
        let payload = self.load_object(INDEX_FILE).await?;
        decode_gallery_index(&payload)
            .map_err(|error| format!("Failed to decode gallery index: {error:?}"))
    }

    async fn save_index(&self, data: &GalleryIndexData) {
        self.save_object(INDEX_FILE, encode_gallery_index(data))
            .await;
    }

    async fn load_image(&self, id: &str) -> Result<Vec<u8>, String> {
        self.load_object(&format!("{id}.png")).await
    }

    async fn save_image(&self, id: &str, bytes: &[u8]) {
        self.save_object(&format!("{id}.png"), bytes.to_vec()).await;
    }

    async fn remove_image(&self, id: &str) {
        let key = self.object_key(&format!("{id}.png"));
        if let Err(error) = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            eprintln!("Failed to remove drawing {id} from s3: {error:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songsketch_shared::GalleryEntry;

    fn sample_index() -> GalleryIndexData {
        GalleryIndexData {
            entries: vec![GalleryEntry {
                id: "e3b6c1de-8f30-4f3a-9f53-7f9f6f6d2a10".to_string(),
                track_id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
                description: "a busy drawing".to_string(),
                created_at_ms: 1_754_000_000_000,
            }],
        }
    }

    #[tokio::test]
    async fn index_round_trips_through_the_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().to_path_buf());
        storage.save_index(&sample_index()).await;
        let loaded = storage.load_index().await.expect("load");
        assert_eq!(loaded.entries, sample_index().entries);
    }

    #[tokio::test]
    async fn missing_index_reports_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().to_path_buf());
        assert!(storage.load_index().await.is_err());
    }

    #[tokio::test]
    async fn images_round_trip_and_can_be_removed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().to_path_buf());
        storage.save_image("drawing-1", b"png bytes").await;
        let loaded = storage.load_image("drawing-1").await.expect("load");
        assert_eq!(loaded, b"png bytes");
        storage.remove_image("drawing-1").await;
        assert!(storage.load_image("drawing-1").await.is_err());
    }
}
