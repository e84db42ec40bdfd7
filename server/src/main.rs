use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;

mod data_url;
mod gallery;
mod generator;
mod handlers;
mod state;
mod storage;

use crate::gallery::Gallery;
use crate::generator::MoodGenerator;
use crate::handlers::{
    history_handler, image_handler, musify_handler, paintify_handler, remove_handler,
};
use crate::state::AppState;
use crate::storage::{FileStorage, S3Storage, S3StorageConfig, Storage};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    gallery_dir: Option<PathBuf>,
    #[arg(long)]
    public_dir: Option<PathBuf>,
    #[arg(long)]
    s3_bucket: Option<String>,
    #[arg(long)]
    s3_prefix: Option<String>,
    #[arg(long)]
    s3_region: Option<String>,
    #[arg(long)]
    s3_endpoint_url: Option<String>,
    #[arg(long, default_value_t = false)]
    s3_force_path_style: bool,
    #[arg(long)]
    s3_access_key_id: Option<String>,
    #[arg(long)]
    s3_secret_access_key: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let storage: Arc<dyn Storage> = if let Some(bucket) = args.s3_bucket.clone() {
        let mut config = S3StorageConfig::new(bucket);
        config.prefix = args.s3_prefix.clone();
        config.region = args.s3_region.clone();
        config.endpoint_url = args.s3_endpoint_url.clone();
        config.force_path_style = args.s3_force_path_style;
        config.access_key_id = args.s3_access_key_id.clone();
        config.secret_access_key = args.s3_secret_access_key.clone();
        Arc::new(S3Storage::new(config).await)
    } else {
        let gallery_dir = args
            .gallery_dir
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../gallery"));
        if let Err(error) = tokio::fs::create_dir_all(&gallery_dir).await {
            eprintln!("Failed to create gallery dir: {error}");
        }
        Arc::new(FileStorage::new(gallery_dir))
    };

    let index = storage.load_index().await.unwrap_or_default();
    eprintln!("Loaded gallery with {} drawings", index.entries.len());
    let state = AppState {
        gallery: Arc::new(tokio::sync::RwLock::new(Gallery::from_entries(
            index.entries,
        ))),
        storage,
        generator: Arc::new(MoodGenerator),
    };

    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));

    let app = Router::new()
        .route("/paintify", post(paintify_handler))
        .route("/remove", post(remove_handler))
        .route("/musify", post(musify_handler))
        .route("/history", get(history_handler))
        .route("/history/:file", get(image_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Songsketch running at http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server");
    axum::serve(listener, app).await.expect("Server crashed");
}
