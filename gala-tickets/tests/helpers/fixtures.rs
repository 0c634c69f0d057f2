//! Template and application fixtures

use gala_common::db::init_memory_database;
use gala_tickets::db::{SqliteTicketStore, TicketStore};
use gala_tickets::services::TicketPipeline;
use gala_tickets::AppState;
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Template size used by default: the QR lands at (50, 10)
pub const TEMPLATE_WIDTH: u32 = 700;
pub const TEMPLATE_HEIGHT: u32 = 520;

/// Application state over an in-memory store and a temporary template
///
/// `_dir` owns the template file and must outlive the test.
pub struct TestApp {
    pub _dir: TempDir,
    pub template_path: PathBuf,
    pub store: Arc<SqliteTicketStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn pipeline(&self) -> &TicketPipeline {
        &self.state.pipeline
    }

    pub fn router(&self) -> axum::Router {
        gala_tickets::build_router(self.state.clone())
    }

    pub async fn stored_codes(&self) -> Vec<String> {
        self.store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.code)
            .collect()
    }
}

/// Write a gradient template PNG of the given size
pub fn write_template(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("ticket.png");
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 160, 255])
    })
    .save_with_format(&path, ImageFormat::Png)
    .unwrap();
    path
}

async fn build(template: Option<(u32, u32)>, store_override: Option<Arc<dyn TicketStore>>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let template_path = match template {
        Some((w, h)) => write_template(dir.path(), w, h),
        None => dir.path().join("ticket.png"),
    };

    let store = Arc::new(SqliteTicketStore::new(init_memory_database().await.unwrap()));
    let app_store: Arc<dyn TicketStore> = match store_override {
        Some(custom) => custom,
        None => store.clone() as Arc<dyn TicketStore>,
    };
    let state = AppState::new(app_store, TicketPipeline::new(template_path.clone()));

    TestApp {
        _dir: dir,
        template_path,
        store,
        state,
    }
}

/// App with a 700x520 template
pub async fn test_app() -> TestApp {
    build(Some((TEMPLATE_WIDTH, TEMPLATE_HEIGHT)), None).await
}

/// App whose template file does not exist
pub async fn test_app_without_template() -> TestApp {
    build(None, None).await
}

/// App with a 700x520 template served through a custom store
///
/// `TestApp::store` is then unrelated to what the app uses.
pub async fn test_app_with_store(store: Arc<dyn TicketStore>) -> TestApp {
    build(Some((TEMPLATE_WIDTH, TEMPLATE_HEIGHT)), Some(store)).await
}

/// Insert codes verbatim, bypassing format validation
pub async fn seed_raw_codes(store: &SqliteTicketStore, codes: &[&str]) {
    for (i, code) in codes.iter().enumerate() {
        sqlx::query(
            "INSERT INTO tickets (id, code, issued_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(format!("seed-{i}"))
        .bind(code)
        .bind("2026-01-01T00:00:00.000Z")
        .bind("2026-01-01T00:00:00.000Z")
        .execute(store.pool())
        .await
        .unwrap();
    }
}
