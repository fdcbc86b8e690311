use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ::common::{Gazetteer, GazetteerConfig, GazetteerEntry, GazetteerError};
use reqwest::Client;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ImportConfig, ServerConfig};
use server::entity::{place, record};
use server::importer::dataset::import_rows;
use server::importer::sheet::{DataSheet, LocationSheet};
use server::importer::{ImportReport, import_dataset};
use server::services::users::issue_token;
use server::state::AppState;

pub mod routes {
    pub const RECORDS: &str = "/api/v1/records";
    pub const PUBLISH: &str = "/api/v1/records/publish";
    pub const PLACES: &str = "/api/v1/places";
    pub const FETCH_COORDINATES: &str = "/api/v1/places/fetch-coordinates";
    pub const GEOJSON: &str = "/api/geojson.json";

    pub fn record(id: i32) -> String {
        format!("/api/v1/records/{id}")
    }

    pub fn place(id: i32) -> String {
        format!("/api/v1/places/{id}")
    }

    pub fn publication(id: i32) -> String {
        format!("/api/v1/publications/{id}")
    }
}

pub const VENUSIA: i64 = 48210386;
pub const TARENTUM: i64 = 48210385;

/// Lookup counters shared between a [`StubGazetteer`] and the test.
#[derive(Default)]
pub struct GazetteerStats {
    pub fetches: AtomicUsize,
    /// Lookups that had to load the index first.
    pub cold_fetches: AtomicUsize,
}

/// In-memory gazetteer that counts lookups.
pub struct StubGazetteer {
    places: HashMap<i64, GazetteerEntry>,
    stats: Arc<GazetteerStats>,
    populated: bool,
}

impl StubGazetteer {
    pub fn new(stats: Arc<GazetteerStats>) -> Self {
        let places = [
            (VENUSIA, Some([15.8132, 40.9614])),
            (TARENTUM, Some([17.2433, 40.4732])),
        ]
        .into_iter()
        .map(|(id, repr_point)| (id, GazetteerEntry { repr_point }))
        .collect();

        Self {
            places,
            stats,
            populated: false,
        }
    }
}

#[async_trait]
impl Gazetteer for StubGazetteer {
    async fn populate(&mut self) -> Result<(), GazetteerError> {
        self.populated = true;
        Ok(())
    }

    async fn fetch(&mut self, id: i64) -> Result<Option<GazetteerEntry>, GazetteerError> {
        self.stats.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.populated {
            self.stats.cold_fetches.fetch_add(1, Ordering::SeqCst);
            self.populated = true;
        }
        Ok(self.places.get(&id).cloned())
    }

    fn reset(&mut self) {
        self.populated = false;
    }

    fn is_populated(&self) -> bool {
        self.populated
    }
}

/// A running test server backed by a throwaway SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    pub gazetteer_stats: Arc<GazetteerStats>,
    _dir: TempDir,
}

/// Path to the test fixtures directory.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("db.sqlite").display());

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_days: 1,
            },
            gazetteer: GazetteerConfig::default(),
            import: ImportConfig::default(),
        };

        let db = server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");
        let gazetteer_stats = Arc::new(GazetteerStats::default());
        let state = AppState::new(db, app_config, StubGazetteer::new(gazetteer_stats.clone()));

        let app = server::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            state,
            gazetteer_stats,
            _dir: dir,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Gazetteer lookups made so far.
    pub fn fetch_count(&self) -> usize {
        self.gazetteer_stats.fetches.load(Ordering::SeqCst)
    }

    /// Lookups made before the index was loaded.
    pub fn cold_fetch_count(&self) -> usize {
        self.gazetteer_stats.cold_fetches.load(Ordering::SeqCst)
    }

    /// Import the sample workbook through the shared gazetteer.
    pub async fn import_sample(&self) -> ImportReport {
        let mut gazetteer = self.state.gazetteer.lock().await;
        import_dataset(
            self.db(),
            &mut *gazetteer,
            &fixture("sample_dataset.xlsx"),
            &self.state.config.import,
        )
        .await
        .expect("Import failed")
    }

    /// Import in-memory sheets given as rows of cells; the first data row is
    /// the header.
    pub async fn import_sheets(&self, data: &[&[&str]], locations: &[&[&str]]) -> ImportReport {
        let data = DataSheet::from_rows(cells(data));
        let locations = LocationSheet::from_rows(cells(locations));
        let mut gazetteer = self.state.gazetteer.lock().await;
        import_rows(self.db(), &mut *gazetteer, &data, Some(&locations))
            .await
            .expect("Import failed")
    }

    /// Bearer token for a freshly created API user.
    pub async fn token(&self, username: &str) -> String {
        issue_token(self.db(), &self.state.config.auth, username)
            .await
            .expect("Failed to issue token")
            .token
    }

    pub async fn record(&self, source: &str) -> record::Model {
        record::Entity::find()
            .filter(record::Column::Source.eq(source))
            .one(self.db())
            .await
            .expect("DB query failed")
            .unwrap_or_else(|| panic!("record {source} not found"))
    }

    pub async fn place(&self, name: &str) -> place::Model {
        place::Entity::find()
            .filter(place::Column::Name.eq(name))
            .one(self.db())
            .await
            .expect("DB query failed")
            .unwrap_or_else(|| panic!("place {name} not found"))
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }
}

fn cells(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}
