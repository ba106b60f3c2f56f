//! Collection loading.
//!
//! One best-effort batch per run: the four endpoints are fetched
//! concurrently, each body is decoded independently, and a failed or
//! unparseable response degrades that one collection to empty with an
//! error-level log line. No retry, no user-visible error state.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::logging::{log, obj, v_num, v_str, Domain, Level};
use crate::model::{Collections, Connection, Job, Project, Recipe};
use crate::state::Config;

#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetch all four collections as one settled batch. Infallible by
    /// contract; partial failure shows up as empty collections, not errors.
    async fn fetch_all(&self) -> Collections;
}

#[derive(Clone, Copy, Debug)]
pub enum SourceKind {
    Http,
    Files,
}

impl SourceKind {
    pub fn from_env() -> Self {
        match std::env::var("SOURCE")
            .unwrap_or_else(|_| "http".to_string())
            .as_str()
        {
            "files" => SourceKind::Files,
            _ => SourceKind::Http,
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn CollectionSource>> {
        match self {
            SourceKind::Http => Ok(Box::new(ApiClient::new(cfg)?)),
            SourceKind::Files => Ok(Box::new(FileSource::new(&cfg.data_dir))),
        }
    }
}

/// HTTP client over the backend API.
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base, path);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("HTTP {} from {}", resp.status(), url));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl CollectionSource for ApiClient {
    async fn fetch_all(&self) -> Collections {
        let (projects, connections, jobs, recipes) = tokio::join!(
            self.fetch_collection::<Project>("/api/projects"),
            self.fetch_collection::<Connection>("/api/connections"),
            self.fetch_collection::<Job>("/api/jobs"),
            self.fetch_collection::<Recipe>("/api/recipes"),
        );
        Collections {
            projects: settled("projects", projects),
            connections: settled("connections", connections),
            jobs: settled("jobs", jobs),
            recipes: settled("recipes", recipes),
        }
    }
}

/// Reads the same four collections from `{dir}/{name}.json`. Offline runs
/// and fixtures go through here.
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
        }
    }

    fn read_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.dir.join(format!("{}.json", name));
        let body = std::fs::read_to_string(&path)
            .map_err(|e| anyhow!("read {}: {}", path.display(), e))?;
        serde_json::from_str(&body).map_err(|e| anyhow!("parse {}: {}", path.display(), e))
    }
}

#[async_trait]
impl CollectionSource for FileSource {
    async fn fetch_all(&self) -> Collections {
        Collections {
            projects: settled("projects", self.read_collection("projects")),
            connections: settled("connections", self.read_collection("connections")),
            jobs: settled("jobs", self.read_collection("jobs")),
            recipes: settled("recipes", self.read_collection("recipes")),
        }
    }
}

/// Fixed in-memory collections. Makes the load path explicit in tests.
pub struct StaticSource {
    data: Collections,
}

impl StaticSource {
    pub fn new(data: Collections) -> Self {
        Self { data }
    }
}

#[async_trait]
impl CollectionSource for StaticSource {
    async fn fetch_all(&self) -> Collections {
        self.data.clone()
    }
}

fn settled<T>(name: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => {
            log(
                Level::Debug,
                Domain::Loader,
                "collection_fetched",
                obj(&[
                    ("collection", v_str(name)),
                    ("count", v_num(items.len() as u64)),
                ]),
            );
            items
        }
        Err(err) => {
            log(
                Level::Error,
                Domain::Loader,
                "collection_failed",
                obj(&[
                    ("collection", v_str(name)),
                    ("error", v_str(&err.to_string())),
                ]),
            );
            Vec::new()
        }
    }
}
