use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Runtime settings, overridable through `GEO_QA_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub graph_path: PathBuf,
    pub wiki_base: String,
    pub seed_page: String,
    pub concurrency: usize,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub progress: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("graph_path", "graph.nt")?
            .set_default("wiki_base", "https://en.wikipedia.org")?
            .set_default(
                "seed_page",
                "List_of_countries_by_population_(United_Nations)",
            )?
            .set_default("concurrency", 8_i64)?
            .set_default("user_agent", "geo_qa/0.1 (knowledge-base crawler)")?
            .set_default("timeout_secs", 30_i64)?
            .set_default("progress", true)?
            .add_source(Environment::with_prefix("GEO_QA").try_parsing(true))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn seed_url(&self) -> String {
        crate::names::wiki_page_url(&self.wiki_base, &self.seed_page)
    }
}

#[cfg(test)]
impl Default for Settings {
    fn default() -> Self {
        Settings {
            graph_path: PathBuf::from("graph.nt"),
            wiki_base: "https://en.wikipedia.org".into(),
            seed_page: "List_of_countries_by_population_(United_Nations)".into(),
            concurrency: 4,
            user_agent: "geo_qa-test".into(),
            timeout_secs: 5,
            progress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_environment() {
        let s = Settings::load().unwrap();
        assert!(s.concurrency > 0);
        assert_eq!(
            s.seed_url(),
            format!("{}/wiki/{}", s.wiki_base.trim_end_matches('/'), s.seed_page)
        );
    }
}
