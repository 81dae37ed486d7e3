use anyhow::{bail, Context, Result};
use finlens_assistant::OpenAiSettings;
use finlens_core::{is_valid_unit_offset, AggregateOptions, GeoOptions, GeoPoint};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ensure_finlens_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ai: AiSection,
    pub dashboard: DashboardSection,
    pub map: MapSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSection {
    /// When false, `ask` never leaves the machine
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    pub recent_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSection {
    pub unit_offset: f64,
    /// `[lat, lng]`
    pub fallback_center: [f64; 2],
    pub focused_zoom: u8,
    pub fallback_zoom: u8,
}

impl Default for AiSection {
    fn default() -> Self {
        let d = OpenAiSettings::default();
        Self {
            enabled: true,
            model: d.model,
            base_url: d.base_url,
            temperature: d.temperature,
            max_tokens: d.max_tokens,
            timeout_secs: d.timeout.as_secs(),
        }
    }
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            recent_count: AggregateOptions::default().recent_count,
        }
    }
}

impl Default for MapSection {
    fn default() -> Self {
        let d = GeoOptions::default();
        Self {
            unit_offset: d.unit_offset,
            fallback_center: [d.fallback_center.lat, d.fallback_center.lng],
            focused_zoom: d.focused_zoom,
            fallback_zoom: d.fallback_zoom,
        }
    }
}

impl Config {
    pub fn openai_settings(&self, api_key: Option<String>) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.ai.base_url.clone(),
            model: self.ai.model.clone(),
            api_key,
            temperature: self.ai.temperature,
            max_tokens: self.ai.max_tokens,
            timeout: Duration::from_secs(self.ai.timeout_secs),
        }
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            recent_count: self.dashboard.recent_count,
        }
    }

    pub fn geo_options(&self) -> Result<GeoOptions> {
        if !is_valid_unit_offset(self.map.unit_offset) {
            bail!(
                "map.unit_offset must be a positive number of degrees (got {})",
                self.map.unit_offset
            );
        }
        let [lat, lng] = self.map.fallback_center;
        Ok(GeoOptions {
            unit_offset: self.map.unit_offset,
            fallback_center: GeoPoint { lat, lng },
            focused_zoom: self.map.focused_zoom,
            fallback_zoom: self.map.fallback_zoom,
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finlens_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_at(&config_path()?)
}

pub fn load_config_at(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_at(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_at(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_at(&dir.path().join("config.toml")).unwrap();
        assert!(cfg.ai.enabled);
        assert_eq!(cfg.ai.model, "gpt-3.5-turbo");
        assert_eq!(cfg.dashboard.recent_count, 3);
        assert_eq!(cfg.geo_options().unwrap(), GeoOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[ai]\nenabled = false\n\n[dashboard]\nrecent_count = 5\n").unwrap();

        let cfg = load_config_at(&p).unwrap();
        assert!(!cfg.ai.enabled);
        assert_eq!(cfg.ai.max_tokens, 400);
        assert_eq!(cfg.aggregate_options().recent_count, 5);
        assert_eq!(cfg.map.focused_zoom, 12);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.map.fallback_center = [51.5, -0.12];
        cfg.ai.timeout_secs = 5;
        save_config_at(&p, &cfg).unwrap();

        let back = load_config_at(&p).unwrap();
        assert_eq!(back.geo_options().unwrap().fallback_center, GeoPoint { lat: 51.5, lng: -0.12 });
        let settings = back.openai_settings(Some("sk-x".into()));
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.api_key.as_deref(), Some("sk-x"));
    }

    #[test]
    fn test_zero_unit_offset_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[map]\nunit_offset = 0.0\n").unwrap();

        let cfg = load_config_at(&p).unwrap();
        let err = cfg.geo_options().unwrap_err().to_string();
        assert!(err.contains("map.unit_offset"), "{err}");

        let mut cfg = Config::default();
        cfg.map.unit_offset = -0.0002;
        assert!(cfg.geo_options().is_err());
        cfg.map.unit_offset = f64::NAN;
        assert!(cfg.geo_options().is_err());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[ai\nenabled = ").unwrap();
        assert!(load_config_at(&p).is_err());
    }
}
