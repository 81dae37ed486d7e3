use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::state::ensure_finlens_home;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub openai_api_key: Option<String>,
}

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_finlens_home()?.join("auth.json"))
}

pub fn load_auth_at(path: &Path) -> Result<AuthState> {
    if !path.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_auth_at(path: &Path, auth: &AuthState) -> Result<()> {
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Environment first, then the stored key.
pub fn resolve_api_key() -> Result<Option<String>> {
    let from_env = std::env::var(API_KEY_ENV).ok();
    let stored = load_auth_at(&auth_path()?)?.openai_api_key;
    Ok(pick_api_key(from_env, stored))
}

fn pick_api_key(from_env: Option<String>, stored: Option<String>) -> Option<String> {
    from_env
        .filter(|k| !k.trim().is_empty())
        .or(stored.filter(|k| !k.trim().is_empty()))
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn openai_paste_api_key() -> Result<()> {
    let path = auth_path()?;
    let mut auth = load_auth_at(&path)?;
    let key = prompt_secret("Paste OpenAI API key (starts with sk-)")?;
    if !key.starts_with("sk-") {
        bail!("key didn't look like an OpenAI API key (expected prefix sk-)");
    }
    auth.openai_api_key = Some(key);
    save_auth_at(&path, &auth)?;
    println!("Saved OpenAI API key to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_wins() {
        let k = pick_api_key(Some("sk-env".into()), Some("sk-file".into()));
        assert_eq!(k.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_blank_env_key_ignored() {
        let k = pick_api_key(Some("  ".into()), Some("sk-file".into()));
        assert_eq!(k.as_deref(), Some("sk-file"));
        assert_eq!(pick_api_key(None, None), None);
    }

    #[test]
    fn test_auth_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        assert!(load_auth_at(&path).unwrap().openai_api_key.is_none());

        let auth = AuthState {
            openai_api_key: Some("sk-abc".into()),
        };
        save_auth_at(&path, &auth).unwrap();
        assert_eq!(load_auth_at(&path).unwrap().openai_api_key.as_deref(), Some("sk-abc"));
    }
}
