use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Settings read from prefixed environment variables. `PREFIX` is joined to
/// the key with `_`, nested sections with `SEPARATOR`: `APP_DATABASE__URL`
/// becomes `database.url`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Process environment, after merging `.env` from the crate root or the
    /// working directory. Variables already set win over the file.
    fn from_env() -> Result<Self> {
        load_dotenv();
        read_settings(None)
    }

    /// Like [`EnvConfig::from_env`], but over `vars` alone.
    fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        read_settings(Some(vars))
    }
}

fn load_dotenv() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}

fn read_settings<C: EnvConfig>(vars: Option<config_rs::Map<String, String>>) -> Result<C> {
    let source = config_rs::Environment::with_prefix(C::PREFIX)
        .prefix_separator("_")
        .separator(C::SEPARATOR)
        .try_parsing(true)
        .source(vars);

    let cfg = config_rs::Config::builder()
        .add_source(source)
        .build()
        .with_context(|| format!("failed to read {}_* variables", C::PREFIX))?
        .try_deserialize::<C>()
        .with_context(|| format!("invalid {}_* settings", C::PREFIX))?;

    cfg.validate()?;
    Ok(cfg)
}
