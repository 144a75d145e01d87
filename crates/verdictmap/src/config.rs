use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::{fs, num::NonZeroUsize, path::PathBuf};
use verdictmap_core::db::DEFAULT_PAGE_SIZE;

///
/// Config
///
/// Host configuration. Every field has a default so a partial JSON
/// document (or none at all) is valid.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database holding the `caml` table and the year tables.
    pub database_path: PathBuf,

    /// GeoJSON FeatureCollection with one feature per region.
    pub geometry_path: PathBuf,

    /// Directory of per-judgment knowledge-graph images, `<jid>.png`.
    pub image_dir: PathBuf,

    /// Rows per page; must be positive.
    pub page_size: usize,

    /// Enable verbose session logging.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./CAMLKG.db"),
            geometry_path: PathBuf::from("./geo_taiwan_short.json"),
            image_dir: PathBuf::from("./images"),
            page_size: DEFAULT_PAGE_SIZE.get(),
            debug: false,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| Error::config(format!("invalid config: {err}")))?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let json = fs::read_to_string(&path)
            .map_err(|err| Error::config(format!("cannot read {}: {err}", path.display())))?;

        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.page_size_nonzero().map(|_| ())
    }

    /// Knowledge-graph image for one judgment id.
    #[must_use]
    pub fn graph_image_path(&self, jid: &str) -> PathBuf {
        self.image_dir.join(format!("{jid}.png"))
    }

    pub fn page_size_nonzero(&self) -> Result<NonZeroUsize, Error> {
        NonZeroUsize::new(self.page_size).ok_or_else(|| Error::config("page_size must be positive"))
    }
}
