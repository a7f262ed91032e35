use anyhow::{bail, Context, Result};
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

static LANG_DIR: Dir = include_dir!("src/lang");

/// Name of the corpus shipped with the binary.
pub const DEFAULT_LANGUAGE: &str = "turkish";

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn new(name: &str) -> Result<Self> {
        read_language_from_file(&format!("{name}.json"))
    }

    /// The embedded Turkish word list.
    pub fn turkish() -> Result<Self> {
        Self::new(DEFAULT_LANGUAGE)
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language> {
    let file = LANG_DIR
        .get_file(file_name)
        .with_context(|| format!("language file {file_name} not found"))?;

    let file_as_str = file
        .contents_utf8()
        .with_context(|| format!("language file {file_name} is not valid utf-8"))?;

    let lang: Language = from_str(file_as_str)
        .with_context(|| format!("unable to deserialize language file {file_name}"))?;

    if lang.words.is_empty() {
        bail!("language {} has no words", lang.name);
    }

    Ok(lang)
}
