//! Reading and writing the settings file.
//!
//! The file is always replaced through a sibling `.tmp` file and a rename,
//! so a crash mid-write leaves the previous file intact. Single-section
//! updates go through `toml_edit` and leave the other tables, including
//! hand-written comments, as they are on disk. Every load and update is
//! checked against the same rules the aligner and rescuer enforce.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};
use crate::rescue::RescueConfig;

const FILE_HEADER: &str = "# Reel Core Configuration\n\
# Generated with defaults; edit freely, comments above tables are kept on section updates.\n";

/// Errors from reading, writing or validating the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file path and the settings loaded from it.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Start with default settings; nothing is read until a load call.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory settings. Edits reach disk only through [`save`](Self::save)
    /// or [`update_section`](Self::update_section).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read and validate an existing file.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = parse_and_validate(&content)?;
        Ok(())
    }

    /// Read the file, or write a default one when it is absent.
    ///
    /// A file with unknown or missing sections is rewritten in full with
    /// the defaults filled in.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            self.settings = Settings::default();
            self.save()?;
            tracing::info!("Created default config at {}", self.config_path.display());
            return Ok(());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let (settings, needs_rewrite) = parse_and_check_sections(&content)?;
        self.settings = settings;
        if needs_rewrite {
            tracing::debug!("Rewriting {} with defaults", self.config_path.display());
            self.save()?;
        }
        Ok(())
    }

    /// Write every section, with a comment above each table.
    pub fn save(&self) -> ConfigResult<()> {
        let mut output = String::from(FILE_HEADER);

        for section in ConfigSection::all() {
            // Wrapping in the table name gives nested tables their full path
            let mut wrapper = toml::Table::new();
            wrapper.insert(section.table_name().to_string(), self.section_value(*section)?);

            output.push('\n');
            output.push_str(section.comment());
            output.push('\n');
            output.push_str(&toml::to_string_pretty(&wrapper)?);
        }

        self.replace_file(&output)?;
        Ok(())
    }

    /// Write one section, keeping the rest of the file as it is on disk.
    ///
    /// All in-memory settings are validated first, so a bad value in any
    /// section blocks the write.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        validate(&self.settings)?;

        let on_disk = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };
        let mut doc: DocumentMut = on_disk.parse()?;

        let fresh: DocumentMut = toml::to_string_pretty(&self.section_value(section)?)?.parse()?;
        doc[section.table_name()] = Item::Table(fresh.as_table().clone());

        self.replace_file(&doc.to_string())?;
        Ok(())
    }

    fn section_value(&self, section: ConfigSection) -> ConfigResult<toml::Value> {
        let value = match section {
            ConfigSection::Alignment => toml::Value::try_from(&self.settings.alignment)?,
            ConfigSection::Rescue => toml::Value::try_from(&self.settings.rescue)?,
            ConfigSection::Logging => toml::Value::try_from(&self.settings.logging)?,
        };
        Ok(value)
    }

    /// Write `content` next to the target, sync, then rename over it.
    fn replace_file(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let staging = self.config_path.with_extension("toml.tmp");
        let mut file = fs::File::create(&staging)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.config_path)
    }
}

fn parse_and_validate(content: &str) -> ConfigResult<Settings> {
    let settings: Settings = toml::from_str(content)?;
    validate(&settings)?;
    Ok(settings)
}

/// Parse settings and report whether the file's table set differs from
/// the known sections.
fn parse_and_check_sections(content: &str) -> ConfigResult<(Settings, bool)> {
    let settings = parse_and_validate(content)?;
    let doc: DocumentMut = content.parse()?;

    let known = |key: &str| ConfigSection::all().iter().any(|s| s.table_name() == key);
    let has_unknown = doc.iter().any(|(key, _)| !known(key));
    let has_missing = ConfigSection::all()
        .iter()
        .any(|section| !doc.contains_key(section.table_name()));

    Ok((settings, has_unknown || has_missing))
}

/// Reject values the aligner or rescuer cannot work with.
fn validate(settings: &Settings) -> ConfigResult<()> {
    let align = &settings.alignment;
    if !align.alignment_threshold.is_finite() || align.alignment_threshold < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "alignment.alignment_threshold must be a non-negative number, got {}",
            align.alignment_threshold
        )));
    }
    if !align.max_stretch_ratio.is_finite() || align.max_stretch_ratio <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "alignment.max_stretch_ratio must be a positive number, got {}",
            align.max_stretch_ratio
        )));
    }

    RescueConfig::from(&settings.rescue)
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("rescue: {e}")))
}
