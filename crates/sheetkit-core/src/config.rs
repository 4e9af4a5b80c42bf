use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::datetime::DEFAULT_DISPLAY_TIMEZONE;

const CONFIG_FILE: &str =
  "sheetkit.toml";
const CONFIG_ENV_VAR: &str =
  "SHEETKIT_CONFIG";
const TIMEZONE_ENV_VAR: &str =
  "SHEETKIT_TIMEZONE";
const DEFAULT_CELL_VALUE: f64 = 0.5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  timezone:   Option<String>,
  output_dir: Option<PathBuf>,
  #[serde(default)]
  grid:       GridSection
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
  cell_value: Option<f64>
}

#[derive(Debug, Clone)]
pub struct Config {
  pub timezone:        Tz,
  pub output_dir:      PathBuf,
  pub grid_cell_value: f64,
  pub loaded_file:     Option<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      timezone:        default_timezone(),
      output_dir:      PathBuf::from("."),
      grid_cell_value: DEFAULT_CELL_VALUE,
      loaded_file:     None
    }
  }
}

/// Process state consulted while
/// locating and overriding config.
#[derive(Debug, Clone, Default)]
pub struct ConfigEnv {
  pub config_path: Option<String>,
  pub timezone:    Option<String>,
  /// Directory searched for
  /// `sheetkit.toml`.
  pub working_dir: PathBuf,
  pub user_config: Option<PathBuf>
}

impl ConfigEnv {
  #[must_use]
  pub fn from_process() -> Self {
    Self {
      config_path: std::env::var(
        CONFIG_ENV_VAR
      )
      .ok(),
      timezone:    std::env::var(
        TIMEZONE_ENV_VAR
      )
      .ok(),
      working_dir: PathBuf::new(),
      user_config: dirs::config_dir()
        .map(|dir| {
          dir
            .join("sheetkit")
            .join("config.toml")
        })
    }
  }
}

impl Config {
  /// Loads the first config file found,
  /// then applies
  /// `SHEETKIT_TIMEZONE`.
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    Self::load_with(
      config_override,
      &ConfigEnv::from_process()
    )
  }

  #[tracing::instrument]
  pub fn load_with(
    config_override: Option<&Path>,
    env: &ConfigEnv
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    if let Some(path) =
      resolve_config_path(
        config_override,
        env
      )?
    {
      info!(config = %path.display(), "loading config");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no config file found; using \
         defaults"
      );
    }

    if let Some(raw) =
      env.timezone.as_deref()
      && let Some(tz) = parse_timezone(
        raw,
        TIMEZONE_ENV_VAR
      )
    {
      cfg.timezone = tz;
    }

    Ok(cfg)
  }

  /// Joins `file_name` onto the output
  /// directory, creating it first when
  /// missing.
  #[tracing::instrument(skip(self))]
  pub fn output_path(
    &self,
    file_name: &str
  ) -> anyhow::Result<PathBuf> {
    let dir = &self.output_dir;
    if !dir.as_os_str().is_empty()
      && !dir.exists()
    {
      info!(dir = %dir.display(), "creating output directory");
      fs::create_dir_all(dir)
        .with_context(|| {
          format!(
            "failed to create {}",
            dir.display()
          )
        })?;
    }
    Ok(dir.join(file_name))
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;

    let parsed: ConfigFile =
      toml::from_str(&raw)
        .with_context(|| {
          format!(
            "failed to parse {}",
            path.display()
          )
        })?;

    if let Some(raw_tz) =
      parsed.timezone.as_deref()
      && let Some(tz) = parse_timezone(
        raw_tz,
        &format!(
          "file:{}",
          path.display()
        )
      )
    {
      self.timezone = tz;
    }

    if let Some(dir) = parsed.output_dir
    {
      self.output_dir = expand_tilde(&dir);
    }

    if let Some(value) =
      parsed.grid.cell_value
    {
      if !value.is_finite() {
        return Err(anyhow!(
          "grid.cell_value in {} must \
           be a finite number",
          path.display()
        ));
      }
      self.grid_cell_value = value;
    }

    self.loaded_file =
      Some(path.to_path_buf());
    Ok(())
  }
}

#[tracing::instrument]
fn resolve_config_path(
  override_path: Option<&Path>,
  env: &ConfigEnv
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    let path = expand_tilde(path);
    if !path.exists() {
      return Err(anyhow!(
        "config file {} does not exist",
        path.display()
      ));
    }
    return Ok(Some(path));
  }

  if let Some(raw) =
    env.config_path.as_deref()
  {
    let trimmed = raw.trim();
    if trimmed == "/dev/null" {
      return Ok(None);
    }
    if !trimmed.is_empty() {
      return Ok(Some(expand_tilde(
        Path::new(trimmed)
      )));
    }
  }

  let local =
    env.working_dir.join(CONFIG_FILE);
  if local.exists() {
    return Ok(Some(local));
  }

  if let Some(candidate) =
    env.user_config.as_ref()
    && candidate.exists()
  {
    return Ok(Some(candidate.clone()));
  }

  Ok(None)
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      debug!(
        source,
        timezone = %trimmed,
        "configured display timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

fn default_timezone() -> Tz {
  DEFAULT_DISPLAY_TIMEZONE
    .parse::<Tz>()
    .unwrap_or(chrono_tz::Asia::Kolkata)
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
