use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};
use weekgrid_model::grid::{
  CascadeDisplay,
  DEFAULT_ROWS,
  GridOptions,
  MAX_ROWS
};
use weekgrid_model::store::DEFAULT_MAX_TITLE_LEN;

const CONFIG_ENV_VAR: &str =
  "WEEKGRID_CONFIG";
const CONFIG_DIR_NAME: &str = "weekgrid";
const CONFIG_FILE_NAME: &str =
  "config.toml";

#[derive(
  Debug, Clone, PartialEq, Deserialize,
  Serialize,
)]
#[serde(default)]
pub struct Config {
  pub color:        bool,
  pub today:        Option<NaiveDate>,
  pub grid:         GridSection,
  pub tasks:        TasksSection,
  #[serde(skip)]
  pub loaded_files: Vec<PathBuf>
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
  Serialize,
)]
#[serde(default)]
pub struct GridSection {
  pub rows:            usize,
  pub cascade:         CascadeDisplay,
  pub show_blank_rows: bool
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
  Serialize,
)]
#[serde(default)]
pub struct TasksSection {
  pub max_title_len: usize
}

impl Default for Config {
  fn default() -> Self {
    Self {
      color:        true,
      today:        None,
      grid:         GridSection::default(),
      tasks:        TasksSection::default(),
      loaded_files: vec![]
    }
  }
}

impl Default for GridSection {
  fn default() -> Self {
    Self {
      rows:            DEFAULT_ROWS,
      cascade:         CascadeDisplay::Full,
      show_blank_rows: false
    }
  }
}

impl Default for TasksSection {
  fn default() -> Self {
    Self {
      max_title_len: DEFAULT_MAX_TITLE_LEN
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) = resolve_config_path(
      config_override,
      std::env::var(CONFIG_ENV_VAR).ok(),
      dirs::config_dir()
    )
    else {
      warn!(
        "no config file found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    Self::load_file(&path)
  }

  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;

    let mut cfg = Self::from_toml_str(
      &text
    )
    .with_context(|| {
      format!(
        "failed to parse {}",
        path.display()
      )
    })?;
    cfg
      .loaded_files
      .push(path.to_path_buf());
    Ok(cfg)
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let cfg = toml::from_str::<Self>(text)
      .map_err(|e| {
        anyhow!("invalid config: {e}")
      })?;
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      let value = v.trim();
      debug!(key = %key, value = %value, "applying override");

      match key.as_str() {
        | "color" => {
          self.color = parse_bool(value)
            .ok_or_else(|| {
              anyhow!(
                "invalid color setting: \
                 {value}"
              )
            })?;
        }
        | "today" => {
          self.today = if value.is_empty()
          {
            None
          } else {
            Some(parse_iso_date(value)?)
          };
        }
        | "grid.rows" => {
          self.grid.rows = value
            .parse::<usize>()
            .with_context(|| {
              format!(
                "invalid grid.rows: \
                 {value}"
              )
            })?;
        }
        | "grid.cascade" => {
          self.grid.cascade =
            CascadeDisplay::from_key(value)
              .ok_or_else(|| {
                anyhow!(
                  "invalid grid.cascade: \
                   {value} (expected \
                   full or two-rows)"
                )
              })?;
        }
        | "grid.show_blank_rows" => {
          self.grid.show_blank_rows =
            parse_bool(value).ok_or_else(
              || {
                anyhow!(
                  "invalid \
                   grid.show_blank_rows: \
                   {value}"
                )
              }
            )?;
        }
        | "tasks.max_title_len" => {
          self.tasks.max_title_len = value
            .parse::<usize>()
            .with_context(|| {
              format!(
                "invalid \
                 tasks.max_title_len: \
                 {value}"
              )
            })?;
        }
        | other => {
          warn!(key = %other, "ignoring unknown config override");
        }
      }
    }

    Ok(())
  }

  pub fn sanitize(&mut self) {
    if self.grid.rows == 0 {
      warn!("grid.rows must be at least 1");
      self.grid.rows = 1;
    }
    if self.grid.rows > MAX_ROWS {
      warn!(
        rows = self.grid.rows,
        max = MAX_ROWS,
        "clamping grid.rows"
      );
      self.grid.rows = MAX_ROWS;
    }
    if self.tasks.max_title_len == 0 {
      self.tasks.max_title_len =
        DEFAULT_MAX_TITLE_LEN;
    }
  }

  #[must_use]
  pub fn grid_options(
    &self
  ) -> GridOptions {
    GridOptions {
      rows:    self.grid.rows,
      cascade: self.grid.cascade
    }
  }
}

/// `--config` wins, then the
/// `WEEKGRID_CONFIG` value, then
/// `<base>/weekgrid/config.toml` when it
/// exists.
#[tracing::instrument(skip(
  override_path, base
))]
pub fn resolve_config_path(
  override_path: Option<&Path>,
  env_value: Option<String>,
  base: Option<PathBuf>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Some(raw) = env_value {
    let trimmed = raw.trim();
    if trimmed == "/dev/null" {
      return None;
    }
    if !trimmed.is_empty() {
      return Some(PathBuf::from(trimmed));
    }
  }

  let Some(base) = base else {
    debug!(
      "no platform config directory"
    );
    return None;
  };
  let candidate = base
    .join(CONFIG_DIR_NAME)
    .join(CONFIG_FILE_NAME);
  candidate.exists().then_some(candidate)
}

pub fn parse_iso_date(
  raw: &str
) -> anyhow::Result<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    "%Y-%m-%d"
  )
  .with_context(|| {
    format!(
      "expected YYYY-MM-DD, got: {raw}"
    )
  })
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  fn overrides(
    pairs: &[(&str, &str)]
  ) -> Vec<(String, String)> {
    pairs
      .iter()
      .map(|(k, v)| {
        (k.to_string(), v.to_string())
      })
      .collect()
  }

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = Config::from_toml_str("")
      .expect("parse empty");
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.grid.rows, DEFAULT_ROWS);
    assert_eq!(
      cfg.grid.cascade,
      CascadeDisplay::Full
    );
  }

  #[test]
  fn loads_sections_from_file() {
    let mut file =
      tempfile::NamedTempFile::new()
        .expect("temp file");
    writeln!(
      file,
      "color = false\n\
       today = \"2026-10-18\"\n\
       [grid]\n\
       rows = 4\n\
       cascade = \"two-rows\"\n\
       [tasks]\n\
       max_title_len = 12"
    )
    .expect("write config");

    let cfg = Config::load(Some(file.path()))
      .expect("load config");
    assert!(!cfg.color);
    assert_eq!(
      cfg.today,
      NaiveDate::from_ymd_opt(2026, 10, 18)
    );
    assert_eq!(cfg.grid.rows, 4);
    assert_eq!(
      cfg.grid.cascade,
      CascadeDisplay::TwoRows
    );
    assert_eq!(cfg.tasks.max_title_len, 12);
    assert_eq!(
      cfg.loaded_files,
      vec![file.path().to_path_buf()]
    );
  }

  #[test]
  fn missing_override_file_is_an_error() {
    let dir =
      tempfile::tempdir().expect("tempdir");
    let err = Config::load(Some(
      &dir.path().join("absent.toml")
    ))
    .expect_err("missing file");
    assert!(
      format!("{err:#}")
        .contains("failed to read")
    );
  }

  #[test]
  fn rejects_unknown_cascade_in_file() {
    assert!(
      Config::from_toml_str(
        "[grid]\ncascade = \"deep\""
      )
      .is_err()
    );
  }

  #[test]
  fn overrides_take_dotted_keys() {
    let mut cfg = Config::default();
    cfg
      .apply_overrides(overrides(&[
        ("rc.grid.rows", "3"),
        ("grid.cascade", "two-rows"),
        ("color", "off"),
        ("today", "2026-01-05"),
        ("no.such.key", "1")
      ]))
      .expect("apply overrides");

    assert_eq!(cfg.grid.rows, 3);
    assert_eq!(
      cfg.grid.cascade,
      CascadeDisplay::TwoRows
    );
    assert!(!cfg.color);
    assert_eq!(
      cfg.today,
      NaiveDate::from_ymd_opt(2026, 1, 5)
    );
  }

  #[test]
  fn bad_override_values_fail() {
    for pair in [
      ("grid.rows", "many"),
      ("color", "maybe"),
      ("today", "18/10/2026")
    ] {
      let mut cfg = Config::default();
      assert!(
        cfg
          .apply_overrides(overrides(&[
            pair
          ]))
          .is_err(),
        "expected {pair:?} to fail"
      );
    }
  }

  #[test]
  fn sanitize_clamps_limits() {
    let mut cfg = Config::default();
    cfg.grid.rows = 0;
    cfg.tasks.max_title_len = 0;
    cfg.sanitize();
    assert_eq!(cfg.grid.rows, 1);
    assert_eq!(
      cfg.tasks.max_title_len,
      DEFAULT_MAX_TITLE_LEN
    );

    cfg.grid.rows = 500;
    cfg.sanitize();
    assert_eq!(cfg.grid.rows, MAX_ROWS);
  }

  #[test]
  fn config_flag_beats_environment() {
    let flag = Path::new("/tmp/flag.toml");
    assert_eq!(
      resolve_config_path(
        Some(flag),
        Some("/tmp/env.toml".to_string()),
        None
      ),
      Some(flag.to_path_buf())
    );
  }

  #[test]
  fn environment_path_and_dev_null() {
    let dir =
      tempfile::tempdir().expect("tempdir");
    assert_eq!(
      resolve_config_path(
        None,
        Some(" /srv/weekgrid.toml ".to_string()),
        Some(dir.path().to_path_buf())
      ),
      Some(PathBuf::from("/srv/weekgrid.toml"))
    );
    assert_eq!(
      resolve_config_path(
        None,
        Some("/dev/null".to_string()),
        Some(dir.path().to_path_buf())
      ),
      None
    );
  }

  #[test]
  fn default_file_is_used_only_when_present() {
    let dir =
      tempfile::tempdir().expect("tempdir");
    let base = dir.path().to_path_buf();
    assert_eq!(
      resolve_config_path(
        None,
        Some(String::new()),
        Some(base.clone())
      ),
      None
    );
    assert_eq!(
      resolve_config_path(None, None, None),
      None
    );

    let config_dir = base.join("weekgrid");
    fs::create_dir_all(&config_dir)
      .expect("create config dir");
    let file = config_dir.join("config.toml");
    fs::write(&file, "[grid]\nrows = 5\n")
      .expect("write config");
    assert_eq!(
      resolve_config_path(None, None, Some(base)),
      Some(file.clone())
    );
    assert_eq!(
      Config::load_file(&file)
        .expect("load default file")
        .grid
        .rows,
      5
    );
  }
}
