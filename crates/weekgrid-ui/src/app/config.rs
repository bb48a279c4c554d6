use serde::Deserialize;
use weekgrid_model::grid::{
  CascadeDisplay,
  DEFAULT_ROWS,
  GridOptions,
  MAX_ROWS
};
use weekgrid_model::store::DEFAULT_MAX_TITLE_LEN;

const UI_CONFIG_TOML: &str =
  include_str!("../../assets/weekgrid.toml");

#[derive(
  Clone, Debug, PartialEq, Deserialize,
)]
pub struct UiConfig {
  #[serde(default)]
  pub version: u32,
  #[serde(default)]
  pub grid:    UiGrid,
  #[serde(default)]
  pub tasks:   UiTasks
}

#[derive(
  Clone, Debug, PartialEq, Deserialize,
)]
pub struct UiGrid {
  #[serde(default = "ui_default_rows")]
  pub rows:    usize,
  #[serde(default)]
  pub cascade: CascadeDisplay
}

#[derive(
  Clone, Debug, PartialEq, Deserialize,
)]
pub struct UiTasks {
  #[serde(
    default = "ui_default_max_title_len"
  )]
  pub max_title_len: usize
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      version: 1,
      grid:    UiGrid::default(),
      tasks:   UiTasks::default()
    }
  }
}

impl Default for UiGrid {
  fn default() -> Self {
    Self {
      rows:    ui_default_rows(),
      cascade: CascadeDisplay::Full
    }
  }
}

impl Default for UiTasks {
  fn default() -> Self {
    Self {
      max_title_len:
        ui_default_max_title_len()
    }
  }
}

impl UiConfig {
  pub fn grid_options(
    &self
  ) -> GridOptions {
    GridOptions {
      rows:    self.grid.rows,
      cascade: self.grid.cascade
    }
  }
}

fn ui_default_rows() -> usize {
  DEFAULT_ROWS
}

fn ui_default_max_title_len() -> usize {
  DEFAULT_MAX_TITLE_LEN
}

pub fn load_ui_config() -> UiConfig {
  parse_ui_config(UI_CONFIG_TOML)
}

pub fn parse_ui_config(
  raw: &str
) -> UiConfig {
  match toml::from_str::<UiConfig>(raw) {
    | Ok(mut config) => {
      sanitize_ui_config(&mut config);
      tracing::info!(
        version = config.version,
        rows = config.grid.rows,
        cascade = config.grid.cascade.as_key(),
        "loaded grid config"
      );
      config
    }
    | Err(error) => {
      tracing::error!(%error, "failed parsing grid config; using defaults");
      UiConfig::default()
    }
  }
}

fn sanitize_ui_config(
  config: &mut UiConfig
) {
  config.grid.rows =
    config.grid.rows.clamp(1, MAX_ROWS);
  if config.tasks.max_title_len == 0 {
    config.tasks.max_title_len =
      ui_default_max_title_len();
  }
}
