use serde::{
  Deserialize,
  Serialize
};

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  #[serde(default)]
  pub title:     String,
  #[serde(default)]
  pub completed: bool
}

impl Task {
  #[must_use]
  pub fn new(title: String) -> Self {
    Self {
      title,
      completed: false
    }
  }

  /// Open input slot opened beneath a
  /// filled cell.
  #[must_use]
  pub fn placeholder() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn is_placeholder(&self) -> bool {
    self.title.trim().is_empty()
  }
}

#[must_use]
pub fn normalize_title(
  raw: &str,
  max_len: usize
) -> String {
  let trimmed = raw.trim();
  if max_len == 0
    || trimmed.chars().count() <= max_len
  {
    return trimmed.to_string();
  }

  trimmed
    .chars()
    .take(max_len)
    .collect::<String>()
    .trim_end()
    .to_string()
}
