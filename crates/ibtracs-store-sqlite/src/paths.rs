//! Resolution of configured database paths.

use std::path::{Path, PathBuf};

/// Replace a leading `~` component with `$HOME`. Other paths, and all paths
/// when `HOME` is unset, come back unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_a_leading_tilde_component_expands() {
    assert_eq!(expand_tilde(Path::new("/tmp/storms.db")), PathBuf::from("/tmp/storms.db"));
    assert_eq!(expand_tilde(Path::new("data/~/storms.db")), PathBuf::from("data/~/storms.db"));
    assert_eq!(expand_tilde(Path::new("~other/storms.db")), PathBuf::from("~other/storms.db"));
    if let Some(home) = std::env::var_os("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/data/storms.db")),
        PathBuf::from(home).join("data/storms.db")
      );
    }
  }
}
