//! Utility functions for path handling

/// Identifier of the project root
pub const ROOT: &str = ".";

/// Normalize a changed path from a diff file into the slash-separated,
/// root-relative form used for package identifiers.
///
/// - Surrounding whitespace is trimmed
/// - Backslashes become forward slashes
/// - Then [`clean_path`] folds the segments
///
/// Returns `None` when the path leaves the project root.
pub fn normalize_path(path: &str) -> Option<String> {
  clean_path(&path.trim().replace('\\', "/"))
}

/// Fold `.`, `..`, repeated and trailing slashes of a slash-separated path.
///
/// Segment names are kept byte for byte. An empty result (e.g. `./`) is the
/// root identifier; a `..` above the root yields `None`.
pub fn clean_path(path: &str) -> Option<String> {
  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop()?;
      }
      _ => segments.push(segment),
    }
  }
  if segments.is_empty() {
    return Some(ROOT.to_string());
  }
  Some(segments.join("/"))
}

/// Parent directory of a normalized path, `"."` for top-level entries
pub fn parent_dir(path: &str) -> &str {
  match path.rsplit_once('/') {
    Some((parent, _)) if !parent.is_empty() => parent,
    _ => ROOT,
  }
}

/// Split newline-delimited diff text into normalized paths, dropping blanks
/// and paths outside the project root
pub fn parse_diff_lines(text: &str) -> Vec<String> {
  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .filter_map(|line| {
      let path = normalize_path(line);
      if path.is_none() {
        tracing::warn!("⚠️ Skipping {:?}, it is outside the project root.", line);
      }
      path
    })
    .collect()
}
