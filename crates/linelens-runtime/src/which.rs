//! Minimal `PATH` lookup for the external tools the adapters shell out to.

use std::path::PathBuf;

/// Finds the first of `names` that exists in `PATH`.
///
/// Names are tried in order of preference: the first name that resolves
/// anywhere on `PATH` wins, even if a later name appears in an earlier
/// directory.
pub(crate) fn find_in_path(names: &[&str]) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();
    find_in_dirs(&dirs, names)
}

fn find_in_dirs(dirs: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    for name in names {
        for dir in dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "").expect("failed to create stub file");
        path
    }

    #[test]
    fn test_first_name_wins_over_earlier_directories() {
        let first = tempfile::tempdir().expect("failed to create temp dir");
        let second = tempfile::tempdir().expect("failed to create temp dir");
        touch(first.path(), "espeak");
        let preferred = touch(second.path(), "espeak-ng");

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = find_in_dirs(&dirs, &["espeak-ng", "espeak"]);

        assert_eq!(found, Some(preferred));
    }

    #[test]
    fn test_falls_back_to_later_names() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let fallback = touch(dir.path(), "espeak");

        let dirs = vec![dir.path().to_path_buf()];
        let found = find_in_dirs(&dirs, &["espeak-ng", "espeak"]);

        assert_eq!(found, Some(fallback));
    }

    #[test]
    fn test_missing_everywhere_is_none() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let dirs = vec![dir.path().to_path_buf()];

        assert_eq!(find_in_dirs(&dirs, &["espeak-ng", "espeak"]), None);
    }

    #[test]
    fn test_directories_do_not_count_as_tools() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir(dir.path().join("espeak")).expect("failed to create subdir");

        let dirs = vec![dir.path().to_path_buf()];
        assert_eq!(find_in_dirs(&dirs, &["espeak"]), None);
    }
}
