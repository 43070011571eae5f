use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const MATRIX_EXTENSION: &str = "csv";

/// Per-user directory for saved matrices
pub fn user_matrix_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("particle-life"))
}

/// Directories scanned when the picker opens: cwd, `matrices/`, then the user directory
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("."), PathBuf::from("matrices")];
    dirs.extend(user_matrix_dir());
    dirs
}

/// All `.csv` files directly inside `dirs`, sorted. Unreadable directories are skipped.
pub fn scan(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for dir in dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Skipping {}: {}", dir.display(), err);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_matrix = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(MATRIX_EXTENSION));
            if is_matrix && path.is_file() {
                found.push(path);
            }
        }
    }
    found.sort();
    found.dedup();
    found
}

/// Popup state for choosing a matrix file to load
#[derive(Debug, Clone, Default)]
pub struct FilePicker {
    pub entries: Vec<PathBuf>,
    pub selected_idx: usize,
}

impl FilePicker {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self {
            entries,
            selected_idx: 0,
        }
    }

    /// Scan the given directories and open on the first entry
    pub fn open(dirs: &[PathBuf]) -> Self {
        Self::new(scan(dirs))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<&Path> {
        self.entries.get(self.selected_idx).map(PathBuf::as_path)
    }

    /// Navigate up, wrapping to the bottom
    pub fn nav_up(&mut self) {
        if self.selected_idx > 0 {
            self.selected_idx -= 1;
        } else {
            self.selected_idx = self.entries.len().saturating_sub(1);
        }
    }

    /// Navigate down, wrapping to the top
    pub fn nav_down(&mut self) {
        if self.selected_idx < self.entries.len().saturating_sub(1) {
            self.selected_idx += 1;
        } else {
            self.selected_idx = 0;
        }
    }
}

/// Short label for a picker row
pub fn display_name(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_lists_only_csv_sorted() {
        let dir = tempdir().unwrap();
        for name in ["zeta.csv", "alpha.csv", "notes.txt", "Mid.CSV"] {
            fs::write(dir.path().join(name), "0;").unwrap();
        }
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let found = scan(&[dir.path().to_path_buf()]);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Mid.CSV", "alpha.csv", "zeta.csv"]);
    }

    #[test]
    fn test_scan_skips_missing_dirs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        let found = scan(&[PathBuf::from("/nonexistent/matrices"), dir.path().to_path_buf()]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut picker = FilePicker::new(vec![
            PathBuf::from("a.csv"),
            PathBuf::from("b.csv"),
            PathBuf::from("c.csv"),
        ]);
        picker.nav_up();
        assert_eq!(picker.selected(), Some(Path::new("c.csv")));
        picker.nav_down();
        assert_eq!(picker.selected(), Some(Path::new("a.csv")));
        picker.nav_down();
        assert_eq!(picker.selected(), Some(Path::new("b.csv")));
    }

    #[test]
    fn test_empty_picker_has_no_selection() {
        let mut picker = FilePicker::default();
        picker.nav_down();
        picker.nav_up();
        assert!(picker.is_empty());
        assert_eq!(picker.selected(), None);
    }

    #[test]
    fn test_display_name_strips_cwd() {
        assert_eq!(display_name(Path::new("./save.csv")), "save.csv");
        assert_eq!(display_name(Path::new("matrices/base.csv")), "matrices/base.csv");
    }
}
