use crate::grid::Grid;
use crate::rle::{self, Placement, PatternLoadError};
use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A pattern that ships with the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinPattern {
    pub name: &'static str,
    pub description: &'static str,
    pub rle: &'static str,
}

pub const BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    BuiltinPattern {
        name: "Glider",
        description: "Smallest spaceship, travels diagonally",
        rle: "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n",
    },
    BuiltinPattern {
        name: "Blinker",
        description: "Period 2 oscillator",
        rle: "#N Blinker\nx = 3, y = 1, rule = B3/S23\n3o!\n",
    },
    BuiltinPattern {
        name: "Gosper Glider Gun",
        description: "Emits a new glider every 30 generations",
        rle: "#N Gosper glider gun\nx = 36, y = 9, rule = B3/S23\n\
              24bo$22bobo$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o$\
              2o8bo3bob2o4bobo$10bo5bo7bo$11bo3bo$12b2o!\n",
    },
];

/// A pattern file found in the user pattern directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPattern {
    pub name: String,
    pub path: PathBuf,
}

/// Built-in patterns plus `*.rle` files from the user pattern directory
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pub builtin: &'static [BuiltinPattern],
    pub user: Vec<UserPattern>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// Library with user patterns from the default config location
    pub fn new() -> Self {
        match Self::patterns_dir() {
            Some(dir) => Self::with_user_dir(&dir),
            None => Self {
                builtin: BUILTIN_PATTERNS,
                user: Vec::new(),
            },
        }
    }

    /// Library with user patterns from an explicit directory
    pub fn with_user_dir(dir: &Path) -> Self {
        Self {
            builtin: BUILTIN_PATTERNS,
            user: Self::scan_user_dir(dir),
        }
    }

    /// Get the user patterns directory path
    pub fn patterns_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("conway-life").join("patterns"))
    }

    fn scan_user_dir(dir: &Path) -> Vec<UserPattern> {
        if !dir.exists() {
            return Vec::new();
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping pattern directory {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut user: Vec<UserPattern> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "rle"))
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                Some(UserPattern { name, path })
            })
            .collect();
        user.sort_by(|a, b| a.name.cmp(&b.name));
        user
    }

    /// Get pattern names for display, built-ins first
    pub fn names(&self) -> Vec<&str> {
        self.builtin
            .iter()
            .map(|p| p.name)
            .chain(self.user.iter().map(|p| p.name.as_str()))
            .collect()
    }

    /// Find a built-in pattern by name
    pub fn find_builtin(&self, name: &str) -> Option<&BuiltinPattern> {
        self.builtin.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Find a user pattern by name
    pub fn find_user(&self, name: &str) -> Option<&UserPattern> {
        self.user.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Whether a pattern with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.find_builtin(name).is_some() || self.find_user(name).is_some()
    }

    /// Decode the named pattern and place it on the grid.
    /// Built-ins win over user files with the same name.
    pub fn load(
        &self,
        name: &str,
        placement: Placement,
        grid: &mut Grid,
    ) -> Result<(), PatternLoadError> {
        if let Some(pattern) = self.find_builtin(name) {
            return rle::load_named(pattern.name, pattern.rle.as_bytes(), placement, grid);
        }
        if let Some(pattern) = self.find_user(name) {
            return rle::load_pattern_file(&pattern.path, placement, grid);
        }

        warn!("Error loading rle: no pattern named '{}'", name);
        Err(PatternLoadError::unavailable(
            name,
            io::Error::new(io::ErrorKind::NotFound, "no such pattern in the library"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rle::RlePattern;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_headers_match_contents() {
        for builtin in BUILTIN_PATTERNS {
            let pattern = RlePattern::parse(builtin.rle);
            let header = pattern.header().expect("built-in patterns carry a header");
            let (w, h) = pattern.bounding_box().unwrap();
            assert_eq!((header.width as u64, header.height as u64), (w, h), "{}", builtin.name);
        }
    }

    #[test]
    fn test_gosper_gun_population() {
        let library = PatternLibrary::with_user_dir(Path::new("/nonexistent"));
        let pattern = RlePattern::parse(library.find_builtin("gosper glider gun").unwrap().rle);
        assert_eq!(pattern.population(), 36);
    }

    #[test]
    fn test_load_builtin_case_insensitive() {
        let library = PatternLibrary::with_user_dir(Path::new("/nonexistent"));
        let mut grid = Grid::new(10, 10).unwrap();
        library.load("BLINKER", Placement::at(4, 4), &mut grid).unwrap();
        assert_eq!(
            grid.live_cells().collect::<BTreeSet<_>>(),
            BTreeSet::from([(4, 4), (5, 4), (6, 4)])
        );
    }

    #[test]
    fn test_unknown_pattern() {
        let library = PatternLibrary::with_user_dir(Path::new("/nonexistent"));
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(library.user.is_empty());
        assert!(library.load("pentadecathlon", Placement::default(), &mut grid).is_err());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_user_patterns_from_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("diehard.rle"), "x = 8, y = 3\n6bob$2o6b$bo3b3o!\n").unwrap();
        fs::write(dir.path().join("block.rle"), "2o$2o!").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a pattern").unwrap();

        let library = PatternLibrary::with_user_dir(dir.path());
        assert_eq!(
            library.names(),
            vec!["Glider", "Blinker", "Gosper Glider Gun", "block", "diehard"]
        );
        assert!(library.contains("Diehard"));
        assert!(!library.contains("notes"));

        let mut grid = Grid::new(12, 6).unwrap();
        library.load("diehard", Placement::at(1, 1), &mut grid).unwrap();
        assert_eq!(grid.population(), 7);
        assert_eq!(grid.get(7, 1), crate::grid::Cell::Alive);
    }
}
