// src/staging.rs

//! The user-curated list of files a command can be run against.

/// Ordered set of staged file paths. Insertion order is kept and exact
/// duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFiles {
    files: Vec<String>,
}

impl StagedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add paths in order, skipping any already staged. Returns how many
    /// were added.
    pub fn add_many<I, S>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.files.len();
        for path in paths {
            let path = path.into();
            if !self.files.contains(&path) {
                self.files.push(path);
            }
        }
        self.files.len() - before
    }

    /// Remove the given paths. Returns how many were removed.
    pub fn remove<S: AsRef<str>>(&mut self, paths: &[S]) -> usize {
        let before = self.files.len();
        self.files
            .retain(|f| !paths.iter().any(|p| p.as_ref() == f.as_str()));
        before - self.files.len()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.files
    }

    /// Files for one run: the selection if there is one, otherwise every
    /// staged file.
    pub fn batch<S: AsRef<str>>(&self, selected: &[S]) -> Vec<String> {
        if selected.is_empty() {
            self.files.clone()
        } else {
            selected.iter().map(|s| s.as_ref().to_string()).collect()
        }
    }
}
