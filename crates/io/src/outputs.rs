//! Output file naming for one run.

use std::path::{Path, PathBuf};

/// Names the files produced for input number `index` (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    /// Places every output under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `error_<index>.parquet`
    pub fn error_map(&self, index: usize) -> PathBuf {
        self.dir.join(format!("error_{index}.parquet"))
    }

    /// `mean_<index>.parquet`
    pub fn mean_map(&self, index: usize) -> PathBuf {
        self.dir.join(format!("mean_{index}.parquet"))
    }

    /// `global_<index>`
    pub fn global(&self, index: usize) -> PathBuf {
        self.region("global", index)
    }

    /// `<region>_<index>`
    pub fn region(&self, name: &str, index: usize) -> PathBuf {
        self.dir.join(format!("{name}_{index}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_index() {
        let layout = OutputLayout::new("outputs");
        assert_eq!(layout.error_map(1), Path::new("outputs/error_1.parquet"));
        assert_eq!(layout.mean_map(2), Path::new("outputs/mean_2.parquet"));
        assert_eq!(layout.global(3), Path::new("outputs/global_3"));
        assert_eq!(
            layout.region("8_tile_0001", 3),
            Path::new("outputs/8_tile_0001_3")
        );
    }
}
