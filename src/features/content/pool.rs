//! # Content Pool
//!
//! Loads the task pool from a directory with one file per category.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: YAML category files, `text` field with `task_text` alias
//! - 1.0.0: Initial release

use log::{debug, info, warn};
use serde::Deserialize;
use std::path::Path;

use super::ContentError;

/// A single deliverable task text and the category it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub text: String,
    pub category: String,
}

/// On-disk record shape inside a category file
#[derive(Debug, Deserialize)]
struct ContentRecord {
    #[serde(alias = "task_text")]
    text: String,
}

#[derive(Debug, Clone)]
struct Category {
    name: String,
    items: Vec<ContentItem>,
}

/// Immutable task pool, categories kept in enumeration order
#[derive(Debug, Clone, Default)]
pub struct ContentPool {
    categories: Vec<Category>,
}

impl ContentPool {
    /// Load every `.json`, `.yaml` or `.yml` file in `dir` as one category.
    ///
    /// The category name is the file stem; categories are ordered by file name.
    /// Files with other extensions are skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let io_err = |source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && category_format(&path).is_some() {
                paths.push(path);
            } else {
                debug!("Skipping non-category entry {}", path.display());
            }
        }
        paths.sort();

        let mut categories = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let texts = read_category_file(&path)?;
            if texts.is_empty() {
                warn!("Category '{}' in {} has no tasks", name, path.display());
            }
            categories.push(Category::new(name, texts));
        }

        let pool = Self { categories };
        info!(
            "📚 Loaded {} tasks in {} categories from {}",
            pool.total_items(),
            pool.category_count(),
            dir.display()
        );
        Ok(pool)
    }

    /// Build a pool from in-memory categories, preserving their order
    pub fn from_categories<I, S, T>(categories: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<T>)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|(name, texts)| {
                    Category::new(name.into(), texts.into_iter().map(Into::into).collect())
                })
                .collect(),
        }
    }

    /// Categories in enumeration order with their items
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[ContentItem])> {
        self.categories
            .iter()
            .map(|c| (c.name.as_str(), c.items.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn total_items(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

impl Category {
    fn new(name: String, texts: Vec<String>) -> Self {
        let items = texts
            .into_iter()
            .map(|text| ContentItem {
                text,
                category: name.clone(),
            })
            .collect();
        Self { name, items }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn category_format(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        _ => None,
    }
}

fn read_category_file(path: &Path) -> Result<Vec<String>, ContentError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let parse_err = |message: String| ContentError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let records: Vec<ContentRecord> = match category_format(path) {
        Some(Format::Yaml) => {
            serde_yaml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?
        }
        _ => serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
    };

    Ok(records.into_iter().map(|r| r.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_dir_orders_categories_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("history.json"),
            r#"[{"task_text": "Year of the Battle of Kulikovo?"}, {"task_text": "Who founded Moscow?"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("geography.yaml"),
            "- text: Longest river in Europe?\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let pool = ContentPool::load_dir(dir.path()).unwrap();
        let names: Vec<&str> = pool.categories().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["geography", "history"]);
        assert_eq!(pool.total_items(), 3);

        let (_, history) = pool.categories().nth(1).unwrap();
        assert_eq!(history[0].text, "Year of the Battle of Kulikovo?");
        assert_eq!(history[0].category, "history");
    }

    #[test]
    fn test_empty_file_is_empty_category() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("history.json"), "").unwrap();

        let pool = ContentPool::load_dir(dir.path()).unwrap();
        assert_eq!(pool.category_count(), 1);
        assert_eq!(pool.total_items(), 0);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("history.json"), "[{\"nope\": 1}]").unwrap();

        let err = ContentPool::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentPool::load_dir(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn test_from_categories() {
        let pool = ContentPool::from_categories(vec![("a", vec!["1", "2"]), ("b", vec!["3"])]);
        assert_eq!(pool.category_count(), 2);
        assert_eq!(pool.total_items(), 3);
    }
}
