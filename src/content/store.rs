//! Content store - enumerates markdown sources in the posts directory

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ContentError, Result};

/// A markdown source file and the slug derived from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub slug: String,
    pub path: PathBuf,
}

/// Reads markdown files from a single flat directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    /// Open the store, creating the directory when it does not exist yet
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let store = Self {
            dir: dir.as_ref().to_path_buf(),
        };
        store.ensure_dir()?;
        Ok(store)
    }

    /// Create the directory if it is missing (first run, or removed since)
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| ContentError::StoreInit {
                path: self.dir.clone(),
                source,
            })?;
            tracing::info!("Created content directory {:?}", self.dir);
        }
        Ok(())
    }

    /// Directory this store reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All markdown files directly inside the directory, in no particular order.
    ///
    /// One file per slug: when `a.md` and `a.markdown` both exist, the one
    /// [`find`](Self::find) would pick is kept and the other is skipped.
    pub fn entries(&self) -> Result<Vec<SourceFile>> {
        self.ensure_dir()?;
        let mut files: IndexMap<String, PathBuf> = IndexMap::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                ContentError::Io {
                    path,
                    source: e.into(),
                }
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(slug) = slug_for(path) else {
                continue;
            };

            match files.entry(slug) {
                Entry::Vacant(slot) => {
                    slot.insert(path.to_path_buf());
                }
                Entry::Occupied(mut slot) => {
                    let (kept, skipped) = if extension_rank(path) < extension_rank(slot.get()) {
                        (path.to_path_buf(), slot.insert(path.to_path_buf()))
                    } else {
                        (slot.get().clone(), path.to_path_buf())
                    };
                    tracing::warn!(
                        "Skipping {:?}: slug {:?} is already taken by {:?}",
                        skipped,
                        slot.key(),
                        kept
                    );
                }
            }
        }

        tracing::debug!("Found {} markdown files in {:?}", files.len(), self.dir);
        Ok(files
            .into_iter()
            .map(|(slug, path)| SourceFile { slug, path })
            .collect())
    }

    /// Resolve a slug to its source file
    pub fn find(&self, slug: &str) -> Result<SourceFile> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected slug {:?}", slug);
            return Err(ContentError::not_found(slug));
        }

        MARKDOWN_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
            .map(|path| SourceFile {
                slug: slug.to_string(),
                path,
            })
            .ok_or_else(|| ContentError::not_found(slug))
    }
}

/// Recognized extensions, in lookup priority order
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

fn extension_rank(path: &Path) -> usize {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| MARKDOWN_EXTENSIONS.iter().position(|known| *known == ext))
        .unwrap_or(MARKDOWN_EXTENSIONS.len())
}

/// Slug for a markdown path: the file name without its extension
pub fn slug_for(path: &Path) -> Option<String> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    if !MARKDOWN_EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem().and_then(|s| s.to_str())?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

/// Slugs come from file names, so anything that could leave the directory is rejected
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("content").join("posts");
        assert!(!dir.exists());

        let store = ContentStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(store.entries().unwrap().is_empty());

        fs::remove_dir(&dir).unwrap();
        assert!(store.entries().unwrap().is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_entries_only_markdown() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("hello.md"), "# hi").unwrap();
        fs::write(tmp.path().join("long.markdown"), "# hi").unwrap();
        fs::write(tmp.path().join("notes.txt"), "nope").unwrap();
        fs::write(tmp.path().join(".hidden.md"), "nope").unwrap();
        fs::create_dir(tmp.path().join("nested.md")).unwrap();

        let store = ContentStore::open(tmp.path()).unwrap();
        let mut slugs: Vec<_> = store.entries().unwrap().into_iter().map(|f| f.slug).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["hello", "long"]);
    }

    #[test]
    fn test_entries_one_file_per_slug() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.markdown"), "# long").unwrap();
        fs::write(tmp.path().join("a.md"), "# short").unwrap();
        fs::write(tmp.path().join("b.markdown"), "# only").unwrap();

        let store = ContentStore::open(tmp.path()).unwrap();
        let mut files = store.entries().unwrap();
        files.sort_by(|x, y| x.slug.cmp(&y.slug));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].slug, "a");
        assert_eq!(files[0].path, tmp.path().join("a.md"));
        assert_eq!(files[0].path, store.find("a").unwrap().path);
        assert_eq!(files[1].path, tmp.path().join("b.markdown"));
    }

    #[test]
    fn test_find() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("hello-world.md"), "# hi").unwrap();
        let store = ContentStore::open(tmp.path()).unwrap();

        let file = store.find("hello-world").unwrap();
        assert_eq!(file.path, tmp.path().join("hello-world.md"));

        assert!(store.find("missing").unwrap_err().is_not_found());
        assert!(store.find("../hello-world").unwrap_err().is_not_found());
        assert!(store.find("").unwrap_err().is_not_found());
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(slug_for(Path::new("a/b/post.md")), Some("post".to_string()));
        assert_eq!(slug_for(Path::new("post.txt")), None);
        assert_eq!(slug_for(Path::new("README")), None);
    }
}
