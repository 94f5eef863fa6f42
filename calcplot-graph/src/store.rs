//! A directory of rendered plots with a fixed capacity.
//!
//! Every plot is written under a fresh random name. After each write, the store deletes the
//! oldest images until at most `max_files` remain. Eviction is best-effort: other processes may
//! delete files concurrently, so a file that is already gone is not an error, and any other
//! failure is logged and skipped.

use log::{debug, error, info};
use std::{
    fs,
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// The file extension of stored plots.
pub const EXTENSION: &str = "png";

/// A rendered plot in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Where the image was written.
    pub path: PathBuf,

    /// The URL the image is served under.
    pub url: String,
}

/// A capacity-bounded directory of plot images.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    max_files: usize,
    url_prefix: String,
}

impl ArtifactStore {
    /// Opens the store at `dir`, creating the directory if it does not exist.
    pub fn open(
        dir: impl Into<PathBuf>,
        max_files: usize,
        url_prefix: impl Into<String>,
    ) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_files,
            url_prefix: url_prefix.into(),
        })
    }

    /// The directory plots are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The maximum number of plots kept.
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Returns a path in the store that no file has yet, named with 32 random hex digits.
    pub fn fresh_path(&self) -> PathBuf {
        loop {
            let name = format!("{:032x}.{}", rand::random::<u128>(), EXTENSION);
            let path = self.dir.join(name);
            if !path.exists() {
                return path;
            }
        }
    }

    /// Describes a file of the store as an [`Artifact`].
    pub fn artifact(&self, path: PathBuf) -> Artifact {
        let name = path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Artifact {
            url: format!("{}{}", self.url_prefix, name),
            path,
        }
    }

    /// Returns the stored images with their modification times, oldest first. Files with equal
    /// times are ordered by name.
    fn entries(&self) -> io::Result<Vec<(SystemTime, PathBuf)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry in {}: {}", self.dir.display(), err);
                    continue;
                },
            };

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != EXTENSION) {
                continue;
            }

            // the file may be removed by someone else between listing and inspecting it
            match entry.metadata() {
                Ok(metadata) if metadata.is_file() => {
                    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                    entries.push((modified, path));
                },
                Ok(_) => (),
                Err(err) => debug!("skipping {}: {}", path.display(), err),
            }
        }

        entries.sort();
        Ok(entries)
    }

    /// Returns the stored images, oldest first.
    pub fn list(&self) -> io::Result<Vec<Artifact>> {
        Ok(self.entries()?
            .into_iter()
            .map(|(_, path)| self.artifact(path))
            .collect())
    }

    /// Deletes the oldest images until at most `max_files` remain.
    ///
    /// Failures never propagate: a file that has already vanished is skipped, and anything else is
    /// logged.
    pub fn enforce_capacity(&self) {
        let entries = match self.entries() {
            Ok(entries) => entries,
            Err(err) => {
                error!("could not list plots in {}: {}", self.dir.display(), err);
                return;
            },
        };

        self.evict(entries);
    }

    /// Deletes the oldest of the listed images until at most `max_files` of them remain.
    /// `entries` must be sorted oldest first, as [`ArtifactStore::entries`] returns them.
    fn evict(&self, entries: Vec<(SystemTime, PathBuf)>) {
        let excess = entries.len().saturating_sub(self.max_files);
        for (_, path) in entries.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => info!("removed old plot {}", path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!("old plot {} was already removed", path.display());
                },
                Err(err) => error!("could not remove old plot {}: {}", path.display(), err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::{fs::File, time::Duration};
    use super::*;

    /// Creates an image file in the store, modified `age` seconds after the epoch.
    fn touch(store: &ArtifactStore, name: &str, age: u64) -> PathBuf {
        let path = store.dir().join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(age)).unwrap();
        path
    }

    fn names(store: &ArtifactStore) -> Vec<String> {
        store.list()
            .unwrap()
            .into_iter()
            .map(|artifact| artifact.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("static").join("plots");
        let store = ArtifactStore::open(&dir, 20, "/static/plots/").unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir);
    }

    #[test]
    fn fresh_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path(), 20, "/static/plots/").unwrap();
        let path = store.fresh_path();
        let name = path.file_name().unwrap().to_str().unwrap();

        assert_eq!(name.len(), 36);
        assert!(name.ends_with(".png"));
        assert!(name[..32].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(store.fresh_path(), path);

        let artifact = store.artifact(path.clone());
        assert_eq!(artifact.url, format!("/static/plots/{}", name));
    }

    #[test]
    fn evicts_oldest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path(), 2, "/").unwrap();
        touch(&store, "c.png", 30);
        touch(&store, "a.png", 10);
        touch(&store, "d.png", 40);
        touch(&store, "b.png", 20);
        touch(&store, "notes.txt", 0);

        assert_eq!(names(&store), ["a.png", "b.png", "c.png", "d.png"]);
        store.enforce_capacity();
        assert_eq!(names(&store), ["c.png", "d.png"]);
        assert!(tmp.path().join("notes.txt").exists());
    }

    #[test]
    fn ties_broken_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path(), 1, "/").unwrap();
        touch(&store, "b.png", 10);
        touch(&store, "a.png", 10);

        store.enforce_capacity();
        assert_eq!(names(&store), ["b.png"]);
    }

    #[test]
    fn under_capacity_keeps_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path(), 5, "/").unwrap();
        touch(&store, "a.png", 10);
        touch(&store, "b.png", 20);

        store.enforce_capacity();
        assert_eq!(names(&store), ["a.png", "b.png"]);
    }

    #[test]
    fn vanished_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path(), 1, "/").unwrap();
        let a = touch(&store, "a.png", 10);
        touch(&store, "b.png", 20);
        touch(&store, "c.png", 30);

        // another process evicts `a.png` after the listing
        let entries = store.entries().unwrap();
        fs::remove_file(&a).unwrap();

        store.evict(entries);
        assert_eq!(names(&store), ["c.png"]);
    }

    #[test]
    fn missing_directory_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path().join("gone"), 1, "/").unwrap();
        fs::remove_dir(store.dir()).unwrap();

        store.enforce_capacity();
        assert!(store.list().is_err());
    }
}
