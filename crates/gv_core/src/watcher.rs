use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Watches a group of files as one unit by polling their modification times.
///
/// The viewer polls the vertex and fragment sources together at frame
/// boundaries; any stage changing means the whole program is rebuilt.
pub struct FileWatcher {
    stamps: Vec<(PathBuf, Option<SystemTime>)>,
}

impl FileWatcher {
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let stamps = paths
            .into_iter()
            .map(|path| {
                let stamp = modified_time(&path);
                (path, stamp)
            })
            .collect();
        Self { stamps }
    }

    /// True when any file now has a different mtime than last seen. A file
    /// that vanished is remembered as missing but does not trigger a change
    /// until it reappears.
    pub fn poll_changed(&mut self) -> bool {
        let mut changed = false;
        for (path, seen) in &mut self.stamps {
            let current = modified_time(path);
            if current.is_some() && current != *seen {
                log::debug!("{} changed on disk", path.display());
                changed = true;
            }
            *seen = current;
        }
        changed
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}
