use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// What to do with a search path that exists but can't be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingPolicy {
    /// Log a warning and carry on with the remaining paths.
    #[default]
    Skip,
    /// Fail with [`Error::ReadDir`].
    Strict,
}

/// Expand a leading `~` component to the home directory.
///
/// `~user` is not supported and left untouched.
pub fn expand_home<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                Ok(home)
            } else {
                Ok(home.join(rest))
            }
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// List the immediate subdirectories of every search path, in the order of `paths` and sorted by
/// name within each path. Search paths that don't exist are skipped.
pub fn sub_dirs<P: AsRef<Path>>(paths: &[P], policy: ListingPolicy) -> Result<Vec<String>> {
    let mut result = Vec::new();

    for path in paths {
        let base = expand_home(path)?;

        let span = tracing::debug_span!("walk::sub_dirs", base = %base.display());
        let _enter = span.enter();

        if !base.exists() {
            tracing::debug!("search path doesn't exist, skipping");
            continue;
        }

        let entries = match fs::read_dir(&base) {
            Ok(entries) => entries,
            Err(source) if policy == ListingPolicy::Strict => {
                return Err(Error::ReadDir { path: base, source })
            }
            Err(e) => {
                tracing::warn!("could not list files in {}, skipping: {e}", base.display());
                continue;
            }
        };

        // symlinks to directories count as directories
        let mut names: Vec<_> = readable_entries(&base, entries, policy)?
            .into_iter()
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name())
            .collect();
        names.sort();

        tracing::debug!(count = names.len(), "listed search path");
        result.extend(
            names
                .into_iter()
                .map(|name| base.join(name).to_string_lossy().into_owned()),
        );
    }

    Ok(result)
}

/// Collect the entries of a listing, applying `policy` to the ones that failed to read.
fn readable_entries<T, I>(base: &Path, entries: I, policy: ListingPolicy) -> Result<Vec<T>>
where
    I: IntoIterator<Item = io::Result<T>>,
{
    let mut readable = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => readable.push(entry),
            Err(source) if policy == ListingPolicy::Strict => {
                return Err(Error::ReadDir {
                    path: base.to_path_buf(),
                    source,
                })
            }
            Err(e) => tracing::warn!("could not read an entry of {}, skipping: {e}", base.display()),
        }
    }
    Ok(readable)
}
