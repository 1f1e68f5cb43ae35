//! Root-confined path canonicalisation
//!
//! `std::fs::canonicalize` follows symlinks on the host filesystem and
//! would happily walk out of a sysroot, so symlink evaluation is done
//! manually: absolute link targets are re-anchored at the root and `..`
//! never ascends above it.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::error::PathError;

use super::types::MultiPath;

/// Upper bound on symlink expansions in a single resolution.
const SYMLINK_LIMIT: usize = 256;

/// Canonicalise `path` under `root` and return its rooted form.
///
/// Relative paths are made absolute against the working directory, not
/// against the root. With `must_exist` unset, a missing final component
/// is tolerated; missing intermediate components are not.
pub fn abs_eval_symlinks(path: &Path, root: &Path, must_exist: bool) -> Result<PathBuf, PathError> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| PathError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };

    let mut out = root.to_path_buf();
    // components appended beyond the root; `..` may not pop past zero
    let mut depth = 0usize;

    let mut work: Vec<OsString> = Vec::new();
    push_components_rev(&mut work, &path);

    let mut symlinks_walked = 0usize;

    while let Some(entry) = work.pop() {
        if entry == "." {
            continue;
        }
        if entry == ".." {
            if depth > 0 {
                out.pop();
                depth -= 1;
            }
            continue;
        }

        let entry_path = out.join(&entry);
        let meta = match fs::symlink_metadata(&entry_path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if !must_exist && work.is_empty() {
                    // final component that is allowed to be absent
                    out.push(&entry);
                    depth += 1;
                    break;
                }
                return Err(PathError::NotFound(entry_path));
            }
            Err(source) => {
                return Err(PathError::Io {
                    path: entry_path,
                    source,
                })
            }
        };

        if !meta.file_type().is_symlink() {
            out.push(&entry);
            depth += 1;
            continue;
        }

        symlinks_walked += 1;
        if symlinks_walked > SYMLINK_LIMIT {
            return Err(PathError::TooManySymlinks(entry_path));
        }

        let target = fs::read_link(&entry_path).map_err(|source| PathError::Io {
            path: entry_path,
            source,
        })?;
        if target.is_absolute() {
            out = root.to_path_buf();
            depth = 0;
        }
        push_components_rev(&mut work, &target);
    }

    if must_exist && !out.exists() {
        return Err(PathError::NotFound(out));
    }

    Ok(remove_root(&out, root))
}

/// Re-express a host path relative to `root`, as an absolute path.
pub(super) fn remove_root(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(stripped) => Path::new("/").join(stripped),
        Err(_) => path.to_path_buf(),
    }
}

fn push_components_rev(work: &mut Vec<OsString>, path: &Path) {
    let parts: Vec<OsString> = path
        .components()
        .filter_map(|component| match component {
            Component::RootDir | Component::Prefix(_) => None,
            other => Some(other.as_os_str().to_os_string()),
        })
        .collect();
    work.extend(parts.into_iter().rev());
}

/// Resolve each candidate under `root`, dropping the ones that fail.
pub fn resolve_all<I>(paths: I, root: &Path, must_exist: bool) -> Vec<MultiPath>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    paths
        .into_iter()
        .filter_map(|path| MultiPath::from_rooted(path.as_ref(), root, must_exist).ok())
        .collect()
}

/// Drop duplicates (keyed by rooted form) and entries whose real path no
/// longer exists, preserving first-occurrence order.
pub fn uniq_exists_path(paths: impl IntoIterator<Item = MultiPath>) -> Vec<MultiPath> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut ret = Vec::new();

    for path in paths {
        if !seen.insert(path.rooted().to_path_buf()) {
            continue;
        }
        if !path.real().exists() {
            continue;
        }
        ret.push(path);
    }

    ret
}
