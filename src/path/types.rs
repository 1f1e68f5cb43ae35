//! The real/rooted path pair

use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::Serializer;

use crate::error::PathError;

use super::resolve::abs_eval_symlinks;
use super::resolve::remove_root;

/// A path known both as it appears on the host filesystem (`real`) and
/// as it appears inside the virtual root (`rooted`).
///
/// Invariant: `real` is `root` joined with `rooted`, and `rooted` never
/// ascends above the root. Values are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPath {
    real: PathBuf,
    rooted: PathBuf,
}

impl MultiPath {
    /// Resolve a root-relative path, evaluating symlinks without ever
    /// escaping `root`.
    ///
    /// With `must_exist`, resolution fails when the path is absent;
    /// otherwise a missing final component is tolerated.
    pub fn from_rooted(
        path: impl AsRef<Path>,
        root: &Path,
        must_exist: bool,
    ) -> Result<Self, PathError> {
        let rooted = abs_eval_symlinks(path.as_ref(), root, must_exist)?;
        let real = rejoin(root, &rooted);
        Ok(Self { real, rooted })
    }

    /// Wrap a host path that already lives under `root`, deriving the
    /// rooted form by stripping the root prefix.
    pub fn from_real(path: impl Into<PathBuf>, root: &Path) -> Self {
        let real = path.into();
        let rooted = remove_root(&real, root);
        Self { real, rooted }
    }

    /// The path on the host filesystem, root prefix included.
    pub fn real(&self) -> &Path {
        &self.real
    }

    /// The path as seen from inside the virtual root.
    pub fn rooted(&self) -> &Path {
        &self.rooted
    }

    /// Directory of the rooted form; `/` when there is no parent.
    pub fn rooted_dir(&self) -> &Path {
        self.rooted.parent().unwrap_or_else(|| Path::new("/"))
    }
}

fn rejoin(root: &Path, rooted: &Path) -> PathBuf {
    root.join(rooted.strip_prefix("/").unwrap_or(rooted))
}

impl Serialize for MultiPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.rooted.to_string_lossy())
    }
}
