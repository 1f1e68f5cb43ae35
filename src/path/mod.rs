//! Root-confined path handling
//!
//! Every path the resolver touches is tracked both as a host path and as
//! a path inside the virtual root, so symlink evaluation can never
//! escape the root.

mod resolve;
mod types;

pub use resolve::abs_eval_symlinks;
pub use resolve::resolve_all;
pub use resolve::uniq_exists_path;
pub use types::MultiPath;
