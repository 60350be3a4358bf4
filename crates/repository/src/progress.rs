/// Incremental progress sink for the remote mirror.
///
/// The fetch reports once per directory entry; nested directories restart the
/// count for their own listing.
pub trait ProgressReporter: Send + Sync {
    /// A directory listing of `total` entries is about to be mirrored.
    fn begin(&self, total: usize);

    /// Entry `index` of `total` (1-based) is being fetched.
    fn advance(&self, index: usize, total: usize, name: &str);
}

/// Reporter that drops everything, for tests and non-interactive callers.
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn begin(&self, _total: usize) {}

    fn advance(&self, _index: usize, _total: usize, _name: &str) {}
}
