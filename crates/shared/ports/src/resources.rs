/// Port for presentation assets (icons, flags)
pub trait ResourceLookup: Send + Sync {
    /// True when the resource at `path` can be loaded
    fn exists(&self, path: &str) -> bool;
}
