use crate::error::PersistenceError;

/// Port for keyed record storage
///
/// The storage format belongs to the implementation; callers hand over
/// JSON values.
pub trait Persistence: Send + Sync {
    fn write(&self, key: &str, record: serde_json::Value) -> Result<(), PersistenceError>;
}
