use async_trait::async_trait;
use shadow_core::ShadowResult;

/// Storage port for string keys and string values.
///
/// Board data, titles and timer records all go through this trait, so stores
/// can be backed by a file, memory, or a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> ShadowResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> ShadowResult<()>;

    /// Removing an absent key is not an error
    async fn remove(&self, key: &str) -> ShadowResult<()>;
}

/// Trait for value encodings
/// Allows swapping JSON for another text format
pub trait Serializer<T: Send + Sync>: Send + Sync {
    fn serialize(&self, data: &T) -> ShadowResult<String>;

    fn deserialize(&self, text: &str) -> ShadowResult<T>;
}
