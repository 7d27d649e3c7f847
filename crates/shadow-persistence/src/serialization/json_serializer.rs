use crate::traits::Serializer;
use shadow_core::{ShadowError, ShadowResult};

/// Compact JSON, the encoding of every stored value
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync> Serializer<T>
    for JsonSerializer
{
    fn serialize(&self, data: &T) -> ShadowResult<String> {
        serde_json::to_string(data).map_err(|e| ShadowError::Serialization(e.to_string()))
    }

    fn deserialize(&self, text: &str) -> ShadowResult<T> {
        serde_json::from_str(text).map_err(|e| ShadowError::Serialization(e.to_string()))
    }
}
