use crate::error::ShadowError;

pub type ShadowResult<T> = Result<T, ShadowError>;
