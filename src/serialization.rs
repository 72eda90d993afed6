//! Serialization of fitted parameters.
//!
//! Fitted transformers and models expose plain parameter structs (vectors,
//! scalars, strings) that are written with `bincode`. The parameter types never
//! hold `ndarray` buffers directly.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Parameter representations that can be serialized to and from bytes.
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    /// Write the serialized parameters to `path`.
    fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read parameters previously written with [`SerializableParams::write_to_file`].
    fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
