//! Delivery targets for composed documents

use crate::error::MandateError;

/// Where composed bytes go: a browser download, a directory, a buffer.
pub trait DocumentSink {
    /// Fail with [`MandateError::Environment`] when nothing can be saved.
    /// Called before any composition work starts.
    fn ensure_available(&self) -> Result<(), MandateError>;

    /// Hand over the finished document. Delivery is fire-and-forget.
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MandateError>;
}

/// Keeps delivered documents in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    unavailable: bool,
    delivered: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reports no save capability.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            delivered: Vec::new(),
        }
    }

    pub fn delivered(&self) -> &[(String, Vec<u8>)] {
        &self.delivered
    }
}

impl DocumentSink for MemorySink {
    fn ensure_available(&self) -> Result<(), MandateError> {
        if self.unavailable {
            return Err(MandateError::Environment(
                "no file-save capability in this context".into(),
            ));
        }
        Ok(())
    }

    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MandateError> {
        self.ensure_available()?;
        self.delivered.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}
