use thiserror::Error;

/// Upper bound on the number of slots an arena may address (28-bit handles).
pub const MAX_HANDLES: u64 = 1 << 28;

/// Sizing of the arenas backing an automaton.
///
/// Every arena grows in chunks of `chunk_capacity` slots and may hold at most
/// `max_chunks` chunks; running past that ceiling is fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of slots in each chunk.
    pub chunk_capacity: u32,
    /// Maximum number of chunks an arena may allocate.
    pub max_chunks: u32,
}

impl Config {
    /// Default number of slots per chunk.
    pub const DEFAULT_CHUNK_CAPACITY: u32 = 1 << 16;
    /// Default chunk ceiling.
    pub const DEFAULT_MAX_CHUNKS: u32 = 1 << 12;

    /// Returns a copy with a different chunk capacity.
    pub fn with_chunk_capacity(self, chunk_capacity: u32) -> Self {
        Config {
            chunk_capacity,
            ..self
        }
    }

    /// Returns a copy with a different chunk ceiling.
    pub fn with_max_chunks(self, max_chunks: u32) -> Self {
        Config { max_chunks, ..self }
    }

    /// Total number of slots an arena with this configuration can address,
    /// including the reserved null slot.
    pub fn capacity(&self) -> u64 {
        u64::from(self.chunk_capacity) * u64::from(self.max_chunks)
    }

    /// Checks that the configuration describes a usable arena.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_capacity == 0 {
            return Err(ConfigError::ZeroChunkCapacity);
        }
        if self.max_chunks == 0 {
            return Err(ConfigError::ZeroMaxChunks);
        }
        if self.capacity() > MAX_HANDLES {
            return Err(ConfigError::TooManyHandles {
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_capacity: Self::DEFAULT_CHUNK_CAPACITY,
            max_chunks: Self::DEFAULT_MAX_CHUNKS,
        }
    }
}

/// Errors reported by [`Config::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunks must hold at least one slot.
    #[error("chunk capacity must be at least 1")]
    ZeroChunkCapacity,
    /// At least one chunk must be allowed.
    #[error("max chunks must be at least 1")]
    ZeroMaxChunks,
    /// The configuration addresses more slots than handles can name.
    #[error("arena capacity of {capacity} slots exceeds the {MAX_HANDLES} handle limit")]
    TooManyHandles {
        /// Requested capacity in slots.
        capacity: u64,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_addresses_28_bits() {
        let config = Config::default();
        assert_eq!(config.capacity(), MAX_HANDLES);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = Config::default().with_chunk_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroChunkCapacity));
        let config = Config::default().with_max_chunks(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxChunks));
    }

    #[test]
    fn oversized_arena_is_rejected() {
        let config = Config::default().with_max_chunks(1 << 13);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyHandles { capacity }) if capacity == 1 << 29
        ));
    }
}
