//! Shared bincode settings for save states

/// Fixed-width little-endian integers, so every field sits at a stable byte offset in the blob.
#[macro_export]
macro_rules! bincode_config {
    () => {
        ::bincode::config::standard()
            .with_little_endian()
            .with_fixed_int_encoding()
            .with_limit::<{ 16 * 1024 * 1024 }>()
    };
}
