//! Byte-order normalization.
//!
//! Demo files store every multi-byte number little-endian. The `little_*`
//! functions convert a value read in native order into its little-endian
//! interpretation (a no-op on little-endian hosts); the `big_*` functions
//! do the same for big-endian data.

/// Interpret a native-order `i32` as little-endian.
pub fn little_long(v: i32) -> i32 {
    i32::from_le(v)
}

/// Interpret a native-order `i16` as little-endian.
pub fn little_short(v: i16) -> i16 {
    i16::from_le(v)
}

/// Interpret a native-order `f32` bit pattern as little-endian.
pub fn little_float(v: f32) -> f32 {
    f32::from_bits(u32::from_le(v.to_bits()))
}

/// Interpret a native-order `i32` as big-endian.
pub fn big_long(v: i32) -> i32 {
    i32::from_be(v)
}

/// Interpret a native-order `i16` as big-endian.
pub fn big_short(v: i16) -> i16 {
    i16::from_be(v)
}

/// Interpret a native-order `f32` bit pattern as big-endian.
pub fn big_float(v: f32) -> f32 {
    f32::from_bits(u32::from_be(v.to_bits()))
}

/// Reverse the bytes of an `i32`.
pub fn swap_long(v: i32) -> i32 {
    v.swap_bytes()
}

/// Reverse the bytes of an `i16`.
pub fn swap_short(v: i16) -> i16 {
    v.swap_bytes()
}

/// Reverse the bytes of an `f32` bit pattern.
pub fn swap_float(v: f32) -> f32 {
    f32::from_bits(v.to_bits().swap_bytes())
}
