//! Fixed-point conversion between floating wire values and integer ticks.
//!
//! Integer keys give exact equality and ordering in the book's sorted maps;
//! floating-point keys would drift across updates.

/// Convert a market value to ticks by multiplication and truncation toward
/// zero.
///
/// Defined only for finite, non-negative inputs whose scaled value fits the
/// f64 mantissa (2^53); callers guard anything off the wire. `ticks_per_unit`
/// is the per-instrument `1 / tick_size` constant.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_ticks(value: f64, ticks_per_unit: u64) -> u64 {
    (value * ticks_per_unit as f64) as u64
}

/// Convert ticks back to a floating value for display.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn from_ticks(ticks: u64, ticks_per_unit: u64) -> f64 {
    ticks as f64 / ticks_per_unit as f64
}
