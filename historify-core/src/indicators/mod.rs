//! Indicator math used by the offline sample API.
//!
//! Both functions return one value per input close, `NaN` during warm-up, so
//! callers can zip the output back onto bar times and skip the gaps.

pub mod ema;
pub mod rsi;

pub use ema::ema;
pub use rsi::rsi;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
