//! Relative Strength Index over rolling means of gains and losses.
//!
//! RSI = 100 - 100 / (1 + mean_gain / mean_loss), both means taken over the
//! last `period` close-to-close changes. First value at index `period`.
//! A window with no losses reads 100; no gains and no losses reads 50.

pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for (i, &ch) in changes.iter().enumerate() {
        gain_sum += ch.max(0.0);
        loss_sum += (-ch).max(0.0);
        if i >= period {
            let old = changes[i - period];
            gain_sum -= old.max(0.0);
            loss_sum -= (-old).max(0.0);
        }
        if i + 1 >= period {
            result[i + 1] = from_sums(gain_sum, loss_sum);
        }
    }

    result
}

fn from_sums(gain: f64, loss: f64) -> f64 {
    // Running sums can drift slightly below zero.
    let gain = gain.max(0.0);
    let loss = loss.max(0.0);
    if loss <= f64::EPSILON {
        if gain <= f64::EPSILON {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + gain / loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn warm_up_is_period() {
        let out = rsi(&[1.0, 2.0, 3.0, 2.0, 4.0], 2);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert!(!out[2].is_nan());
    }

    #[test]
    fn all_gains_reads_100() {
        let out = rsi(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_approx(out[3], 100.0);
    }

    #[test]
    fn rolling_window() {
        // changes: +1, -1, +2, -2 ; period 2
        let out = rsi(&[10.0, 11.0, 10.0, 12.0, 10.0], 2);
        assert_approx(out[2], 50.0);
        // window (-1, +2): gain 2, loss 1
        assert_approx(out[3], 100.0 - 100.0 / 3.0);
        // window (+2, -2)
        assert_approx(out[4], 50.0);
    }

    #[test]
    fn bounded() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        for v in rsi(&closes, 14).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
