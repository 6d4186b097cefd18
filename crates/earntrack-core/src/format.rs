//! Display helpers shared by front ends.

/// `HH:MM:SS`, hours not wrapped at 24. Negative spans show as zero.
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

pub fn format_earnings(amount: f64, decimals: usize) -> String {
    format!("{amount:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_formats_as_clock() {
        assert_eq!(format_elapsed(0.0), "00:00:00");
        assert_eq!(format_elapsed(59.99), "00:00:59");
        assert_eq!(format_elapsed(3_661.5), "01:01:01");
        assert_eq!(format_elapsed(100.0 * 3600.0), "100:00:00");
        assert_eq!(format_elapsed(-3.0), "00:00:00");
    }

    #[test]
    fn earnings_use_fixed_decimals() {
        assert_eq!(format_earnings(0.032_051_282_05, 8), "0.03205128");
        assert_eq!(format_earnings(12.0, 6), "12.000000");
    }
}
