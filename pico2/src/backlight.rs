//! Backlight duty math.
//!
//! The controller speaks in 8-bit levels; the PWM slice compares against a
//! counter that wraps at `top`. Level 0 switches the LED off completely and
//! 255 holds it on for the whole period.

/// Compare value for `level` on a slice wrapping at `top`, rounded to the
/// nearest count.
pub const fn backlight_compare(
    level: u8,
    top: u16,
) -> u16 {
    if level == u8::MAX {
        // Compare above top keeps the output high for the full period
        return top.saturating_add(1);
    }
    let period = top as u32 + 1;
    ((level as u32 * period + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BACKLIGHT_PWM_TOP;

    #[test]
    fn test_endpoints() {
        assert_eq!(backlight_compare(0, BACKLIGHT_PWM_TOP), 0);
        assert_eq!(backlight_compare(255, BACKLIGHT_PWM_TOP), 6_250);
        assert_eq!(backlight_compare(255, u16::MAX), u16::MAX);
    }

    #[test]
    fn test_midpoints() {
        // 128 / 255 of 6250 = 3137.25
        assert_eq!(backlight_compare(128, BACKLIGHT_PWM_TOP), 3_137);
        // Demo levels
        assert_eq!(backlight_compare(40, BACKLIGHT_PWM_TOP), 980);
        assert_eq!(backlight_compare(20, BACKLIGHT_PWM_TOP), 490);
    }

    #[test]
    fn test_monotonic() {
        let mut prev = 0;
        for level in 0..=u8::MAX {
            let compare = backlight_compare(level, BACKLIGHT_PWM_TOP);
            assert!(compare >= prev);
            prev = compare;
        }
    }
}
