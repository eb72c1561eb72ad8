// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Compact star count rendering for catalog cards.
///
/// Counts below one thousand render exactly. Larger counts render in
/// thousands rounded half-up to one decimal, dropping a trailing `.0`.
/// Negative counts render as `"0"`.
///
/// # Examples
///
/// ```
/// use hookhub::format_stars_count;
///
/// assert_eq!(format_stars_count(999), "999");
/// assert_eq!(format_stars_count(1_247), "1.2k");
/// assert_eq!(format_stars_count(2_000), "2k");
/// ```
pub fn format_stars_count(count: i64,) -> String
{
    if count < 0 {
        return "0".to_owned();
    }
    if count < 1_000 {
        return count.to_string();
    }

    let tenths = (i128::from(count,) * 10 + 500) / 1_000;
    let whole = tenths / 10;
    let fraction = tenths % 10;

    if fraction == 0 { format!("{whole}k") } else { format!("{whole}.{fraction}k") }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn renders_small_counts_exactly()
    {
        assert_eq!(format_stars_count(0), "0");
        assert_eq!(format_stars_count(7), "7");
        assert_eq!(format_stars_count(999), "999");
    }

    #[test]
    fn renders_thousands_with_one_decimal()
    {
        assert_eq!(format_stars_count(1_000), "1k");
        assert_eq!(format_stars_count(1_247), "1.2k");
        assert_eq!(format_stars_count(1_250), "1.3k");
        assert_eq!(format_stars_count(1_999), "2k");
        assert_eq!(format_stars_count(2_000), "2k");
        assert_eq!(format_stars_count(15_460), "15.5k");
    }

    #[test]
    fn clamps_negative_counts()
    {
        assert_eq!(format_stars_count(-1), "0");
        assert_eq!(format_stars_count(i64::MIN), "0");
    }

    #[test]
    fn handles_the_largest_count()
    {
        assert!(format_stars_count(i64::MAX).ends_with('k'));
    }

    proptest! {
        #[test]
        fn large_counts_never_end_in_point_zero(count in 1_000i64..10_000_000) {
            let rendered = format_stars_count(count);
            prop_assert!(rendered.ends_with('k'));
            prop_assert!(!rendered.contains(".0k"));
        }
    }
}
