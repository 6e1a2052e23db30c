//! Pluralization for log lines.

/// Return "s" suffix for plural counts
///
/// - `plural_s(0)` -> `"s"` (0 files)
/// - `plural_s(1)` -> `""` (1 file)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun: `plural_count(3, "import")` -> `"3 imports"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "url"), "0 urls");
        assert_eq!(plural_count(1, "import"), "1 import");
        assert_eq!(plural_count(4, "file"), "4 files");
    }
}
