use std::sync::LazyLock;

use regex::Regex;

// 美股代码：1-5 位大写字母/数字，允许 '-' 和 '.'（BRK.B 一类）
static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9\-.]{1,5}$").unwrap());

pub fn is_valid_symbol(symbol: &str) -> bool {
    TICKER_PATTERN.is_match(symbol)
}

/// 去空白、转大写并校验，不合法返回 None
pub fn normalize_symbol(symbol: &str) -> Option<String> {
    let cleaned = symbol.trim().to_uppercase();
    if is_valid_symbol(&cleaned) {
        Some(cleaned)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_ticker_shapes() {
        assert!(is_valid_symbol("AAPL"));
        assert!(is_valid_symbol("T"));
        assert!(is_valid_symbol("BRK.B"));
        assert!(is_valid_symbol("BF-B"));
        assert!(is_valid_symbol("SPY"));
    }

    #[test]
    fn rejects_malformed_tickers() {
        assert!(!is_valid_symbol("toolong6"));
        assert!(!is_valid_symbol("ab c"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("ABCDEF"));
        assert!(!is_valid_symbol("AA PL"));
    }

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize_symbol("  aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_symbol("brk.b"), Some("BRK.B".to_string()));
        assert_eq!(normalize_symbol("toolong6"), None);
    }
}
