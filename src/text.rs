//! テキスト正規化ユーティリティ
//!
//! 全パーサーが共通で使う純粋な文字列処理

use std::sync::LazyLock;

use regex::Regex;

pub const SPACE: char = ' ';
pub const HYPHEN: char = '-';

static RE_LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r\n?|\n|\t)+").expect("invalid regex: line breaks"));

static RE_NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("invalid regex: non numeric"));

/// 改行・タブの連続を空白1つに置換し、前後をトリム
pub fn collapse_line_breaks(text: &str) -> String {
    RE_LINE_BREAKS.replace_all(text, " ").trim().to_string()
}

/// 数字と `.` 以外をすべて除去
pub fn strip_non_numeric(text: &str) -> String {
    RE_NON_NUMERIC.replace_all(text, "").into_owned()
}

/// ハイフンを除去してトリム（CEP用）
pub fn strip_hyphens(text: &str) -> String {
    text.replace(HYPHEN, "").trim().to_string()
}

/// ちょうど `n` 個連続する空白で分割（空の断片は捨てる）
///
/// `n` が 0 の場合は 1 として扱う。
pub fn split_on_space_run(text: &str, n: usize) -> Vec<String> {
    let separator = SPACE.to_string().repeat(n.max(1));
    text.split(separator.as_str())
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// 空白1つで分割（`split_on_space_run(text, 1)` の省略形）
pub fn split_spaces(text: &str) -> Vec<String> {
    split_on_space_run(text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_line_breaks() {
        assert_eq!(collapse_line_breaks("\r\n\tSAO PAULO\n"), "SAO PAULO");
        assert_eq!(collapse_line_breaks("Rua A\r\n\t\tCentro"), "Rua A Centro");
        assert_eq!(collapse_line_breaks("a\rb\nc\td"), "a b c d");
        assert_eq!(collapse_line_breaks(""), "");
    }

    #[test]
    fn test_strip_non_numeric_keeps_decimal_point() {
        assert_eq!(strip_non_numeric("R$ 25.50"), "25.50");
        assert_eq!(strip_non_numeric("01310-100"), "01310100");
        assert_eq!(strip_non_numeric("sem prazo"), "");
    }

    #[test]
    fn test_strip_hyphens() {
        assert_eq!(strip_hyphens("01310-100"), "01310100");
        assert_eq!(strip_hyphens(" 01310-100 "), "01310100");
    }

    #[test]
    fn test_split_on_space_run() {
        assert_eq!(split_spaces("01/02/2021 10:00 SAO PAULO"), vec!["01/02/2021", "10:00", "SAO", "PAULO"]);
        assert_eq!(split_spaces("  a  b "), vec!["a", "b"]);
        assert_eq!(split_on_space_run("Postado   em   agencia", 3), vec!["Postado", "em", "agencia"]);
        // 2個の空白は区切りとみなさない
        assert_eq!(split_on_space_run("a  b   c", 3), vec!["a  b", "c"]);
        assert_eq!(split_on_space_run("a b", 0), vec!["a", "b"]);
    }
}
