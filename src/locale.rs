//! ロケール依存の解釈（日時・通貨）
//!
//! パーサーの制御フローはこのトレイト越しにのみロケールを扱う。

use chrono::NaiveDateTime;

use crate::models::Price;

/// ロケール依存の書式解釈
pub trait LocaleFormat: Send + Sync {
    /// 日付と時刻のトークンを結合して解釈
    fn parse_datetime(&self, date: &str, time: &str) -> Option<NaiveDateTime>;

    /// 通貨表記を解釈
    fn parse_currency(&self, text: &str) -> Option<Price>;
}

/// ブラジルポルトガル語 (pt-BR)
///
/// - 日時: `dd/MM/yyyy HH:mm`（秒付きも可）
/// - 通貨: `R$ 1.234,56`（小数点はカンマ、桁区切りはピリオド）
#[derive(Debug, Clone, Copy, Default)]
pub struct PtBr;

const DATETIME_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M:%S"];
const CURRENCY_SYMBOL: &str = "R$";

impl LocaleFormat for PtBr {
    fn parse_datetime(&self, date: &str, time: &str) -> Option<NaiveDateTime> {
        let text = format!("{} {}", date.trim(), time.trim());
        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
    }

    fn parse_currency(&self, text: &str) -> Option<Price> {
        let mut text = text.trim().replace(CURRENCY_SYMBOL, "");
        text.retain(|c| !c.is_whitespace());

        let mut negative = false;
        if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            negative = true;
            text = inner.to_string();
        } else if let Some(rest) = text.strip_prefix('-') {
            negative = true;
            text = rest.to_string();
        } else if let Some(rest) = text.strip_suffix('-') {
            negative = true;
            text = rest.to_string();
        }

        let (integer, fraction) = match text.split_once(',') {
            Some((integer, fraction)) => (integer, fraction),
            None => (text.as_str(), ""),
        };

        let integer: String = integer.chars().filter(|c| *c != '.').collect();
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        if !integer.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let reais: i64 = if integer.is_empty() {
            0
        } else {
            integer.parse().ok()?
        };

        // centavos（3桁目以降は四捨五入）
        let mut digits = fraction.chars().map(|c| i64::from(c as u8 - b'0'));
        let tens = digits.next().unwrap_or(0);
        let units = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);
        let centavos = tens * 10 + units + i64::from(round_up);

        let cents = reais.checked_mul(100)?.checked_add(centavos)?;
        Some(Price::from_cents(if negative { -cents } else { cents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_parse_datetime() {
        let parsed = PtBr.parse_datetime("01/02/2021", "10:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2021, 2, 1).unwrap());
        assert_eq!(parsed.hour(), 10);

        let with_seconds = PtBr.parse_datetime("31/12/2020", "23:59:30").unwrap();
        assert_eq!(with_seconds.second(), 30);
    }

    #[test]
    fn test_parse_datetime_rejects_us_order() {
        assert!(PtBr.parse_datetime("12/31/2020", "10:00").is_none());
        assert!(PtBr.parse_datetime("SAO", "PAULO").is_none());
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(PtBr.parse_currency("R$ 25,50"), Some(Price::from_cents(2550)));
        assert_eq!(PtBr.parse_currency("R$ 1.234,56"), Some(Price::from_cents(123_456)));
        assert_eq!(PtBr.parse_currency("\u{a0}R$\u{a0}7"), Some(Price::from_cents(700)));
        assert_eq!(PtBr.parse_currency("0,5"), Some(Price::from_cents(50)));
        assert_eq!(PtBr.parse_currency("10,005"), Some(Price::from_cents(1001)));
        assert_eq!(PtBr.parse_currency("-R$ 3,00"), Some(Price::from_cents(-300)));
    }

    #[test]
    fn test_parse_currency_rejects_garbage() {
        assert_eq!(PtBr.parse_currency(""), None);
        assert_eq!(PtBr.parse_currency("R$"), None);
        assert_eq!(PtBr.parse_currency("indisponível"), None);
        assert_eq!(PtBr.parse_currency("1,2,3"), None);
    }
}
