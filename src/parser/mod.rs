//! Correios HTMLページのパーサー
//!
//! 3つの入口（住所・追跡・送料）はいずれも純粋関数で、
//! 型付きの結果か分類済みの [`ParseError`] を必ず返す。

mod address;
mod lookup;
mod price;
mod tracking;

use std::sync::{Arc, LazyLock};

use crate::config::{ParserConfig, Selectors, NOT_FOUND_SENTINEL};
use crate::error::{ConfigError, ParseError};
use crate::locale::{LocaleFormat, PtBr};
use crate::models::{Address, DeliveryPrice, Package};

pub use tracking::{transition, EventReducer, RowState, TrackingLayout, TrackingRow};

static DEFAULT_SELECTORS: LazyLock<Selectors> = LazyLock::new(|| {
    ParserConfig::default()
        .compile()
        .expect("invalid default selectors")
});

/// セレクタとロケールを保持するパーサー
///
/// 内部状態を持たないため、`Arc` で共有して並行に呼び出してよい。
#[derive(Clone)]
pub struct Parser {
    selectors: Selectors,
    not_found_sentinel: String,
    locale: Arc<dyn LocaleFormat>,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("selectors", &self.selectors)
            .field("not_found_sentinel", &self.not_found_sentinel)
            .finish_non_exhaustive()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// デフォルト設定 (pt-BR)
    pub fn new() -> Self {
        Self {
            selectors: DEFAULT_SELECTORS.clone(),
            not_found_sentinel: NOT_FOUND_SENTINEL.to_string(),
            locale: Arc::new(PtBr),
        }
    }

    pub fn with_config(config: &ParserConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: config.compile()?,
            not_found_sentinel: config.not_found_sentinel.clone(),
            locale: Arc::new(PtBr),
        })
    }

    pub fn with_locale(mut self, locale: impl LocaleFormat + 'static) -> Self {
        self.locale = Arc::new(locale);
        self
    }

    /// 住所検索結果ページ → 住所一覧（行順）
    pub fn parse_addresses(&self, html: &str) -> Result<Vec<Address>, ParseError> {
        address::parse(&self.selectors, &self.not_found_sentinel, html)
    }

    /// 追跡ページ → 荷物
    pub fn parse_package(&self, html: &str) -> Result<Package, ParseError> {
        tracking::parse(&self.selectors, self.locale.as_ref(), html)
    }

    /// 送料計算ページ → 送料見積もり
    pub fn parse_price(&self, mode: &str, html: &str) -> Result<DeliveryPrice, ParseError> {
        price::parse(&self.selectors, self.locale.as_ref(), mode, html)
    }

    /// 住所検索APIのJSON → 住所一覧（結果なしは空）
    pub fn parse_address_lookup(&self, json: &str) -> Result<Vec<Address>, ParseError> {
        lookup::parse(json)
    }
}

/// デフォルト設定で住所をパース
pub fn parse_addresses(html: &str) -> Result<Vec<Address>, ParseError> {
    address::parse(&DEFAULT_SELECTORS, NOT_FOUND_SENTINEL, html)
}

/// デフォルト設定で追跡情報をパース
pub fn parse_package(html: &str) -> Result<Package, ParseError> {
    tracking::parse(&DEFAULT_SELECTORS, &PtBr, html)
}

/// デフォルト設定で送料をパース
pub fn parse_price(mode: &str, html: &str) -> Result<DeliveryPrice, ParseError> {
    price::parse(&DEFAULT_SELECTORS, &PtBr, mode, html)
}

pub fn parse_address_lookup(json: &str) -> Result<Vec<Address>, ParseError> {
    lookup::parse(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use chrono::NaiveDateTime;

    /// 通貨を常に固定値で返すロケール（制御フローの確認用）
    struct FixedLocale;

    impl LocaleFormat for FixedLocale {
        fn parse_datetime(&self, _date: &str, _time: &str) -> Option<NaiveDateTime> {
            None
        }

        fn parse_currency(&self, _text: &str) -> Option<Price> {
            Some(Price::from_cents(999))
        }
    }

    const PRICE_HTML: &str = r#"
        <div class="ctrlcontent">
            <table class="comparaResult">
                <tr class="destaque"><td>Prazo: 3 dias</td><td>R$ 25,50</td></tr>
            </table>
        </div>
    "#;

    #[test]
    fn test_parser_uses_injected_locale() {
        let parser = Parser::new().with_locale(FixedLocale);
        let price = parser.parse_price("PAC", PRICE_HTML).unwrap();
        assert_eq!(price.price, Price::from_cents(999));
        assert_eq!(price.days, 3);
    }

    #[test]
    fn test_parser_with_custom_sentinel() {
        let config = ParserConfig::new().with_not_found_sentinel("NADA CONSTA");
        let parser = Parser::with_config(&config).unwrap();
        let html = r#"<div class="ctrlcontent"><p>NADA CONSTA</p></div>"#;
        let err = parser.parse_addresses(html).unwrap_err();
        assert_eq!(err.kind(), crate::error::ParseErrorKind::NotFound);
    }

    #[test]
    fn test_free_functions_match_default_parser() {
        let parser = Parser::new();
        assert_eq!(
            parse_price("SEDEX", PRICE_HTML).unwrap(),
            parser.parse_price("SEDEX", PRICE_HTML).unwrap()
        );
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = Arc::new(Parser::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let parser = Arc::clone(&parser);
                std::thread::spawn(move || parser.parse_price("SEDEX", PRICE_HTML).map(|p| p.days))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 3);
        }
    }
}
