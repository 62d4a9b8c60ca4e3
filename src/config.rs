use scraper::Selector;

use crate::document::{compile, ScopedSelector};
use crate::error::ConfigError;

/// 住所検索ページの「該当なし」表示
pub const NOT_FOUND_SENTINEL: &str = "DADOS NAO ENCONTRADOS";

/// パーサー設定（CSSセレクタと判定用テキスト）
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// 結果本体のコンテナ
    pub content: String,
    /// コンテナ内の最初の段落
    pub content_paragraph: String,
    /// コンテナ直下の住所テーブル行（`>` 始まりの子結合子）
    pub address_rows: String,
    pub not_found_sentinel: String,
    /// 追跡コード要素（この要素の有無でレイアウトを判定）
    pub package_code: String,
    pub tracking_rows: String,
    /// 見出し（ステータス）要素
    pub tracking_status: String,
    /// 旧レイアウトの追跡テーブル行
    pub legacy_tracking_rows: String,
    pub price_errors: String,
    /// 強調表示された結果行のセル
    pub price_result_cells: String,
    /// 発送元/配送先ブロックのセル
    pub price_route_cells: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            content: "div.ctrlcontent".to_string(),
            content_paragraph: "p".to_string(),
            address_rows: "> table.tmptabela > tbody > tr".to_string(),
            not_found_sentinel: NOT_FOUND_SENTINEL.to_string(),
            package_code: ".codSro".to_string(),
            tracking_rows: "table.listEvent.sro tbody tr".to_string(),
            tracking_status: "strong".to_string(),
            legacy_tracking_rows: "table.listEvent tbody tr".to_string(),
            price_errors: ".info.error".to_string(),
            price_result_cells: "table.comparaResult tr.destaque td".to_string(),
            price_route_cells: "div.contentexpodados > table.comparaResult tr > td".to_string(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, selector: impl Into<String>) -> Self {
        self.content = selector.into();
        self
    }

    pub fn with_address_rows(mut self, selector: impl Into<String>) -> Self {
        self.address_rows = selector.into();
        self
    }

    pub fn with_not_found_sentinel(mut self, text: impl Into<String>) -> Self {
        self.not_found_sentinel = text.into();
        self
    }

    pub fn with_package_code(mut self, selector: impl Into<String>) -> Self {
        self.package_code = selector.into();
        self
    }

    pub fn with_tracking_rows(mut self, selector: impl Into<String>) -> Self {
        self.tracking_rows = selector.into();
        self
    }

    pub fn with_legacy_tracking_rows(mut self, selector: impl Into<String>) -> Self {
        self.legacy_tracking_rows = selector.into();
        self
    }

    pub fn with_price_errors(mut self, selector: impl Into<String>) -> Self {
        self.price_errors = selector.into();
        self
    }

    /// 全セレクタをコンパイル
    pub fn compile(&self) -> Result<Selectors, ConfigError> {
        Ok(Selectors {
            content: compile(&self.content)?,
            content_paragraph: compile(&self.content_paragraph)?,
            address_rows: ScopedSelector::parse(&self.address_rows)?,
            package_code: compile(&self.package_code)?,
            tracking_rows: compile(&self.tracking_rows)?,
            tracking_status: compile(&self.tracking_status)?,
            legacy_tracking_rows: compile(&self.legacy_tracking_rows)?,
            price_errors: compile(&self.price_errors)?,
            price_result_cells: compile(&self.price_result_cells)?,
            price_route_cells: compile(&self.price_route_cells)?,
            table_data_cell: compile("td")?,
        })
    }
}

/// コンパイル済みセレクタ
#[derive(Debug, Clone)]
pub struct Selectors {
    pub content: Selector,
    pub content_paragraph: Selector,
    pub address_rows: ScopedSelector,
    pub package_code: Selector,
    pub tracking_rows: Selector,
    pub tracking_status: Selector,
    pub legacy_tracking_rows: Selector,
    pub price_errors: Selector,
    pub price_result_cells: Selector,
    pub price_route_cells: Selector,
    pub table_data_cell: Selector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_compiles() {
        let selectors = ParserConfig::default().compile().unwrap();
        assert_eq!(selectors.address_rows.as_str(), "> table.tmptabela > tbody > tr");
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::new()
            .with_content("main")
            .with_not_found_sentinel("NADA")
            .with_package_code("#codigo");

        assert_eq!(config.content, "main");
        assert_eq!(config.not_found_sentinel, "NADA");
        assert_eq!(config.package_code, "#codigo");
        assert!(config.compile().is_ok());
    }

    #[test]
    fn test_invalid_selector_fails_compile() {
        let err = ParserConfig::new().with_price_errors("..info").compile().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { ref selector, .. } if selector == "..info"));
    }
}
