//! 追跡ページのパース
//!
//! 2種類のレイアウトを判定して振り分け、行継続ステートマシンでイベント列を組み立てる。

mod legacy;
mod reducer;
mod sro;

use scraper::ElementRef;
use tracing::debug;

use crate::config::Selectors;
use crate::document::Document;
use crate::error::{messages, ParseError, RowError};
use crate::locale::LocaleFormat;
use crate::models::Package;

pub use reducer::{transition, EventReducer, RowState, TrackingRow};

/// 追跡ページのレイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingLayout {
    /// `.codSro` のコード要素 + 2列の `table.listEvent.sro`
    Sro,
    /// 段落の「コード - 説明」+ `rowspan` 付き3列の `table.listEvent`
    Legacy,
}

impl TrackingLayout {
    /// コード要素または現行テーブルがあれば `Sro`
    pub fn detect(document: &Document, selectors: &Selectors) -> Self {
        if document.select_first(&selectors.package_code).is_some()
            || document.select_first(&selectors.tracking_rows).is_some()
        {
            Self::Sro
        } else {
            Self::Legacy
        }
    }

    fn package_code(self, document: &Document, selectors: &Selectors) -> Result<String, ParseError> {
        match self {
            Self::Sro => sro::package_code(document, selectors),
            Self::Legacy => legacy::package_code(document, selectors),
        }
    }

    fn rows<'a>(self, document: &'a Document, selectors: &Selectors) -> Vec<ElementRef<'a>> {
        match self {
            Self::Sro => sro::rows(document, selectors),
            Self::Legacy => legacy::rows(document, selectors),
        }
    }

    fn classify(
        self,
        row: ElementRef<'_>,
        selectors: &Selectors,
        locale: &dyn LocaleFormat,
    ) -> Result<TrackingRow, RowError> {
        match self {
            Self::Sro => sro::classify(row, selectors, locale),
            Self::Legacy => legacy::classify(row, locale),
        }
    }
}

pub(crate) fn parse(
    selectors: &Selectors,
    locale: &dyn LocaleFormat,
    html: &str,
) -> Result<Package, ParseError> {
    let document = Document::load(html);
    let layout = TrackingLayout::detect(&document, selectors);

    let code = layout.package_code(&document, selectors)?;
    debug!("追跡レイアウト {:?}: code={}", layout, code);

    // 見出しのみ（th だけ）の行はデータ行として数えない
    let rows: Vec<ElementRef<'_>> = layout
        .rows(&document, selectors)
        .into_iter()
        .filter(|row| row.select(&selectors.table_data_cell).next().is_some())
        .collect();

    if rows.is_empty() {
        return Err(ParseError::not_found(messages::POSTING_NOT_FOUND));
    }

    let events = rows
        .into_iter()
        .try_fold(EventReducer::new(), |reducer, row| {
            layout
                .classify(row, selectors, locale)
                .map(|classified| reducer.apply(classified))
        })
        .map_err(row_error)?
        .finish();

    debug!("追跡イベント {} 件: code={}", events.len(), code);

    Package::new(code, events).ok_or_else(|| ParseError::not_found(messages::TRACKING_NOT_FOUND))
}

/// 列数の不一致は構造エラー、それ以外は原因付きで包む
fn row_error(error: RowError) -> ParseError {
    match error {
        RowError::UnexpectedColumnCount(_) => ParseError::mismatch(messages::PACKAGE_NOT_CONVERTED),
        other => ParseError::chained(messages::PACKAGE_NOT_CONVERTED, other),
    }
}
