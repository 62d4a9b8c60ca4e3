//! 旧レイアウト（段落のコード + 3列の `table.listEvent`）
//!
//! 先頭セルに `rowspan` を持つ行だけが日時・場所・ステータスを持つ。
//! `rowspan` の無い行は直前イベントの説明を置き換える継続行。

use scraper::ElementRef;

use crate::config::Selectors;
use crate::document::{child_elements, text_of, Document};
use crate::error::{messages, ParseError, RowError};
use crate::locale::LocaleFormat;
use crate::models::PackageTrackingEvent;
use crate::text::{collapse_line_breaks, split_spaces, HYPHEN};

use super::reducer::TrackingRow;

const ROWSPAN: &str = "rowspan";

/// `"PN123456789BR - ENCOMENDA PAC"` のような段落の、ハイフン前の断片
pub(super) fn package_code(document: &Document, selectors: &Selectors) -> Result<String, ParseError> {
    let paragraph = match document.select_first(&selectors.content) {
        Some(content) => content.select(&selectors.content_paragraph).next(),
        None => document.select_first(&selectors.content_paragraph),
    };

    paragraph
        .map(|p| collapse_line_breaks(&text_of(p)))
        .map(|text| first_fragment(&text))
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ParseError::not_found(messages::PACKAGE_CODE_NOT_FOUND))
}

fn first_fragment(text: &str) -> String {
    text.split(HYPHEN).next().unwrap_or_default().trim().to_string()
}

pub(super) fn rows<'a>(document: &'a Document, selectors: &Selectors) -> Vec<ElementRef<'a>> {
    document.select_all(&selectors.legacy_tracking_rows)
}

pub(super) fn classify(row: ElementRef<'_>, locale: &dyn LocaleFormat) -> Result<TrackingRow, RowError> {
    let cells: Vec<ElementRef<'_>> = child_elements(row).collect();
    let first = cells.first().ok_or(RowError::MissingColumn { index: 0, count: 0 })?;

    if first.value().attr(ROWSPAN).is_none() {
        return Ok(TrackingRow::Continuation(collapse_line_breaks(&text_of(*first))));
    }

    let [date_time, location, status, ..] = cells.as_slice() else {
        return Err(RowError::MissingColumn {
            index: cells.len(),
            count: cells.len(),
        });
    };

    let tokens = split_spaces(&collapse_line_breaks(&text_of(*date_time)));
    let [date, time, ..] = tokens.as_slice() else {
        return Err(RowError::InvalidDate(tokens.join(" ")));
    };
    let timestamp = locale
        .parse_datetime(date, time)
        .ok_or_else(|| RowError::InvalidDate(format!("{} {}", date, time)))?;

    Ok(TrackingRow::Event(PackageTrackingEvent {
        timestamp,
        location: collapse_line_breaks(&text_of(*location)),
        status: collapse_line_breaks(&text_of(*status)),
        details: String::new(),
    }))
}
