//! 現行レイアウト（`.codSro` + `table.listEvent.sro`）
//!
//! 1行2列: 日時と場所 / ステータス（`strong`）と説明。
//! 1列の行は直前イベントの説明を置き換える継続行。

use scraper::ElementRef;

use crate::config::Selectors;
use crate::document::{child_elements, text_of, Document};
use crate::error::{messages, ParseError, RowError};
use crate::locale::LocaleFormat;
use crate::models::PackageTrackingEvent;
use crate::text::{collapse_line_breaks, split_spaces};

use super::reducer::TrackingRow;

pub(super) fn package_code(document: &Document, selectors: &Selectors) -> Result<String, ParseError> {
    document
        .select_first(&selectors.package_code)
        .map(|element| collapse_line_breaks(&text_of(element)))
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ParseError::not_found(messages::PACKAGE_CODE_NOT_FOUND))
}

pub(super) fn rows<'a>(document: &'a Document, selectors: &Selectors) -> Vec<ElementRef<'a>> {
    document.select_all(&selectors.tracking_rows)
}

pub(super) fn classify(
    row: ElementRef<'_>,
    selectors: &Selectors,
    locale: &dyn LocaleFormat,
) -> Result<TrackingRow, RowError> {
    let columns: Vec<ElementRef<'_>> = child_elements(row).collect();

    match columns.as_slice() {
        [date_location, description] => {
            let tokens = split_spaces(&collapse_line_breaks(&text_of(*date_location)));
            let [date, time, location @ ..] = tokens.as_slice() else {
                return Err(RowError::InvalidDate(tokens.join(" ")));
            };
            let timestamp = locale
                .parse_datetime(date, time)
                .ok_or_else(|| RowError::InvalidDate(format!("{} {}", date, time)))?;

            let status = description
                .select(&selectors.tracking_status)
                .next()
                .map(|element| collapse_line_breaks(&text_of(element)))
                .ok_or(RowError::MissingStatus)?;

            let full = collapse_line_breaks(&text_of(*description));
            let details = details_after_headline(&full, &status);

            Ok(TrackingRow::Event(PackageTrackingEvent {
                timestamp,
                location: location.join(" "),
                status,
                details,
            }))
        }
        [detail] => Ok(TrackingRow::Continuation(collapse_line_breaks(&text_of(*detail)))),
        [] => Err(RowError::MissingColumn {
            index: 0,
            count: 0,
        }),
        _ => Err(RowError::UnexpectedColumnCount(columns.len())),
    }
}

/// 説明列のテキストから見出し（ステータス）部分を除いた残り
///
/// 見出しのトークン列で始まっていればその分を、そうでなければ先頭の1トークンを除く。
/// 空白の連続で最大4グループに分けて先頭以外を連結する方式の代わりに使う。
fn details_after_headline(full: &str, status: &str) -> String {
    let tokens = split_spaces(full);
    let headline = split_spaces(status);
    let skip = if !headline.is_empty() && tokens.starts_with(&headline) {
        headline.len()
    } else {
        1
    };
    tokens
        .get(skip..)
        .map(|rest| rest.join(" "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_after_headline() {
        assert_eq!(details_after_headline("Postado extra words", "Postado"), "extra words");
        assert_eq!(
            details_after_headline("Objeto encaminhado de Unidade A para Unidade B", "Objeto encaminhado"),
            "de Unidade A para Unidade B"
        );
        assert_eq!(details_after_headline("Objeto entregue", "Objeto entregue"), "");
        assert_eq!(details_after_headline("Aviso X Y", "Outro"), "X Y");
        assert_eq!(details_after_headline("", "Postado"), "");
    }
}
