//! HTMLドキュメントの読み込みとセレクタ検索
//!
//! `scraper::Html` の薄いラッパー。不正なマークアップでも失敗しない
//! （html5ever のエラー回復に従う）。

use scraper::{ElementRef, Html, Selector};

use crate::error::ConfigError;

/// 読み込み済みのHTMLドキュメント
pub struct Document {
    html: Html,
}

impl Document {
    /// 文字列からドキュメントを構築
    pub fn load(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }
}

/// 子孫テキストノードをソース順に連結
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// 直下の子要素のみ
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// `> a > b > c` 形式の、要素を起点にした子結合子のみのセレクタ
///
/// `scraper` の `Selector` は先頭の `>` を受け付けないため、
/// 各段を個別にコンパイルして子要素を辿る。
#[derive(Debug, Clone)]
pub struct ScopedSelector {
    source: String,
    steps: Vec<Selector>,
}

impl ScopedSelector {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let steps = source
            .split('>')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;

        if steps.is_empty() {
            return Err(ConfigError::InvalidSelector {
                selector: source.to_string(),
                reason: "空のセレクタ".into(),
            });
        }

        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// `scope` の直下から各段に一致する子要素を辿り、最終段の要素を文書順に返す
    pub fn select<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut current = vec![scope];
        for step in &self.steps {
            current = current
                .into_iter()
                .flat_map(child_elements)
                .filter(|child| step.matches(child))
                .collect();
        }
        current
    }
}

/// CSSセレクタをコンパイル
pub fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
