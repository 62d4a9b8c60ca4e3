use thiserror::Error;

/// 利用者にそのまま表示するメッセージ（ポルトガル語）
pub mod messages {
    pub const ADDRESS_NOT_FOUND: &str = "Endereço não encontrado.";
    pub const ADDRESS_COLUMNS_MISMATCH: &str =
        "Não foi possível extrair as informações do endereço.";
    pub const CITY_STATE_NOT_EXTRACTED: &str =
        "Não foi possível extrair as informações de Cidade e Estado.";
    pub const PACKAGE_CODE_NOT_FOUND: &str = "Código da encomenda/pacote não foi encontrado.";
    pub const POSTING_NOT_FOUND: &str =
        "Postagem não encontrada e/ou Aguardando postagem pelo remetente.";
    pub const TRACKING_NOT_FOUND: &str = "Rastreamento não encontrado.";
    pub const PACKAGE_NOT_CONVERTED: &str = "Não foi possível converter o pacote/encomenda.";
    pub const DELIVERY_PRICE_FAILED: &str = "Não foi possível calcular o preço de entrega.";
    pub const ADDRESS_LOOKUP_NOT_CONVERTED: &str =
        "Não foi possível converter a resposta de endereços.";
}

/// パースエラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    NotFound,
    StructuralMismatch,
    External,
    Chained,
}

#[derive(Error, Debug)]
pub enum ParseError {
    /// 住所・追跡・コードが見つからない
    #[error("{0}")]
    NotFound(String),

    /// 市/州の分割失敗、列数の不一致など
    #[error("{0}")]
    StructuralMismatch(String),

    /// ページ自身が表示したエラーバナー（原文のまま `details` に保持）
    #[error("{message}")]
    External { message: String, details: Vec<String> },

    /// その他の失敗を汎用メッセージで包んだもの
    #[error("{message}")]
    Chained {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ParseError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::StructuralMismatch(message.into())
    }

    pub fn external(message: impl Into<String>, details: Vec<String>) -> Self {
        Self::External {
            message: message.into(),
            details,
        }
    }

    pub fn chained(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Chained {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::NotFound(_) => ParseErrorKind::NotFound,
            Self::StructuralMismatch(_) => ParseErrorKind::StructuralMismatch,
            Self::External { .. } => ParseErrorKind::External,
            Self::Chained { .. } => ParseErrorKind::Chained,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::StructuralMismatch(message) => message,
            Self::External { message, .. } | Self::Chained { message, .. } => message,
        }
    }

    /// ページから取得した生のエラー文字列（External 以外は空）
    pub fn details(&self) -> &[String] {
        match self {
            Self::External { details, .. } => details,
            _ => &[],
        }
    }
}

/// 追跡テーブルの行単位の失敗。`ParseError::Chained` の原因として保持される
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("列{index}が存在しません (列数: {count})")]
    MissingColumn { index: usize, count: usize },

    #[error("想定外の列数: {0}")]
    UnexpectedColumnCount(usize),

    #[error("ステータス要素が見つかりません")]
    MissingStatus,

    #[error("日時を解釈できません: {0:?}")]
    InvalidDate(String),
}

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("不正なセレクタ {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Fetcher実装が返すエラー
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("HTTPステータス異常: {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("取得エラー: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("パースタスクエラー: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_external_keeps_details() {
        let err = ParseError::external(
            messages::DELIVERY_PRICE_FAILED,
            vec!["CEP de origem invalido".into(), "Peso excedido".into()],
        );
        assert_eq!(err.kind(), ParseErrorKind::External);
        assert_eq!(err.to_string(), messages::DELIVERY_PRICE_FAILED);
        assert_eq!(err.details().len(), 2);
    }

    #[test]
    fn test_chained_preserves_cause() {
        let err = ParseError::chained(
            messages::PACKAGE_NOT_CONVERTED,
            RowError::InvalidDate("99/99/2021 10:00".into()),
        );
        assert_eq!(err.kind(), ParseErrorKind::Chained);
        assert_eq!(err.message(), messages::PACKAGE_NOT_CONVERTED);
        let cause = err.source().map(|e| e.to_string()).unwrap_or_default();
        assert!(cause.contains("99/99/2021"));
        assert!(err.details().is_empty());
    }
}
