//! ドメインモデル
//!
//! パーサーが構築した後は読み取り専用の値として扱う。

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 住所
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
    /// CEP（数字のみ、通常8桁）
    pub zip_code: String,
}

/// 追跡イベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTrackingEvent {
    pub timestamp: NaiveDateTime,
    pub location: String,
    pub status: String,
    pub details: String,
}

/// 荷物と追跡履歴
///
/// `events` は空にならない（空の場合はパースエラーになる）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    code: String,
    events: Vec<PackageTrackingEvent>,
}

impl Package {
    /// コードまたはイベントが空なら `None`
    pub fn new(code: impl Into<String>, events: Vec<PackageTrackingEvent>) -> Option<Self> {
        let code = code.into();
        if code.is_empty() || events.is_empty() {
            return None;
        }
        Some(Self { code, events })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// ソース表の行順
    pub fn events(&self) -> &[PackageTrackingEvent] {
        &self.events
    }

    /// 表の先頭行のイベント（並べ替えはしない）
    pub fn first_event(&self) -> Option<&PackageTrackingEvent> {
        self.events.first()
    }
}

/// 金額（センターボ単位の整数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// 送料見積もり
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPrice {
    /// 配送サービス名
    pub mode: String,
    pub price: Price,
    /// 配送日数。抽出できない場合は [`DeliveryPrice::UNKNOWN_DAYS`]
    pub days: i32,
    pub origin: Option<Address>,
    pub destination: Option<Address>,
}

impl DeliveryPrice {
    pub const UNKNOWN_DAYS: i32 = -1;

    pub fn has_estimate(&self) -> bool {
        self.days != Self::UNKNOWN_DAYS
    }
}

/// 配送サービス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryOption {
    Sedex,
    Sedex10,
    Sedex12,
    SedexHoje,
    Pac,
}

impl DeliveryOption {
    pub const ALL: [DeliveryOption; 5] = [
        DeliveryOption::Sedex,
        DeliveryOption::Sedex10,
        DeliveryOption::Sedex12,
        DeliveryOption::SedexHoje,
        DeliveryOption::Pac,
    ];

    /// `DeliveryPrice::mode` に入る表示名
    pub fn label(self) -> &'static str {
        match self {
            Self::Sedex => "SEDEX",
            Self::Sedex10 => "SEDEX 10",
            Self::Sedex12 => "SEDEX 12",
            Self::SedexHoje => "SEDEX Hoje",
            Self::Pac => "PAC",
        }
    }

    /// 送料計算フォームの `servico` 値
    pub fn service_code(self) -> &'static str {
        match self {
            Self::Sedex => "04014",
            Self::Sedex10 => "40215",
            Self::Sedex12 => "40169",
            Self::SedexHoje => "40290",
            Self::Pac => "04510",
        }
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeliveryOption {
    type Err = String;

    /// 表示名（大文字小文字無視）またはサービスコード
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(s) || option.service_code() == s)
            .ok_or_else(|| format!("不明な配送サービス: {}", s))
    }
}

/// 荷物の寸法（cm）と重量（kg）
///
/// 値はそのままFetcherに渡す。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageDimensions {
    pub height: u32,
    pub width: u32,
    pub length: u32,
    pub weight: f32,
}

impl Default for PackageDimensions {
    fn default() -> Self {
        Self {
            height: 2,
            width: 11,
            length: 16,
            weight: 0.3,
        }
    }
}
