//! 行継続ステートマシン
//!
//! 追跡テーブルの行列を、新規イベント行と継続行に分けて畳み込む。

use crate::models::PackageTrackingEvent;

/// 分類済みの行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingRow {
    /// 新しいイベントを開始する行
    Event(PackageTrackingEvent),
    /// 直前のイベントの詳細テキストだけを持つ行
    Continuation(String),
}

/// 現在のイベントの有無
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    NoCurrentEvent,
    HasCurrentEvent(PackageTrackingEvent),
}

/// 1行分の遷移
///
/// 戻り値の1つ目は確定したイベント（新規行が来て閉じられた前イベント）。
/// 継続行は詳細を追記ではなく置換する。現在のイベントが無い継続行は無視する。
pub fn transition(state: RowState, row: TrackingRow) -> (Option<PackageTrackingEvent>, RowState) {
    match (state, row) {
        (RowState::NoCurrentEvent, TrackingRow::Event(event)) => {
            (None, RowState::HasCurrentEvent(event))
        }
        (RowState::HasCurrentEvent(previous), TrackingRow::Event(event)) => {
            (Some(previous), RowState::HasCurrentEvent(event))
        }
        (RowState::HasCurrentEvent(mut current), TrackingRow::Continuation(details)) => {
            current.details = details;
            (None, RowState::HasCurrentEvent(current))
        }
        (RowState::NoCurrentEvent, TrackingRow::Continuation(_)) => (None, RowState::NoCurrentEvent),
    }
}

/// 行列全体の畳み込み
#[derive(Debug, Default)]
pub struct EventReducer {
    completed: Vec<PackageTrackingEvent>,
    state: RowState,
}

impl EventReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    pub fn apply(mut self, row: TrackingRow) -> Self {
        let (completed, state) = transition(self.state, row);
        self.completed.extend(completed);
        self.state = state;
        self
    }

    /// 行順のイベント列
    pub fn finish(mut self) -> Vec<PackageTrackingEvent> {
        if let RowState::HasCurrentEvent(current) = self.state {
            self.completed.push(current);
        }
        self.completed
    }
}
