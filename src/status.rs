//! 進捗・ステータス表示
//!
//! パイプラインは表示先を知らず、`StatusSink` に文言と進捗率を流すだけ。

use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

/// 取り込みの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Parsing,
    Normalizing,
    Writing,
    Done,
    Failed,
}

impl SyncPhase {
    /// 進捗バーの位置
    pub fn percent(self) -> u8 {
        match self {
            SyncPhase::Idle | SyncPhase::Failed => 0,
            SyncPhase::Fetching => 25,
            SyncPhase::Parsing => 50,
            SyncPhase::Normalizing => 65,
            SyncPhase::Writing => 80,
            SyncPhase::Done => 100,
        }
    }
}

pub trait StatusSink {
    /// ステータス文言を更新
    fn status(&self, text: &str);
    /// 進捗率（0-100）を更新
    fn progress(&self, percent: u8);
    /// 段階が進んだ
    fn phase(&self, phase: SyncPhase) {
        if phase != SyncPhase::Failed {
            self.progress(phase.percent());
        }
    }
    /// 進捗表示を閉じる
    fn hide(&self) {}
}

/// 何も表示しない
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl StatusSink for SilentSink {
    fn status(&self, _text: &str) {}
    fn progress(&self, _percent: u8) {}
}

/// ターミナルの進捗バー
///
/// 閉じるときに最後のステータス文言を1行残す。
pub struct TerminalSink {
    bar: ProgressBar,
    verbose: bool,
    last: RefCell<String>,
}

impl TerminalSink {
    pub fn new(verbose: bool) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos:>3}% {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            verbose,
            last: RefCell::new(String::new()),
        }
    }
}

impl StatusSink for TerminalSink {
    fn status(&self, text: &str) {
        if self.verbose {
            self.bar.println(format!("  {}", text));
        }
        self.bar.set_message(text.to_string());
        *self.last.borrow_mut() = text.to_string();
    }

    fn progress(&self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }

    fn hide(&self) {
        self.bar.finish_and_clear();
        let last = self.last.borrow();
        if !last.is_empty() {
            println!("{}", last);
        }
    }
}
