//! User-facing text. Components hand over message identifiers and parameters;
//! this module renders them for the configured display language. Nothing in
//! the core formats text directly.

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

/// Message catalog for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn epic_added(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Added epic \"{name}\""),
            Locale::Ja => format!("エピック「{name}」を追加しました"),
        }
    }

    pub fn epic_updated(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Updated epic \"{name}\""),
            Locale::Ja => format!("エピック「{name}」を更新しました"),
        }
    }

    pub fn epic_deleted(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Deleted epic \"{name}\""),
            Locale::Ja => format!("エピック「{name}」を削除しました"),
        }
    }

    pub fn epic_missing(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("No epic named \"{name}\""),
            Locale::Ja => format!("エピック「{name}」は存在しません"),
        }
    }

    pub fn duplicate_name(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("An epic named \"{name}\" already exists"),
            Locale::Ja => format!("エピック名「{name}」が重複しています"),
        }
    }

    pub fn empty_name(&self) -> String {
        match self.locale {
            Locale::En => "Empty epic name".to_owned(),
            Locale::Ja => "エピック名が空です".to_owned(),
        }
    }

    pub fn work_started(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Started working on \"{name}\""),
            Locale::Ja => format!("「{name}」の作業を開始しました"),
        }
    }

    pub fn already_working(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Already working on \"{name}\""),
            Locale::Ja => format!("すでに「{name}」の作業中です"),
        }
    }

    pub fn discard_prompt(&self) -> String {
        match self.locale {
            Locale::En => "Discard ongoing work?".to_owned(),
            Locale::Ja => "進行中の作業を破棄しますか？".to_owned(),
        }
    }

    pub fn start_cancelled(&self) -> String {
        match self.locale {
            Locale::En => "Kept the ongoing work".to_owned(),
            Locale::Ja => "進行中の作業を保持しました".to_owned(),
        }
    }

    pub fn working_time(&self, duration_minutes: i64) -> String {
        match self.locale {
            Locale::En => format!("Worked for {duration_minutes} min"),
            Locale::Ja => format!("作業時間は{duration_minutes}分でした"),
        }
    }

    pub fn record_failed(&self) -> String {
        match self.locale {
            Locale::En => "Failed to record time".to_owned(),
            Locale::Ja => "時間の記録に失敗しました".to_owned(),
        }
    }

    pub fn session_discarded(&self) -> String {
        match self.locale {
            Locale::En => "Discarded the ongoing work".to_owned(),
            Locale::Ja => "進行中の作業を破棄しました".to_owned(),
        }
    }

    pub fn nothing_in_progress(&self) -> String {
        match self.locale {
            Locale::En => "No work in progress".to_owned(),
            Locale::Ja => "進行中の作業はありません".to_owned(),
        }
    }

    pub fn status_line(&self, name: &str, started: &str, duration_minutes: i64) -> String {
        match self.locale {
            Locale::En => {
                format!("Working on \"{name}\" since {started} ({duration_minutes} min)")
            }
            Locale::Ja => {
                format!("「{name}」を{started}から作業中（{duration_minutes}分）")
            }
        }
    }

    pub fn setting_up(&self) -> String {
        match self.locale {
            Locale::En => "Setting up, upgrading stored data...".to_owned(),
            Locale::Ja => "セットアップ中、保存データを更新しています...".to_owned(),
        }
    }
}
