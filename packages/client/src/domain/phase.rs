//! ゲームフェーズ
//!
//! フェーズ名は列挙型で表し、昼／夜の分類は全フェーズに対して明示的に定義します。
//! 未知のフェーズ名も捨てずに保持し、昼／夜は名前の接頭辞から判定します。

use std::{convert::Infallible, str::FromStr};

/// Wire prefix shared by every night phase name.
pub const NIGHT_PREFIX: &str = "NIGHT_";

/// 昼／夜の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Day,
    Night,
}

/// サーバーが通知するゲームフェーズ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Preparation,
    NightCupid,
    NightSeer,
    NightWerewolves,
    NightInfect,
    NightWitch,
    NightPiper,
    DayDeaths,
    DayElection,
    DayDiscussion,
    DayVote,
    DayHunter,
    End,
    /// 既知のどれにも当たらないフェーズ名
    Other(String),
}

impl Phase {
    pub const ALL: [Phase; 13] = [
        Phase::Preparation,
        Phase::NightCupid,
        Phase::NightSeer,
        Phase::NightWerewolves,
        Phase::NightInfect,
        Phase::NightWitch,
        Phase::NightPiper,
        Phase::DayDeaths,
        Phase::DayElection,
        Phase::DayDiscussion,
        Phase::DayVote,
        Phase::DayHunter,
        Phase::End,
    ];

    /// 通信上のフェーズ名
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Preparation => "PREPARATION",
            Phase::NightCupid => "NIGHT_CUPID",
            Phase::NightSeer => "NIGHT_SEER",
            Phase::NightWerewolves => "NIGHT_WEREWOLVES",
            Phase::NightInfect => "NIGHT_INFECT",
            Phase::NightWitch => "NIGHT_WITCH",
            Phase::NightPiper => "NIGHT_PIPER",
            Phase::DayDeaths => "DAY_DEATHS",
            Phase::DayElection => "DAY_ELECTION",
            Phase::DayDiscussion => "DAY_DISCUSSION",
            Phase::DayVote => "DAY_VOTE",
            Phase::DayHunter => "DAY_HUNTER",
            Phase::End => "END",
            Phase::Other(name) => name,
        }
    }

    /// 通信上の名前からフェーズを得る（未知の名前は `Other`）
    pub fn from_wire(name: &str) -> Phase {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == name)
            .unwrap_or_else(|| Phase::Other(name.to_string()))
    }

    /// フェーズの昼／夜の分類
    pub fn time_of_day(&self) -> TimeOfDay {
        match self {
            Phase::NightCupid
            | Phase::NightSeer
            | Phase::NightWerewolves
            | Phase::NightInfect
            | Phase::NightWitch
            | Phase::NightPiper => TimeOfDay::Night,
            Phase::Preparation
            | Phase::DayDeaths
            | Phase::DayElection
            | Phase::DayDiscussion
            | Phase::DayVote
            | Phase::DayHunter
            | Phase::End => TimeOfDay::Day,
            Phase::Other(name) if name.starts_with(NIGHT_PREFIX) => TimeOfDay::Night,
            Phase::Other(_) => TimeOfDay::Day,
        }
    }

    pub fn is_night(&self) -> bool {
        self.time_of_day() == TimeOfDay::Night
    }
}

impl FromStr for Phase {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Phase::from_wire(s))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
