//! Tournament schedule data as served by the league API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a single fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    Scheduled,
    Live,
    Final,
    Postponed,
}

impl FixtureStatus {
    pub fn label(self) -> &'static str {
        match self {
            FixtureStatus::Scheduled => "Scheduled",
            FixtureStatus::Live => "LIVE",
            FixtureStatus::Final => "Final",
            FixtureStatus::Postponed => "Postponed",
        }
    }
}

/// One game on the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub home: String,
    pub away: String,
    /// Court or field name, when assigned
    #[serde(default)]
    pub court: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub status: FixtureStatus,
    /// Final or running score as (home, away)
    #[serde(default)]
    pub score: Option<(u32, u32)>,
}

impl Fixture {
    /// "Home vs Away", or "Home 3-1 Away" once there is a score.
    pub fn matchup(&self) -> String {
        match self.score {
            Some((home, away)) => format!("{} {}-{} {}", self.home, home, away, self.away),
            None => format!("{} vs {}", self.home, self.away),
        }
    }
}

/// A tournament's fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub tournament: String,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

impl Schedule {
    /// Fixtures sorted by kick-off time.
    pub fn chronological(&self) -> Vec<&Fixture> {
        let mut fixtures: Vec<&Fixture> = self.fixtures.iter().collect();
        fixtures.sort_by_key(|f| f.starts_at);
        fixtures
    }

    pub fn live(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures
            .iter()
            .filter(|f| f.status == FixtureStatus::Live)
    }

    /// Fixtures not yet played that start at or after `now`.
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<&Fixture> {
        self.chronological()
            .into_iter()
            .filter(|f| f.status == FixtureStatus::Scheduled && f.starts_at >= now)
            .collect()
    }
}
