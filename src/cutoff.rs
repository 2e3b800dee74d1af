// Contest date policy for Probgate scraping
use crate::config::CutoffConfig;
use crate::model::ProbgateContest;
use chrono::Month;

/// Month number for a Probgate month code. The US Open runs in March.
pub fn month_number(code: &str) -> Option<u32> {
    if code.eq_ignore_ascii_case("OPEN") {
        return Some(3);
    }
    code.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Two-digit contest years: 91..=99 are 1990s, everything else is 20xx.
pub fn full_year(short: u32) -> u32 {
    if short >= 100 {
        short
    } else if short > 90 {
        1900 + short
    } else {
        2000 + short
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContestCutoff {
    month: u32,
    year: u32,
}

impl ContestCutoff {
    pub fn new(cfg: CutoffConfig) -> Self {
        Self {
            month: cfg.month,
            year: full_year(cfg.year),
        }
    }

    /// True when `(month, year)` is at or before the cutoff. Year-major.
    pub fn includes_date(&self, month: u32, year: u32) -> bool {
        (year, month) <= (self.year, self.month)
    }

    /// Contests with an unreadable month or year are never included.
    pub fn includes(&self, contest: &ProbgateContest) -> bool {
        let month = month_number(&contest.month);
        let year = contest.year.parse::<u32>().ok().map(full_year);
        match (month, year) {
            (Some(month), Some(year)) => self.includes_date(month, year),
            _ => false,
        }
    }
}
