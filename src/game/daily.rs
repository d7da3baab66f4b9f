//! Daily card selection.
//!
//! Every client derives the same card for the same UTC day without talking to
//! a server. The card list is shuffled once with a deterministic generator
//! seeded only by the card count, and day `n` picks slot `n mod count` of that
//! shuffle. Each card therefore shows exactly once per `count`-day cycle.
//!
//! Generator details (fixed, changing any of them reshuffles every day):
//! - seed string: `"<prefix>:<card count>"`
//! - string hash: polynomial rolling hash over UTF-16 code units,
//!   base 131, modulus 9_007_199_254_740_881
//! - LCG: `state = state * 1664525 + 1013904223 (mod 2^32)`, seeded with the
//!   low 32 bits of the hash
//! - shuffle: Fisher–Yates from the last slot down, `j = (next * (i + 1)) >> 32`

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const DEFAULT_SEED_PREFIX: &str = "sorcerify:daily";

const MS_PER_DAY: f64 = 86_400_000.0;
/// 0000-01-01 and 9999-12-31: the days a `YYYY-MM-DD` key can name.
const MIN_DAY_NUMBER: i64 = -719_528;
const MAX_DAY_NUMBER: i64 = 2_932_896;
const HASH_BASE: u64 = 131;
const HASH_MODULUS: u64 = 9_007_199_254_740_881;
const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("expected a YYYY-MM-DD date, got {0:?}")]
    Format(String),
    #[error("date out of range: {0}")]
    OutOfRange(String),
}

/// A calendar day in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl UtcDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::OutOfRange(format!("month {}", month)));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(DateError::OutOfRange(format!("{}-{:02}-{:02}", year, month, day)));
        }
        Ok(Self { year, month, day })
    }

    /// Days since 1970-01-01. Negative before the epoch.
    pub fn day_number(&self) -> i64 {
        let (month, day) = (self.month as i64, self.day as i64);
        let year = self.year as i64 - if month <= 2 { 1 } else { 0 };
        let era = year.div_euclid(400);
        let year_of_era = year.rem_euclid(400);
        let shifted_month = if month > 2 { month - 3 } else { month + 9 };
        let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * 146_097 + day_of_era - 719_468
    }

    fn from_day_number(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let day_of_era = z.rem_euclid(146_097);
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let mp = (5 * day_of_year + 2) / 153;
        let day = (day_of_year - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = year_of_era + era * 400 + if month <= 2 { 1 } else { 0 };
        Self {
            year: year as i32,
            month,
            day,
        }
    }

    /// The UTC day containing a Unix timestamp in milliseconds (`Date.now()`).
    /// Instants outside years 0000 through 9999 are rejected.
    pub fn from_unix_millis(millis: f64) -> Result<Self, DateError> {
        let days = (millis / MS_PER_DAY).floor();
        if !(MIN_DAY_NUMBER as f64..=MAX_DAY_NUMBER as f64).contains(&days) {
            return Err(DateError::OutOfRange(format!("timestamp {}", millis)));
        }
        Ok(Self::from_day_number(days as i64))
    }

    pub fn previous(&self) -> Self {
        Self::from_day_number(self.day_number() - 1)
    }
}

impl fmt::Display for UtcDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for UtcDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for UtcDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DateError::Format(s.to_string());
        let mut parts = s.trim().split('-');
        let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(bad());
        }
        let year = y.parse().map_err(|_| bad())?;
        let month = m.parse().map_err(|_| bad())?;
        let day = d.parse().map_err(|_| bad())?;
        UtcDate::new(year, month, day)
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Polynomial rolling hash of a string's UTF-16 code units.
pub fn hash_seed(input: &str) -> u64 {
    input
        .encode_utf16()
        .fold(0u64, |hash, unit| (hash * HASH_BASE + unit as u64) % HASH_MODULUS)
}

/// 32-bit linear congruential generator.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(hash_seed(seed))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform-ish index in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        ((self.next_u32() as u64 * bound as u64) >> 32) as usize
    }
}

/// Fisher–Yates shuffle of `0..count` driven by `rng`.
pub fn permutation(count: usize, rng: &mut Lcg) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    for i in (1..count).rev() {
        let j = rng.below(i + 1);
        order.swap(i, j);
    }
    order
}

/// The shuffled card order for one card-set size.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    order: Vec<usize>,
}

impl DailySchedule {
    pub fn new(card_count: usize) -> Self {
        Self::with_prefix(card_count, DEFAULT_SEED_PREFIX)
    }

    pub fn with_prefix(card_count: usize, prefix: &str) -> Self {
        let mut rng = Lcg::from_seed_str(&format!("{}:{}", prefix, card_count));
        Self {
            order: permutation(card_count, &mut rng),
        }
    }

    /// Card index for a day number. An empty card set yields 0.
    pub fn index_for_day(&self, day_number: i64) -> usize {
        if self.order.is_empty() {
            return 0;
        }
        let slot = day_number.rem_euclid(self.order.len() as i64) as usize;
        self.order[slot]
    }

    pub fn index_for(&self, date: UtcDate) -> usize {
        self.index_for_day(date.day_number())
    }
}

/// Card index shown on `date` for a set of `card_count` cards.
pub fn select_daily_index(card_count: usize, date: UtcDate) -> usize {
    DailySchedule::new(card_count).index_for(date)
}

/// Random practice card, never the one currently shown when there is a choice.
pub fn pick_practice_index<R: Rng + ?Sized>(
    card_count: usize,
    current: Option<usize>,
    rng: &mut R,
) -> usize {
    if card_count <= 1 {
        return 0;
    }
    let next = rng.random_range(0..card_count);
    if Some(next) == current {
        (next + 1) % card_count
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn date(s: &str) -> UtcDate {
        s.parse().unwrap()
    }

    #[test]
    fn day_numbers() {
        assert_eq!(date("1970-01-01").day_number(), 0);
        assert_eq!(date("1969-12-31").day_number(), -1);
        assert_eq!(date("2020-01-01").day_number(), 18_262);
        assert_eq!(date("2024-02-29").day_number(), 19_782);
    }

    #[test]
    fn day_number_roundtrip() {
        for days in [-800_000, -1, 0, 1, 59, 365, 11_016, 19_782, 60_000] {
            assert_eq!(UtcDate::from_day_number(days).day_number(), days);
        }
    }

    #[test]
    fn parse_and_format() {
        let d = date("2026-10-18");
        assert_eq!((d.year, d.month, d.day), (2026, 10, 18));
        assert_eq!(d.to_string(), "2026-10-18");
    }

    #[test]
    fn parse_rejects_bad_dates() {
        assert!(matches!("2025-13-01".parse::<UtcDate>(), Err(DateError::OutOfRange(_))));
        assert!(matches!("2025-02-29".parse::<UtcDate>(), Err(DateError::OutOfRange(_))));
        assert!(matches!("2025-2-1".parse::<UtcDate>(), Err(DateError::Format(_))));
        assert!(matches!("yesterday".parse::<UtcDate>(), Err(DateError::Format(_))));
        assert!(matches!("2025-01-01-01".parse::<UtcDate>(), Err(DateError::Format(_))));
    }

    #[test]
    fn from_unix_millis_ignores_time_of_day() {
        let midnight = 19_782.0 * MS_PER_DAY;
        assert_eq!(UtcDate::from_unix_millis(midnight), Ok(date("2024-02-29")));
        assert_eq!(UtcDate::from_unix_millis(midnight + MS_PER_DAY - 1.0), Ok(date("2024-02-29")));
        assert_eq!(UtcDate::from_unix_millis(midnight + MS_PER_DAY), Ok(date("2024-03-01")));
    }

    #[test]
    fn from_unix_millis_rejects_unrepresentable_instants() {
        for millis in [1e300, 1e20, -1e20, f64::NAN, f64::INFINITY] {
            assert!(matches!(UtcDate::from_unix_millis(millis), Err(DateError::OutOfRange(_))));
        }
        // Half-day steps: a single millisecond is below f64 precision here.
        let half_day = MS_PER_DAY / 2.0;
        let end = (MAX_DAY_NUMBER as f64 + 1.0) * MS_PER_DAY;
        assert_eq!(UtcDate::from_unix_millis(end - half_day), Ok(date("9999-12-31")));
        assert!(UtcDate::from_unix_millis(end).is_err());
        let start = MIN_DAY_NUMBER as f64 * MS_PER_DAY;
        assert_eq!(UtcDate::from_unix_millis(start), Ok(date("0000-01-01")));
        assert!(UtcDate::from_unix_millis(start - half_day).is_err());
    }

    #[test]
    fn previous_crosses_year() {
        assert_eq!(date("2025-01-01").previous(), date("2024-12-31"));
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(hash_seed(""), 0);
        assert_eq!(hash_seed("a"), 97);
        assert_eq!(hash_seed("ab"), 97 * 131 + 98);
        assert_eq!(hash_seed("sorcerify:daily:5"), hash_seed("sorcerify:daily:5"));
    }

    #[test]
    fn lcg_sequence() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_u32(), 1_013_904_223);
        assert_eq!(rng.next_u32(), 1_196_435_762);
    }

    #[test]
    fn five_day_cycle_is_a_permutation() {
        let schedule = DailySchedule::new(5);
        let mut seen: Vec<usize> = (0..5).map(|d| schedule.index_for_day(d)).collect();
        assert_eq!(schedule.index_for_day(5), schedule.index_for_day(0));
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn every_card_once_per_cycle() {
        let count = 97;
        let start = date("2026-10-18").day_number();
        let schedule = DailySchedule::new(count);
        let mut seen = vec![false; count];
        for day in start..start + count as i64 {
            let idx = schedule.index_for_day(day);
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn selection_is_stable() {
        let d = date("2026-10-18");
        assert_eq!(select_daily_index(120, d), select_daily_index(120, d));
        assert!(select_daily_index(120, d) < 120);
    }

    #[test]
    fn pre_epoch_days_are_valid() {
        let schedule = DailySchedule::new(7);
        assert_eq!(schedule.index_for_day(-7), schedule.index_for_day(0));
        assert!(schedule.index_for_day(-3) < 7);
    }

    #[test]
    fn empty_card_set_yields_zero() {
        assert_eq!(select_daily_index(0, date("2026-10-18")), 0);
        assert_eq!(DailySchedule::new(0).index_for_day(12_345), 0);
    }

    #[test]
    fn practice_never_repeats_current() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let idx = pick_practice_index(3, Some(1), &mut rng);
            assert!(idx < 3);
            assert_ne!(idx, 1);
        }
    }

    #[test]
    fn practice_with_single_card() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_practice_index(1, Some(0), &mut rng), 0);
        assert_eq!(pick_practice_index(0, None, &mut rng), 0);
    }
}
