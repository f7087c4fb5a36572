use crate::analytics::AnalyticsError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//a calendar month, the unit of time-series granularity
//only month arithmetic is needed, so no day-level calendar type is involved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    //creates a bucket, month is 1-based
    pub fn new(year: i32, month: u32) -> Result<Self, AnalyticsError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(AnalyticsError::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(MonthBucket { year, month })
    }

    //parses the zero-padded "YYYY-MM" form
    pub fn parse(s: &str) -> Result<Self, AnalyticsError> {
        let invalid = || AnalyticsError::InvalidMonth(s.to_string());
        let bytes = s.as_bytes();

        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }

        let (year, month) = (&s[..4], &s[5..]);
        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthBucket::new(year, month).map_err(|_| invalid())
    }

    //the month a date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        MonthBucket {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    //advances by `months` calendar months, carrying into the year
    //negative values step backwards
    pub fn add_months(self, months: i32) -> Self {
        let zero_based = i64::from(self.month) - 1 + i64::from(months);
        let year = i64::from(self.year) + zero_based.div_euclid(12);
        let month = zero_based.rem_euclid(12) + 1;

        MonthBucket {
            year: year as i32,
            month: month as u32,
        }
    }

    //true if the date falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        MonthBucket::from_date(date) == *self
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthBucket {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthBucket::parse(s)
    }
}

impl TryFrom<String> for MonthBucket {
    type Error = AnalyticsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MonthBucket::parse(&value)
    }
}

impl From<MonthBucket> for String {
    fn from(bucket: MonthBucket) -> Self {
        bucket.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> MonthBucket {
        MonthBucket::parse(s).unwrap()
    }

    #[test]
    fn parses_and_formats_zero_padded() {
        let bucket = month("2025-03");
        assert_eq!(bucket.year(), 2025);
        assert_eq!(bucket.month(), 3);
        assert_eq!(bucket.to_string(), "2025-03");
        assert_eq!(month("0999-11").to_string(), "0999-11");
    }

    #[test]
    fn rejects_malformed_months() {
        let malformed = [
            "2025-13", "2025-00", "2025-1", "25-01", "2025/01", "2025-01-01", "abcd-ef", "",
        ];
        for bad in malformed {
            assert_eq!(
                MonthBucket::parse(bad),
                Err(AnalyticsError::InvalidMonth(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn add_months_rolls_over_the_year() {
        assert_eq!(month("2025-12").add_months(1), month("2026-01"));
        assert_eq!(month("2025-11").add_months(3), month("2026-02"));
        assert_eq!(month("2025-01").add_months(24), month("2027-01"));
        assert_eq!(month("2025-05").add_months(0), month("2025-05"));
    }

    #[test]
    fn add_months_steps_backwards() {
        assert_eq!(month("2025-01").add_months(-1), month("2024-12"));
        assert_eq!(month("2025-03").add_months(-15), month("2023-12"));
    }

    #[test]
    fn ordering_is_chronological() {
        let mut buckets = vec![month("2025-10"), month("2024-12"), month("2025-02")];
        buckets.sort();
        let labels: Vec<String> = buckets.iter().map(|b| b.to_string()).collect();
        assert_eq!(labels, vec!["2024-12", "2025-02", "2025-10"]);
    }

    #[test]
    fn buckets_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        assert_eq!(MonthBucket::from_date(date), month("2025-11"));
        assert!(month("2025-11").contains(date));
        assert!(!month("2025-10").contains(date));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&month("2025-07")).unwrap();
        assert_eq!(json, "\"2025-07\"");
        let back: MonthBucket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month("2025-07"));
        assert!(serde_json::from_str::<MonthBucket>("\"2025-7\"").is_err());
    }
}
