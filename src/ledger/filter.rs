use chrono::NaiveDate;

//date range and account scope for listings, bounds are inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub account_id: Option<u64>,
}

impl RecordFilter {
    //matches everything
    pub fn all() -> Self {
        RecordFilter::default()
    }

    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        RecordFilter {
            from,
            to,
            account_id: None,
        }
    }

    pub fn for_account(mut self, account_id: Option<u64>) -> Self {
        self.account_id = account_id;
        self
    }

    pub fn matches(&self, date: NaiveDate, account_id: u64) -> bool {
        self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
            && self.account_id.map_or(true, |id| id == account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let filter = RecordFilter::between(Some(d(5)), Some(d(10)));
        assert!(!filter.matches(d(4), 1));
        assert!(filter.matches(d(5), 1));
        assert!(filter.matches(d(10), 1));
        assert!(!filter.matches(d(11), 1));
    }

    #[test]
    fn account_scope() {
        let filter = RecordFilter::all().for_account(Some(2));
        assert!(filter.matches(d(1), 2));
        assert!(!filter.matches(d(1), 3));
        assert!(RecordFilter::all().matches(d(1), 3));
    }
}
