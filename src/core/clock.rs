use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Clock abstracts access to the current timestamp so reports remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns today's date as seen at `offset`.
    fn today_at(&self, offset: &FixedOffset) -> NaiveDate {
        self.now().with_timezone(offset).date_naive()
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn today_follows_the_reporting_offset() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 12, 31, 20, 0, 0).unwrap());
        let utc = FixedOffset::east_opt(0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(clock.today_at(&utc), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(clock.today_at(&tokyo), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
