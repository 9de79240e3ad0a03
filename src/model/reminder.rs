use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::contact::Contact;
use super::ids::Id;

/// How often a reminder repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "every")]
pub enum Frequency {
    OneTime,
    Week(u32),
    Month(u32),
    Year(u32),
}

impl Frequency {
    /// Splits into the `(frequency_type, frequency_number)` column pair.
    pub fn to_db(&self) -> (&'static str, u32) {
        match self {
            Frequency::OneTime => ("one_time", 0),
            Frequency::Week(n) => ("week", *n),
            Frequency::Month(n) => ("month", *n),
            Frequency::Year(n) => ("year", *n),
        }
    }

    pub fn from_db(kind: &str, number: u32) -> Option<Self> {
        match kind {
            "one_time" => Some(Frequency::OneTime),
            "week" => Some(Frequency::Week(number)),
            "month" => Some(Frequency::Month(number)),
            "year" => Some(Frequency::Year(number)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Id<Reminder>,
    pub account_id: Id<Account>,
    pub contact_id: Id<Contact>,
    pub title: String,
    pub next_expected_date: NaiveDate,
    pub frequency: Frequency,
}

impl Reminder {
    pub fn create(
        account_id: Id<Account>,
        contact_id: Id<Contact>,
        title: String,
        next_expected_date: NaiveDate,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: Id::generate(),
            account_id,
            contact_id,
            title,
            next_expected_date,
            frequency,
        }
    }

    /// The first occurrence strictly after `date`. `None` for a one-time
    /// reminder that has already passed, or when the next occurrence falls
    /// outside the representable date range.
    pub fn next_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut next = self.next_expected_date;
        while next <= date {
            next = match self.frequency {
                Frequency::OneTime => return None,
                Frequency::Week(n) => {
                    next.checked_add_signed(Duration::try_weeks(i64::from(n.max(1)))?)?
                }
                Frequency::Month(n) => next.checked_add_months(Months::new(n.max(1)))?,
                Frequency::Year(n) => {
                    next.checked_add_months(Months::new(n.max(1).checked_mul(12)?))?
                }
            };
        }
        Some(next)
    }
}
