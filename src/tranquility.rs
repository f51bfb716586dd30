//! The Tranquility calendar.
//!
//! Every date shown on the blog is given in the Tranquility calendar first and
//! the Gregorian calendar second. The calendar counts years from the first
//! crewed moon landing:
//!
//! ```text
//! 1969-07-20            Moon Landing Day (year 0, outside any month)
//! 1969-07-21            1 Archimedes, 1 AT
//! 1970-07-19            28 Mendel, 1 AT
//! 1970-07-20            Armstrong Day, 1 AT
//! 1968-07-21..07-19     year 1 BT (Before Tranquility)
//! ```
//!
//! A year is thirteen 28-day months plus Armstrong Day, which closes the year.
//! In Gregorian leap years Aldrin Day (29 February) sits between Hippocrates 27
//! and Hippocrates 28. Neither special day belongs to a month or a week.
//!
//! Weekdays are tied to the day of the month: the 1st is always a Friday.
//!
//! All functions here are pure. Callers pass a Gregorian year and day-of-year
//! (or a [`NaiveDate`]) and get back a [`TranquilDate`].

use chrono::{Datelike, NaiveDate};
use std::fmt;

const DAYS_PER_MONTH: i64 = 28;

const WEEKDAYS: [&str; 7] = [
    "Friday",
    "Saturday",
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Archimedes,
    Brahe,
    Copernicus,
    Darwin,
    Einstein,
    Faraday,
    Galileo,
    Hippocrates,
    Imhotep,
    Jung,
    Kepler,
    Lavoisier,
    Mendel,
}

impl Month {
    const ALL: [Month; 13] = [
        Month::Archimedes,
        Month::Brahe,
        Month::Copernicus,
        Month::Darwin,
        Month::Einstein,
        Month::Faraday,
        Month::Galileo,
        Month::Hippocrates,
        Month::Imhotep,
        Month::Jung,
        Month::Kepler,
        Month::Lavoisier,
        Month::Mendel,
    ];

    /// Month from its zero-based position in the year.
    fn from_index(index: usize) -> Option<Month> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Archimedes => "Archimedes",
            Month::Brahe => "Brahe",
            Month::Copernicus => "Copernicus",
            Month::Darwin => "Darwin",
            Month::Einstein => "Einstein",
            Month::Faraday => "Faraday",
            Month::Galileo => "Galileo",
            Month::Hippocrates => "Hippocrates",
            Month::Imhotep => "Imhotep",
            Month::Jung => "Jung",
            Month::Kepler => "Kepler",
            Month::Lavoisier => "Lavoisier",
            Month::Mendel => "Mendel",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-day observances that sit outside the month structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialDay {
    MoonLandingDay,
    ArmstrongDay,
    AldrinDay,
}

impl SpecialDay {
    pub fn name(self) -> &'static str {
        match self {
            SpecialDay::MoonLandingDay => "Moon Landing Day",
            SpecialDay::ArmstrongDay => "Armstrong Day",
            SpecialDay::AldrinDay => "Aldrin Day",
        }
    }
}

impl fmt::Display for SpecialDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of a date within its Tranquility year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    /// A regular day: `day` is 1..=28.
    Month { month: Month, day: u8 },
    Special(SpecialDay),
}

/// A date in the Tranquility calendar.
///
/// `year` is positive for After Tranquility, negative for Before Tranquility
/// (`-1` is 1 BT) and zero only for Moon Landing Day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranquilDate {
    pub year: i32,
    pub day: Day,
}

impl TranquilDate {
    /// Convert from a Gregorian year and 1-based day of that year.
    ///
    /// Returns `None` when the ordinal is out of range for the year.
    pub fn from_ordinal(gregorian_year: i32, day_of_year: u32) -> Option<Self> {
        NaiveDate::from_yo_opt(gregorian_year, day_of_year).map(Self::from_date)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let (month, day) = (date.month(), date.day());

        if (month, day) == (7, 20) {
            let elapsed = date.year() - 1969;
            if elapsed == 0 {
                return Self {
                    year: 0,
                    day: Day::Special(SpecialDay::MoonLandingDay),
                };
            }
            return Self {
                year: skip_year_zero(elapsed),
                day: Day::Special(SpecialDay::ArmstrongDay),
            };
        }

        // Tranquility years start on Gregorian 21 July.
        let start_year = if (month, day) >= (7, 21) {
            date.year()
        } else {
            date.year() - 1
        };
        let year = skip_year_zero(start_year - 1968);

        if (month, day) == (2, 29) {
            return Self {
                year,
                day: Day::Special(SpecialDay::AldrinDay),
            };
        }

        let mut offset = days_since_new_year(start_year, date);
        if date.year() == start_year + 1 && month >= 3 && is_leap(date.year()) {
            // Aldrin Day is not part of Hippocrates.
            offset -= 1;
        }

        let month = Month::from_index((offset / DAYS_PER_MONTH) as usize).unwrap_or(Month::Mendel);
        Self {
            year,
            day: Day::Month {
                month,
                day: (offset % DAYS_PER_MONTH + 1) as u8,
            },
        }
    }

    pub fn month(&self) -> Option<Month> {
        match self.day {
            Day::Month { month, .. } => Some(month),
            Day::Special(_) => None,
        }
    }

    pub fn special(&self) -> Option<SpecialDay> {
        match self.day {
            Day::Special(special) => Some(special),
            Day::Month { .. } => None,
        }
    }

    pub fn is_special(&self) -> bool {
        self.special().is_some()
    }

    /// Weekday name; special days belong to no week.
    pub fn weekday_name(&self) -> Option<&'static str> {
        match self.day {
            Day::Month { day, .. } => Some(WEEKDAYS[(usize::from(day) - 1) % WEEKDAYS.len()]),
            Day::Special(_) => None,
        }
    }

    /// Short year with era, e.g. `"48 AT"` or `"2 BT"`.
    pub fn era(&self) -> String {
        if self.year < 0 {
            format!("{} BT", -self.year)
        } else {
            format!("{} AT", self.year)
        }
    }

    fn long_era(&self) -> String {
        if self.year < 0 {
            format!("{} Before Tranquility", -self.year)
        } else {
            format!("{} After Tranquility", self.year)
        }
    }

    /// Full textual date, e.g. `"Sunday, 17 Lavoisier, 48 After Tranquility"`.
    pub fn long_date(&self) -> String {
        match self.day {
            Day::Special(SpecialDay::MoonLandingDay) => SpecialDay::MoonLandingDay.to_string(),
            Day::Special(special) => format!("{}, {}", special, self.long_era()),
            Day::Month { month, day } => format!(
                "{}, {} {}, {}",
                self.weekday_name().unwrap_or_default(),
                day,
                month,
                self.long_era()
            ),
        }
    }
}

impl fmt::Display for TranquilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.long_date())
    }
}

fn skip_year_zero(n: i32) -> i32 {
    if n > 0 { n } else { n - 1 }
}

fn is_leap(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_since_new_year(start_year: i32, date: NaiveDate) -> i64 {
    NaiveDate::from_ymd_opt(start_year, 7, 21)
        .map(|new_year| (date - new_year).num_days())
        .unwrap_or_default()
}
