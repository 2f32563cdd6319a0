//! Calendar timestamp captured from the real-time clock

use core::fmt;

/// Six-field date and time reading
///
/// Fields are private so every value in circulation went through
/// [`TimeStamp::new`]; a captured stamp is never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeStamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeStamp {
    /// Build a timestamp, validating every field
    ///
    /// Returns `None` for out-of-range months, days (leap years included),
    /// hours, minutes or seconds.
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if month < 1 || month > 12 {
            return None;
        }
        if day < 1 || day > days_in_month(year, month) {
            return None;
        }
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Day of the week, 0 = Sunday
    ///
    /// Proleptic Gregorian for every representable year.
    pub const fn weekday(&self) -> u8 {
        const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let year = self.year as i32;
        let y = if self.month < 3 { year - 1 } else { year };
        let sum = y + y.div_euclid(4) - y.div_euclid(100)
            + y.div_euclid(400)
            + OFFSETS[(self.month - 1) as usize]
            + self.day as i32;
        sum.rem_euclid(7) as u8
    }

    /// Date in U.S. order, e.g. `3/1/2024`
    pub const fn date(&self) -> UsDate {
        UsDate(*self)
    }

    /// Time of day, e.g. `9:15:30`
    pub const fn time_of_day(&self) -> ClockTime {
        ClockTime(*self)
    }
}

/// `M/D/YYYY` rendering of a [`TimeStamp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsDate(TimeStamp);

impl fmt::Display for UsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.0.month, self.0.day, self.0.year)
    }
}

/// `H:MM:SS` rendering of a [`TimeStamp`] (hour unpadded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime(TimeStamp);

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.0.hour, self.0.minute, self.0.second)
    }
}

const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
