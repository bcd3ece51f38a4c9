//! Nationwide German public holidays.

use chrono::{Duration, NaiveDate};

/// A public holiday on a fixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicHoliday {
    pub date: NaiveDate,
    pub name: &'static str,
}

/// Holidays at a fixed day of the year: `(month, day, name)`.
const FIXED: [(u32, u32, &str); 5] = [
    (1, 1, "New Year's Day"),
    (5, 1, "Labour Day"),
    (10, 3, "German Unity Day"),
    (12, 25, "Christmas Day"),
    (12, 26, "Boxing Day"),
];

/// Holidays relative to Easter Sunday: `(offset in days, name)`.
const MOVABLE: [(i64, &str); 4] = [
    (-2, "Good Friday"),
    (1, "Easter Monday"),
    (39, "Ascension Day"),
    (50, "Whit Monday"),
];

/// Easter Sunday of a Gregorian year (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let (d, e) = (b.div_euclid(4), b.rem_euclid(4));
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let (i, k) = (c.div_euclid(4), c.rem_euclid(4));
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;

    let month = u32::try_from(n.div_euclid(31)).ok()?;
    let day = u32::try_from(n.rem_euclid(31) + 1).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The nationwide public holidays of `year`, sorted by date.
pub fn public_holidays(year: i32) -> Vec<PublicHoliday> {
    let fixed = FIXED.iter().filter_map(|&(month, day, name)| {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| PublicHoliday { date, name })
    });
    let movable = easter_sunday(year).into_iter().flat_map(|easter| {
        MOVABLE.iter().map(move |&(offset, name)| PublicHoliday {
            date: easter + Duration::days(offset),
            name,
        })
    });

    let mut holidays: Vec<_> = fixed.chain(movable).collect();
    holidays.sort_by_key(|holiday| holiday.date);
    holidays
}
