use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// When a housekeeping job fires. All times are UTC; next_after always
/// returns an instant strictly after `now` so a job never runs twice for the
/// same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Daily { hour: u32, minute: u32 },
    Weekly { weekday: Weekday, hour: u32, minute: u32 },
    MonthlyOnDay { day: u32, hour: u32, minute: u32 },
}

impl Schedule {
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match *self {
            Schedule::Daily { hour, minute } => {
                let today = at(now.date_naive(), hour, minute);
                if today > now {
                    today
                } else {
                    at(now.date_naive() + Duration::days(1), hour, minute)
                }
            }
            Schedule::Weekly {
                weekday,
                hour,
                minute,
            } => {
                let mut date = now.date_naive();
                loop {
                    if date.weekday() == weekday {
                        let candidate = at(date, hour, minute);
                        if candidate > now {
                            return candidate;
                        }
                    }
                    date += Duration::days(1);
                }
            }
            Schedule::MonthlyOnDay { day, hour, minute } => {
                let mut year = now.year();
                let mut month = now.month();
                loop {
                    // Months without the day (e.g. day 31 in February) are skipped.
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        let candidate = at(date, hour, minute);
                        if candidate > now {
                            return candidate;
                        }
                    }
                    month += 1;
                    if month > 12 {
                        month = 1;
                        year += 1;
                    }
                }
            }
        }
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time))
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Schedule::Daily { hour, minute } => {
                write!(f, "her gün {:02}:{:02} UTC", hour, minute)
            }
            Schedule::Weekly {
                weekday,
                hour,
                minute,
            } => write!(f, "her {} {:02}:{:02} UTC", weekday, hour, minute),
            Schedule::MonthlyOnDay { day, hour, minute } => {
                write!(f, "her ayın {}. günü {:02}:{:02} UTC", day, hour, minute)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn daily_rolls_to_tomorrow_after_the_slot() {
        let schedule = Schedule::Daily { hour: 0, minute: 0 };
        assert_eq!(
            schedule.next_after(utc(2026, 8, 23, 12, 0, 0)),
            utc(2026, 8, 24, 0, 0, 0)
        );
    }

    #[test]
    fn daily_slot_today_still_ahead() {
        let schedule = Schedule::Daily { hour: 23, minute: 30 };
        assert_eq!(
            schedule.next_after(utc(2026, 8, 23, 12, 0, 0)),
            utc(2026, 8, 23, 23, 30, 0)
        );
    }

    #[test]
    fn exact_slot_time_rolls_forward() {
        let schedule = Schedule::Daily { hour: 0, minute: 0 };
        assert_eq!(
            schedule.next_after(utc(2026, 8, 23, 0, 0, 0)),
            utc(2026, 8, 24, 0, 0, 0)
        );
    }

    #[test]
    fn weekly_finds_the_next_sunday() {
        let schedule = Schedule::Weekly {
            weekday: Weekday::Sun,
            hour: 4,
            minute: 0,
        };
        // 2026-08-23 is a Sunday; 05:00 is already past the slot.
        assert_eq!(
            schedule.next_after(utc(2026, 8, 23, 5, 0, 0)),
            utc(2026, 8, 30, 4, 0, 0)
        );
        assert_eq!(
            schedule.next_after(utc(2026, 8, 23, 3, 0, 0)),
            utc(2026, 8, 23, 4, 0, 0)
        );
    }

    #[test]
    fn monthly_rolls_to_next_month_after_the_day() {
        let schedule = Schedule::MonthlyOnDay {
            day: 10,
            hour: 9,
            minute: 10,
        };
        assert_eq!(
            schedule.next_after(utc(2026, 8, 23, 0, 0, 0)),
            utc(2026, 9, 10, 9, 10, 0)
        );
        assert_eq!(
            schedule.next_after(utc(2026, 12, 15, 0, 0, 0)),
            utc(2027, 1, 10, 9, 10, 0)
        );
    }

    #[test]
    fn monthly_skips_months_missing_the_day() {
        let schedule = Schedule::MonthlyOnDay {
            day: 31,
            hour: 0,
            minute: 0,
        };
        assert_eq!(
            schedule.next_after(utc(2026, 1, 31, 1, 0, 0)),
            utc(2026, 3, 31, 0, 0, 0)
        );
    }
}
