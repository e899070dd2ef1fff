//! Display formatting for history timestamps.

use chrono::{DateTime, Datelike, Local, Utc};

/// Human-readable "time ago" label, in whole elapsed units.
///
/// Within a day: `刚刚`, `N分钟前`, `N小时前`. Then `昨天`, `N天前` up to a
/// week, and a `YYYY/M/D` local date beyond that. Future instants read as `刚刚`.
pub fn relative_time(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let millis = (*now - *then).num_milliseconds();
    let days = millis.div_euclid(86_400_000);

    if days <= 0 {
        let hours = millis.div_euclid(3_600_000);
        if hours <= 0 {
            let minutes = millis.div_euclid(60_000);
            return if minutes <= 0 {
                "刚刚".into()
            } else {
                format!("{minutes}分钟前")
            };
        }
        format!("{hours}小时前")
    } else if days == 1 {
        "昨天".into()
    } else if days < 7 {
        format!("{days}天前")
    } else {
        short_date(&then.with_timezone(&Local))
    }
}

fn short_date<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{}/{}/{}", dt.year(), dt.month(), dt.day())
}
