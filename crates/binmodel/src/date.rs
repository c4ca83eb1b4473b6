//! Millisecond timestamps and their ISO 8601 text form.
//!
//! DATE chunks carry `YYYY-MM-DDTHH:MM:SS.sssZ` text. Years outside
//! `0000..=9999` use the signed six-digit form (`+010000`, `-000001`).

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const MS_PER_DAY: i64 = 86_400_000;

/// Largest representable distance from the epoch, in milliseconds.
pub const MAX_TIMESTAMP_MS: i64 = 8_640_000_000_000_000;

/// An absolute point in time, in milliseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp(0);

    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Builds a UTC timestamp from calendar fields. `None` when a field is out
    /// of range.
    pub fn from_ymd_hms_milli(
        year: i64,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        milli: u32,
    ) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 || milli > 999 {
            return None;
        }
        let days = days_from_civil(year, month, day)?;
        let ms = days
            .checked_mul(MS_PER_DAY)?
            .checked_add(((hour as i64 * 60 + minute as i64) * 60 + second as i64) * 1000)?
            .checked_add(milli as i64)?;
        let ts = Timestamp(ms);
        ts.is_valid().then_some(ts)
    }

    pub fn now() -> Self {
        let ms = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            Err(e) => -(e.duration().as_millis() as i64),
        };
        Timestamp(ms)
    }

    /// Whether the timestamp lies within ±[`MAX_TIMESTAMP_MS`].
    pub fn is_valid(self) -> bool {
        (-MAX_TIMESTAMP_MS..=MAX_TIMESTAMP_MS).contains(&self.0)
    }

    pub fn to_iso_string(self) -> String {
        let days = self.0.div_euclid(MS_PER_DAY);
        let ms_of_day = self.0.rem_euclid(MS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        let hour = ms_of_day / 3_600_000;
        let minute = ms_of_day / 60_000 % 60;
        let second = ms_of_day / 1000 % 60;
        let milli = ms_of_day % 1000;
        let year = if (0..=9999).contains(&year) {
            format!("{year:04}")
        } else {
            format!("{year:+07}")
        };
        format!("{year}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{milli:03}Z")
    }

    /// Parses ISO 8601 date or date-time text.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM`, optional seconds with 1-9
    /// fractional digits, and a `Z` or `±HH:MM` suffix. A missing zone means
    /// UTC. Fractions beyond milliseconds are truncated.
    pub fn parse_iso(s: &str) -> Option<Self> {
        let mut p = Parser {
            bytes: s.as_bytes(),
            pos: 0,
        };
        let year = p.year()?;
        p.expect(b'-')?;
        let month = p.digits(2)? as u32;
        p.expect(b'-')?;
        let day = p.digits(2)? as u32;
        let mut ms = days_from_civil(year, month, day)?.checked_mul(MS_PER_DAY)?;

        if p.eat(b'T') {
            let hour = p.digits(2)?;
            p.expect(b':')?;
            let minute = p.digits(2)?;
            let mut second = 0;
            let mut milli = 0;
            if p.eat(b':') {
                second = p.digits(2)?;
                if p.eat(b'.') {
                    milli = p.fraction_millis()?;
                }
            }
            if hour > 23 || minute > 59 || second > 59 {
                return None;
            }
            ms += ((hour * 60 + minute) * 60 + second) * 1000 + milli;
            ms -= p.zone_offset_ms()?;
        }

        if p.pos != p.bytes.len() {
            return None;
        }
        let ts = Timestamp(ms);
        ts.is_valid().then_some(ts)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Option<()> {
        self.eat(b).then_some(())
    }

    fn digits(&mut self, n: usize) -> Option<i64> {
        let slice = self.bytes.get(self.pos..self.pos + n)?;
        let mut val = 0i64;
        for &b in slice {
            if !b.is_ascii_digit() {
                return None;
            }
            val = val * 10 + (b - b'0') as i64;
        }
        self.pos += n;
        Some(val)
    }

    fn year(&mut self) -> Option<i64> {
        if self.eat(b'+') {
            self.digits(6)
        } else if self.eat(b'-') {
            // "-000000" is not a valid year.
            match self.digits(6)? {
                0 => None,
                y => Some(-y),
            }
        } else {
            self.digits(4)
        }
    }

    fn fraction_millis(&mut self) -> Option<i64> {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let len = self.pos - start;
        if !(1..=9).contains(&len) {
            return None;
        }
        let mut milli = 0i64;
        for i in 0..3 {
            milli *= 10;
            if i < len {
                milli += (self.bytes[start + i] - b'0') as i64;
            }
        }
        Some(milli)
    }

    fn zone_offset_ms(&mut self) -> Option<i64> {
        if self.eat(b'Z') || self.pos == self.bytes.len() {
            return Some(0);
        }
        let sign = if self.eat(b'+') {
            1
        } else if self.eat(b'-') {
            -1
        } else {
            return None;
        };
        let hours = self.digits(2)?;
        self.expect(b':')?;
        let minutes = self.digits(2)?;
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(sign * (hours * 60 + minutes) * 60_000)
    }
}

fn is_leap_year(y: i64) -> bool {
    y % 4 == 0 && (y % 100 != 0 || y % 400 == 0)
}

fn days_in_month(y: i64, m: u32) -> u32 {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(y) => 29,
        _ => 28,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date (Hinnant's algorithm).
fn days_from_civil(y: i64, m: u32, d: u32) -> Option<i64> {
    if !(1..=12).contains(&m) || d < 1 || d > days_in_month(y, m) {
        return None;
    }
    let (m, d) = (m as i64, d as i64);
    let yy = if m <= 2 { y - 1 } else { y };
    let mm = if m <= 2 { m + 9 } else { m - 3 };
    let era = yy.div_euclid(400);
    let yoe = yy - era * 400;
    let doy = (153 * mm + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    Some(era * 146_097 + doe - 719_468)
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + if m <= 2 { 1 } else { 0 };
    (y, m, d)
}
