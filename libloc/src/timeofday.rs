//! A time-of-day value as stored alongside each location

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    Decode, Encode, Sqlite, Type,
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
};
use std::{borrow::Cow, fmt, str::FromStr};
use time::{Time, format_description::FormatItem, macros::format_description};

const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// A wall-clock time of day with no date and no timezone, always represented
/// as `HH:MM:SS` with two-digit zero-padded groups.
///
/// It is stored in the database as TEXT in that canonical form rather than
/// through the driver's native time support, so that SQL range comparisons on
/// the column compare equal strings at the interval endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(Time);

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Time::parse(s, &TIME_FORMAT)
            .map(TimeOfDay)
            .map_err(|_| Error::InvalidTimeFormat(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self.0.format(&TIME_FORMAT).map_err(|_| fmt::Error)?;
        write!(f, "{s}")
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Type<Sqlite> for TimeOfDay {
    fn type_info() -> SqliteTypeInfo {
        <&str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <&str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for TimeOfDay {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        buf.push(SqliteArgumentValue::Text(Cow::Owned(self.to_string())));
        Ok(IsNull::No)
    }
}

impl<'r> Decode<'r, Sqlite> for TimeOfDay {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(s.parse::<TimeOfDay>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let t: TimeOfDay = "08:30:59".parse().expect("failed to parse");
        assert_eq!(t.to_string(), "08:30:59");
        assert_eq!("00:00:00".parse::<TimeOfDay>().unwrap().to_string(), "00:00:00");
        assert_eq!("23:59:59".parse::<TimeOfDay>().unwrap().to_string(), "23:59:59");
    }

    #[test]
    fn parse_rejects_deviations() {
        for bad in [
            "", "8:00:00", "08:00", "08:00:00:00", "24:00:00", "08:60:00", "08:00:61",
            "08-00-00", "08:00:00 ", " 08:00:00", "ab:cd:ef",
        ] {
            assert!(
                bad.parse::<TimeOfDay>().is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn ordering() {
        let early: TimeOfDay = "07:00:00".parse().unwrap();
        let late: TimeOfDay = "19:30:00".parse().unwrap();
        assert!(early < late);
        assert_eq!(early, "07:00:00".parse().unwrap());
    }

    #[test]
    fn serde_as_string() {
        let t: TimeOfDay = "12:00:00".parse().unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), r#""12:00:00""#);
        let back: TimeOfDay = serde_json::from_str(r#""12:00:00""#).unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>(r#""noonish""#).is_err());
    }
}
