use super::Converter;
use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date-time fields stored as timestamps, normalized to UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampConverter;

impl Converter<DateTime<Utc>> for TimestampConverter {
    fn to_storage(&self, value: &DateTime<Utc>) -> OrmResult<Value> {
        Ok(Value::Timestamp(*value))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<DateTime<Utc>> {
        DateTime::<Utc>::from_value(value).map_err(|m| OrmError::decode(column, m))
    }
}

impl Converter<NaiveDateTime> for TimestampConverter {
    fn to_storage(&self, value: &NaiveDateTime) -> OrmResult<Value> {
        Ok(Value::Timestamp(value.and_utc()))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<NaiveDateTime> {
        NaiveDateTime::from_value(value).map_err(|m| OrmError::decode(column, m))
    }
}

/// Calendar dates. A timestamp column read into a date field keeps its UTC date.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl Converter<NaiveDate> for DateConverter {
    fn to_storage(&self, value: &NaiveDate) -> OrmResult<Value> {
        Ok(Value::Date(*value))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<NaiveDate> {
        NaiveDate::from_value(value).map_err(|m| OrmError::decode(column, m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn offsets_normalize_to_utc() {
        let local = FixedOffset::east_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .unwrap();
        let utc = local.with_timezone(&Utc);
        let stored = TimestampConverter.to_storage(&utc).unwrap();
        assert_eq!(
            stored,
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap())
        );
    }

    #[test]
    fn naive_round_trip_and_date_from_timestamp() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let stored = Converter::<NaiveDateTime>::to_storage(&TimestampConverter, &naive).unwrap();
        let back: NaiveDateTime = TimestampConverter.from_value(&stored, "at").unwrap();
        assert_eq!(back, naive);

        let date = DateConverter.from_value(&stored, "day").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(DateConverter.from_value(&Value::Null, "day").is_err());
    }
}
