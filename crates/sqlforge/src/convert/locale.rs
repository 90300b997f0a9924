use super::Converter;
use super::string::text_or_null;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language tag in `lang_COUNTRY_variant` form, e.g. `en`, `fr_CA`,
/// `es_ES_Traditional`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// Language is lower-cased, country upper-cased.
    pub fn new(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            country: country.to_uppercase(),
            variant: variant.to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '_');
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default();
        Ok(Locale::new(language, country, variant))
    }
}

/// [`Locale`] fields stored as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleConverter;

impl Converter<Locale> for LocaleConverter {
    fn to_storage(&self, value: &Locale) -> OrmResult<Value> {
        Ok(Value::Text(value.to_string()))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<Locale> {
        let s = text_or_null(value, column)?
            .ok_or_else(|| OrmError::decode(column, "unexpected null"))?;
        let Ok(locale) = s.parse::<Locale>();
        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", Locale::new("en", "", ""))]
    #[case("fr_CA", Locale::new("fr", "CA", ""))]
    #[case("es_ES_Traditional_WIN", Locale::new("es", "ES", "Traditional_WIN"))]
    #[case("de__POSIX", Locale::new("de", "", "POSIX"))]
    fn converts_both_ways(#[case] stored: &str, #[case] locale: Locale) {
        let conv = LocaleConverter;
        assert_eq!(conv.from_value(&Value::from(stored), "locale").unwrap(), locale);
        assert_eq!(conv.to_storage(&locale).unwrap(), Value::from(stored));
    }

    #[test]
    fn case_is_normalized() {
        assert_eq!(Locale::new("EN", "us", "").to_string(), "en_US");
    }
}
