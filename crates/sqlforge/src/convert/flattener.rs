use crate::error::{OrmError, OrmResult};

/// Packs a list of strings into one string and back.
///
/// Items are joined with `separator`; occurrences of the separator or the
/// escape character inside an item are prefixed with the escape character.
/// Defaults are `,` and `\`.
///
/// An empty list flattens to the empty string, so a list holding a single
/// empty string cannot be represented (it reads back as an empty list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringListFlattener {
    separator: char,
    escape: char,
    convert_empty_to_null: bool,
}

impl Default for StringListFlattener {
    fn default() -> Self {
        Self::new(',', '\\')
    }
}

impl StringListFlattener {
    pub fn new(separator: char, escape: char) -> Self {
        Self {
            separator,
            escape,
            convert_empty_to_null: false,
        }
    }

    /// Treat empty items as `None` when splitting, and `None` items as empty
    /// when joining.
    pub fn convert_empty_to_null(mut self, enabled: bool) -> Self {
        self.convert_empty_to_null = enabled;
        self
    }

    /// Split a flattened string. `None` gives an empty list.
    pub fn split(&self, s: Option<&str>) -> Vec<Option<String>> {
        let mut result = Vec::new();
        let Some(s) = s else {
            return result;
        };

        let mut seen_escape = false;
        let mut seen_separator = false;
        let mut current = String::new();

        for c in s.chars() {
            seen_separator = false;
            if seen_escape {
                if c != self.escape && c != self.separator {
                    current.push(self.escape);
                }
                current.push(c);
                seen_escape = false;
            } else if c == self.escape {
                seen_escape = true;
            } else if c == self.separator {
                result.push(self.finish(std::mem::take(&mut current)));
                seen_separator = true;
            } else {
                current.push(c);
            }
        }

        if seen_escape {
            current.push(self.escape);
        }
        if !current.is_empty() || seen_separator {
            result.push(self.finish(current));
        }
        result
    }

    fn finish(&self, item: String) -> Option<String> {
        if item.is_empty() && self.convert_empty_to_null {
            None
        } else {
            Some(item)
        }
    }

    /// Join items into one string.
    ///
    /// A `None` item is an error unless empty-to-null conversion is enabled.
    pub fn join<S: AsRef<str>>(&self, items: &[Option<S>]) -> OrmResult<String> {
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            let item = match item {
                Some(s) => s.as_ref(),
                None if self.convert_empty_to_null => "",
                None => {
                    return Err(OrmError::conversion(
                        "cannot flatten a null item unless convert_empty_to_null is enabled",
                    ));
                }
            };
            if i > 0 {
                out.push(self.separator);
            }
            self.push_escaped(&mut out, item);
        }
        Ok(out)
    }

    /// Split into plain strings; empty items stay empty.
    pub fn split_strings(&self, s: Option<&str>) -> Vec<String> {
        self.split(s).into_iter().map(Option::unwrap_or_default).collect()
    }

    /// Join plain strings; never fails.
    pub fn join_strings<S: AsRef<str>>(&self, items: &[S]) -> String {
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            self.push_escaped(&mut out, item.as_ref());
        }
        out
    }

    fn push_escaped(&self, out: &mut String, item: &str) {
        for c in item.chars() {
            if c == self.escape || c == self.separator {
                out.push(self.escape);
            }
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn owned(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|s| Some(s.to_string())).collect()
    }

    #[rstest]
    #[case(&[], "")]
    #[case(&["foo"], "foo")]
    #[case(&["foo", "bar"], "foo,bar")]
    #[case(&["foo", "bar", "b\\a,z"], "foo,bar,b\\\\a\\,z")]
    #[case(&["foo", "bar", "b\\a,z", "quux"], "foo,bar,b\\\\a\\,z,quux")]
    #[case(&["", "", ""], ",,")]
    fn equivalent_forms(#[case] items: &[&str], #[case] flattened: &str) {
        let slf = StringListFlattener::default();
        let list = owned(items);
        assert_eq!(slf.join(&list).unwrap(), flattened);
        assert_eq!(slf.split(Some(flattened)), list);
    }

    #[test]
    fn null_input_splits_to_empty_list() {
        assert!(StringListFlattener::default().split(None).is_empty());
    }

    #[test]
    fn null_item_rejected_by_default() {
        let err = StringListFlattener::default()
            .join(&[None::<String>])
            .unwrap_err();
        assert!(matches!(err, OrmError::Conversion(_)));
    }

    #[test]
    fn convert_empty_to_null() {
        let slf = StringListFlattener::default().convert_empty_to_null(true);
        assert!(slf.split(None).is_empty());
        assert_eq!(slf.join::<String>(&[]).unwrap(), "");
        assert!(slf.split(Some("")).is_empty());

        assert_eq!(slf.join(&[None::<String>]).unwrap(), "");
        assert_eq!(slf.join(&[None::<String>, None]).unwrap(), ",");
        assert_eq!(slf.split(Some(",")), vec![None, None]);
    }

    #[test]
    fn lone_escape_is_kept() {
        let slf = StringListFlattener::default();
        assert_eq!(slf.split_strings(Some("a\\")), vec!["a\\"]);
        assert_eq!(slf.split_strings(Some("a\\b")), vec!["a\\b"]);
    }

    #[test]
    fn custom_separator() {
        let slf = StringListFlattener::new('|', '\\');
        assert_eq!(slf.join_strings(&["a|b", "c,d"]), "a\\|b|c,d");
        assert_eq!(slf.split_strings(Some("a\\|b|c,d")), vec!["a|b", "c,d"]);
    }
}
