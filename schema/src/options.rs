use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::SchemaError;

lazy_static! {
    static ref MAXLEN_OPTION: Regex = Regex::new(r"^maxlen=(\d+)$").unwrap();
}

/// Per-field modifiers, parsed once from a declaration-time tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    pub ignore:     bool,
    pub omit_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl FieldOptions {
    pub fn max_length(max: u64) -> FieldOptions {
        FieldOptions { max_length: Some(max), ..Default::default() }
    }

    pub fn omit_empty() -> FieldOptions {
        FieldOptions { omit_empty: true, ..Default::default() }
    }

    pub fn ignore() -> FieldOptions {
        FieldOptions { ignore: true, ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == FieldOptions::default()
    }

    /// Parses a tag of the form `-` or `[name][,option]*`, where the name must
    /// be empty and each option is `omitempty` or `maxlen=N`.
    ///
    /// ```
    /// use wirecast_schema::FieldOptions;
    ///
    /// let opts = FieldOptions::parse_tag(",omitempty,maxlen=3").unwrap();
    /// assert!(opts.omit_empty);
    /// assert_eq!(opts.max_length, Some(3));
    /// assert!(FieldOptions::parse_tag("-").unwrap().ignore);
    /// assert!(FieldOptions::parse_tag("-,omitempty").is_err());
    /// ```
    pub fn parse_tag(tag: &str) -> Result<FieldOptions, SchemaError> {
        let invalid = |msg: String| SchemaError::InvalidTag { tag: tag.to_owned(), msg };

        let mut parts = tag.split(',');
        let name = parts.next().unwrap_or("");
        let options: Vec<&str> = parts.collect();

        match name {
            "-" if options.is_empty() => return Ok(FieldOptions::ignore()),
            "-" => return Err(invalid("is ignored with \"-\" but has options".to_owned())),
            "" => {}
            other => {
                return Err(invalid(format!(
                    "invalid tag name {:?} (must be empty or \"-\")",
                    other
                )))
            }
        }

        let mut opts = FieldOptions::default();
        for option in options {
            if option == "omitempty" {
                opts.omit_empty = true;
            } else if let Some(caps) = MAXLEN_OPTION.captures(option) {
                let n: u64 = caps[1]
                    .parse()
                    .map_err(|_| invalid(format!("invalid maxlen option {:?}", option)))?;
                // maxlen=0 leaves the field unbounded
                opts.max_length = if n == 0 { None } else { Some(n) };
            } else if option.starts_with("maxlen=") {
                return Err(invalid(format!("invalid maxlen option {:?}", option)));
            } else {
                return Err(invalid(format!("invalid option {:?}", option)));
            }
        }
        Ok(opts)
    }
}
