//! Log Record Codec
//!
//! One record per line, fields separated by commas. No escaping is
//! defined, so keys and values must never contain a comma or newline;
//! the facade rejects them before a record is ever built.

// == Record ==
/// A mutation accepted by the local cache, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A key was stored
    Put { key: String, value: String },
    /// A key was removed
    Del { key: String },
}

impl Record {
    // == Encode ==
    /// Renders the record as a log line, without the trailing newline.
    pub fn encode(&self) -> String {
        match self {
            Record::Put { key, value } => format!("PUT,{},{}", key, value),
            Record::Del { key } => format!("DEL,{}", key),
        }
    }

    // == Parse ==
    /// Parses a log line. Returns None for anything malformed: unknown
    /// tag, wrong field count, empty line, or empty key.
    pub fn parse(line: &str) -> Option<Record> {
        let parts: Vec<&str> = line.split(',').collect();
        match parts.as_slice() {
            ["PUT", key, value] if !key.is_empty() => Some(Record::Put {
                key: (*key).to_string(),
                value: (*value).to_string(),
            }),
            ["DEL", key] if !key.is_empty() => Some(Record::Del {
                key: (*key).to_string(),
            }),
            _ => None,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_put() {
        let record = Record::Put {
            key: "fruit".to_string(),
            value: "apple".to_string(),
        };
        assert_eq!(record.encode(), "PUT,fruit,apple");
    }

    #[test]
    fn test_encode_del() {
        let record = Record::Del {
            key: "fruit".to_string(),
        };
        assert_eq!(record.encode(), "DEL,fruit");
    }

    #[test]
    fn test_parse_put() {
        assert_eq!(
            Record::parse("PUT,fruit,apple"),
            Some(Record::Put {
                key: "fruit".to_string(),
                value: "apple".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_put_empty_value() {
        // Values may be empty; keys may not.
        assert_eq!(
            Record::parse("PUT,fruit,"),
            Some(Record::Put {
                key: "fruit".to_string(),
                value: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_del() {
        assert_eq!(
            Record::parse("DEL,fruit"),
            Some(Record::Del {
                key: "fruit".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Record::parse(""), None);
        assert_eq!(Record::parse("PUT"), None);
        assert_eq!(Record::parse("PUT,key"), None);
        assert_eq!(Record::parse("DEL,key,extra"), None);
        assert_eq!(Record::parse("EXPIRE,key"), None);
        assert_eq!(Record::parse("put,key,value"), None);
        assert_eq!(Record::parse("PUT,,value"), None);
        assert_eq!(Record::parse("DEL,"), None);
    }

    #[test]
    fn test_roundtrip() {
        for record in [
            Record::Put {
                key: "k".to_string(),
                value: "v".to_string(),
            },
            Record::Del {
                key: "k".to_string(),
            },
        ] {
            assert_eq!(Record::parse(&record.encode()), Some(record));
        }
    }
}
