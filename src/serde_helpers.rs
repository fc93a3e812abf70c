use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Serde helpers for the ISO 8601 timestamps GitHub returns (e.g. `2024-01-02T10:00:00Z`).
pub mod github_datetime {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, &Rfc3339).map_err(serde::de::Error::custom)
    }

    /// Variant for fields GitHub may send as `null`.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| OffsetDateTime::parse(&raw, &Rfc3339))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use time::macros::datetime;

    #[derive(Deserialize)]
    struct Stamp {
        #[serde(with = "super::github_datetime")]
        at: time::OffsetDateTime,
        #[serde(default, with = "super::github_datetime::option")]
        pushed: Option<time::OffsetDateTime>,
    }

    #[test]
    fn parses_zulu_and_null() {
        let s: Stamp =
            serde_json::from_str(r#"{"at":"2024-01-02T10:00:00Z","pushed":null}"#).unwrap();
        assert_eq!(s.at, datetime!(2024-01-02 10:00 UTC));
        assert!(s.pushed.is_none());
    }

    #[test]
    fn parses_offsets_and_missing_optional() {
        let s: Stamp = serde_json::from_str(r#"{"at":"2024-01-02T10:00:00+02:00"}"#).unwrap();
        assert_eq!(s.at, datetime!(2024-01-02 08:00 UTC));
        assert!(s.pushed.is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Stamp>(r#"{"at":"yesterday"}"#).is_err());
    }
}
