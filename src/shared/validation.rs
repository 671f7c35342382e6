use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Externally visible incident reference format: INC-<YYYYMMDD>-<6 chars>
    /// - Valid: "INC-20240301-A1B2C3", "INC-20251231-000000"
    /// - Invalid: "INC-2024031-A1B2C3", "INC-20240301-a1b2c3", "RPT-20240301-A1B2C3"
    pub static ref INCIDENT_ID_REGEX: Regex =
        Regex::new(r"^INC-\d{8}-[A-Z0-9]{6}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_id_regex_valid() {
        assert!(INCIDENT_ID_REGEX.is_match("INC-20240301-A1B2C3"));
        assert!(INCIDENT_ID_REGEX.is_match("INC-20251231-000000"));
        assert!(INCIDENT_ID_REGEX.is_match("INC-19990101-ZZZZZZ"));
    }

    #[test]
    fn test_incident_id_regex_invalid() {
        assert!(!INCIDENT_ID_REGEX.is_match("INC-2024031-A1B2C3")); // 7-digit date
        assert!(!INCIDENT_ID_REGEX.is_match("INC-20240301-a1b2c3")); // lowercase suffix
        assert!(!INCIDENT_ID_REGEX.is_match("INC-20240301-A1B2C")); // short suffix
        assert!(!INCIDENT_ID_REGEX.is_match("INC-20240301-A1B2C34")); // long suffix
        assert!(!INCIDENT_ID_REGEX.is_match("RPT-20240301-A1B2C3")); // wrong prefix
        assert!(!INCIDENT_ID_REGEX.is_match("")); // empty
    }
}
