//! File-name date matchers.
//!
//! Every supported naming convention is described by a [`MatcherDefinition`]: a set
//! of regular expressions recognising the name, plus a pure function pulling the
//! capture date back out of it. A [`Registry`] holds the definitions in priority
//! order and the first definition that recognises a name decides its folder.
//!
//! # Examples
//!
//! ```
//! use datetidy::matcher::classify;
//!
//! assert_eq!(classify("IMG_20210222_213525.jpg").unwrap(), "2021-02-22");
//! assert!(classify("notes.txt").is_err());
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Error returned when no matcher recognises a file name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("no matcher found for {0:?}")]
    NotRecognized(String),
}

/// Date encoded in a file name, zero-padded as it appears in the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDate {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl CaptureDate {
    /// Returns the `YYYY-MM-DD` folder name for this date.
    pub fn folder_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// Pulls the date out of a name already accepted by the matcher's rules.
pub type DateExtractor = fn(&str) -> Option<CaptureDate>;

/// One recognised file-naming convention.
pub struct MatcherDefinition {
    name: &'static str,
    rules: Vec<Regex>,
    extract: DateExtractor,
}

impl MatcherDefinition {
    /// Builds a definition from regular expression sources.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails to compile.
    pub fn new(
        name: &'static str,
        rules: &[&str],
        extract: DateExtractor,
    ) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| Regex::new(rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            rules,
            extract,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if any of the rules accepts `file_name`.
    pub fn matches(&self, file_name: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(file_name))
    }

    /// Extracts the capture date. Only meaningful for names where
    /// [`matches`](Self::matches) returned true.
    pub fn extract(&self, file_name: &str) -> Option<CaptureDate> {
        (self.extract)(file_name)
    }
}

impl fmt::Debug for MatcherDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherDefinition")
            .field("name", &self.name)
            .field(
                "rules",
                &self.rules.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Ordered matcher definitions, resolved first-match-wins.
#[derive(Debug)]
pub struct Registry {
    matchers: Vec<MatcherDefinition>,
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(Registry::builtin);

impl Registry {
    pub fn new(matchers: Vec<MatcherDefinition>) -> Self {
        Self { matchers }
    }

    /// The process-wide registry of built-in conventions.
    pub fn global() -> &'static Registry {
        &BUILTIN
    }

    /// Builds the built-in conventions in priority order.
    pub fn builtin() -> Self {
        let matchers = vec![
            // IMG_YYYYMMDD_*.jpg, VID_YYYYMMDD_*.mp4, PXL_YYYYMMDD_*.{jpg,mp4}
            MatcherDefinition::new(
                "camera",
                &[
                    r"IMG_[0-9]{8}_.+jpg$",
                    r"VID_[0-9]{8}_.+mp4$",
                    r"PXL_[0-9]{8}_.+jpg$",
                    r"PXL_[0-9]{8}_.+mp4$",
                ],
                |name| compact_date(underscore_field(name, 1)?),
            ),
            // C360_YYYY-MM-DD-hh-mm-ss-mmm.jpg
            MatcherDefinition::new(
                "c360",
                &[r"^C360_[0-9]{4}-[0-9]{2}-[0-9]{2}-[0-9]{2}-[0-9]{2}-[0-9]{2}-[0-9]{3}\.jpg$"],
                |name| hyphenated_date(underscore_field(name, 1)?),
            ),
            // YYYYMMDD_*.jpg, YYYYMMDD_*.mp4
            MatcherDefinition::new(
                "date-prefix",
                &[r"^[0-9]{8}_.+jpg$", r"^[0-9]{8}_.+mp4$"],
                |name| compact_date(underscore_field(name, 0)?),
            ),
            MatcherDefinition::new(
                "screenshot",
                &[r"^Screenshot_[0-9]{8}_.+jpg$"],
                |name| compact_date(underscore_field(name, 1)?),
            ),
        ];

        Self::new(
            matchers
                .into_iter()
                .collect::<Result<Vec<_>, _>>()
                .expect("built-in matcher patterns must compile"),
        )
    }

    pub fn matchers(&self) -> &[MatcherDefinition] {
        &self.matchers
    }

    /// Returns the first definition recognising `file_name`.
    pub fn matcher_for(&self, file_name: &str) -> Option<&MatcherDefinition> {
        self.matchers.iter().find(|m| m.matches(file_name))
    }

    /// Returns the winning definition together with the extracted date.
    pub fn capture_date(
        &self,
        file_name: &str,
    ) -> Result<(&MatcherDefinition, CaptureDate), ClassifyError> {
        self.matcher_for(file_name)
            .and_then(|matcher| Some((matcher, matcher.extract(file_name)?)))
            .ok_or_else(|| ClassifyError::NotRecognized(file_name.to_string()))
    }

    /// Returns the `YYYY-MM-DD` folder a file with this name belongs in.
    pub fn classify(&self, file_name: &str) -> Result<String, ClassifyError> {
        self.capture_date(file_name)
            .map(|(_, date)| date.folder_name())
    }
}

/// Classifies `file_name` against the built-in registry.
pub fn classify(file_name: &str) -> Result<String, ClassifyError> {
    Registry::global().classify(file_name)
}

fn underscore_field(file_name: &str, index: usize) -> Option<&str> {
    file_name.split('_').nth(index)
}

/// `YYYYMMDD`
fn compact_date(field: &str) -> Option<CaptureDate> {
    if field.len() != 8 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(CaptureDate {
        year: field[..4].to_string(),
        month: field[4..6].to_string(),
        day: field[6..].to_string(),
    })
}

/// `YYYY-MM-DD-...`
fn hyphenated_date(field: &str) -> Option<CaptureDate> {
    let mut parts = field.split('-');

    Some(CaptureDate {
        year: parts.next()?.to_string(),
        month: parts.next()?.to_string(),
        day: parts.next()?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_names() {
        let cases = [
            ("IMG_20210222_213525.jpg", "2021-02-22"),
            ("VID_20201012_124124.mp4", "2020-10-12"),
            ("VID_20201012_124124_325_someextrastuff.mp4", "2020-10-12"),
            ("PXL_20210123_124124.mp4", "2021-01-23"),
            ("PXL_19891211_124124.jpg", "1989-12-11"),
            ("C360_2019-07-17-04-02-45-169.jpg", "2019-07-17"),
            ("20170402_1979.jpg", "2017-04-02"),
            ("20181030_1985.mp4", "2018-10-30"),
            ("Screenshot_20200101_foo.jpg", "2020-01-01"),
            ("xIMG_20210222_1.jpg", "2021-02-22"),
            ("IMG_20210222_1xjpg", "2021-02-22"),
            (".IMG_20210222_213525.jpg", "2021-02-22"),
        ];

        for (file_name, expected) in cases {
            assert_eq!(
                classify(file_name).as_deref(),
                Ok(expected),
                "file name: {file_name}"
            );
        }
    }

    #[test]
    fn test_classify_rejects_unknown_names() {
        for file_name in [
            "1234",
            "C360_2019-07-17-04-02-45-169-12.jpg",
            "C360_2019-07-17-169.jpg",
            "IMG_2021022_213525.jpg",
            "img_20210222_213525.jpg",
            "IMG_20210222_213525.png",
            "VID_20201012_124124.jpg",
            "Screenshot_20200101_foo.png",
            "x20170402_1979.jpg",
            "a_IMG_20210222_1.jpg",
            "C360_2019-07-17-04-02-45-169.jpg.bak",
            "",
        ] {
            assert_eq!(
                classify(file_name),
                Err(ClassifyError::NotRecognized(file_name.to_string())),
                "file name: {file_name}"
            );
        }
    }

    #[test]
    fn test_camera_prefix_regroups_all_eight_digits() {
        for prefix in ["IMG", "PXL"] {
            for digits in ["00000101", "19991231", "20240229", "12345678"] {
                let name = format!("{prefix}_{digits}_1.jpg");
                let expected = format!("{}-{}-{}", &digits[..4], &digits[4..6], &digits[6..]);
                assert_eq!(classify(&name).unwrap(), expected);
            }
        }
        for prefix in ["VID", "PXL"] {
            let name = format!("{prefix}_20230704_000001.mp4");
            assert_eq!(classify(&name).unwrap(), "2023-07-04");
        }
    }

    #[test]
    fn test_c360_requires_every_field() {
        let registry = Registry::global();
        assert!(registry.matcher_for("C360_2019-07-17-04-02-45-16.jpg").is_none());
        assert!(registry.matcher_for("c360_2019-07-17-04-02-45-169.jpg").is_none());
        assert!(registry.matcher_for("IMG_C360_2019-07-17-04-02-45-169.jpg").is_none());
        assert_eq!(
            registry
                .matcher_for("C360_2019-07-17-04-02-45-169.jpg")
                .map(MatcherDefinition::name),
            Some("c360")
        );
    }

    #[test]
    fn test_camera_match_with_bad_date_field_does_not_fall_through() {
        let registry = Registry::global();
        let name = "a_IMG_20210222_1.jpg";

        assert_eq!(registry.matcher_for(name).map(MatcherDefinition::name), Some("camera"));
        assert_eq!(
            registry.classify(name),
            Err(ClassifyError::NotRecognized(name.to_string()))
        );
    }

    #[test]
    fn test_matcher_names_follow_priority_order() {
        let names: Vec<_> = Registry::global()
            .matchers()
            .iter()
            .map(MatcherDefinition::name)
            .collect();
        assert_eq!(names, ["camera", "c360", "date-prefix", "screenshot"]);
    }

    #[test]
    fn test_first_match_wins() {
        let registry = Registry::new(vec![
            MatcherDefinition::new("first", &[r"^[0-9]{8}_"], |_| {
                Some(CaptureDate {
                    year: "1111".into(),
                    month: "11".into(),
                    day: "11".into(),
                })
            })
            .unwrap(),
            MatcherDefinition::new("second", &[r"^[0-9]{8}_.+jpg$"], |_| {
                Some(CaptureDate {
                    year: "2222".into(),
                    month: "02".into(),
                    day: "22".into(),
                })
            })
            .unwrap(),
        ]);

        assert_eq!(registry.classify("20170402_1979.jpg").unwrap(), "1111-11-11");
        assert_eq!(
            registry.matcher_for("20170402_1979.jpg").unwrap().name(),
            "first"
        );
    }

    #[test]
    fn test_any_rule_in_definition_matches() {
        let matcher = MatcherDefinition::new("either", &["^a", "b$"], |_| None).unwrap();
        assert!(matcher.matches("abc"));
        assert!(matcher.matches("cab"));
        assert!(!matcher.matches("cba"));
    }

    #[test]
    fn test_extraction_failure_is_not_recognized() {
        let registry = Registry::new(vec![
            MatcherDefinition::new("greedy", &["jpg$"], |_| None).unwrap(),
        ]);
        assert!(registry.classify("photo.jpg").is_err());
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        assert!(MatcherDefinition::new("broken", &["[unclosed"], |_| None).is_err());
    }

    #[test]
    fn test_capture_date_display() {
        let date = CaptureDate {
            year: "2021".into(),
            month: "02".into(),
            day: "22".into(),
        };
        assert_eq!(date.folder_name(), "2021-02-22");
    }
}
