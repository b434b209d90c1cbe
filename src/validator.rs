//! Data-URI validation, server-side and client-side.
//!
//! One grammar definition covers both sides:
//! `data:<mediatype>[;charset=<charset>][;base64],<payload>`, expressed as
//! the pattern constant [`DATA_URI_PATTERN`], matched case-insensitively
//! against the full string. The server check compiles it once; the client
//! check embeds the identical pattern source in a script fragment, so both
//! accept and reject the same strings.
//!
//! The payload group requires at least one character, so `data:,` is
//! rejected.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::form::{FormModel, ValidationErrors};
use crate::html;

/// The data-URI grammar. Groups: media type (non-greedy), optional charset,
/// optional base64 marker, payload (one-or-more characters).
pub const DATA_URI_PATTERN: &str = r"data:(.*?)(?:;charset=(.*?))?(;base64)?,(.+)";

static DATA_URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i)^{DATA_URI_PATTERN}$")).expect("data URI pattern compiles")
});

/// Validates that a string is a well-formed data URI.
///
/// Failures are recorded against the attribute in [`ValidationErrors`]; the
/// `{attribute}` placeholder in the message is substituted with the display
/// label at failure time, never at configuration time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataUriValidator {
    /// Error message template. `{attribute}` is replaced with the field's
    /// display label.
    pub message: String,
}

impl Default for DataUriValidator {
    fn default() -> Self {
        Self {
            message: "{attribute} is not a valid data URI.".to_string(),
        }
    }
}

impl DataUriValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Whether `value` matches the data-URI grammar.
    pub fn is_valid(&self, value: &str) -> bool {
        DATA_URI_RE.is_match(value)
    }

    /// One-shot check returning the rendered message on failure.
    pub fn validate_value(&self, value: &str, label: &str) -> Result<(), String> {
        if self.is_valid(value) {
            Ok(())
        } else {
            Err(self.render_message(label))
        }
    }

    /// Check a model attribute, recording a failure instead of returning it.
    ///
    /// A missing value is treated as the empty string, which the grammar
    /// rejects.
    pub fn validate_attribute(
        &self,
        model: &dyn FormModel,
        attribute: &str,
        errors: &mut ValidationErrors,
    ) {
        let value = model.value(attribute).unwrap_or_default();
        if !self.is_valid(&value) {
            errors.add(attribute, self.render_message(&model.label(attribute)));
        }
    }

    /// Script fragment for client-side pre-submit validation.
    ///
    /// Expects `value` and `messages` in scope, mirroring the server check:
    /// same pattern source, same case-insensitivity.
    pub fn client_script(&self, label: &str) -> String {
        format!(
            "if (!new RegExp({pattern}, 'i').test(value)) {{ messages.push({message}); }}",
            pattern = html::js_string(&format!("^{DATA_URI_PATTERN}$")),
            message = html::js_string(&self.render_message(label)),
        )
    }

    fn render_message(&self, label: &str) -> String {
        self.message.replace("{attribute}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_base64_with_charset() {
        let validator = DataUriValidator::new();
        assert!(validator.is_valid("data:text/plain;charset=utf-8;base64,SGVsbG8="));
    }

    #[test]
    fn accepts_plain_payload() {
        let validator = DataUriValidator::new();
        assert!(validator.is_valid("data:image/png,rawbytes"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let validator = DataUriValidator::new();
        assert!(validator.is_valid("DATA:image/png;BASE64,abc"));
    }

    #[test]
    fn rejects_non_uris() {
        let validator = DataUriValidator::new();
        assert!(!validator.is_valid("not-a-uri"));
        assert!(!validator.is_valid(""));
    }

    #[test]
    fn rejects_empty_payload() {
        let validator = DataUriValidator::new();
        assert!(!validator.is_valid("data:,"));
        assert!(!validator.is_valid("data:image/png;base64,"));
    }

    #[test]
    fn rejects_surrounding_text() {
        let validator = DataUriValidator::new();
        assert!(!validator.is_valid("xxdata:image/png,abc"));
        assert!(!validator.is_valid("data:image/png,abc\nmore"));
    }

    #[test]
    fn message_renders_label_at_failure_time() {
        let validator = DataUriValidator::new();
        let err = validator.validate_value("nope", "Avatar").unwrap_err();
        assert_eq!(err, "Avatar is not a valid data URI.");
    }

    #[test]
    fn custom_message_template() {
        let validator = DataUriValidator::with_message("{attribute}: bad crop data");
        let err = validator.validate_value("nope", "Banner").unwrap_err();
        assert_eq!(err, "Banner: bad crop data");
    }

    #[test]
    fn validate_attribute_records_error() {
        struct Profile;
        impl FormModel for Profile {
            fn form_name(&self) -> &str {
                "Profile"
            }
            fn value(&self, _attribute: &str) -> Option<String> {
                Some("not-a-uri".to_string())
            }
        }

        let validator = DataUriValidator::new();
        let mut errors = ValidationErrors::new();
        validator.validate_attribute(&Profile, "avatar_crop", &mut errors);
        assert_eq!(
            errors.attribute("avatar_crop"),
            ["Avatar Crop is not a valid data URI."]
        );
    }

    #[test]
    fn validate_attribute_passes_valid_value() {
        struct Profile;
        impl FormModel for Profile {
            fn form_name(&self) -> &str {
                "Profile"
            }
            fn value(&self, _attribute: &str) -> Option<String> {
                Some("data:image/png;base64,abc".to_string())
            }
        }

        let validator = DataUriValidator::new();
        let mut errors = ValidationErrors::new();
        validator.validate_attribute(&Profile, "avatar_crop", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn client_script_embeds_pattern_and_message() {
        let validator = DataUriValidator::new();
        let script = validator.client_script("Avatar");
        assert!(script.contains(DATA_URI_PATTERN));
        assert!(script.contains("'i'"));
        assert!(script.contains("Avatar is not a valid data URI."));
    }

    /// Independent recognizer for the grammar: the string decomposes as
    /// `data:` (case-insensitive), some newline-free prefix, a comma, and a
    /// non-empty newline-free payload.
    fn reference_accepts(s: &str) -> bool {
        let Some(scheme) = s.get(..5) else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case("data:") {
            return false;
        }
        let rest = &s[5..];
        rest.char_indices().any(|(i, c)| {
            c == ','
                && !rest[i + 1..].is_empty()
                && !rest[..i].contains('\n')
                && !rest[i + 1..].contains('\n')
        })
    }

    proptest! {
        // Server regex and the independent recognizer agree on arbitrary
        // printable-ASCII strings (plus newlines), the same agreement the
        // client-side fragment inherits by embedding the identical pattern.
        #[test]
        fn regex_agrees_with_reference(s in "[ -~\n]{0,40}") {
            let validator = DataUriValidator::new();
            prop_assert_eq!(validator.is_valid(&s), reference_accepts(&s));
        }

        #[test]
        fn regex_agrees_on_data_shaped_strings(
            media in "[a-z/+.;=-]{0,12}",
            payload in "[ -~]{0,12}",
        ) {
            let s = format!("data:{media},{payload}");
            let validator = DataUriValidator::new();
            prop_assert_eq!(validator.is_valid(&s), reference_accepts(&s));
        }
    }
}
