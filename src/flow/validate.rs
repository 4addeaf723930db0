//! Step input validators

/// `^TN[0-9]{8}$`
fn is_deed_number(candidate: &str) -> bool {
    candidate
        .strip_prefix("TN")
        .is_some_and(|digits| digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Outcome of validating one step's raw input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Store the value and move on. `None` marks a skipped optional step.
    Accept(Option<String>),
    /// Re-prompt the same step with this reason
    Reject(String),
    /// End the flow with this message
    Abort(String),
}

/// Validation rule attached to a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Anything goes, stored trimmed
    Any,
    /// Blank input is stored as absent
    Optional,
    /// Non-empty after trimming
    Required { reason: &'static str },
    /// One of a fixed, lower-case choice list
    OneOf {
        choices: &'static [&'static str],
        reason: &'static str,
    },
    /// "TN" followed by exactly eight digits; stored upper-cased
    DeedNumber,
    /// Must agree; anything else ends the flow
    Consent { declined: &'static str },
}

impl Validator {
    pub fn check(&self, raw: &str) -> Verdict {
        let input = raw.trim();
        match self {
            Validator::Any => Verdict::Accept(Some(input.to_string())),
            Validator::Optional => {
                Verdict::Accept((!input.is_empty()).then(|| input.to_string()))
            }
            Validator::Required { reason } => {
                if input.is_empty() {
                    Verdict::Reject((*reason).to_string())
                } else {
                    Verdict::Accept(Some(input.to_string()))
                }
            }
            Validator::OneOf { choices, reason } => {
                let choice = input.to_lowercase();
                if choices.contains(&choice.as_str()) {
                    Verdict::Accept(Some(choice))
                } else {
                    Verdict::Reject(format!("{reason} Choose from: {}.", choices.join(", ")))
                }
            }
            Validator::DeedNumber => {
                let number = input.to_uppercase();
                if is_deed_number(&number) {
                    Verdict::Accept(Some(number))
                } else {
                    Verdict::Reject("❌ Invalid Title Deed Number. Format: TN12345678.".to_string())
                }
            }
            Validator::Consent { declined } => match input.to_lowercase().as_str() {
                "yes" | "y" => Verdict::Accept(Some("yes".to_string())),
                _ => Verdict::Abort((*declined).to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: &[&str] = &["nairobi", "mombasa"];

    #[test]
    fn test_deed_number_accepts_lowercase_prefix() {
        assert_eq!(
            Validator::DeedNumber.check("tn12345678"),
            Verdict::Accept(Some("TN12345678".to_string()))
        );
        assert_eq!(
            Validator::DeedNumber.check("  TN00000000 "),
            Verdict::Accept(Some("TN00000000".to_string()))
        );
    }

    #[test]
    fn test_deed_number_rejects_malformed() {
        for bad in ["TN123", "AB12345678", "tn12345678x", "TN1234567a", "TN123456789", ""] {
            assert!(
                matches!(Validator::DeedNumber.check(bad), Verdict::Reject(_)),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_one_of_normalizes_case() {
        let v = Validator::OneOf {
            choices: LOCATIONS,
            reason: "❌ Invalid location.",
        };
        assert_eq!(v.check(" Nairobi "), Verdict::Accept(Some("nairobi".to_string())));
        assert_eq!(
            v.check("maybe"),
            Verdict::Reject("❌ Invalid location. Choose from: nairobi, mombasa.".to_string())
        );
    }

    #[test]
    fn test_required_rejects_blank() {
        let v = Validator::Required {
            reason: "Email is required.",
        };
        assert_eq!(v.check("   "), Verdict::Reject("Email is required.".to_string()));
        assert_eq!(v.check(" a@b.com"), Verdict::Accept(Some("a@b.com".to_string())));
    }

    #[test]
    fn test_optional_blank_is_absent() {
        assert_eq!(Validator::Optional.check(""), Verdict::Accept(None));
        assert_eq!(
            Validator::Optional.check(" 0700 "),
            Verdict::Accept(Some("0700".to_string()))
        );
    }

    #[test]
    fn test_consent_aborts_on_anything_but_yes() {
        let v = Validator::Consent { declined: "nope" };
        assert_eq!(v.check("Y"), Verdict::Accept(Some("yes".to_string())));
        assert_eq!(v.check("yes"), Verdict::Accept(Some("yes".to_string())));
        assert_eq!(v.check("no"), Verdict::Abort("nope".to_string()));
        assert_eq!(v.check("maybe"), Verdict::Abort("nope".to_string()));
    }
}
