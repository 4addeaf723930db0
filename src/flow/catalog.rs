//! The assistant's built-in flows

use super::{Completion, FlowData, FlowDefinition, FlowKind, StepSpec, Validator};

const LOCATIONS: &[&str] = &["nairobi", "mombasa", "kisumu", "nakuru"];
const PURPOSES: &[&str] = &["purchase", "loan", "legal", "other"];
const METHODS: &[&str] = &["quick", "detailed"];

const LOCATION_PROMPT: &str = "Enter Location (Nairobi, Mombasa, Kisumu, Nakuru):";

/// Every flow definition, indexed by `FlowKind::index`
#[derive(Debug, Clone)]
pub struct FlowCatalog {
    flows: [FlowDefinition; 5],
}

impl FlowCatalog {
    pub fn standard() -> Self {
        Self {
            flows: [
                registration(),
                verification(),
                deed_search(),
                search(),
                play(),
            ],
        }
    }

    pub fn get(&self, kind: FlowKind) -> &FlowDefinition {
        &self.flows[kind.index()]
    }

    /// Definitions in dispatch priority order
    pub fn iter(&self) -> impl Iterator<Item = &FlowDefinition> {
        self.flows.iter()
    }
}

impl Default for FlowCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn registration() -> FlowDefinition {
    FlowDefinition::new(
        FlowKind::Registration,
        &["register property"],
        vec![
            StepSpec::new(
                "parcel_number",
                "Enter Parcel Number:",
                Validator::Required {
                    reason: "Parcel number is required.",
                },
            ),
            StepSpec::new(
                "title_deed",
                "Enter Title Deed Number:",
                Validator::Required {
                    reason: "Title deed is required.",
                },
            ),
            StepSpec::new(
                "email",
                "Enter Email for Alerts:",
                Validator::Required {
                    reason: "Email is required.",
                },
            ),
            StepSpec::new(
                "phone",
                "Enter Phone for SMS Alerts (optional):",
                Validator::Optional,
            ),
        ],
        "❌ Current Registration session cancelled.",
        |data| {
            Completion::Message(format!(
                "✅ Property registered successfully:\n- Parcel: {}\n- Title: {}\n- Email: {}\n- Phone: {}",
                field(data, "parcel_number"),
                field(data, "title_deed"),
                field(data, "email"),
                field(data, "phone"),
            ))
        },
    )
}

fn verification() -> FlowDefinition {
    FlowDefinition::new(
        FlowKind::Verification,
        &[
            "verify land",
            "land verification",
            "verify",
            "verification",
            "confirm",
            "for sale",
        ],
        vec![
            StepSpec::new(
                "parcel_number",
                "Enter Parcel Number:",
                Validator::Required {
                    reason: "Parcel number is required.",
                },
            ),
            StepSpec::new(
                "owner_name",
                "Enter Owner Name (Optional, press Enter to skip):",
                Validator::Optional,
            ),
            StepSpec::new(
                "location",
                LOCATION_PROMPT,
                Validator::OneOf {
                    choices: LOCATIONS,
                    reason: "Invalid location.",
                },
            ),
            StepSpec::new(
                "verification_method",
                "Choose Verification Method: 'quick' (Free) or 'detailed' (KSH 500):",
                Validator::OneOf {
                    choices: METHODS,
                    reason: "Invalid method.",
                },
            ),
            StepSpec::new(
                "terms",
                "Do you agree to the terms and conditions? (yes/no)",
                Validator::Consent {
                    declined: "You must agree to the terms. Verification canceled.",
                },
            ),
        ],
        "❌ Current verification session cancelled.",
        |data| {
            Completion::Message(format!(
                "✅ Land verification submitted successfully:\n- Parcel: {}\n- Owner: {}\n- Location: {}\n- Method: {}",
                field(data, "parcel_number"),
                field(data, "owner_name"),
                title_case(&field(data, "location")),
                title_case(&field(data, "verification_method")),
            ))
        },
    )
}

fn deed_search() -> FlowDefinition {
    FlowDefinition::new(
        FlowKind::DeedSearch,
        &["deed search"],
        vec![
            StepSpec::new(
                "deed_number",
                "Enter Title Deed Number (e.g., TN12345678):",
                Validator::DeedNumber,
            ),
            StepSpec::new(
                "location",
                LOCATION_PROMPT,
                Validator::OneOf {
                    choices: LOCATIONS,
                    reason: "❌ Invalid location.",
                },
            ),
            StepSpec::new(
                "purpose",
                "Enter Purpose of Search (purchase, loan, legal, other):",
                Validator::OneOf {
                    choices: PURPOSES,
                    reason: "❌ Invalid purpose.",
                },
            ),
        ],
        "❌ Current session cancelled.",
        |data| {
            Completion::Message(format!(
                "✅ Title Deed Search Completed:\n- Number: {}\n- Location: {}\n- Purpose: {}",
                field(data, "deed_number"),
                title_case(&field(data, "location")),
                title_case(&field(data, "purpose")),
            ))
        },
    )
    .ungated()
}

fn search() -> FlowDefinition {
    FlowDefinition::new(
        FlowKind::Search,
        &["search"],
        vec![StepSpec::new(
            "query",
            "🔎 What would you like me to search?",
            Validator::Required {
                reason: "Please type something to search 🙂",
            },
        )],
        "❌ Search cancelled.",
        |data| Completion::Lookup {
            query: field(data, "query"),
        },
    )
}

fn play() -> FlowDefinition {
    const INTRO: &str = "🎵 Please tell me the name of the song to play. Here are some suggestions: Shape of You, Blinding Lights, Levitating, Someone You Loved";

    FlowDefinition::new(
        FlowKind::Play,
        &["play"],
        vec![StepSpec::new(
            "song",
            "Please tell me the name of the song to play.",
            Validator::Any,
        )],
        "❌ Play mode cancelled.",
        |data| Completion::PlaySong {
            song: data.get("song").cloned().flatten().unwrap_or_default(),
        },
    )
    .with_intro(INTRO)
}

/// Stored value, or an em dash for skipped optional steps
fn field(data: &FlowData, key: &str) -> String {
    data.get(key)
        .cloned()
        .flatten()
        .unwrap_or_else(|| "—".to_string())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_in_priority_order() {
        let catalog = FlowCatalog::standard();
        let kinds: Vec<FlowKind> = catalog.iter().map(FlowDefinition::kind).collect();
        assert_eq!(kinds, FlowKind::PRIORITY);
        for kind in FlowKind::PRIORITY {
            assert_eq!(catalog.get(kind).kind(), kind);
        }
    }

    #[test]
    fn test_verification_trigger_synonyms() {
        let catalog = FlowCatalog::standard();
        let verification = catalog.get(FlowKind::Verification);
        for phrase in ["verify land", "VERIFY", " verification ", "confirm", "For Sale"] {
            assert!(verification.admits(phrase), "{phrase}");
        }
        assert!(!verification.admits("register property"));
    }

    #[test]
    fn test_deed_search_is_ungated() {
        let catalog = FlowCatalog::standard();
        let deed = catalog.get(FlowKind::DeedSearch);
        assert!(deed.admits("anything at all"));
        assert!(deed.matches_trigger("Deed Search"));
        assert!(!deed.matches_trigger("anything at all"));
    }

    #[test]
    fn test_play_opens_with_suggestions() {
        let catalog = FlowCatalog::standard();
        let opening = catalog.get(FlowKind::Play).opening();
        for song in ["Shape of You", "Blinding Lights", "Levitating", "Someone You Loved"] {
            assert!(opening.contains(song));
        }
    }

    #[test]
    fn test_registration_completion_marks_missing_phone() {
        let catalog = FlowCatalog::standard();
        let mut data = FlowData::new();
        data.insert("parcel_number", Some("P-001".to_string()));
        data.insert("title_deed", Some("TD-99".to_string()));
        data.insert("email", Some("a@b.com".to_string()));
        data.insert("phone", None);

        let Completion::Message(text) = catalog.get(FlowKind::Registration).finalize(&data) else {
            panic!("registration completes with a message");
        };
        assert!(text.contains("Parcel: P-001"));
        assert!(text.contains("Title: TD-99"));
        assert!(text.contains("Email: a@b.com"));
        assert!(text.contains("Phone: —"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("nairobi"), "Nairobi");
        assert_eq!(title_case(""), "");
    }
}
