use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::ProfileError;
use crate::profile::fields::ProfileField;
use crate::profile::models::Profile;

/// Session-scoped holder of the applicant profile and its edit state.
///
/// Mutation is only accepted while an edit session is open. The store keeps
/// the record as it was when editing began so callers can tell whether the
/// session changed anything.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profile: Profile,
    /// Snapshot taken by `begin_edit`; `Some` exactly while editing.
    editing_from: Option<Profile>,
}

impl ProfileStore {
    /// A profile with every field at its default.
    pub fn initialize() -> Profile {
        Profile::default()
    }

    /// Overlays a fetched JSON object onto the defaults.
    ///
    /// Every schema field is present in the result. Keys outside the schema are
    /// ignored, and a value that does not fit its field keeps the default.
    pub fn merge(fetched: &Map<String, Value>) -> Profile {
        let mut profile = Self::initialize();

        for (key, value) in fetched {
            let field = match key.parse::<ProfileField>() {
                Ok(field) => field,
                Err(_) => {
                    debug!("Ignoring unknown profile key '{key}'");
                    continue;
                }
            };

            let Some(raw) = json_text(field, value) else {
                if !value.is_null() {
                    warn!("Ignoring non-scalar value for profile field {field}");
                }
                continue;
            };

            if let Err(e) = profile.set(field, &raw) {
                warn!("Keeping default for fetched profile field: {e}");
            }
        }

        profile
    }

    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            editing_from: None,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn is_editing(&self) -> bool {
        self.editing_from.is_some()
    }

    /// True when the open edit session has changed at least one field.
    pub fn is_dirty(&self) -> bool {
        self.editing_from
            .as_ref()
            .is_some_and(|original| *original != self.profile)
    }

    /// Opens an edit session. Opening one that is already open is a no-op.
    pub fn begin_edit(&mut self) {
        if self.editing_from.is_none() {
            self.editing_from = Some(self.profile.clone());
        }
    }

    /// Updates exactly one field. Rejected outside an edit session.
    pub fn set_field(&mut self, field: ProfileField, raw: &str) -> Result<(), ProfileError> {
        if !self.is_editing() {
            return Err(ProfileError::NotEditing);
        }
        self.profile.set(field, raw)
    }

    /// Same as [`set_field`](Self::set_field) for a field addressed by its JSON key.
    pub fn set_field_by_name(&mut self, name: &str, raw: &str) -> Result<(), ProfileError> {
        let field = name.parse::<ProfileField>()?;
        self.set_field(field, raw)
    }

    /// Closes the edit session and returns the full record to persist.
    /// Edited values stay in memory whatever happens to the save.
    pub fn end_edit(&mut self) -> Result<Profile, ProfileError> {
        if self.editing_from.take().is_none() {
            return Err(ProfileError::NotEditing);
        }
        Ok(self.profile.clone())
    }
}

/// Text form of a scalar JSON value, as a form input would carry it.
///
/// Ratings stored as whole-number floats (`4.0`) read as their integer text.
fn json_text(field: ProfileField, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if field.is_rating() && n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&f) => {
                Some((f as u8).to_string())
            }
            _ => Some(n.to_string()),
        },
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{Degree, Rating};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn as_map(profile: &Profile) -> Map<String, Value> {
        object(serde_json::to_value(profile).unwrap())
    }

    #[test]
    fn test_merge_empty_object_returns_defaults() {
        assert_eq!(ProfileStore::merge(&Map::new()), ProfileStore::initialize());
    }

    #[test]
    fn test_merge_single_key_keeps_other_defaults() {
        let merged = ProfileStore::merge(&object(json!({ "firstName": "Asha" })));
        assert_eq!(merged.first_name, "Asha");

        let merged = as_map(&merged);
        let defaults = as_map(&ProfileStore::initialize());
        for field in ProfileField::ALL {
            let key = field.key();
            assert!(merged.contains_key(key), "missing {key}");
            if field != ProfileField::FirstName {
                assert_eq!(merged[key], defaults[key], "{key} changed");
            }
        }
        assert_eq!(merged["cgpa"], json!(""));
        assert_eq!(merged["codechefRating"], json!(0));
    }

    #[test]
    fn test_merge_fetched_values_take_precedence() {
        let merged = ProfileStore::merge(&object(json!({
            "email": "asha@example.com",
            "degree": "BE",
            "codechefRating": 6,
            "hackerrankRating": "2",
            "cgpa": "8.9",
            "leetcodeproblemcount": 412,
        })));
        assert_eq!(merged.email, "asha@example.com");
        assert_eq!(merged.degree, Some(Degree::BE));
        assert_eq!(merged.codechef_rating, Rating::new(6).unwrap());
        assert_eq!(merged.hackerrank_rating, Rating::new(2).unwrap());
        assert_eq!(merged.cgpa.as_ref().map(|c| c.value()), Some(8.9));
        assert_eq!(merged.leetcode_problem_count, "412");
    }

    #[test]
    fn test_merge_keeps_stored_text_unchanged() {
        let fetched = object(json!({
            "graduationYear": "2025-26",
            "leetcodeproblemcount": "300+",
            "cgpa": "8.50",
            "tenthPercent": "92.00",
        }));
        let merged = as_map(&ProfileStore::merge(&fetched));
        for (key, value) in &fetched {
            assert_eq!(&merged[key], value, "{key} rewritten");
        }
    }

    #[test]
    fn test_merge_accepts_whole_number_float_ratings() {
        let merged = ProfileStore::merge(&object(json!({
            "codechefRating": 4.0,
            "hackerrankRating": 2.5,
        })));
        assert_eq!(merged.codechef_rating, Rating::new(4).unwrap());
        assert_eq!(merged.hackerrank_rating, Rating::default());
        assert_eq!(as_map(&merged)["codechefRating"], json!(4));
    }

    #[test]
    fn test_merge_ignores_unknown_keys_and_invalid_values() {
        let merged = ProfileStore::merge(&object(json!({
            "_id": "65f0c",
            "user_id": "user_2abc",
            "codechefRating": 11,
            "gender": "Unspecified",
            "lastName": null,
            "middleName": ["a", "b"],
            "fullName": "Asha Patil",
        })));
        let expected = Profile {
            full_name: "Asha Patil".to_string(),
            ..Profile::default()
        };
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_set_field_rejected_outside_edit_session() {
        let mut store = ProfileStore::new(Profile::default());
        assert_eq!(
            store.set_field(ProfileField::FirstName, "Asha"),
            Err(ProfileError::NotEditing)
        );
        assert_eq!(store.profile(), &Profile::default());
    }

    #[test]
    fn test_set_field_touches_only_named_key() {
        let mut store = ProfileStore::new(ProfileStore::merge(&object(json!({
            "firstName": "Asha",
            "mobileNumber": "9000000000",
            "hackerrankRating": 3,
        }))));
        let before = as_map(store.profile());

        store.begin_edit();
        store
            .set_field(ProfileField::MobileNumber, "9998887777")
            .unwrap();
        let after = as_map(store.profile());

        for (key, value) in &before {
            if key == "mobileNumber" {
                assert_eq!(after[key], json!("9998887777"));
            } else {
                assert_eq!(&after[key], value, "{key} changed");
            }
        }
    }

    #[test]
    fn test_set_field_by_name_rejects_unknown_field() {
        let mut store = ProfileStore::default();
        store.begin_edit();
        assert_eq!(
            store.set_field_by_name("salary", "10"),
            Err(ProfileError::UnknownField("salary".to_string()))
        );
        store.set_field_by_name("lastName", "Patil").unwrap();
        assert_eq!(store.profile().last_name, "Patil");
    }

    #[test]
    fn test_end_edit_closes_session_and_keeps_values() {
        let mut store = ProfileStore::default();
        assert_eq!(store.end_edit(), Err(ProfileError::NotEditing));

        store.begin_edit();
        assert!(!store.is_dirty());
        store.set_field(ProfileField::Gender, "Female").unwrap();
        assert!(store.is_dirty());

        let snapshot = store.end_edit().unwrap();
        assert!(!store.is_editing());
        assert!(!store.is_dirty());
        assert_eq!(&snapshot, store.profile());
        assert_eq!(
            store.set_field(ProfileField::Gender, "Male"),
            Err(ProfileError::NotEditing)
        );
    }

    #[test]
    fn test_begin_edit_twice_keeps_original_snapshot() {
        let mut store = ProfileStore::default();
        store.begin_edit();
        store.set_field(ProfileField::Project, "Placement bot").unwrap();
        store.begin_edit();
        assert!(store.is_dirty());
    }
}
