//! # Record Store
//!
//! In-memory collection of user records backing every API operation.
//!
//! ## Layout
//!
//! - One hash map keyed by `userId`, lives for the lifetime of the process
//! - Each record owns two open sub-records: **profile** (string values) and **score fields**
//!   (tagged scalars)
//! - Sub-records are ordered maps so JSON output is stable between requests
//! - No persistence, a restart resets the store to the sample seed
//!
//! ## Presence
//!
//! Field values are checked for presence, never for truthiness. `0`, `false` and `""` are real
//! values.
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap, hash_map::Entry},
    fmt,
};

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::StoreError;

pub const MAIN_SCORE: &str = "mainScore";
pub const LEVEL: &str = "level";

pub type ProfileRecord = BTreeMap<String, String>;
pub type ScoreFields = BTreeMap<String, FieldValue>;

/// Scalar stored in a score field. Serialized as a bare JSON value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl FieldValue {
    /// Numeric weight used when ranking the leaderboard.
    pub fn rank(&self) -> f64 {
        match self {
            FieldValue::Number(n) => n.as_f64().unwrap_or(0.0),
            FieldValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
            FieldValue::Bool(b) => f64::from(u8::from(*b)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub profile: ProfileRecord,
    pub score_fields: ScoreFields,
}

impl UserRecord {
    fn new(user_id: &str, username: &str) -> Self {
        let score_fields = ScoreFields::from([
            (MAIN_SCORE.to_string(), FieldValue::from(0)),
            (LEVEL.to_string(), FieldValue::from(0)),
        ]);

        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            profile: ProfileRecord::new(),
            score_fields,
        }
    }

    /// `mainScore` as a sort key, `0` when missing.
    pub fn main_score(&self) -> f64 {
        self.score_fields
            .get(MAIN_SCORE)
            .map(FieldValue::rank)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<String, UserRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the sample records served after a fresh start.
    pub fn seeded() -> Self {
        let samples = [
            ("user123", "ScratchCoder", 15000, 12, "Builds platformers on weekends"),
            ("user456", "BlockBuilder", 12345, 9, "Speedrunning my own games"),
            ("user789", "SpriteWizard", 9876, 7, "Pixel art first, code second"),
        ];

        let mut store = Self::new();
        for (user_id, username, main_score, level, bio) in samples {
            let mut record = UserRecord::new(user_id, username);
            record
                .score_fields
                .insert(MAIN_SCORE.to_string(), FieldValue::from(main_score));
            record
                .score_fields
                .insert(LEVEL.to_string(), FieldValue::from(level));
            record.profile.insert("bio".to_string(), bio.to_string());
            record.profile.insert(
                "avatarUrl".to_string(),
                format!("https://example.com/avatars/{user_id}.png"),
            );

            store.users.insert(user_id.to_string(), record);
        }

        store
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.get(user_id)
    }

    pub fn create(&mut self, user_id: &str, username: &str) -> Result<UserRecord, StoreError> {
        require_name(user_id, "userId")?;
        require_name(username, "username")?;

        match self.users.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "User '{user_id}' already exists"
            ))),
            Entry::Vacant(entry) => Ok(entry.insert(UserRecord::new(user_id, username)).clone()),
        }
    }

    pub fn set_score_field(
        &mut self,
        user_id: &str,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        require_name(field, "field")?;

        self.user_mut(user_id)?
            .score_fields
            .insert(field.to_string(), value);

        Ok(())
    }

    pub fn get_score_field(&self, user_id: &str, field: &str) -> Result<&FieldValue, StoreError> {
        self.find(user_id)?.score_fields.get(field).ok_or_else(|| {
            StoreError::NotFound(format!(
                "Score field '{field}' not found for user '{user_id}'"
            ))
        })
    }

    pub fn get_all_score_fields(&self, user_id: &str) -> Result<&ScoreFields, StoreError> {
        Ok(&self.find(user_id)?.score_fields)
    }

    /// Moves `old_field` to `new_field`. An existing `new_field` is overwritten.
    pub fn rename_score_field(
        &mut self,
        user_id: &str,
        old_field: &str,
        new_field: &str,
    ) -> Result<(), StoreError> {
        require_name(old_field, "oldField")?;
        require_name(new_field, "newField")?;

        let score_fields = &mut self.user_mut(user_id)?.score_fields;
        let value = score_fields.remove(old_field).ok_or_else(|| {
            StoreError::NotFound(format!(
                "Score field '{old_field}' not found for user '{user_id}'"
            ))
        })?;
        score_fields.insert(new_field.to_string(), value);

        Ok(())
    }

    pub fn set_profile_field(
        &mut self,
        user_id: &str,
        field: &str,
        value: String,
    ) -> Result<(), StoreError> {
        require_name(field, "field")?;

        self.user_mut(user_id)?
            .profile
            .insert(field.to_string(), value);

        Ok(())
    }

    /// All records, highest `mainScore` first.
    pub fn list_all(&self) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self.users.values().cloned().collect();
        users.sort_by(|a, b| {
            b.main_score()
                .partial_cmp(&a.main_score())
                .unwrap_or(Ordering::Equal)
        });

        users
    }

    /// Like [`Store::get`], but absence is a `NotFound` error.
    pub fn find(&self, user_id: &str) -> Result<&UserRecord, StoreError> {
        self.users.get(user_id).ok_or_else(|| user_not_found(user_id))
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut UserRecord, StoreError> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| user_not_found(user_id))
    }
}

fn user_not_found(user_id: &str) -> StoreError {
    StoreError::NotFound(format!("User '{user_id}' not found"))
}

fn require_name(name: &str, what: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidInput(format!("{what} must not be empty")));
    }

    Ok(())
}
