use std::fmt;

use phonenumber::country;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// XMS API token, sent as a bearer credential.
///
/// Invariant: non-empty after trimming, printable ASCII only.
pub struct Token(String);

impl Token {
    pub const FIELD: &'static str = "token";

    /// Create a validated [`Token`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !trimmed.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ValidationError::InvalidHeaderValue { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Service plan identifier embedded in every request path.
///
/// Invariant: non-empty after trimming.
pub struct ServicePlanId(String);

impl ServicePlanId {
    pub const FIELD: &'static str = "service_plan_id";

    /// Create a validated [`ServicePlanId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a batch, as assigned by the server.
pub struct BatchId(String);

impl BatchId {
    pub const FIELD: &'static str = "batch_id";

    /// Create a validated [`BatchId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a recipient group, as assigned by the server.
pub struct GroupId(String);

impl GroupId {
    pub const FIELD: &'static str = "group_id";

    /// Create a validated [`GroupId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field value in a partial update request.
///
/// A field that should be left untouched is represented by `None` on the
/// owning request (`Option<UpdateValue<T>>`) and omitted from the JSON body.
/// [`UpdateValue::Unset`] resets the field to the server default and is
/// written as an explicit JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateValue<T> {
    Unset,
    Set(T),
}

impl<T> UpdateValue<T> {
    pub fn set(value: T) -> Self {
        Self::Set(value)
    }

    pub fn unset() -> Self {
        Self::Unset
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// The new value, or `None` when the field is being reset.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }
}

impl<T> From<T> for UpdateValue<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Serialize> Serialize for UpdateValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for UpdateValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Unset,
        })
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation (MSISDN).
///
/// Equality, ordering, and hashing are based on the E.164 form. Recipient
/// and group member fields take plain strings; convert with
/// [`PhoneNumber::into_msisdn`] or `String::from`.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    pub const FIELD: &'static str = "to";

    /// Parse a human-entered number into the E.164 form used as an MSISDN.
    ///
    /// Numbers without a leading `+` are read in `default_region`.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// The input as given, trimmed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// E.164 form, e.g. `+46701234567`.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }

    pub fn into_msisdn(self) -> String {
        self.e164
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}
