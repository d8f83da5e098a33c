use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::codec;
use crate::domain::validation::{ValidationError, reject_commas};
use crate::domain::value::{GroupId, UpdateValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Keyword that triggers an automatic group update from an inbound message.
pub struct KeywordPair {
    pub first_word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_word: Option<String>,
}

impl KeywordPair {
    pub fn new(first_word: impl Into<String>) -> Self {
        Self {
            first_word: first_word.into(),
            second_word: None,
        }
    }

    pub fn with_second_word(mut self, second_word: impl Into<String>) -> Self {
        self.second_word = Some(second_word.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Rules that add or remove members when they text a keyword to `to`.
pub struct AutoUpdate {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<KeywordPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<KeywordPair>,
}

impl AutoUpdate {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            add: None,
            remove: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Group to create, or the full replacement of an existing group.
///
/// Invariant: no member is blank and no tag contains a comma.
pub struct GroupCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    members: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    child_groups: BTreeSet<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_update: Option<AutoUpdate>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
}

impl GroupCreate {
    pub fn builder() -> GroupCreateBuilder {
        GroupCreateBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn child_groups(&self) -> &BTreeSet<GroupId> {
        &self.child_groups
    }

    pub fn auto_update(&self) -> Option<&AutoUpdate> {
        self.auto_update.as_ref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupCreateBuilder {
    group: GroupCreate,
}

impl GroupCreateBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.group.name = Some(name.into());
        self
    }

    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.group.members.insert(member.into());
        self
    }

    pub fn members(mut self, members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let members = members.into_iter().map(Into::into);
        self.group.members.extend(members);
        self
    }

    pub fn child_group(mut self, child_group: GroupId) -> Self {
        self.group.child_groups.insert(child_group);
        self
    }

    pub fn auto_update(mut self, auto_update: AutoUpdate) -> Self {
        self.group.auto_update = Some(auto_update);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.group.tags.insert(tag.into());
        self
    }

    pub fn build(self) -> Result<GroupCreate, ValidationError> {
        let group = self.group;
        if group.members.iter().any(|member| member.trim().is_empty()) {
            return Err(ValidationError::Empty { field: "members" });
        }
        reject_commas("tags", &group.tags)?;
        Ok(group)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Partial group update. Only configured fields are written.
pub struct GroupUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "codec::update_value::deserialize"
    )]
    pub name: Option<UpdateValue<String>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub add: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub remove: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub child_groups_add: BTreeSet<GroupId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub child_groups_remove: BTreeSet<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_from_group: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_from_group: Option<GroupId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "codec::update_value::deserialize"
    )]
    pub auto_update: Option<UpdateValue<AutoUpdate>>,
}

impl GroupUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self
            .add
            .iter()
            .chain(&self.remove)
            .any(|member| member.trim().is_empty())
        {
            return Err(ValidationError::Empty { field: "members" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResult {
    pub id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub size: u32,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub child_groups: BTreeSet<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_update: Option<AutoUpdate>,
    pub created_at: DateTime<FixedOffset>,
    pub modified_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Tags attached to a batch or group.
///
/// Invariant: no tag contains a comma.
pub struct Tags {
    tags: BTreeSet<String>,
}

impl Tags {
    pub fn new(tags: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, ValidationError> {
        let tags: BTreeSet<String> = tags.into_iter().map(Into::into).collect();
        reject_commas("tags", &tags)?;
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn into_inner(self) -> BTreeSet<String> {
        self.tags
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Tags to add and remove in one request.
///
/// Invariant: no tag contains a comma.
pub struct TagsUpdate {
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    add: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    remove: BTreeSet<String>,
}

impl TagsUpdate {
    pub fn new(
        add: impl IntoIterator<Item = impl Into<String>>,
        remove: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let add: BTreeSet<String> = add.into_iter().map(Into::into).collect();
        let remove: BTreeSet<String> = remove.into_iter().map(Into::into).collect();
        reject_commas("tags", add.iter().chain(&remove))?;
        Ok(Self { add, remove })
    }

    pub fn add(&self) -> &BTreeSet<String> {
        &self.add
    }

    pub fn remove(&self) -> &BTreeSet<String> {
        &self.remove
    }
}
