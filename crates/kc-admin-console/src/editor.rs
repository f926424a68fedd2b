//! Group creation and the group detail editor.

use std::collections::BTreeMap;
use std::sync::Arc;

use kc_admin_client::dto::{GroupRepresentation, NewGroup};

use crate::backend::GroupBackend;
use crate::error::{ConsoleError, ConsoleResult, Guard};
use crate::node::Parent;
use crate::notify::{reported, Confirm, Notifier};

/// Separator between the values of a multi-valued attribute while it is
/// edited as a single string.
pub const VALUE_SEPARATOR: &str = "##";

/// Attribute keys offered on every group.
pub const DEFAULT_ATTRIBUTE_KEYS: [&str; 4] = ["code", "parentCode", "shortName", "level"];

/// Creates a group under `parent` and returns its id.
pub async fn create_group(
    backend: &dyn GroupBackend,
    notifier: &dyn Notifier,
    parent: &Parent,
    mut group: NewGroup,
) -> ConsoleResult<String> {
    group.name = group.name.trim().to_string();
    if group.name.is_empty() {
        return Err(reported(notifier, Guard::Blank("group name").into()));
    }

    let id = backend
        .create_group(parent.id(), &group)
        .await
        .map_err(|e| reported(notifier, ConsoleError::mutation("create group", e)))?;
    tracing::info!(id = %id, name = %group.name, parent = ?parent.id(), "group created");
    notifier.success("The group has been created.");
    Ok(id)
}

/// Joins attribute values for editing.
#[must_use]
pub fn join_values(values: &[String]) -> String {
    values.join(VALUE_SEPARATOR)
}

/// Splits an edited attribute string back into values. An empty string
/// has no values.
#[must_use]
pub fn split_values(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(VALUE_SEPARATOR).map(str::to_string).collect()
}

/// Editable form of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDraft {
    /// Group name.
    pub name: String,
    /// Attribute values, joined with [`VALUE_SEPARATOR`].
    pub attributes: BTreeMap<String, String>,
}

impl GroupDraft {
    /// Builds a draft from a group.
    #[must_use]
    pub fn from_group(group: &GroupRepresentation) -> Self {
        Self {
            name: group.name.clone(),
            attributes: group
                .attributes
                .iter()
                .map(|(key, values)| (key.clone(), join_values(values)))
                .collect(),
        }
    }

    /// Writes the draft into a group.
    pub fn apply_to(&self, group: &mut GroupRepresentation) {
        group.name = self.name.trim().to_string();
        group.attributes = self
            .attributes
            .iter()
            .map(|(key, joined)| (key.clone(), split_values(joined)))
            .collect();
    }
}

/// Detail editor for one group.
pub struct GroupEditor {
    backend: Arc<dyn GroupBackend>,
    notifier: Arc<dyn Notifier>,
    group: GroupRepresentation,
    saved: GroupDraft,
    draft: GroupDraft,
}

impl GroupEditor {
    /// Loads a group for editing.
    pub async fn load(
        backend: Arc<dyn GroupBackend>,
        notifier: Arc<dyn Notifier>,
        id: &str,
    ) -> ConsoleResult<Self> {
        let group = backend
            .get_group(id)
            .await
            .map_err(|e| reported(notifier.as_ref(), ConsoleError::fetch("group", e)))?;
        let saved = GroupDraft::from_group(&group);
        Ok(Self {
            backend,
            notifier,
            draft: saved.clone(),
            saved,
            group,
        })
    }

    /// The group as last loaded or saved.
    #[must_use]
    pub const fn group(&self) -> &GroupRepresentation {
        &self.group
    }

    /// The edited values.
    #[must_use]
    pub const fn draft(&self) -> &GroupDraft {
        &self.draft
    }

    /// Checks if the draft differs from the saved group.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.draft != self.saved
    }

    /// Renames the group.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Sets an attribute from its joined form, adding the key if needed.
    pub fn set_attribute(&mut self, key: &str, joined: impl Into<String>) {
        self.draft.attributes.insert(key.to_string(), joined.into());
    }

    /// Adds an empty attribute.
    pub fn add_attribute(&mut self, key: &str) -> ConsoleResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(reported(
                self.notifier.as_ref(),
                Guard::Blank("attribute key").into(),
            ));
        }
        self.draft.attributes.entry(key.to_string()).or_default();
        Ok(())
    }

    /// Removes an attribute. Returns `false` if it was absent.
    pub fn remove_attribute(&mut self, key: &str) -> bool {
        self.draft.attributes.remove(key).is_some()
    }

    /// Adds the [`DEFAULT_ATTRIBUTE_KEYS`] that are missing.
    pub fn add_default_attributes(&mut self) {
        for key in DEFAULT_ATTRIBUTE_KEYS {
            self.draft.attributes.entry(key.to_string()).or_default();
        }
    }

    /// Discards unsaved edits.
    pub fn reset(&mut self) {
        self.draft = self.saved.clone();
    }

    /// Saves the draft.
    pub async fn save(&mut self) -> ConsoleResult<()> {
        if self.draft.name.trim().is_empty() {
            return Err(self.report(Guard::Blank("group name").into()));
        }

        let mut updated = self.group.clone();
        self.draft.apply_to(&mut updated);
        self.backend
            .update_group(&updated)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("update group", e)))?;
        tracing::info!(id = %updated.id, "group updated");
        self.notifier.success("Your changes have been saved to the group.");

        self.saved = GroupDraft::from_group(&updated);
        self.draft = self.saved.clone();
        self.group = updated;
        Ok(())
    }

    /// Deletes the group after confirmation. Groups with children are
    /// rejected. Returns `false` if the user declined.
    pub async fn remove(&self, confirm: &dyn Confirm) -> ConsoleResult<bool> {
        if self.group.has_child || !self.group.sub_groups.is_empty() {
            return Err(self.report(Guard::HasChildren.into()));
        }
        let message = format!(
            "Are you sure you want to permanently delete the group {}?",
            self.group.name
        );
        if !confirm.confirm("Delete Group", &message) {
            return Ok(false);
        }

        self.backend
            .delete_group(&self.group.id)
            .await
            .map_err(|e| self.report(ConsoleError::mutation("delete group", e)))?;
        tracing::info!(id = %self.group.id, "group deleted");
        self.notifier.success("The group has been deleted.");
        Ok(true)
    }

    fn report(&self, err: ConsoleError) -> ConsoleError {
        reported(self.notifier.as_ref(), err)
    }
}
