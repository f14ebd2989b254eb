// src/form.rs
//! Create/edit form state bound to a [`ResourceStore`].

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::store::{Resource, ResourceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Value the field holds in a fresh form.
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str) -> Self {
        Self { name, label, required: true, default: "" }
    }

    pub const fn optional(name: &'static str, label: &'static str) -> Self {
        Self { name, label, required: false, default: "" }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default, ..self }
    }
}

/// Raw form values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft(BTreeMap<&'static str, String>);

impl Draft {
    pub fn empty(fields: &[FieldSpec]) -> Self {
        Self(fields.iter().map(|f| (f.name, f.default.to_string())).collect())
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.insert(name, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Trimmed value, or `Missing required field` when blank.
    pub fn require(&self, name: &str) -> Result<&str, ApiError> {
        let value = self.get(name).trim();
        if value.is_empty() {
            return Err(ApiError::missing_field(name));
        }
        Ok(value)
    }

    /// Trimmed value, `None` when blank.
    pub fn optional(&self, name: &str) -> Option<&str> {
        Some(self.get(name).trim()).filter(|v| !v.is_empty())
    }

    pub fn require_id(&self, name: &str) -> Result<i64, ApiError> {
        parse_id(name, self.require(name)?)
    }

    pub fn optional_id(&self, name: &str) -> Result<Option<i64>, ApiError> {
        self.optional(name).map(|v| parse_id(name, v)).transpose()
    }
}

fn parse_id(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::validation(format!("{name} must be a whole number, got {raw:?}")))
}

/// A resource that can be edited through a [`FormSession`].
pub trait Editable: Resource {
    const FIELDS: &'static [FieldSpec];

    fn to_draft(&self) -> Draft;

    /// Parses the draft into an outgoing body. Required fields have already
    /// been checked when this runs from [`FormSession::submit`].
    fn payload_from(draft: &Draft) -> Result<Self::Payload, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Creating,
    Editing(i64),
}

#[derive(Debug, Clone)]
pub struct FormSession<R: Editable> {
    mode: Mode,
    draft: Draft,
    _resource: std::marker::PhantomData<R>,
}

impl<R: Editable> Default for FormSession<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Editable> FormSession<R> {
    pub fn new() -> Self {
        Self {
            mode: Mode::Creating,
            draft: Draft::empty(R::FIELDS),
            _resource: std::marker::PhantomData,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    pub fn start_edit(&mut self, record: &R) {
        self.draft = record.to_draft();
        self.mode = Mode::Editing(record.id());
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), ApiError> {
        let spec = R::FIELDS
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ApiError::validation(format!("Unknown {} field: {name}", R::LABEL)))?;
        self.draft.insert(spec.name, value);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.draft = Draft::empty(R::FIELDS);
        self.mode = Mode::Creating;
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        for field in R::FIELDS.iter().filter(|f| f.required) {
            self.draft.require(field.name)?;
        }
        Ok(())
    }

    /// Creates or updates through `store`. Only a successful round trip resets
    /// the form; any failure leaves draft and mode as they were.
    pub async fn submit(&mut self, store: &mut ResourceStore<R>) -> Result<(), ApiError> {
        self.validate()?;
        let payload = R::payload_from(&self.draft)?;

        match self.mode {
            Mode::Editing(id) => store.update(id, &payload).await?,
            Mode::Creating => store.create(&payload).await?,
        }

        self.reset();
        Ok(())
    }
}
