use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldListError {
    #[error("row {index} does not exist (list has {len} rows)")]
    OutOfRange { index: usize, len: usize },
}

/// One editable entry of a dynamic form list
pub trait Row: Clone + Default {
    /// Partial update merged into a row by [`FieldList::update_at`]
    type Patch;

    /// True when the row's essential content is empty or whitespace
    fn is_blank(&self) -> bool;

    fn merge(&self, patch: Self::Patch) -> Self;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterPatch {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Row for ParameterRow {
    type Patch = ParameterPatch;

    fn is_blank(&self) -> bool {
        self.key.trim().is_empty() || self.value.trim().is_empty()
    }

    fn merge(&self, patch: ParameterPatch) -> Self {
        ParameterRow {
            key: patch.key.unwrap_or_else(|| self.key.clone()),
            value: patch.value.unwrap_or_else(|| self.value.clone()),
        }
    }
}

/// Single free-text row, used for variables and constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRow {
    pub value: String,
}

impl TextRow {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

impl Row for TextRow {
    type Patch = String;

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn merge(&self, patch: String) -> Self {
        TextRow { value: patch }
    }
}

pub type VariableRow = TextRow;
pub type ConstraintRow = TextRow;

/// Ordered list of rows that is never empty.
///
/// Every operation returns a new list; the receiver is left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList<R: Row> {
    rows: Vec<R>,
}

impl<R: Row> Default for FieldList<R> {
    fn default() -> Self {
        Self {
            rows: vec![R::default()],
        }
    }
}

impl<R: Row> FieldList<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from rows; an empty input yields one default row
    pub fn from_rows(rows: Vec<R>) -> Self {
        if rows.is_empty() {
            Self::default()
        } else {
            Self { rows }
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the list has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add(&self, template: R) -> Self {
        let mut rows = self.rows.clone();
        rows.push(template);
        Self { rows }
    }

    /// Drop the row at `index`. Removing the last remaining row leaves a
    /// single default row behind.
    pub fn remove_at(&self, index: usize) -> Result<Self, FieldListError> {
        self.check(index)?;
        let rows: Vec<R> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, row)| row.clone())
            .collect();
        Ok(Self::from_rows(rows))
    }

    pub fn update_at(&self, index: usize, patch: R::Patch) -> Result<Self, FieldListError> {
        self.check(index)?;
        let mut rows = self.rows.clone();
        rows[index] = rows[index].merge(patch);
        Ok(Self { rows })
    }

    /// Rows with non-blank essential content, in order
    pub fn filled(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().filter(|row| !row.is_blank())
    }

    fn check(&self, index: usize) -> Result<(), FieldListError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(FieldListError::OutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }
}
