//! Startup step model.
//!
//! A step is one timed unit of startup work:
//! - id (unique per recorder)
//! - name
//! - parent id (nesting is reconstructed by consumers, never validated here)
//! - start/end nanos from the recorder's clock
//! - tags (append only)

use serde::Serialize;

use crate::error::StartupError;

pub type StepId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered tag list. Keys may repeat; a later tag never overwrites an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub(crate) fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags cannot be removed. Always fails.
    pub fn remove(&mut self, _key: &str) -> Result<Tag, StartupError> {
        Err(StartupError::Unsupported("tags are append only"))
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Raw clock readings for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRecord {
    start: i64,
    end: i64,
}

impl TimeRecord {
    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    id: StepId,
    name: String,
    parent_id: Option<StepId>,
    time: TimeRecord,
    tags: Tags,
}

impl Step {
    pub(crate) fn new(id: StepId, name: String, parent_id: Option<StepId>, start: i64) -> Self {
        Self {
            id,
            name,
            parent_id,
            time: TimeRecord { start, end: start },
            tags: Tags::default(),
        }
    }

    pub(crate) fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }

    pub(crate) fn record_end(&mut self, end: i64) {
        self.time.end = end;
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_id(&self) -> Option<StepId> {
        self.parent_id
    }

    pub fn time(&self) -> TimeRecord {
        self.time
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}
