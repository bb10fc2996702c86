//! Application view state
//!
//! The browser-side state of the original design is re-architected as one
//! explicit snapshot struct owned by the top level, mutated only through
//! discrete [`ViewEvent`] transitions. Handlers read immutable snapshots;
//! the matrix model stays pure.

use chrono::{DateTime, Utc};
use cmx_common::docs::{Summary, UpdateLog};
use cmx_common::model::{Product, Tag};

/// Everything one load pass produces
#[derive(Debug, Default)]
pub struct LoadedData {
    pub tags: Vec<Tag>,
    pub exclude_tags: Vec<String>,
    pub products: Vec<Product>,
    pub summary: Summary,
    pub logs: Vec<UpdateLog>,
}

/// State transition events
#[derive(Debug)]
pub enum ViewEvent {
    LoadSucceeded(LoadedData),
    LoadFailed(String),
    /// Optimistic rename after the remote curation API confirmed one.
    /// Operates on a bare name: a matching primary tag is renamed, else
    /// every subtag with that name is. Subtag names are only unique within
    /// one parent, so a shared name renames in every parent - the wire
    /// contract has the same ambiguity and it is preserved here.
    TagRenamed { from: String, to: String },
    ExcludeTagsUpdated(Vec<String>),
}

/// Snapshot of all data the view layer renders
#[derive(Debug, Default)]
pub struct ViewState {
    /// Full taxonomy as loaded
    pub tags: Vec<Tag>,
    /// Primary tag names hidden from read-only views
    pub exclude_tags: Vec<String>,
    pub products: Vec<Product>,
    pub summary: Summary,
    /// Crawl update logs, newest first
    pub logs: Vec<UpdateLog>,
    /// Incremented on every successful load
    pub generation: u64,
    /// Blocking load error, if the last load failed
    pub last_error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ViewState {
    /// Taxonomy with exclusions applied, for the read-only views
    pub fn visible_tags(&self) -> Vec<&Tag> {
        self.tags
            .iter()
            .filter(|tag| !self.exclude_tags.contains(&tag.name))
            .collect()
    }

    /// Apply one state transition
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::LoadSucceeded(data) => {
                self.tags = data.tags;
                self.exclude_tags = data.exclude_tags;
                self.products = data.products;
                self.summary = data.summary;
                self.logs = data.logs;
                self.generation += 1;
                self.last_error = None;
                self.loaded_at = Some(Utc::now());
            }
            ViewEvent::LoadFailed(message) => {
                // Previous data stays visible; the error is surfaced as a
                // blocking, retryable condition by the UI
                self.last_error = Some(message);
            }
            ViewEvent::TagRenamed { from, to } => {
                let renamed_primary = self
                    .tags
                    .iter()
                    .any(|tag| tag.name == from);
                for tag in &mut self.tags {
                    if renamed_primary {
                        if tag.name == from {
                            tag.name = to.clone();
                        }
                    } else {
                        for subtag in &mut tag.subtags {
                            if subtag.name == from {
                                subtag.name = to.clone();
                            }
                        }
                    }
                }
            }
            ViewEvent::ExcludeTagsUpdated(exclude_tags) => {
                self.exclude_tags = exclude_tags;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmx_common::model::Subtag;

    fn tag(name: &str, subtags: &[&str]) -> Tag {
        Tag {
            name: name.to_string(),
            description: None,
            subtags: subtags
                .iter()
                .map(|s| Subtag {
                    name: s.to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    #[test]
    fn load_succeeded_bumps_generation_and_clears_error() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::LoadFailed("boom".to_string()));
        assert_eq!(state.last_error.as_deref(), Some("boom"));

        state.apply(ViewEvent::LoadSucceeded(LoadedData {
            tags: vec![tag("UI", &[])],
            ..Default::default()
        }));
        assert_eq!(state.generation, 1);
        assert!(state.last_error.is_none());
        assert_eq!(state.tags.len(), 1);
    }

    #[test]
    fn load_failed_keeps_previous_data() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::LoadSucceeded(LoadedData {
            tags: vec![tag("UI", &[])],
            ..Default::default()
        }));
        state.apply(ViewEvent::LoadFailed("unreachable".to_string()));
        assert_eq!(state.tags.len(), 1);
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn rename_prefers_primary_tag() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::LoadSucceeded(LoadedData {
            tags: vec![tag("UI", &["UI"]), tag("Infra", &[])],
            ..Default::default()
        }));
        state.apply(ViewEvent::TagRenamed {
            from: "UI".to_string(),
            to: "Interface".to_string(),
        });
        assert_eq!(state.tags[0].name, "Interface");
        // Subtag untouched when a primary matched
        assert_eq!(state.tags[0].subtags[0].name, "UI");
    }

    #[test]
    fn rename_touches_every_matching_subtag() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::LoadSucceeded(LoadedData {
            tags: vec![tag("UI", &["Auth"]), tag("Infra", &["Auth"])],
            ..Default::default()
        }));
        state.apply(ViewEvent::TagRenamed {
            from: "Auth".to_string(),
            to: "Identity".to_string(),
        });
        assert_eq!(state.tags[0].subtags[0].name, "Identity");
        assert_eq!(state.tags[1].subtags[0].name, "Identity");
    }

    #[test]
    fn excluded_tags_are_hidden_from_visible_taxonomy() {
        let mut state = ViewState::default();
        state.apply(ViewEvent::LoadSucceeded(LoadedData {
            tags: vec![tag("UI", &[]), tag("Internal", &[])],
            exclude_tags: vec!["Internal".to_string()],
            ..Default::default()
        }));
        let visible: Vec<_> = state.visible_tags().iter().map(|t| t.name.clone()).collect();
        assert_eq!(visible, vec!["UI"]);

        state.apply(ViewEvent::ExcludeTagsUpdated(Vec::new()));
        assert_eq!(state.visible_tags().len(), 2);
    }
}
