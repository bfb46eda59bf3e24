//! Turns a cursor context into an ordered list of proposals.
//!
//! The processor is request-scoped: it borrows the model built for one
//! completion request and is dropped with it.

use crate::completion::catalog::{ElementDef, ElementKind, TaskCatalog, ValueHint};
use crate::completion::context::{CursorContext, classify};
use crate::completion::proposal::{Proposal, ProposalKind};
use crate::config::AntSettings;
use crate::model::AntModel;

/// Property names Ant defines for every build, proposed alongside the ones
/// declared in the file.
const BUILTIN_PROPERTIES: &[&str] = &["ant.file", "ant.project.name", "basedir"];

const BOOLEAN_LITERALS: &[&str] = &["true", "false", "yes", "no", "on", "off"];

pub struct AntCompletionProcessor<'a> {
    catalog: &'static TaskCatalog,
    model: &'a AntModel,
    settings: &'a AntSettings,
}

impl<'a> AntCompletionProcessor<'a> {
    pub fn new(
        catalog: &'static TaskCatalog,
        model: &'a AntModel,
        settings: &'a AntSettings,
    ) -> Self {
        Self {
            catalog,
            model,
            settings,
        }
    }

    /// Proposals for the cursor at `offset` in `text`, name-sorted and
    /// capped at the configured maximum.
    pub fn proposals(&self, text: &str, offset: usize) -> Vec<Proposal> {
        let mut proposals = match classify(text, offset) {
            CursorContext::Element { parent, prefix } => {
                self.element_proposals(parent.as_deref(), &prefix)
            }
            CursorContext::AttributeName {
                element,
                prefix,
                present,
            } => self.attribute_proposals(&element, &prefix, &present),
            CursorContext::AttributeValue {
                element,
                attribute,
                prefix,
            } => self.value_proposals(&element, &attribute, &prefix),
            CursorContext::Property { prefix } => self.property_proposals(&prefix),
            CursorContext::None => Vec::new(),
        };

        proposals.sort_by(|a, b| a.display().cmp(b.display()));
        proposals.dedup();
        proposals.truncate(self.settings.max_results);
        proposals
    }

    fn element_proposals(&self, parent: Option<&str>, prefix: &str) -> Vec<Proposal> {
        let Some(parent) = parent else {
            // Document root: only the project element makes sense.
            return self
                .catalog
                .element("project")
                .into_iter()
                .filter(|def| matches_prefix(prefix, def.name()))
                .map(|def| self.element_proposal(def))
                .collect();
        };

        let mut proposals = Vec::new();
        match self.catalog.element(parent) {
            Some(parent_def) => {
                for name in parent_def.nested() {
                    if let Some(def) = self.catalog.element(name)
                        && matches_prefix(prefix, def.name())
                    {
                        proposals.push(self.element_proposal(def));
                    }
                }
                if parent_def.allows_tasks() {
                    for def in self.catalog.tasks() {
                        if matches_prefix(prefix, def.name()) {
                            proposals.push(self.element_proposal(def));
                        }
                    }
                }
            }
            None => {
                // Unknown enclosing element: fall back to the full task set
                // rather than going silent inside custom containers.
                for def in self.catalog.tasks() {
                    if matches_prefix(prefix, def.name()) {
                        proposals.push(self.element_proposal(def));
                    }
                }
            }
        }
        proposals
    }

    fn element_proposal(&self, def: &ElementDef) -> Proposal {
        let kind = match def.kind() {
            ElementKind::Task => ProposalKind::Task,
            ElementKind::Structural => ProposalKind::Element,
        };
        Proposal::new(def.name(), self.description(def.description()), kind)
    }

    fn attribute_proposals(&self, element: &str, prefix: &str, present: &[String]) -> Vec<Proposal> {
        let Some(def) = self.catalog.element(element) else {
            return Vec::new();
        };
        def.attributes()
            .iter()
            .filter(|a| matches_prefix(prefix, a.name))
            .filter(|a| !present.iter().any(|p| p.eq_ignore_ascii_case(a.name)))
            .map(|a| Proposal::bare(a.name, ProposalKind::Attribute))
            .collect()
    }

    fn value_proposals(&self, element: &str, attribute: &str, prefix: &str) -> Vec<Proposal> {
        let hint = self
            .catalog
            .element(element)
            .and_then(|def| def.attribute(attribute))
            .map(|a| a.hint)
            .unwrap_or(ValueHint::None);

        match hint {
            ValueHint::Boolean => BOOLEAN_LITERALS
                .iter()
                .filter(|lit| matches_prefix(prefix, lit))
                .map(|lit| Proposal::bare(lit, ProposalKind::Value))
                .collect(),
            ValueHint::Target => self.target_proposals(prefix, &[]),
            ValueHint::TargetList => {
                // Complete the segment after the last comma, excluding
                // targets already in the list.
                let (listed, segment) = match prefix.rsplit_once(',') {
                    Some((head, tail)) => (
                        head.split(',').map(str::trim).collect::<Vec<_>>(),
                        tail.trim_start(),
                    ),
                    None => (Vec::new(), prefix),
                };
                self.target_proposals(segment, &listed)
            }
            ValueHint::Property => self.property_proposals(prefix),
            ValueHint::None => Vec::new(),
        }
    }

    fn target_proposals(&self, prefix: &str, exclude: &[&str]) -> Vec<Proposal> {
        self.model
            .targets()
            .iter()
            .filter(|t| matches_prefix(prefix, &t.name))
            .filter(|t| !exclude.contains(&t.name.as_str()))
            .map(|t| {
                Proposal::new(
                    &t.name,
                    self.description(t.description.as_deref()),
                    ProposalKind::Target,
                )
            })
            .collect()
    }

    fn property_proposals(&self, prefix: &str) -> Vec<Proposal> {
        let mut proposals: Vec<Proposal> = self
            .model
            .properties()
            .iter()
            .map(String::as_str)
            .chain(BUILTIN_PROPERTIES.iter().copied())
            .filter(|name| matches_prefix(prefix, name))
            .map(|name| Proposal::bare(name, ProposalKind::Property))
            .collect();
        proposals.sort_by(|a, b| a.display().cmp(b.display()));
        proposals.dedup();
        proposals
    }

    fn description<'d>(&self, description: Option<&'d str>) -> Option<&'d str> {
        if self.settings.include_descriptions {
            description
        } else {
            None
        }
    }
}

fn matches_prefix(prefix: &str, name: &str) -> bool {
    // Slicing by prefix length can land inside a multibyte character of
    // `name`, so go through the checked accessor.
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
