use std::collections::HashMap;

use crate::dom::{Action, Document, EventKind, ListenerId, NodeId};
use crate::render::POST_ID_KEY;

/// Click handlers on post buttons, keyed by button node so each one can be
/// removed exactly, even if two buttons carry the same post id.
#[derive(Debug, Default)]
pub struct ButtonListeners {
    registered: HashMap<NodeId, ListenerId>,
}

impl ButtonListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one toggle handler on every tagged button inside `container`.
    /// Buttons that already have one are left as they are.
    pub fn attach_all(&mut self, doc: &mut Document, container: NodeId) -> Vec<NodeId> {
        let mut attached = Vec::new();
        for button in doc.elements_by_tag(container, "button") {
            let Some(post_id) = doc
                .data(button, POST_ID_KEY)
                .and_then(|id| id.parse::<u32>().ok())
                .filter(|id| *id != 0)
            else {
                continue;
            };
            if self.registered.contains_key(&button) {
                continue;
            }
            let listener = doc.add_listener(button, EventKind::Click, Action::ToggleComments(post_id));
            self.registered.insert(button, listener);
            attached.push(button);
        }
        tracing::debug!(count = attached.len(), "attached button listeners");
        attached
    }

    /// Removes every handler this manager registered. Returns how many were
    /// still present on their buttons.
    pub fn detach_all(&mut self, doc: &mut Document) -> usize {
        let removed = self
            .registered
            .drain()
            .filter(|(button, listener)| doc.remove_listener(*button, *listener))
            .count();
        tracing::debug!(removed, "detached button listeners");
        removed
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.registered.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
