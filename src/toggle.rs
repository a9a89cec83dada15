use crate::dom::{Document, Event, NodeId};
use crate::render::POST_ID_KEY;

pub const SHOW_LABEL: &str = "Show Comments";
pub const HIDE_LABEL: &str = "Hide Comments";
pub const HIDDEN_CLASS: &str = "hide";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

impl Visibility {
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Hidden => SHOW_LABEL,
            Visibility::Shown => HIDE_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    pub section: NodeId,
    pub button: NodeId,
    pub visibility: Visibility,
}

fn find(doc: &Document, tag: &str, post_id: u32) -> Option<NodeId> {
    if post_id == 0 {
        return None;
    }
    doc.find_by_data(doc.root(), tag, POST_ID_KEY, &post_id.to_string())
}

pub fn visibility(doc: &Document, post_id: u32) -> Option<Visibility> {
    let section = find(doc, "section", post_id)?;
    Some(if doc.class_contains(section, HIDDEN_CLASS) {
        Visibility::Hidden
    } else {
        Visibility::Shown
    })
}

/// Flips the hidden class on the post's comment section.
pub fn toggle_section(doc: &mut Document, post_id: u32) -> Option<NodeId> {
    let section = find(doc, "section", post_id)?;
    doc.class_toggle(section, HIDDEN_CLASS);
    Some(section)
}

/// Swaps the post's button label between the show and hide texts.
pub fn toggle_button(doc: &mut Document, post_id: u32) -> Option<NodeId> {
    let button = find(doc, "button", post_id)?;
    let next = if doc.text_content(button) == SHOW_LABEL {
        HIDE_LABEL
    } else {
        SHOW_LABEL
    };
    doc.set_text_content(button, next);
    Some(button)
}

/// Handles a click on a post's comments button.
///
/// Nothing changes unless there is an event and both the section and the
/// button for `post_id` exist. The label is written from the section's new
/// state, so the two can never disagree afterwards.
pub fn toggle_comments(doc: &mut Document, event: Option<&Event>, post_id: u32) -> Option<Toggled> {
    event?;
    let section = find(doc, "section", post_id)?;
    let button = find(doc, "button", post_id)?;

    let visibility = if doc.class_toggle(section, HIDDEN_CLASS) {
        Visibility::Hidden
    } else {
        Visibility::Shown
    };
    doc.set_text_content(button, visibility.label());
    tracing::debug!(post = post_id, ?visibility, "toggled comments");

    Some(Toggled {
        section,
        button,
        visibility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::EventKind;

    fn post(doc: &mut Document, post_id: u32) -> (NodeId, NodeId) {
        let root = doc.root();
        let button = doc.create_element("button");
        doc.set_text_content(button, SHOW_LABEL);
        doc.set_data(button, POST_ID_KEY, &post_id.to_string());
        let section = doc.create_element("section");
        doc.set_data(section, POST_ID_KEY, &post_id.to_string());
        doc.set_class_name(section, "comments hide");
        doc.append_children(root, &[button, section]);
        (button, section)
    }

    fn click(target: NodeId) -> Event {
        Event {
            kind: EventKind::Click,
            target,
        }
    }

    #[test]
    fn two_toggles_restore_the_original_state() {
        let mut doc = Document::new();
        let (button, section) = post(&mut doc, 3);
        let event = click(button);

        let first = toggle_comments(&mut doc, Some(&event), 3).unwrap();
        assert_eq!(first.visibility, Visibility::Shown);
        assert_eq!(first.section, section);
        assert!(!doc.class_contains(section, HIDDEN_CLASS));
        assert_eq!(doc.text_content(button), HIDE_LABEL);

        let second = toggle_comments(&mut doc, Some(&event), 3).unwrap();
        assert_eq!(second.visibility, Visibility::Hidden);
        assert!(doc.class_contains(section, HIDDEN_CLASS));
        assert!(doc.class_contains(section, "comments"));
        assert_eq!(doc.text_content(button), SHOW_LABEL);
    }

    #[test]
    fn unknown_or_zero_ids_change_nothing() {
        let mut doc = Document::new();
        let (button, section) = post(&mut doc, 3);
        let event = click(button);
        let before = doc.to_html(doc.root());

        assert_eq!(toggle_comments(&mut doc, Some(&event), 0), None);
        assert_eq!(toggle_comments(&mut doc, Some(&event), 42), None);
        assert_eq!(toggle_comments(&mut doc, None, 3), None);
        assert_eq!(toggle_section(&mut doc, 0), None);
        assert_eq!(toggle_button(&mut doc, 42), None);

        assert_eq!(doc.to_html(doc.root()), before);
        assert_eq!(visibility(&doc, 3), Some(Visibility::Hidden));
        assert!(doc.class_contains(section, HIDDEN_CLASS));
    }

    #[test]
    fn missing_button_leaves_section_alone() {
        let mut doc = Document::new();
        let root = doc.root();
        let section = doc.create_element("section");
        doc.set_data(section, POST_ID_KEY, "8");
        doc.set_class_name(section, HIDDEN_CLASS);
        doc.append_child(root, section);

        assert_eq!(toggle_comments(&mut doc, Some(&click(section)), 8), None);
        assert!(doc.class_contains(section, HIDDEN_CLASS));
    }

    #[test]
    fn label_follows_section_even_if_out_of_sync() {
        let mut doc = Document::new();
        let (button, _) = post(&mut doc, 5);
        doc.set_text_content(button, "something else");

        let toggled = toggle_comments(&mut doc, Some(&click(button)), 5).unwrap();
        assert_eq!(toggled.visibility, Visibility::Shown);
        assert_eq!(doc.text_content(button), HIDE_LABEL);
    }

    #[test]
    fn single_toggles_work_independently() {
        let mut doc = Document::new();
        let (button, section) = post(&mut doc, 2);
        assert_eq!(toggle_section(&mut doc, 2), Some(section));
        assert_eq!(visibility(&doc, 2), Some(Visibility::Shown));
        assert_eq!(toggle_button(&mut doc, 2), Some(button));
        assert_eq!(doc.text_content(button), HIDE_LABEL);
    }
}
