use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::dom::{Action, Document, Event, EventKind, NodeId};
use crate::error::OrLog;
use crate::fetch::Source;
use crate::listeners::ButtonListeners;
use crate::render::{self, PLACEHOLDER_CLASS};
use crate::serializable::*;
use crate::toggle;

pub const SELECT_MENU_ID: &str = "selectMenu";
pub const SELECT_PROMPT: &str = "Select an Employee";
pub const INITIAL_TEXT: &str = "Select an Employee to display their posts.";

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub user_id: u32,
    pub posts: Vec<Post>,
    pub refresh: Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refresh {
    pub detached: usize,
    pub cleared: usize,
    pub rendered: Vec<NodeId>,
    pub attached: Vec<NodeId>,
}

/// The whole page: a user select menu and a `main` holding that user's posts.
pub struct Page<S> {
    doc: Document,
    source: S,
    select: NodeId,
    main: NodeId,
    listeners: ButtonListeners,
    default_user: u32,
}

impl<S: Source> Page<S> {
    pub fn new(source: S) -> Self {
        let mut doc = Document::new();
        let root = doc.root();

        let header = doc.create_element("header");
        let select = doc.create_element("select");
        doc.set_attr(select, "id", SELECT_MENU_ID);
        let prompt = render::make_element(&mut doc, "option", SELECT_PROMPT, None);
        doc.append_child(select, prompt);
        doc.append_child(header, select);

        let main = doc.create_element("main");
        let initial = render::make_element(&mut doc, "p", INITIAL_TEXT, Some(PLACEHOLDER_CLASS));
        doc.append_child(main, initial);

        doc.append_children(root, &[header, main]);

        Self {
            doc,
            source,
            select,
            main,
            listeners: ButtonListeners::new(),
            default_user: 1,
        }
    }

    /// User id used when the select menu holds no usable value. Zero is not
    /// a user and leaves the current default in place.
    pub fn with_default_user(mut self, user_id: u32) -> Self {
        if user_id == 0 {
            tracing::warn!(default = self.default_user, "ignoring zero default user");
        } else {
            self.default_user = user_id;
        }
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn select(&self) -> NodeId {
        self.select
    }

    pub fn main(&self) -> NodeId {
        self.main
    }

    /// Fills the select menu and starts listening for changes. A failed user
    /// fetch leaves the menu with only its prompt.
    pub async fn init(&mut self) -> Vec<User> {
        let users = self.source.users().await.or_log("user list");
        render::populate_select(&mut self.doc, self.select, &users);
        if self.doc.listener_count(self.select, EventKind::Change) == 0 {
            self.doc
                .add_listener(self.select, EventKind::Change, Action::SelectUser);
        }
        tracing::info!(users = users.len(), "page initialised");
        users
    }

    /// Sets the select menu's value as a user would and fires `change`.
    pub async fn change_selection(&mut self, value: &str) -> Option<Selection> {
        if self.doc.is_disabled(self.select) {
            tracing::debug!(value, "select menu disabled, ignoring change");
            return None;
        }
        self.doc.set_value(self.select, value);
        let event = Event {
            kind: EventKind::Change,
            target: self.select,
        };
        let mut outcome = None;
        for action in self.doc.actions(self.select, EventKind::Change) {
            if action == Action::SelectUser {
                outcome = self.on_select_change(Some(&event)).await;
            }
        }
        outcome
    }

    /// Loads the selected user's posts and redraws them. The select menu
    /// stays disabled for the duration, and changes arriving while it is
    /// disabled are ignored.
    pub async fn on_select_change(&mut self, event: Option<&Event>) -> Option<Selection> {
        let target = event?.target;
        if self.doc.is_disabled(target) {
            return None;
        }
        self.doc.set_disabled(target, true);

        let user_id = self
            .doc
            .value(target)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|id| *id != 0)
            .unwrap_or(self.default_user);
        tracing::info!(user = user_id, "user selected");

        let posts = self
            .source
            .user_posts(user_id)
            .await
            .or_log(&format!("posts for user {user_id}"));
        let refresh = self.refresh(&posts).await;

        self.doc.set_disabled(target, false);
        Some(Selection {
            user_id,
            posts,
            refresh,
        })
    }

    /// Detaches button handlers, empties `main`, renders `posts` (or the
    /// placeholder), and re-attaches handlers.
    pub async fn refresh(&mut self, posts: &[Post]) -> Refresh {
        let detached = self.listeners.detach_all(&mut self.doc);
        let cleared = self.doc.clear_children(self.main);
        let rendered = render::display_posts(&mut self.doc, &self.source, self.main, posts).await;
        let attached = self.listeners.attach_all(&mut self.doc, self.main);
        tracing::debug!(detached, cleared, rendered = rendered.len(), "refreshed posts");
        Refresh {
            detached,
            cleared,
            rendered,
            attached,
        }
    }

    /// Dispatches a click on `target`. Returns how many toggles ran.
    pub fn click(&mut self, target: NodeId) -> usize {
        let event = Event {
            kind: EventKind::Click,
            target,
        };
        self.doc
            .actions(target, EventKind::Click)
            .into_iter()
            .filter_map(|action| match action {
                Action::ToggleComments(post_id) => {
                    toggle::toggle_comments(&mut self.doc, Some(&event), post_id)
                }
                Action::SelectUser => None,
            })
            .count()
    }

    /// The button for `post_id`, if that post is on the page.
    pub fn comments_button(&self, post_id: u32) -> Option<NodeId> {
        self.doc
            .find_by_data(self.main, "button", render::POST_ID_KEY, &post_id.to_string())
    }

    pub fn html(&self) -> String {
        self.doc.to_html(self.doc.root())
    }

    /// The page as a complete HTML document.
    pub fn shell(&self, title: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (title) }
                    style { "." (toggle::HIDDEN_CLASS) " { display: none; }" }
                }
                body {
                    (PreEscaped(self.html()))
                }
            }
        }
    }
}
