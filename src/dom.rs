//! A small arena document: just enough DOM to build the page, flip classes,
//! and keep track of which handlers are registered on which node.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
}

/// What a registered handler does when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleComments(u32),
    SelectUser,
}

#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub kind: EventKind,
    pub target: NodeId,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag_name: String,
    pub attrs: BTreeMap<String, String>,
    pub value: String,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    kind: EventKind,
    action: Action,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    listeners: HashMap<NodeId, Vec<Listener>>,
    next_listener: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            listeners: HashMap::new(),
            next_listener: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(NodeKind::Element(Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            value: String::new(),
            disabled: false,
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) {
        for child in children {
            self.append_child(parent, *child);
        }
    }

    /// Detaches every child of `parent`. Listeners anywhere in the removed
    /// subtrees are dropped with them.
    ///
    /// Detached nodes keep their arena slots; ids are never reused, so the
    /// document grows by the size of each rendered subtree.
    pub fn clear_children(&mut self, parent: NodeId) -> usize {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in &children {
            for node in self.descendants(*child) {
                self.listeners.remove(&node);
            }
            self.listeners.remove(child);
            self.nodes[child.0].parent = None;
        }
        children.len()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Every node below `scope`, in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Document | NodeKind::Element(_) => self.nodes[node.0]
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(existing) = &mut self.nodes[node.0].kind {
            *existing = text.to_string();
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_data(&mut self, node: NodeId, key: &str, value: &str) {
        self.set_attr(node, &data_attr_name(key), value);
    }

    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attr(node, &data_attr_name(key))
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.value.as_str())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = value.to_string();
        }
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.disabled)
    }

    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(element) = self.element_mut(node) {
            element.disabled = disabled;
        }
    }

    pub fn class_contains(&self, node: NodeId, class_name: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    pub fn class_add(&mut self, node: NodeId, class_name: &str) {
        let mut classes = self.class_tokens(node);
        if !classes.iter().any(|c| c == class_name) {
            classes.push(class_name.to_string());
        }
        self.set_classes(node, &classes);
    }

    pub fn class_remove(&mut self, node: NodeId, class_name: &str) {
        let mut classes = self.class_tokens(node);
        classes.retain(|c| c != class_name);
        self.set_classes(node, &classes);
    }

    /// Returns whether the class is present afterwards.
    pub fn class_toggle(&mut self, node: NodeId, class_name: &str) -> bool {
        if self.class_contains(node, class_name) {
            self.class_remove(node, class_name);
            false
        } else {
            self.class_add(node, class_name);
            true
        }
    }

    pub fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        let classes: Vec<String> = class_name.split_whitespace().map(str::to_string).collect();
        self.set_classes(node, &classes);
    }

    fn class_tokens(&self, node: NodeId) -> Vec<String> {
        self.attr(node, "class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set_classes(&mut self, node: NodeId, classes: &[String]) {
        if let Some(element) = self.element_mut(node) {
            if classes.is_empty() {
                element.attrs.remove("class");
            } else {
                element.attrs.insert("class".to_string(), classes.join(" "));
            }
        }
    }

    /// First element in the whole document whose `id` attribute matches.
    #[cfg(test)]
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    pub fn elements_by_tag(&self, scope: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.tag_name(*node) == Some(tag_name))
            .collect()
    }

    /// Equivalent of `scope.querySelector("tag[data-key='value']")`.
    pub fn find_by_data(&self, scope: NodeId, tag_name: &str, key: &str, value: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|node| {
            self.tag_name(*node) == Some(tag_name) && self.data(*node, key) == Some(value)
        })
    }

    pub fn add_listener(&mut self, node: NodeId, kind: EventKind, action: Action) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners
            .entry(node)
            .or_default()
            .push(Listener { id, kind, action });
        id
    }

    pub fn remove_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&node) else {
            return false;
        };
        let Some(pos) = listeners.iter().position(|l| l.id == id) else {
            return false;
        };
        listeners.remove(pos);
        if listeners.is_empty() {
            self.listeners.remove(&node);
        }
        true
    }

    /// Actions registered for `kind` on `node`, in registration order.
    pub fn actions(&self, node: NodeId, kind: EventKind) -> Vec<Action> {
        self.listeners
            .get(&node)
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|l| l.kind == kind)
                    .map(|l| l.action)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.actions(node, kind).len()
    }

    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Document => {
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, out);
                }
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs = element.attrs.clone();
                if element.disabled {
                    attrs.insert("disabled".to_string(), String::new());
                }
                if !element.value.is_empty() {
                    attrs.insert("value".to_string(), element.value.clone());
                }
                for (name, value) in &attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');
                for child in &self.nodes[node.0].children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
            }
        }
    }
}

/// `postId` -> `data-post-id`
fn data_attr_name(key: &str) -> String {
    let mut name = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
