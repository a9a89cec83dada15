use crate::dom::{Document, NodeId};
use crate::error::OrLog;
use crate::fetch::Source;
use crate::serializable::*;
use crate::toggle::{HIDDEN_CLASS, SHOW_LABEL};

pub const POST_ID_KEY: &str = "postId";
pub const PLACEHOLDER_CLASS: &str = "default-text";
pub const NO_POSTS_TEXT: &str = "No posts available";
pub const UNKNOWN_AUTHOR_TEXT: &str = "Author: unknown";

/// Creates a detached `tag` element holding `text`.
pub fn make_element(doc: &mut Document, tag: &str, text: &str, class_name: Option<&str>) -> NodeId {
    let element = doc.create_element(tag);
    doc.set_text_content(element, text);
    if let Some(class_name) = class_name.filter(|c| !c.is_empty()) {
        doc.set_class_name(element, class_name);
    }
    element
}

pub fn select_options(doc: &mut Document, users: &[User]) -> Vec<NodeId> {
    users
        .iter()
        .map(|user| {
            let option = make_element(doc, "option", &user.name, None);
            doc.set_value(option, &user.id.to_string());
            option
        })
        .collect()
}

/// Appends one option per user to `select`.
pub fn populate_select(doc: &mut Document, select: NodeId, users: &[User]) -> Vec<NodeId> {
    let options = select_options(doc, users);
    doc.append_children(select, &options);
    options
}

pub fn comment_articles(doc: &mut Document, comments: &[Comment]) -> Vec<NodeId> {
    comments
        .iter()
        .map(|comment| {
            let article = doc.create_element("article");
            let heading = make_element(doc, "h3", &comment.name, None);
            let body = make_element(doc, "p", &comment.body, None);
            let from = make_element(doc, "p", &format!("From: {}", comment.email), None);
            doc.append_children(article, &[heading, body, from]);
            article
        })
        .collect()
}

/// Builds the hidden comment section for a post. `None` for post id 0.
pub async fn comment_section(doc: &mut Document, source: &dyn Source, post_id: u32) -> Option<NodeId> {
    if post_id == 0 {
        return None;
    }
    let section = doc.create_element("section");
    doc.set_data(section, POST_ID_KEY, &post_id.to_string());
    doc.class_add(section, "comments");
    doc.class_add(section, HIDDEN_CLASS);

    let comments = source
        .post_comments(post_id)
        .await
        .or_log(&format!("comments for post {post_id}"));
    let articles = comment_articles(doc, &comments);
    doc.append_children(section, &articles);
    Some(section)
}

/// One article per post, in order. Author and comments are fetched one post
/// at a time; a missing author still renders the post with placeholder text.
pub async fn post_articles(doc: &mut Document, source: &dyn Source, posts: &[Post]) -> Vec<NodeId> {
    let mut articles = Vec::with_capacity(posts.len());
    for post in posts {
        let article = doc.create_element("article");
        let title = make_element(doc, "h2", &post.title, None);
        let body = make_element(doc, "p", &post.body, None);
        let id_line = make_element(doc, "p", &format!("Post ID: {}", post.id), None);

        let author = source
            .user(post.user_id)
            .await
            .or_log(&format!("author {} of post {}", post.user_id, post.id));
        let (author_text, catch_phrase) = match &author {
            Some(user) => (user.author_line(), user.company.catch_phrase.as_str()),
            None => {
                tracing::warn!(post = post.id, user = post.user_id, "rendering post without author");
                (UNKNOWN_AUTHOR_TEXT.to_string(), "")
            }
        };
        let author_line = make_element(doc, "p", &author_text, None);
        let catch_line = make_element(doc, "p", catch_phrase, None);

        let button = make_element(doc, "button", SHOW_LABEL, None);
        doc.set_data(button, POST_ID_KEY, &post.id.to_string());

        doc.append_children(article, &[title, body, id_line, author_line, catch_line, button]);
        if let Some(section) = comment_section(doc, source, post.id).await {
            doc.append_child(article, section);
        }
        articles.push(article);
    }
    articles
}

/// Appends the rendered posts to `container`, or the placeholder paragraph
/// when there are none. Returns the appended nodes.
pub async fn display_posts(doc: &mut Document, source: &dyn Source, container: NodeId, posts: &[Post]) -> Vec<NodeId> {
    let nodes = if posts.is_empty() {
        vec![make_element(doc, "p", NO_POSTS_TEXT, Some(PLACEHOLDER_CLASS))]
    } else {
        post_articles(doc, source, posts).await
    };
    doc.append_children(container, &nodes);
    nodes
}
