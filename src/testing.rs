//! In-memory stand-in for the remote API.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::fetch::Source;
use crate::serializable::*;

#[derive(Default)]
pub struct FakeSource {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    /// Calls naming one of these ids fail, as does `users()` when it holds 0.
    pub failing: HashSet<u32>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: u32, name: &str, company: &str, catch_phrase: &str) -> Self {
        self.users.push(User {
            id,
            name: name.to_string(),
            company: Company {
                name: company.to_string(),
                catch_phrase: catch_phrase.to_string(),
                ..Company::default()
            },
            ..User::default()
        });
        self
    }

    pub fn with_post(mut self, id: u32, user_id: u32, title: &str, body: &str) -> Self {
        self.posts.push(Post {
            id,
            user_id,
            title: title.to_string(),
            body: body.to_string(),
        });
        self
    }

    pub fn with_comment(mut self, id: u32, post_id: u32, name: &str, email: &str, body: &str) -> Self {
        self.comments.push(Comment {
            id,
            post_id,
            name: name.to_string(),
            email: email.to_string(),
            body: body.to_string(),
        });
        self
    }

    pub fn failing(mut self, id: u32) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let failed = call
            .rsplit(':')
            .next()
            .and_then(|id| id.parse::<u32>().ok())
            .is_some_and(|id| self.failing.contains(&id));
        self.calls.lock().unwrap().push(call.clone());
        if failed {
            return Err(Error::Config(format!("{call} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl Source for FakeSource {
    async fn users(&self) -> Result<Vec<User>> {
        self.record("users:0".to_string())?;
        Ok(self.users.clone())
    }

    async fn user(&self, id: u32) -> Result<Option<User>> {
        if id == 0 {
            return Ok(None);
        }
        self.record(format!("user:{id}"))?;
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_posts(&self, user_id: u32) -> Result<Vec<Post>> {
        if user_id == 0 {
            return Ok(Vec::new());
        }
        self.record(format!("posts:{user_id}"))?;
        Ok(self.posts.iter().filter(|p| p.user_id == user_id).cloned().collect())
    }

    async fn post_comments(&self, post_id: u32) -> Result<Vec<Comment>> {
        if post_id == 0 {
            return Ok(Vec::new());
        }
        self.record(format!("comments:{post_id}"))?;
        Ok(self.comments.iter().filter(|c| c.post_id == post_id).cloned().collect())
    }
}
