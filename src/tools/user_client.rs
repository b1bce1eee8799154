//! Client for the user-record REST service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use super::user_models::{UserCreate, UserSearch, UserUpdate};

/// Operations the user tools need from the user store.
///
/// Each call returns text meant for the model, or an error the calling tool
/// turns into text.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: u64) -> anyhow::Result<String>;
    async fn search_users(&self, filter: &UserSearch) -> anyhow::Result<String>;
    async fn add_user(&self, user: &UserCreate) -> anyhow::Result<String>;
    async fn update_user(&self, id: u64, update: &UserUpdate) -> anyhow::Result<String>;
    async fn delete_user(&self, id: u64) -> anyhow::Result<String>;
}

/// HTTP implementation of [`UserService`].
pub struct UserClient {
    base_url: String,
    client: Client,
}

impl UserClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn users_url(&self) -> String {
        format!("{}/v1/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/v1/users/{}", self.base_url, id)
    }
}

/// Fail on a non-success status, otherwise hand back the body text.
async fn success_body(response: Response) -> anyhow::Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        anyhow::bail!("HTTP {}: {}", status.as_u16(), body);
    }
    Ok(body)
}

/// Render a user object as a fenced `key: value` block.
fn render_user(user: &Value) -> String {
    let mut out = String::from("```\n");
    match user.as_object() {
        Some(fields) => {
            for (key, value) in fields {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out.push_str(&format!("  {}: {}\n", key, value));
            }
        }
        None => {
            out.push_str(&user.to_string());
            out.push('\n');
        }
    }
    out.push_str("```\n");
    out
}

fn render_users(users: &[Value]) -> String {
    let mut out = format!("Found {} users:\n", users.len());
    for user in users {
        out.push_str(&render_user(user));
    }
    out
}

#[async_trait]
impl UserService for UserClient {
    async fn get_user(&self, id: u64) -> anyhow::Result<String> {
        let response = self.client.get(self.user_url(id)).send().await?;
        let body = success_body(response).await?;
        let user: Value = serde_json::from_str(&body)?;
        Ok(render_user(&user))
    }

    async fn search_users(&self, filter: &UserSearch) -> anyhow::Result<String> {
        let response = self
            .client
            .get(format!("{}/search", self.users_url()))
            .query(&filter.query_pairs())
            .send()
            .await?;
        let body = success_body(response).await?;
        let users: Vec<Value> = serde_json::from_str(&body)?;
        Ok(render_users(&users))
    }

    async fn add_user(&self, user: &UserCreate) -> anyhow::Result<String> {
        let response = self.client.post(self.users_url()).json(user).send().await?;
        let body = success_body(response).await?;
        Ok(format!("User successfully added: {}", body))
    }

    async fn update_user(&self, id: u64, update: &UserUpdate) -> anyhow::Result<String> {
        let response = self.client.put(self.user_url(id)).json(update).send().await?;
        let body = success_body(response).await?;
        Ok(format!("User successfully updated: {}", body))
    }

    async fn delete_user(&self, id: u64) -> anyhow::Result<String> {
        let response = self.client.delete(self.user_url(id)).send().await?;
        success_body(response).await?;
        Ok("User successfully deleted".to_string())
    }
}
