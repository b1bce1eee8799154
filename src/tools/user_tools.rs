//! User-record tools: lookup, search, create, update, delete.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::user_client::UserService;
use super::user_models::{UserCreate, UserSearch, UserUpdate};
use super::{describe_outcome, Tool};

/// Read a user id. Accepts integers, integral floats and numeric strings.
fn user_id(args: &Value, key: &str) -> anyhow::Result<u64> {
    let value = args
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", key))?;

    if let Some(id) = value.as_u64() {
        return Ok(id);
    }
    if let Some(f) = value.as_f64() {
        if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
            return Ok(f as u64);
        }
    }
    if let Some(s) = value.as_str() {
        if let Ok(id) = s.trim().parse::<u64>() {
            return Ok(id);
        }
    }
    anyhow::bail!("Invalid '{}' argument: {}", key, value)
}

fn id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "number",
                "description": description
            }
        },
        "required": ["id"]
    })
}

/// Fetch one user by id.
pub struct GetUserById {
    users: Arc<dyn UserService>,
}

impl GetUserById {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Tool for GetUserById {
    fn name(&self) -> &str {
        "get_user_by_id"
    }

    fn description(&self) -> &str {
        "Retrieves full user information by user ID. Use this when you need detailed information about a specific user."
    }

    fn parameters_schema(&self) -> Value {
        id_schema("User ID")
    }

    async fn execute(&self, args: Value) -> String {
        let result = async {
            let id = user_id(&args, "id")?;
            self.users.get_user(id).await
        }
        .await;
        describe_outcome(result, "Error while retrieving user by id: ")
    }
}

/// Search users by optional filters.
pub struct SearchUsers {
    users: Arc<dyn UserService>,
}

impl SearchUsers {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Tool for SearchUsers {
    fn name(&self) -> &str {
        "search_users"
    }

    fn description(&self) -> &str {
        "Search for users by name, surname, email, or gender. All parameters are optional. Returns a list of matching users."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "User's first name to search for"
                },
                "surname": {
                    "type": "string",
                    "description": "User's last name to search for"
                },
                "email": {
                    "type": "string",
                    "description": "User's email to search for"
                },
                "gender": {
                    "type": "string",
                    "description": "User's gender to filter by"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> String {
        let result = async {
            let filter: UserSearch = serde_json::from_value(args)?;
            self.users.search_users(&filter).await
        }
        .await;
        describe_outcome(result, "Error while searching users: ")
    }
}

/// Create a user.
pub struct CreateUser {
    users: Arc<dyn UserService>,
}

impl CreateUser {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Tool for CreateUser {
    fn name(&self) -> &str {
        "add_user"
    }

    fn description(&self) -> &str {
        "Creates a new user in the system. Required fields are name, surname, email, and about_me. Optional fields include phone, date_of_birth, address, gender, company, salary, and credit_card."
    }

    fn parameters_schema(&self) -> Value {
        UserCreate::json_schema()
    }

    async fn execute(&self, args: Value) -> String {
        let result = async {
            let user: UserCreate = serde_json::from_value(args)?;
            self.users.add_user(&user).await
        }
        .await;
        describe_outcome(result, "Error while creating a new user: ")
    }
}

/// Partially update a user.
pub struct UpdateUser {
    users: Arc<dyn UserService>,
}

impl UpdateUser {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Tool for UpdateUser {
    fn name(&self) -> &str {
        "update_user"
    }

    fn description(&self) -> &str {
        "Updates an existing user's information by user ID. All fields in new_info are optional - only provided fields will be updated."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "number",
                    "description": "User ID that should be updated"
                },
                "new_info": UserUpdate::json_schema()
            },
            "required": ["id", "new_info"]
        })
    }

    async fn execute(&self, args: Value) -> String {
        let result = async {
            let id = user_id(&args, "id")?;
            let new_info = args
                .get("new_info")
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Missing 'new_info' argument"))?;
            let update: UserUpdate =
                serde_json::from_value(new_info).context("Invalid 'new_info' argument")?;
            self.users.update_user(id, &update).await
        }
        .await;
        describe_outcome(result, "Error while updating user: ")
    }
}

/// Delete a user.
pub struct DeleteUser {
    users: Arc<dyn UserService>,
}

impl DeleteUser {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Tool for DeleteUser {
    fn name(&self) -> &str {
        "delete_user"
    }

    fn description(&self) -> &str {
        "Deletes a user from the system by user ID. This action is permanent and cannot be undone."
    }

    fn parameters_schema(&self) -> Value {
        id_schema("User ID to delete")
    }

    async fn execute(&self, args: Value) -> String {
        let result = async {
            let id = user_id(&args, "id")?;
            self.users.delete_user(id).await
        }
        .await;
        describe_outcome(result, "Error while deleting user by id: ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory user store recording every call it receives.
    #[derive(Default)]
    pub(crate) struct MemoryUsers {
        pub users: Mutex<BTreeMap<u64, Value>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MemoryUsers {
        pub(crate) fn with_user(id: u64, user: Value) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().insert(id, user);
            store
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl UserService for MemoryUsers {
        async fn get_user(&self, id: u64) -> anyhow::Result<String> {
            self.record(format!("get {}", id));
            self.users
                .lock()
                .unwrap()
                .get(&id)
                .map(|u| u.to_string())
                .ok_or_else(|| anyhow::anyhow!("HTTP 404: User with id {} not found", id))
        }

        async fn search_users(&self, filter: &UserSearch) -> anyhow::Result<String> {
            self.record(format!("search {:?}", filter.query_pairs()));
            let users = self.users.lock().unwrap();
            let found: Vec<_> = users
                .values()
                .filter(|u| {
                    filter
                        .query_pairs()
                        .iter()
                        .all(|(k, v)| u.get(*k).and_then(Value::as_str) == Some(*v))
                })
                .collect();
            Ok(format!("Found {} users", found.len()))
        }

        async fn add_user(&self, user: &UserCreate) -> anyhow::Result<String> {
            self.record(format!("add {}", user.email));
            let mut users = self.users.lock().unwrap();
            let id = users.keys().max().copied().unwrap_or(0) + 1;
            users.insert(id, serde_json::to_value(user)?);
            Ok(format!("User successfully added: {}", id))
        }

        async fn update_user(&self, id: u64, update: &UserUpdate) -> anyhow::Result<String> {
            self.record(format!("update {}", id));
            let mut users = self.users.lock().unwrap();
            let user = users
                .get_mut(&id)
                .ok_or_else(|| anyhow::anyhow!("HTTP 404: User with id {} not found", id))?;
            if let (Some(target), Value::Object(fields)) =
                (user.as_object_mut(), serde_json::to_value(update)?)
            {
                target.extend(fields);
            }
            Ok(format!("User successfully updated: {}", user))
        }

        async fn delete_user(&self, id: u64) -> anyhow::Result<String> {
            self.record(format!("delete {}", id));
            self.users
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| "User successfully deleted".to_string())
                .ok_or_else(|| anyhow::anyhow!("HTTP 404: User with id {} not found", id))
        }
    }

    fn john() -> Value {
        json!({"name": "John", "surname": "Doe", "email": "john@example.com", "gender": "male"})
    }

    #[test]
    fn user_id_accepts_numeric_forms() {
        assert_eq!(user_id(&json!({"id": 1}), "id").unwrap(), 1);
        assert_eq!(user_id(&json!({"id": 2.0}), "id").unwrap(), 2);
        assert_eq!(user_id(&json!({"id": " 3 "}), "id").unwrap(), 3);
        assert!(user_id(&json!({"id": 1.5}), "id").is_err());
        assert!(user_id(&json!({"id": -4}), "id").is_err());
        // 2^64 does not fit and must not saturate to u64::MAX.
        assert!(user_id(&json!({"id": 18446744073709551616.0_f64}), "id").is_err());
        assert!(user_id(&json!({"id": null}), "id").is_err());
        assert!(user_id(&json!({}), "id").is_err());
    }

    #[tokio::test]
    async fn get_user_by_id_returns_record() {
        let store = Arc::new(MemoryUsers::with_user(1, john()));
        let tool = GetUserById::new(store.clone());
        let out = tool.execute(json!({"id": 1})).await;
        assert!(out.contains("John"));
        assert_eq!(store.calls.lock().unwrap().as_slice(), ["get 1"]);
    }

    #[tokio::test]
    async fn get_user_by_id_missing_argument() {
        let tool = GetUserById::new(Arc::new(MemoryUsers::default()));
        assert_eq!(
            tool.execute(json!({})).await,
            "Error while retrieving user by id: Missing 'id' argument"
        );
    }

    #[tokio::test]
    async fn delete_unknown_user_reports_error() {
        let tool = DeleteUser::new(Arc::new(MemoryUsers::default()));
        let out = tool.execute(json!({"id": 999})).await;
        assert!(out.starts_with("Error while deleting user by id:"));
        assert!(out.contains("999"));
    }

    #[tokio::test]
    async fn delete_existing_user() {
        let store = Arc::new(MemoryUsers::with_user(5, john()));
        let tool = DeleteUser::new(store.clone());
        assert_eq!(
            tool.execute(json!({"id": 5})).await,
            "User successfully deleted"
        );
        assert!(store.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_filters_and_rejects_unknown_keys() {
        let store = Arc::new(MemoryUsers::with_user(1, john()));
        let tool = SearchUsers::new(store.clone());
        assert_eq!(
            tool.execute(json!({"name": "John"})).await,
            "Found 1 users"
        );
        assert_eq!(tool.execute(json!({})).await, "Found 1 users");

        let out = tool.execute(json!({"age": 40})).await;
        assert!(out.starts_with("Error while searching users: "));
        assert_eq!(store.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_validates_before_calling_service() {
        let store = Arc::new(MemoryUsers::default());
        let tool = CreateUser::new(store.clone());

        let out = tool
            .execute(json!({"name": "Andrej", "surname": "Karpathy"}))
            .await;
        assert!(out.starts_with("Error while creating a new user: "));
        assert!(store.calls.lock().unwrap().is_empty());

        let out = tool
            .execute(json!({
                "name": "Andrej",
                "surname": "Karpathy",
                "email": "andrej.karpathy@example.com",
                "about_me": "AI researcher"
            }))
            .await;
        assert_eq!(out, "User successfully added: 1");
    }

    #[tokio::test]
    async fn update_applies_partial_fields() {
        let store = Arc::new(MemoryUsers::with_user(1, john()));
        let tool = UpdateUser::new(store.clone());
        let out = tool
            .execute(json!({"id": 1, "new_info": {"company": "EPAM Systems"}}))
            .await;
        assert!(out.starts_with("User successfully updated: "));
        assert_eq!(
            store.users.lock().unwrap()[&1]["company"],
            json!("EPAM Systems")
        );
    }

    #[tokio::test]
    async fn update_requires_new_info() {
        let tool = UpdateUser::new(Arc::new(MemoryUsers::with_user(1, john())));
        assert_eq!(
            tool.execute(json!({"id": 1})).await,
            "Error while updating user: Missing 'new_info' argument"
        );
        let out = tool
            .execute(json!({"id": 1, "new_info": {"salary": "a lot"}}))
            .await;
        assert!(out.starts_with("Error while updating user: Invalid 'new_info' argument"));
    }

    #[test]
    fn schemas_mark_required_arguments() {
        let store: Arc<dyn UserService> = Arc::new(MemoryUsers::default());
        assert_eq!(
            GetUserById::new(store.clone()).parameters_schema()["required"],
            json!(["id"])
        );
        assert_eq!(
            UpdateUser::new(store.clone()).parameters_schema()["required"],
            json!(["id", "new_info"])
        );
        assert_eq!(
            SearchUsers::new(store).parameters_schema()["required"],
            json!([])
        );
    }
}
