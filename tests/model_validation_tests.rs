use chrono::Utc;
use todo_api::models::{Account, AccountResponse, Role, Todo, TodoRequest};

// --- Test Utilities ---

fn sample_account(role: Role) -> Account {
    Account {
        id: 42,
        username: "alice".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        role,
        created_at: Utc::now(),
    }
}

fn sample_todo(description: &str) -> Todo {
    Todo {
        id: 1,
        title: "Buy milk".to_string(),
        description: description.to_string(),
        completed: false,
        user_id: 42,
        created_at: Utc::now(),
    }
}

// --- Tests ---

#[test]
fn test_account_json_never_contains_password_hash() {
    let json_output = serde_json::to_string(&sample_account(Role::User)).unwrap();

    assert!(!json_output.contains("password_hash"));
    assert!(!json_output.contains("argon2"));
    assert!(json_output.contains(r#""role":"user""#));
}

#[test]
fn test_account_response_projects_account() {
    let account = sample_account(Role::Admin);
    let created_at = account.created_at;

    let response = AccountResponse::from(account);

    assert_eq!(response.id, 42);
    assert_eq!(response.username, "alice");
    assert_eq!(response.role, Role::Admin);
    assert_eq!(response.created_at, created_at);
}

#[test]
fn test_todo_omits_empty_description() {
    let bare = serde_json::to_value(sample_todo("")).unwrap();
    assert!(bare.get("description").is_none());

    let described = serde_json::to_value(sample_todo("2 litres")).unwrap();
    assert_eq!(described["description"], "2 litres");
}

#[test]
fn test_todo_deserializes_without_description() {
    let todo: Todo = serde_json::from_value(serde_json::json!({
        "id": 1,
        "title": "Buy milk",
        "completed": true,
        "user_id": 42,
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .unwrap();

    assert_eq!(todo.description, "");
    assert!(todo.completed);
}

#[test]
fn test_role_serialization_is_lowercase() {
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
    assert!(serde_json::from_str::<Role>(r#""Admin""#).is_err());
}

#[test]
fn test_todo_request_defaults_and_ignores_owner() {
    let request: TodoRequest = serde_json::from_value(serde_json::json!({
        "title": "Buy milk",
        "user_id": 7,
        "id": 99
    }))
    .unwrap();

    assert_eq!(request.title, "Buy milk");
    assert_eq!(request.description, "");
    assert!(!request.completed);
}
