use axum::extract::State;
use axum::response::Response;
use axum::Form;
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::session::SessionData;
use crate::db::models::User;
use crate::db::user_repository::UserRepository;
use crate::error::AppError;
use crate::routes::found;

/// Built-in demo user definition.
#[derive(Debug, Clone)]
pub struct DemoUser {
    pub id: i64,
    pub username: &'static str,
    pub password: &'static str,
    pub name: &'static str,
}

/// The hard-coded demo users available when `DEMO_MODE=true`.
pub const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: 5,
        username: "alice",
        password: "alice",
        name: "Alice Demo",
    },
    DemoUser {
        id: 7,
        username: "bob",
        password: "bob",
        name: "Bob Demo",
    },
];

impl DemoUser {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            name: self.name.to_string(),
            workplace_id: None,
        }
    }
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Validate demo credentials and return the corresponding user.
pub fn authenticate_demo_user(username: &str, password: &str) -> Result<&'static DemoUser, AppError> {
    DEMO_USERS
        .iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or_else(|| AppError::Auth("Invalid username or password".into()))
}

/// Resolve the demo user and make sure it exists in the user store.
///
/// An existing record is returned untouched so a linked `workplace_id`
/// survives logging in again.
pub async fn process_demo_login(
    users: &dyn UserRepository,
    form: &LoginForm,
) -> Result<User, AppError> {
    let demo = authenticate_demo_user(&form.username, &form.password)?;

    if let Some(existing) = users.find_by_id(demo.id).await? {
        return Ok(existing);
    }

    let user = demo.to_user();
    users.save(&user).await?;
    Ok(user)
}

/// `POST /login` — Demo login handler.
///
/// Stands in for the identity provider. Answers 404 unless demo mode is on.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(PrivateCookieJar, Response), AppError> {
    if !state.demo_mode {
        return Err(AppError::NotFound("Demo login is disabled".into()));
    }

    let user = process_demo_login(state.user_repo.as_ref(), &form).await?;
    tracing::info!(user_id = user.id, "Demo user logged in");

    let mut session = SessionData::from_jar(&jar);
    session.user_id = Some(user.id);
    let jar = session.store(jar)?;

    Ok((jar, found("/documents")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user_repository::MockUserRepository;
    use mockall::predicate::eq;

    fn form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_authenticate_demo_user_success() {
        let user = authenticate_demo_user("alice", "alice").unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.name, "Alice Demo");
    }

    #[test]
    fn test_wrong_password() {
        assert!(authenticate_demo_user("alice", "wrong").is_err());
    }

    #[test]
    fn test_unknown_user() {
        assert!(authenticate_demo_user("nobody", "nothing").is_err());
    }

    #[tokio::test]
    async fn test_login_creates_missing_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(7)).returning(|_| Ok(None));
        users
            .expect_save()
            .withf(|u| u.id == 7 && u.name == "Bob Demo")
            .times(1)
            .returning(|_| Ok(()));

        let user = process_demo_login(&users, &form("bob", "bob")).await.unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn test_login_keeps_existing_link() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(5)).returning(|_| {
            Ok(Some(User {
                id: 5,
                name: "Alice Demo".to_string(),
                workplace_id: Some("ext1".to_string()),
            }))
        });
        users.expect_save().never();

        let user = process_demo_login(&users, &form("alice", "alice")).await.unwrap();
        assert_eq!(user.workplace_id.as_deref(), Some("ext1"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_before_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        match process_demo_login(&users, &form("alice", "nope")).await.unwrap_err() {
            AppError::Auth(msg) => assert!(msg.contains("Invalid username or password")),
            other => panic!("Expected Auth error, got: {:?}", other),
        }
    }
}
