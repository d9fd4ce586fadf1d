#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use worklink::app::{build_router, AppState};
use worklink::auth::session::derive_key;
use worklink::db::community_repository::CommunityRepository;
use worklink::db::models::{Community, Document, NewDocument, Privacy, User};
use worklink::db::repository::DocumentRepository;
use worklink::db::user_repository::UserRepository;
use worklink::error::AppError;
use worklink::messaging::client::MessagingService;

pub const APP_SECRET: &str = "test-app-secret";
pub const SESSION_SECRET: &str = "test-session-secret-with-enough-bytes";

// -- In-memory gateways --

/// Stores every entity in memory. Writes can be made to fail to exercise
/// upstream error paths.
#[derive(Default)]
pub struct MemoryStore {
    pub documents: Mutex<Vec<Document>>,
    pub users: Mutex<Vec<User>>,
    pub communities: Mutex<Vec<Community>>,
    next_document_id: AtomicI64,
    pub fail_user_saves: AtomicBool,
}

impl MemoryStore {
    pub fn add_user(&self, id: i64, name: &str) {
        self.users.lock().unwrap().push(User {
            id,
            name: name.to_string(),
            workplace_id: None,
        });
    }

    pub fn add_community(&self, id: i64, name: &str) {
        self.communities.lock().unwrap().push(Community {
            id,
            name: name.to_string(),
        });
    }

    /// Insert a document directly, with an explicit id and age.
    pub fn add_document(&self, id: i64, privacy: &str, owner_id: i64, minutes_ago: i64) {
        self.documents.lock().unwrap().push(Document {
            id,
            name: format!("Document {id}"),
            content: format!("Content of document {id}"),
            privacy: Privacy::from(privacy),
            owner_id,
            updated_at: Utc::now() - Duration::minutes(minutes_ago),
        });
    }

    pub fn user(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn create(&self, new: NewDocument) -> Result<Document, AppError> {
        let id = 1000 + self.next_document_id.fetch_add(1, Ordering::SeqCst);
        let doc = Document {
            id,
            name: new.name,
            content: new.content,
            privacy: new.privacy,
            owner_id: new.owner_id,
            updated_at: Utc::now(),
        };
        self.documents.lock().unwrap().push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, AppError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn list_visible_to(&self, user_id: i64) -> Result<Vec<Document>, AppError> {
        let mut docs: Vec<Document> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_listed_for(user_id))
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.user(id))
    }

    async fn find_by_workplace_id(&self, workplace_id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.workplace_id.as_deref() == Some(workplace_id))
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        if self.fail_user_saves.load(Ordering::SeqCst) {
            return Err(AppError::Database("simulated write failure".into()));
        }
        let mut users = self.users.lock().unwrap();
        users.retain(|u| u.id != user.id);
        users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl CommunityRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, AppError> {
        Ok(self
            .communities
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_or_update(&self, community: &Community) -> Result<(), AppError> {
        let mut communities = self.communities.lock().unwrap();
        communities.retain(|c| c.id != community.id);
        communities.push(community.clone());
        Ok(())
    }
}

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl MessagingService for RecordingMessenger {
    async fn post_message(&self, target: &str, content: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Messaging("platform unavailable".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((target.to_string(), content.to_string()));
        Ok(())
    }
}

// -- Test environment --

pub struct TestEnv {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub messenger: Arc<RecordingMessenger>,
}

impl TestEnv {
    /// Build a router over fresh in-memory gateways, with demo login enabled
    /// and the demo users (alice = 5, bob = 7) present.
    pub fn start() -> Self {
        let store = Arc::new(MemoryStore::default());
        store.add_user(5, "Alice Demo");
        store.add_user(7, "Bob Demo");
        let messenger = Arc::new(RecordingMessenger::default());

        let app_state = AppState {
            document_repo: store.clone(),
            user_repo: store.clone(),
            community_repo: store.clone(),
            messaging: messenger.clone(),
            cookie_key: derive_key(SESSION_SECRET),
            app_secret: APP_SECRET.to_string(),
            signed_request_max_age: Duration::minutes(5),
            demo_mode: true,
        };

        Self {
            router: build_router(app_state),
            store,
            messenger,
        }
    }

    /// A `TestServer` that keeps cookies between requests.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .build(self.router.clone())
    }
}

/// Log in through the demo login form.
pub async fn login(server: &axum_test::TestServer, username: &str) {
    server
        .post("/login")
        .form(&[("username", username), ("password", username)])
        .await
        .assert_status(axum::http::StatusCode::FOUND);
}

/// Build a signed request the way the workplace platform does.
pub fn sign_payload(payload: &serde_json::Value, app_secret: &str) -> String {
    let encoded_payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    let mut mac = Hmac::<Sha256>::new_from_slice(app_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(encoded_payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{signature}.{encoded_payload}")
}

/// Sign a payload with the test app secret, issued `age` ago.
pub fn signed_request_issued(
    community_id: i64,
    user_id: &str,
    redirect: &str,
    age: Duration,
) -> String {
    sign_payload(
        &serde_json::json!({
            "algorithm": "HMAC-SHA256",
            "community_id": community_id,
            "user_id": user_id,
            "redirect": redirect,
            "issued_at": (Utc::now() - age).timestamp()
        }),
        APP_SECRET,
    )
}

/// Sign a fresh payload with the test app secret.
pub fn signed_request(community_id: i64, user_id: &str, redirect: &str) -> String {
    signed_request_issued(community_id, user_id, redirect, Duration::zero())
}

/// Store a signed request in the session through `/link_account`.
pub async fn receive_signed_request(
    server: &axum_test::TestServer,
    community_id: i64,
    user_id: &str,
    redirect: &str,
) {
    server
        .get("/link_account")
        .add_query_param("signed_request", signed_request(community_id, user_id, redirect))
        .await
        .assert_status(axum::http::StatusCode::FOUND);
}
