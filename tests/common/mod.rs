#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use fitness_center::api::{create_routes, AppState};
use fitness_center::models::*;
use fitness_center::services::{
    MemberRepository, StorageError, StorageResult, WorkoutSessionRepository,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Once};
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

#[derive(Default)]
struct Tables {
    members: BTreeMap<i32, Member>,
    sessions: BTreeMap<i32, WorkoutSession>,
    last_member_id: i32,
    last_session_id: i32,
}

/// Repository double with the same constraints as the real schema: unique
/// emails, a foreign key from sessions to members and cascading deletes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_count(&self) -> usize {
        self.tables.lock().unwrap().members.len()
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().unwrap().sessions.len()
    }

    pub fn session(&self, session_id: i32) -> Option<WorkoutSession> {
        self.tables.lock().unwrap().sessions.get(&session_id).cloned()
    }
}

fn constraint_violation(message: &str) -> StorageError {
    StorageError::Query(sqlx::Error::Protocol(message.to_string()))
}

fn email_taken(tables: &Tables, email: Option<&str>, except: Option<i32>) -> bool {
    email.is_some_and(|email| {
        tables
            .members
            .values()
            .any(|m| Some(m.id) != except && m.email.as_deref() == Some(email))
    })
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn create(&self, member: NewMember) -> StorageResult<i32> {
        let mut tables = self.tables.lock().unwrap();
        if email_taken(&tables, member.email.as_deref(), None) {
            return Err(constraint_violation("duplicate key value violates unique constraint"));
        }

        tables.last_member_id += 1;
        let id = tables.last_member_id;
        tables.members.insert(id, member.into_member(id));
        Ok(id)
    }

    async fn list(&self) -> StorageResult<Vec<Member>> {
        Ok(self.tables.lock().unwrap().members.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> StorageResult<Option<Member>> {
        Ok(self.tables.lock().unwrap().members.get(&id).cloned())
    }

    async fn replace(&self, id: i32, update: MemberUpdate) -> StorageResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        if email_taken(&tables, update.email.as_deref(), Some(id)) {
            return Err(constraint_violation("duplicate key value violates unique constraint"));
        }

        match tables.members.get_mut(&id) {
            Some(member) => {
                update.apply_to(member);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> StorageResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        if tables.members.remove(&id).is_none() {
            return Ok(false);
        }
        tables.sessions.retain(|_, session| session.member_id != Some(id));
        Ok(true)
    }
}

#[async_trait]
impl WorkoutSessionRepository for InMemoryStore {
    async fn create(&self, session: NewWorkoutSession) -> StorageResult<i32> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.members.contains_key(&session.member_id) {
            return Err(constraint_violation("violates foreign key constraint"));
        }

        tables.last_session_id += 1;
        let session_id = tables.last_session_id;
        tables.sessions.insert(session_id, session.into_session(session_id));
        Ok(session_id)
    }

    async fn list_by_member(&self, member_id: i32) -> StorageResult<Vec<WorkoutSession>> {
        let tables = self.tables.lock().unwrap();
        let mut sessions: Vec<WorkoutSession> = tables
            .sessions
            .values()
            .filter(|s| s.member_id == Some(member_id))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.session_date, s.session_id));
        Ok(sessions)
    }

    async fn update_by_member_and_date(
        &self,
        member_id: i32,
        session_date: NaiveDate,
        changes: WorkoutSessionChanges,
    ) -> StorageResult<Option<WorkoutSession>> {
        let mut tables = self.tables.lock().unwrap();
        let stored = tables
            .sessions
            .values()
            .find(|s| s.member_id == Some(member_id) && s.session_date == Some(session_date))
            .cloned();

        Ok(stored.map(|stored| {
            let updated = changes.apply_to(&stored);
            tables.sessions.insert(updated.session_id, updated.clone());
            updated
        }))
    }
}

/// Router wired to a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        init_test_logging();

        let store = InMemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), Arc::new(store.clone()));

        Self {
            router: create_routes(state),
            store,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a member and returns its id.
    pub async fn create_member(&self, name: &str, age: i32) -> i32 {
        let (status, body) = self
            .post("/members", serde_json::json!({ "name": name, "age": age }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body["id"].as_i64().unwrap() as i32
    }

    /// Schedules a session and returns its id.
    pub async fn schedule_session(&self, body: Value) -> i32 {
        let (status, body) = self.post("/workout_sessions", body).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body["session_id"].as_i64().unwrap() as i32
    }
}
