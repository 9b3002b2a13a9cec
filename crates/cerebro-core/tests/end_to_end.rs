//! Full client flows against an in-process Cerebro service.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use cerebro_core::storage::TOKEN_KEY;
use cerebro_core::{
    ApiClient, AuthError, Cerebro, FileStore, KeyValueStore, MemoryStore, SearchError,
    ThemePreference, ViewState,
};
use chrono::{Duration, Utc};
use common::FakeService;

fn service() -> Arc<FakeService> {
    Arc::new(FakeService::new().with_user("alice", "alice@example.com", "wonderland"))
}

fn client_on(store: &MemoryStore) -> Cerebro {
    Cerebro::restore(Arc::new(store.clone()), ThemePreference::Dark)
}

#[tokio::test]
async fn login_search_then_find_it_in_history() {
    let server = service();
    let api = ApiClient::new(server.clone());
    let store = MemoryStore::new();
    let mut client = client_on(&store);
    assert_eq!(client.view(), ViewState::LoggedOutLogin);

    client.login(&api, "alice", "wonderland").await.unwrap();
    assert_eq!(client.view(), ViewState::LoggedInSearch);
    assert!(store.get(TOKEN_KEY).unwrap().is_some());

    let result = client.search(&api, "rust ownership").await.unwrap().unwrap();
    assert_eq!(result.ai_answer, "Answer about rust ownership");
    assert_eq!(result.web_results.len(), 3);

    let ticket = client.open_history().unwrap();
    assert_eq!(client.view(), ViewState::LoggedInHistory);
    let fetched = api.queries(ticket.query, ticket.token.as_deref()).await;
    client.finish_history(&ticket, fetched);

    let entries = client.history().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].query_text, "rust ownership");
    assert!(entries[0].created_at <= Utc::now());
}

#[tokio::test]
async fn wrong_password_stays_logged_out() {
    let api = ApiClient::new(service());
    let store = MemoryStore::new();
    let mut client = client_on(&store);

    let err = client.login(&api, "alice", "nope").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials(_)));
    assert_eq!(client.view(), ViewState::LoggedOutLogin);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn signup_then_login_and_duplicate_rejected() {
    let api = ApiClient::new(service());
    let mut client = client_on(&MemoryStore::new());

    client.show_signup().unwrap();
    client
        .signup(&api, "bob", "bob@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(client.view(), ViewState::LoggedOutLogin);
    assert!(!client.is_authenticated());
    assert!(client.notice().is_some());

    client.show_signup().unwrap();
    let err = client
        .signup(&api, "carol", "bob@example.com", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::RegistrationFailed(_)));
    assert_eq!(client.view(), ViewState::LoggedOutSignup);

    client.show_login().unwrap();
    client.login(&api, "bob", "hunter22").await.unwrap();
    assert_eq!(client.user().unwrap().username, "bob");
}

#[tokio::test]
async fn login_from_signup_screen_is_refused() {
    let server = service();
    let api = ApiClient::new(server.clone());
    let store = MemoryStore::new();
    let mut client = client_on(&store);
    client.show_signup().unwrap();

    let err = client.login(&api, "alice", "wonderland").await.unwrap_err();
    assert_eq!(err, AuthError::NotOnLoginScreen);
    assert!(!client.is_authenticated());
    assert_eq!(client.view(), ViewState::LoggedOutSignup);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn history_window_and_pages() {
    let server = service();
    for i in 0..15 {
        server.seed_query("alice", &format!("recent {i}"), Duration::hours(i + 1));
    }
    for i in 0..4 {
        server.seed_query("alice", &format!("older {i}"), Duration::days(20 + i));
    }
    server.seed_query("mallory", "not yours", Duration::hours(1));

    let api = ApiClient::new(server.clone());
    let mut client = client_on(&MemoryStore::new());
    client.login(&api, "alice", "wonderland").await.unwrap();

    let week = client.fetch_history(&api, 7, 1, 10).await.unwrap();
    assert_eq!(week.len(), 10);
    let cutoff = Utc::now() - Duration::days(7);
    assert!(week.iter().all(|e| e.created_at >= cutoff));
    assert!(week.iter().all(|e| e.query_text.starts_with("recent")));
    assert!(week.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let first: HashSet<String> = client
        .fetch_history(&api, 30, 1, 10)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id.clone())
        .collect();
    let second: HashSet<String> = client
        .fetch_history(&api, 30, 2, 10)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id.clone())
        .collect();
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 9);
    assert!(first.is_disjoint(&second));

    let beyond = client.fetch_history(&api, 30, 3, 10).await.unwrap();
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn revoked_token_logs_the_user_out() {
    let server = service();
    let api = ApiClient::new(server.clone());
    let store = MemoryStore::new();
    let mut client = client_on(&store);
    client.login(&api, "alice", "wonderland").await.unwrap();
    client.search(&api, "first").await.unwrap();

    server.revoke_tokens();
    let err = client.search(&api, "second").await.unwrap_err();
    assert_eq!(err, SearchError::SessionExpired);
    assert_eq!(client.view(), ViewState::LoggedOutLogin);
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert!(client.search_result().is_none());
}

#[tokio::test]
async fn superseded_search_does_not_overwrite() {
    let api = ApiClient::new(service());
    let mut client = client_on(&MemoryStore::new());
    client.login(&api, "alice", "wonderland").await.unwrap();

    let early = client.begin_search("early").unwrap();
    let late = client.begin_search("late").unwrap();
    let late_result = api.search(&late.query, late.token.as_deref()).await;
    let early_result = api.search(&early.query, early.token.as_deref()).await;

    client.finish_search(&late, late_result);
    client.finish_search(&early, early_result);
    assert_eq!(client.search_result().unwrap().ai_answer, "Answer about late");
}

#[tokio::test]
async fn session_survives_restart_until_logout() {
    let dir = tempfile::tempdir().unwrap();
    let api = ApiClient::new(service());

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
        let mut client = Cerebro::restore(store, ThemePreference::Dark);
        client.login(&api, "alice", "wonderland").await.unwrap();
        client.toggle_theme();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let mut client = Cerebro::restore(store.clone(), ThemePreference::Dark);
    assert_eq!(client.view(), ViewState::LoggedInSearch);
    assert_eq!(client.theme(), ThemePreference::Light);
    client.search(&api, "still here").await.unwrap();

    client.logout();
    let client = Cerebro::restore(store, ThemePreference::Dark);
    assert_eq!(client.view(), ViewState::LoggedOutLogin);
    assert_eq!(client.theme(), ThemePreference::Light);
}
