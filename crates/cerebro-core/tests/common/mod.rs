//! In-process stand-in for the Cerebro service.
//!
//! Mirrors the server's observable contract: credentials as query params on
//! `/login`, 400 on duplicate signup, 401 on an unknown bearer token, history
//! filtered by window, newest first, 1-based paging.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use cerebro_core::NetworkError;
use cerebro_core::api::{HttpRequest, HttpResponse, Method, Transport};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

struct StoredQuery {
    id: String,
    user: String,
    query: String,
    answer: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    /// username -> (email, password)
    users: HashMap<String, (String, String)>,
    /// token -> username
    tokens: HashMap<String, String>,
    queries: Vec<StoredQuery>,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeService {
    state: Mutex<State>,
}

fn reply(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn param<'a>(request: &'a HttpRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, username: &str, email: &str, password: &str) -> Self {
        self.state.lock().unwrap().users.insert(
            username.to_string(),
            (email.to_string(), password.to_string()),
        );
        self
    }

    /// Store a past query `age` ago for `user`.
    pub fn seed_query(&self, user: &str, query: &str, age: Duration) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("q{:04}", state.next_id);
        state.queries.push(StoredQuery {
            id,
            user: user.to_string(),
            query: query.to_string(),
            answer: format!("Stored answer for {query}"),
            created_at: Utc::now() - age,
        });
    }

    /// Invalidate every issued token, as a server restart with a new key would.
    pub fn revoke_tokens(&self) {
        self.state.lock().unwrap().tokens.clear();
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        match (request.method, request.path.as_str()) {
            (Method::Post, "/login") => {
                let (Some(username), Some(password)) =
                    (param(request, "username"), param(request, "password"))
                else {
                    return reply(422, json!({"detail": "missing credentials"}));
                };
                let valid = matches!(
                    state.users.get(username),
                    Some((_, stored)) if stored == password
                );
                if !valid {
                    return reply(401, json!({"detail": "Incorrect username or password"}));
                }
                state.next_id += 1;
                let token = format!("token-{}", state.next_id);
                state.tokens.insert(token.clone(), username.to_string());
                reply(200, json!({"access_token": token, "token_type": "bearer"}))
            }
            (Method::Post, "/signup") => {
                let body = request.body.clone().unwrap_or(Value::Null);
                let username = body["username"].as_str().unwrap_or_default().to_string();
                let email = body["email"].as_str().unwrap_or_default().to_string();
                let password = body["password"].as_str().unwrap_or_default().to_string();
                let taken = state
                    .users
                    .iter()
                    .any(|(u, (e, _))| *u == username || *e == email);
                if taken {
                    return reply(400, json!({"detail": "Username or email already exists"}));
                }
                state.users.insert(username.clone(), (email.clone(), password));
                reply(200, json!({"username": username, "email": email}))
            }
            (Method::Post, "/search") => {
                let Some(user) = Self::authorize(&state, request) else {
                    return reply(401, json!({"detail": "Could not validate credentials"}));
                };
                let query = request
                    .body
                    .as_ref()
                    .and_then(|b| b["query"].as_str())
                    .unwrap_or_default()
                    .to_string();
                let web_results: Vec<Value> = (1..=3)
                    .map(|i| {
                        json!({
                            "title": format!("{query} - result {i}"),
                            "link": format!("https://example.com/{i}"),
                            "snippet": format!("snippet {i}"),
                        })
                    })
                    .collect();
                let answer = format!("Answer about {query}");
                state.next_id += 1;
                let id = format!("q{:04}", state.next_id);
                state.queries.push(StoredQuery {
                    id,
                    user,
                    query,
                    answer: answer.clone(),
                    created_at: Utc::now(),
                });
                reply(200, json!({"web_results": web_results, "ai_answer": answer}))
            }
            (Method::Get, "/queries") => {
                let Some(user) = Self::authorize(&state, request) else {
                    return reply(401, json!({"detail": "Could not validate credentials"}));
                };
                let num = |key: &str, default: i64| {
                    param(request, key)
                        .and_then(|v| v.parse::<i64>().ok())
                        .unwrap_or(default)
                };
                let days = num("days", 30);
                let page = num("page", 1).max(1);
                let page_size = num("page_size", 10).max(1);
                let threshold = Utc::now() - Duration::days(days);

                let mut matching: Vec<&StoredQuery> = state
                    .queries
                    .iter()
                    .filter(|q| q.user == user && q.created_at >= threshold)
                    .collect();
                matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let page_items: Vec<Value> = matching
                    .into_iter()
                    .skip(((page - 1) * page_size) as usize)
                    .take(page_size as usize)
                    .map(|q| {
                        json!({
                            "_id": q.id,
                            "user_id": q.user,
                            "query": q.query,
                            "web_results": [],
                            "ai_answer": q.answer,
                            "created_at": q.created_at.to_rfc3339(),
                        })
                    })
                    .collect();
                reply(200, Value::Array(page_items))
            }
            _ => reply(404, json!({"detail": "Not Found"})),
        }
    }

    fn authorize(state: &State, request: &HttpRequest) -> Option<String> {
        let token = request.bearer.as_ref()?;
        state.tokens.get(token).cloned()
    }
}

impl Transport for FakeService {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, NetworkError>> + Send + 'a>> {
        let response = self.handle(&request);
        Box::pin(async move { Ok(response) })
    }
}
