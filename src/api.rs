//! HTTP client for the schedule backend.
//!
//! The backend is the single source of record; every function here is a
//! thin request/response wrapper with uniform error surfacing. Non-2xx
//! responses become an error built from the body's `message` field when
//! one is present, else an operation-specific fallback string. HTTP 204
//! carries no body. Nothing here updates local state; callers re-fetch
//! (bump the coordinator's refresh token) to observe a mutation's effect.

use anyhow::{Context, Result, bail};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use callboard_core::ScheduleRange;

use crate::config::Config;

const SCHEDULE_LOAD_ERROR: &str = "Не удалось загрузить расписание";
const EVENT_CREATE_ERROR: &str = "Не удалось создать событие";
const EVENT_DELETE_ERROR: &str = "Не удалось удалить событие";
const PARTICIPANT_ADD_ERROR: &str = "Не удалось назначить участника";
const USERS_LOAD_ERROR: &str = "Не удалось загрузить список пользователей";
const USER_CREATE_ERROR: &str = "Не удалось создать пользователя";
const USER_DELETE_ERROR: &str = "Не удалось удалить пользователя";

/// Query for GET /scheduleevents.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub range: ScheduleRange,
    pub participant_login: Option<String>,
}

impl EventQuery {
    pub fn range(range: ScheduleRange) -> Self {
        EventQuery {
            range,
            participant_login: None,
        }
    }
}

/// Body for POST /scheduleevents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    pub stage_id: String,
    pub production_id: Option<String>,
    pub title: String,
    pub event_type: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub color_hex: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_login: Option<String>,
    pub notes: Option<String>,
    pub created_by_login: String,
}

/// Body for POST /scheduleevents/{id}/participants.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    #[serde(skip_serializing)]
    pub event_id: String,
    pub user_login: String,
    pub responsibility: String,
    pub notes: Option<String>,
}

impl AddParticipantRequest {
    pub fn new(event_id: impl Into<String>, user_login: impl Into<String>) -> Self {
        AddParticipantRequest {
            event_id: event_id.into(),
            user_login: user_login.into(),
            responsibility: "participant".to_string(),
            notes: None,
        }
    }
}

/// Fields for POST /users (multipart form).
#[derive(Debug, Clone)]
pub struct NewUserForm {
    pub login: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub last_name: String,
    pub experience: String,
    pub role: String,
    pub photo: Option<PathBuf>,
}

/// The data the Schedule Data Coordinator reads. [`Api`] is the real
/// backend; tests substitute a stub.
pub trait ScheduleSource {
    fn fetch_stages(&self) -> impl Future<Output = Result<Vec<Value>>> + Send;
    fn fetch_events(&self, query: &EventQuery) -> impl Future<Output = Result<Vec<Value>>> + Send;
}

/// HTTP client for the schedule backend.
pub struct Api {
    http: reqwest::Client,
    base_url: String,
}

impl Api {
    pub fn new(config: &Config) -> Self {
        Api {
            http: reqwest::Client::new(),
            base_url: config.api_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /stages
    pub async fn get_stages(&self) -> Result<Vec<Value>> {
        let response = self
            .send(self.http.get(self.url("/stages")))
            .await
            .context(SCHEDULE_LOAD_ERROR)?;
        expect_json_array(response, SCHEDULE_LOAD_ERROR).await
    }

    /// GET /scheduleevents?from=..&to=..[&participantLogin=..]
    pub async fn get_schedule_events(&self, query: &EventQuery) -> Result<Vec<Value>> {
        let mut request = self.http.get(self.url("/scheduleevents")).query(&[
            ("from", query.range.from_key()),
            ("to", query.range.to_key()),
        ]);
        if let Some(login) = &query.participant_login {
            request = request.query(&[("participantLogin", login)]);
        }

        let response = self.send(request).await.context(SCHEDULE_LOAD_ERROR)?;
        expect_json_array(response, SCHEDULE_LOAD_ERROR).await
    }

    /// POST /scheduleevents
    pub async fn create_event(&self, event: &NewEventRequest) -> Result<Value> {
        let response = self
            .send(self.http.post(self.url("/scheduleevents")).json(event))
            .await
            .context(EVENT_CREATE_ERROR)?;
        expect_json(response, EVENT_CREATE_ERROR).await
    }

    /// DELETE /scheduleevents/{id}
    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        let response = self
            .send(self.http.delete(self.url(&format!("/scheduleevents/{event_id}"))))
            .await
            .context(EVENT_DELETE_ERROR)?;
        expect_json(response, EVENT_DELETE_ERROR).await?;
        Ok(())
    }

    /// POST /scheduleevents/{id}/participants
    pub async fn add_participant(&self, request: &AddParticipantRequest) -> Result<Value> {
        let url = self.url(&format!(
            "/scheduleevents/{}/participants",
            request.event_id
        ));
        let response = self
            .send(self.http.post(url).json(request))
            .await
            .context(PARTICIPANT_ADD_ERROR)?;
        expect_json(response, PARTICIPANT_ADD_ERROR).await
    }

    /// GET /users[?role=..]
    pub async fn get_users(&self, role: Option<&str>) -> Result<Vec<Value>> {
        let mut request = self.http.get(self.url("/users"));
        if let Some(role) = role {
            request = request.query(&[("role", role)]);
        }

        let response = self.send(request).await.context(USERS_LOAD_ERROR)?;
        expect_json_array(response, USERS_LOAD_ERROR).await
    }

    /// POST /users (multipart form)
    pub async fn create_user(&self, user: &NewUserForm) -> Result<Value> {
        let mut form = reqwest::multipart::Form::new()
            .text("login", user.login.trim().to_string())
            .text("password", user.password.trim().to_string())
            .text("name", user.name.trim().to_string())
            .text("surname", user.surname.trim().to_string())
            .text("lastName", user.last_name.trim().to_string())
            .text("experience", user.experience.clone())
            .text("role", user.role.clone());
        if let Some(photo) = &user.photo {
            let bytes = tokio::fs::read(photo)
                .await
                .with_context(|| format!("Failed to read photo {}", photo.display()))?;
            let file_name = photo
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());
            form = form.part(
                "photo",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );
        }

        // Multipart bodies are not cloneable, so no localhost retry here.
        let response = self
            .http
            .post(self.url("/users"))
            .multipart(form)
            .send()
            .await
            .context(USER_CREATE_ERROR)?;
        expect_json(response, USER_CREATE_ERROR).await
    }

    /// DELETE /users/{login}
    pub async fn delete_user(&self, login: &str) -> Result<()> {
        let response = self
            .send(self.http.delete(self.url(&format!("/users/{login}"))))
            .await
            .context(USER_DELETE_ERROR)?;
        expect_json(response, USER_DELETE_ERROR).await?;
        Ok(())
    }

    /// Send a request, retrying once over plain HTTP when an HTTPS request
    /// to a local development host fails at the transport level (the dev
    /// backend often runs without a trusted certificate).
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let retry = builder.try_clone();
        match builder.send().await {
            Ok(response) => Ok(response),
            Err(err) => {
                let Some(retry) = retry.filter(|_| err.is_connect()) else {
                    return Err(err.into());
                };
                let mut request = retry.build()?;
                let Some(downgraded) = http_fallback_url(request.url()) else {
                    return Err(err.into());
                };
                log::warn!(
                    "HTTPS {} unreachable, retrying over HTTP",
                    downgraded.host_str().unwrap_or_default()
                );
                *request.url_mut() = downgraded;
                Ok(self.http.execute(request).await?)
            }
        }
    }
}

impl ScheduleSource for Api {
    async fn fetch_stages(&self) -> Result<Vec<Value>> {
        self.get_stages().await
    }

    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Value>> {
        self.get_schedule_events(query).await
    }
}

/// The plain-HTTP twin of an HTTPS URL pointing at a local dev host.
fn http_fallback_url(url: &Url) -> Option<Url> {
    if url.scheme() != "https" {
        return None;
    }
    if !matches!(url.host_str(), Some("localhost") | Some("127.0.0.1")) {
        return None;
    }

    let mut downgraded = url.clone();
    downgraded.set_scheme("http").ok()?;
    Some(downgraded)
}

async fn expect_json(response: Response, fallback: &str) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }

    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        bail!("{}", error_message(&body, fallback));
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).with_context(|| format!("Unexpected response body: {body}"))
}

async fn expect_json_array(response: Response, fallback: &str) -> Result<Vec<Value>> {
    let body = expect_json(response, fallback).await?;
    // A non-array body from a list endpoint degrades to empty, matching
    // the tolerant normalization policy everywhere else.
    Ok(match body {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Human-readable error for a non-2xx response body.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_body_message_field() {
        let body = r#"{"message": "Сцена занята"}"#;
        assert_eq!(error_message(body, EVENT_CREATE_ERROR), "Сцена занята");
    }

    #[test]
    fn test_error_message_falls_back_on_junk_bodies() {
        assert_eq!(error_message("", EVENT_DELETE_ERROR), EVENT_DELETE_ERROR);
        assert_eq!(
            error_message("<html>502</html>", EVENT_DELETE_ERROR),
            EVENT_DELETE_ERROR
        );
        assert_eq!(
            error_message(r#"{"message": "  "}"#, EVENT_DELETE_ERROR),
            EVENT_DELETE_ERROR
        );
    }

    #[test]
    fn test_http_fallback_only_for_local_https() {
        let local = Url::parse("https://localhost:7078/api/stages").unwrap();
        let downgraded = http_fallback_url(&local).unwrap();
        assert_eq!(downgraded.as_str(), "http://localhost:7078/api/stages");

        let loopback = Url::parse("https://127.0.0.1/api").unwrap();
        assert!(http_fallback_url(&loopback).is_some());

        let remote = Url::parse("https://theatre.example/api").unwrap();
        assert!(http_fallback_url(&remote).is_none());

        let plain = Url::parse("http://localhost:7078/api").unwrap();
        assert!(http_fallback_url(&plain).is_none());
    }

    #[test]
    fn test_new_event_request_serializes_camel_case() {
        let request = NewEventRequest {
            stage_id: "3".to_string(),
            production_id: None,
            title: "Чайка".to_string(),
            event_type: "performance".to_string(),
            date: "2024-05-10".to_string(),
            time_start: "18:30".to_string(),
            time_end: "21:00".to_string(),
            color_hex: Some("#cfd6f6".to_string()),
            status: "planned".to_string(),
            artist_login: None,
            notes: None,
            created_by_login: "admin".to_string(),
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "stageId": "3",
                "productionId": null,
                "title": "Чайка",
                "eventType": "performance",
                "date": "2024-05-10",
                "timeStart": "18:30",
                "timeEnd": "21:00",
                "colorHex": "#cfd6f6",
                "status": "planned",
                "notes": null,
                "createdByLogin": "admin",
            })
        );
    }

    #[test]
    fn test_add_participant_request_defaults() {
        let request = AddParticipantRequest::new("12", "petrova");
        assert_eq!(request.responsibility, "participant");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "userLogin": "petrova",
                "responsibility": "participant",
                "notes": null,
            })
        );
    }
}
