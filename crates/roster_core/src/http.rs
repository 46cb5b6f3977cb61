//! reqwest implementation of the remote collaborators.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Identity, UserRecord},
    error::ApiError,
    protocol::{LoginRequest, NewUser},
};
use url::Url;

use crate::{
    error::{AuthError, CreateError, FetchError, UpdateError},
    AuthService, CreateService, RosterService, UpdateService,
};

pub struct HttpUserService {
    http: Client,
    base: Url,
}

impl HttpUserService {
    pub fn new(base: Url) -> Self {
        Self {
            http: Client::new(),
            base,
        }
    }

    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Reads a non-success response body, preferring the service's error
/// envelope over the bare status line.
async fn describe_failure(res: Response) -> String {
    let status = res.status();
    match res.json::<ApiError>().await {
        Ok(api) => format!("{status}: {}", api.message),
        Err(_) => status.to_string(),
    }
}

#[async_trait]
impl AuthService for HttpUserService {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let res = self
            .http
            .post(self.endpoint(&["login"]))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(AuthError::InvalidCredentials)
            }
            status if !status.is_success() => Err(AuthError::Rejected(describe_failure(res).await)),
            _ => res
                .json::<Identity>()
                .await
                .map_err(|err| AuthError::Rejected(format!("malformed login response: {err}"))),
        }
    }
}

#[async_trait]
impl RosterService for HttpUserService {
    async fn list_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        let res = self
            .http
            .get(self.endpoint(&["users"]))
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        if !res.status().is_success() {
            return Err(FetchError::Rejected(describe_failure(res).await));
        }
        res.json()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl UpdateService for HttpUserService {
    async fn update_user(&self, record: UserRecord) -> Result<UserRecord, UpdateError> {
        let res = self
            .http
            .put(self.endpoint(&["users", record.id.as_str()]))
            .json(&record)
            .send()
            .await
            .map_err(|err| UpdateError::Transport(err.to_string()))?;

        if !res.status().is_success() {
            return Err(UpdateError::Rejected(describe_failure(res).await));
        }
        res.json()
            .await
            .map_err(|err| UpdateError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CreateService for HttpUserService {
    async fn create_user(&self, draft: NewUser) -> Result<UserRecord, CreateError> {
        let res = self
            .http
            .post(self.endpoint(&["users"]))
            .json(&draft)
            .send()
            .await
            .map_err(|err| CreateError::Transport(err.to_string()))?;

        if !res.status().is_success() {
            return Err(CreateError::Rejected(describe_failure(res).await));
        }
        res.json()
            .await
            .map_err(|err| CreateError::Decode(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
