//! In-crate fakes for the HTTP and clock collaborators

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::sync::Mutex;

use crate::shared::errors::FetchError;

use super::{Clock, HttpClient};

/// Serves canned bodies for URLs containing a given fragment and records every request.
#[derive(Default)]
pub struct FakeHttpClient {
    routes: Vec<(String, Result<String, FetchError>)>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, fragment: &str, body: &str) -> Self {
        self.routes.push((fragment.to_string(), Ok(body.to_string())));
        self
    }

    pub fn fail(mut self, fragment: &str, err: FetchError) -> Self {
        self.routes.push((fragment.to_string(), Err(err)));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(&self, url: &str, _headers: &[(&str, &str)]) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    pub fn at(rfc3339: &str) -> Self {
        Self(DateTime::parse_from_rfc3339(rfc3339).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
