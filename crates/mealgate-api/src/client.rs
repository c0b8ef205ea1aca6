// Check-in HTTP client
//
// Wraps `reqwest::Client` with backend-specific URL construction and the
// bearer Authorization header. The only remote state this client touches
// is the per-attendee `used_meals` form; everything else about the
// registration backend is out of scope.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::token::BearerToken;
use crate::transport::TransportConfig;

/// Body shape of the `used_meals` form resource.
///
/// The server stores redemption history as one space-delimited string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsedMealsForm {
    #[serde(rename = "mealList", default)]
    pub meal_list: String,
}

/// HTTP client for the registration backend's form endpoints.
pub struct CheckinClient {
    http: reqwest::Client,
    base_url: Url,
    token: BearerToken,
}

impl CheckinClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `https://api.example-event.com`);
    /// the token must already have passed expiry/group checks.
    pub fn new(base_url: Url, token: BearerToken, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url, token: BearerToken) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The operator identity behind the token.
    pub fn operator(&self) -> &str {
        &self.token.claims().sub
    }

    /// Build `{base}/users/{id}/forms/used_meals`.
    fn used_meals_url(&self, user_id: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Backend {
                status: 0,
                message: "endpoint URL cannot have path segments".into(),
            })?
            .pop_if_empty()
            .extend(["users", user_id, "forms", "used_meals"]);
        Ok(url)
    }

    /// Fetch an attendee's redemption history.
    ///
    /// Any non-200 status is the "you don't have access" outcome -- the
    /// caller disables scanning for the session rather than retrying.
    pub async fn get_used_meals(&self, user_id: &str) -> Result<String, Error> {
        let url = self.used_meals_url(user_id)?;
        debug!(%url, "GET used_meals");

        let resp = self
            .http
            .get(url)
            .bearer_auth(self.token.expose())
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(Error::AccessDenied {
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().await?;
        let form: UsedMealsForm =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        Ok(form.meal_list)
    }

    /// Persist an attendee's updated redemption history.
    pub async fn put_used_meals(&self, user_id: &str, meal_list: &str) -> Result<(), Error> {
        let url = self.used_meals_url(user_id)?;
        debug!(%url, meal_list, "PUT used_meals");

        let resp = self
            .http
            .put(url)
            .bearer_auth(self.token.expose())
            .json(&UsedMealsForm {
                meal_list: meal_list.to_owned(),
            })
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::AccessDenied {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
