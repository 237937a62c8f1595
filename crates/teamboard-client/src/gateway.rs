use async_trait::async_trait;
use serde::Deserialize;
use teamboard_core::{TeamboardError, TeamboardResult};
use teamboard_domain::{Card, CardId, CardPatch, Column};

#[cfg(test)]
use mockall::automock;

/// Server operations the board view needs. Implemented over HTTP for the
/// real client and mocked in tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardGateway: Send + Sync {
    async fn fetch_cards(&self, team_name: &str) -> TeamboardResult<Vec<Card>>;
    async fn create_card(
        &self,
        team_name: &str,
        title: &str,
        column: Column,
    ) -> TeamboardResult<Card>;
    async fn move_card(&self, id: CardId, column: Column) -> TeamboardResult<Card>;
    async fn delete_card(&self, id: CardId) -> TeamboardResult<()>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `CardGateway` over the server's JSON API.
pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// Turn a non-success response back into the error the server started from.
async fn error_from_response(resp: reqwest::Response) -> TeamboardError {
    let status = resp.status();
    let message = resp
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| format!("HTTP {}", status));

    match status {
        reqwest::StatusCode::BAD_REQUEST => TeamboardError::Validation(message),
        reqwest::StatusCode::NOT_FOUND => {
            if message.starts_with("Team not found") {
                TeamboardError::TeamNotFound(message)
            } else {
                TeamboardError::NotFound(message)
            }
        }
        _ => TeamboardError::Internal(message),
    }
}

fn transport(err: reqwest::Error) -> TeamboardError {
    TeamboardError::Transport(err.to_string())
}

#[async_trait]
impl CardGateway for HttpGateway {
    async fn fetch_cards(&self, team_name: &str) -> TeamboardResult<Vec<Card>> {
        let resp = self
            .client
            .get(format!("{}/cards", self.base_url))
            .query(&[("teamName", team_name)])
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| TeamboardError::Serialization(e.to_string()))
    }

    async fn create_card(
        &self,
        team_name: &str,
        title: &str,
        column: Column,
    ) -> TeamboardResult<Card> {
        let resp = self
            .client
            .post(format!("{}/cards", self.base_url))
            .json(&serde_json::json!({
                "title": title,
                "column": column,
                "teamName": team_name,
            }))
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| TeamboardError::Serialization(e.to_string()))
    }

    async fn move_card(&self, id: CardId, column: Column) -> TeamboardResult<Card> {
        let resp = self
            .client
            .patch(format!("{}/cards/{}", self.base_url, id))
            .json(&CardPatch::move_to(column))
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| TeamboardError::Serialization(e.to_string()))
    }

    async fn delete_card(&self, id: CardId) -> TeamboardResult<()> {
        let resp = self
            .client
            .delete(format!("{}/cards/{}", self.base_url, id))
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }
}
