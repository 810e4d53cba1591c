//! HTTP `GameApi` backed by reqwest.
//!
//! Every request carries `Authorization: Bearer <token>` when a token is set.
//! Non-2xx responses are mapped to [`ApiError`]; bodies are decoded into DTOs
//! and validated through the conversion layer.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    domain::{
        ApiError, CardAllocation, ChatMessage, GameApi, PlayerRecord, RoomId, RoomSnapshot,
        ViewerRecord,
    },
    infrastructure::dto::{
        conversion::convert_all,
        http::{
            ApiErrorResponse, CardsRequest, PasswordCheckResponse, PasswordRequest, ReadyRequest,
            TimerRequest,
        },
        model::{CardDto, ChatMessageDto, PlayerDto, RoomDto, ViewerDto},
    },
};

pub struct HttpGameApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGameApi {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. "http://127.0.0.1:8080/api"
    /// * `token` - Bearer token supplied by the auth collaborator
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `<base>/rooms/<room_id>/<segments...>` with every segment percent-encoded
    fn room_url(&self, room_id: &RoomId, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid_base = |reason: &dyn std::fmt::Display| {
            ApiError::Network(format!("Invalid API URL '{}': {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid_base(&e))?;
        url.path_segments_mut()
            .map_err(|_| invalid_base(&"cannot be a base"))?
            .pop_if_empty()
            .push("rooms")
            .push(room_id.as_str())
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let message = match response.json::<ApiErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    tracing::warn!("{} answered {}: {}", url, status, message);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(url),
        _ => ApiError::Http {
            status: status.as_u16(),
            message,
        },
    })
}

fn invalid(e: impl std::fmt::Display) -> ApiError {
    ApiError::Decode(e.to_string())
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn get_room(&self, room_id: &RoomId) -> Result<RoomSnapshot, ApiError> {
        let dto: RoomDto = self.get_json(self.room_url(room_id, &[])?).await?;
        RoomSnapshot::try_from(dto).map_err(invalid)
    }

    async fn get_players(&self, room_id: &RoomId) -> Result<Vec<PlayerRecord>, ApiError> {
        let dtos: Vec<PlayerDto> = self.get_json(self.room_url(room_id, &["players"])?).await?;
        convert_all(dtos).map_err(invalid)
    }

    async fn get_viewers(&self, room_id: &RoomId) -> Result<Vec<ViewerRecord>, ApiError> {
        let dtos: Vec<ViewerDto> = self.get_json(self.room_url(room_id, &["viewers"])?).await?;
        convert_all(dtos).map_err(invalid)
    }

    async fn get_chat_history(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, ApiError> {
        let dtos: Vec<ChatMessageDto> =
            self.get_json(self.room_url(room_id, &["messages"])?).await?;
        convert_all(dtos).map_err(invalid)
    }

    async fn join_room(&self, room_id: &RoomId) -> Result<(), ApiError> {
        self.send(self.client.post(self.room_url(room_id, &["join"])?))
            .await
            .map(|_| ())
    }

    async fn leave_room(&self, room_id: &RoomId) -> Result<(), ApiError> {
        self.send(self.client.post(self.room_url(room_id, &["leave"])?))
            .await
            .map(|_| ())
    }

    async fn set_ready(&self, room_id: &RoomId, ready: bool) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.room_url(room_id, &["ready"])?)
            .json(&ReadyRequest { ready });
        self.send(request).await.map(|_| ())
    }

    async fn start_game(&self, room_id: &RoomId) -> Result<(), ApiError> {
        self.send(self.client.post(self.room_url(room_id, &["start"])?))
            .await
            .map(|_| ())
    }

    async fn check_password(&self, room_id: &RoomId, password: &str) -> Result<bool, ApiError> {
        let request = self
            .client
            .post(self.room_url(room_id, &["password"])?)
            .json(&PasswordRequest {
                password: password.to_string(),
            });
        let response = self.send(request).await?;
        let body: PasswordCheckResponse = response.json().await.map_err(invalid)?;
        Ok(body.valid)
    }

    async fn update_cards(
        &self,
        room_id: &RoomId,
        cards: &[CardAllocation],
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.room_url(room_id, &["cards"])?)
            .json(&CardsRequest {
                cards: cards.iter().map(CardDto::from).collect(),
            });
        self.send(request).await.map(|_| ())
    }

    async fn update_timer(&self, room_id: &RoomId, debate_time: u32) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.room_url(room_id, &["timer"])?)
            .json(&TimerRequest { debate_time });
        self.send(request).await.map(|_| ())
    }
}
