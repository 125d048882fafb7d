//! HTTP client for the movie/booking backend.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;

use super::{
    AuthResponse, CatalogGateway, Credentials, GatewayConfig, Listing, Movie, RemoteBooking,
    SeatReceipt, Show, SignupRequest,
};
use crate::error::GatewayError;

#[derive(Debug, Serialize)]
struct SeatRequest {
    seat_number: serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: RefCell<Option<String>>,
}

impl HttpGateway {
    /// Returns `None` when the configuration has no base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Option<Self>, GatewayError> {
        let Some(base_url) = config.base_url.clone() else {
            return Ok(None);
        };
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_millis(config.timeout_ms));
        let client = builder
            .build()
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        Ok(Some(Self {
            client,
            base_url,
            token: RefCell::new(None),
        }))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.borrow().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let request = self.authorized(self.client.get(self.url(path)));
        let response = request.send().await.map_err(transport_error)?;
        self.handle_response(response).await
    }

    async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.token.borrow_mut().take();
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        response
            .json()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Unavailable(err.to_string())
}

/// Pull `error` or `detail` out of a JSON error body, else the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "detail", "message"]
                .iter()
                .find_map(|key| value.get(key)?.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait(?Send)]
impl CatalogGateway for HttpGateway {
    async fn movies(&self) -> Result<Vec<Movie>, GatewayError> {
        Ok(self.get::<Listing<Movie>>("/movies/").await?.into_vec())
    }

    async fn movie_shows(&self, movie_id: u64) -> Result<Vec<Show>, GatewayError> {
        Ok(self
            .get::<Listing<Show>>(&format!("/movies/{movie_id}/shows/"))
            .await?
            .into_vec())
    }

    async fn book_seat(
        &self,
        show_id: u64,
        seat_number: &str,
    ) -> Result<SeatReceipt, GatewayError> {
        let seat_number = seat_number
            .parse::<u64>()
            .map_or_else(|_| serde_json::Value::from(seat_number), serde_json::Value::from);
        self.post(&format!("/shows/{show_id}/book/"), Some(&SeatRequest { seat_number }))
            .await
    }

    async fn my_bookings(&self) -> Result<Vec<RemoteBooking>, GatewayError> {
        Ok(self
            .get::<Listing<RemoteBooking>>("/my-bookings/")
            .await?
            .into_vec())
    }

    async fn cancel_booking(&self, booking_id: &str) -> Result<String, GatewayError> {
        let response: MessageResponse = self
            .post::<_, ()>(&format!("/bookings/{booking_id}/cancel/"), None)
            .await?;
        Ok(response.message)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, GatewayError> {
        let auth: AuthResponse = self.post("/login/", Some(credentials)).await?;
        self.set_token(Some(&auth.token));
        Ok(auth)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError> {
        let auth: AuthResponse = self.post("/signup/", Some(request)).await?;
        self.set_token(Some(&auth.token));
        Ok(auth)
    }

    fn set_token(&self, token: Option<&str>) {
        *self.token.borrow_mut() = token.map(str::to_string);
    }

    fn is_mock(&self) -> bool {
        false
    }
}
