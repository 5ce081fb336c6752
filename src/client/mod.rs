//! Thin wrapper over the platform REST API.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::draft::EventPayload;
use crate::models::{Booking, BookingRequest, Category, Event, EventId, Profile};
use crate::session::{Role, Session, SessionHandle};
use crate::utils::error::ApiError;
use crate::utils::response::{decode_body, error_message};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default, alias = "partner", alias = "user")]
    profile: Option<Profile>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionHandle) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let authorization = self.session.authorization().ok_or_else(|| {
            let error = ApiError::NotAuthenticated;
            error.log();
            error
        })?;
        Ok(request.header(reqwest::header::AUTHORIZATION, authorization))
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            let error = ApiError::from(e);
            error.log();
            error
        })?;
        decode(response).await.inspect_err(ApiError::log)
    }

    pub async fn partner_login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = self
            .http
            .post(self.url("/partner/login"))
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.send(request).await?;

        let mut session = Session::new(response.token, Role::Partner);
        if let Some(profile) = response.profile {
            session = session.with_profile(profile);
        }
        self.session.set(session.clone());
        Ok(session)
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.send(self.http.get(self.url("/categories"))).await
    }

    pub async fn fetch_partner_events(&self) -> Result<Vec<Event>, ApiError> {
        let request = self.authorized(self.http.get(self.url("/partner/events")))?;
        self.send(request).await
    }

    pub async fn fetch_event(&self, id: &EventId) -> Result<Event, ApiError> {
        let mut request = self.http.get(self.url(&format!("/events/{id}")));
        if let Some(authorization) = self.session.authorization() {
            request = request.header(reqwest::header::AUTHORIZATION, authorization);
        }
        self.send(request).await
    }

    pub async fn create_event(&self, payload: EventPayload) -> Result<Event, ApiError> {
        let request = self.authorized(self.http.post(self.url("/partner/events")))?;
        debug!(fields = payload.fields().len(), "Creating event");
        let form = payload.into_form()?;
        let event: Event = self.send(request.multipart(form)).await?;
        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    pub async fn update_event(
        &self,
        id: &EventId,
        payload: EventPayload,
    ) -> Result<Event, ApiError> {
        let url = self.url(&format!("/partner/events/{id}"));
        let request = self.authorized(self.http.put(url))?;
        debug!(event_id = %id, fields = payload.fields().len(), "Updating event");
        let form = payload.into_form()?;
        let event: Event = self.send(request.multipart(form)).await?;
        info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    pub async fn book_ticket(&self, booking: &BookingRequest) -> Result<Booking, ApiError> {
        let request = self.authorized(self.http.post(self.url("/user/bookings")))?;
        let confirmed: Booking = self.send(request.json(booking)).await?;
        info!(booking_id = %confirmed.id, event_id = %booking.event_id, "Ticket booked");
        Ok(confirmed)
    }
}

async fn decode<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    decode_body(&body)
}
