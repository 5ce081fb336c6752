//! Client and wizard submit against an in-process mock of the platform API.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};

use agora_dashboard::draft::{LocationDetails, Schedule};
use agora_dashboard::models::{
    CategoryId, EventId, LocationType, RowId, TicketType, TicketTypeId, TicketTypeRecord,
};
use agora_dashboard::utils::error::{ApiError, DashboardError, DraftError};
use agora_dashboard::{
    ApiClient, Config, DashboardEvent, EventDraftBuilder, RefreshBus, SessionHandle,
    TicketSelector, WizardStep,
};

#[derive(Default)]
struct Recorded {
    event_submits: usize,
    route: Option<String>,
    authorization: Option<String>,
    fields: Vec<(String, String)>,
}

#[derive(Clone, Default)]
struct Mock {
    recorded: Arc<Mutex<Recorded>>,
}

impl Mock {
    fn field(&self, name: &str) -> Option<String> {
        self.recorded
            .lock()
            .unwrap()
            .fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn submits(&self) -> usize {
        self.recorded.lock().unwrap().event_submits
    }
}

async fn login() -> Json<Value> {
    Json(json!({
        "token": "tok-1",
        "partner": { "id": 1, "organization_name": "Acme Events", "email": "host@acme.test" }
    }))
}

async fn categories() -> Json<Value> {
    Json(json!([{ "id": 5, "name": "Tech" }, { "id": "6", "name": "Music" }]))
}

fn stored_gala() -> Value {
    json!({
        "id": 77,
        "title": "Winter Gala",
        "description": "An evening of music.",
        "location_type": "physical",
        "venue": "Eko Hall",
        "address": null,
        "start_date": "2026-12-05",
        "start_time": "19:00:00",
        "category_id": 3,
        "interests": null,
        "is_free": false,
        "ticket_types": [
            {
                "id": 901,
                "name": "Table",
                "ticket_structure": "class",
                "class_type": "vvip",
                "price": "500.00",
                "quantity": 10,
                "sold": 2,
                "available": 8
            },
            {
                "id": 902,
                "name": "Seat",
                "ticket_structure": "class",
                "class_type": "regular",
                "price": "50.00",
                "quantity": 290,
                "vat_included": null
            }
        ],
        "promo_codes": [
            {
                "id": 4,
                "code": "GALA",
                "discount_type": "fixed",
                "discount_value": 10,
                "max_uses": 5,
                "expiry_date": "2026-12-01"
            }
        ]
    })
}

async fn partner_events(headers: HeaderMap) -> Response {
    if headers.get("authorization").is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response();
    }
    Json(json!({ "success": true, "data": [stored_gala()], "message": null })).into_response()
}

async fn event_by_id(Path(id): Path<String>) -> Response {
    if id != "77" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": "NOT_FOUND", "message": "Event not found" } })),
        )
            .into_response();
    }
    Json(stored_gala()).into_response()
}

async fn create_event(
    State(mock): State<Mock>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    save_event(mock, "POST /api/partner/events".to_string(), "99", headers, multipart).await
}

async fn update_event(
    State(mock): State<Mock>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let route = format!("PUT /api/partner/events/{id}");
    save_event(mock, route, &id, headers, multipart).await
}

async fn save_event(
    mock: Mock,
    route: String,
    id: &str,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        fields.push((name, String::from_utf8_lossy(&bytes).to_string()));
    }

    {
        let mut recorded = mock.recorded.lock().unwrap();
        recorded.event_submits += 1;
        recorded.route = Some(route);
        recorded.authorization = authorization.clone();
        recorded.fields = fields.clone();
    }

    if authorization.as_deref() != Some("Bearer tok-1") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response();
    }

    let field = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    let title = field("title").unwrap_or_default();
    if title == "Taken" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "An event with this title already exists" })),
        )
            .into_response();
    }

    Json(json!({
        "id": id,
        "title": title,
        "description": field("description"),
        "location_type": field("location_type"),
        "online_link": field("online_link"),
        "category_id": field("category_id"),
        "is_free": field("is_free").as_deref() == Some("true")
    }))
    .into_response()
}

async fn book() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": { "id": 5, "status": "confirmed", "total_amount": "40.00", "qr_code": "QR-5" },
        "message": "Booking created"
    }))
}

async fn spawn_backend(mock: Mock) -> String {
    let app = Router::new()
        .route("/api/partner/login", post(login))
        .route("/api/categories", get(categories))
        .route("/api/partner/events", post(create_event).get(partner_events))
        .route("/api/partner/events/:id", put(update_event))
        .route("/api/events/:id", get(event_by_id))
        .route("/api/user/bookings", post(book))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn signed_in_client(base_url: String) -> ApiClient {
    let config = Config {
        api_base_url: base_url,
        request_timeout: None,
        partner_credentials: None,
    };
    let client = ApiClient::new(&config, SessionHandle::new()).unwrap();
    client.partner_login("host@acme.test", "secret").await.unwrap();
    client
}

fn online_talk(builder: &mut EventDraftBuilder) {
    builder.set_location(LocationDetails {
        location_type: LocationType::Online,
        online_link: "https://zoom.us/j/123".to_string(),
        ..Default::default()
    });
    builder.next();
    builder.set_schedule(Schedule {
        start_date: NaiveDate::from_ymd_opt(2026, 11, 2),
        start_time: NaiveTime::from_hms_opt(18, 0, 0),
        ..Default::default()
    });
    builder.next();
    builder.select_category(CategoryId::new("5"));
    builder.next();
    builder.set_name("Test Talk");
    builder.next();
    builder.set_description("A talk.");
    builder.next();
    builder.set_free(true);
    builder.next();
}

#[tokio::test]
async fn test_free_online_talk_is_submitted_once_and_reset() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock.clone()).await).await;
    let bus = RefreshBus::default();
    let mut refreshes = bus.subscribe();

    let mut builder = EventDraftBuilder::new();
    online_talk(&mut builder);
    assert_eq!(builder.step(), WizardStep::PromoCodes);

    let event = builder.submit(&client, &bus).await.unwrap();

    assert_eq!(mock.submits(), 1);
    assert_eq!(
        mock.recorded.lock().unwrap().authorization.as_deref(),
        Some("Bearer tok-1")
    );
    assert_eq!(mock.field("location_type").as_deref(), Some("online"));
    assert_eq!(mock.field("title").as_deref(), Some("Test Talk"));
    assert_eq!(mock.field("category_id").as_deref(), Some("5"));
    assert_eq!(mock.field("is_free").as_deref(), Some("true"));
    assert!(mock.field("ticket_types").is_none());

    assert_eq!(event.id.as_str(), "99");
    assert_eq!(builder.step(), WizardStep::Location);
    assert!(builder.draft().is_empty());
    assert_eq!(
        refreshes.recv().await.unwrap(),
        DashboardEvent::EventsChanged {
            event_id: event.id.clone()
        }
    );
}

#[tokio::test]
async fn test_missing_name_makes_no_network_call() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock.clone()).await).await;

    let mut builder = EventDraftBuilder::new();
    online_talk(&mut builder);
    builder.set_name("  ");

    let error = builder.submit(&client, &RefreshBus::default()).await.unwrap_err();
    assert!(matches!(error, DashboardError::Draft(DraftError::MissingName)));
    assert_eq!(builder.last_error(), Some("Event name is required"));
    assert_eq!(mock.submits(), 0);
}

#[tokio::test]
async fn test_paid_event_without_tickets_makes_no_network_call() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock.clone()).await).await;

    let mut builder = EventDraftBuilder::new();
    online_talk(&mut builder);
    builder.set_free(false);

    let error = builder.submit(&client, &RefreshBus::default()).await.unwrap_err();
    assert!(matches!(error, DashboardError::Draft(DraftError::NoTicketTypes)));
    assert_eq!(mock.submits(), 0);
}

#[tokio::test]
async fn test_backend_error_keeps_the_draft() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock.clone()).await).await;

    let mut builder = EventDraftBuilder::new();
    online_talk(&mut builder);
    builder.set_name("Taken");
    let before = builder.draft().clone();

    let error = builder.submit(&client, &RefreshBus::default()).await.unwrap_err();
    assert!(matches!(
        error,
        DashboardError::Api(ApiError::Backend { status: 422, .. })
    ));
    assert_eq!(
        builder.last_error(),
        Some("An event with this title already exists")
    );
    assert_eq!(builder.draft(), &before);
    assert_eq!(builder.step(), WizardStep::PromoCodes);
    assert_eq!(mock.submits(), 1);
}

#[tokio::test]
async fn test_logged_out_submit_is_rejected_locally() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock.clone()).await).await;
    client.logout();

    let mut builder = EventDraftBuilder::new();
    online_talk(&mut builder);
    let error = builder.submit(&client, &RefreshBus::default()).await.unwrap_err();

    assert!(matches!(error, DashboardError::Api(ApiError::NotAuthenticated)));
    assert_eq!(mock.submits(), 0);
    assert!(!builder.draft().is_empty());
}

#[tokio::test]
async fn test_categories_and_booking() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock).await).await;

    let categories = client.fetch_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].id, CategoryId::new("6"));

    let session = client.session().current().unwrap();
    assert_eq!(session.profile.unwrap().name, "Acme Events");

    let record: TicketTypeRecord = serde_json::from_value(json!({
        "id": 31,
        "name": "General",
        "ticket_structure": "basic",
        "price": "20.00",
        "quantity": 100,
        "available": 10
    }))
    .unwrap();
    let mut selector = TicketSelector::new(vec![TicketType::try_from(record).unwrap()]);
    selector.set_quantity(2);

    let request = selector
        .booking_request(&EventId::new("99"))
        .unwrap();
    assert_eq!(request.ticket_type_id, "31");

    let booking = client.book_ticket(&request).await.unwrap();
    assert_eq!(booking.id.as_str(), "5");
    assert_eq!(booking.qr_code.as_deref(), Some("QR-5"));
}

#[tokio::test]
async fn test_editing_an_event_updates_it_in_place() {
    let mock = Mock::default();
    let client = signed_in_client(spawn_backend(mock.clone()).await).await;
    let bus = RefreshBus::default();
    let mut refreshes = bus.subscribe();

    let listed = client.fetch_partner_events().await.unwrap();
    assert_eq!(listed.len(), 1);

    let event = client.fetch_event(&listed[0].id).await.unwrap();
    let mut builder = EventDraftBuilder::for_event(&event).unwrap();
    assert_eq!(builder.editing(), Some(&EventId::new("77")));
    assert_eq!(
        builder.draft().pricing.ticket_types[1].id,
        TicketTypeId::Persisted(RowId::new("902"))
    );

    let saved = builder.submit(&client, &bus).await.unwrap();

    assert_eq!(mock.submits(), 1);
    assert_eq!(
        mock.recorded.lock().unwrap().route.as_deref(),
        Some("PUT /api/partner/events/77")
    );
    assert_eq!(mock.field("title").as_deref(), Some("Winter Gala"));
    assert_eq!(mock.field("category_id").as_deref(), Some("3"));
    assert_eq!(mock.field("is_free").as_deref(), Some("false"));

    let tickets: Vec<TicketTypeRecord> =
        serde_json::from_str(&mock.field("ticket_types").unwrap()).unwrap();
    let ids: Vec<_> = tickets.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![Some(RowId::new("901")), Some(RowId::new("902"))]);

    let promos: Value = serde_json::from_str(&mock.field("promo_codes").unwrap()).unwrap();
    assert_eq!(promos[0]["id"], "4");

    assert_eq!(saved.id.as_str(), "77");
    assert!(builder.editing().is_none());
    assert!(builder.draft().is_empty());
    assert_eq!(
        refreshes.recv().await.unwrap(),
        DashboardEvent::EventsChanged {
            event_id: EventId::new("77")
        }
    );
}

#[tokio::test]
async fn test_missing_event_reports_backend_message() {
    let client = signed_in_client(spawn_backend(Mock::default()).await).await;

    let error = client.fetch_event(&EventId::new("404")).await.unwrap_err();
    assert!(matches!(error, ApiError::Backend { status: 404, .. }));
    assert_eq!(error.user_message(), "Event not found");
}

#[tokio::test]
async fn test_partner_events_require_a_session() {
    let client = signed_in_client(spawn_backend(Mock::default()).await).await;
    client.logout();

    let error = client.fetch_partner_events().await.unwrap_err();
    assert!(matches!(error, ApiError::NotAuthenticated));
}
