//! API integration tests.
//!
//! These tests drive the built router end-to-end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use collate_api::{SubscriptionRegistry, middleware::AppState, router as api_router};
use collate_common::Config;
use collate_common::config::{AuthConfig, BroadcastConfig, DatabaseConfig, ServerConfig};
use collate_core::{
    AggregationService, AuthService, CandidateService, ConstituencyService, NoOpResultPublisher,
    PartyService, PollingStationService, RegionService, ResultService, UserService,
};
use collate_db::entities::{candidate, constituency, party, polling_station, user, vote_record};
use collate_db::repositories::{
    CandidateRepository, ConstituencyRepository, PartyRepository, PollingStationRepository,
    UserRepository, VoteRecordRepository,
};
use maplit::btreemap;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_expiry_hours: 24,
        },
        broadcast: BroadcastConfig::default(),
    }
}

/// Create test app state over a mock database.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let config = create_test_config();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let party_repo = PartyRepository::new(Arc::clone(&db));
    let constituency_repo = ConstituencyRepository::new(Arc::clone(&db));
    let station_repo = PollingStationRepository::new(Arc::clone(&db));
    let candidate_repo = CandidateRepository::new(Arc::clone(&db));
    let vote_record_repo = VoteRecordRepository::new(Arc::clone(&db));

    let auth_service = AuthService::new(user_repo.clone(), &config);
    let aggregation_service = AggregationService::new(
        candidate_repo.clone(),
        party_repo.clone(),
        constituency_repo.clone(),
        station_repo.clone(),
        vote_record_repo.clone(),
    );
    let result_service = ResultService::new(
        vote_record_repo.clone(),
        candidate_repo.clone(),
        station_repo.clone(),
        constituency_repo.clone(),
        Arc::new(NoOpResultPublisher),
    );

    AppState {
        auth_service,
        user_service: UserService::new(user_repo),
        party_service: PartyService::new(party_repo),
        constituency_service: ConstituencyService::new(constituency_repo.clone()),
        polling_station_service: PollingStationService::new(
            station_repo.clone(),
            constituency_repo.clone(),
        ),
        candidate_service: CandidateService::new(
            candidate_repo,
            PartyRepository::new(Arc::clone(&db)),
            constituency_repo.clone(),
        ),
        result_service,
        aggregation_service,
        region_service: RegionService::new(constituency_repo, station_repo, vote_record_repo),
        registry: SubscriptionRegistry::new(),
    }
}

/// Build the app router the way the server bootstrap does.
fn create_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            collate_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

fn test_user(id: &str, role: user::Role) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        password_hash: "unused".to_string(),
        name: None,
        role,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn bearer(state: &AppState, user: &user::Model) -> String {
    let token = state.auth_service.issue_token(user).unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_submit_result_without_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = create_test_state(db);
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::post("/api/results")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"candidateId":"c1","pollingStationId":"s1","votes":250}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_submit_result_as_viewer_is_forbidden() {
    // No queries expected: the role gate fires before any store access.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = create_test_state(db);
    let viewer = test_user("viewer1", user::Role::Viewer);
    let auth = bearer(&state, &viewer);
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::post("/api/results")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, auth)
                .body(Body::from(
                    r#"{"candidateId":"c1","pollingStationId":"s1","votes":250}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_update_result_with_garbage_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = create_test_state(db);
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::put("/api/results/r1")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::from(r#"{"votes":200}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_result_as_officer_creates_record() {
    let candidate = candidate::Model {
        id: "cand-a".to_string(),
        name: "Alice".to_string(),
        candidate_type: candidate::CandidateType::Presidential,
        party_id: "party1".to_string(),
        constituency_id: None,
        created_at: Utc::now().into(),
    };
    let station = polling_station::Model {
        id: "station1".to_string(),
        code: "GA-001-A".to_string(),
        name: "Accra Central 1".to_string(),
        location: None,
        constituency_id: "const1".to_string(),
        created_at: Utc::now().into(),
    };
    let const1 = constituency::Model {
        id: "const1".to_string(),
        name: "Accra Central".to_string(),
        region: constituency::Region::GreaterAccra,
        created_at: Utc::now().into(),
    };
    let created = vote_record::Model {
        id: "rec1".to_string(),
        candidate_id: "cand-a".to_string(),
        polling_station_id: "station1".to_string(),
        votes: 250,
        submitted_by: "officer1".to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    };
    let audit_row = collate_db::entities::audit_log::Model {
        id: "audit1".to_string(),
        action: "RESULT_CREATE".to_string(),
        entity: "VoteRecord".to_string(),
        entity_id: "rec1".to_string(),
        old_value: None,
        new_value: None,
        actor_id: "officer1".to_string(),
        created_at: Utc::now().into(),
    };

    // Query order: candidate, station, duplicate check (empty),
    // constituency, insert record (returning), insert audit (returning).
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![candidate]])
        .append_query_results([vec![station]])
        .append_query_results([Vec::<vote_record::Model>::new()])
        .append_query_results([vec![const1]])
        .append_query_results([vec![created]])
        .append_query_results([vec![audit_row]])
        .into_connection();

    let state = create_test_state(db);
    let officer = test_user("officer1", user::Role::PollingOfficer);
    let auth = bearer(&state, &officer);
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::post("/api/results")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, auth)
                .body(Body::from(
                    r#"{"candidateId":"cand-a","pollingStationId":"station1","votes":250}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["votes"], 250);
    assert_eq!(body["candidateId"], "cand-a");
    assert_eq!(body["submittedBy"], "officer1");
}

#[tokio::test]
async fn test_presidential_results_rank_and_percentages() {
    let candidates = vec![
        candidate::Model {
            id: "cand-a".to_string(),
            name: "Alice".to_string(),
            candidate_type: candidate::CandidateType::Presidential,
            party_id: "party-a".to_string(),
            constituency_id: None,
            created_at: Utc::now().into(),
        },
        candidate::Model {
            id: "cand-b".to_string(),
            name: "Bob".to_string(),
            candidate_type: candidate::CandidateType::Presidential,
            party_id: "party-b".to_string(),
            constituency_id: None,
            created_at: Utc::now().into(),
        },
    ];
    let parties = vec![
        party::Model {
            id: "party-a".to_string(),
            name: "Party A".to_string(),
            abbreviation: "PA".to_string(),
            color: "#0000FF".to_string(),
            logo_url: None,
            created_at: Utc::now().into(),
        },
        party::Model {
            id: "party-b".to_string(),
            name: "Party B".to_string(),
            abbreviation: "PB".to_string(),
            color: "#008000".to_string(),
            logo_url: None,
            created_at: Utc::now().into(),
        },
    ];

    // Query order: candidates, grouped sums, parties, station count,
    // reporting stations.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([candidates])
        .append_query_results([vec![
            btreemap! {
                "candidate_id" => Value::from("cand-a"),
                "total" => Value::from(120i64),
            },
            btreemap! {
                "candidate_id" => Value::from("cand-b"),
                "total" => Value::from(150i64),
            },
        ]])
        .append_query_results([parties])
        .append_query_results([vec![btreemap! { "num_items" => Value::from(2i64) }]])
        .append_query_results([vec![
            btreemap! { "polling_station_id" => Value::from("station1") },
        ]])
        .into_connection();

    let state = create_test_state(db);
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::get("/api/results/presidential")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["totalVotes"], 270);
    assert_eq!(body["candidates"][0]["candidateId"], "cand-b");
    assert_eq!(body["candidates"][1]["candidateId"], "cand-a");
    assert_eq!(body["leadingCandidate"]["candidateId"], "cand-b");

    let first = body["candidates"][0]["percentage"].as_f64().unwrap();
    let second = body["candidates"][1]["percentage"].as_f64().unwrap();
    assert!((first - 55.555_555).abs() < 0.001);
    assert!((second - 44.444_444).abs() < 0.001);

    assert_eq!(body["nationalStats"]["reportingStations"], 1);
    assert_eq!(body["nationalStats"]["totalStations"], 2);
    assert_eq!(body["nationalStats"]["rejectedVotes"], 0);
    assert!(body["lastUpdated"].is_string());
}

#[tokio::test]
async fn test_region_results_with_unknown_region_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = create_test_state(db);
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::get("/api/results/region/ATLANTIS")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}
