//! Selection engine integration tests against a mock location API.

use std::net::SocketAddr;

use bhoomi_gateway::config::LocationApiConfig;
use bhoomi_gateway::selection::{
    build_agent_submission, LandBasket, LandItem, Level, LevelState, LocationClient,
    PreferenceTree, SelectionError, SelectionSession, Session,
};

mod common;
use common::{start_mock_upstream, MockResponse, SeenRequest};

const GOOD_TOKEN: &str = "Bearer test-token";

async fn start_location_api(addr: SocketAddr) {
    start_mock_upstream(addr, |request: SeenRequest| async move {
        if request.header("authorization") != Some(GOOD_TOKEN) {
            return MockResponse::json(401, r#"{"error": "unauthorized"}"#);
        }
        match request.path.as_str() {
            "/api/states" => MockResponse::json(
                200,
                r#"[{"id": 1, "name": "Telangana"}, {"id": 2, "name": "Andhra Pradesh"}]"#,
            ),
            "/api/states/1/districts" => MockResponse::json(
                200,
                r#"[{"id": 9, "name": "Warangal"}, {"id": 10, "name": "Karimnagar"}]"#,
            ),
            "/api/states/2/districts" => {
                MockResponse::json(200, r#"[{"id": 21, "name": "Guntur"}]"#)
            }
            "/api/districts/9/mandals" => {
                MockResponse::json(200, r#"[{"id": 31, "name": "Parkal"}]"#)
            }
            "/api/mandals/31/villages" => {
                MockResponse::json(200, r#"[{"id": 77, "name": "Nagaram"}]"#)
            }
            _ => MockResponse::json(404, r#"{"error": "not found"}"#),
        }
    })
    .await;
}

fn client_for(addr: SocketAddr, retries: bool) -> LocationClient {
    let mut config = LocationApiConfig {
        base_url: format!("http://{addr}/api"),
        ..LocationApiConfig::default()
    };
    config.retry.enabled = retries;
    config.retry.base_delay_ms = 10;
    config.retry.max_delay_ms = 50;
    LocationClient::new(&config).unwrap()
}

fn full_levels() -> Vec<Level> {
    vec![Level::State, Level::District, Level::Mandal, Level::Village]
}

#[tokio::test]
async fn test_full_cascade_flow() {
    let api_addr: SocketAddr = "127.0.0.1:28511".parse().unwrap();
    start_location_api(api_addr).await;

    let session = Session::sign_in("u-1", "test-token");
    let mut form =
        SelectionSession::new(client_for(api_addr, false), session, full_levels()).unwrap();

    form.start().await.unwrap();
    assert_eq!(form.cascade().level_state(0), LevelState::Ready);
    assert_eq!(form.cascade().options(0).len(), 2);

    form.choose(0, "Telangana").await.unwrap();
    assert_eq!(form.cascade().selected_id(0), "1");
    assert_eq!(form.cascade().options(1).len(), 2);

    form.choose(1, "Warangal").await.unwrap();
    assert_eq!(form.cascade().selected_id(1), "9");

    form.choose(2, "Parkal").await.unwrap();
    form.choose(3, "Nagaram").await.unwrap();
    assert!(form.cascade().is_fully_resolved());
}

#[tokio::test]
async fn test_changing_state_clears_descendants() {
    let api_addr: SocketAddr = "127.0.0.1:28521".parse().unwrap();
    start_location_api(api_addr).await;

    let session = Session::sign_in("u-1", "test-token");
    let mut form =
        SelectionSession::new(client_for(api_addr, false), session, full_levels()).unwrap();

    form.start().await.unwrap();
    form.choose(0, "Telangana").await.unwrap();
    form.choose(1, "Warangal").await.unwrap();
    assert!(!form.cascade().options(2).is_empty());

    form.choose(0, "Andhra Pradesh").await.unwrap();
    assert_eq!(form.cascade().selected_name(1), "");
    assert_eq!(form.cascade().selected_id(1), "");
    assert!(form.cascade().options(2).is_empty());
    assert_eq!(form.cascade().level_state(2), LevelState::Disabled);
    assert_eq!(form.cascade().level_state(3), LevelState::Disabled);
    // The fresh district list belongs to the new state.
    assert_eq!(form.cascade().options(1)[0].name, "Guntur");
}

#[tokio::test]
async fn test_unauthorized_is_a_typed_status_error() {
    let api_addr: SocketAddr = "127.0.0.1:28531".parse().unwrap();
    start_location_api(api_addr).await;

    let session = Session::sign_in("u-1", "wrong-token");
    let mut form =
        SelectionSession::new(client_for(api_addr, false), session, full_levels()).unwrap();

    let err = form.start().await.unwrap_err();
    match err {
        SelectionError::Status { code, message } => {
            assert_eq!(code, 401);
            assert_eq!(message, "unauthorized");
        }
        other => panic!("expected Status error, got {other:?}"),
    }

    // Silent-failure policy: the level is usable, just empty.
    assert_eq!(form.cascade().level_state(0), LevelState::Ready);
    assert!(form.cascade().options(0).is_empty());
}

#[tokio::test]
async fn test_dead_api_yields_transport_error() {
    // Nothing listens here.
    let api_addr: SocketAddr = "127.0.0.1:28541".parse().unwrap();

    let session = Session::sign_in("u-1", "test-token");
    let client = client_for(api_addr, false);
    let err = client
        .fetch_level(&session, Level::State, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SelectionError::Transport(_)));
}

#[tokio::test]
async fn test_agent_form_end_to_end() {
    let api_addr: SocketAddr = "127.0.0.1:28551".parse().unwrap();
    start_location_api(api_addr).await;

    let session = Session::sign_in("agent-7", "test-token");
    let mut form = SelectionSession::new(
        client_for(api_addr, false),
        session.clone(),
        full_levels(),
    )
    .unwrap();

    // Drive the cascade to discover names, then record preferences.
    form.start().await.unwrap();
    form.choose(0, "Telangana").await.unwrap();
    form.choose(1, "Warangal").await.unwrap();
    form.choose(2, "Parkal").await.unwrap();

    let mut preferences = PreferenceTree::default();
    preferences.toggle_district(form.cascade().selected_name(1));
    preferences
        .toggle_mandal("Warangal", form.cascade().selected_name(2))
        .unwrap();
    preferences.toggle_village("Parkal", "Nagaram").unwrap();

    let mut basket = LandBasket::new(vec![
        LandItem::new("L1", 100_000.0),
        LandItem::new("L2", 200_000.0),
    ]);
    basket.toggle("L1");
    basket.toggle("L2");

    let submission = build_agent_submission(&session, &preferences, &basket).unwrap();
    assert_eq!(
        serde_json::to_value(&submission).unwrap(),
        serde_json::json!({
            "user_id": "agent-7",
            "deposit": 1500.0,
            "preferred_districts": ["Warangal"],
            "preferred_mandals": {"Warangal": ["Parkal"]},
            "preferred_villages": {"Parkal": ["Nagaram"]},
            "attach_lands": ["L1", "L2"],
        })
    );
}
