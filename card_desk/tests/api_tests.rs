use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use card_common::CardInput;
use card_desk::api::CardApi;
use card_desk::error::ApiError;
use card_desk::import::run_import;
use card_desk::io::ImportRecord;

/// Start a mock server on a background runtime so the blocking client
/// can be exercised from the test thread.
fn start_mock_server() -> (Runtime, MockServer) {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn card_json(id: i64, player: &str) -> serde_json::Value {
    json!({
        "id": id,
        "year": 1996,
        "player": player,
        "addedDate": "2024-06-08T10:00:00.000Z",
        "manufacturer": "Topps",
        "cardSet": "Chrome",
        "subset": null,
        "type": "Base",
        "onCardCode": "138",
        "sport": "Basketball",
        "tags": ["Rookie"],
        "notes": null,
        "grade": null,
        "pricePaid": 12.5,
        "marketPrice": null,
        "quantity": 1
    })
}

#[test]
fn list_cards_sends_pagination_and_parses_envelope() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/cards"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .and(query_param("sortField", "year"))
            .and(query_param("sortOrder", "DESC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [card_json(11, "Kobe Bryant")],
                "total": 25,
                "page": 2,
                "limit": 10
            })))
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    let page = api
        .list_cards(2, 10, Some(("year", "DESC")))
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 10);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].player, "Kobe Bryant");
    assert_eq!(page.data[0].tags, Some(vec!["Rookie".to_string()]));
}

#[test]
fn search_cards_sends_only_non_empty_filters() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("player", "Jordan"))
            .and(query_param("tags", "Rookie,Auto"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "total": 0,
                "page": 1,
                "limit": 50
            })))
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    let filters = vec![
        ("player", "Jordan".to_string()),
        ("manufacturer", "".to_string()),
        ("tags", "Rookie,Auto".to_string()),
    ];
    let page = api.search_cards(&filters, 1, 50, None).unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn create_card_posts_body_and_parses_created_record() {
    let (rt, server) = start_mock_server();

    let input = CardInput {
        year: Some(1996),
        player: Some("Kobe Bryant".to_string()),
        manufacturer: Some("Topps".to_string()),
        card_set: Some("Chrome".to_string()),
        card_type: Some("Base".to_string()),
        on_card_code: Some("138".to_string()),
        sport: Some("Basketball".to_string()),
        quantity: Some(1),
        ..CardInput::default()
    };

    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/cards"))
            .and(body_json(&input))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(card_json(7, "Kobe Bryant")),
            )
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    let card = api.create_card(&input).unwrap();
    assert_eq!(card.id, 7);
    assert_eq!(card.player, "Kobe Bryant");
}

#[test]
fn update_card_puts_to_the_card_path() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("PUT"))
            .and(path("/cards/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(card_json(7, "Kobe Bryant")))
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    let input = CardInput {
        grade: Some("PSA 10".to_string()),
        ..CardInput::default()
    };
    let card = api.update_card(7, &input).unwrap();
    assert_eq!(card.id, 7);
}

#[test]
fn delete_card_accepts_204() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("DELETE"))
            .and(path("/cards/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    assert!(api.delete_card(7).is_ok());
}

#[test]
fn server_error_message_is_surfaced() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/cards"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({
                    "error": "Bad request: unknown sort field: bogus"
                })),
            )
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    let err = api.list_cards(1, 10, Some(("bogus", "ASC"))).unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("unknown sort field"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[test]
fn recent_players_parses_plain_list() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/cards/recent-players"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["F", "E", "D", "C", "A"])))
            .mount(&server),
    );

    let api = CardApi::new(server.uri());
    let players = api.recent_players().unwrap();
    assert_eq!(players, vec!["F", "E", "D", "C", "A"]);
}

#[test]
fn run_import_submits_copies_and_collects_row_failures() {
    let (rt, server) = start_mock_server();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/cards"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(card_json(1, "Kobe Bryant")),
            )
            .expect(3)
            .mount(&server),
    );

    let valid_double = ImportRecord {
        year: "1996".to_string(),
        manufacturer: "Topps".to_string(),
        card_set: "Chrome".to_string(),
        card_type: "Base".to_string(),
        player: "Kobe Bryant".to_string(),
        on_card_code: "138".to_string(),
        sport: "Basketball".to_string(),
        quantity: "2".to_string(),
        ..ImportRecord::default()
    };
    let valid_single = ImportRecord {
        quantity: "".to_string(),
        ..valid_double.clone()
    };
    let missing_player = ImportRecord {
        player: "".to_string(),
        ..valid_double.clone()
    };

    let api = CardApi::new(server.uri());
    let report = run_import(&api, &[valid_double, valid_single, missing_player]);

    // 2 copies + 1 copy created; the third row never reaches the server
    assert_eq!(report.imported, 3);
    assert_eq!(report.rows, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].line, 4);
    assert!(report.failures[0].errors.fields.contains_key("player"));

    // Drop the server inside the runtime so expectations are verified
    rt.block_on(async move { drop(server) });
}
