//! Wire-level tests for the sheets API client against a mock server.

use httpmock::prelude::*;
use sheetfms_gateway::{HttpSheetsGateway, RangeWrite, SheetsGateway};

fn gateway(server: &MockServer) -> HttpSheetsGateway {
    HttpSheetsGateway::with_api_base(server.base_url(), "sheet-123", "tok")
}

#[test]
fn read_parses_values_and_sends_bearer() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path_contains("/spreadsheets/sheet-123/values/")
            .header("authorization", "Bearer tok");
        then.status(200).json_body(serde_json::json!({
            "range": "FMS!A7:CK",
            "values": [["1", "req_01", "Site A"], ["2"]],
        }));
    });

    let values = gateway(&server).read("FMS!A7:CK").unwrap();
    mock.assert();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0][1], "req_01");
    assert_eq!(values[1], vec!["2"]);
}

#[test]
fn read_without_values_key_is_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200)
            .json_body(serde_json::json!({ "range": "FMS!A7:CK" }));
    });

    let values = gateway(&server).read("FMS!A7:CK").unwrap();
    assert!(values.is_empty());
}

#[test]
fn batch_read_returns_one_grid_per_range() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/spreadsheets/sheet-123/values:batchGet")
            .query_param("ranges", "A!A1:B");
        then.status(200).json_body(serde_json::json!({
            "valueRanges": [
                { "values": [["a"]] },
                { "range": "B!A1:B" },
            ],
        }));
    });

    let grids = gateway(&server)
        .batch_read(&["A!A1:B".to_string(), "B!A1:B".to_string()])
        .unwrap();
    assert_eq!(grids.len(), 2);
    assert_eq!(grids[0], vec![vec!["a".to_string()]]);
    assert!(grids[1].is_empty());
}

#[test]
fn write_puts_user_entered_values() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path_contains("/spreadsheets/sheet-123/values/")
            .query_param("valueInputOption", "USER_ENTERED")
            .json_body_partial(r#"{ "values": [["1", "req_01", "Site A"]] }"#);
        then.status(200).json_body(serde_json::json!({ "updatedCells": 3 }));
    });

    gateway(&server)
        .write("FMS!A7:C7", &[vec!["1".into(), "req_01".into(), "Site A".into()]])
        .unwrap();
    mock.assert();
}

#[test]
fn batch_write_posts_all_ranges_in_one_call() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/spreadsheets/sheet-123/values:batchUpdate")
            .json_body_partial(
                r#"{ "valueInputOption": "USER_ENTERED",
                     "data": [ { "range": "FMS!D9" }, { "range": "FMS!E9" } ] }"#,
            );
        then.status(200).json_body(serde_json::json!({ "totalUpdatedCells": 2 }));
    });

    let writes = vec![
        RangeWrite { range: "FMS!D9".into(), values: vec![vec!["x".into()]] },
        RangeWrite { range: "FMS!E9".into(), values: vec![vec!["y".into()]] },
    ];
    gateway(&server).batch_write(&writes).unwrap();
    mock.assert();
}

#[test]
fn http_error_carries_status_and_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(403).body("permission denied");
    });

    let err = gateway(&server).read("FMS!A7:B").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("403"), "got: {msg}");
    assert!(msg.contains("permission denied"), "got: {msg}");
}
