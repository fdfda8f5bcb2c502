#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use visitmap::{
    flatten_categories, resolve_categories, ApiSession, ExportOptions, GlobalCategory, UNKNOWN_FOLDER,
};

fn cat(id: &str, name: &str, children: Vec<GlobalCategory>) -> GlobalCategory {
    GlobalCategory { id: id.to_string(), name: name.to_string(), children }
}

/// Two-level forest: children map to their top-level id, only top-level ids get names.
#[test]
fn children_map_to_top_level() {
    let forest = vec![
        cat("top-food", "Food", vec![cat("child-coffee", "Coffee Shop", vec![]), cat("child-pizza", "Pizza", vec![])]),
        cat("top-travel", "Travel", vec![cat("child-airport", "Airport", vec![])]),
    ];
    let maps = flatten_categories(&forest);

    for top in &forest {
        assert_eq!(maps.root_of(&top.id), Some(top.id.as_str()), "top-level must map to itself");
    }
    assert_eq!(maps.root_of("child-coffee"), Some("top-food"));
    assert_eq!(maps.root_of("child-pizza"), Some("top-food"));
    assert_eq!(maps.root_of("child-airport"), Some("top-travel"));

    assert_eq!(maps.names.len(), 2);
    assert_eq!(maps.names.get("top-food").map(String::as_str), Some("Food"));
    assert!(maps.names.get("child-coffee").is_none());

    assert_eq!(maps.folder_label("child-coffee"), Some("Food"));
    assert_eq!(maps.folder_label("top-travel"), Some("Travel"));
    assert_eq!(maps.folder_label("nope"), None);
}

/// Below depth two the root is the immediate parent, not the top-level ancestor,
/// so the label lookup misses and the venue lands in the fallback folder.
#[test]
fn grandchildren_root_at_their_parent() {
    let forest = vec![cat(
        "top-food",
        "Food",
        vec![cat("mid-cafe", "Cafe", vec![cat("leaf-espresso", "Espresso Bar", vec![])])],
    )];
    let maps = flatten_categories(&forest);

    assert_eq!(maps.root_of("mid-cafe"), Some("top-food"));
    assert_eq!(maps.root_of("leaf-espresso"), Some("mid-cafe"));
    assert_eq!(maps.folder_label("leaf-espresso"), None);
    assert_eq!(maps.folder_label_or_unknown("leaf-espresso"), UNKNOWN_FOLDER);
}

#[test]
fn empty_forest_resolves_nothing() {
    let maps = flatten_categories(&[]);
    assert!(maps.roots.is_empty());
    assert!(maps.names.is_empty());
}

/// One unpaged request with the common query only.
#[test]
fn resolve_fetches_once_and_flattens() {
    let mock = MockTransport::new().json("/venues/categories", food_forest());
    let opts = ExportOptions::default();
    let session = ApiSession::new(&mock, &opts, "tok");

    let maps = resolve_categories(&session).unwrap();
    assert_eq!(maps.root_of("child-coffee"), Some("top-food"));
    assert_eq!(maps.folder_label("child-coffee"), Some("Food"));

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].param("oauth_token"), Some("tok"));
    assert_eq!(reqs[0].param("v"), Some(opts.api_version.as_str()));
    assert!(reqs[0].param("limit").is_none());
    assert!(reqs[0].param("offset").is_none());
}

#[test]
fn resolve_propagates_transport_error() {
    let mock = MockTransport::new()
        .route("/venues/categories", |_| Reply::Status(503, "maintenance".to_string()));
    let opts = ExportOptions::default();
    let err = resolve_categories(&ApiSession::new(&mock, &opts, "tok")).unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[test]
fn resolve_reports_decode_error() {
    let mock = MockTransport::new().route("/venues/categories", |_| Reply::Raw("{not json"));
    let opts = ExportOptions::default();
    let err = resolve_categories(&ApiSession::new(&mock, &opts, "tok")).unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn missing_response_is_an_empty_forest() {
    let mock = MockTransport::new().json("/venues/categories", json!({ "meta": { "code": 200 } }));
    let opts = ExportOptions::default();
    let maps = resolve_categories(&ApiSession::new(&mock, &opts, "tok")).unwrap();
    assert!(maps.roots.is_empty());
}

#[test]
fn null_children_are_leaves() {
    let body = json!({ "response": { "categories": [
        { "id": "top-food", "name": "Food", "categories": null },
        { "id": "top-travel", "name": null, "categories": [ { "id": "child-airport", "name": "Airport", "categories": null } ] }
    ] } });
    let mock = MockTransport::new().json("/venues/categories", body);
    let opts = ExportOptions::default();

    let maps = resolve_categories(&ApiSession::new(&mock, &opts, "tok")).unwrap();
    assert_eq!(maps.folder_label("top-food"), Some("Food"));
    assert_eq!(maps.root_of("child-airport"), Some("top-travel"));
    assert_eq!(maps.folder_label("child-airport"), Some(""));
}
