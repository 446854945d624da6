//! Integration tests for icon catalog resolution

use iso_diagram::catalog::{
    CatalogEngine, CatalogIndex, CategoryConfig, CustomIcon, IconConfig, IconMenuConfig,
    MenuSettings,
};
use iso_diagram::model::Icon;
use pretty_assertions::assert_eq;

fn pack() -> CatalogIndex {
    CatalogIndex::from_icons(vec![
        Icon::new("aws-ec2", "EC2", "u").with_collection("AWS"),
        Icon::new("server", "Server", "server.svg").with_collection("ISOFLOW"),
        Icon::new("cube", "Cube", "cube.svg")
            .with_collection("ISOFLOW")
            .with_scale(1.5),
    ])
}

fn engine(json: &str) -> CatalogEngine {
    let config = IconMenuConfig::from_json(json).expect("Should parse");
    CatalogEngine::new(config, pack()).expect("Should build")
}

#[test]
fn test_end_to_end_example() {
    let engine = engine(
        r#"{
            "version": "1.0",
            "categories": [{
                "id": "c1",
                "name": "Compute",
                "order": 1,
                "icons": [{ "id": "a", "name": "A", "collection": "AWS", "existingIconId": "aws-ec2" }]
            }]
        }"#,
    );

    let categories = engine.categories();
    assert_eq!(categories.len(), 1);
    let icon = &categories[0].icons[0];
    assert_eq!(icon.id, "a");
    assert_eq!(icon.name, "A");
    assert_eq!(icon.url, "u");
    assert_eq!(icon.collection.as_deref(), Some("AWS"));

    let flattened = engine.flattened_icons();
    assert_eq!(flattened[0].display_group.as_deref(), Some("Compute"));
    assert_eq!(engine.menu_icons()[0].collection.as_deref(), Some("Compute"));
    assert!(engine.validate().is_valid);
}

#[test]
fn test_fallback_chain_order() {
    let engine = engine(
        r#"{
            "version": "1.0",
            "categories": [{
                "id": "mixed",
                "name": "Mixed",
                "icons": [
                    { "id": "one", "name": "One", "collection": "X",
                      "existingIconId": "missing", "fallbackIcon": "server" },
                    { "id": "two", "name": "Two", "collection": "X",
                      "existingIconId": "cube", "fallbackIcon": "server" },
                    { "id": "three", "name": "Three", "collection": "X",
                      "existingIconId": "missing",
                      "customIcon": { "url": "data:custom", "isIsometric": false } }
                ]
            }]
        }"#,
    );

    let icons = engine.icons_by_category("mixed");
    let urls: Vec<&str> = icons.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec!["server.svg", "cube.svg", "data:custom"]);
    assert_eq!(icons[1].scale, Some(1.5));
    assert_eq!(icons[2].is_isometric, Some(false));
    assert_eq!(icons[2].collection.as_deref(), Some("X"));
}

#[test]
fn test_unresolved_reference_is_reported_not_fatal() {
    let engine = engine(
        r#"{
            "version": "1.0",
            "categories": [
                { "id": "ok", "name": "Good", "order": 2,
                  "icons": [{ "id": "s", "name": "S", "collection": "X", "existingIconId": "server" }] },
                { "id": "bad", "name": "Broken", "order": 1,
                  "icons": [{ "id": "ghost", "name": "Ghost", "collection": "X",
                              "existingIconId": "nope", "fallbackIcon": "nada" }] }
            ]
        }"#,
    );

    let report = engine.validate();
    assert!(!report.is_valid);
    insta::assert_snapshot!(
        report.errors.join("\n"),
        @r#"Cannot resolve icon "ghost" in category "Broken" (existingIconId: nope, fallbackIcon: nada)"#
    );

    // The empty category is hidden, the good one survives
    let ids: Vec<&str> = engine.categories().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["ok"]);
}

#[test]
fn test_ordering_and_default_order() {
    let server = || IconConfig::new("s", "S", "X").with_existing("server");
    let config = IconMenuConfig {
        version: "1".to_string(),
        description: None,
        categories: vec![
            CategoryConfig::new("late", "Late").with_icon(server()),
            CategoryConfig::new("second", "Second").with_order(5).with_icon(server()),
            CategoryConfig::new("first", "First").with_order(0).with_icon(server()),
            CategoryConfig::new("also-second", "Also Second")
                .with_order(5)
                .with_icon(server()),
        ],
        settings: MenuSettings::default(),
        metadata: None,
    };
    let engine = CatalogEngine::new(config, pack()).expect("Should build");

    let ids: Vec<&str> = engine.categories().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "also-second", "late"]);
    assert_eq!(engine.categories()[3].order, 999);
}

#[test]
fn test_settings_policies() {
    let engine = engine(
        r#"{
            "version": "1.0",
            "categories": [
                { "id": "a", "name": "A", "isExpanded": false, "icons": [
                    { "id": "1", "name": "1", "collection": "X", "existingIconId": "server" },
                    { "id": "2", "name": "2", "collection": "X", "existingIconId": "cube" },
                    { "id": "3", "name": "3", "collection": "X", "existingIconId": "aws-ec2" }
                ] },
                { "id": "b", "name": "B", "icons": [] }
            ],
            "settings": {
                "defaultExpanded": ["a", "b"],
                "showEmptyCategories": true,
                "maxIconsPerCategory": 2
            }
        }"#,
    );

    assert_eq!(engine.icons_by_category("a").len(), 2);
    assert_eq!(engine.icons_by_category("b").len(), 0);
    let states: Vec<(String, bool)> = engine
        .collection_states()
        .into_iter()
        .map(|s| (s.id, s.is_expanded))
        .collect();
    assert_eq!(
        states,
        vec![("a".to_string(), false), ("b".to_string(), true)]
    );
    // Truncation does not hide validation of the dropped reference
    assert!(engine.validate().is_valid);
}

#[test]
fn test_search_respects_setting() {
    let json = |enabled: bool| {
        format!(
            r#"{{
                "version": "1.0",
                "categories": [{{ "id": "c", "name": "C", "icons": [
                    {{ "id": "web", "name": "Web Server", "collection": "ISOFLOW", "existingIconId": "server" }},
                    {{ "id": "vm", "name": "Virtual Machine", "collection": "AWS", "existingIconId": "aws-ec2" }}
                ] }}],
                "settings": {{ "enableSearch": {enabled} }}
            }}"#
        )
    };

    assert!(engine(&json(false)).search("server").is_empty());

    let enabled = engine(&json(true));
    let hits: Vec<String> = enabled.search("SERVER").into_iter().map(|i| i.id).collect();
    assert_eq!(hits, vec!["web".to_string()]);
    let by_collection: Vec<String> = enabled.search("aws").into_iter().map(|i| i.id).collect();
    assert_eq!(by_collection, vec!["vm".to_string()]);
}

#[test]
fn test_resolution_is_idempotent_and_tracks_reloads() {
    let json = r#"{
        "version": "1.0",
        "categories": [{ "id": "c", "name": "C", "icons": [
            { "id": "x", "name": "X", "collection": "AWS", "existingIconId": "aws-ec2" }
        ] }]
    }"#;
    let first = engine(json);
    let second = engine(json);
    assert_eq!(first.resolved(), second.resolved());

    let mut reloaded = engine(json);
    reloaded.set_available_icons(CatalogIndex::new());
    assert!(reloaded.categories().is_empty());
    assert!(!reloaded.validate().is_valid);

    reloaded.set_available_icons(pack());
    assert_eq!(reloaded.resolved(), first.resolved());
}

#[test]
fn test_custom_icon_builder_path() {
    let config = IconMenuConfig {
        version: "1".to_string(),
        description: None,
        categories: vec![CategoryConfig::new("own", "Own").with_icon(
            IconConfig::new("logo", "Logo", "imported").with_custom(CustomIcon::new("data:logo")),
        )],
        settings: MenuSettings::default(),
        metadata: None,
    };
    let engine = CatalogEngine::new(config, CatalogIndex::new()).expect("Should build");
    let logo = &engine.flattened_icons()[0];
    assert!(logo.is_imported());
    assert_eq!(logo.menu_group(), Some("Own"));
}

#[test]
fn test_malformed_configuration_is_fatal() {
    let unknown_field = r#"{ "version": "1.0", "categories": [], "colour": "red" }"#;
    assert!(IconMenuConfig::from_json(unknown_field).is_err());

    let bad_scale = r#"{ "version": "1.0", "categories": [{ "id": "c", "name": "C", "icons": [
        { "id": "x", "name": "X", "collection": "Y", "customIcon": { "url": "u", "scale": 9.0 } }
    ] }] }"#;
    assert!(IconMenuConfig::from_json(bad_scale).is_err());
}

#[test]
fn test_toml_configuration() {
    let config = IconMenuConfig::from_toml(
        r#"
version = "1.0"

[[categories]]
id = "compute"
name = "Compute"
order = 1

[[categories.icons]]
id = "vm"
name = "VM"
collection = "AWS"
existingIconId = "aws-ec2"
"#,
    )
    .expect("Should parse");
    let engine = CatalogEngine::new(config, pack()).expect("Should build");
    assert_eq!(engine.icons_by_category("compute")[0].url, "u");
}
