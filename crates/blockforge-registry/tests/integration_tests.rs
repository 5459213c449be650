//! Integration tests for blockforge-registry

use blockforge::{FieldDefaults, FieldsBuilder, GlobalFieldSet};
use blockforge_registry::*;
use pretty_assertions::assert_eq;
use serde_json::{Map, json};
use tempfile::tempdir;

fn hero_block() -> Block {
    let fields = FieldsBuilder::new("hero_banner")
        .add_tab("Content")
        .add_text("heading")
        .add_tab("Design")
        .add_true_false("dark")
        .build()
        .unwrap();
    Block::new("Hero Banner", fields)
}

fn config() -> ComposerConfig {
    ComposerConfig::default().with_defaults(
        FieldDefaults::new()
            .with("text", json!({"maxlength": 80}))
            .with("trueFalse", json!({"ui": 1})),
    )
}

#[test]
fn test_full_composition() {
    let composer = Composer::new(config(), InMemoryRegistry::new());
    let composed = composer.compose(hero_block()).unwrap().unwrap();

    assert_eq!(composed.slug(), "hero-banner");
    assert_eq!(composed.namespace, "acf/hero-banner");

    let group = &composed.field_group;
    assert_eq!(group.key, "group_hero_banner");
    assert_eq!(
        group.field_names(),
        vec!["content_tab", "heading", "design_tab", "custom_classes", "custom_id", "dark"]
    );
    assert_eq!(group.fields[3].get("key"), Some(&json!("field_hero_banner_custom_classes")));
    assert_eq!(group.fields[1].get("maxlength"), Some(&json!(80)));
    assert_eq!(group.fields[4].get("maxlength"), Some(&json!(80)));
    assert_eq!(group.fields[5].get("ui"), Some(&json!(1)));
    assert!(group.fields[0].get("maxlength").is_none());
    assert_eq!(
        group.setting("location"),
        Some(&json!([[{"param": "block", "operator": "==", "value": "acf/hero-banner"}]]))
    );

    let registry = composer.registrar();
    assert!(registry.contains_block("hero-banner"));
    assert_eq!(registry.field_group("group_hero_banner").as_ref(), Some(group));
}

#[test]
fn test_nameless_block_is_skipped() {
    let composer = Composer::new(config(), InMemoryRegistry::new());
    let mut block = hero_block();
    block.name = String::new();

    assert!(composer.compose(block).unwrap().is_none());
    assert!(composer.registrar().is_empty());
    assert!(composer.registrar().field_group("group_hero_banner").is_none());
}

#[test]
fn test_duplicate_block_fails() {
    let composer = Composer::new(config(), InMemoryRegistry::new());
    composer.compose(hero_block()).unwrap();

    let err = composer.compose(hero_block()).unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRegistered(ref name) if name == "hero-banner"));
}

#[test]
fn test_block_defaults_override_configured_defaults() {
    let composer = Composer::new(config(), InMemoryRegistry::new());
    let block = hero_block().with_defaults(FieldDefaults::new().with("text", json!({"placeholder": "…"})));

    let composed = composer.compose(block).unwrap().unwrap();
    let heading = &composed.field_group.fields[1];
    assert_eq!(heading.get("placeholder"), Some(&json!("…")));
    assert!(heading.get("maxlength").is_none());
    assert_eq!(composed.field_group.fields[5].get("ui"), Some(&json!(1)));
}

#[test]
fn test_field_group_defaults_and_existing_location() {
    let config = ComposerConfig::default()
        .with_globals(GlobalFieldSet::new())
        .with_defaults(FieldDefaults::new().with(
            "field_group",
            json!({
                "style": "seamless",
                "location": [[{"param": "post_type", "operator": "==", "value": "page"}]],
            }),
        ));
    let composer = Composer::new(config, InMemoryRegistry::new());

    let composed = composer.compose(hero_block()).unwrap().unwrap();
    let group = &composed.field_group;

    assert_eq!(group.setting("style"), Some(&json!("seamless")));
    assert_eq!(
        group.setting("location"),
        Some(&json!([[{"param": "post_type", "operator": "==", "value": "page"}]]))
    );
    assert_eq!(
        group.field_names(),
        vec!["content_tab", "heading", "design_tab", "custom_classes", "custom_id", "dark"]
    );
}

#[test]
fn test_configured_globals_follow_design_fragment() {
    let config = ComposerConfig::from_value(json!({
        "globals": {"media_tab": {"key": "group_shared", "fields": [{"name": "caption", "type": "text"}]}},
    }))
    .unwrap();
    let composer = Composer::new(config, InMemoryRegistry::new());
    assert_eq!(composer.globals().len(), 2);

    let composed = composer
        .compose_value(json!({
            "name": "Hero",
            "fields": {"key": "group_hero", "fields": [{"name": "heading", "type": "text"}]},
        }))
        .unwrap()
        .unwrap();

    assert_eq!(
        composed.field_group.field_names(),
        vec!["heading", "design_tab", "custom_classes", "custom_id", "caption"]
    );
    assert_eq!(composed.field_group.fields[1].get("key"), Some(&json!("field_hero_design_tab")));
}

#[test]
fn test_compose_group_without_block() {
    let config = ComposerConfig::default().with_defaults(
        FieldDefaults::new()
            .with("text", json!({"maxlength": 80}))
            .with("fieldGroup", json!({"style": "seamless"})),
    );
    let composer = Composer::new(config, InMemoryRegistry::new());

    let location = json!([[{"param": "post_type", "operator": "==", "value": "post"}]]);
    let options = FieldsBuilder::new("post_options")
        .add_text("subtitle")
        .setting("location", location.clone())
        .build()
        .unwrap();

    let group = composer
        .compose_group(options, &FieldDefaults::new().with("text", json!({"placeholder": "Subtitle"})))
        .unwrap();

    assert_eq!(
        group.field_names(),
        vec!["subtitle", "design_tab", "custom_classes", "custom_id"]
    );
    assert_eq!(group.fields[0].get("placeholder"), Some(&json!("Subtitle")));
    assert!(group.fields[0].get("maxlength").is_none());
    assert_eq!(group.setting("style"), Some(&json!("seamless")));
    assert_eq!(group.setting("location"), Some(&location));

    let registry = composer.registrar();
    assert!(registry.is_empty());
    assert_eq!(registry.field_group("group_post_options"), Some(group));
}

#[test]
fn test_compose_group_without_location_adds_none() {
    let composer = Composer::new(ComposerConfig::default(), InMemoryRegistry::new());
    let options = FieldsBuilder::new("site_options").add_text("phone").build().unwrap();

    let group = composer.compose_group(options, &FieldDefaults::new()).unwrap();
    assert!(!composer::has_location_rule(&group));
    assert!(composer.registrar().is_empty());
}

#[test]
fn test_explicit_namespace_and_slug() {
    let composer = Composer::new(config(), InMemoryRegistry::new());
    let composed = composer
        .compose_value(json!({
            "name": "Quote",
            "slug": "pull-quote",
            "prefix": "theme/",
            "fields": {"key": "group_quote", "fields": [{"name": "text", "type": "textarea"}]},
        }))
        .unwrap()
        .unwrap();

    assert_eq!(composed.registration.name, "pull-quote");
    assert_eq!(composed.registration.title, "Quote");
    assert_eq!(composed.namespace, "theme/pull-quote");
    assert_eq!(composed.field_group.field_names(), vec!["text", "design_tab", "custom_classes", "custom_id"]);
}

#[test]
fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blockforge.json");
    std::fs::write(
        &path,
        json!({
            "defaults": {"image": {"return_format": "id"}},
            "globals": {
                "media_tab": {
                    "key": "group_shared",
                    "fields": [{"name": "media_tab", "type": "tab"}, {"name": "caption", "key": "field_shared_caption", "type": "text"}],
                },
            },
        })
        .to_string(),
    )
    .unwrap();

    let config = ComposerConfig::from_file(&path).unwrap();
    let composer = Composer::new(config, InMemoryRegistry::new());
    let composed = composer
        .compose_value(json!({
            "name": "Gallery",
            "fields": {
                "key": "group_gallery",
                "fields": [
                    {"name": "title", "type": "text"},
                    {"name": "media_tab", "type": "tab"},
                    {"name": "photo", "type": "image"},
                ],
            },
        }))
        .unwrap()
        .unwrap();

    let group = composed.field_group;
    assert_eq!(
        group.field_names(),
        vec!["title", "media_tab", "caption", "photo", "design_tab", "custom_classes", "custom_id"]
    );
    assert_eq!(group.fields[2].get("key"), Some(&json!("field_gallery_caption")));
    assert_eq!(group.fields[3].get("return_format"), Some(&json!("id")));
}

#[test]
fn test_config_file_errors() {
    let dir = tempdir().unwrap();

    let missing = ComposerConfig::from_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, RegistryError::Io(_)));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let broken = ComposerConfig::from_file(&path).unwrap_err();
    assert!(matches!(broken, RegistryError::InvalidConfig(_)));
}

#[test]
fn test_render_context_for_composed_block() {
    let composer = Composer::new(config(), InMemoryRegistry::new());
    let composed = composer.compose(hero_block()).unwrap().unwrap();

    let mut ids = BlockIds::new();
    let request: RenderRequest = serde_json::from_value(json!({
        "block": {"title": "Hero Banner", "align": "wide", "className": "is-dark"},
        "content": "",
        "preview": true,
        "post": 42,
    }))
    .unwrap();

    let first = BlockContext::new(composed.slug(), request.clone(), &mut ids);
    let second = BlockContext::new(composed.slug(), request, &mut ids);
    assert_eq!(first.id, "block-0");
    assert_eq!(second.id, "block-1");
    assert_eq!(first.classes, "b-hero-banner alignwide is-dark");
    assert_eq!(
        first.view_path(),
        std::path::PathBuf::from("views/blocks/hero-banner.blade.php")
    );

    let mut values = Map::new();
    values.insert("heading".to_string(), json!("Hello"));
    values.insert("dark".to_string(), json!(true));
    let mut extra = Map::new();
    extra.insert("heading".to_string(), json!("Overridden by the field"));
    extra.insert("posts".to_string(), json!([]));
    let data = first.hydrate(&composed.field_group, &values, extra);

    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["heading", "posts", "block", "content_tab", "design_tab", "custom_classes", "custom_id", "dark"]
    );
    assert_eq!(data["heading"], json!("Hello"));
    assert_eq!(data["posts"], json!([]));
    assert_eq!(data["custom_id"], json!(null));
    assert_eq!(data["block"]["post"], json!(42));
}

#[test]
fn test_resolve_view() {
    let dir = tempdir().unwrap();
    assert!(render::resolve_view(dir.path(), "hero").is_none());

    let views = dir.path().join("views/blocks");
    std::fs::create_dir_all(&views).unwrap();
    std::fs::write(views.join("hero.blade.php"), "<div></div>").unwrap();
    assert_eq!(
        render::resolve_view(dir.path(), "hero"),
        Some(views.join("hero.blade.php"))
    );
}
