use super::*;

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
}

#[test]
fn resource_paths_prefix_extension_characters() {
    let paths = ResourcePaths::default();
    let lea = CharacterId::parse("main.lea").unwrap();
    let manlea = CharacterId::parse("main.manlea").unwrap();

    assert_eq!(paths.character_json(&lea), "data/characters/main/lea.json");
    assert_eq!(paths.face_image(&lea, "lea.png"), "media/face/lea.png");
    assert_eq!(
        paths.character_json(&manlea),
        "extension/manlea/data/characters/main/manlea.json"
    );
    assert_eq!(
        paths.face_image(&manlea, "manlea.png"),
        "extension/manlea/media/face/manlea.png"
    );
    assert!(!ResourcePaths::new(Vec::<String>::new()).is_extension("manlea"));
}

#[test]
fn memory_loader_distinguishes_load_and_parse_errors() {
    let mut loader = MemoryLoader::new();
    loader.insert_bytes("broken.json", b"{ nope".to_vec());
    loader.insert_json("ok.json", &serde_json::json!({ "a": 1 }));

    assert!(matches!(
        loader.get_json("missing.json"),
        Err(FlipbookError::Load { .. })
    ));
    assert!(matches!(
        loader.get_json("broken.json"),
        Err(FlipbookError::Parse { .. })
    ));
    assert_eq!(loader.get_json("ok.json").unwrap()["a"], 1);
    assert_eq!(loader.json_load_count(), 3);

    assert!(matches!(
        loader.get_image("broken.json"),
        Err(FlipbookError::Load { .. })
    ));
    assert_eq!(loader.image_load_count(), 1);
}

#[test]
fn fs_loader_rejects_escaping_paths() {
    let loader = FsLoader::new(".");
    assert!(matches!(
        loader.get_json("../outside.json"),
        Err(FlipbookError::Validation(_))
    ));
}
