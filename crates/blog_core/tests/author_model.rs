use blog_core::{validate_name, validate_phone_number, Author, AuthorPatch, NewAuthor};

#[test]
fn phone_number_requires_exactly_ten_digits() {
    for valid in ["5551234567", "0000000000", "9999999999"] {
        assert!(validate_phone_number(valid).is_ok(), "{valid} should pass");
    }

    for invalid in [
        "555-123-456",
        "12345",
        "",
        "55512345678",
        "555123456a",
        " 5551234567",
        "555 123 4567",
        "+155512345",
    ] {
        let err = validate_phone_number(invalid).unwrap_err();
        assert_eq!(err.field(), "phone_number", "{invalid} should fail");
        assert_eq!(err.message(), "Phone numbers must be exactly ten digits.");
    }
}

#[test]
fn name_is_required() {
    let err = validate_name("").unwrap_err();
    assert_eq!(err.field(), "name");
    assert_eq!(err.to_string(), "Author must have a name.");
    assert!(validate_name("Ada Lovelace").is_ok());
}

#[test]
fn new_author_rejects_first_invalid_field() {
    let err = NewAuthor::new("", "12345").unwrap_err();
    assert_eq!(err.field(), "name");

    let err = NewAuthor::new("Ada", "12345").unwrap_err();
    assert_eq!(err.field(), "phone_number");

    let author = NewAuthor::new("Ada", "5551234567").unwrap();
    assert_eq!(author.name, "Ada");
    assert_eq!(author.phone_number, "5551234567");
}

#[test]
fn new_author_deserialization_runs_field_rules() {
    let valid: NewAuthor =
        serde_json::from_value(serde_json::json!({"name": "Ada", "phone_number": "5551234567"}))
            .unwrap();
    assert_eq!(valid.name, "Ada");

    let err = serde_json::from_value::<NewAuthor>(
        serde_json::json!({"name": "Ada", "phone_number": "555-123-456"}),
    )
    .unwrap_err();
    assert!(
        err.to_string()
            .contains("Phone numbers must be exactly ten digits."),
        "unexpected error: {err}"
    );
}

#[test]
fn patch_serialization_omits_unchanged_fields() {
    let patch = AuthorPatch {
        name: Some("Grace".to_string()),
        phone_number: None,
    };
    let json = serde_json::to_value(&patch).unwrap();
    assert_eq!(json, serde_json::json!({"name": "Grace"}));

    let decoded: AuthorPatch = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn patch_rejects_invalid_changed_field() {
    let patch = AuthorPatch {
        name: None,
        phone_number: Some("12345".to_string()),
    };
    assert_eq!(patch.validate().unwrap_err().field(), "phone_number");
}

#[test]
fn author_display_shows_id_and_name() {
    let author = Author {
        id: 7,
        name: "Ada".to_string(),
        phone_number: "5551234567".to_string(),
        created_at: 0,
        updated_at: 0,
    };
    assert_eq!(author.to_string(), "Author(id=7, name=Ada)");
}
