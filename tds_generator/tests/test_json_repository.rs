#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tdsgenerator::error::TdsGeneratorError;
    use tdsgenerator::json_metadata::JsonRepository;
    use tdsgenerator::metadata::{DEFAULT_COLLECTION, MetadataRepository};
    use tempfile::TempDir;

    const METADATA: &str = r#"{
        "collection": {
            "name": "orders",
            "items": [
                {
                    "name": "Order Identifier",
                    "description": "Unique order number",
                    "physical_column_name": "order_id"
                },
                {
                    "name": "City",
                    "description": "Delivery city",
                    "groups": ["Location"],
                    "semantic_role": "[City].[Name]",
                    "hierarchies": [{"hierarchy": "Geography", "level": 20}]
                },
                {
                    "name": "Region",
                    "description": "Delivery region",
                    "groups": ["Location"],
                    "hierarchies": [{"hierarchy": "Geography", "level": 10}]
                },
                {
                    "name": "Discount",
                    "description": "Discount applied",
                    "default_format": "p0%",
                    "range": [0, 1],
                    "domain": ["0.1", 0.2]
                }
            ]
        }
    }"#;

    fn write_metadata(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("metadata.json");
        fs::write(&path, METADATA).unwrap();
        path
    }

    #[test]
    fn test_json_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::from_file(&write_metadata(&dir)).unwrap();
        let item = repository
            .get_metadata("Order Identifier", DEFAULT_COLLECTION)
            .unwrap();
        assert_eq!(item.name, "Order Identifier");
        assert_eq!(item.description.as_deref(), Some("Unique order number"));
        assert_eq!(item.physical_column_name.as_deref(), Some("order_id"));
    }

    #[test]
    fn test_named_collection() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::from_file(&write_metadata(&dir)).unwrap();
        assert!(repository.get_metadata("City", "orders").is_ok());
        assert!(repository.get_metadata("City", DEFAULT_COLLECTION).is_ok());
    }

    #[test]
    fn test_unknown_item() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::from_file(&write_metadata(&dir)).unwrap();
        let result = repository.get_metadata("Nope", DEFAULT_COLLECTION);
        assert!(matches!(result, Err(TdsGeneratorError::Configuration(_))));
    }

    #[test]
    fn test_unknown_collection() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::from_file(&write_metadata(&dir)).unwrap();
        let result = repository.get_metadata("City", "nope");
        assert!(matches!(result, Err(TdsGeneratorError::Configuration(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = JsonRepository::from_file(&PathBuf::from("no/such/metadata.json"));
        assert!(matches!(result, Err(TdsGeneratorError::MissingFile(_))));
    }

    #[test]
    fn test_item_details() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::from_file(&write_metadata(&dir)).unwrap();

        let city = repository.get_metadata("City", DEFAULT_COLLECTION).unwrap();
        assert_eq!(city.semantic_role.as_deref(), Some("[City].[Name]"));
        assert_eq!(city.groups.as_deref(), Some(&["Location".to_string()][..]));
        assert_eq!(city.hierarchies[0].name, "Geography");
        assert_eq!(city.hierarchies[0].level, 20);

        let discount = repository
            .get_metadata("Discount", DEFAULT_COLLECTION)
            .unwrap();
        assert_eq!(discount.default_format.as_deref(), Some("p0%"));
        assert_eq!(discount.range, Some((0.0, 1.0)));
        // Non-string domain values are carried as their textual form.
        assert_eq!(
            discount.domain.as_deref(),
            Some(&["0.1".to_string(), "0.2".to_string()][..])
        );
    }

    #[test]
    fn test_hierarchies_for_items() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::from_file(&write_metadata(&dir)).unwrap();
        let hierarchies = repository
            .get_hierarchies_for_items(
                &["City".to_string(), "Region".to_string()],
                DEFAULT_COLLECTION,
            )
            .unwrap();
        assert_eq!(hierarchies.len(), 1);
        assert_eq!(hierarchies[0].name, "Geography");
        // Region declares level 10, City level 20.
        assert_eq!(hierarchies[0].get_members(), vec!["Region", "City"]);
    }

    #[test]
    fn test_duplicate_item_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"collection": {"items": [
                {"name": "City", "description": "one"},
                {"name": "City", "description": "two"}
            ]}}"#,
        )
        .unwrap();
        let result = JsonRepository::from_file(&path);
        assert!(matches!(result, Err(TdsGeneratorError::Configuration(_))));
    }

    #[test]
    fn test_invalid_file_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, r#"{"fields": []}"#).unwrap();
        let result = JsonRepository::from_file(&path);
        assert!(matches!(result, Err(TdsGeneratorError::Json(_))));
    }
}
