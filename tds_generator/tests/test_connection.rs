#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tdsgenerator::connection::{CSV_CLASS, Connection, Federation};
    use tdsgenerator::error::TdsGeneratorError;
    use xml_builder::{XMLBuilder, XMLElement, XMLVersion};

    fn render(element: XMLElement) -> String {
        let mut xml = XMLBuilder::new()
            .version(XMLVersion::XML1_0)
            .encoding("UTF-8".into())
            .build();
        xml.set_root_element(element);
        let mut writer: Vec<u8> = Vec::new();
        xml.generate(&mut writer).unwrap();
        String::from_utf8(writer).unwrap()
    }

    #[test]
    fn test_csv_connection_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.csv");
        fs::write(&path, "col1,col2\n1,a\n2,b\n3,c\n").unwrap();

        let mut federation = Federation::new();
        federation.connect_to_csv(&path, false).unwrap();
        assert_eq!(federation.get_columns().unwrap(), vec!["col1", "col2"]);
    }

    #[test]
    fn test_csv_naming() {
        let connection = Connection::csv(Path::new("test/orders.csv"), false).unwrap();
        assert_eq!(connection.class_name(), CSV_CLASS);
        assert_eq!(connection.get_table_name(), "[orders#csv]");
        assert_eq!(connection.get_relation_name(), "[orders.csv]");

        let output = render(connection.to_xml());
        assert!(output.contains("filename=\"orders.csv\""));
        assert!(output.contains("directory=\"test\""));
        assert!(output.contains("class=\"textscan\""));
    }

    #[test]
    fn test_csv_packaged_directory() {
        let connection = Connection::csv(Path::new("test/orders.csv"), true).unwrap();
        let output = render(connection.to_xml());
        assert!(output.contains("directory=\"Data\""));
    }

    #[test]
    fn test_excel_requires_sheet_name() {
        let result = Connection::excel(Path::new("test/data.xlsx"), None, false);
        assert!(matches!(result, Err(TdsGeneratorError::Configuration(_))));
    }

    #[test]
    fn test_excel_sheet_naming() {
        let mut federation = Federation::new();
        federation
            .connect_to_excel(Path::new("test/data.xlsx"), Some("Sheet1"), false)
            .unwrap();
        let connection = federation.connection().unwrap();
        assert_eq!(connection.get_table_name(), "[Sheet1$]");
        assert_eq!(connection.get_relation_name(), "[Sheet1$]");
    }

    #[test]
    fn test_hyper_requires_table_name() {
        let result = Connection::hyper(Path::new("missing/data.hyper"), None, "public", false);
        assert!(matches!(result, Err(TdsGeneratorError::Configuration(_))));
    }

    #[test]
    fn test_hyper_naming() {
        let connection =
            Connection::hyper(Path::new("test/orders.hyper"), Some("orders"), "public", true)
                .unwrap();
        assert_eq!(connection.get_table_name(), "[public].[orders]");
        assert_eq!(connection.get_relation_name(), "orders");

        let output = render(connection.to_xml());
        assert!(output.contains("dbname=\"Data/orders.hyper\""));
        assert!(output.contains("filename=\"Data/orders.hyper\""));
        assert!(output.contains("class=\"hyper\""));
    }

    #[test]
    fn test_federation_requires_connection() {
        let federation = Federation::new();
        let result = federation.to_xml();
        assert!(matches!(result, Err(TdsGeneratorError::Configuration(_))));
    }

    #[test]
    fn test_federation_structure() {
        let mut federation = Federation::new();
        federation
            .connect_to_csv(Path::new("test/orders.csv"), false)
            .unwrap();
        let output = render(federation.to_xml().unwrap());
        assert!(output.contains("class=\"federated\""));
        assert!(output.contains("<named-connections"));
        assert!(output.contains("caption=\"Data\""));
        assert!(output.contains("connection=\"connection\""));
        assert!(output.contains("type=\"table\""));
    }
}
