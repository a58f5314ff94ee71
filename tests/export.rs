#[cfg(test)]
mod tests {
    use dexus::db::relations::RelationRow;
    use dexus::libs::export::{ExportFormat, Exporter};
    use dexus::libs::statistics::{RelationRecord, StatisticsSummary};
    use dexus::libs::status::{Flag, SentStatus};
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        rows: Vec<RelationRow>,
        summary: StatisticsSummary,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let rows = vec![
                RelationRow {
                    number: 1,
                    date: "10/03/2025".to_string(),
                    client_id: 1,
                    client_name: Some("ACME Consultoria Ltda".to_string()),
                    modality_description: Some("Remoto".to_string()),
                    service_description: Some("Suporte".to_string()),
                    consultant_name: Some("Ana Souza".to_string()),
                    total_time: Some("06:00".to_string()),
                    invoiced: Flag::Yes,
                    collected: Flag::No,
                    sent: SentStatus::Sent,
                },
                RelationRow {
                    number: 2,
                    date: "11/03/2025".to_string(),
                    client_id: 2,
                    client_name: Some("Maria Globex".to_string()),
                    modality_description: None,
                    service_description: Some("Treinamento".to_string()),
                    consultant_name: Some("Ana Souza".to_string()),
                    total_time: Some("02:00".to_string()),
                    invoiced: Flag::No,
                    collected: Flag::No,
                    sent: SentStatus::Pending,
                },
            ];
            let records: Vec<_> = rows
                .iter()
                .map(|r| RelationRecord::new(r.client_id, r.client_name.as_deref(), r.total_time.as_deref(), r.invoiced, r.collected))
                .collect();

            ExportTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                summary: StatisticsSummary::summarize(&records),
                rows,
            }
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_csv_export(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("relations.csv");
        let written = Exporter::new(ExportFormat::Csv, Some(path.clone()))
            .export(&ctx.rows, &ctx.summary)
            .unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert!(lines[0].starts_with("Number,Date,Client"));
        assert!(lines[1].starts_with("1,10/03/2025,ACME Consultoria Ltda,Remoto"));
        assert!(lines[1].contains(",06:00,S,N,S,"));
        assert!(content.contains("Segment,Count,Time,Percent"));
        assert!(content.contains("Invoiced,1,06:00,75%"));
        assert!(content.contains("Total,2,08:00,100%"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_json_export(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("relations.json");
        Exporter::new(ExportFormat::Json, Some(path.clone()))
            .export(&ctx.rows, &ctx.summary)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert_eq!(value["rows"][0]["invoiced"], "S");
        assert_eq!(value["statistics"]["invoiced_percent"], 75);
        assert_eq!(value["statistics"]["total_time"], "08:00");
        assert!(value["exported_at"].is_string());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_excel_export(ctx: &mut ExportTestContext) {
        let path = ctx.temp_dir.path().join("relations.xlsx");
        Exporter::new(ExportFormat::Excel, Some(path.clone()))
            .export(&ctx.rows, &ctx.summary)
            .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_default_file_name() {
        let exporter = Exporter::new(ExportFormat::Excel, None);
        let name = exporter.output_path().to_string_lossy().to_string();
        assert!(name.starts_with("dexus_relations_"));
        assert!(name.ends_with(".xlsx"));
    }
}
