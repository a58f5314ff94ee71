#[cfg(test)]
mod tests {
    use dexus::db::orders::ServiceOrder;
    use dexus::db::relations::{AppliedFilters, RelationFilter, RelationRow};
    use dexus::libs::config::CompanyConfig;
    use dexus::libs::pdf::PdfRenderer;
    use dexus::libs::statistics::{RelationRecord, StatisticsSummary};
    use dexus::libs::status::{Flag, SentStatus};
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct PdfTestContext {
        temp_dir: TempDir,
        renderer: PdfRenderer,
    }

    impl TestContext for PdfTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let company = CompanyConfig {
                name: "Dexus Consultoria".to_string(),
                document: "11222333000181".to_string(),
                address: "Rua das Flores, 100".to_string(),
                phone: "(11) 4000-0000".to_string(),
                email: "contato@dexus.com.br".to_string(),
            };
            let renderer = PdfRenderer::new(company, temp_dir.path().join("pdf"));
            PdfTestContext { temp_dir, renderer }
        }
    }

    fn order() -> ServiceOrder {
        ServiceOrder {
            id: 7,
            client_id: 1,
            client_name: "ACME Consultoria Ltda".to_string(),
            client_document: "11222333000181".to_string(),
            client_order_email: Some("os@acme.com.br".to_string()),
            modality_id: None,
            modality_description: None,
            on_site_contact: Some("Carlos".to_string()),
            date: "15/03/2025".to_string(),
            start_time: Some("08:00".to_string()),
            end_time: Some("17:00".to_string()),
            discount_time: Some("01:00".to_string()),
            transfer_time: Some("00:30".to_string()),
            total_time: Some("08:30".to_string()),
            service_id: 1,
            service_description: "Implantação do ERP".to_string(),
            consultant_id: 1,
            consultant_name: "Ana Souza".to_string(),
            detail: Some("Configuração dos módulos fiscal e financeiro. ".repeat(10)),
            sent: SentStatus::Pending,
            created_at: None,
        }
    }

    fn rows(count: i64) -> Vec<RelationRow> {
        (1..=count)
            .map(|number| RelationRow {
                number,
                date: "10/03/2025".to_string(),
                client_id: 1,
                client_name: Some("ACME Consultoria Ltda".to_string()),
                modality_description: None,
                service_description: Some("Suporte".to_string()),
                consultant_name: Some("Ana Souza".to_string()),
                total_time: Some("01:30".to_string()),
                invoiced: if number % 2 == 0 { Flag::Yes } else { Flag::No },
                collected: Flag::No,
                sent: SentStatus::Sent,
            })
            .collect()
    }

    fn summary(rows: &[RelationRow]) -> StatisticsSummary {
        let records: Vec<_> = rows
            .iter()
            .map(|r| RelationRecord::new(r.client_id, r.client_name.as_deref(), r.total_time.as_deref(), r.invoiced, r.collected))
            .collect();
        StatisticsSummary::summarize(&records)
    }

    fn age(path: &std::path::Path, hours: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(hours * 3600)).unwrap();
    }

    #[test_context(PdfTestContext)]
    #[test]
    fn test_order_document(ctx: &mut PdfTestContext) {
        let bytes = ctx.renderer.order_pdf(&order()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test_context(PdfTestContext)]
    #[test]
    fn test_save_order_file_name(ctx: &mut PdfTestContext) {
        let path = ctx.renderer.save_order(&order()).unwrap();
        assert_eq!(path, ctx.temp_dir.path().join("pdf").join("os_0007.pdf"));
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test_context(PdfTestContext)]
    #[test]
    fn test_relation_report_pages(ctx: &mut PdfTestContext) {
        let short = rows(3);
        let bytes = ctx.renderer.relation_pdf(&short, &summary(&short), &AppliedFilters::default()).unwrap();
        assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 1);

        let long = rows(120);
        let filters = AppliedFilters {
            filter: RelationFilter {
                client: Some(1),
                date_from: Some("01/03/2025".to_string()),
                ..Default::default()
            },
            client_name: Some("ACME Consultoria Ltda".to_string()),
        };
        let bytes = ctx.renderer.relation_pdf(&long, &summary(&long), &filters).unwrap();
        assert!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len() > 2);
    }

    #[test_context(PdfTestContext)]
    #[test]
    fn test_empty_relation_report(ctx: &mut PdfTestContext) {
        let bytes = ctx
            .renderer
            .relation_pdf(&[], &StatisticsSummary::default(), &AppliedFilters::default())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test_context(PdfTestContext)]
    #[test]
    fn test_save_relations_file_name(ctx: &mut PdfTestContext) {
        let rows = rows(2);
        let path = ctx.renderer.save_relations(&rows, &summary(&rows), &AppliedFilters::default()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("relacao_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test_context(PdfTestContext)]
    #[test]
    fn test_cleanup_removes_only_old_reports(ctx: &mut PdfTestContext) {
        assert_eq!(ctx.renderer.cleanup_pdf_files(Duration::from_secs(3600)).unwrap(), 0);

        let dir = ctx.renderer.output_dir().to_path_buf();
        let old_order = ctx.renderer.save_order(&order()).unwrap();
        let rows = rows(1);
        let fresh_report = ctx.renderer.save_relations(&rows, &summary(&rows), &AppliedFilters::default()).unwrap();
        let unrelated = dir.join("contrato.pdf");
        fs::write(&unrelated, b"%PDF-1.4").unwrap();

        age(&old_order, 48);
        age(&unrelated, 48);

        let removed = ctx.renderer.cleanup_pdf_files(Duration::from_secs(24 * 3600)).unwrap();
        assert_eq!(removed, 1);
        assert!(!old_order.exists());
        assert!(fresh_report.exists());
        assert!(unrelated.exists());
    }
}
