#[cfg(test)]
mod tests {
    use dexus::db::clients::{Client, Clients, PersonKind};
    use dexus::db::consultants::{Consultant, ConsultantFilter, Consultants};
    use dexus::db::db::Db;
    use dexus::db::modalities::{Modalities, Modality, ModalityFilter};
    use dexus::db::services::{Service, ServiceFilter, Services};
    use dexus::libs::error::AppError;
    use dexus::libs::pagination::Pagination;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct CatalogTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for CatalogTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("dexus.db")).unwrap();
            CatalogTestContext { _temp_dir: temp_dir, db }
        }
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_modality_crud(ctx: &mut CatalogTestContext) {
        let modalities = Modalities::new(&ctx.db.conn);

        let id = modalities.create(&Modality::new("  Monthly contract ")).unwrap();
        assert_eq!(modalities.get(id).unwrap().description, "Monthly contract");

        modalities.update(id, &Modality::new("Hourly bank")).unwrap();
        assert_eq!(modalities.get(id).unwrap().description, "Hourly bank");

        modalities.delete(id).unwrap();
        assert!(matches!(modalities.get(id), Err(AppError::NotFound(_))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_modality_requires_description(ctx: &mut CatalogTestContext) {
        let modalities = Modalities::new(&ctx.db.conn);
        assert!(matches!(modalities.create(&Modality::new("   ")), Err(AppError::Validation(_))));
        assert!(matches!(modalities.update(99, &Modality::new("Other")), Err(AppError::NotFound(_))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_modality_in_use_cannot_be_deleted(ctx: &mut CatalogTestContext) {
        let conn = &ctx.db.conn;
        let modality = Modalities::new(conn).create(&Modality::new("On site")).unwrap();

        let mut client = Client::new(PersonKind::Company, "11222333000181", "ACME Ltda");
        client.modality_id = Some(modality);
        Clients::new(conn).create(&client).unwrap();

        assert!(!Modalities::new(conn).can_delete(modality).unwrap());
        assert!(matches!(Modalities::new(conn).delete(modality), Err(AppError::Conflict(_))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_modality_list_filters_and_pages(ctx: &mut CatalogTestContext) {
        let modalities = Modalities::new(&ctx.db.conn);
        for name in ["Remote", "On site", "Hourly bank", "Remote support"] {
            modalities.create(&Modality::new(name)).unwrap();
        }

        let filter = ModalityFilter {
            description: Some("remote".to_string()),
            ..Default::default()
        };
        let paged = modalities.list(&filter, Pagination::default()).unwrap();
        assert_eq!(paged.page.total, 2);
        assert_eq!(paged.items[0].description, "Remote");

        let paged = modalities.list(&ModalityFilter::default(), Pagination::new(2, 3)).unwrap();
        assert_eq!(paged.page.total_pages, 2);
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].description, "Remote support");
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_service_crud(ctx: &mut CatalogTestContext) {
        let services = Services::new(&ctx.db.conn);

        let id = services.create(&Service::new("ERP implementation")).unwrap();
        services.create(&Service::new("Training")).unwrap();
        services.update(id, &Service::new("ERP rollout")).unwrap();

        let filter = ServiceFilter {
            code: Some(id),
            ..Default::default()
        };
        let paged = services.list(&filter, Pagination::default()).unwrap();
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].description, "ERP rollout");
        assert_eq!(services.all().unwrap().len(), 2);

        assert!(services.can_delete(id).unwrap());
        services.delete(id).unwrap();
        assert_eq!(services.all().unwrap().len(), 1);
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_consultant_normalization(ctx: &mut CatalogTestContext) {
        let consultants = Consultants::new(&ctx.db.conn);

        let mut consultant = Consultant::new(" Ana Souza ");
        consultant.phone = Some("(11) 98765-4321".to_string());
        consultant.email = Some("ana@dexus.com.br".to_string());
        consultant.expertise = Some("  ".to_string());
        consultant.hourly_rate = Some(180.0);
        let id = consultants.create(&consultant).unwrap();

        let stored = consultants.get(id).unwrap();
        assert_eq!(stored.name, "Ana Souza");
        assert_eq!(stored.phone.as_deref(), Some("11987654321"));
        assert_eq!(stored.expertise, None);
        assert_eq!(stored.hourly_rate, Some(180.0));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_consultant_rejects_bad_contact(ctx: &mut CatalogTestContext) {
        let consultants = Consultants::new(&ctx.db.conn);

        let mut consultant = Consultant::new("Bruno");
        consultant.email = Some("bruno-at-dexus".to_string());
        assert!(matches!(consultants.create(&consultant), Err(AppError::Validation(_))));

        let mut consultant = Consultant::new("Bruno");
        consultant.phone = Some("1234".to_string());
        assert!(matches!(consultants.create(&consultant), Err(AppError::Validation(_))));

        assert!(matches!(consultants.create(&Consultant::new("")), Err(AppError::Validation(_))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_consultant_search(ctx: &mut CatalogTestContext) {
        let consultants = Consultants::new(&ctx.db.conn);
        let mut ana = Consultant::new("Ana Souza");
        ana.expertise = Some("Finance".to_string());
        consultants.create(&ana).unwrap();
        consultants.create(&Consultant::new("Bruno Lima")).unwrap();

        let filter = ConsultantFilter {
            expertise: Some("fin".to_string()),
            ..Default::default()
        };
        let paged = consultants.list(&filter, Pagination::default()).unwrap();
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].name, "Ana Souza");
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_pickers_are_sorted(ctx: &mut CatalogTestContext) {
        let conn = &ctx.db.conn;
        Modalities::new(conn).create(&Modality::new("Remote")).unwrap();
        Modalities::new(conn).create(&Modality::new("Hourly bank")).unwrap();
        Consultants::new(conn).create(&Consultant::new("Bruno Lima")).unwrap();
        Consultants::new(conn).create(&Consultant::new("Ana Souza")).unwrap();

        let modalities: Vec<_> = Modalities::new(conn).all().unwrap().into_iter().map(|m| m.description).collect();
        assert_eq!(modalities, ["Hourly bank", "Remote"]);

        let consultants: Vec<_> = Consultants::new(conn).all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(consultants, ["Ana Souza", "Bruno Lima"]);
    }
}
