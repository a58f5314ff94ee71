#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use dexus::db::clients::{Client, Clients, PersonKind};
    use dexus::db::consultants::{Consultant, Consultants};
    use dexus::db::dashboard::Dashboard;
    use dexus::db::db::Db;
    use dexus::db::orders::{OrderInput, Orders};
    use dexus::db::relations::{RelationFilter, Relations};
    use dexus::db::services::{Service, Services};
    use dexus::libs::duration::Duration;
    use dexus::libs::error::AppError;
    use dexus::libs::pagination::Pagination;
    use dexus::libs::status::Flag;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RelationTestContext {
        _temp_dir: TempDir,
        db: Db,
        acme: i64,
        globex: i64,
        service: i64,
        consultant: i64,
    }

    impl TestContext for RelationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("dexus.db")).unwrap();

            let clients = Clients::new(&db.conn);
            let acme = clients
                .create(&Client::new(PersonKind::Company, "11222333000181", "ACME Consultoria Ltda"))
                .unwrap();
            let globex = clients
                .create(&Client::new(PersonKind::Individual, "52998224725", "Maria Globex"))
                .unwrap();
            let service = Services::new(&db.conn).create(&Service::new("Training")).unwrap();
            let consultant = Consultants::new(&db.conn).create(&Consultant::new("Ana Souza")).unwrap();

            RelationTestContext {
                _temp_dir: temp_dir,
                db,
                acme,
                globex,
                service,
                consultant,
            }
        }
    }

    impl RelationTestContext {
        fn order(&self, client: i64, date: &str, total: &str) -> i64 {
            Orders::new(&self.db.conn)
                .create(&OrderInput {
                    client_id: Some(client),
                    service_id: Some(self.service),
                    consultant_id: Some(self.consultant),
                    date: Some(date.to_string()),
                    total_time: Some(total.to_string()),
                    ..Default::default()
                })
                .unwrap()
        }
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_flags_default_to_no(ctx: &mut RelationTestContext) {
        let id = ctx.order(ctx.acme, "10/03/2025", "04:00");
        let row = Relations::new(&ctx.db.conn).get(id).unwrap();

        assert_eq!(row.number, id);
        assert_eq!(row.client_name.as_deref(), Some("ACME Consultoria Ltda"));
        assert_eq!(row.service_description.as_deref(), Some("Training"));
        assert_eq!(row.invoiced, Flag::No);
        assert_eq!(row.collected, Flag::No);
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_set_flags(ctx: &mut RelationTestContext) {
        let relations = Relations::new(&ctx.db.conn);
        let id = ctx.order(ctx.acme, "10/03/2025", "04:00");

        relations.set_invoiced(id, Flag::Yes).unwrap();
        let row = relations.get(id).unwrap();
        assert_eq!(row.invoiced, Flag::Yes);
        assert_eq!(row.collected, Flag::No);

        relations.set_collected(id, Flag::Yes).unwrap();
        relations.set_invoiced(id, Flag::No).unwrap();
        let row = relations.get(id).unwrap();
        assert_eq!(row.invoiced, Flag::No);
        assert_eq!(row.collected, Flag::Yes);

        assert!(matches!(relations.set_invoiced(404, Flag::Yes), Err(AppError::NotFound(_))));
        assert!(matches!(relations.set_collected(404, Flag::Yes), Err(AppError::NotFound(_))));
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_statistics_from_store(ctx: &mut RelationTestContext) {
        let relations = Relations::new(&ctx.db.conn);
        let first = ctx.order(ctx.acme, "10/03/2025", "07:00");
        ctx.order(ctx.globex, "11/03/2025", "01:00");
        relations.set_invoiced(first, Flag::Yes).unwrap();

        let summary = relations.statistics(&RelationFilter::default());
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.invoiced_count, 1);
        assert_eq!(summary.not_invoiced_count, 1);
        assert_eq!(summary.total_time, Duration::from_minutes(8 * 60));
        assert_eq!(summary.invoiced_time.to_string(), "07:00");
        assert_eq!(summary.invoiced_percent, 88);
        assert_eq!(summary.not_invoiced_percent, 13);
        assert_eq!(summary.collected_count, 0);
        assert_eq!(summary.not_collected_percent, 100);

        let names: Vec<_> = summary.clients.iter().map(|c| c.client_name.as_str()).collect();
        assert_eq!(names, ["ACME Consultoria Ltda", "Maria Globex"]);
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_oversized_totals_are_refused_and_ignored(ctx: &mut RelationTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let oversized = OrderInput {
            client_id: Some(ctx.acme),
            service_id: Some(ctx.service),
            consultant_id: Some(ctx.consultant),
            date: Some("10/03/2025".to_string()),
            total_time: Some("99999999999999999999:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(orders.create(&oversized), Err(AppError::Validation(_))));

        let id = ctx.order(ctx.acme, "10/03/2025", "02:00");
        ctx.order(ctx.globex, "11/03/2025", "01:00");
        ctx.db
            .conn
            .execute(
                "UPDATE order_relations SET total_time = '99999999999999999999:00' WHERE order_id = ?1",
                [id],
            )
            .unwrap();

        let relations = Relations::new(&ctx.db.conn);
        let summary = relations.statistics(&RelationFilter::default());
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.total_time.to_string(), "01:00");

        let list = relations.list(&RelationFilter::default(), Pagination::new(1, 10)).unwrap();
        assert_eq!(list.statistics.total_time.to_string(), "01:00");
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_list_carries_statistics_and_filters(ctx: &mut RelationTestContext) {
        let relations = Relations::new(&ctx.db.conn);
        ctx.order(ctx.acme, "10/03/2025", "02:00");
        ctx.order(ctx.acme, "12/03/2025", "03:00");
        ctx.order(ctx.globex, "11/03/2025", "05:00");

        let filter = RelationFilter {
            client: Some(ctx.acme),
            ..Default::default()
        };
        let list = relations.list(&filter, Pagination::new(1, 1)).unwrap();

        assert_eq!(list.rows.items.len(), 1);
        assert_eq!(list.rows.page.total, 2);
        assert_eq!(list.rows.page.total_pages, 2);
        assert_eq!(list.statistics.total_count, 2);
        assert_eq!(list.statistics.total_time.to_string(), "05:00");
        assert_eq!(list.filters.client_name.as_deref(), Some("ACME Consultoria Ltda"));
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_flag_and_date_filters(ctx: &mut RelationTestContext) {
        let relations = Relations::new(&ctx.db.conn);
        let march = ctx.order(ctx.acme, "10/03/2025", "02:00");
        let april = ctx.order(ctx.globex, "05/04/2025", "03:00");
        relations.set_collected(april, Flag::Yes).unwrap();

        let collected = RelationFilter {
            collected: Some("s".to_string()),
            ..Default::default()
        };
        let rows = relations.all(&collected).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number, april);

        let until_march = RelationFilter {
            date_to: Some("31/03/2025".to_string()),
            ..Default::default()
        };
        let rows = relations.all(&until_march).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number, march);

        let ignored = RelationFilter {
            invoiced: Some("maybe".to_string()),
            ..Default::default()
        };
        assert_eq!(relations.all(&ignored).unwrap().len(), 2);
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_empty_selection(ctx: &mut RelationTestContext) {
        let relations = Relations::new(&ctx.db.conn);
        let filter = RelationFilter {
            client: Some(ctx.globex),
            ..Default::default()
        };
        let list = relations.list(&filter, Pagination::default()).unwrap();

        assert!(list.rows.items.is_empty());
        assert_eq!(list.statistics.total_count, 0);
        assert!(list.statistics.total_time.is_zero());
        assert_eq!(list.statistics.invoiced_percent, 0);
    }

    #[test_context(RelationTestContext)]
    #[test]
    fn test_dashboard_counters(ctx: &mut RelationTestContext) {
        let relations = Relations::new(&ctx.db.conn);
        let first = ctx.order(ctx.acme, "03/03/2025", "02:00");
        ctx.order(ctx.acme, "20/03/2025", "02:00");
        ctx.order(ctx.globex, "15/01/2025", "02:00");
        ctx.order(ctx.globex, "15/06/2024", "02:00");
        relations.set_invoiced(first, Flag::Yes).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 25).unwrap();
        let stats = Dashboard::new(&ctx.db.conn).stats_at(today).unwrap();

        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.orders_this_month, 2);
        assert_eq!(stats.pending_orders, 4);
        assert_eq!(stats.not_invoiced, 3);
        assert_eq!(stats.not_collected, 4);

        let months: Vec<_> = stats.monthly_orders.iter().map(|m| (m.month.as_str(), m.orders)).collect();
        assert_eq!(
            months,
            [("10/2024", 0), ("11/2024", 0), ("12/2024", 0), ("01/2025", 1), ("02/2025", 0), ("03/2025", 2)]
        );
    }
}
