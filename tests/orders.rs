#[cfg(test)]
mod tests {
    use dexus::db::clients::{Client, Clients, PersonKind};
    use dexus::db::consultants::{Consultant, Consultants};
    use dexus::db::db::Db;
    use dexus::db::orders::{OrderFilter, OrderInput, Orders};
    use dexus::db::relations::Relations;
    use dexus::db::services::{Service, Services};
    use dexus::libs::config::CompanyConfig;
    use dexus::libs::error::AppError;
    use dexus::libs::pagination::Pagination;
    use dexus::libs::pdf::PdfRenderer;
    use dexus::libs::status::{Flag, SentStatus};
    use rusqlite::params;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct OrderTestContext {
        temp_dir: TempDir,
        db: Db,
        client: i64,
        service: i64,
        consultant: i64,
    }

    impl TestContext for OrderTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("dexus.db")).unwrap();

            let mut client = Client::new(PersonKind::Company, "11222333000181", "ACME Consultoria Ltda");
            client.order_email = Some("os@acme.com.br".to_string());
            let client = Clients::new(&db.conn).create(&client).unwrap();
            let service = Services::new(&db.conn).create(&Service::new("ERP implementation")).unwrap();
            let consultant = Consultants::new(&db.conn).create(&Consultant::new("Ana Souza")).unwrap();

            OrderTestContext {
                temp_dir,
                db,
                client,
                service,
                consultant,
            }
        }
    }

    impl OrderTestContext {
        fn input(&self) -> OrderInput {
            OrderInput {
                client_id: Some(self.client),
                service_id: Some(self.service),
                consultant_id: Some(self.consultant),
                date: Some("15/03/2025".to_string()),
                start_time: Some("08:00".to_string()),
                end_time: Some("17:00".to_string()),
                discount_time: Some("01:00".to_string()),
                transfer_time: Some("00:30".to_string()),
                detail: Some("Go-live support".to_string()),
                ..Default::default()
            }
        }

        fn renderer(&self) -> PdfRenderer {
            PdfRenderer::new(CompanyConfig::default(), self.temp_dir.path().join("pdf"))
        }
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_total_is_computed_when_missing(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();

        let order = orders.get(id).unwrap();
        assert_eq!(order.total_time.as_deref(), Some("08:30"));
        assert_eq!(order.date, "15/03/2025");
        assert_eq!(order.sent, SentStatus::Pending);
        assert_eq!(order.client_name, "ACME Consultoria Ltda");
        assert_eq!(order.number(), format!("{:04}", id));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_overnight_order(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let input = OrderInput {
            start_time: Some("22:00".to_string()),
            end_time: Some("02:00".to_string()),
            discount_time: None,
            transfer_time: None,
            ..ctx.input()
        };
        let id = orders.create(&input).unwrap();
        assert_eq!(orders.get(id).unwrap().total_time.as_deref(), Some("04:00"));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_supplied_total_wins(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let input = OrderInput {
            total_time: Some("10:15".to_string()),
            ..ctx.input()
        };
        let id = orders.create(&input).unwrap();
        assert_eq!(orders.get(id).unwrap().total_time.as_deref(), Some("10:15"));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_input_checks(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);

        let missing_client = OrderInput {
            client_id: None,
            ..ctx.input()
        };
        assert!(matches!(orders.create(&missing_client), Err(AppError::Validation(_))));

        let bad_date = OrderInput {
            date: Some("31/02/2025".to_string()),
            ..ctx.input()
        };
        assert!(matches!(orders.create(&bad_date), Err(AppError::Validation(_))));

        let bad_time = OrderInput {
            end_time: Some("25:00".to_string()),
            ..ctx.input()
        };
        assert!(matches!(orders.create(&bad_time), Err(AppError::Validation(_))));

        let unknown_service = OrderInput {
            service_id: Some(999),
            ..ctx.input()
        };
        assert!(matches!(orders.create(&unknown_service), Err(AppError::Validation(_))));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_relation_follows_order(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let relations = Relations::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();

        let relation = relations.get(id).unwrap();
        assert_eq!(relation.date, "15/03/2025");
        assert_eq!(relation.total_time.as_deref(), Some("08:30"));
        assert_eq!(relation.invoiced, Flag::No);
        assert_eq!(relation.collected, Flag::No);

        let changed = OrderInput {
            date: Some("2025-03-20".to_string()),
            end_time: Some("18:00".to_string()),
            ..ctx.input()
        };
        orders.update(id, &changed).unwrap();

        let relation = relations.get(id).unwrap();
        assert_eq!(relation.date, "20/03/2025");
        assert_eq!(relation.total_time.as_deref(), Some("09:30"));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_send_locks_the_order(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();
        assert!(orders.can_modify(id).unwrap());

        let path = orders.send(id, &ctx.renderer()).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap().to_string_lossy(), format!("os_{:04}.pdf", id));
        assert_eq!(orders.status(id).unwrap(), SentStatus::Sent);
        assert!(!orders.can_modify(id).unwrap());

        assert!(matches!(orders.update(id, &ctx.input()), Err(AppError::Locked(_))));
        assert!(matches!(orders.delete(id), Err(AppError::Locked(_))));
        assert!(matches!(orders.send(id, &ctx.renderer()), Err(AppError::Locked(_))));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_schema_refuses_writes_to_sent_orders(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();
        orders.send(id, &ctx.renderer()).unwrap();

        let result = ctx
            .db
            .conn
            .execute("UPDATE service_orders SET detail = 'changed' WHERE id = ?1", params![id]);
        assert!(result.is_err());
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_flags_stay_editable_after_send(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let relations = Relations::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();
        orders.send(id, &ctx.renderer()).unwrap();

        relations.set_invoiced(id, Flag::Yes).unwrap();
        relations.set_collected(id, Flag::Yes).unwrap();
        let relation = relations.get(id).unwrap();
        assert_eq!(relation.invoiced, Flag::Yes);
        assert_eq!(relation.collected, Flag::Yes);
        assert_eq!(relation.sent, SentStatus::Sent);
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_send_requires_order_email(ctx: &mut OrderTestContext) {
        let conn = &ctx.db.conn;
        let client = Clients::new(conn)
            .create(&Client::new(PersonKind::Individual, "52998224725", "João Silva"))
            .unwrap();
        let orders = Orders::new(conn);
        let id = orders
            .create(&OrderInput {
                client_id: Some(client),
                ..ctx.input()
            })
            .unwrap();

        assert!(matches!(orders.send(id, &ctx.renderer()), Err(AppError::Validation(_))));
        assert_eq!(orders.status(id).unwrap(), SentStatus::Pending);
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_failed_send_leaves_no_pdf(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();
        ctx.db
            .conn
            .execute_batch(
                "CREATE TRIGGER refuse_send BEFORE UPDATE OF sent ON service_orders
                 BEGIN SELECT RAISE(ABORT, 'send refused'); END;",
            )
            .unwrap();

        assert!(matches!(orders.send(id, &ctx.renderer()), Err(AppError::Database(_))));
        assert_eq!(orders.status(id).unwrap(), SentStatus::Pending);
        assert!(!ctx.temp_dir.path().join("pdf").join(format!("os_{:04}.pdf", id)).exists());
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_delete_removes_relation(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let id = orders.create(&ctx.input()).unwrap();

        orders.delete(id).unwrap();
        assert!(matches!(orders.get(id), Err(AppError::NotFound(_))));
        assert!(matches!(Relations::new(&ctx.db.conn).get(id), Err(AppError::NotFound(_))));
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_list_filters(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        let first = orders.create(&ctx.input()).unwrap();
        let second = orders
            .create(&OrderInput {
                date: Some("02/04/2025".to_string()),
                ..ctx.input()
            })
            .unwrap();
        orders.send(first, &ctx.renderer()).unwrap();

        let all = orders.list(&OrderFilter::default(), Pagination::default()).unwrap();
        assert_eq!(all.page.total, 2);
        assert_eq!(all.items[0].id, second);

        let april = OrderFilter {
            date_from: Some("01/04/2025".to_string()),
            ..Default::default()
        };
        let paged = orders.list(&april, Pagination::default()).unwrap();
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].id, second);

        let sent = OrderFilter {
            sent: Some("S".to_string()),
            ..Default::default()
        };
        let paged = orders.list(&sent, Pagination::default()).unwrap();
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].id, first);
    }

    #[test_context(OrderTestContext)]
    #[test]
    fn test_unknown_order(ctx: &mut OrderTestContext) {
        let orders = Orders::new(&ctx.db.conn);
        assert!(matches!(orders.get(77), Err(AppError::NotFound(_))));
        assert!(matches!(orders.update(77, &ctx.input()), Err(AppError::NotFound(_))));
        assert!(matches!(orders.can_modify(77), Err(AppError::NotFound(_))));
    }
}
