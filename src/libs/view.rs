use crate::db::clients::Client;
use crate::db::consultants::Consultant;
use crate::db::dashboard::DashboardStats;
use crate::db::migrations::AppliedMigration;
use crate::db::modalities::Modality;
use crate::db::orders::ServiceOrder;
use crate::db::relations::RelationRow;
use crate::db::services::Service;
use crate::libs::dates::USER_DATETIME_FORMAT;
use crate::libs::statistics::StatisticsSummary;
use crate::libs::validation::{format_document, format_money, format_phone};
use prettytable::{row, Table};

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn money(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_default()
}

/// Terminal tables for every listing.
pub struct View {}

impl View {
    pub fn migrations(history: &[AppliedMigration]) {
        let mut table = Table::new();
        table.add_row(row!["VERSION", "NAME", "APPLIED"]);
        for m in history {
            let applied = m
                .applied_at
                .map(|t| t.format(USER_DATETIME_FORMAT).to_string())
                .unwrap_or_default();
            table.add_row(row![format!("v{}", m.version), m.name, applied]);
        }
        table.printstd();
    }

    pub fn modalities(modalities: &[Modality]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "DESCRIPTION"]);
        for m in modalities {
            table.add_row(row![m.id.unwrap_or(0), m.description]);
        }
        table.printstd();
    }

    pub fn services(services: &[Service]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "DESCRIPTION"]);
        for s in services {
            table.add_row(row![s.id.unwrap_or(0), s.description]);
        }
        table.printstd();
    }

    pub fn consultants(consultants: &[Consultant]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "NAME", "PHONE", "EMAIL", "EXPERTISE", "RATE"]);
        for c in consultants {
            table.add_row(row![
                c.id.unwrap_or(0),
                c.name,
                c.phone.as_deref().map(format_phone).unwrap_or_default(),
                opt(&c.email),
                opt(&c.expertise),
                money(c.hourly_rate)
            ]);
        }
        table.printstd();
    }

    pub fn clients(clients: &[Client]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "TYPE", "DOCUMENT", "LEGAL NAME", "CITY", "UF", "MODALITY", "RATE"]);
        for c in clients {
            table.add_row(row![
                c.id.unwrap_or(0),
                c.kind.code(),
                format_document(&c.document),
                c.legal_name,
                opt(&c.city),
                opt(&c.state),
                opt(&c.modality_description),
                money(c.hourly_rate)
            ]);
        }
        table.printstd();
    }

    pub fn client(client: &Client) {
        let mut table = Table::new();
        table.add_row(row!["ID", client.id.unwrap_or(0)]);
        table.add_row(row!["TYPE", client.kind.code()]);
        table.add_row(row!["DOCUMENT", format_document(&client.document)]);
        table.add_row(row!["LEGAL NAME", client.legal_name]);
        table.add_row(row!["TRADE NAME", opt(&client.trade_name)]);
        table.add_row(row!["CITY", opt(&client.city)]);
        table.add_row(row!["UF", opt(&client.state)]);
        table.add_row(row!["CONTACT", opt(&client.contact)]);
        table.add_row(row!["OS EMAIL", opt(&client.order_email)]);
        table.add_row(row!["INVOICE EMAIL", opt(&client.invoice_email)]);
        table.add_row(row!["MODALITY", opt(&client.modality_description)]);
        table.add_row(row!["RATE", money(client.hourly_rate)]);
        table.printstd();
    }

    pub fn orders(orders: &[ServiceOrder]) {
        let mut table = Table::new();
        table.add_row(row!["NUMBER", "DATE", "CLIENT", "SERVICE", "CONSULTANT", "TOTAL", "SENT"]);
        for o in orders {
            table.add_row(row![
                o.number(),
                o.date,
                o.client_name,
                o.service_description,
                o.consultant_name,
                opt(&o.total_time),
                o.sent.code()
            ]);
        }
        table.printstd();
    }

    pub fn order(order: &ServiceOrder) {
        let mut table = Table::new();
        table.add_row(row!["NUMBER", order.number()]);
        table.add_row(row!["CLIENT", order.client_name]);
        table.add_row(row!["DOCUMENT", format_document(&order.client_document)]);
        table.add_row(row!["MODALITY", opt(&order.modality_description)]);
        table.add_row(row!["ON-SITE CONTACT", opt(&order.on_site_contact)]);
        table.add_row(row!["DATE", order.date]);
        table.add_row(row!["START", opt(&order.start_time)]);
        table.add_row(row!["END", opt(&order.end_time)]);
        table.add_row(row!["DISCOUNT", opt(&order.discount_time)]);
        table.add_row(row!["TRANSFER", opt(&order.transfer_time)]);
        table.add_row(row!["TOTAL", opt(&order.total_time)]);
        table.add_row(row!["SERVICE", order.service_description]);
        table.add_row(row!["CONSULTANT", order.consultant_name]);
        table.add_row(row!["DETAIL", opt(&order.detail)]);
        table.add_row(row!["SENT", order.sent.code()]);
        table.printstd();
    }

    pub fn relations(rows: &[RelationRow]) {
        let mut table = Table::new();
        table.add_row(row!["NUMBER", "DATE", "CLIENT", "SERVICE", "CONSULTANT", "TOTAL", "INVOICED", "COLLECTED"]);
        for r in rows {
            table.add_row(row![
                format!("{:04}", r.number),
                r.date,
                opt(&r.client_name),
                opt(&r.service_description),
                opt(&r.consultant_name),
                opt(&r.total_time),
                r.invoiced.code(),
                r.collected.code()
            ]);
        }
        table.printstd();
    }

    pub fn statistics(summary: &StatisticsSummary) {
        let total_percent = if summary.total_time.is_zero() { 0 } else { 100 };

        let mut table = Table::new();
        table.add_row(row!["", "COUNT", "TIME", "%"]);
        table.add_row(row!["Invoiced", summary.invoiced_count, summary.invoiced_time, summary.invoiced_percent]);
        table.add_row(row!["Not invoiced", summary.not_invoiced_count, summary.not_invoiced_time, summary.not_invoiced_percent]);
        table.add_row(row!["Collected", summary.collected_count, summary.collected_time, summary.collected_percent]);
        table.add_row(row!["Not collected", summary.not_collected_count, summary.not_collected_time, summary.not_collected_percent]);
        table.add_row(row!["Total", summary.total_count, summary.total_time, total_percent]);
        table.printstd();

        if !summary.clients.is_empty() {
            let mut clients = Table::new();
            clients.add_row(row!["CLIENT", "TIME"]);
            for c in &summary.clients {
                clients.add_row(row![c.client_name, c.total_time]);
            }
            clients.printstd();
        }
    }

    pub fn dashboard(stats: &DashboardStats) {
        let mut table = Table::new();
        table.add_row(row!["Clients", stats.total_clients]);
        table.add_row(row!["Orders this month", stats.orders_this_month]);
        table.add_row(row!["Pending orders", stats.pending_orders]);
        table.add_row(row!["Not invoiced", stats.not_invoiced]);
        table.add_row(row!["Not collected", stats.not_collected]);
        table.printstd();

        let mut months = Table::new();
        months.add_row(row!["MONTH", "ORDERS"]);
        for m in &stats.monthly_orders {
            months.add_row(row![m.month, m.orders]);
        }
        months.printstd();
    }
}
