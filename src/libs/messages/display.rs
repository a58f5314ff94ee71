//! Display text for every [`Message`] variant.
//!
//! All user-facing wording lives here so the CLI, the HTTP error bodies and
//! the logs stay consistent.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === RECORD MESSAGES ===
            Message::RecordCreated(entity, id) => format!("{} #{} created", entity, id),
            Message::RecordUpdated(entity, id) => format!("{} #{} updated", entity, id),
            Message::RecordDeleted(entity, id) => format!("{} #{} deleted", entity, id),
            Message::RecordNotFound(entity, id) => format!("{} #{} not found", entity, id),
            Message::RecordInUse(entity, id) => format!("{} #{} is referenced by other records and cannot be deleted", entity, id),
            Message::RecordsHeader(entity) => format!("Registered {}:", entity.plural()),
            Message::NoRecordsFound(entity) => format!("No {} found", entity.plural()),
            Message::RecordCanBeDeleted(entity, id, allowed) => match allowed {
                true => format!("{} #{} can be deleted", entity, id),
                false => format!("{} #{} is in use and cannot be deleted", entity, id),
            },
            Message::ConfirmDelete(entity, id) => format!("Delete {} #{}?", entity.to_string().to_lowercase(), id),
            Message::PageSummary(start, end, total, page, total_pages) => {
                format!("Showing {}-{} of {} (page {} of {})", start, end, total, page, total_pages)
            }
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === VALIDATION MESSAGES ===
            Message::FieldRequired(field) => format!("Field '{}' is required", field),
            Message::InvalidField(field, value) => format!("Invalid value for '{}': {}", field, value),
            Message::InvalidDocument(doc) => format!("Invalid CPF/CNPJ: {}", doc),
            Message::DocumentTaken(doc) => format!("A client with document {} already exists", doc),
            Message::InvalidDate(date) => format!("Invalid date '{}'. Use DD/MM/YYYY or YYYY-MM-DD", date),
            Message::InvalidTime(field, value) => format!("Invalid time for '{}': '{}'. Use HH:MM", field, value),
            Message::InvalidFlag(value) => format!("Invalid status '{}'. Use S or N", value),
            Message::InvalidPersonKind(value) => format!("Invalid client type '{}'. Use F or J", value),

            // === SERVICE ORDER MESSAGES ===
            Message::OrderLocked(id) => format!("Service order #{} has already been sent and can no longer be changed", id),
            Message::OrderAlreadySent(id) => format!("Service order #{} has already been sent", id),
            Message::OrderSent(id, email) => format!("Service order #{} sent to {}", id, email),
            Message::OrderCanModify(id, allowed) => match allowed {
                true => format!("Service order #{} can be modified", id),
                false => format!("Service order #{} is locked", id),
            },
            Message::ClientWithoutOrderEmail(id) => format!("Client #{} has no service order email", id),

            // === RELATION MESSAGES ===
            Message::RelationInvoicedSet(id, flag) => format!("Order #{} invoiced: {}", id, flag.label()),
            Message::RelationCollectedSet(id, flag) => format!("Order #{} collected: {}", id, flag.label()),
            Message::StatisticsHeader => "Invoicing and collection summary:".to_string(),
            Message::StatisticsQueryFailed(metric, err) => format!("Statistics query '{}' failed, using default: {}", metric, err),

            // === DASHBOARD MESSAGES ===
            Message::DashboardHeader => "Dashboard:".to_string(),

            // === REPORT & EXPORT MESSAGES ===
            Message::PdfSaved(path) => format!("PDF saved to {}", path),
            Message::PdfFilesRemoved(count) => format!("Removed {} old PDF file(s)", count),
            Message::PdfCleanupFailed(error) => format!("Old PDF files could not be removed: {}", error),
            Message::ExportingRelations(format) => format!("Exporting order relations as {}...", format),
            Message::ExportCompleted(path) => format!("Export completed: {}", path),

            // === DOCUMENT LOOKUP MESSAGES ===
            Message::LookupUnsupported(doc) => format!("Registry lookup is only available for CNPJ, got '{}'", doc),
            Message::LookupNotFound(doc) => format!("No registry entry for {}", doc),
            Message::LookupFailed(err) => format!("Registry lookup failed: {}", err),
            Message::LookupNotConfigured => "Registry lookup URL is not configured".to_string(),

            // === SERVER MESSAGES ===
            Message::ServerStarting(addr) => format!("Listening on http://{}", addr),
            Message::ServerStopped => "Server stopped".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleServer => "HTTP server settings".to_string(),
            Message::ConfigModuleCompany => "Company details printed on documents".to_string(),
            Message::ConfigModuleReport => "Report settings".to_string(),
            Message::ConfigModuleLookup => "Document registry lookup".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptDatabasePath => "Database file path".to_string(),
            Message::PromptServerHost => "Server host".to_string(),
            Message::PromptServerPort => "Server port".to_string(),
            Message::PromptCompanyName => "Company name".to_string(),
            Message::PromptCompanyDocument => "Company CNPJ".to_string(),
            Message::PromptCompanyAddress => "Company address".to_string(),
            Message::PromptCompanyPhone => "Company phone".to_string(),
            Message::PromptCompanyEmail => "Company email".to_string(),
            Message::PromptPdfDir => "Directory for generated PDFs".to_string(),
            Message::PromptPerPage => "Rows per page".to_string(),
            Message::PromptPdfMaxAge => "Keep generated PDFs for (hours)".to_string(),
            Message::PromptLookupUrl => "CNPJ registry API URL".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, err) => format!("Migration v{} failed: {}", version, err),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::SchemaVersion(current, latest) => format!("Database schema: v{} (latest v{})", current, latest),
            Message::PendingMigration(version, name) => format!("  pending v{}: {}", version, name),
            Message::MigrationsApplied(version) => format!("Database migrated to schema v{}", version),
            Message::NoMigrationsApplied => "No migrations have been applied yet".to_string(),
            Message::DatabaseNeedsUpdate => "Database needs update".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
        };
        write!(f, "{}", s)
    }
}
