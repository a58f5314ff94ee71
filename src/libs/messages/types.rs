use crate::libs::status::Flag;
use std::fmt;

/// Record kinds named in user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Client,
    Consultant,
    Service,
    Modality,
    Order,
    Relation,
}

impl Entity {
    pub fn plural(&self) -> &'static str {
        match self {
            Entity::Client => "clients",
            Entity::Consultant => "consultants",
            Entity::Service => "services",
            Entity::Modality => "modalities",
            Entity::Order => "service orders",
            Entity::Relation => "order relations",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Client => "Client",
            Entity::Consultant => "Consultant",
            Entity::Service => "Service",
            Entity::Modality => "Modality",
            Entity::Order => "Service order",
            Entity::Relation => "Order relation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    // === RECORD MESSAGES ===
    RecordCreated(Entity, i64),
    RecordUpdated(Entity, i64),
    RecordDeleted(Entity, i64),
    RecordNotFound(Entity, i64),
    RecordInUse(Entity, i64),
    RecordsHeader(Entity),
    NoRecordsFound(Entity),
    RecordCanBeDeleted(Entity, i64, bool),
    ConfirmDelete(Entity, i64),
    PageSummary(i64, i64, i64, i64, i64), // start, end, total, page, total_pages
    OperationCancelled,

    // === VALIDATION MESSAGES ===
    FieldRequired(&'static str),
    InvalidField(&'static str, String),
    InvalidDocument(String),
    DocumentTaken(String),
    InvalidDate(String),
    InvalidTime(&'static str, String),
    InvalidFlag(String),
    InvalidPersonKind(String),

    // === SERVICE ORDER MESSAGES ===
    OrderLocked(i64),
    OrderAlreadySent(i64),
    OrderSent(i64, String),
    OrderCanModify(i64, bool),
    ClientWithoutOrderEmail(i64),

    // === RELATION MESSAGES ===
    RelationInvoicedSet(i64, Flag),
    RelationCollectedSet(i64, Flag),
    StatisticsHeader,
    StatisticsQueryFailed(&'static str, String),

    // === DASHBOARD MESSAGES ===
    DashboardHeader,

    // === REPORT & EXPORT MESSAGES ===
    PdfSaved(String),
    PdfFilesRemoved(usize),
    PdfCleanupFailed(String),
    ExportingRelations(String),
    ExportCompleted(String),

    // === DOCUMENT LOOKUP MESSAGES ===
    LookupUnsupported(String),
    LookupNotFound(String),
    LookupFailed(String),
    LookupNotConfigured,

    // === SERVER MESSAGES ===
    ServerStarting(String),
    ServerStopped,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleDatabase,
    ConfigModuleServer,
    ConfigModuleCompany,
    ConfigModuleReport,
    ConfigModuleLookup,
    PromptSelectModules,
    PromptDatabasePath,
    PromptServerHost,
    PromptServerPort,
    PromptCompanyName,
    PromptCompanyDocument,
    PromptCompanyAddress,
    PromptCompanyPhone,
    PromptCompanyEmail,
    PromptPdfDir,
    PromptPerPage,
    PromptPdfMaxAge,
    PromptLookupUrl,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    SchemaVersion(u32, u32),
    PendingMigration(u32, String),
    MigrationsApplied(u32),
    NoMigrationsApplied,
    DatabaseNeedsUpdate,
    DatabaseUpToDate,
    MigrationHistory,
}
