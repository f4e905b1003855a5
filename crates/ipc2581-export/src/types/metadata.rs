/// Logistic header (sender of the file)
#[derive(Debug, Clone)]
pub struct LogisticHeader {
    pub role: Role,
    pub enterprise: Enterprise,
    pub person: Person,
}

#[derive(Debug, Clone)]
pub struct Role {
    pub id: String,
    pub role_function: String,
}

#[derive(Debug, Clone)]
pub struct Enterprise {
    pub id: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct Person {
    pub name: String,
    pub enterprise_ref: String,
    pub role_ref: String,
}

/// History record (file revision history)
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub number: u32,
    pub origination: String,
    pub software: String,
    pub last_change: String,
    pub file_revision: FileRevision,
}

#[derive(Debug, Clone)]
pub struct FileRevision {
    pub file_revision_id: String,
    pub comment: String,
    pub software_package: SoftwarePackage,
}

#[derive(Debug, Clone)]
pub struct SoftwarePackage {
    pub name: String,
    pub revision: String,
    pub vendor: String,
    pub certification_status: String,
}
