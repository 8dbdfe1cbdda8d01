/// Source of per-request correlation ids echoed in `X-Request-ID`
pub trait RequestIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs rendered without hyphens
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRequestIds;

impl RequestIdGenerator for UuidRequestIds {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}
