#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    Auth,
    Schema,
    Parse,
    Provider,
    Storage,
    NotFound,
    Network,
    Unknown,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Auth => "Auth",
            ErrorKind::Schema => "Schema",
            ErrorKind::Parse => "Parse",
            ErrorKind::Provider => "Provider",
            ErrorKind::Storage => "Storage",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Network => "Network",
            ErrorKind::Unknown => "Unknown",
        }
    }
}
