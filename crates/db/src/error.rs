use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum ComicsStorageError {
    #[error("Sqlite error: {0:#}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Inconsistent storage: {0}")]
    InconsistentStorage(Cow<'static, str>),
}
