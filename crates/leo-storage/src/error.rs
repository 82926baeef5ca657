use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("index store connection failed: {0}")]
    IndexConnection(String),

    #[error("index store query failed: {0}")]
    IndexQuery(#[from] tokio_postgres::Error),

    #[error("index store pool error: {0}")]
    Pool(String),

    #[error("bulk write failed: {0}")]
    Bulk(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record integrity check failed for {satellite_id}: index says {index_count}, bulk has {bulk_count}")]
    RecordCountMismatch {
        satellite_id: String,
        index_count: i64,
        bulk_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
