//! AWS adapters: S3 for pod media, SQS for pod messages.

pub mod s3;
pub mod sqs;

pub use s3::S3Adapter;
pub use sqs::SqsAdapter;
