//! The bulk ingestion pipeline, stage by stage: parse → validate →
//! batch-check → ingest → report. The dry-run path runs the same stages and
//! stops before ingestion.

pub mod batch;
pub mod ingest;
pub mod parser;
pub mod report;
pub mod template;
pub mod validator;
