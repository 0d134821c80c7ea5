// File: services/roombook_backend/src/lib.rs
pub mod app;
pub mod shutdown;
