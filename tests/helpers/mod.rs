// ABOUTME: Test helper modules shared across integration tests
// ABOUTME: Currently exposes the axum request/response test utilities

pub mod axum_test;
