// Integration tests for API endpoints
// These tests drive complete request/response cycles through the router

pub mod members_api_test;
