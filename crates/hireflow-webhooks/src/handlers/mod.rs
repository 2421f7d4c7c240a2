//! HTTP handlers for the webhook API.

pub mod configs;
