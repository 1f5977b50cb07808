//! Unit tests for the registry domain and services.
