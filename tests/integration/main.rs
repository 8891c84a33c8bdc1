//! End-to-end tests driving the full router against in-process backends.

mod blob_test;
mod file_test;
mod folder_test;
mod health_test;
mod helpers;
