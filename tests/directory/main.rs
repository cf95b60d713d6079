//! Directory integration tests.

mod support;
mod catalogue;
mod comments;
