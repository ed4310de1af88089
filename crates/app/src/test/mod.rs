//! Shared support for service-level tests.


pub(crate) use context::{FailingGateway, TestContext};
