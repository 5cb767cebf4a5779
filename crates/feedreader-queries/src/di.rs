//! Dependency injection support for feedreader-queries

use std::sync::Arc;

use feedreader_common::di::{ServiceEntry, ServiceFactory};

use crate::{InMemoryCatalog, QueryConfig};

inventory::submit! {
    ServiceFactory::new("queries", create_query_services)
}

fn create_query_services() -> Vec<ServiceEntry> {
    vec![
        ServiceEntry::new::<InMemoryCatalog>(Arc::new(InMemoryCatalog::new())),
        ServiceEntry::new::<QueryConfig>(Arc::new(QueryConfig::default())),
    ]
}
