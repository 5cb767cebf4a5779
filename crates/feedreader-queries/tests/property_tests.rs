//! Property-based tests for query classification
//! **Feature: feedreader-queries, Property 1: classification is a function of `get`**
//! **Feature: feedreader-queries, Property 2: raw parameters round-trip unchanged**

use proptest::prelude::*;
use feedreader_queries::*;

/// Strategy for optional free-text values
fn text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(r"[a-zA-Z0-9 _&=%+-]{0,12}")
}

/// Strategy for `get` values, mixing grammar matches and noise
fn get_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("a".to_string()),
        Just("s".to_string()),
        (1i64..50).prop_map(|id| format!("c_{}", id)),
        (1i64..50).prop_map(|id| format!("f_{}", id)),
        r"[a-z_0-9]{0,5}",
    ])
}

/// Strategy for raw parameter sets
fn raw_strategy() -> impl Strategy<Value = RawParameters> {
    (
        get_strategy(),
        text_strategy(),
        text_strategy(),
        text_strategy(),
        prop::option::of(0u32..16),
        text_strategy(),
    )
        .prop_map(|(get, name, order, search, state, url)| RawParameters {
            get,
            name,
            order,
            search,
            state: state.map(ReadState::from_bits),
            url,
        })
}

/// Strategy for catalogs with ids in a small range so lookups both hit and miss
fn snapshot_strategy() -> impl Strategy<Value = CatalogSnapshot> {
    prop::collection::vec(
        (1i64..50, prop::collection::vec(1i64..50, 0..4)),
        0..6,
    )
    .prop_map(|categories| {
        CatalogSnapshot::new(
            categories
                .into_iter()
                .map(|(id, feeds)| {
                    feeds.into_iter().fold(
                        Category::new(id, format!("category {}", id)),
                        |category, feed_id| {
                            category.with_feed(Feed::new(feed_id, format!("feed {}", feed_id)))
                        },
                    )
                })
                .collect(),
        )
    })
}

proptest! {
    /// Reconstructing from `to_array` gives the same raw parameters and the
    /// same classification.
    #[test]
    fn prop_to_array_round_trip(raw in raw_strategy(), snapshot in snapshot_strategy()) {
        let query = UserQuery::from_snapshot(raw.clone(), &snapshot);
        prop_assert_eq!(query.to_array(), raw.clone());

        let rebuilt = UserQuery::from_snapshot(query.to_array(), &snapshot);
        prop_assert_eq!(rebuilt.to_array(), query.to_array());
        prop_assert_eq!(rebuilt, query);
    }

    /// Serialized parameters contain exactly the supplied keys.
    #[test]
    fn prop_serialized_keys_match_present_keys(raw in raw_strategy()) {
        let map = raw.to_map();
        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = raw.keys();
        expected.sort_unstable();
        prop_assert_eq!(keys, expected);

        let json = serde_json::to_string(&raw).unwrap();
        let back: RawParameters = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, raw);
    }

    /// Target name is non-empty iff an entity target resolved, and a
    /// resolved entity target is never deprecated.
    #[test]
    fn prop_name_and_staleness_agree(raw in raw_strategy(), snapshot in snapshot_strategy()) {
        let query = UserQuery::from_snapshot(raw, &snapshot);
        match query.target() {
            QueryTarget::Category(id) => {
                let found = snapshot.find_category(id);
                prop_assert_eq!(query.is_deprecated(), found.is_none());
                prop_assert_eq!(query.get_name(), found.map(Category::name).unwrap_or(""));
            }
            QueryTarget::Feed(id) => {
                let found = snapshot.find_feed(id);
                prop_assert_eq!(query.is_deprecated(), found.is_none());
                prop_assert_eq!(query.get_name(), found.map(Feed::name).unwrap_or(""));
            }
            QueryTarget::All | QueryTarget::Favorite | QueryTarget::Unknown => {
                prop_assert!(!query.is_deprecated());
                prop_assert_eq!(query.get_name(), "");
            }
        }
    }

    /// `has_parameters` is false only for the default view.
    #[test]
    fn prop_has_parameters(raw in raw_strategy()) {
        let query = UserQuery::new(raw.clone(), &[], &[]);
        let default_view = raw.is_empty()
            || (raw.len() == 1 && raw.get.as_deref() == Some("a"));
        prop_assert_eq!(query.has_parameters(), !default_view);
    }

    /// `has_search` tracks a non-empty search value.
    #[test]
    fn prop_has_search(raw in raw_strategy()) {
        let query = UserQuery::new(raw.clone(), &[], &[]);
        let expected = raw.search.as_deref().map(|s| !s.is_empty()).unwrap_or(false);
        prop_assert_eq!(query.has_search(), expected);
    }

    /// The view query string reproduces the view keys.
    #[test]
    fn prop_view_query_string_round_trip(raw in raw_strategy()) {
        let parsed = RawParameters::from_query_string(&raw.view_query_string()).unwrap();
        prop_assert_eq!(parsed.get, raw.get);
        prop_assert_eq!(parsed.order, raw.order);
        prop_assert_eq!(parsed.search, raw.search);
        prop_assert_eq!(parsed.state, raw.state);
        prop_assert_eq!(parsed.name, None);
        prop_assert_eq!(parsed.url, None);
    }
}
