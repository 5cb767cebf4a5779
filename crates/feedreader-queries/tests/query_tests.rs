use feedreader_queries::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category::new(id, name)
    }

    fn category_with_feed(id: i64, feed_id: i64, feed_name: &str) -> Category {
        Category::new(id, "some category").with_feed(Feed::new(feed_id, feed_name))
    }

    #[test]
    fn test_construct_when_all_query_stores_all_parameters() {
        let query = UserQuery::new(RawParameters::new().with_get("a"), &[], &[]);
        assert_eq!(query.get_type(), "all");
        assert_eq!(query.get_name(), "");
    }

    #[test]
    fn test_construct_without_get_is_all() {
        let query = UserQuery::new(RawParameters::new().with_search("x"), &[], &[]);
        assert_eq!(query.target(), QueryTarget::All);
        assert_eq!(query.get_type(), "all");
        assert!(!query.is_deprecated());
    }

    #[test]
    fn test_construct_when_favorite_query_stores_favorite_parameters() {
        let query = UserQuery::new(RawParameters::new().with_get("s"), &[], &[]);
        assert_eq!(query.get_type(), "favorite");
    }

    #[test]
    fn test_construct_when_category_query_stores_category_parameters() {
        let categories = vec![category(1, "some category name")];
        let query = UserQuery::new(RawParameters::new().with_get("c_1"), &categories, &[]);
        assert_eq!(query.get_name(), "some category name");
        assert_eq!(query.get_type(), "category");
        assert_eq!(query.target().id(), Some(1));
    }

    #[test]
    fn test_construct_when_feed_query_stores_feed_parameters() {
        let categories = vec![category_with_feed(1, 1, "some feed name")];
        let query = UserQuery::new(RawParameters::new().with_get("f_1"), &categories, &[]);
        assert_eq!(query.get_name(), "some feed name");
        assert_eq!(query.get_type(), "feed");
    }

    #[test]
    fn test_construct_when_feed_lives_in_a_later_category() {
        let categories = vec![
            category(1, "empty"),
            category_with_feed(2, 8, "other"),
            category_with_feed(3, 9, "wanted"),
        ];
        let query = UserQuery::new(RawParameters::new().with_get("f_9"), &categories, &[]);
        assert_eq!(query.get_name(), "wanted");
    }

    #[test]
    fn test_construct_when_unknown_query_does_store_parameters() {
        let query = UserQuery::new(RawParameters::new().with_get("q"), &[], &[]);
        assert!(query.get_name().is_empty());
        assert!(query.get_type().is_empty());
        assert_eq!(query.get(), Some("q"));
        assert_eq!(query.to_array(), RawParameters::new().with_get("q"));
    }

    #[test]
    fn test_construct_when_name_stores_name() {
        let query = UserQuery::new(RawParameters::new().with_name("some name"), &[], &[]);
        assert_eq!(query.name(), Some("some name"));
    }

    #[test]
    fn test_construct_when_order_stores_order() {
        let query = UserQuery::new(RawParameters::new().with_order("some order"), &[], &[]);
        assert_eq!(query.order(), Some("some order"));
        assert_eq!(query.sort_order(), None);
    }

    #[test]
    fn test_construct_when_state_stores_state() {
        let state = ReadState::NOT_READ | ReadState::FAVORITE;
        let query = UserQuery::new(RawParameters::new().with_state(state), &[], &[]);
        assert_eq!(query.state(), Some(state));
    }

    #[test]
    fn test_construct_when_url_stores_url() {
        let query = UserQuery::new(RawParameters::new().with_url("some url"), &[], &[]);
        assert_eq!(query.url(), Some("some url"));
    }

    #[test]
    fn test_to_array_when_no_data_returns_empty() {
        let query = UserQuery::new(RawParameters::new(), &[], &[]);
        assert_eq!(query.to_array().len(), 0);
        assert!(query.to_array().to_map().is_empty());
    }

    #[test]
    fn test_to_array_when_data_returns_all_entries() {
        let raw = RawParameters::new()
            .with_get("s")
            .with_name("some name")
            .with_order("some order")
            .with_search("some search")
            .with_state(ReadState::ALL)
            .with_url("some url");
        let query = UserQuery::new(raw.clone(), &[], &[]);

        assert_eq!(query.to_array().len(), 6);
        assert_eq!(query.to_array(), raw);
        assert_eq!(
            serde_json::Value::Object(query.to_array().to_map()),
            serde_json::json!({
                "get": "s",
                "name": "some name",
                "order": "some order",
                "search": "some search",
                "state": 3,
                "url": "some url"
            })
        );
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let raw = RawParameters::from_json_str(r#"{"get":"s","rid":"42","Search":"x"}"#).unwrap();
        let query = UserQuery::new(raw, &[], &[]);
        assert_eq!(query.to_array().keys(), vec!["get"]);
    }

    #[test]
    fn test_has_search_when_search_returns_true() {
        let query = UserQuery::new(RawParameters::new().with_search("some search"), &[], &[]);
        assert!(query.has_search());
    }

    #[test]
    fn test_has_search_when_no_search_returns_false() {
        let query = UserQuery::new(RawParameters::new(), &[], &[]);
        assert!(!query.has_search());
    }

    #[test]
    fn test_has_parameters_when_all_query_returns_false() {
        let query = UserQuery::new(RawParameters::new().with_get("a"), &[], &[]);
        assert!(!query.has_parameters());
    }

    #[test]
    fn test_has_parameters_when_no_parameter_returns_false() {
        let query = UserQuery::new(RawParameters::new(), &[], &[]);
        assert!(!query.has_parameters());
    }

    #[test]
    fn test_has_parameters_when_parameter_returns_true() {
        let cases = vec![
            RawParameters::new().with_get("s"),
            RawParameters::new().with_name("x"),
            RawParameters::new().with_search("x"),
            RawParameters::new().with_order("x"),
            RawParameters::new().with_state(ReadState::NOT_READ),
            RawParameters::new().with_url("x"),
            RawParameters::new().with_get("a").with_search("x"),
        ];
        for raw in cases {
            let query = UserQuery::new(raw.clone(), &[], &[]);
            assert!(query.has_parameters(), "{:?}", raw);
        }
    }

    #[test]
    fn test_is_deprecated_when_category_exists_returns_false() {
        let categories = vec![category(1, "cat 1")];
        let query = UserQuery::new(RawParameters::new().with_get("c_1"), &categories, &[]);
        assert!(!query.is_deprecated());
    }

    #[test]
    fn test_is_deprecated_when_category_does_not_exist_returns_true() {
        let query = UserQuery::new(RawParameters::new().with_get("c_1"), &[], &[]);
        assert_eq!(query.get_name(), "");
        assert_eq!(query.get_type(), "category");
        assert!(query.is_deprecated());
    }

    #[test]
    fn test_is_deprecated_when_feed_exists_returns_false() {
        let categories = vec![category_with_feed(1, 1, "feed 1")];
        let query = UserQuery::new(RawParameters::new().with_get("f_1"), &categories, &[]);
        assert!(!query.is_deprecated());
    }

    #[test]
    fn test_is_deprecated_when_feed_does_not_exist_returns_true() {
        let categories = vec![category(1, "no feeds")];
        let query = UserQuery::new(RawParameters::new().with_get("f_1"), &categories, &[]);
        assert!(query.is_deprecated());
    }

    #[test]
    fn test_is_deprecated_when_all_query_returns_false() {
        let query = UserQuery::new(RawParameters::new().with_get("a"), &[], &[]);
        assert!(!query.is_deprecated());
    }

    #[test]
    fn test_is_deprecated_when_favorite_query_returns_false() {
        let query = UserQuery::new(RawParameters::new().with_get("s"), &[], &[]);
        assert!(!query.is_deprecated());
    }

    #[test]
    fn test_is_deprecated_when_unknown_query_returns_false() {
        let query = UserQuery::new(RawParameters::new().with_get("q"), &[], &[]);
        assert!(!query.is_deprecated());
    }

    #[test]
    fn test_classification_survives_catalog_changes() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_category(Category::new(1, "News"));

        let query = UserQuery::from_snapshot(
            RawParameters::new().with_get("c_1"),
            &catalog.snapshot().unwrap(),
        );
        catalog.remove_category(1);

        assert_eq!(query.get_name(), "News");
        assert!(!query.is_deprecated());

        let later = UserQuery::from_snapshot(query.to_array(), &catalog.snapshot().unwrap());
        assert!(later.is_deprecated());
    }
}
