// End-to-end feed flow against a mock artworks search endpoint

#[cfg(test)]
mod tests {
    use grambrandt::config::ApiConfig;
    use grambrandt::engine::{BatchOutcome, FeedController, FeedSink, PaginationSignal};
    use grambrandt::feed::artic::ArticClient;
    use grambrandt::feed::filter::{FilterConfig, FilterSettings};
    use grambrandt::feed::query::excluded_ids;
    use grambrandt::feed::types::ArtworkRecord;
    use grambrandt::feed::ArtworkSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/api/v1/artworks/search";

    #[derive(Default)]
    struct RecordingSink {
        shown: Vec<u64>,
        loading_toggles: usize,
        clears: usize,
    }

    impl FeedSink for RecordingSink {
        fn show_loading(&mut self) {
            self.loading_toggles += 1;
        }
        fn hide_loading(&mut self) {
            self.loading_toggles += 1;
        }
        fn append(&mut self, records: Vec<ArtworkRecord>) {
            self.shown.extend(records.iter().map(|r| r.id));
        }
        fn clear(&mut self) {
            self.shown.clear();
            self.clears += 1;
        }
    }

    fn api_config(server: &MockServer) -> ApiConfig {
        ApiConfig {
            search_url: format!("{}{}", server.uri(), SEARCH_PATH),
            user_agent: "grambrandt.com".to_string(),
        }
    }

    fn item(id: u64) -> Value {
        json!({
            "id": id,
            "title": format!("Study {}", id),
            "artist_title": "Mary Cassatt",
            "artist_id": 33890,
            "image_id": format!("img-{}", id),
            "date_start": 1880,
            "date_end": 1881,
            "medium_display": "Oil on canvas",
            "place_of_origin": "United States",
            "short_description": "A quiet interior.",
            "dimensions_detail": [{ "height": 100, "width": 80 }]
        })
    }

    fn tall_item(id: u64) -> Value {
        let mut v = item(id);
        v["dimensions_detail"] = json!([{ "height": 300, "width": 100 }]);
        v
    }

    fn page(items: Vec<Value>) -> Value {
        json!({
            "data": items,
            "config": {
                "iiif_url": "https://www.artic.edu/iiif/2",
                "website_url": "https://www.artic.edu"
            }
        })
    }

    async fn request_bodies(server: &MockServer) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    fn controller(server: &MockServer, settings: FilterSettings) -> FeedController<RecordingSink> {
        let source: Box<dyn ArtworkSource> = Box::new(ArticClient::new(&api_config(server)));
        FeedController::new(source, RecordingSink::default(), settings, PaginationSignal::new())
            .with_rng(StdRng::seed_from_u64(7))
    }

    #[tokio::test]
    async fn test_request_carries_header_and_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(header("AIC-User-Agent", "grambrandt.com"))
            .and(body_partial_json(json!({ "limit": 12 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item(1), item(2)])))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = ArticClient::new(&api_config(&server));
        let mut session = FilterConfig::new(FilterSettings::default());
        let records = client.fetch_batch(&mut session).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].image_url.as_deref(),
            Some("https://www.artic.edu/iiif/2/img-1/full/843,/0/default.jpg")
        );
        assert_eq!(session.seen_ids().as_slice(), &[1, 2]);

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies[0]["sort"][0]["_script"]["script"], "Math.random()");
        assert!(excluded_ids(&bodies[0]["query"]).is_empty());
    }

    #[tokio::test]
    async fn test_seen_ids_excluded_from_next_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item(10), item(11), item(12)])))
            .mount(&server)
            .await;

        let mut client = ArticClient::new(&api_config(&server));
        let mut session = FilterConfig::new(FilterSettings::default());
        client.fetch_batch(&mut session).await.unwrap();
        client.fetch_batch(&mut session).await.unwrap();

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        assert!(excluded_ids(&bodies[0]["query"]).is_empty());
        assert_eq!(excluded_ids(&bodies[1]["query"]), vec![10, 11, 12]);
        // Repeats from the server do not grow the seen list
        assert_eq!(session.seen_ids().len(), 3);
    }

    #[tokio::test]
    async fn test_error_status_leaves_session_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let mut client = ArticClient::new(&api_config(&server));
        let mut session = FilterConfig::new(FilterSettings::default());
        session.mark_seen([4, 5]);

        let err = client.fetch_batch(&mut session).await.unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("500"), "unexpected error: {}", msg);
        assert!(msg.contains("upstream down"));
        assert_eq!(session.seen_ids().as_slice(), &[4, 5]);
    }

    #[tokio::test]
    async fn test_malformed_body_fails_cycle_and_rearms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let mut ctl = controller(&server, FilterSettings::default());
        let outcome = ctl.load_next().await;

        assert!(matches!(outcome, BatchOutcome::Failed(_)));
        assert!(ctl.sink().shown.is_empty());
        assert!(ctl.session().seen_ids().is_empty());
        assert!(ctl.signal().is_armed());
    }

    #[tokio::test]
    async fn test_connection_refused_fails_cycle_and_rearms() {
        // Reserve a port, then release it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = ApiConfig {
            search_url: format!("http://{}{}", addr, SEARCH_PATH),
            user_agent: "grambrandt.com".to_string(),
        };

        let source: Box<dyn ArtworkSource> = Box::new(ArticClient::new(&config));
        let mut ctl = FeedController::new(
            source,
            RecordingSink::default(),
            FilterSettings::default(),
            PaginationSignal::new(),
        );

        let outcome = ctl.load_next().await;
        match &outcome {
            BatchOutcome::Failed(reason) => assert!(reason.contains("request failed"), "{}", reason),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(ctl.sink().shown.is_empty());
        assert!(ctl.session().seen_ids().is_empty());
        assert!(ctl.signal().is_armed());
    }

    #[tokio::test]
    async fn test_second_page_with_repeats_and_tall_item() {
        let server = MockServer::start().await;

        let first: Vec<Value> = (1..=12).map(item).collect();
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(first)))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;

        // Two ids from the first page come back, one new item is too tall.
        let mut second: Vec<Value> = vec![item(3), item(7), tall_item(20)];
        second.extend((21..=29).map(item));
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(second)))
            .mount(&server)
            .await;

        let mut ctl = controller(&server, FilterSettings::default());
        assert_eq!(ctl.load_next().await, BatchOutcome::Rendered(12));
        assert_eq!(ctl.session().seen_ids().len(), 12);

        assert!(ctl.signal().is_armed());
        assert_eq!(ctl.on_trigger().await, Some(BatchOutcome::Rendered(11)));

        assert_eq!(ctl.sink().shown.len(), 23);
        assert!(!ctl.sink().shown.contains(&20));
        // Only the ten new ids are added, the tall one included
        assert_eq!(ctl.session().seen_ids().len(), 22);
        assert!(ctl.session().seen_ids().contains(20));
        // Indicator shown and hidden for the first cycle only
        assert_eq!(ctl.sink().loading_toggles, 2);

        let bodies = request_bodies(&server).await;
        let excluded = excluded_ids(&bodies[1]["query"]);
        assert_eq!(excluded, (1..=12).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_filter_change_resets_exclusions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![item(1), item(2), item(3)])))
            .mount(&server)
            .await;

        let mut ctl = controller(&server, FilterSettings::default());
        ctl.load_next().await;
        assert_eq!(ctl.session().seen_ids().len(), 3);

        // Same settings: nothing happens
        assert_eq!(ctl.apply_filters(FilterSettings::default()).await, None);
        assert_eq!(request_bodies(&server).await.len(), 1);

        let obscure = FilterSettings {
            show_obscure: true,
            ..FilterSettings::default()
        };
        assert_eq!(ctl.apply_filters(obscure).await, Some(BatchOutcome::Rendered(3)));
        assert_eq!(ctl.sink().clears, 1);
        assert_eq!(ctl.sink().loading_toggles, 4);

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        assert!(excluded_ids(&bodies[1]["query"]).is_empty());
        assert_eq!(
            bodies[1]["query"]["bool"]["must"][0]["term"]["has_not_been_viewed_much"],
            true
        );
    }

    #[tokio::test]
    async fn test_empty_page_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
            .mount(&server)
            .await;

        let mut ctl = controller(&server, FilterSettings::default());
        assert_eq!(ctl.load_next().await, BatchOutcome::Empty);
        assert!(ctl.signal().is_armed());
    }
}
