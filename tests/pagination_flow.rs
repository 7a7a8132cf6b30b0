mod support;

use member_rs_client::{PageQuery, SortOrder};
use support::*;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_two_pages(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/review"))
        .and(query_param_is_missing("after_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![control_record("a", "first"), control_record("b", "second")],
            2,
            Some("opaque:b"),
        )))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/review"))
        .and(query_param("after_id", "opaque:b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![control_record("c", "third")], 2, None)),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_cursor_is_passed_back_verbatim() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let (client, _store) = client_with_token(&mock_server);
    let mut pages = client.reviews().paginate(PageQuery::new().limit(2));

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.items.len(), 2);
    assert!(!pages.is_exhausted());

    let second = pages.next_page().await.unwrap().unwrap();
    assert_eq!(second.items[0].id, "c");
    assert!(pages.is_exhausted());

    // no request once the cursor is gone
    assert!(pages.next_page().await.unwrap().is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.query(), Some("limit=2"));
    assert_eq!(requests[1].url.query(), Some("after_id=opaque%3Ab&limit=2"));
}

#[tokio::test]
async fn test_collect_all() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let (client, _store) = client_with_token(&mock_server);
    let names: Vec<String> = client
        .reviews()
        .paginate(PageQuery::new())
        .collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();

    assert_eq!(names, ["first", "second", "third"]);
}

#[tokio::test]
async fn test_new_search_restarts_from_first_page() {
    let mock_server = MockServer::start().await;
    mount_two_pages(&mock_server).await;

    let (client, _store) = client_with_token(&mock_server);
    let mut pages = client.reviews().paginate(PageQuery::new().after_id("stale"));

    pages.next_page().await.unwrap();
    pages.search(Some("sec".to_string()));
    pages.next_page().await.unwrap();
    pages.sort(Some("name".to_string()), Some(SortOrder::Desc));
    pages.next_page().await.unwrap();

    let queries: Vec<Option<String>> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query().map(str::to_string))
        .collect();

    assert_eq!(
        queries,
        vec![
            None,
            Some("name=sec".to_string()),
            Some("name=sec&sort_by=name&order=desc".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_cursor_ends_the_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rating"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![control_record("a", "only")],
            20,
            Some(""),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _store) = client_with_token(&mock_server);
    let mut pages = client.ratings().paginate(PageQuery::new());
    let ratings = pages.collect_all().await.unwrap();

    assert_eq!(ratings.len(), 1);
    assert!(pages.is_exhausted());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}
