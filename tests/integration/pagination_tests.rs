use crate::common;
use frappe_client::prelude::*;
use mockito::{Matcher, Mock, Server};
use serde::Deserialize;
use serde_json::json;

const TODO_PATH: &str = "/api/resource/ToDo";

#[derive(Debug, Deserialize)]
struct ToDo {
    name: String,
}

fn records(start: usize, count: usize) -> String {
    let data: Vec<_> = (start..start + count)
        .map(|i| json!({"name": format!("TODO-{i:04}")}))
        .collect();
    json!({ "data": data }).to_string()
}

fn page_query(start: u64, length: u64) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("limit_start".into(), start.to_string()),
        Matcher::UrlEncoded("limit_page_length".into(), length.to_string()),
    ])
}

fn page_mock(server: &mut Server, start: u64, length: u64, body: String) -> Mock {
    server
        .mock("GET", TODO_PATH)
        .match_query(page_query(start, length))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create()
}

#[test]
fn test_pages_until_empty_page() {
    let mut server = Server::new();
    let mocks = vec![
        page_mock(&mut server, 0, 10, records(0, 10)),
        page_mock(&mut server, 10, 10, records(10, 10)),
        page_mock(&mut server, 20, 10, records(20, 5)),
        page_mock(&mut server, 30, 10, records(30, 0)),
    ];

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let query = DocQuery::new().limit_page_length(10);
    let pages = client
        .get_paginated_doc("ToDo", &query)
        .collect::<FrappeResult<Vec<Page>>>()
        .unwrap();

    let sizes: Vec<usize> = pages.iter().map(Page::len).collect();
    let offsets: Vec<u64> = pages.iter().map(|page| page.offset).collect();
    assert_eq!(sizes, vec![10, 10, 5]);
    assert_eq!(offsets, vec![0, 10, 20]);

    let last: Vec<ToDo> = pages[2].records_as().unwrap();
    assert_eq!(last.last().unwrap().name, "TODO-0024");

    for mock in mocks {
        mock.assert();
    }
}

#[test]
fn test_no_records_yields_no_pages() {
    let mut server = Server::new();
    let mock = page_mock(&mut server, 0, 10, records(0, 0));

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let mut pages = client.get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(10));

    assert!(pages.next().is_none());
    assert!(pages.next().is_none());
    assert_eq!(pages.next_offset(), None);
    mock.assert();
}

#[test]
fn test_missing_data_member_counts_as_empty() {
    let mut server = Server::new();
    let mock = page_mock(&mut server, 0, 10, "{}".to_string());

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let pages = client.get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(10));

    assert_eq!(pages.count(), 0);
    mock.assert();
}

#[test]
fn test_default_page_size_and_start_offset() {
    let mut server = Server::new();
    let first = page_mock(&mut server, 40, 100, records(40, 3));
    let second = page_mock(&mut server, 140, 100, records(0, 0));

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let query = DocQuery::new().limit_start(40).limit_page_length(0);
    let paginator = client.get_paginated_doc("ToDo", &query);
    assert_eq!(paginator.page_size(), 100);
    assert_eq!(paginator.next_offset(), Some(40));

    let pages = paginator.collect::<FrappeResult<Vec<Page>>>().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].offset, 40);

    first.assert();
    second.assert();
}

#[test]
fn test_pagination_is_lazy() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", TODO_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let _pages = client.get_paginated_doc("ToDo", &DocQuery::new());

    mock.assert();
}

#[test]
fn test_caller_may_stop_early() {
    let mut server = Server::new();
    let first = page_mock(&mut server, 0, 2, records(0, 2));
    let second = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(2, 2))
        .expect(0)
        .create();

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let page = client
        .get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(2))
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(page.len(), 2);
    first.assert();
    second.assert();
}

#[test]
fn test_not_found_ends_sequence() {
    let mut server = Server::new();
    let first = page_mock(&mut server, 0, 5, records(0, 5));
    let gone = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(5, 5))
        .with_status(404)
        .expect(1)
        .create();

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let pages = client
        .get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(5))
        .collect::<FrappeResult<Vec<Page>>>()
        .unwrap();

    assert_eq!(pages.len(), 1);
    first.assert();
    gone.assert();
}

#[test]
fn test_server_error_is_yielded_once() {
    let mut server = Server::new();
    let broken = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(0, 5))
        .with_status(500)
        .expect(1)
        .create();

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let mut pages = client.get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(5));

    match pages.next() {
        Some(Err(FrappeError::Unexpected(status))) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert!(pages.next().is_none());
    broken.assert();
}

#[test]
fn test_non_json_page_is_an_error() {
    let mut server = Server::new();
    let mock = page_mock(&mut server, 0, 5, "<html>maintenance</html>".to_string());

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let mut pages = client.get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(5));

    assert!(matches!(
        pages.next(),
        Some(Err(FrappeError::Deserialization(_)))
    ));
    assert!(pages.next().is_none());
    mock.assert();
}

#[test]
fn test_fields_and_filters_are_sent_with_every_page() {
    let mut server = Server::new();
    let with_filters = |start: u64| {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("fields".into(), r#"["name"]"#.into()),
            Matcher::UrlEncoded("filters".into(), r#"{"status":"Open"}"#.into()),
            Matcher::UrlEncoded("limit_start".into(), start.to_string()),
            Matcher::UrlEncoded("limit_page_length".into(), "3".into()),
        ])
    };
    let first = server
        .mock("GET", TODO_PATH)
        .match_query(with_filters(0))
        .with_status(200)
        .with_body(records(0, 3))
        .expect(1)
        .create();
    let second = server
        .mock("GET", TODO_PATH)
        .match_query(with_filters(3))
        .with_status(200)
        .with_body(records(0, 0))
        .expect(1)
        .create();

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let query = DocQuery::new()
        .fields(["name"])
        .filters(json!({"status": "Open"}))
        .limit_page_length(3);
    let total: usize = client
        .get_paginated_doc("ToDo", &query)
        .map(|page| page.unwrap().len())
        .sum();

    assert_eq!(total, 3);
    first.assert();
    second.assert();
}

#[test]
fn test_page_fetch_relogs_in_on_forbidden() {
    let mut server = Server::new();
    let expired = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(0, 5))
        .match_header("cookie", "sid=old")
        .with_status(403)
        .expect(1)
        .create();
    let login = common::login_mock(&mut server, "new", 1);
    let fresh = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(0, 5))
        .match_header("cookie", common::sid_cookie("new"))
        .with_status(200)
        .with_body(records(0, 3))
        .expect(1)
        .create();
    let end = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(5, 5))
        .match_header("cookie", common::sid_cookie("new"))
        .with_status(200)
        .with_body(records(0, 0))
        .expect(1)
        .create();
    let (callback, seen) = common::recording_callback();

    let config = common::session_config(&server).session_data(common::stored_session("old"));
    let client = FrappeClient::with_callback(config, callback).unwrap();
    let pages = client
        .get_paginated_doc("ToDo", &DocQuery::new().limit_page_length(5))
        .collect::<FrappeResult<Vec<Page>>>()
        .unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].len(), 3);
    expired.assert();
    login.assert();
    fresh.assert();
    end.assert();
    assert_eq!(common::seen_sids(&seen), vec!["new".to_string()]);
}

#[test]
fn test_restart_from_scratch() {
    let mut server = Server::new();
    let first = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(0, 4))
        .with_status(200)
        .with_body(records(0, 2))
        .expect(2)
        .create();
    let second = server
        .mock("GET", TODO_PATH)
        .match_query(page_query(4, 4))
        .with_status(200)
        .with_body(records(0, 0))
        .expect(2)
        .create();

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let query = DocQuery::new().limit_page_length(4);
    let run = || {
        client
            .get_paginated_doc("ToDo", &query)
            .collect::<FrappeResult<Vec<Page>>>()
            .unwrap()
    };

    assert_eq!(run(), run());
    first.assert();
    second.assert();
}

#[test]
fn test_offset_overflow_ends_sequence() {
    let mut server = Server::new();
    let start = u64::MAX - 1;
    let last = page_mock(&mut server, start, 10, records(0, 1));

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let query = DocQuery::new().limit_start(start).limit_page_length(10);
    let mut pages = client.get_paginated_doc("ToDo", &query);

    let page = pages.next().unwrap().unwrap();
    assert_eq!(page.offset, start);
    assert_eq!(page.len(), 1);
    assert_eq!(pages.next_offset(), None);
    assert!(pages.next().is_none());
    last.assert();
}

#[test]
fn test_named_query_pages_the_whole_list() {
    let mut server = Server::new();
    let single = server
        .mock("GET", "/api/resource/ToDo/TODO-0001")
        .expect(0)
        .create();
    let first = page_mock(&mut server, 0, 5, records(0, 2));
    let end = page_mock(&mut server, 5, 5, records(0, 0));

    let client = FrappeClient::new(common::token_config(&server)).unwrap();
    let query = DocQuery::named("TODO-0001").limit_page_length(5);
    let pages = client
        .get_paginated_doc("ToDo", &query)
        .collect::<FrappeResult<Vec<Page>>>()
        .unwrap();

    assert_eq!(pages.len(), 1);
    single.assert();
    first.assert();
    end.assert();
}
