use martin_core::ContactBook;
use martin_core::DirectorySync;
use martin_core::MartinErr;
use martin_core::RemoteError;
use martin_core::fields;
use martin_core::translate::translate;
use martin_people_client::PeopleClient;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;
use wiremock::matchers::query_param_is_missing;

const FIELDS: &str = "names,birthdays,organizations,urls,userDefined";

fn client(server: &MockServer) -> PeopleClient {
    PeopleClient::new(server.uri(), "tok", 2).unwrap()
}

#[tokio::test]
async fn list_follows_page_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/people/me/connections"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param("personFields", FIELDS))
        .and(query_param("pageSize", "2"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connections": [
                { "resourceName": "people/1", "names": [{ "displayName": "Ann" }] },
                { "resourceName": "people/2", "names": [{ "displayName": "Ben" }] }
            ],
            "nextPageToken": "p2",
            "totalPeople": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/people/me/connections"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connections": [{ "resourceName": "people/3" }],
            "totalPeople": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let people = client(&server).list_records().await.unwrap();
    let names: Vec<&str> = people.iter().map(|p| p.resource_name.as_str()).collect();
    assert_eq!(names, vec!["people/1", "people/2", "people/3"]);
}

#[tokio::test]
async fn empty_address_book_has_no_connections_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people/me/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let people = client(&server).list_records().await.unwrap();
    assert!(people.is_empty());
}

#[tokio::test]
async fn update_sends_mask_etag_and_staged_groups() {
    let server = MockServer::start().await;
    let person = serde_json::from_value(json!({
        "resourceName": "people/c1",
        "etag": "e1",
        "names": [{ "displayName": "Ann" }],
        "userDefined": [
            { "key": "Tier", "value": "1" },
            { "key": "Nickname", "value": "Annie" }
        ]
    }))
    .unwrap();
    let mut record = translate(person).unwrap().record;
    fields::update(&mut record, "Tier", "2").unwrap();

    Mock::given(method("PATCH"))
        .and(path("/v1/people/c1:updateContact"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param("updatePersonFields", "userDefined"))
        .and(body_json(json!({
            "etag": "e1",
            "userDefined": [
                { "key": "Tier", "value": "2" },
                { "key": "Nickname", "value": "Annie" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceName": "people/c1",
            "etag": "e2",
            "names": [{ "displayName": "Ann" }],
            "userDefined": [
                { "key": "Tier", "value": "2" },
                { "key": "Nickname", "value": "Annie" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client(&server)
        .patch_record(record.handle(), record.pending_patch())
        .await
        .unwrap();
    assert_eq!(updated.etag.as_deref(), Some("e2"));

    record.mark_pushed(updated);
    assert_eq!(record.handle().etag(), Some("e2"));
    assert!(!record.has_pending_changes());
}

#[tokio::test]
async fn google_error_envelope_becomes_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Request person.etag is different than the current person.etag.",
                "status": "FAILED_PRECONDITION"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/people/me/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connections": [{
                "resourceName": "people/c9",
                "etag": "old",
                "names": [{ "displayName": "Cy" }]
            }]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut book = ContactBook::new();
    book.reload(&client).await.unwrap();

    let err = book
        .submit_edit(&client, 0, "Last Contact Note", "lunch")
        .await
        .unwrap_err();
    match err {
        MartinErr::Remote(RemoteError::Http { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.starts_with("Request person.etag is different"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Local edit kept, patch still staged.
    let record = book.get(0).unwrap();
    assert_eq!(record.last_contact_note(), "lunch");
    assert!(record.has_pending_changes());
}

#[tokio::test]
async fn plain_text_error_body_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).list_records().await.unwrap_err();
    match err {
        RemoteError::Http { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_records().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on port 1.
    let err = PeopleClient::new("http://127.0.0.1:1", "tok", 10)
        .unwrap()
        .list_records()
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Transport { .. }));
}
