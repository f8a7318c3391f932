//! Round trips through a mock HTTP server.

#![cfg(all(feature = "server", feature = "remote"))]

use jsonapi_fixture::{
    Descriptor, DynamicRecord, Field, FixtureServer, MockFixture, Resource, JSONAPI_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};
use serde_json::{json, Value};

struct Widget {
    id: u32,
    name: String,
    owner: Option<Owner>,
}

struct Owner {
    login: String,
}

impl Resource for Owner {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::primary("primary,users", &self.login)]
    }
}

impl Resource for Widget {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::primary("primary,widgets", &self.id),
            Field::attr("attr,name", &self.name),
            Field::relation("relation,owner", self.owner.as_ref()),
        ]
    }
}

fn get(url: &str) -> (u16, String, Value) {
    let response = reqwest::blocking::get(url).unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.json().unwrap();
    (status, content_type, body)
}

#[test]
fn serves_resource() {
    let mut server = FixtureServer::new();
    let widget = Widget {
        id: 42,
        name: "bolt".into(),
        owner: Some(Owner {
            login: "ada".into(),
        }),
    };
    let mock = server.resource("GET", "/widgets/42", 200, &widget).unwrap();

    let (status, content_type, body) = get(&format!("{}/widgets/42", server.url()));

    assert_eq!(status, 200);
    assert_eq!(content_type, JSONAPI_CONTENT_TYPE);
    assert_eq!(
        body,
        json!({ "data": {
            "type": "widgets",
            "id": "42",
            "attributes": { "name": "bolt" },
            "relationships": { "owner": { "data": { "type": "users", "id": "ada" } } }
        } })
    );
    mock.assert();
}

#[test]
fn serves_collection_without_relationships() {
    let mut server = FixtureServer::new();
    let widgets = vec![
        Widget {
            id: 1,
            name: "a".into(),
            owner: Some(Owner {
                login: "ada".into(),
            }),
        },
        Widget {
            id: 2,
            name: "b".into(),
            owner: None,
        },
    ];
    let _mock = server
        .resource_list("GET", "/widgets", 200, &widgets)
        .unwrap();

    let (_, _, body) = get(&format!("{}/widgets", server.url()));
    assert_eq!(
        body,
        json!({ "data": [
            { "type": "widgets", "id": "1", "attributes": { "name": "a" } },
            { "type": "widgets", "id": "2", "attributes": { "name": "b" } }
        ] })
    );
}

#[test]
fn serves_error() {
    let mut server = FixtureServer::new();
    let _mock = server
        .error("GET", "/widgets/99", 404, "not found")
        .unwrap();

    let (status, content_type, body) = get(&format!("{}/widgets/99", server.url()));
    assert_eq!(status, 404);
    assert_eq!(content_type, JSONAPI_CONTENT_TYPE);
    assert_eq!(
        body,
        json!({ "errors": [ { "detail": "not found", "status": "404" } ] })
    );
}

#[test]
fn serves_raw_json() {
    let mut server = FixtureServer::new();
    let _mock = server
        .raw("GET", "/health", 200, &json!({ "status": "ok" }))
        .unwrap();

    let (status, content_type, body) = get(&format!("{}/health", server.url()));
    assert_eq!(status, 200);
    assert_eq!(content_type, JSON_CONTENT_TYPE);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[test]
fn mock_extension_on_plain_mockito() {
    let mut server = mockito::Server::new();
    let descriptor = Descriptor::new([("ID", "primary,widgets"), ("Name", "attr,name")]);
    let record = json!({ "ID": "7", "Name": "gear" });

    let _mock = server
        .mock("POST", "/widgets")
        .with_resource(201, &DynamicRecord::new(&record, &descriptor))
        .unwrap()
        .create();

    let response = reqwest::blocking::Client::new()
        .post(format!("{}/widgets", server.url()))
        .send()
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().unwrap();
    assert_eq!(body["data"]["attributes"]["name"], "gear");
}

#[test]
fn inner_server_allows_custom_matchers() {
    let mut server = FixtureServer::new();
    let widget = Widget {
        id: 5,
        name: "washer".into(),
        owner: None,
    };
    let mock = server
        .inner()
        .mock("GET", "/widgets/5")
        .match_header("accept", JSONAPI_CONTENT_TYPE)
        .with_resource(200, &widget)
        .unwrap()
        .create();

    let client = reqwest::blocking::Client::new();
    let url = format!("{}/widgets/5", server.url());

    let matched = client
        .get(&url)
        .header("accept", JSONAPI_CONTENT_TYPE)
        .send()
        .unwrap();
    assert_eq!(matched.status().as_u16(), 200);
    let body: Value = matched.json().unwrap();
    assert_eq!(body["data"]["attributes"]["name"], "washer");

    let unmatched = client.get(&url).send().unwrap();
    assert_eq!(unmatched.status().as_u16(), 501);
    mock.assert();
}
