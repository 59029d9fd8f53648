use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use tenantgate_api::config::AppConfig;
use tenantgate_auth::AuthConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, in-memory store, cheap hashing, ephemeral port.
        let config = AppConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            database_url: None,
            database_max_connections: 1,
            auth: AuthConfig {
                jwt_secret: jwt_secret.to_string(),
                token_ttl_secs: None,
                password_hash_cost: 1,
                password_hash_memory_kib: 256,
            },
        };
        let app = tenantgate_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

const SECRET: &str = "test-secret";

fn acme_body() -> Value {
    json!({
        "name": "Acme",
        "email": "acme@co",
        "adminName": "Al",
        "adminEmail": "al@acme.co",
        "adminPassword": "p1",
    })
}

async fn create_tenant(client: &reqwest::Client, srv: &TestServer, body: Value) -> (StatusCode, Value) {
    let res = client.post(srv.url("/tenant")).json(&body).send().await.unwrap();
    (res.status(), res.json().await.unwrap())
}

async fn login(client: &reqwest::Client, srv: &TestServer, email: &str, password: &str) -> (StatusCode, Value) {
    let res = client
        .post(srv.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    (res.status(), res.json().await.unwrap())
}

#[tokio::test]
async fn exempt_routes_need_no_tenant_header() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["service"], "tenantgate-api");

    let (status, _) = login(&client, &srv, "nobody@co", "x").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_tenant_header_is_rejected() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    for req in [
        client.get(srv.url("/users")),
        client.post(srv.url("/users")).json(&json!({})),
        client.get(srv.url("/tenant?email=acme@co")),
        client.delete(srv.url("/tenant")),
        client.get(srv.url("/users")).header("x-tenant", "   "),
    ] {
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "error": "tenant_id_required", "message": "Tenant ID is required" })
        );
    }
}

#[tokio::test]
async fn unknown_or_malformed_tenant_is_rejected() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    for tenant in ["42", "not-a-uuid", "0190a1b2-0000-7000-8000-000000000000"] {
        let res = client.get(srv.url("/users")).header("x-tenant", tenant).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_tenant");
        assert_eq!(body["message"], "Invalid tenant ID");
    }
}

#[tokio::test]
async fn acme_lifecycle_over_http() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    let (status, admin) = create_tenant(&client, &srv, acme_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(admin["role"], "ADMIN");
    assert_eq!(admin["email"], "al@acme.co");
    assert!(admin.get("passwordHash").is_none());
    let tenant_id = admin["tenantId"].as_str().unwrap().to_string();

    let res = client
        .get(srv.url("/tenant?email=acme@co"))
        .header("x-tenant", &tenant_id)
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "exists": true }));

    // role and tenantId in the body are ignored.
    let res = client
        .post(srv.url("/users"))
        .header("x-tenant", &tenant_id)
        .json(&json!({
            "name": "Bob",
            "email": "bob@acme.co",
            "password": "p2",
            "role": "ADMIN",
            "tenantId": "0190a1b2-0000-7000-8000-000000000000",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let bob: Value = res.json().await.unwrap();
    assert_eq!(bob["role"], "USER");
    assert_eq!(bob["tenantId"], tenant_id.as_str());

    let (status, ok) = login(&client, &srv, "bob@acme.co", "p2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ok["success"], true);
    assert_eq!(ok["message"], "Login successful");
    assert_eq!(ok["userId"], bob["id"]);
    let token = ok["accessToken"].as_str().unwrap();

    let res = client
        .get(srv.url("/whoami"))
        .header("x-tenant", &tenant_id)
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(
        me["claims"],
        json!({
            "userId": bob["id"],
            "email": "bob@acme.co",
            "name": "Bob",
            "role": "USER",
            "tenantId": tenant_id.as_str(),
        })
    );
    assert_eq!(me["tenant"]["name"], "Acme");

    let res = client.get(srv.url("/users")).header("x-tenant", &tenant_id).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing: Value = res.json().await.unwrap();
    assert_eq!(listing["tenantId"], tenant_id.as_str());
    let emails: Vec<&str> = listing["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["al@acme.co", "bob@acme.co"]);
}

#[tokio::test]
async fn login_failures_share_one_body() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();
    create_tenant(&client, &srv, acme_body()).await;

    let (s1, unknown) = login(&client, &srv, "nobody@acme.co", "p1").await;
    let (s2, wrong) = login(&client, &srv, "al@acme.co", "wrong").await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, json!({ "success": false, "message": "Invalid credentials" }));
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn duplicates_are_conflicts() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    let (_, admin) = create_tenant(&client, &srv, acme_body()).await;
    let tenant_id = admin["tenantId"].as_str().unwrap();

    let mut again = acme_body();
    again["adminEmail"] = json!("other@acme.co");
    let (status, body) = create_tenant(&client, &srv, again).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "tenant_exists");

    let res = client
        .post(srv.url("/users"))
        .header("x-tenant", tenant_id)
        .json(&json!({ "name": "Al 2", "email": "al@acme.co", "password": "p" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(res.json::<Value>().await.unwrap()["error"], "user_exists");
}

#[tokio::test]
async fn whoami_requires_a_token_for_the_resolved_tenant() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    let (_, acme) = create_tenant(&client, &srv, acme_body()).await;
    let acme_id = acme["tenantId"].as_str().unwrap();
    let (_, globex) = create_tenant(
        &client,
        &srv,
        json!({
            "name": "Globex",
            "email": "globex@co",
            "adminName": "Gus",
            "adminEmail": "gus@globex.co",
            "adminPassword": "p3",
        }),
    )
    .await;
    let globex_id = globex["tenantId"].as_str().unwrap();

    let res = client.get(srv.url("/whoami")).header("x-tenant", acme_id).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Valid token, wrong tenant.
    let (_, ok) = login(&client, &srv, "gus@globex.co", "p3").await;
    let gus_token = ok["accessToken"].as_str().unwrap();
    let res = client
        .get(srv.url("/whoami"))
        .header("x-tenant", acme_id)
        .bearer_auth(gus_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<Value>().await.unwrap()["error"], "tenant_mismatch");

    // Right claims, foreign secret.
    let forged = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "userId": globex["id"],
            "email": "gus@globex.co",
            "name": "Gus",
            "role": "ADMIN",
            "tenantId": globex_id,
        }),
        &EncodingKey::from_secret(b"other-secret"),
    )
    .unwrap();
    let res = client
        .get(srv.url("/whoami"))
        .header("x-tenant", globex_id)
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn purge_removes_everything() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();

    let (_, admin) = create_tenant(&client, &srv, acme_body()).await;
    let tenant_id = admin["tenantId"].as_str().unwrap();

    let res = client.delete(srv.url("/tenant")).header("x-tenant", tenant_id).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "deletedUsers": 1, "deletedTenants": 1 })
    );

    let res = client.get(srv.url("/users")).header("x-tenant", tenant_id).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (status, _) = login(&client, &srv, "al@acme.co", "p1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tenant_queries_and_purge_require_an_existing_tenant() {
    let srv = TestServer::spawn(SECRET).await;
    let client = reqwest::Client::new();
    create_tenant(&client, &srv, acme_body()).await;

    for tenant in ["garbage", "0190a1b2-0000-7000-8000-000000000000"] {
        for req in [
            client.get(srv.url("/tenant?email=acme@co")),
            client.delete(srv.url("/tenant")),
        ] {
            let res = req.header("x-tenant", tenant).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            assert_eq!(res.json::<Value>().await.unwrap()["error"], "invalid_tenant");
        }
    }

    // Nothing was purged.
    let (status, _) = login(&client, &srv, "al@acme.co", "p1").await;
    assert_eq!(status, StatusCode::OK);
}
