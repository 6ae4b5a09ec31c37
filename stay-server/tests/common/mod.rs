//! Shared helpers for router integration tests
//!
//! 启动内存数据库 + 临时 blob 桶，构造完整路由，用 tower 的 oneshot
//! 直接驱动请求。

// 每个测试二进制只用到这里的一部分助手
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use stay_server::core::build_router;
use stay_server::{Config, ServerState};

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
    // 临时目录随 TestApp 一起存活
    _work_dir: tempfile::TempDir,
}

pub async fn spawn_app() -> TestApp {
    let work_dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    let state = ServerState::initialize_in_memory(&config)
        .await
        .expect("state");
    TestApp {
        router: build_router(state.clone()),
        state,
        _work_dir: work_dir,
    }
}

impl TestApp {
    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("request")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = self
            .request(builder.body(Body::empty()).expect("request"))
            .await;
        split_json(response).await
    }

    pub async fn get_raw(&self, path: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .method("GET")
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
    }

    pub async fn send_json(
        &self,
        method: &str,
        path: &str,
        body: Value,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = self
            .request(builder.body(Body::from(body.to_string())).expect("request"))
            .await;
        split_json(response).await
    }

    /// multipart 表单请求：`homestay` JSON 字段 + 若干 `files[]` 文件
    pub async fn send_property_form(
        &self,
        method: &str,
        payload: &Value,
        files: &[TestFile<'_>],
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let (content_type, body) = multipart_body(payload, files);
        let mut builder = Request::builder()
            .method(method)
            .uri("/api/property")
            .header(header::CONTENT_TYPE, content_type);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = self
            .request(builder.body(Body::from(body)).expect("request"))
            .await;
        split_json(response).await
    }

    /// 注册并登录，返回 (token, userId, hostId)
    pub async fn register_and_login(
        &self,
        username: &str,
        role: &str,
    ) -> (String, String, Option<String>) {
        let (status, _) = self
            .send_json(
                "POST",
                "/api/auth/register",
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "s3cret-pass",
                    "name": username,
                    "role": role,
                }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed");

        let (status, body) = self
            .send_json(
                "POST",
                "/api/auth/login",
                serde_json::json!({ "login": username, "password": "s3cret-pass" }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        (
            body["token"].as_str().expect("token").to_string(),
            body["userId"].as_str().expect("userId").to_string(),
            body["hostId"].as_str().map(|s| s.to_string()),
        )
    }
}

pub struct TestFile<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: Vec<u8>,
}

/// 一张 2x2 的合法 PNG
pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([120, 180, 90]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

pub fn multipart_body(payload: &Value, files: &[TestFile<'_>]) -> (String, Vec<u8>) {
    let boundary = "stay-test-boundary";
    let mut body: Vec<u8> = Vec::new();

    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"homestay\"\r\n\r\n{payload}\r\n"
        )
        .as_bytes(),
    );

    for file in files {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"files[]\"; \
                 filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={boundary}"),
        body,
    )
}

pub async fn split_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// 合法的创建负载
pub fn lakeview_payload(host_id: &str) -> Value {
    serde_json::json!({
        "hostId": host_id,
        "name": "Lakeview",
        "pricePerNight": 100,
        "location": { "address": "123 Lake Rd" },
        "availability": [{ "date": "2024-02-01", "isAvailable": true }],
    })
}
