//! Property write-path integration tests
//!
//! 覆盖民宿创建 / 更新 / 列表 / 详情 / 删除的可观测契约，
//! 包括单文件失败隔离与附件删除。

mod common;

use common::{TestFile, lakeview_payload, spawn_app, tiny_png};
use http::StatusCode;
use stay_server::db::repository::HomestayRepository;

#[tokio::test]
async fn create_with_zero_files_has_empty_attachment_list() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let (status, body) = app
        .send_property_form("POST", &lakeview_payload(&host_id), &[], Some(&token))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Homestay added successfully");
    assert_eq!(body["attachmentIds"].as_array().unwrap().len(), 0);
    assert_eq!(body["homestay"]["rating"], 0);
}

#[tokio::test]
async fn create_with_one_failing_file_links_the_rest() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    // 第二个文件不是图片，上传失败但被隔离
    let files = [
        TestFile {
            file_name: "cabin.png",
            content_type: "image/png",
            data: tiny_png(),
        },
        TestFile {
            file_name: "notes.txt",
            content_type: "text/plain",
            data: b"not an image".to_vec(),
        },
        TestFile {
            file_name: "lake.png",
            content_type: "image/png",
            data: tiny_png(),
        },
    ];

    let (status, body) = app
        .send_property_form("POST", &lakeview_payload(&host_id), &files, Some(&token))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["attachmentIds"].as_array().unwrap().len(), 2);

    // link 行与响应一致
    let repo = HomestayRepository::new(app.state.db.clone());
    let homestay_id = body["homestay"]["id"].as_str().unwrap();
    let links = repo.find_attachment_ids(homestay_id).await.unwrap();
    assert_eq!(links.len(), 2);
}

#[tokio::test]
async fn create_with_missing_host_id_writes_nothing() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let mut payload = lakeview_payload(&host_id);
    payload.as_object_mut().unwrap().remove("hostId");

    let (status, body) = app
        .send_property_form("POST", &payload, &[], Some(&token))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Required fields are missing");

    // 验证先于任何持久化：没有民宿行产生
    let (status, body) = app
        .get(&format!("/api/property?hostId={host_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No homestays found for this host");
}

#[tokio::test]
async fn create_with_unknown_host_is_not_found() {
    let app = spawn_app().await;
    let (token, _, _) = app.register_and_login("maria", "host").await;

    let (status, body) = app
        .send_property_form(
            "POST",
            &lakeview_payload("host:doesnotexist"),
            &[],
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Host not found");
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = spawn_app().await;
    let (status, _) = app
        .send_property_form("POST", &lakeview_payload("host:any"), &[], None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_homestay_round_trips_through_detail() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let (status, body) = app
        .send_property_form("POST", &lakeview_payload(&host_id), &[], Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["homestay"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/property/stays?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let homestay = &body["homestay"];
    assert_eq!(homestay["name"], "Lakeview");
    assert_eq!(homestay["pricePerNight"], 100);
    assert_eq!(homestay["location"]["address"], "123 Lake Rd");
    assert_eq!(homestay["availability"][0]["date"], "2024-02-01");
    assert_eq!(homestay["availability"][0]["isAvailable"], true);
    assert_eq!(homestay["rating"], 0);
    assert_eq!(homestay["photos"].as_array().unwrap().len(), 0);
    assert_eq!(body["photoIds"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn listing_for_host_without_homestays_is_informative_404() {
    let app = spawn_app().await;
    let (_, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let (status, body) = app
        .get(&format!("/api/property?hostId={host_id}"), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No homestays found for this host");
}

#[tokio::test]
async fn listing_includes_attachment_ids_per_homestay() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let files = [TestFile {
        file_name: "cabin.png",
        content_type: "image/png",
        data: tiny_png(),
    }];
    let (status, _) = app
        .send_property_form("POST", &lakeview_payload(&host_id), &files, Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .get(&format!("/api/property?hostId={host_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Lakeview");
    assert_eq!(list[0]["attachmentIds"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_deletes_exactly_the_requested_attachments() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let files = [
        TestFile {
            file_name: "one.png",
            content_type: "image/png",
            data: tiny_png(),
        },
        TestFile {
            file_name: "two.png",
            content_type: "image/png",
            data: tiny_png(),
        },
        TestFile {
            file_name: "three.png",
            content_type: "image/png",
            data: tiny_png(),
        },
    ];
    let (status, body) = app
        .send_property_form("POST", &lakeview_payload(&host_id), &files, Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = body["homestay"]["id"].as_str().unwrap().to_string();
    let attachment_ids: Vec<String> = body["attachmentIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(attachment_ids.len(), 3);

    let mut payload = lakeview_payload(&host_id);
    let obj = payload.as_object_mut().unwrap();
    obj.insert("id".into(), serde_json::json!(id));
    obj.insert("pricePerNight".into(), serde_json::json!(120));
    obj.insert(
        "deletedAttachmentIds".into(),
        serde_json::json!([attachment_ids[0], attachment_ids[1]]),
    );

    let (status, body) = app
        .send_property_form("PUT", &payload, &[], Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Homestay updated successfully");
    assert_eq!(body["deletedAttachmentIds"].as_array().unwrap().len(), 2);
    assert_eq!(body["attachmentIds"].as_array().unwrap().len(), 0);

    // 恰好剩下第三个附件仍然关联
    let repo = HomestayRepository::new(app.state.db.clone());
    let links = repo.find_attachment_ids(&id).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].to_string(), attachment_ids[2]);

    // 更新按全量覆盖生效
    let (_, body) = app.get(&format!("/api/property/stays?id={id}"), None).await;
    assert_eq!(body["homestay"]["pricePerNight"], 120);
}

#[tokio::test]
async fn update_of_missing_homestay_is_not_found() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let mut payload = lakeview_payload(&host_id);
    payload
        .as_object_mut()
        .unwrap()
        .insert("id".into(), serde_json::json!("homestay:missing"));

    let (status, body) = app
        .send_property_form("PUT", &payload, &[], Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Homestay not found");
}

#[tokio::test]
async fn delete_removes_homestay_and_links() {
    let app = spawn_app().await;
    let (token, _, host_id) = app.register_and_login("maria", "host").await;
    let host_id = host_id.expect("host profile");

    let files = [TestFile {
        file_name: "cabin.png",
        content_type: "image/png",
        data: tiny_png(),
    }];
    let (status, body) = app
        .send_property_form("POST", &lakeview_payload(&host_id), &files, Some(&token))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["homestay"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send_json(
            "DELETE",
            &format!("/api/property?id={id}"),
            serde_json::json!({}),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Homestay deleted successfully");

    // 民宿与 link 行都不可再查到
    let repo = HomestayRepository::new(app.state.db.clone());
    assert!(repo.find_by_id(&id).await.unwrap().is_none());
    assert!(repo.find_attachment_ids(&id).await.unwrap().is_empty());

    let (status, _) = app.get(&format!("/api/property/stays?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn foreign_host_cannot_write_someone_elses_property() {
    let app = spawn_app().await;
    let (token_a, _, host_a) = app.register_and_login("maria", "host").await;
    let host_a = host_a.expect("host profile");
    let (token_b, _, host_b) = app.register_and_login("pedro", "host").await;
    assert!(host_b.is_some());

    // B 尝试以 A 的 hostId 创建
    let (status, _) = app
        .send_property_form("POST", &lakeview_payload(&host_a), &[], Some(&token_b))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A 创建后 B 尝试删除
    let (status, body) = app
        .send_property_form("POST", &lakeview_payload(&host_a), &[], Some(&token_a))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["homestay"]["id"].as_str().unwrap();

    let (status, _) = app
        .send_json(
            "DELETE",
            &format!("/api/property?id={id}"),
            serde_json::json!({}),
            Some(&token_b),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
