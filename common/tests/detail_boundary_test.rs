//! 詳細表示と境界ラベルのテスト
//!
//! APIが返す形のJSONをそのまま読み込んで検証

use bham311_common::boundary::{default_boundary_layers, unique_files};
use bham311_common::route::{issue_id_from_path, share_url};
use bham311_common::timeline::EventKind;
use bham311_common::{Comment, Endpoints, ImageInfo, Issue, IssueDetail, MapConfig};

const ISSUE_JSON: &str = r#"{
    "issueId": "8812",
    "request_type_full_category": "Street Light Out",
    "status": "Acknowledged",
    "latitude": "33.5207",
    "longitude": "-86.8025",
    "Address": "2101 Morris Ave, Birmingham, AL 35203",
    "created_at": "2025-10-01T14:00:00",
    "updated_at": "2025-10-04T09:30:00",
    "reported_by": "J. Resident",
    "image_full_url": "https://img.example.org/8812/full.jpg",
    "within_city_limits": true,
    "status_history": [
        {"changed_at": "2025-10-02T08:00:00", "new_status": "Acknowledged", "old_status": "Open"},
        "not an object"
    ]
}"#;

const COMMENTS_JSON: &str = r#"[
    {"created_date": "2025-10-03T12:00:00Z", "body": "Crew scheduled", "author_name": "Public Works"},
    {"message": "Thanks!"}
]"#;

#[test]
fn test_detail_from_api_payloads() {
    let issue: Issue = serde_json::from_str(ISSUE_JSON).expect("issue");
    let comments: Vec<Comment> = serde_json::from_str(COMMENTS_JSON).expect("comments");
    let image: ImageInfo = serde_json::from_str(r#"{"error": "no image"}"#).expect("image");

    let detail = IssueDetail::build(&issue, &comments, Some(&image));

    assert_eq!(detail.id, "8812");
    assert_eq!(detail.address.headline(), "Morris Ave, 35203");
    assert_eq!(detail.reporter, "J. Resident");
    assert_eq!(
        detail.image_url.as_deref(),
        Some("https://img.example.org/8812/full.jpg")
    );

    let titles: Vec<&str> = detail.timeline.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Issue Updated",
            "Comment",
            "Status Changed",
            "Issue Created",
            "Comment"
        ]
    );
    let scheduled = &detail.timeline[1];
    assert_eq!(scheduled.kind, EventKind::Comment);
    assert_eq!(scheduled.commenter.as_deref(), Some("Public Works"));
    assert_eq!(detail.timeline[2].old_status.as_deref(), Some("Open"));
}

#[test]
fn test_issue_routes() {
    let id = issue_id_from_path("/issue/8812").expect("id");
    assert_eq!(share_url("https://311.example.org", id), "https://311.example.org/issue/8812");
    assert_eq!(Endpoints::new("").comments(id), "/api/issues/8812/comments");
}

#[test]
fn test_boundary_labels_per_layer() {
    let collection = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"community": "Southside", "neighborhood": "Five Points South"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-86.81, 33.49], [-86.79, 33.49], [-86.79, 33.51], [-86.80, 33.51], [-86.81, 33.49]]]
            }
        }]
    });

    let defs = default_boundary_layers();
    let community = defs.iter().find(|d| d.name == "Community Labels").unwrap();
    let labels = community.label_markers(&collection).unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].text, "Southside");
    assert!((labels[0].position.lat - 33.50).abs() < 1e-9);
    assert!((labels[0].position.lng - -86.80).abs() < 1e-9);

    let neighborhood = defs.iter().find(|d| d.name == "Neighborhood Labels").unwrap();
    let labels = neighborhood.label_markers(&collection).unwrap();
    // 頂点重心 (33.50, -86.7975) から南西へずらす
    assert!((labels[0].position.lat - 33.498).abs() < 1e-9);
    assert!((labels[0].position.lng - -86.7985).abs() < 1e-9);
}

#[test]
fn test_each_boundary_file_fetched_once() {
    let config = MapConfig::default();
    let files = unique_files(&config.boundary_layers);
    assert_eq!(files.len(), 4);
    let endpoints = Endpoints::new(&config.api_base);
    assert_eq!(endpoints.boundary(files[0]), "/api/boundaries/city_limits");
}
