mod common;

use axum::http::{Method, StatusCode};
use chrono::NaiveDateTime;
use common::{ADMIN_ID, USER_ID, json_request, request, send, test_app};
use serde_json::json;
use std::sync::Arc;
use ucsb_api::{
    models::{
        HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons, UcsbDiningCommonsMenuItem,
        UcsbOrganization,
    },
    repository::{InMemoryRepository, Repositories},
};

fn ldt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

const RESOURCES: [&str; 7] = [
    "/api/articles",
    "/api/helprequest",
    "/api/menuitemreview",
    "/api/UCSBDiningCommonsMenuItems",
    "/api/ucsborganization",
    "/api/ucsbdates",
    "/api/ucsbdiningcommons",
];

// --- Security Matrix ---

#[tokio::test]
async fn every_endpoint_is_forbidden_when_logged_out() {
    let app = test_app(Repositories::in_memory());

    for path in RESOURCES {
        let endpoints = [
            (Method::GET, format!("{path}/all")),
            (Method::GET, format!("{path}?id=1")),
            (Method::POST, format!("{path}/post")),
            (Method::PUT, format!("{path}?id=1")),
            (Method::DELETE, format!("{path}?id=1")),
        ];
        for (method, uri) in endpoints {
            let (status, body) = send(app.clone(), request(method.clone(), &uri, None)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
            assert_eq!(body["type"], "AccessDeniedException", "{method} {uri}");
        }
    }
}

#[tokio::test]
async fn every_write_endpoint_is_forbidden_for_regular_users() {
    let app = test_app(Repositories::in_memory());

    for path in RESOURCES {
        let endpoints = [
            (Method::POST, format!("{path}/post")),
            (Method::PUT, format!("{path}?id=1")),
            (Method::DELETE, format!("{path}?id=1")),
        ];
        for (method, uri) in endpoints {
            let (status, body) = send(app.clone(), request(method.clone(), &uri, Some(USER_ID))).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
            assert_eq!(body["type"], "AccessDeniedException");
        }
    }
}

#[tokio::test]
async fn every_list_endpoint_is_open_to_regular_users() {
    let app = test_app(Repositories::in_memory());

    for path in RESOURCES {
        let uri = format!("{path}/all");
        let (status, body) = send(app.clone(), request(Method::GET, &uri, Some(USER_ID))).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn unknown_callers_are_treated_as_logged_out() {
    let app = test_app(Repositories::in_memory());
    let stranger = uuid::Uuid::from_u128(404);

    let (status, body) = send(app, request(Method::GET, "/api/articles/all", Some(stranger))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({"type": "AccessDeniedException", "message": "Access is denied"})
    );
}

// --- HelpRequest ---

#[tokio::test]
async fn admin_can_post_a_help_request() {
    let repo = Arc::new(InMemoryRepository::<HelpRequest>::new());
    let app = test_app(Repositories {
        help_requests: repo.clone(),
        ..Repositories::in_memory()
    });
    let uri = "/api/helprequest/post?requesterEmail=cgaucho@ucsb.edu&teamId=s22-5pm-3&tableOrBreakoutRoom=7&explanation=Need%20help&solved=false&requestTime=2022-04-20T17:35:00";

    let (status, body) = send(app, request(Method::POST, uri, Some(ADMIN_ID))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "requesterEmail": "cgaucho@ucsb.edu",
            "teamId": "s22-5pm-3",
            "tableOrBreakoutRoom": "7",
            "requestTime": "2022-04-20T17:35:00",
            "explanation": "Need help",
            "solved": false
        })
    );
    assert_eq!(repo.calls().save, 1);
}

#[tokio::test]
async fn help_request_not_found_message_names_the_entity() {
    let app = test_app(Repositories::in_memory());

    let (status, body) = send(app, request(Method::GET, "/api/helprequest?id=7", Some(USER_ID))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "HelpRequest with id 7 not found");
}

// --- MenuItemReview ---

#[tokio::test]
async fn menu_item_review_uses_the_item_id_field_name() {
    let review = MenuItemReview {
        id: 3,
        item_id: 27,
        reviewer_email: "cgaucho@ucsb.edu".to_string(),
        stars: 3,
        date_reviewed: ldt("2022-01-03T00:00:00"),
        comments: "bland".to_string(),
    };
    let repo = Arc::new(InMemoryRepository::with_records(vec![review]));
    let app = test_app(Repositories {
        menu_item_reviews: repo.clone(),
        ..Repositories::in_memory()
    });

    let (status, body) = send(app.clone(), request(Method::GET, "/api/menuitemreview?id=3", Some(USER_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemID"], 27);

    let uri = "/api/menuitemreview/post?itemID=28&reviewerEmail=ldelplaya@ucsb.edu&stars=5&dateReviewed=2022-02-03T12:00:00&comments=great";
    let (status, body) = send(app, request(Method::POST, uri, Some(ADMIN_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemID"], 28);
    // Generated ids continue after the largest seeded id.
    assert_eq!(body["id"], 4);
    assert_eq!(repo.snapshot().len(), 2);
}

// --- UCSBDiningCommonsMenuItems ---

#[tokio::test]
async fn menu_items_round_trip_through_post_update_and_delete() {
    let repo = Arc::new(InMemoryRepository::<UcsbDiningCommonsMenuItem>::new());
    let app = test_app(Repositories {
        menu_items: repo.clone(),
        ..Repositories::in_memory()
    });

    let uri = "/api/UCSBDiningCommonsMenuItems/post?diningCommonsCode=ortega&name=Baked%20Pesto%20Pasta&station=Entree";
    let (status, created) = send(app.clone(), request(Method::POST, uri, Some(ADMIN_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        created,
        json!({"id": 1, "diningCommonsCode": "ortega", "name": "Baked Pesto Pasta", "station": "Entree"})
    );

    let change = json!({"diningCommonsCode": "portola", "name": "Tofu Banh Mi", "station": "Grill"});
    let (status, updated) = send(
        app.clone(),
        json_request(Method::PUT, "/api/UCSBDiningCommonsMenuItems?id=1", Some(ADMIN_ID), &change),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["station"], "Grill");

    let (status, body) = send(app, request(Method::DELETE, "/api/UCSBDiningCommonsMenuItems?id=1", Some(ADMIN_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "UCSBDiningCommonsMenuItems with id 1 deleted");
    assert!(repo.snapshot().is_empty());
}

// --- UCSBOrganization (natural key) ---

fn organization(code: &str) -> UcsbOrganization {
    UcsbOrganization {
        org_code: code.to_string(),
        org_translation_short: "ZETA PHI RHO".to_string(),
        org_translation: "ZETA PHI RHO".to_string(),
        inactive: false,
    }
}

#[tokio::test]
async fn organizations_are_selected_by_org_code() {
    let repo = Arc::new(InMemoryRepository::with_records(vec![organization("ZPR")]));
    let app = test_app(Repositories {
        organizations: repo.clone(),
        ..Repositories::in_memory()
    });

    let (status, body) = send(app.clone(), request(Method::GET, "/api/ucsborganization?orgCode=ZPR", Some(USER_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(organization("ZPR")).unwrap());

    let (status, body) = send(app, request(Method::GET, "/api/ucsborganization?orgCode=SKY", Some(USER_ID))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "UCSBOrganization with id SKY not found");
}

#[tokio::test]
async fn organization_post_keeps_the_caller_chosen_key() {
    let repo = Arc::new(InMemoryRepository::<UcsbOrganization>::new());
    let app = test_app(Repositories {
        organizations: repo.clone(),
        ..Repositories::in_memory()
    });
    let uri = "/api/ucsborganization/post?orgCode=SKY&orgTranslationShort=SKYDIVING%20CLUB&orgTranslation=SKYDIVING%20CLUB%20AT%20UCSB&inactive=true";

    let (status, body) = send(app, request(Method::POST, uri, Some(ADMIN_ID))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "orgCode": "SKY",
            "orgTranslationShort": "SKYDIVING CLUB",
            "orgTranslation": "SKYDIVING CLUB AT UCSB",
            "inactive": true
        })
    );
    assert_eq!(repo.snapshot().len(), 1);
}

#[tokio::test]
async fn organization_update_cannot_change_the_key() {
    let repo = Arc::new(InMemoryRepository::with_records(vec![organization("ZPR")]));
    let app = test_app(Repositories {
        organizations: repo.clone(),
        ..Repositories::in_memory()
    });
    let change = json!({
        "orgCode": "OTHER",
        "orgTranslationShort": "ZPR",
        "orgTranslation": "ZETA PHI RHO SORORITY",
        "inactive": true
    });

    let (status, body) = send(
        app.clone(),
        json_request(Method::PUT, "/api/ucsborganization?orgCode=ZPR", Some(ADMIN_ID), &change),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orgCode"], "ZPR");
    assert_eq!(body["inactive"], true);

    let (status, body) = send(app, request(Method::DELETE, "/api/ucsborganization?orgCode=ZPR", Some(ADMIN_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "UCSBOrganization with id ZPR deleted");
    assert!(repo.snapshot().is_empty());
}

#[tokio::test]
async fn organization_update_body_may_omit_the_key() {
    let repo = Arc::new(InMemoryRepository::with_records(vec![organization("ZPR")]));
    let app = test_app(Repositories {
        organizations: repo.clone(),
        ..Repositories::in_memory()
    });
    let change = json!({
        "orgTranslationShort": "ZPR",
        "orgTranslation": "ZETA PHI RHO SORORITY",
        "inactive": true
    });

    let (status, body) = send(
        app,
        json_request(Method::PUT, "/api/ucsborganization?orgCode=ZPR", Some(ADMIN_ID), &change),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orgCode"], "ZPR");
    assert_eq!(body["orgTranslation"], "ZETA PHI RHO SORORITY");
    assert_eq!(repo.snapshot().len(), 1);
}

#[tokio::test]
async fn dining_commons_update_body_may_omit_the_code() {
    let commons = UcsbDiningCommons {
        code: "ortega".to_string(),
        name: "Ortega".to_string(),
        ..UcsbDiningCommons::default()
    };
    let repo = Arc::new(InMemoryRepository::with_records(vec![commons]));
    let app = test_app(Repositories {
        dining_commons: repo.clone(),
        ..Repositories::in_memory()
    });
    let change = json!({
        "name": "Ortega Dining Commons",
        "hasSackMeal": true,
        "hasTakeOutMeal": true,
        "hasDiningCam": true,
        "latitude": 34.410987,
        "longitude": -119.84709
    });

    let (status, body) = send(
        app,
        json_request(Method::PUT, "/api/ucsbdiningcommons?code=ortega", Some(ADMIN_ID), &change),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "ortega");
    assert_eq!(body["hasSackMeal"], true);
}

#[tokio::test]
async fn update_with_a_malformed_body_is_a_bad_request() {
    let repo = Arc::new(InMemoryRepository::with_records(vec![organization("ZPR")]));
    let app = test_app(Repositories {
        organizations: repo.clone(),
        ..Repositories::in_memory()
    });

    let (status, body) = send(
        app,
        json_request(Method::PUT, "/api/ucsborganization?orgCode=ZPR", Some(ADMIN_ID), &json!({"inactive": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "BadRequestException");
    assert_eq!(repo.snapshot(), vec![organization("ZPR")]);
}

// --- UCSBDate ---

#[tokio::test]
async fn ucsb_dates_use_the_quarter_field_name() {
    let repo = Arc::new(InMemoryRepository::<UcsbDate>::new());
    let app = test_app(Repositories {
        dates: repo.clone(),
        ..Repositories::in_memory()
    });
    let uri = "/api/ucsbdates/post?quarterYYYYQ=20222&name=groundhogDay&localDateTime=2022-02-02T00:00:00";

    let (status, body) = send(app, request(Method::POST, uri, Some(ADMIN_ID))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "quarterYYYYQ": "20222", "name": "groundhogDay", "localDateTime": "2022-02-02T00:00:00"})
    );
}

// --- UCSBDiningCommons (natural key) ---

#[tokio::test]
async fn dining_commons_are_selected_by_code() {
    let commons = UcsbDiningCommons {
        code: "de-la-guerra".to_string(),
        name: "De La Guerra".to_string(),
        has_sack_meal: false,
        has_take_out_meal: false,
        has_dining_cam: true,
        latitude: 34.409953,
        longitude: -119.85277,
    };
    let repo = Arc::new(InMemoryRepository::with_records(vec![commons.clone()]));
    let app = test_app(Repositories {
        dining_commons: repo.clone(),
        ..Repositories::in_memory()
    });

    let (status, body) = send(app.clone(), request(Method::GET, "/api/ucsbdiningcommons?code=de-la-guerra", Some(USER_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(&commons).unwrap());
    assert_eq!(body["hasDiningCam"], true);

    let (status, _) = send(app, request(Method::GET, "/api/ucsbdiningcommons?id=de-la-guerra", Some(USER_ID))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
