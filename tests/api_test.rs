mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{blog, faq, get_json, post_json, program, router, FakeStrapi};
use edusite_gateway::strapi::query::Populate;
use edusite_gateway::strapi::Locale;

async fn seed_faqs(cms: &FakeStrapi) {
    cms.seed(
        "faqs",
        vec![
            faq("a", 1, "en", "How do I apply?", "Fill in the online form", 2),
            faq("b", 2, "en", "What about tuition?", "It varies by program", 1),
            faq("c", 3, "en", "Do you help with visas?", "Yes", 3),
            faq("a", 4, "zh", "如何申请？", "在线填写表格", 2),
            faq("b", 5, "zh", "学费多少？", "因项目而异", 1),
            faq("c", 6, "zh", "是否协助签证？", "是的", 3),
        ],
    )
    .await;
}

#[tokio::test]
async fn faqs_are_merged_and_ordered() {
    let cms = FakeStrapi::new();
    seed_faqs(&cms).await;
    let app = router(cms);

    let (status, body) = get_json(&app, "/api/faqs?locale=en").await;
    assert_eq!(status, StatusCode::OK);
    let faqs = body["faqs"].as_array().unwrap();
    assert_eq!(faqs.len(), 3);
    assert_eq!(faqs[0]["id"], "b");
    assert_eq!(faqs[0]["question_en"], "What about tuition?");
    assert_eq!(faqs[0]["question_zh"], "学费多少？");
    assert_eq!(faqs[0]["category"], "general");
}

#[tokio::test]
async fn faq_category_matches_either_language() {
    let cms = FakeStrapi::new();
    cms.seed(
        "faqs",
        vec![
            json!({ "id": 1, "documentId": "v", "locale": "en", "question": "Visa help?",
                    "category": "Visa", "order": 1 }),
            json!({ "id": 2, "documentId": "v", "locale": "zh", "question": "签证协助？",
                    "category": "签证", "order": 1 }),
            json!({ "id": 3, "documentId": "t", "locale": "en", "question": "Tuition?",
                    "category": { "id": 5, "name": "Fees", "slug": "fees" }, "order": 2 }),
        ],
    )
    .await;
    let app = router(cms);

    for locale in ["en", "zh"] {
        let (_, body) = get_json(&app, &format!("/api/faqs?locale={}&category=visa", locale)).await;
        let faqs = body["faqs"].as_array().unwrap();
        assert_eq!(faqs.len(), 1, "locale={}", locale);
        assert_eq!(faqs[0]["id"], "v");
    }

    let (_, body) = get_json(&app, "/api/faqs?locale=en&category=%E7%AD%BE%E8%AF%81").await;
    assert_eq!(body["faqs"][0]["id"], "v");

    let (_, body) = get_json(&app, "/api/faqs?locale=zh&category=fees").await;
    let faqs = body["faqs"].as_array().unwrap();
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0]["category"], "Fees");
}

#[tokio::test]
async fn faq_search_requires_a_query() {
    let cms = FakeStrapi::new();
    seed_faqs(&cms).await;
    let app = router(cms);

    let (status, body) = get_json(&app, "/api/faqs/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = get_json(&app, "/api/faqs/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&app, "/api/faqs/search?q=TUITION").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "TUITION");
    let hits = body["faqs"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], "b");
}

#[tokio::test]
async fn blog_list_paginates_newest_first() {
    let cms = FakeStrapi::new();
    let posts = (1..=12)
        .map(|i| {
            blog(
                &format!("post-{}", i),
                i,
                "en",
                &format!("post-{}", i),
                &format!("Post {}", i),
                &format!("2024-01-{:02}T00:00:00.000Z", i),
            )
        })
        .collect();
    cms.seed("blogs", posts).await;
    let app = router(cms);

    let (status, body) = get_json(&app, "/api/blog?page=2&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["totalPosts"], 12);
    assert_eq!(body["currentPage"], 2);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 5);
    assert_eq!(posts[0]["slug"], "post-7");
    assert_eq!(posts[4]["slug"], "post-3");
    assert_eq!(posts[0]["id"], "post-7");
    assert_eq!(posts[0]["title_zh"], "Post 7");
    assert_eq!(posts[0]["excerpt_en"], "Post 7 body text");
    assert_eq!(posts[0]["cover_image"], "http://cms.test/uploads/post-7.jpg");
    assert_eq!(posts[0]["category"], json!({ "id": 1, "name": "News" }));
    assert!(posts[0].get("content_en").is_none());
}

#[tokio::test]
async fn lists_degrade_to_empty_shapes_when_the_cms_fails() {
    let cms = FakeStrapi::new();
    cms.fail_all();
    let app = router(cms);

    let (status, body) = get_json(&app, "/api/blog?page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "posts": [], "totalPages": 0, "totalPosts": 0, "currentPage": 3 })
    );

    let (status, body) = get_json(&app, "/api/programs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "programs": [], "totalPages": 0, "totalItems": 0, "currentPage": 1 })
    );

    let (_, body) = get_json(&app, "/api/faqs").await;
    assert_eq!(body, json!({ "faqs": [] }));
    let (_, body) = get_json(&app, "/api/universities").await;
    assert_eq!(body, json!({ "universities": [] }));
    let (_, body) = get_json(&app, "/api/home/hero").await;
    assert_eq!(body, json!({ "banners": [] }));
}

#[tokio::test]
async fn chinese_only_post_detail_fills_english() {
    let cms = FakeStrapi::new();
    cms.seed(
        "blogs",
        vec![blog("p1", 42, "zh", "liu-xue", "留学指南", "2024-03-01T00:00:00.000Z")],
    )
    .await;
    let app = router(cms);

    let (status, body) = get_json(&app, "/api/blog/liu-xue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "42");
    assert_eq!(body["title_en"], "留学指南");
    assert_eq!(body["title_zh"], "留学指南");
    assert_eq!(body["content_en"], body["content_zh"]);
    assert!(body["content_en"].is_array());
}

#[tokio::test]
async fn post_detail_errors() {
    let cms = FakeStrapi::new();
    let app = router(cms.clone());

    let (status, body) = get_json(&app, "/api/blog/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    cms.fail_all();
    let (status, body) = get_json(&app, "/api/blog/anything").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "failed to fetch content from the CMS");
}

#[tokio::test]
async fn programs_filter_by_grade_in_either_language() {
    let cms = FakeStrapi::new();
    cms.seed(
        "programs",
        vec![
            program("prog-1", 5, "en", "Toronto Summer", Some((10, "Grade 10"))),
            program("prog-2", 6, "en", "Oxford Prep", Some((12, "Grade 12"))),
            program("prog-3", 7, "en", "Open Day", None),
            program("prog-1", 8, "zh", "多伦多夏令营", Some((10, "十年级"))),
        ],
    )
    .await;
    let app = router(cms);

    let (_, body) = get_json(&app, "/api/programs").await;
    assert_eq!(body["totalItems"], 3);

    let (_, body) = get_json(&app, "/api/programs?grade=Grade%2010").await;
    let programs = body["programs"].as_array().unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0]["id"], "prog-1");
    assert_eq!(programs[0]["title_zh"], "多伦多夏令营");
    assert_eq!(programs[0]["countries"], json!([{ "id": 7, "name": "Canada" }]));
    assert_eq!(programs[0]["image"], "https://cdn.example.com/p.png");

    let (_, body) = get_json(&app, "/api/programs?grade=12&programType=summer%20camp").await;
    assert_eq!(body["programs"][0]["id"], "prog-2");

    let (_, body) = get_json(&app, "/api/programs?programType=IB").await;
    assert_eq!(body["totalItems"], 0);
}

#[tokio::test]
async fn program_detail_by_document_id() {
    let cms = FakeStrapi::new();
    cms.seed(
        "programs",
        vec![
            program("prog-1", 5, "en", "Toronto Summer", Some((10, "Grade 10"))),
            program("prog-1", 8, "zh", "多伦多夏令营", Some((10, "十年级"))),
        ],
    )
    .await;
    let app = router(cms);

    let (status, body) = get_json(&app, "/api/programs/prog-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "5");
    assert_eq!(body["title_en"], "Toronto Summer");
    assert_eq!(body["title_zh"], "多伦多夏令营");
    assert_eq!(body["grade"]["name"], "Grade 10");

    let (status, _) = get_json(&app, "/api/programs/prog-404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn program_detail_rejects_encoded_paths() {
    let cms = FakeStrapi::new();
    cms.seed("users", vec![json!({ "id": 1, "documentId": "u1", "locale": "en" })])
        .await;
    let app = router(cms.clone());

    let (status, body) = get_json(&app, "/api/programs/..%2Fusers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = get_json(&app, "/api/programs/x%3Fpopulate=*").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(cms.queries().await.is_empty());
}

#[tokio::test]
async fn health_reflects_cms_reachability() {
    let cms = FakeStrapi::new();
    let app = router(cms.clone());

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["strapi"], "connected");
    assert_eq!(body["environment"], "test");
    assert!(body["timestamp"].is_string());

    cms.set_unhealthy();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["strapi"], "disconnected");
}

#[tokio::test]
async fn form_submission_is_validated_and_stored() {
    let cms = FakeStrapi::new();
    let app = router(cms.clone());

    let (status, body) = post_json(
        &app,
        "/api/form-submissions",
        r#"{"name":"  Li Wei ","email":"li@example.com","phone":" ","sourcePage":"/contact"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true, "id": "submission-1" }));

    let created = cms.created().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "form-submissions");
    assert_eq!(
        created[0].1,
        json!({ "name": "Li Wei", "email": "li@example.com", "sourcePage": "/contact" })
    );

    let (status, body) = post_json(
        &app,
        "/api/form-submissions",
        r#"{"name":"Li Wei","email":"not-an-email"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email is not a valid address");

    let (status, _) = post_json(&app, "/api/form-submissions", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(cms.created().await.len(), 1);
}

#[tokio::test]
async fn form_submission_reports_cms_failure() {
    let cms = FakeStrapi::new();
    cms.fail_all();
    let app = router(cms);

    let (status, body) = post_json(
        &app,
        "/api/form-submissions",
        r#"{"name":"Li Wei","email":"li@example.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Bad Gateway");
}

#[tokio::test]
async fn partner_logos_get_absolute_urls() {
    let cms = FakeStrapi::new();
    cms.seed(
        "partner-logos",
        vec![
            json!({ "id": 1, "name": "Oxford", "logo": { "id": 8, "url": "/uploads/oxford.png" }, "order": 2 }),
            json!({ "id": 2, "name": "Toronto", "logo": { "data": { "id": 9, "attributes": { "url": "/uploads/uoft.png" } } }, "order": 1 }),
        ],
    )
    .await;
    let app = router(cms.clone());

    let (status, body) = get_json(&app, "/api/partner-logos").await;
    assert_eq!(status, StatusCode::OK);
    let logos = body["logos"].as_array().unwrap();
    assert_eq!(logos.len(), 2);
    assert_eq!(logos[0]["name"], "Toronto");
    assert_eq!(logos[0]["logo"], "http://cms.test/uploads/uoft.png");
    assert_eq!(logos[1]["logo"], "http://cms.test/uploads/oxford.png");

    assert!(cms.queries().await.iter().all(|q| q.locale.is_none()));
}

#[tokio::test]
async fn hero_uses_inline_localizations() {
    let cms = FakeStrapi::new();
    cms.seed(
        "hero-banners",
        vec![json!({
            "id": 1, "documentId": "h1", "locale": "en",
            "title": "Welcome", "subtitle": "Study abroad", "cta_text": "Apply",
            "cta_link": "/apply", "order": 1,
            "image": { "id": 4, "url": "/uploads/hero.jpg" },
            "localizations": [
                { "id": 2, "documentId": "h1", "locale": "zh", "title": "欢迎", "cta_text": "申请" }
            ]
        })],
    )
    .await;
    let app = router(cms.clone());

    let (_, body) = get_json(&app, "/api/home/hero").await;
    let banner = &body["banners"][0];
    assert_eq!(banner["title_en"], "Welcome");
    assert_eq!(banner["title_zh"], "欢迎");
    assert_eq!(banner["subtitle_zh"], "Study abroad");
    assert_eq!(banner["cta_text_zh"], "申请");
    assert_eq!(banner["image"], "http://cms.test/uploads/hero.jpg");
    assert_eq!(body["banners"].as_array().unwrap().len(), 1);

    let queries = cms.queries().await;
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().any(|q| q.locale == Some(Locale::En)
        && q.populate == Populate::Fields(vec!["image".into(), "localizations".into()])));
}

#[tokio::test]
async fn hero_keeps_banners_that_exist_in_one_language() {
    let cms = FakeStrapi::new();
    cms.seed(
        "hero-banners",
        vec![
            json!({
                "id": 1, "documentId": "h1", "locale": "en", "title": "Welcome", "order": 1,
                "localizations": [{ "id": 2, "documentId": "h1", "locale": "zh", "title": "欢迎" }]
            }),
            json!({ "id": 2, "documentId": "h1", "locale": "zh", "title": "欢迎", "order": 1 }),
            json!({ "id": 3, "documentId": "h2", "locale": "zh", "title": "新学期", "order": 2 }),
        ],
    )
    .await;
    let app = router(cms);

    for locale in ["en", "zh"] {
        let (_, body) = get_json(&app, &format!("/api/home/hero?locale={}", locale)).await;
        let banners = body["banners"].as_array().unwrap();
        assert_eq!(banners.len(), 2, "locale={}", locale);
        assert_eq!(banners[0]["title_zh"], "欢迎");
        assert_eq!(banners[1]["id"], "h2");
        assert_eq!(banners[1]["title_en"], "新学期");
    }
}

#[tokio::test]
async fn hero_falls_back_to_both_locales() {
    let cms = FakeStrapi::new();
    cms.seed(
        "hero-banners",
        vec![
            json!({ "id": 1, "documentId": "h1", "locale": "en", "title": "Second", "order": 2 }),
            json!({ "id": 2, "documentId": "h2", "locale": "en", "title": "First", "order": 1 }),
            json!({ "id": 3, "documentId": "h1", "locale": "zh", "title": "第二", "order": 2 }),
        ],
    )
    .await;
    let app = router(cms.clone());

    let (_, body) = get_json(&app, "/api/home/hero?locale=zh").await;
    let banners = body["banners"].as_array().unwrap();
    assert_eq!(banners.len(), 2);
    assert_eq!(banners[0]["title_en"], "First");
    assert_eq!(banners[0]["title_zh"], "First");
    assert_eq!(banners[1]["title_zh"], "第二");

    let queries = cms.queries().await;
    assert!(queries.iter().any(|q| q.locale == Some(Locale::Zh)
        && q.populate == Populate::Fields(vec!["image".into(), "localizations".into()])));
}

#[tokio::test]
async fn universities_filter_by_country() {
    let cms = FakeStrapi::new();
    cms.seed(
        "universities",
        vec![
            json!({ "id": 1, "documentId": "u1", "locale": "en", "name": "McGill",
                    "country": { "id": 7, "name": "Canada" }, "ranking": 30 }),
            json!({ "id": 2, "documentId": "u2", "locale": "en", "name": "Oxford",
                    "country": { "id": 8, "name": "United Kingdom" }, "ranking": 3 }),
            json!({ "id": 3, "documentId": "u3", "locale": "en", "name": "Acadia",
                    "country": { "id": 7, "name": "Canada" } }),
        ],
    )
    .await;
    let app = router(cms);

    let (_, body) = get_json(&app, "/api/universities").await;
    let names: Vec<_> = body["universities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name_en"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Oxford", "McGill", "Acadia"]);

    let (_, body) = get_json(&app, "/api/universities?country=canada").await;
    assert_eq!(body["universities"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn student_stories_respect_limit() {
    let cms = FakeStrapi::new();
    let stories = (1..=4)
        .map(|i| {
            json!({
                "id": i, "documentId": format!("s{}", i), "locale": "en",
                "name": format!("Student {}", i), "story": "Great year",
                "publishedAt": format!("2024-0{}-01T00:00:00.000Z", i),
            })
        })
        .collect();
    cms.seed("student-stories", stories).await;
    let app = router(cms);

    let (_, body) = get_json(&app, "/api/student-stories?limit=2").await;
    let stories = body["stories"].as_array().unwrap();
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0]["name_en"], "Student 4");
    assert_eq!(stories[1]["name_zh"], "Student 3");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = router(FakeStrapi::new());
    let (status, body) = get_json(&app, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "no route for /api/nope");
}
