#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Storage-backed tests against a real PostgreSQL database.
//!
//! Each test creates its own rows with unique titles so tests can run in
//! parallel against one database.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use vitrine_kernel::content::slugify;
use vitrine_test_utils::{assert, test_content, test_menu_item, test_social};

use common::{body_json, run_test, shared_app, unique};

fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("id in response")
}

fn slug_of(body: &Value) -> String {
    body["slug"].as_str().expect("slug in response").to_string()
}

// =============================================================================
// Slugs
// =============================================================================

#[test]
fn missing_slug_is_derived_and_kept_on_resave() {
    run_test(async {
        let app = shared_app().await;
        let title = unique("About Us");

        let response = app
            .admin(
                Method::POST,
                "/admin/page/",
                Some(test_content(&title).in_lang("en").to_json()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let slug = slug_of(&created);
        assert_eq!(slug, slugify(&title));

        let renamed = format!("{title} renamed");
        let response = app
            .admin(
                Method::PUT,
                &format!("/admin/page/{}/", id_of(&created)),
                Some(test_content(&renamed).with_slug(&slug).in_lang("en").to_json()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(slug_of(&updated), slug);
        assert_eq!(updated["title"], renamed.as_str());
    });
}

#[test]
fn duplicate_derived_slug_fails_at_commit() {
    run_test(async {
        let app = shared_app().await;
        let body = test_content(&unique("About Us")).in_lang("en").to_json();

        let first = app.admin(Method::POST, "/admin/page/", Some(body.clone())).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app.admin(Method::POST, "/admin/page/", Some(body)).await;
        assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(second).await;
        assert::detail_eq(&body, "internal server error");
    });
}

#[test]
fn over_long_title_is_rejected_before_storage() {
    run_test(async {
        let app = shared_app().await;

        let response = app
            .admin(
                Method::POST,
                "/admin/page/",
                Some(test_content(&"t".repeat(300)).to_json()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert::detail_eq(&body, "title: ensure this value has at most 255 characters");
    });
}

#[test]
fn rich_text_is_sanitized_on_save() {
    run_test(async {
        let app = shared_app().await;

        let body = test_content(&unique("Story"))
            .with_content("<p>Hello</p><script>alert(1)</script>")
            .to_json();
        let response = app.admin(Method::POST, "/admin/page/", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = body_json(response).await;
        let content = created["content"].as_str().unwrap();
        assert::contains(content, "<p>Hello</p>");
        assert!(!content.contains("<script>"), "{content}");
    });
}

// =============================================================================
// Menu
// =============================================================================

#[test]
fn bound_page_link_overrides_manual_link_and_follows_page() {
    run_test(async {
        let app = shared_app().await;

        let page = body_json(
            app.admin(
                Method::POST,
                "/admin/page/",
                Some(test_content(&unique("About Us")).in_lang("en").to_json()),
            )
            .await,
        )
        .await;
        let page_id = id_of(&page);
        let slug = slug_of(&page);

        let response = app
            .admin(
                Method::POST,
                "/admin/menuitem/",
                Some(
                    test_menu_item("About")
                        .with_link("/somewhere-else/")
                        .for_page(page_id)
                        .in_new_tab()
                        .in_lang("en")
                        .to_json(),
                ),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let item = body_json(response).await;
        assert_eq!(item["link"], format!("/en/page/{slug}/"));
        assert_eq!(item["newtab"], true);

        // Moving the page to another language rewrites the bound link.
        let response = app
            .admin(
                Method::PUT,
                &format!("/admin/page/{page_id}/"),
                Some(
                    test_content(page["title"].as_str().unwrap())
                        .with_slug(&slug)
                        .in_lang("tr")
                        .to_json(),
                ),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .admin(Method::GET, &format!("/admin/menuitem/{}/", id_of(&item)), None)
            .await;
        let item = body_json(response).await;
        assert_eq!(item["link"], format!("/tr/page/{slug}/"));
    });
}

#[test]
fn menu_api_nests_children_under_top_level_items() {
    run_test(async {
        let app = shared_app().await;

        let create = |body: Value| async move {
            let response = app.admin(Method::POST, "/admin/menuitem/", Some(body)).await;
            assert_eq!(response.status(), StatusCode::CREATED);
            id_of(&body_json(response).await)
        };
        let root = create(test_menu_item(&unique("Root")).in_lang("en").to_json()).await;
        let child = create(
            test_menu_item(&unique("Child"))
                .under(root)
                .in_lang("en")
                .to_json(),
        )
        .await;
        let sibling = create(test_menu_item(&unique("Sibling")).in_lang("en").to_json()).await;

        let response = app.get("/api/en/menuitems/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let tree = body_json(response).await;
        let top = tree.as_array().unwrap();

        let find = |id: i64| top.iter().find(|node| node["id"] == id);
        assert!(find(child).is_none(), "child listed at top level");

        let root_node = find(root).expect("root at top level");
        let children = root_node["children"].as_array().expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["id"], child);
        assert_eq!(children[0]["children"], Value::Null);

        let sibling_node = find(sibling).expect("sibling at top level");
        assert_eq!(sibling_node["children"], Value::Null);
    });
}

// =============================================================================
// Social singleton
// =============================================================================

#[test]
fn social_singleton_survives_create_and_delete() {
    run_test(async {
        let app = shared_app().await;
        let link = format!("https://facebook.com/{}", slugify(&unique("vitrine")));

        let response = app
            .admin(
                Method::PUT,
                "/admin/social/1/",
                Some(test_social().with_link("facebook", &link).to_json()),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .admin(Method::POST, "/admin/social/", Some(test_social().to_json()))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert::detail_eq(&body, "There can be only one Social instance");

        let response = app.admin(Method::DELETE, "/admin/social/1/", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let listed = body_json(app.admin(Method::GET, "/admin/social/", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let social = body_json(app.get("/api/social/").await).await;
        assert_eq!(social["id"], 1);
        assert_eq!(social["facebook"], link.as_str());
    });
}

// =============================================================================
// Listing filters
// =============================================================================

#[test]
fn category_and_tag_filters_compose() {
    run_test(async {
        let app = shared_app().await;

        let category = body_json(
            app.admin(
                Method::POST,
                "/admin/category/",
                Some(json!({ "title": unique("Shoes"), "lang": "en" })),
            )
            .await,
        )
        .await;
        let tag = body_json(
            app.admin(
                Method::POST,
                "/admin/tag/",
                Some(json!({ "title": unique("Summer") })),
            )
            .await,
        )
        .await;
        let image = body_json(
            app.admin(
                Method::POST,
                "/admin/image/",
                Some(json!({ "file": "products/runner.jpg", "alt_text": "Runner" })),
            )
            .await,
        )
        .await;

        let tagged = body_json(
            app.admin(
                Method::POST,
                "/admin/product/",
                Some(
                    test_content(&unique("Runner"))
                        .in_lang("en")
                        .with_cover(id_of(&image))
                        .in_categories(&[id_of(&category)])
                        .with_tags(&[id_of(&tag)])
                        .with_shoplink("https://shop.example.com/runner")
                        .to_json(),
                ),
            )
            .await,
        )
        .await;
        let untagged = body_json(
            app.admin(
                Method::POST,
                "/admin/product/",
                Some(
                    test_content(&unique("Walker"))
                        .in_lang("en")
                        .in_categories(&[id_of(&category)])
                        .to_json(),
                ),
            )
            .await,
        )
        .await;

        let category_slug = slug_of(&category);
        let tag_slug = slug_of(&tag);

        let both = body_json(
            app.get(&format!(
                "/api/en/products/?category={category_slug}&tag={tag_slug}"
            ))
            .await,
        )
        .await;
        let both = both.as_array().unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0]["id"], id_of(&tagged));
        assert_eq!(both[0]["image"], "/media/products/runner.jpg");
        assert_eq!(both[0]["tags"][0]["slug"], tag_slug.as_str());
        assert_eq!(both[0]["categories"][0]["slug"], category_slug.as_str());

        let in_category = body_json(
            app.get(&format!("/api/en/category/{category_slug}/products/"))
                .await,
        )
        .await;
        let ids: Vec<i64> = in_category
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["id"].as_i64())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&id_of(&untagged)));

        // Same category, wrong language.
        let response = app
            .get(&format!("/api/tr/products/?category={category_slug}"))
            .await;
        assert_eq!(body_json(response).await, json!([]));
    });
}

#[test]
fn missing_slugs_are_not_found() {
    run_test(async {
        let app = shared_app().await;
        let missing = slugify(&unique("missing"));

        for uri in [
            format!("/api/en/page/{missing}/"),
            format!("/api/en/product/{missing}/"),
            format!("/api/en/category/{missing}/"),
            format!("/api/en/category/{missing}/products/"),
            format!("/api/en/tags/{missing}/"),
        ] {
            let response = app.get(&uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            let body = body_json(response).await;
            assert::detail_eq(&body, "Not found.");
        }
    });
}

#[test]
fn home_pages_load_with_featured_products() {
    run_test(async {
        let app = shared_app().await;

        let response = app.get("/api/homepage/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let homes = body_json(response).await;
        for home in homes.as_array().unwrap() {
            assert::has_key(home, "products");
            assert::has_key(home, "images");
        }
    });
}
