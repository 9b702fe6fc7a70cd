//! Static admin model index.
//!
//! The admin index groups models by app and orders both apps and models by
//! fixed tables. Anything missing from a table sorts last.

use serde::Serialize;

/// Rank given to apps and models absent from the order tables.
pub const UNLISTED: u32 = 999;

const APP_ORDER: &[(&str, u32)] = &[("content", 1)];

const MODEL_ORDER: &[(&str, u32)] = &[
    ("homepage", 1),
    ("menuitem", 2),
    ("product", 3),
    ("page", 4),
    ("image", 5),
    ("category", 6),
    ("tag", 7),
];

/// One administrable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminModel {
    /// URL segment under `/admin/`.
    pub object_name: &'static str,
    pub name: &'static str,
    pub admin_url: &'static str,
    pub sortable: bool,
    /// Whether list views accept `?lang=`.
    pub language_scoped: bool,
}

/// An app grouping models in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminApp {
    pub app_label: &'static str,
    pub name: &'static str,
    pub models: Vec<AdminModel>,
}

const fn model(
    object_name: &'static str,
    name: &'static str,
    admin_url: &'static str,
    sortable: bool,
    language_scoped: bool,
) -> AdminModel {
    AdminModel {
        object_name,
        name,
        admin_url,
        sortable,
        language_scoped,
    }
}

/// Registered models in registration order.
pub fn registered() -> Vec<(&'static str, AdminModel)> {
    vec![
        ("content", model("category", "Categories", "/admin/category/", true, true)),
        ("content", model("tag", "Tags", "/admin/tag/", false, false)),
        ("content", model("page", "Pages", "/admin/page/", true, true)),
        ("content", model("product", "Products", "/admin/product/", true, true)),
        ("content", model("image", "Images", "/admin/image/", false, false)),
        ("content", model("homepage", "Home pages", "/admin/homepage/", false, true)),
        ("content", model("menuitem", "Menu items", "/admin/menuitem/", true, true)),
        ("content", model("social", "Social links", "/admin/social/", true, false)),
    ]
}

/// Rank of an app in the index.
pub fn app_rank(app_label: &str) -> u32 {
    rank(APP_ORDER, app_label)
}

/// Rank of a model within its app.
pub fn model_rank(object_name: &str) -> u32 {
    rank(MODEL_ORDER, object_name)
}

fn rank(table: &[(&str, u32)], key: &str) -> u32 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(UNLISTED, |(_, rank)| *rank)
}

/// Look up a registered model by URL segment.
pub fn find(object_name: &str) -> Option<AdminModel> {
    registered()
        .into_iter()
        .map(|(_, model)| model)
        .find(|model| model.object_name == object_name)
}

/// Group `models` by app, ordering apps and models by rank, ties by name.
pub fn group(models: Vec<(&'static str, AdminModel)>) -> Vec<AdminApp> {
    let mut apps: Vec<AdminApp> = Vec::new();
    for (app_label, model) in models {
        match apps.iter_mut().find(|app| app.app_label == app_label) {
            Some(app) => app.models.push(model),
            None => apps.push(AdminApp {
                app_label,
                name: app_name(app_label),
                models: vec![model],
            }),
        }
    }

    apps.sort_by(|a, b| {
        app_rank(a.app_label)
            .cmp(&app_rank(b.app_label))
            .then_with(|| a.name.cmp(b.name))
    });
    for app in &mut apps {
        app.models.sort_by(|a, b| {
            model_rank(a.object_name)
                .cmp(&model_rank(b.object_name))
                .then_with(|| a.name.cmp(b.name))
        });
    }
    apps
}

/// The ordered admin index.
pub fn app_list() -> Vec<AdminApp> {
    group(registered())
}

fn app_name(app_label: &str) -> &'static str {
    match app_label {
        "content" => "Content",
        _ => "Other",
    }
}
