//! Public JSON representations of catalog content.
//!
//! Nested relations are loaded per result set: one query per link table and
//! one per target table, whatever the number of rows.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::content::relations::{self, LinkTable};
use crate::models::{Category, HomePage, Image, Page, Product, Social, Tag};

/// Builds public URLs for stored image files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrls {
    base: String,
}

impl MediaUrls {
    /// `base` must end with `/`; configuration guarantees it.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn url(&self, file: &str) -> String {
        format!("{}{}", self.base, file.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRepr {
    pub id: i64,
    pub image: String,
    pub alt_text: String,
}

impl ImageRepr {
    pub fn new(image: &Image, media: &MediaUrls) -> Self {
        Self {
            id: image.id,
            image: media.url(&image.file),
            alt_text: image.alt_text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRepr {
    pub title: String,
    pub lang: String,
    pub slug: String,
    pub langslug: String,
    pub categoryinfo: String,
    pub content: String,
    /// Cover image URL.
    pub image: Option<String>,
}

impl CategoryRepr {
    fn new(category: &Category, images: &HashMap<i64, Image>, media: &MediaUrls) -> Self {
        Self {
            title: category.title.clone(),
            lang: category.lang.clone(),
            slug: category.slug.clone(),
            langslug: category.langslug.clone(),
            categoryinfo: category.categoryinfo.clone(),
            content: category.content.clone(),
            image: cover_url(category.image_id, images, media),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRepr {
    pub title: String,
    pub slug: String,
}

impl From<&Tag> for TagRepr {
    fn from(tag: &Tag) -> Self {
        Self {
            title: tag.title.clone(),
            slug: tag.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageRepr {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub langslug: String,
    pub pageinfo: String,
    pub content: String,
    pub image: Option<String>,
    pub images: Vec<ImageRepr>,
    pub categories: Vec<CategoryRepr>,
    pub tags: Vec<TagRepr>,
    pub lang: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRepr {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub langslug: String,
    pub pageinfo: String,
    pub content: String,
    pub shoplink: String,
    pub image: Option<String>,
    pub images: Vec<ImageRepr>,
    pub categories: Vec<CategoryRepr>,
    pub tags: Vec<TagRepr>,
    pub date_posted: DateTime<Utc>,
    pub lang: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePageRepr {
    pub id: i64,
    pub images: Vec<ImageRepr>,
    pub title: String,
    pub pageinfo: String,
    pub content: String,
    pub lang: String,
    pub products: Vec<ProductRepr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialRepr {
    pub id: i64,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub threads: String,
    pub youtube: String,
    pub order: i32,
}

impl From<Social> for SocialRepr {
    fn from(social: Social) -> Self {
        Self {
            id: social.id,
            facebook: social.facebook,
            twitter: social.twitter,
            instagram: social.instagram,
            threads: social.threads,
            youtube: social.youtube,
            order: social.sort_order,
        }
    }
}

fn cover_url(image_id: Option<i64>, images: &HashMap<i64, Image>, media: &MediaUrls) -> Option<String> {
    image_id
        .and_then(|id| images.get(&id))
        .map(|image| media.url(&image.file))
}

/// Gallery, category and tag relations of a set of owners, with every
/// referenced image preloaded (gallery, owner covers and category covers).
struct Related {
    image_links: HashMap<i64, Vec<i64>>,
    category_links: HashMap<i64, Vec<i64>>,
    tag_links: HashMap<i64, Vec<i64>>,
    images: HashMap<i64, Image>,
    categories: HashMap<i64, Category>,
    tags: HashMap<i64, Tag>,
}

impl Related {
    async fn load(
        pool: &PgPool,
        owner_ids: &[i64],
        cover_ids: impl Iterator<Item = i64>,
        links: [LinkTable; 3],
    ) -> Result<Self> {
        let [image_link, category_link, tag_link] = links;
        let (image_links, category_links, tag_links) = tokio::try_join!(
            image_link.targets_by_owner(pool, owner_ids),
            category_link.targets_by_owner(pool, owner_ids),
            tag_link.targets_by_owner(pool, owner_ids),
        )?;

        let category_ids = relations::distinct_targets(&category_links);
        let tag_ids = relations::distinct_targets(&tag_links);
        let (categories, tags) = tokio::try_join!(
            Category::find_by_ids(pool, &category_ids),
            Tag::find_by_ids(pool, &tag_ids),
        )?;

        let mut image_ids = relations::distinct_targets(&image_links);
        image_ids.extend(cover_ids);
        image_ids.extend(categories.values().filter_map(|c| c.image_id));
        image_ids.sort_unstable();
        image_ids.dedup();
        let images = Image::find_by_ids(pool, &image_ids).await?;

        Ok(Self {
            image_links,
            category_links,
            tag_links,
            images,
            categories,
            tags,
        })
    }

    fn gallery(&self, owner: i64, media: &MediaUrls) -> Vec<ImageRepr> {
        relations::attach(self.image_links.get(&owner), &self.images)
            .iter()
            .map(|image| ImageRepr::new(image, media))
            .collect()
    }

    fn categories(&self, owner: i64, media: &MediaUrls) -> Vec<CategoryRepr> {
        relations::attach(self.category_links.get(&owner), &self.categories)
            .iter()
            .map(|category| CategoryRepr::new(category, &self.images, media))
            .collect()
    }

    fn tags(&self, owner: i64) -> Vec<TagRepr> {
        relations::attach(self.tag_links.get(&owner), &self.tags)
            .iter()
            .map(TagRepr::from)
            .collect()
    }

    fn cover(&self, image_id: Option<i64>, media: &MediaUrls) -> Option<String> {
        cover_url(image_id, &self.images, media)
    }
}

/// Represent images.
pub fn images(images: &[Image], media: &MediaUrls) -> Vec<ImageRepr> {
    images.iter().map(|image| ImageRepr::new(image, media)).collect()
}

/// Represent categories with their cover image URLs.
pub async fn categories(
    pool: &PgPool,
    media: &MediaUrls,
    categories: &[Category],
) -> Result<Vec<CategoryRepr>> {
    let mut cover_ids: Vec<i64> = categories.iter().filter_map(|c| c.image_id).collect();
    cover_ids.sort_unstable();
    cover_ids.dedup();
    let images = Image::find_by_ids(pool, &cover_ids).await?;

    Ok(categories
        .iter()
        .map(|category| CategoryRepr::new(category, &images, media))
        .collect())
}

/// Represent pages with nested relations.
pub async fn pages(pool: &PgPool, media: &MediaUrls, pages: Vec<Page>) -> Result<Vec<PageRepr>> {
    let ids: Vec<i64> = pages.iter().map(|p| p.id).collect();
    let related = Related::load(
        pool,
        &ids,
        pages.iter().filter_map(|p| p.image_id),
        [LinkTable::PageImage, LinkTable::PageCategory, LinkTable::PageTag],
    )
    .await?;

    Ok(pages
        .into_iter()
        .map(|page| PageRepr {
            image: related.cover(page.image_id, media),
            images: related.gallery(page.id, media),
            categories: related.categories(page.id, media),
            tags: related.tags(page.id),
            id: page.id,
            title: page.title,
            slug: page.slug,
            langslug: page.langslug,
            pageinfo: page.pageinfo,
            content: page.content,
            lang: page.lang,
            order: page.sort_order,
        })
        .collect())
}

/// Represent products with nested relations.
pub async fn products(
    pool: &PgPool,
    media: &MediaUrls,
    products: Vec<Product>,
) -> Result<Vec<ProductRepr>> {
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let related = Related::load(
        pool,
        &ids,
        products.iter().filter_map(|p| p.image_id),
        [
            LinkTable::ProductImage,
            LinkTable::ProductCategory,
            LinkTable::ProductTag,
        ],
    )
    .await?;

    Ok(products
        .into_iter()
        .map(|product| ProductRepr {
            image: related.cover(product.image_id, media),
            images: related.gallery(product.id, media),
            categories: related.categories(product.id, media),
            tags: related.tags(product.id),
            id: product.id,
            title: product.title,
            slug: product.slug,
            langslug: product.langslug,
            pageinfo: product.pageinfo,
            content: product.content,
            shoplink: product.shoplink,
            date_posted: product.date_posted,
            lang: product.lang,
            order: product.sort_order,
        })
        .collect())
}

/// Represent home pages with their galleries and featured products.
///
/// Featured products keep the catalog's display order.
pub async fn home_pages(
    pool: &PgPool,
    media: &MediaUrls,
    homes: Vec<HomePage>,
) -> Result<Vec<HomePageRepr>> {
    let ids: Vec<i64> = homes.iter().map(|h| h.id).collect();
    let (image_links, product_links) = tokio::try_join!(
        LinkTable::HomePageImage.targets_by_owner(pool, &ids),
        LinkTable::HomePageProduct.targets_by_owner(pool, &ids),
    )?;

    let image_ids = relations::distinct_targets(&image_links);
    let product_ids = relations::distinct_targets(&product_links);
    let (images, loaded) = tokio::try_join!(
        Image::find_by_ids(pool, &image_ids),
        Product::find_by_ids(pool, &product_ids),
    )?;

    let mut featured: Vec<Product> = loaded.into_values().collect();
    featured.sort_by_key(|p| (p.sort_order, p.id));
    let featured: HashMap<i64, ProductRepr> = products(pool, media, featured)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(homes
        .into_iter()
        .map(|home| {
            let mut products = relations::attach(product_links.get(&home.id), &featured);
            products.sort_by_key(|p| (p.order, p.id));
            HomePageRepr {
                id: home.id,
                images: relations::attach(image_links.get(&home.id), &images)
                    .iter()
                    .map(|image| ImageRepr::new(image, media))
                    .collect(),
                title: home.title,
                pageinfo: home.pageinfo,
                content: home.content,
                lang: home.lang,
                products,
            }
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn media() -> MediaUrls {
        MediaUrls::new("/media/")
    }

    #[test]
    fn media_url_joins_without_double_slash() {
        assert_eq!(media().url("images/a.jpg"), "/media/images/a.jpg");
        assert_eq!(media().url("/images/a.jpg"), "/media/images/a.jpg");
        assert_eq!(
            MediaUrls::new("https://cdn.example.com/m/").url("x.png"),
            "https://cdn.example.com/m/x.png"
        );
    }

    #[test]
    fn category_cover_is_flattened_url() {
        let category = Category {
            id: 1,
            title: "Shoes".to_string(),
            slug: "shoes".to_string(),
            langslug: "en-shoes".to_string(),
            categoryinfo: String::new(),
            content: String::new(),
            image_id: Some(9),
            lang: "en".to_string(),
            sort_order: 0,
        };
        let mut images = HashMap::new();
        images.insert(
            9,
            Image {
                id: 9,
                file: "covers/shoes.jpg".to_string(),
                alt_text: "Shoes".to_string(),
            },
        );

        let repr = CategoryRepr::new(&category, &images, &media());
        assert_eq!(repr.image.as_deref(), Some("/media/covers/shoes.jpg"));

        let json = serde_json::to_value(&repr).unwrap();
        assert_eq!(json["langslug"], "en-shoes");
        assert!(json.get("id").is_none());

        let dangling = CategoryRepr::new(&category, &HashMap::new(), &media());
        assert_eq!(dangling.image, None);
    }

    #[test]
    fn social_repr_renames_order() {
        let social = Social {
            id: 1,
            facebook: "https://facebook.com/v".to_string(),
            twitter: String::new(),
            instagram: String::new(),
            threads: String::new(),
            youtube: String::new(),
            sort_order: 3,
        };
        let json = serde_json::to_value(SocialRepr::from(social)).unwrap();
        assert_eq!(json["order"], 3);
        assert_eq!(json["id"], 1);
        assert!(json.get("sort_order").is_none());
    }
}
