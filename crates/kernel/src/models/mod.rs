//! Database models.

pub mod category;
pub mod home_page;
pub mod image;
pub mod language;
pub mod menu_item;
pub mod page;
pub mod product;
pub mod social;

pub use category::{Category, CategoryForm, Tag, TagForm};
pub use home_page::{HomePage, HomePageForm};
pub use image::{Image, ImageForm};
pub use language::{Language, Languages};
pub use menu_item::{MenuItem, MenuItemForm};
pub use page::{Page, PageForm};
pub use product::{Product, ProductForm};
pub use social::{SOCIAL_ID, SingletonViolation, Social, SocialForm};
