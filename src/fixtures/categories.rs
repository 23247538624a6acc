//! Category Fixtures

use serde::Deserialize;

use crate::products::Category;

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Icon glyph
    #[serde(default)]
    pub icon: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Representative image path
    #[serde(default)]
    pub image: String,
}

impl From<CategoryFixture> for Category {
    fn from(fixture: CategoryFixture) -> Self {
        Category {
            id: fixture.id,
            name: fixture.name,
            icon: fixture.icon,
            description: fixture.description,
            image: fixture.image,
        }
    }
}
