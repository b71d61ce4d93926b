use chrono::{DateTime, Duration, SubsecRound, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::filter::{CategoryFilter, CategoryInclude, ProductFilter, ProductInclude};
use crate::repository::Record;

/// Current time at the precision PostgreSQL stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next `updated_at` after `previous`, strictly later even within one microsecond.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only when loaded with [`ProductInclude::Category`]
    pub category: Option<Category>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        description: impl Into<String>,
        category_id: Uuid,
    ) -> Self {
        let now = now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            price,
            description: description.into(),
            category_id,
            created_at: now,
            updated_at: now,
            category: None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    /// Name of the loaded category, or `""`.
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("", |c| c.name.as_str())
    }
}

impl Record for Category {
    const NAME: &'static str = "Category";
    type Filter = CategoryFilter;
    type Include = CategoryInclude;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &CategoryFilter) -> bool {
        match filter {
            CategoryFilter::NameEquals(name) => self.name == *name,
            CategoryFilter::NameEqualsExcept { name, id } => self.name == *name && self.id != *id,
            CategoryFilter::Search(term) => {
                self.name.contains(term.as_str()) || self.description.contains(term.as_str())
            }
        }
    }
}

impl Record for Product {
    const NAME: &'static str = "Product";
    type Filter = ProductFilter;
    type Include = ProductInclude;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        match filter {
            ProductFilter::InCategory(category_id) => self.category_id == *category_id,
            ProductFilter::PriceBetween { min, max } => self.price >= *min && self.price <= *max,
            ProductFilter::Search(term) => {
                self.name.contains(term.as_str()) || self.description.contains(term.as_str())
            }
        }
    }
}
