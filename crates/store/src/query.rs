//! Table names and the small query language the repositories use.
//!
//! Only what the site needs is modelled: equality filters, multi-column
//! ordering and a row limit. [`Select::query_pairs`] renders the same query
//! as `PostgREST` URL parameters.

/// The four tables the site reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Products,
    SiteContent,
    ContactInfo,
    UserRoles,
}

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::SiteContent => "site_content",
            Self::ContactInfo => "contact_info",
            Self::UserRoles => "user_roles",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `column = value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    #[must_use]
    pub fn eq(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }

    fn query_pair(&self) -> (String, String) {
        (self.column.to_string(), format!("eq.{}", self.value))
    }
}

/// Render filters as URL parameters.
#[must_use]
pub fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(Filter::query_pair).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub direction: Direction,
}

/// A filtered, ordered read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Select {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.order.push(Order { column, direction });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// `PostgREST` URL parameters for this query.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(filter_pairs(&self.filters));

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| match o.direction {
                    Direction::Asc => format!("{}.asc", o.column),
                    Direction::Desc => format!("{}.desc", o.column),
                })
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_catalog_query_pairs() {
        let query = Select::all()
            .order_by("featured", Direction::Desc)
            .order_by("created_at", Direction::Desc);

        assert_eq!(
            query.query_pairs(),
            vec![
                pair("select", "*"),
                pair("order", "featured.desc,created_at.desc")
            ]
        );
    }

    #[test]
    fn test_filtered_query_pairs() {
        let query = Select::all()
            .eq("user_id", "u-1")
            .eq("role", "admin")
            .limit(1);

        assert_eq!(
            query.query_pairs(),
            vec![
                pair("select", "*"),
                pair("user_id", "eq.u-1"),
                pair("role", "eq.admin"),
                pair("limit", "1"),
            ]
        );
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::SiteContent.name(), "site_content");
        assert_eq!(Table::UserRoles.to_string(), "user_roles");
    }
}
