//! Page chrome shared by every screen behind the admin gate.

use askama::Template;
use axum::response::Html;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::AdminContext;
use crate::models::Flash;

/// Sidebar entries as `(path, label)`.
pub const NAV: [(&str, &str); 4] = [
    ("/admin/dashboard", "Dashboard"),
    ("/admin/products", "Products"),
    ("/admin/about", "About Us"),
    ("/admin/contact", "Contact"),
];

/// One sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Signed-in admin as shown in the sidebar.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub display_name: String,
}

/// Sidebar, header and queued notices.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flashes: Vec<Flash>,
}

impl Chrome {
    /// Build the chrome for `current_path`, draining queued notices.
    pub async fn load(ctx: &AdminContext, session: &Session, current_path: &str) -> Self {
        Self {
            admin_user: AdminUserView {
                display_name: ctx.admin.display_name.clone(),
            },
            current_path: current_path.to_string(),
            flashes: Flash::take(session).await,
        }
    }

    /// Add a notice to this render only.
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flashes.push(flash);
        self
    }

    /// Header title for the current section.
    #[must_use]
    pub fn page_title(&self) -> &'static str {
        page_title(&self.current_path)
    }

    /// Sidebar links with the current section marked.
    #[must_use]
    pub fn nav(&self) -> Vec<NavItem> {
        NAV.iter()
            .map(|&(path, label)| NavItem {
                path,
                label,
                active: self.is_active(path),
            })
            .collect()
    }

    /// Whether a sidebar entry is the current section.
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path || self.current_path.starts_with(&format!("{path}/"))
    }
}

/// Header title for an admin path.
#[must_use]
pub fn page_title(path: &str) -> &'static str {
    NAV.iter()
        .find(|(prefix, _)| path == *prefix || path.starts_with(&format!("{prefix}/")))
        .map_or("Admin", |(_, label)| label)
}

/// Render a template to HTML.
///
/// # Errors
///
/// Returns `AppError::Template` if rendering fails.
pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("/admin/dashboard"), "Dashboard");
        assert_eq!(page_title("/admin/products/edit/42"), "Products");
        assert_eq!(page_title("/admin/about"), "About Us");
        assert_eq!(page_title("/admin/contact"), "Contact");
        assert_eq!(page_title("/admin/productsx"), "Admin");
    }

    #[test]
    fn test_is_active() {
        let chrome = Chrome {
            admin_user: AdminUserView {
                display_name: "owner@furnitureco.com".to_string(),
            },
            current_path: "/admin/products/new".to_string(),
            flashes: Vec::new(),
        };
        assert!(chrome.is_active("/admin/products"));
        assert!(!chrome.is_active("/admin/dashboard"));

        let active: Vec<_> = chrome
            .nav()
            .into_iter()
            .filter(|item| item.active)
            .map(|item| item.label)
            .collect();
        assert_eq!(active, vec!["Products"]);
    }
}
