use crate::application::session::SessionPrincipal;
use crate::presentation::admin::views::{AdminChrome, AdminNavigationItemView};

const BRAND_TITLE: &str = "Cinder Admin";
const NAV_ITEMS: &[(&str, &str)] = &[
    ("/admin/dashboard", "Dashboard"),
    ("/admin/videos", "Videos"),
    ("/admin/vectors", "Vectors"),
];

#[derive(Clone)]
pub struct AdminChromeService {
    site_url: String,
}

impl AdminChromeService {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: normalize_site_url(&site_url.into()),
        }
    }

    pub fn load(&self, active_path: &str, principal: &SessionPrincipal) -> AdminChrome {
        let navigation: Vec<AdminNavigationItemView> = NAV_ITEMS
            .iter()
            .map(|(href, label)| AdminNavigationItemView {
                label: (*label).to_string(),
                href: (*href).to_string(),
                is_active: *href == active_path,
            })
            .collect();

        let active_label = navigation
            .iter()
            .find(|item| item.is_active)
            .map(|item| item.label.as_str())
            .unwrap_or("Dashboard");

        AdminChrome {
            brand_title: BRAND_TITLE.to_string(),
            page_title: format!("{BRAND_TITLE} · {active_label}"),
            navigation,
            user_email: principal.email.clone(),
            site_url: self.site_url.clone(),
        }
    }
}

fn normalize_site_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::types::UserRole;

    #[test]
    fn marks_active_item_and_titles_page() {
        let principal = SessionPrincipal {
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
        };
        let chrome = AdminChromeService::new("http://localhost:3000").load("/admin/videos", &principal);

        assert_eq!(chrome.page_title, "Cinder Admin · Videos");
        assert_eq!(chrome.site_url, "http://localhost:3000/");
        let active: Vec<&str> = chrome
            .navigation
            .iter()
            .filter(|item| item.is_active)
            .map(|item| item.href.as_str())
            .collect();
        assert_eq!(active, vec!["/admin/videos"]);
    }
}
