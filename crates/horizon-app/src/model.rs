// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use time::macros::format_description;

use crate::ids::ProjectId;

pub const FILTER_ALL: &str = "All";

pub const CATEGORY_FILTERS: [&str; 6] = [
    FILTER_ALL,
    "Web Development",
    "Mobile Development",
    "UI/UX Design",
    "Backend Development",
    "DevOps",
];

pub const STATUS_FILTERS: [&str; 4] = [FILTER_ALL, "Completed", "In Progress", "Planning"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    pub category: String,
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_name: String,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProjectImage>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_time: String,
}

/// Absent and `null` both decode to the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub url: String,
    pub filename: String,
}

impl Project {
    pub fn project_link(&self) -> Option<&str> {
        non_blank(self.project_url.as_deref())
    }

    pub fn github_link(&self) -> Option<&str> {
        non_blank(self.github_url.as_deref())
    }

    /// Start month for cards; projects without a start date are still to be scheduled.
    pub fn started_label(&self) -> String {
        self.start_date
            .as_deref()
            .and_then(format_month_year)
            .unwrap_or_else(|| "TBD".to_owned())
    }

    pub fn completed_label(&self) -> Option<String> {
        self.end_date.as_deref().and_then(format_month_year)
    }

    /// Up to `limit` technologies plus the count of the ones left out.
    pub fn technology_preview(&self, limit: usize) -> (&[String], usize) {
        let shown = self.technologies.len().min(limit);
        (
            &self.technologies[..shown],
            self.technologies.len() - shown,
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Done,
    Active,
    Pending,
}

pub fn status_tone(status: &str) -> StatusTone {
    match status {
        "Completed" => StatusTone::Done,
        "In Progress" => StatusTone::Active,
        _ => StatusTone::Pending,
    }
}

/// Renders the date part of an ISO-8601 string as `Jan 2024`.
pub fn format_month_year(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10)?;
    let date = Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()?;
    date.format(format_description!("[month repr:short] [year]"))
        .ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
}

impl ContactMethod {
    pub const ALL: [Self; 2] = [Self::Email, Self::Phone];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Email => Self::Phone,
            Self::Phone => Self::Email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOffering {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub features: [&'static str; 4],
}

pub static SERVICE_CATALOG: [ServiceOffering; 6] = [
    ServiceOffering {
        id: "web-development",
        title: "Web Development",
        description: "Custom web applications with modern frameworks",
        price: "From $2,500",
        features: [
            "Responsive Design",
            "SEO Optimized",
            "Fast Loading",
            "Modern UI/UX",
        ],
    },
    ServiceOffering {
        id: "mobile-development",
        title: "Mobile Development",
        description: "Native and cross-platform mobile apps",
        price: "From $3,500",
        features: [
            "iOS & Android",
            "Cross-platform",
            "Native Performance",
            "App Store Ready",
        ],
    },
    ServiceOffering {
        id: "backend-apis",
        title: "Backend & APIs",
        description: "Robust backend systems and APIs",
        price: "From $2,000",
        features: [
            "Scalable Architecture",
            "Secure APIs",
            "Database Design",
            "Cloud Integration",
        ],
    },
    ServiceOffering {
        id: "cloud-devops",
        title: "Cloud & DevOps",
        description: "Cloud infrastructure and CI/CD pipelines",
        price: "From $1,800",
        features: [
            "AWS/Azure Setup",
            "CI/CD Pipelines",
            "Monitoring",
            "Cost Optimization",
        ],
    },
    ServiceOffering {
        id: "qa-testing",
        title: "QA & Testing",
        description: "Comprehensive testing strategies",
        price: "From $1,200",
        features: [
            "Automated Testing",
            "Manual QA",
            "Performance Testing",
            "Security Testing",
        ],
    },
    ServiceOffering {
        id: "ui-ux-design",
        title: "UI/UX Design",
        description: "User-centered design solutions",
        price: "From $1,500",
        features: [
            "User Research",
            "Wireframing",
            "Visual Design",
            "Prototyping",
        ],
    },
];

pub fn find_service(id: &str) -> Option<&'static ServiceOffering> {
    SERVICE_CATALOG.iter().find(|service| service.id == id)
}

pub const BUDGET_RANGES: [&str; 5] = [
    "Under $5,000",
    "$5,000 - $15,000",
    "$15,000 - $50,000",
    "$50,000+",
    "To be discussed",
];

pub const TIMELINE_OPTIONS: [&str; 5] = ["ASAP", "1-2 months", "3-6 months", "6+ months", "Flexible"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Inquiry,
}

impl Screen {
    pub const ALL: [Self; 2] = [Self::Catalog, Self::Inquiry];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Inquiry => "inquiry",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Catalog => "Projects",
            Self::Inquiry => "Get Started",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "catalog" => Some(Self::Catalog),
            "inquiry" => Some(Self::Inquiry),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CATEGORY_FILTERS, ContactMethod, FILTER_ALL, Project, STATUS_FILTERS, SERVICE_CATALOG,
        Screen, StatusTone, find_service, format_month_year, status_tone,
    };
    use crate::ProjectId;

    fn minimal_project() -> Project {
        Project {
            id: ProjectId::new("p1"),
            title: "Storefront".to_owned(),
            description: String::new(),
            short_description: String::new(),
            technologies: vec![
                "React".to_owned(),
                "Rust".to_owned(),
                "Postgres".to_owned(),
                "Redis".to_owned(),
                "Nginx".to_owned(),
            ],
            category: "Web Development".to_owned(),
            status: "Completed".to_owned(),
            client_name: String::new(),
            project_url: Some("   ".to_owned()),
            github_url: Some("https://github.com/acme/storefront".to_owned()),
            image_url: String::new(),
            images: Vec::new(),
            start_date: Some("2024-01-15".to_owned()),
            end_date: None,
            featured: false,
            tags: Vec::new(),
            created_time: String::new(),
        }
    }

    #[test]
    fn filter_option_sets_start_with_all() {
        assert_eq!(CATEGORY_FILTERS[0], FILTER_ALL);
        assert_eq!(STATUS_FILTERS[0], FILTER_ALL);
        assert_eq!(CATEGORY_FILTERS.len(), 6);
        assert_eq!(STATUS_FILTERS.len(), 4);
    }

    #[test]
    fn project_decodes_camel_case_and_defaults_optional_fields() -> serde_json::Result<()> {
        let project: Project = serde_json::from_str(
            r#"{"id":"p1","title":"Site","category":"Web Development","status":"Completed","shortDescription":"short","clientName":"Acme","imageUrl":"https://img","images":[{"url":"u","filename":"f.png"}],"startDate":"2024-02-01"}"#,
        )?;
        assert_eq!(project.id, ProjectId::new("p1"));
        assert_eq!(project.short_description, "short");
        assert_eq!(project.client_name, "Acme");
        assert_eq!(project.images.len(), 1);
        assert_eq!(project.images[0].filename, "f.png");
        assert!(project.technologies.is_empty());
        assert!(!project.featured);
        assert_eq!(project.end_date, None);
        Ok(())
    }

    #[test]
    fn project_treats_null_optional_fields_as_defaults() -> serde_json::Result<()> {
        let project: Project = serde_json::from_str(
            r#"{"id":"p1","title":"Site","category":"DevOps","status":"Planning","description":null,"shortDescription":null,"technologies":null,"clientName":null,"projectUrl":null,"imageUrl":null,"images":null,"startDate":null,"featured":null,"tags":null,"createdTime":null}"#,
        )?;
        assert_eq!(project.client_name, "");
        assert!(project.technologies.is_empty());
        assert!(project.images.is_empty());
        assert!(!project.featured);
        assert_eq!(project.project_url, None);
        assert_eq!(project.started_label(), "TBD");
        Ok(())
    }

    #[test]
    fn project_without_identity_fields_is_rejected() {
        let decoded = serde_json::from_str::<Project>(r#"{"title":"No id","category":"x","status":"y"}"#);
        assert!(decoded.is_err());
    }

    #[test]
    fn month_year_formatting_handles_dates_and_timestamps() {
        assert_eq!(format_month_year("2024-01-15"), Some("Jan 2024".to_owned()));
        assert_eq!(
            format_month_year("2023-11-02T08:30:00.000Z"),
            Some("Nov 2023".to_owned())
        );
        assert_eq!(format_month_year(""), None);
        assert_eq!(format_month_year("soon"), None);
    }

    #[test]
    fn card_labels_fall_back_for_missing_dates_and_blank_links() {
        let mut project = minimal_project();
        assert_eq!(project.started_label(), "Jan 2024");
        assert_eq!(project.completed_label(), None);
        assert_eq!(project.project_link(), None);
        assert_eq!(
            project.github_link(),
            Some("https://github.com/acme/storefront")
        );

        project.start_date = None;
        assert_eq!(project.started_label(), "TBD");
    }

    #[test]
    fn technology_preview_reports_overflow_in_display_order() {
        let project = minimal_project();
        let (shown, more) = project.technology_preview(3);
        assert_eq!(shown, ["React", "Rust", "Postgres"]);
        assert_eq!(more, 2);

        let (all, none) = project.technology_preview(10);
        assert_eq!(all.len(), 5);
        assert_eq!(none, 0);
    }

    #[test]
    fn status_tone_maps_known_statuses() {
        assert_eq!(status_tone("Completed"), StatusTone::Done);
        assert_eq!(status_tone("In Progress"), StatusTone::Active);
        assert_eq!(status_tone("Planning"), StatusTone::Pending);
        assert_eq!(status_tone("Archived"), StatusTone::Pending);
    }

    #[test]
    fn service_catalog_lookup_by_id() {
        assert_eq!(SERVICE_CATALOG.len(), 6);
        let service = find_service("backend-apis").expect("known service");
        assert_eq!(service.title, "Backend & APIs");
        assert!(find_service("Backend & APIs").is_none());
    }

    #[test]
    fn contact_method_serializes_as_its_label() -> serde_json::Result<()> {
        for method in ContactMethod::ALL {
            assert_eq!(serde_json::to_value(method)?, method.as_str());
        }
        assert_eq!(ContactMethod::default(), ContactMethod::Email);
        assert_eq!(ContactMethod::Email.toggled(), ContactMethod::Phone);
        Ok(())
    }

    #[test]
    fn screen_parse_accepts_config_values() {
        assert_eq!(Screen::parse("catalog"), Some(Screen::Catalog));
        assert_eq!(Screen::parse("inquiry"), Some(Screen::Inquiry));
        assert_eq!(Screen::parse("home"), None);
    }
}
