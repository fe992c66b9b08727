// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use horizon_app::{
    CATEGORY_FILTERS, InquiryField, InquiryPipeline, Notification, NotificationSink,
    Project, ProjectId, ProjectImage, STATUS_FILTERS,
};
use serde_json::json;
use time::macros::format_description;
use time::{Date, Duration, Month};

const TITLE_PREFIXES: [&str; 12] = [
    "Aurora", "Beacon", "Cobalt", "Drift", "Ember", "Fable", "Granite", "Harbor", "Iris",
    "Juniper", "Kestrel", "Lumen",
];

const TITLE_SUFFIXES: [&str; 8] = [
    "Portal",
    "Dashboard",
    "Marketplace",
    "Companion App",
    "Platform",
    "Pipeline",
    "Studio",
    "Gateway",
];

const CLIENTS: [&str; 10] = [
    "Northwind Traders",
    "Contoso Health",
    "Fabrikam Logistics",
    "Tailspin Toys",
    "Wide World Importers",
    "Adventure Works",
    "Litware Labs",
    "Proseware",
    "Woodgrove Bank",
    "Lucerne Publishing",
];

const TECHNOLOGIES: [&str; 16] = [
    "React",
    "TypeScript",
    "Rust",
    "Node.js",
    "PostgreSQL",
    "Redis",
    "Docker",
    "Kubernetes",
    "Flutter",
    "Swift",
    "Kotlin",
    "Figma",
    "Terraform",
    "AWS",
    "GraphQL",
    "Tailwind CSS",
];

const TAGS: [&str; 8] = [
    "ecommerce",
    "fintech",
    "healthcare",
    "realtime",
    "analytics",
    "open-source",
    "accessibility",
    "ai",
];

const WORDS: [&str; 24] = [
    "secure", "scalable", "platform", "customers", "workflow", "mobile", "insights", "payments",
    "automated", "teams", "launch", "modern", "booking", "catalog", "reporting", "cloud",
    "migration", "design", "system", "orders", "tracking", "members", "content", "search",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic source of catalog fixtures.
#[derive(Debug, Clone)]
pub struct PortfolioFaker {
    rng: DeterministicRng,
    next_id: u64,
}

impl PortfolioFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn project(&mut self) -> Project {
        let category = self.pick(&CATEGORY_FILTERS[1..]).to_owned();
        let status = self.pick(&STATUS_FILTERS[1..]).to_owned();
        self.project_with(&category, &status)
    }

    pub fn project_with(&mut self, category: &str, status: &str) -> Project {
        self.next_id += 1;
        let id = format!("rec{:04}", self.next_id);
        let title = format!(
            "{} {}",
            self.pick(&TITLE_PREFIXES),
            self.pick(&TITLE_SUFFIXES)
        );
        let slug = title.to_ascii_lowercase().replace(' ', "-");

        let technologies = self.distinct(&TECHNOLOGIES, 1, 6);
        let tags = self.distinct(&TAGS, 0, 3);

        let started = status != "Planning" || self.rng.bool();
        let start = self.date_in_range(2021, 2025);
        let start_date = started.then(|| format_date(start));
        let end_date = (started && status == "Completed")
            .then(|| format_date(start + Duration::days(30 + self.rng.int_n(300) as i64)));

        let image_url = format!("https://cdn.example.com/projects/{slug}.png");
        let images = (0..self.rng.int_n(3))
            .map(|index| ProjectImage {
                url: format!("https://cdn.example.com/projects/{slug}-{index}.png"),
                filename: format!("{slug}-{index}.png"),
            })
            .collect();

        Project {
            id: ProjectId::new(id),
            title,
            description: self.sentence(14, 30),
            short_description: self.sentence(6, 12),
            technologies,
            category: category.to_owned(),
            status: status.to_owned(),
            client_name: self.pick(&CLIENTS).to_owned(),
            project_url: self
                .rng
                .bool()
                .then(|| format!("https://{slug}.example.com")),
            github_url: self
                .rng
                .bool()
                .then(|| format!("https://github.com/example/{slug}")),
            image_url,
            images,
            start_date,
            end_date,
            featured: self.rng.int_n(4) == 0,
            tags,
            created_time: format!("{}T09:00:00.000Z", format_date(start)),
        }
    }

    pub fn collection(&mut self, len: usize) -> Vec<Project> {
        (0..len).map(|_| self.project()).collect()
    }

    /// Any filter value a user can pick, including `All`.
    pub fn category_filter(&mut self) -> &'static str {
        self.pick(&CATEGORY_FILTERS)
    }

    pub fn status_filter(&mut self) -> &'static str {
        self.pick(&STATUS_FILTERS)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn distinct(&mut self, items: &[&str], min: usize, max: usize) -> Vec<String> {
        let count = min + self.rng.int_n(max - min + 1);
        let mut chosen: Vec<String> = Vec::with_capacity(count);
        while chosen.len() < count.min(items.len()) {
            let candidate = items[self.rng.int_n(items.len())];
            if !chosen.iter().any(|item| item == candidate) {
                chosen.push(candidate.to_owned());
            }
        }
        chosen
    }

    fn date_in_range(&mut self, first_year: i32, last_year: i32) -> Date {
        let span = (last_year - first_year + 1) as usize;
        let year = first_year + self.rng.int_n(span) as i32;
        let month = Month::try_from(1 + self.rng.int_n(12) as u8).unwrap_or(Month::January);
        let day = 1 + self.rng.int_n(28) as u8;
        Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words - min_words + 1);
        let mut words: Vec<&str> = (0..count).map(|_| self.pick(&WORDS)).collect();
        let mut out = words.remove(0).to_owned();
        if let Some(first) = out.get_mut(..1) {
            first.make_ascii_uppercase();
        }
        for word in words {
            out.push(' ');
            out.push_str(word);
        }
        out.push('.');
        out
    }
}

fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Hand-written project used by scenario tests.
pub fn sample_project(id: &str, category: &str, status: &str) -> Project {
    Project {
        id: ProjectId::new(id),
        title: format!("Project {id}"),
        description: format!("Long description for {id}."),
        short_description: format!("Short description for {id}."),
        technologies: vec!["React".to_owned(), "Rust".to_owned()],
        category: category.to_owned(),
        status: status.to_owned(),
        client_name: "Acme Corp".to_owned(),
        project_url: None,
        github_url: None,
        image_url: String::new(),
        images: Vec::new(),
        start_date: Some("2024-03-01".to_owned()),
        end_date: None,
        featured: false,
        tags: Vec::new(),
        created_time: "2024-03-01T09:00:00.000Z".to_owned(),
    }
}

/// `{success: true, data: [...]}` body for the projects endpoint.
pub fn projects_body(projects: &[Project]) -> String {
    json!({ "success": true, "data": projects }).to_string()
}

pub fn inquiry_ack_body(success: bool, message: Option<&str>) -> String {
    match message {
        Some(message) => json!({ "success": success, "message": message }).to_string(),
        None => json!({ "success": success }).to_string(),
    }
}

/// Pipeline with the minimum required fields filled.
pub fn filled_inquiry(name: &str, email: &str, message: &str) -> InquiryPipeline {
    let mut pipeline = InquiryPipeline::default();
    pipeline.set_field(InquiryField::Name, name);
    pipeline.set_field(InquiryField::Email, email);
    pipeline.set_field(InquiryField::Message, message);
    pipeline
}

/// Notification sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub received: Vec<Notification>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.received.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::{PortfolioFaker, projects_body, sample_project};
    use horizon_app::{CATEGORY_FILTERS, STATUS_FILTERS, format_month_year};
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = PortfolioFaker::new(42);
        let mut right = PortfolioFaker::new(42);
        assert_eq!(left.collection(5), right.collection(5));
    }

    #[test]
    fn ids_are_unique_within_a_collection() {
        let mut faker = PortfolioFaker::new(7);
        let collection = faker.collection(50);
        let ids: BTreeSet<_> = collection.iter().map(|project| project.id.clone()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn projects_use_known_categories_and_statuses() {
        let mut faker = PortfolioFaker::new(3);
        for project in faker.collection(40) {
            assert!(CATEGORY_FILTERS[1..].contains(&project.category.as_str()));
            assert!(STATUS_FILTERS[1..].contains(&project.status.as_str()));
            assert!(!project.technologies.is_empty());
            assert!(!project.title.is_empty());
        }
    }

    #[test]
    fn dates_are_parseable_and_completed_projects_have_end_dates() {
        for seed in 0_u64..30_u64 {
            let mut faker = PortfolioFaker::new(seed);
            let project = faker.project_with("DevOps", "Completed");
            let start = project.start_date.as_deref().expect("completed has start");
            assert!(format_month_year(start).is_some());
            let end = project.end_date.as_deref().expect("completed has end");
            assert!(end > start, "seed {seed}: {end} <= {start}");
        }
    }

    #[test]
    fn projects_body_wraps_collection_in_success_envelope() -> serde_json::Result<()> {
        let body = projects_body(&[sample_project("p1", "Web Development", "Completed")]);
        let value: serde_json::Value = serde_json::from_str(&body)?;
        assert_eq!(value["success"], true);
        assert_eq!(value["data"][0]["id"], "p1");
        assert_eq!(value["data"][0]["shortDescription"], "Short description for p1.");
        Ok(())
    }
}
