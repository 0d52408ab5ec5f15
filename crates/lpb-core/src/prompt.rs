//! Generation prompt for `/genpost`, seeded from a repository README.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::ports::DescriptionSource;

pub const FALLBACK_DESCRIPTION: &str =
    "A GitHub project demonstrating innovative use of modern technologies.";

const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";

/// Build the LinkedIn post generation prompt for a repository.
pub fn build_prompt(repo_link: &str, description: &str) -> String {
    let project_title = project_title(repo_link);
    format!(
        r#"
Generate a professional LinkedIn post for the project below. Follow this structure:

1. Simpler headline including project name on my behalf
2. Short project overview (2-3 sentences)
3. Key features/functionality (bullet points)
4. Technologies used (if mentioned)
5. Call-to-action for contributions or testing

Project: {project_title}
Description: {description}
Repository: {repo_link}

Include relevant emojis in headings and sections, clean formatting, and 3-5 hashtags.
"#
    )
}

/// Last path segment of the query.
pub fn project_title(repo_link: &str) -> &str {
    repo_link.rsplit('/').next().unwrap_or(repo_link)
}

/// First line that is neither blank nor a Markdown heading.
pub fn first_description_line(document: &str) -> Option<&str> {
    document
        .lines()
        .find(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(str::trim)
}

fn github_repo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([^/\s]+)/([^/\s?#]+?)(?:\.git)?/?$")
            .unwrap_or_else(|e| panic!("invalid github repo regex: {e}"))
    })
}

/// `owner/repo` for a GitHub repository URL.
pub fn github_slug(repo_link: &str) -> Option<String> {
    let caps = github_repo_re().captures(repo_link.trim())?;
    Some(format!("{}/{}", &caps[1], &caps[2]))
}

/// Describes GitHub repositories by the first paragraph line of their README.
#[derive(Clone, Debug)]
pub struct GithubReadme {
    http: reqwest::Client,
    base_url: String,
}

impl Default for GithubReadme {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl GithubReadme {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: RAW_CONTENT_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn readme_url(&self, slug: &str) -> String {
        format!("{}/{slug}/main/README.md", self.base_url)
    }
}

#[async_trait]
impl DescriptionSource for GithubReadme {
    async fn describe(&self, query: &str) -> Option<String> {
        let Some(slug) = github_slug(query) else {
            debug!(query, "query is not a GitHub repository URL");
            return None;
        };

        let resp = match self.http.get(self.readme_url(&slug)).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(%slug, error = %e, "README fetch failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            warn!(%slug, status = %resp.status(), "README fetch returned non-success");
            return None;
        }

        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!(%slug, error = %e, "README body read failed");
                return None;
            }
        };
        first_description_line(&body).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn description_skips_headings_and_blank_lines() {
        let readme = "# Title\n\n## Sub\n   \n  A tiny tool for things.  \nMore text\n";
        assert_eq!(first_description_line(readme), Some("A tiny tool for things."));
        assert_eq!(first_description_line("# Only\n\n"), None);
    }

    #[test]
    fn prompt_names_project_and_repository() {
        let p = build_prompt("https://github.com/acme/rocket", "Goes up.");
        assert!(p.contains("Project: rocket\n"));
        assert!(p.contains("Description: Goes up.\n"));
        assert!(p.contains("Repository: https://github.com/acme/rocket\n"));
        assert!(p.contains("3-5 hashtags"));
    }

    #[test]
    fn slug_from_github_urls() {
        assert_eq!(
            github_slug("https://github.com/acme/rocket").as_deref(),
            Some("acme/rocket")
        );
        assert_eq!(
            github_slug("github.com/acme/rocket.git/").as_deref(),
            Some("acme/rocket")
        );
        assert_eq!(github_slug("https://gitlab.com/acme/rocket"), None);
        assert_eq!(github_slug("rocket"), None);
    }

    #[tokio::test]
    async fn describe_reads_first_paragraph_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme/rocket/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Rocket\n\nLaunches things.\n"))
            .mount(&server)
            .await;

        let src = GithubReadme::default().with_base_url(server.uri());
        assert_eq!(
            src.describe("https://github.com/acme/rocket").await.as_deref(),
            Some("Launches things.")
        );
    }

    #[tokio::test]
    async fn describe_is_none_on_missing_readme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404: Not Found"))
            .mount(&server)
            .await;

        let src = GithubReadme::default().with_base_url(server.uri());
        assert_eq!(src.describe("https://github.com/acme/rocket").await, None);
    }
}
