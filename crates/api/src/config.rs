use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the upstream school API.
    pub upstream_url: String,
    /// Per-request timeout for upstream calls in seconds (default: `10`).
    pub upstream_timeout_secs: u64,
    /// Emails granted admin access in addition to the `admin` role claim.
    /// Compared case-insensitively.
    pub admin_emails: Vec<String>,
    /// Number of courses featured on the home page (default: `6`).
    pub featured_courses: usize,
    /// Access token verification settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                     |
    /// |-------------------------|-----------------------------|
    /// | `HOST`                  | `0.0.0.0`                   |
    /// | `PORT`                  | `3000`                      |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                        |
    /// | `UPSTREAM_API_URL`      | `http://localhost:5000/api` |
    /// | `UPSTREAM_TIMEOUT_SECS` | `10`                        |
    /// | `ADMIN_EMAILS`          | (empty)                     |
    /// | `FEATURED_COURSES`      | `6`                         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upstream_url = std::env::var("UPSTREAM_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".into());

        let upstream_timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64");

        let admin_emails = parse_list(&std::env::var("ADMIN_EMAILS").unwrap_or_default())
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();

        let featured_courses: usize = std::env::var("FEATURED_COURSES")
            .unwrap_or_else(|_| "6".into())
            .parse()
            .expect("FEATURED_COURSES must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upstream_url,
            upstream_timeout_secs,
            admin_emails,
            featured_courses,
            jwt,
        }
    }

    /// Whether `email` is on the configured admin list.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

/// Split a comma-separated env value, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(" a@x.com, ,b@x.com,"),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn admin_email_match_ignores_case() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            upstream_url: "http://upstream".into(),
            upstream_timeout_secs: 10,
            admin_emails: vec!["owner@school.com".into()],
            featured_courses: 6,
            jwt: JwtConfig {
                secret: "s".into(),
                issuer: None,
            },
        };
        assert!(config.is_admin_email(" Owner@School.com "));
        assert!(!config.is_admin_email("student@school.com"));
    }
}
