//! HTML email rendering with minijinja.
//!
//! The markup lives in `templates/*.html.j2` and is embedded at compile time.
//! This module only computes the values the markup displays and selects the
//! template and subject for each [`Notification`] variant.
//!
//! # Example
//!
//! ```ignore
//! let engine = TemplateEngine::new(&config)?;
//! let email = engine.render(&Notification::DayStart { day: 3 })?;
//! assert!(email.subject.contains("Day 3"));
//! ```

use crate::config::MailerConfig;
use crate::error::TemplateError;
use crate::request::Notification;
use minijinja::{AutoEscape, Environment, Value, context};
use std::path::Path;

const BASE_TEMPLATE: &str = "base.html.j2";
const DAY_START_TEMPLATE: &str = "day_start.html.j2";
const MISSION_UNLOCK_TEMPLATE: &str = "mission_unlock.html.j2";
const BLACKMARKET_TEMPLATE: &str = "blackmarket.html.j2";

/// Embedded template sources, by registration name.
const EMBEDDED_TEMPLATES: [(&str, &str); 4] = [
    (BASE_TEMPLATE, include_str!("../templates/base.html.j2")),
    (DAY_START_TEMPLATE, include_str!("../templates/day_start.html.j2")),
    (
        MISSION_UNLOCK_TEMPLATE,
        include_str!("../templates/mission_unlock.html.j2"),
    ),
    (BLACKMARKET_TEMPLATE, include_str!("../templates/blackmarket.html.j2")),
];

/// Subject and HTML body of a rendered notification.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

impl Notification {
    /// Subject line for this notification.
    pub fn subject(&self) -> String {
        match self {
            Notification::DayStart { day } => {
                format!("🌅 Day {} Has Started! - The Godfather: Office Mafia", day)
            }
            Notification::MissionUnlock { day, .. } => {
                format!("🎯 Day {} Missions Unlocking Soon! - The Godfather", day)
            }
            Notification::Blackmarket { .. } => {
                "🏪 Black Market Opening in 5 Minutes! - The Godfather".to_string()
            }
        }
    }

    fn template_name(&self) -> &'static str {
        match self {
            Notification::DayStart { .. } => DAY_START_TEMPLATE,
            Notification::MissionUnlock { .. } => MISSION_UNLOCK_TEMPLATE,
            Notification::Blackmarket { .. } => BLACKMARKET_TEMPLATE,
        }
    }
}

/// Display form of an unlock hour, e.g. `14:00`.
pub fn unlock_time(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Item-count phrase for the black market email.
pub fn items_phrase(items_count: u32) -> String {
    if items_count > 0 {
        format!("{} new items", items_count)
    } else {
        "exclusive items".to_string()
    }
}

/// Template engine holding the compiled email templates.
///
/// Rendering is pure: no I/O happens after construction.
pub struct TemplateEngine {
    env: Environment<'static>,
    base_url: String,
}

impl TemplateEngine {
    /// Create an engine from the embedded templates, applying any overrides
    /// found in `config.template_dir`.
    pub fn new(config: &MailerConfig) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        // Caller values like `open_time` are escaped; plain times pass through unchanged.
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        for (name, source) in EMBEDDED_TEMPLATES {
            let source = match &config.template_dir {
                Some(dir) => load_override(dir, name)?.unwrap_or_else(|| source.to_string()),
                None => source.to_string(),
            };
            env.add_template_owned(name, source)
                .map_err(|e| TemplateError::LoadFailed {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            env,
            base_url: config.frontend_url.clone(),
        })
    }

    /// Render the subject and HTML body for a notification.
    pub fn render(&self, notification: &Notification) -> Result<RenderedEmail, TemplateError> {
        let name = notification.template_name();
        tracing::debug!(template = name, "Rendering email template");

        let ctx = match notification {
            Notification::DayStart { day } => context! {
                day => day,
                cta_url => self.cta_url(""),
            },
            Notification::MissionUnlock { day, unlock_hour } => context! {
                day => day,
                unlock_time => unlock_time(*unlock_hour),
                cta_url => self.cta_url("/missions"),
            },
            Notification::Blackmarket {
                open_time,
                items_count,
            } => context! {
                open_time => open_time,
                items_count => items_count,
                items_phrase => items_phrase(*items_count),
                cta_url => self.cta_url("/trade"),
            },
        };

        let template = self
            .env
            .get_template(name)
            .map_err(|_| TemplateError::NotFound {
                name: name.to_string(),
            })?;

        let html = template
            .render(ctx)
            .map_err(|e| TemplateError::RenderFailed {
                message: e.to_string(),
            })?;

        Ok(RenderedEmail {
            subject: notification.subject(),
            html,
        })
    }

    // The base URL comes from trusted configuration; marking it safe keeps
    // `/` from being entity-encoded inside the href.
    fn cta_url(&self, path: &str) -> Value {
        Value::from_safe_string(format!("{}{}", self.base_url, path))
    }
}

fn load_override(dir: &Path, name: &str) -> Result<Option<String>, TemplateError> {
    let path = dir.join(name);
    if !path.exists() {
        tracing::debug!(template = name, "No override, using embedded template");
        return Ok(None);
    }

    std::fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| TemplateError::LoadFailed {
            name: name.to_string(),
            message: format!("{}: {}", path.display(), e),
        })
}
