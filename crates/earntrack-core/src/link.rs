//! Page location and shareable links.
//!
//! The location is read once at load (settings parameters, `mode=zen`) and
//! afterwards only written: zen mode is projected onto the `mode` parameter by
//! replacing the query in place, never by navigating.

use url::Url;

use crate::error::CoreError;
use crate::settings::{Settings, SettingsField};

pub const MODE_PARAM: &str = "mode";
pub const ZEN_MODE: &str = "zen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.url.query_pairs().any(|(k, _)| k == name)
    }

    /// `true` if any settings parameter is present, valid or not.
    pub fn has_settings_params(&self) -> bool {
        SettingsField::ALL.iter().any(|f| self.has_param(f.key()))
    }

    pub fn zen_requested(&self) -> bool {
        self.param(MODE_PARAM).as_deref() == Some(ZEN_MODE)
    }

    /// Project zen mode onto the query. Other parameters keep their order.
    /// Returns `true` if the location changed.
    pub fn mirror_zen(&mut self, zen_mode: bool) -> bool {
        let current = self.zen_requested();
        if zen_mode == current {
            return false;
        }

        let mut pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if zen_mode {
            match pairs.iter_mut().find(|(k, _)| k == MODE_PARAM) {
                Some(pair) => pair.1 = ZEN_MODE.to_string(),
                None => pairs.push((MODE_PARAM.to_string(), ZEN_MODE.to_string())),
            }
        } else {
            pairs.retain(|(k, _)| k != MODE_PARAM);
        }

        if pairs.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        tracing::debug!(zen_mode, url = %self.url, "location replaced");
        true
    }

    /// Origin and path, without query or fragment.
    pub fn base(&self) -> Url {
        let mut base = self.url.clone();
        base.set_query(None);
        base.set_fragment(None);
        base
    }
}

/// Shareable configuration link for `settings` rooted at `base`.
pub fn share_url(base: &Url, settings: &Settings) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair("salary", &settings.salary.to_string())
        .append_pair("cycle", settings.cycle.as_str())
        .append_pair("workHours", &settings.work_hours.to_string())
        .append_pair("workDaysPerWeek", &settings.work_days_per_week.to_string())
        .append_pair("currency", settings.currency.code());
    url
}

/// The link placed on the clipboard: the share URL opening in zen mode.
pub fn share_link(base: &Url, settings: &Settings) -> String {
    format!("{}&{MODE_PARAM}={ZEN_MODE}", share_url(base, settings))
}

/// Write-only text sink for the share link.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), CoreError>;
}
