/// Excludes applications below configured group paths (e.g. `/system`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppFilter {
    excluded: Vec<String>,
}

impl AppFilter {
    /// Parse a comma separated list of group paths.
    ///
    /// Entries are trimmed, made absolute and stripped of trailing slashes; empty entries are ignored.
    pub fn parse(raw: &str) -> Self {
        let excluded = raw
            .split(',')
            .map(|s| s.trim().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(|s| format!("/{s}"))
            .collect();
        Self { excluded }
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// `false` if `app_id` equals or lives below an excluded group.
    pub fn accepts(&self, app_id: &str) -> bool {
        !self.excluded.iter().any(|group| {
            app_id == group
                || app_id
                    .strip_prefix(group.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
