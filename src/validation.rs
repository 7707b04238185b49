use std::collections::HashMap;

use crate::error::ApiError;

/// Recognized employment types. The upstream API expects these as flag
/// parameters (`full_time=1`) rather than a `job_type=` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Permanent,
}

impl JobType {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "full_time" => Some(Self::FullTime),
            "part_time" => Some(Self::PartTime),
            "contract" => Some(Self::Contract),
            "permanent" => Some(Self::Permanent),
            _ => None,
        }
    }

    /// Name of the upstream flag parameter.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Permanent => "permanent",
        }
    }
}

/// Result orderings accepted by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Relevance,
    Date,
    Salary,
}

impl SortBy {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "relevance" => Some(Self::Relevance),
            "date" => Some(Self::Date),
            "salary" => Some(Self::Salary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
            Self::Salary => "salary",
        }
    }
}

/// A fully validated search request, safe to forward upstream.
///
/// Numeric-like fields are digit-only by the time they land here; nothing
/// in this struct has touched shared state or the network.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub page: u32,
    pub results_per_page: u32,
    pub q: String,
    pub location: String,
    pub company: Option<String>,
    pub job_type: Option<JobType>,
    pub sort_by: Option<SortBy>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub max_days_old: Option<String>,
}

impl SearchParams {
    /// Validate raw query parameters, reporting the first offending field
    /// in declaration order: `page`, `results_per_page`, `sort_by`,
    /// `salary_min`, `salary_max`, `max_days_old`.
    ///
    /// An unrecognized `job_type` is dropped rather than rejected —
    /// observed behavior of the service this one replaces, kept as is.
    pub fn from_query(raw: &HashMap<String, String>) -> Result<Self, ApiError> {
        let page = bounded_int(raw, "page", 1, 1, 50)?;
        let results_per_page = bounded_int(raw, "results_per_page", 20, 1, 50)?;

        let sort_by = match optional(raw, "sort_by") {
            Some(value) => {
                Some(SortBy::parse(value).ok_or(ApiError::InvalidParameter("sort_by"))?)
            }
            None => None,
        };

        let salary_min = digit_string(raw, "salary_min")?;
        let salary_max = digit_string(raw, "salary_max")?;
        let max_days_old = digit_string(raw, "max_days_old")?;

        Ok(Self {
            page,
            results_per_page,
            q: raw.get("q").cloned().unwrap_or_default(),
            location: raw.get("location").cloned().unwrap_or_default(),
            company: optional(raw, "company").map(str::to_string),
            job_type: optional(raw, "job_type").and_then(JobType::parse),
            sort_by,
            salary_min,
            salary_max,
            max_days_old,
        })
    }

    /// Full upstream parameter set, credentials included. This is also the
    /// input to cache key canonicalization.
    pub fn to_upstream_params(&self, app_id: &str, app_key: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("app_id".to_string(), app_id.to_string()),
            ("app_key".to_string(), app_key.to_string()),
            ("what".to_string(), self.q.clone()),
            ("where".to_string(), self.location.clone()),
            ("page".to_string(), self.page.to_string()),
            ("results_per_page".to_string(), self.results_per_page.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
        ];

        if let Some(company) = &self.company {
            params.push(("company".to_string(), company.clone()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by".to_string(), sort_by.as_str().to_string()));
        }
        if let Some(salary_min) = &self.salary_min {
            params.push(("salary_min".to_string(), salary_min.clone()));
        }
        if let Some(salary_max) = &self.salary_max {
            params.push(("salary_max".to_string(), salary_max.clone()));
        }
        if let Some(max_days_old) = &self.max_days_old {
            params.push(("max_days_old".to_string(), max_days_old.clone()));
        }
        if let Some(job_type) = self.job_type {
            params.push((job_type.flag().to_string(), "1".to_string()));
        }

        params
    }
}

/// Present and non-empty, or nothing.
fn optional<'a>(raw: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    raw.get(name).map(String::as_str).filter(|value| !value.is_empty())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Optional digit-only field; an empty string counts as absent. Signs,
/// decimals, and whitespace are rejected outright.
fn digit_string(
    raw: &HashMap<String, String>,
    name: &'static str,
) -> Result<Option<String>, ApiError> {
    match optional(raw, name) {
        Some(value) if is_digits(value) => Ok(Some(value.to_string())),
        Some(_) => Err(ApiError::InvalidParameter(name)),
        None => Ok(None),
    }
}

/// Defaulted integer field, digit-only, bounds-checked inclusive.
fn bounded_int(
    raw: &HashMap<String, String>,
    name: &'static str,
    default: u32,
    min: u32,
    max: u32,
) -> Result<u32, ApiError> {
    let value = match raw.get(name) {
        Some(raw_value) => {
            if !is_digits(raw_value) {
                return Err(ApiError::InvalidParameter(name));
            }
            raw_value
                .parse::<u32>()
                .map_err(|_| ApiError::InvalidParameter(name))?
        }
        None => default,
    };

    if value < min || value > max {
        return Err(ApiError::InvalidParameter(name));
    }
    Ok(value)
}
