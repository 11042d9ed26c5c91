//! Parsing of ticket list query strings into typed filters, sort and paging.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use db::{
    models::{
        tag::normalize_tag_names,
        ticket::{AssigneeFilter, SortDirection, TicketFilters, TicketSort, TicketSortField},
    },
    types::{TicketChannel, TicketPriority, TicketStatus},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{Result, TicketError};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const UNASSIGNED: &str = "unassigned";

/// Raw list parameters as they arrive in a query string. Multi-valued
/// filters are comma separated.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TicketListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub channel: Option<String>,
    pub tags: Option<String>,
    pub assignee_id: Option<String>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sla_breached: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// 1-based page; sizes outside `1..=100` are clamped.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TicketPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> TicketPage<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: request.total_pages(total),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketQuery {
    pub filters: TicketFilters,
    pub sort: TicketSort,
    pub page: PageRequest,
}

impl TicketListParams {
    pub fn parse(&self) -> Result<TicketQuery> {
        let page = PageRequest::new(
            lenient_int(self.page.as_deref()).unwrap_or(1),
            lenient_int(self.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE as i64),
        );

        let statuses = split_list(self.status.as_deref())
            .map(|value| {
                TicketStatus::from_str(value).map_err(|_| TicketError::InvalidStatus(value.into()))
            })
            .collect::<Result<Vec<_>>>()?;
        let priorities = split_list(self.priority.as_deref())
            .map(|value| parse_enum::<TicketPriority>("priority", value))
            .collect::<Result<Vec<_>>>()?;
        let channels = split_list(self.channel.as_deref())
            .map(|value| parse_enum::<TicketChannel>("channel", value))
            .collect::<Result<Vec<_>>>()?;
        let tags = normalize_tag_names(
            &split_list(self.tags.as_deref())
                .map(str::to_string)
                .collect::<Vec<_>>(),
        );

        let assignee = match non_blank(self.assignee_id.as_deref()) {
            None => None,
            Some(value) if value.eq_ignore_ascii_case(UNASSIGNED) => {
                Some(AssigneeFilter::Unassigned)
            }
            Some(value) => Some(AssigneeFilter::Member(Uuid::parse_str(value).map_err(
                |_| TicketError::Validation(format!("Invalid assigneeId: {value}")),
            )?)),
        };

        let sla_breached = match non_blank(self.sla_breached.as_deref()) {
            None => None,
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            Some(other) => {
                return Err(TicketError::Validation(format!(
                    "Invalid slaBreached: {other}"
                )));
            }
        };

        let filters = TicketFilters {
            statuses,
            priorities,
            channels,
            assignee,
            search: non_blank(self.search.as_deref()).map(str::to_string),
            tags,
            date_from: non_blank(self.date_from.as_deref())
                .map(|value| parse_date_bound(value, DateBound::Start))
                .transpose()?,
            date_to: non_blank(self.date_to.as_deref())
                .map(|value| parse_date_bound(value, DateBound::End))
                .transpose()?,
            sla_breached,
        };

        // Unknown sort values fall back to the defaults instead of failing.
        let sort = TicketSort {
            field: non_blank(self.sort_field.as_deref())
                .and_then(|value| TicketSortField::from_str(value).ok())
                .unwrap_or_default(),
            direction: non_blank(self.sort_dir.as_deref())
                .and_then(|value| SortDirection::from_str(&value.to_ascii_lowercase()).ok())
                .unwrap_or_default(),
        };

        Ok(TicketQuery {
            filters,
            sort,
            page,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn lenient_int(value: Option<&str>) -> Option<i64> {
    non_blank(value).and_then(|value| value.parse().ok())
}

fn split_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

fn parse_enum<T: FromStr>(field: &str, value: &str) -> Result<T> {
    T::from_str(value).map_err(|_| TicketError::Validation(format!("Invalid {field}: {value}")))
}

#[derive(Clone, Copy)]
enum DateBound {
    Start,
    End,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates. A plain date
/// covers the whole day on the side of the range it bounds.
fn parse_date_bound(value: &str, bound: DateBound) -> Result<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TicketError::Validation(format!("Invalid date: {value}")))?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };
    Ok(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> TicketListParams {
        let value = serde_json::Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
        );
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_params_use_defaults() {
        let query = TicketListParams::default().parse().unwrap();
        assert_eq!(query.page, PageRequest::new(1, 20));
        assert_eq!(query.sort.field, TicketSortField::CreatedAt);
        assert_eq!(query.sort.direction, SortDirection::Desc);
        assert_eq!(query.filters, TicketFilters::default());
    }

    #[test]
    fn paging_is_clamped() {
        let query = params(&[("page", "0"), ("pageSize", "500")]).parse().unwrap();
        assert_eq!(query.page.page, 1);
        assert_eq!(query.page.page_size, 100);

        let query = params(&[("page", "abc"), ("pageSize", "0")]).parse().unwrap();
        assert_eq!(query.page.page, 1);
        assert_eq!(query.page.page_size, 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest::new(8, 20);
        assert_eq!(page.total_pages(137), 7);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.offset(), 140);
    }

    #[test]
    fn huge_pages_saturate_the_offset() {
        let page = PageRequest::new(i64::MAX, 100);
        assert_eq!(page.page, i64::MAX as u64);
        assert_eq!(page.offset(), u64::MAX);
    }

    #[test]
    fn multi_valued_filters_split_on_commas() {
        let query = params(&[
            ("status", "OPEN, PENDING"),
            ("priority", "URGENT"),
            ("channel", "EMAIL,CHAT"),
            ("tags", "billing, vip,billing"),
        ])
        .parse()
        .unwrap();
        assert_eq!(
            query.filters.statuses,
            vec![TicketStatus::Open, TicketStatus::Pending]
        );
        assert_eq!(query.filters.priorities, vec![TicketPriority::Urgent]);
        assert_eq!(
            query.filters.channels,
            vec![TicketChannel::Email, TicketChannel::Chat]
        );
        assert_eq!(query.filters.tags, vec!["billing", "vip"]);
    }

    #[test]
    fn unknown_status_is_invalid_status() {
        let err = params(&[("status", "OPEN,ARCHIVED")]).parse().unwrap_err();
        assert!(matches!(err, TicketError::InvalidStatus(ref v) if v == "ARCHIVED"));

        let err = params(&[("priority", "CRITICAL")]).parse().unwrap_err();
        assert!(matches!(err, TicketError::Validation(_)));
    }

    #[test]
    fn assignee_sentinel_and_ids() {
        let query = params(&[("assigneeId", "unassigned")]).parse().unwrap();
        assert_eq!(query.filters.assignee, Some(AssigneeFilter::Unassigned));

        let id = Uuid::new_v4();
        let query = params(&[("assigneeId", &id.to_string())]).parse().unwrap();
        assert_eq!(query.filters.assignee, Some(AssigneeFilter::Member(id)));

        assert!(params(&[("assigneeId", "bob")]).parse().is_err());
    }

    #[test]
    fn unknown_sort_values_fall_back() {
        let query = params(&[("sortField", "title"), ("sortDir", "sideways")])
            .parse()
            .unwrap();
        assert_eq!(query.sort, TicketSort::default());

        let query = params(&[("sortField", "priority"), ("sortDir", "ASC")])
            .parse()
            .unwrap();
        assert_eq!(query.sort.field, TicketSortField::Priority);
        assert_eq!(query.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn plain_dates_cover_whole_days() {
        let query = params(&[
            ("dateFrom", "2025-03-01"),
            ("dateTo", "2025-03-02"),
            ("slaBreached", "true"),
            ("search", "  "),
        ])
        .parse()
        .unwrap();
        assert_eq!(
            query.filters.date_from.unwrap().to_rfc3339(),
            "2025-03-01T00:00:00+00:00"
        );
        assert_eq!(
            query.filters.date_to.unwrap().to_rfc3339(),
            "2025-03-02T23:59:59.999+00:00"
        );
        assert_eq!(query.filters.sla_breached, Some(true));
        assert_eq!(query.filters.search, None);

        assert!(params(&[("dateFrom", "yesterday")]).parse().is_err());
    }
}
